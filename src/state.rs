// src/state.rs

/// The local client's record of its own identity and login status.
///
/// One per connection. `is_logged_in` is only ever true for a non-empty name
/// that the server has acknowledged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    user_name: String,
    is_logged_in: bool,
}

impl Session {
    /// A fresh session: no name, logged out.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session that has asked to log in as `user_name` and is waiting for
    /// the server's acknowledgment.
    pub fn logging_in(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            is_logged_in: false,
        }
    }

    /// A session the server has acknowledged. An empty name stays logged out.
    pub fn logged_in(user_name: impl Into<String>) -> Self {
        let user_name = user_name.into();
        let is_logged_in = !user_name.is_empty();
        Self {
            user_name,
            is_logged_in,
        }
    }

    /// The same session after a logout notification. The name is kept.
    pub fn logged_out(&self) -> Self {
        Self::logging_in(self.user_name.clone())
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn is_logged_in(&self) -> bool {
        self.is_logged_in
    }
}
