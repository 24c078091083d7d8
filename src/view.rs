// src/view.rs

use std::io::{self, Write};

/// The rendering surface the session engine reports to.
///
/// One call per inbound protocol outcome, plus `add_as_list_item` for local
/// informational lines that never touched the network.
pub trait View {
    fn render_user_login(&mut self, user_name: &str);
    fn render_user_login_failed(&mut self, text: &str);
    fn render_user_logout(&mut self, user_name: &str);
    fn render_user_logout_failed(&mut self, text: &str);
    fn render_public_message(&mut self, sender: &str, text: &str);
    /// `is_received` is false when the local user is the sender.
    fn render_private_message(&mut self, sender: &str, receiver: &str, text: &str, is_received: bool);
    fn render_all_users(&mut self, users: &[String]);
    fn add_as_list_item(&mut self, text: &str);

    /// Prints the command reference.
    fn render_help_text(&mut self) {
        const SEPARATOR: &str = "-------------------------------------------";
        self.add_as_list_item("Chat commands available:");
        self.add_as_list_item(SEPARATOR);
        self.add_as_list_item("login <user name>: required to participate in chat");
        self.add_as_list_item("logout: leaves the chat");
        self.add_as_list_item("public <message>: sends message to all users");
        self.add_as_list_item("private <receiver user name> <message>: sends private message to specified user");
        self.add_as_list_item("listall: lists all users");
        self.add_as_list_item(SEPARATOR);
    }
}

/// Renders each event as one line of text on a writer, usually stdout.
pub struct TerminalView<W> {
    out: W,
    color: bool,
}

impl TerminalView<io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> TerminalView<W> {
    /// `color` turns on bold user names.
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn bold(&self, user_name: &str) -> String {
        if self.color {
            format!("\x1b[1m{}\x1b[0m", user_name)
        } else {
            user_name.to_string()
        }
    }

    fn write_line(&mut self, line: &str) {
        // A closed stdout must not take the session down with it.
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write> View for TerminalView<W> {
    fn render_user_login(&mut self, user_name: &str) {
        let line = format!("{} joined the chat", self.bold(user_name));
        self.write_line(&line);
    }

    fn render_user_login_failed(&mut self, text: &str) {
        self.write_line(&format!("login failed: {}", text));
    }

    fn render_user_logout(&mut self, user_name: &str) {
        let line = format!("{} has left the chat", self.bold(user_name));
        self.write_line(&line);
    }

    fn render_user_logout_failed(&mut self, text: &str) {
        self.write_line(&format!("logout failed: {}", text));
    }

    fn render_public_message(&mut self, sender: &str, text: &str) {
        let line = format!("{}: {}", self.bold(sender), text);
        self.write_line(&line);
    }

    fn render_private_message(&mut self, sender: &str, receiver: &str, text: &str, is_received: bool) {
        let description = if is_received {
            format!("private message from {}", self.bold(sender))
        } else {
            format!("private message to {}", self.bold(receiver))
        };
        self.write_line(&format!("{}: {}", description, text));
    }

    fn render_all_users(&mut self, users: &[String]) {
        let names: Vec<String> = users.iter().map(|name| self.bold(name)).collect();
        self.write_line(&format!("current users: {}", names.join(", ")));
    }

    fn add_as_list_item(&mut self, text: &str) {
        self.write_line(text);
    }
}
