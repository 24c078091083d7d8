// src/models.rs

use crate::error::ProtocolError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of message types understood by the chat protocol.
///
/// Serialized as lowercase, underscore-separated strings (`"public_message"`).
/// Any tag this client does not know decodes to [`MessageType::Unknown`] so a
/// newer server can never make decoding fail.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// Client login request, and the server's broadcast acknowledgment.
    Login,
    /// Server notification that a login was refused. Reason in `messageText`.
    LoginFailed,
    /// Client logout request, and the server's notification.
    Logout,
    /// Server notification that a logout was refused. Reason in `messageText`.
    LogoutFailed,
    /// Message to every logged-in user.
    PublicMessage,
    /// Message to a single user; delivered to both receiver and sender.
    PrivateMessage,
    /// Request for, and response with, every logged-in user.
    ListAllUsers,
    #[serde(other)]
    Unknown,
}

impl MessageType {
    /// Every type defined by the protocol, excluding [`MessageType::Unknown`].
    pub const ALL: [MessageType; 7] = [
        MessageType::Login,
        MessageType::LoginFailed,
        MessageType::Logout,
        MessageType::LogoutFailed,
        MessageType::PublicMessage,
        MessageType::PrivateMessage,
        MessageType::ListAllUsers,
    ];

    /// The wire tag for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Login => "login",
            MessageType::LoginFailed => "login_failed",
            MessageType::Logout => "logout",
            MessageType::LogoutFailed => "logout_failed",
            MessageType::PublicMessage => "public_message",
            MessageType::PrivateMessage => "private_message",
            MessageType::ListAllUsers => "list_all_users",
            MessageType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The wire envelope exchanged with the chat server, one JSON object per frame.
///
/// Only `messageType` and `senderUserName` are always meaningful; the other
/// fields are set by the constructors of the types that use them and are left
/// out of the JSON otherwise.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub message_type: MessageType,
    // Some server notifications (login_failed) carry no sender.
    #[serde(default)]
    pub sender_user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_users: Option<Vec<String>>,
}

impl Message {
    /// Creates a message carrying only a type and a sender.
    pub fn new(message_type: MessageType, sender_user_name: impl Into<String>) -> Self {
        Self {
            message_type,
            sender_user_name: sender_user_name.into(),
            message_text: None,
            receiver_user_name: None,
            all_users: None,
        }
    }

    pub fn login(sender_user_name: impl Into<String>) -> Self {
        Self::new(MessageType::Login, sender_user_name)
    }

    pub fn logout(sender_user_name: impl Into<String>) -> Self {
        Self::new(MessageType::Logout, sender_user_name)
    }

    pub fn login_failed(reason: impl Into<String>) -> Self {
        Self {
            message_text: Some(reason.into()),
            ..Self::new(MessageType::LoginFailed, "")
        }
    }

    pub fn logout_failed(reason: impl Into<String>) -> Self {
        Self {
            message_text: Some(reason.into()),
            ..Self::new(MessageType::LogoutFailed, "")
        }
    }

    pub fn public_message(sender_user_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            message_text: Some(text.into()),
            ..Self::new(MessageType::PublicMessage, sender_user_name)
        }
    }

    pub fn private_message(
        sender_user_name: impl Into<String>,
        receiver_user_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            message_text: Some(text.into()),
            receiver_user_name: Some(receiver_user_name.into()),
            ..Self::new(MessageType::PrivateMessage, sender_user_name)
        }
    }

    /// A user-list request. The server answers with [`Message::user_list`].
    pub fn list_all_users(sender_user_name: impl Into<String>) -> Self {
        Self::new(MessageType::ListAllUsers, sender_user_name)
    }

    /// The server's answer to a user-list request.
    pub fn user_list(users: Vec<String>) -> Self {
        Self {
            all_users: Some(users),
            ..Self::new(MessageType::ListAllUsers, "")
        }
    }

    /// Message text, empty when absent.
    pub fn text(&self) -> &str {
        self.message_text.as_deref().unwrap_or_default()
    }

    /// Receiver of a private message, empty when absent.
    pub fn receiver(&self) -> &str {
        self.receiver_user_name.as_deref().unwrap_or_default()
    }

    /// Users listed in a user-list response, empty when absent.
    pub fn users(&self) -> &[String] {
        self.all_users.as_deref().unwrap_or_default()
    }

    /// Encodes the message as one JSON text frame.
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    /// Decodes one JSON text frame.
    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::UnrecognizedMessage)
    }
}
