// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Failures encoding or decoding a wire envelope.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// An inbound frame that is not a valid envelope. Dropped by the engine.
    #[error("unrecognized message: {0}")]
    UnrecognizedMessage(#[source] serde_json::Error),

    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Why a user command produced no outbound message.
///
/// These never reach the network. Rejections are shown to the user, an
/// unrecognized verb is dropped silently.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("not yet logged in")]
    NotLoggedIn,

    #[error("already logged in")]
    AlreadyLoggedIn,

    #[error("usage: {usage}")]
    MissingArgument { usage: &'static str },

    #[error("unrecognized command: {0:?}")]
    Unrecognized(String),
}

impl CommandError {
    /// True for errors the user should see, false for silently ignored input.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, CommandError::Unrecognized(_))
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level client error
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },
}
