// src/config.rs

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Client settings. Every field has a default, so a config file only needs
/// the keys it wants to change.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Server host and port, e.g. `chat.example.org:8080`.
    pub host: String,
    /// Websocket path on the server.
    pub path: String,
    /// Reproduce the legacy client, which sent a `logout` when `login` was
    /// typed while already logged in.
    pub login_fallthrough: bool,
    /// Bold user names in terminal output.
    pub color: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost:8080".to_string(),
            path: "/websocket".to_string(),
            login_fallthrough: false,
            color: true,
        }
    }
}

impl ClientConfig {
    /// The websocket URL to connect to.
    pub fn endpoint(&self) -> String {
        if self.path.starts_with('/') {
            format!("ws://{}{}", self.host, self.path)
        } else {
            format!("ws://{}/{}", self.host, self.path)
        }
    }
}

/// Get the default configuration file path
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chat-client")
        .join("config.toml")
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(toml::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_endpoint() {
        assert_eq!(ClientConfig::default().endpoint(), "ws://localhost:8080/websocket");
    }

    #[test]
    fn test_endpoint_adds_leading_slash() {
        let config = ClientConfig {
            host: "127.0.0.1:9000".into(),
            path: "chat".into(),
            ..Default::default()
        };
        assert_eq!(config.endpoint(), "ws://127.0.0.1:9000/chat");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "host = \"chat.local:8001\"\nlogin_fallthrough = true").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.host, "chat.local:8001");
        assert!(config.login_fallthrough);
        assert_eq!(config.path, "/websocket");
        assert!(config.color);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(load_config(&path), Err(ConfigError::NotFound(p)) if p == path));
    }

    #[test]
    fn test_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "color = \"sometimes\"").unwrap();
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_default_path_is_named_after_the_client() {
        assert!(default_config_path().ends_with("chat-client/config.toml"));
    }
}
