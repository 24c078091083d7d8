// src/lib.rs

//! Terminal client for a small JSON chat protocol spoken over a websocket.
//!
//! [`models`] defines the wire envelope, [`engine`] holds the session state
//! machine that turns typed commands into messages and inbound messages into
//! [`view`] calls, and [`websocket`] connects the two to a real server.

pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod models;
pub mod state;
pub mod view;
pub mod websocket;

pub use config::ClientConfig;
pub use engine::{SessionEngine, ViewEffect, dispatch, parse_user_query};
pub use error::{ChatError, CommandError, ConfigError, ProtocolError};
pub use models::{Message, MessageType};
pub use state::Session;
pub use view::{TerminalView, View};
pub use websocket::{OutboundSender, Transport, run_session};
