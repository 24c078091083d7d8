// src/engine.rs

use crate::{
    error::CommandError,
    models::{Message, MessageType},
    state::Session,
    view::View,
    websocket::Transport,
};
use tracing::{debug, info, warn};

/// What an inbound message asks the view to show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewEffect {
    UserLogin { user_name: String },
    UserLoginFailed { text: String },
    UserLogout { user_name: String },
    UserLogoutFailed { text: String },
    PublicMessage { sender: String, text: String },
    PrivateMessage {
        sender: String,
        receiver: String,
        text: String,
        is_received: bool,
    },
    AllUsers { users: Vec<String> },
}

impl ViewEffect {
    /// Forwards the effect to the matching render call.
    pub fn render<V: View + ?Sized>(&self, view: &mut V) {
        match self {
            ViewEffect::UserLogin { user_name } => view.render_user_login(user_name),
            ViewEffect::UserLoginFailed { text } => view.render_user_login_failed(text),
            ViewEffect::UserLogout { user_name } => view.render_user_logout(user_name),
            ViewEffect::UserLogoutFailed { text } => view.render_user_logout_failed(text),
            ViewEffect::PublicMessage { sender, text } => view.render_public_message(sender, text),
            ViewEffect::PrivateMessage {
                sender,
                receiver,
                text,
                is_received,
            } => view.render_private_message(sender, receiver, text, *is_received),
            ViewEffect::AllUsers { users } => view.render_all_users(users),
        }
    }
}

/// Turns one line of user input into the message to send.
///
/// The verb is everything before the first space. Message bodies are the rest
/// of the line verbatim, so runs of spaces inside a body survive. While logged
/// out only `login` is accepted.
pub fn parse_user_query(session: &Session, query: &str) -> Result<Message, CommandError> {
    let (verb, rest) = match query.split_once(' ') {
        Some((verb, rest)) => (verb, rest),
        None => (query, ""),
    };

    if !session.is_logged_in() {
        return match verb {
            "login" => {
                let user_name = rest.split(' ').next().unwrap_or_default();
                if user_name.is_empty() {
                    return Err(CommandError::MissingArgument {
                        usage: "login <user name>",
                    });
                }
                Ok(Message::login(user_name))
            }
            _ => Err(CommandError::NotLoggedIn),
        };
    }

    let user_name = session.user_name();
    match verb {
        "login" => Err(CommandError::AlreadyLoggedIn),
        "logout" => Ok(Message::logout(user_name)),
        "public" => Ok(Message::public_message(user_name, rest)),
        "private" => {
            let (receiver, text) = rest.split_once(' ').unwrap_or((rest, ""));
            if receiver.is_empty() {
                return Err(CommandError::MissingArgument {
                    usage: "private <receiver user name> <message>",
                });
            }
            Ok(Message::private_message(user_name, receiver, text))
        }
        "listall" => Ok(Message::list_all_users(user_name)),
        other => Err(CommandError::Unrecognized(other.to_string())),
    }
}

/// Applies one inbound message to a session.
///
/// Returns the next session and what to render. Unknown message types leave
/// the session as it was and render nothing.
pub fn dispatch(session: &Session, message: &Message) -> (Session, Option<ViewEffect>) {
    let sender = &message.sender_user_name;
    match message.message_type {
        MessageType::Login => {
            let next = if !session.user_name().is_empty() && sender == session.user_name() {
                Session::logged_in(sender.clone())
            } else {
                session.clone()
            };
            let effect = ViewEffect::UserLogin {
                user_name: sender.clone(),
            };
            (next, Some(effect))
        }
        MessageType::LoginFailed => (
            session.clone(),
            Some(ViewEffect::UserLoginFailed {
                text: message.text().to_string(),
            }),
        ),
        // Any logout notification ends the local login, whoever it names.
        MessageType::Logout => (
            session.logged_out(),
            Some(ViewEffect::UserLogout {
                user_name: sender.clone(),
            }),
        ),
        MessageType::LogoutFailed => (
            session.clone(),
            Some(ViewEffect::UserLogoutFailed {
                text: message.text().to_string(),
            }),
        ),
        MessageType::PublicMessage => (
            session.clone(),
            Some(ViewEffect::PublicMessage {
                sender: sender.clone(),
                text: message.text().to_string(),
            }),
        ),
        MessageType::PrivateMessage => (
            session.clone(),
            Some(ViewEffect::PrivateMessage {
                sender: sender.clone(),
                receiver: message.receiver().to_string(),
                text: message.text().to_string(),
                is_received: sender != session.user_name(),
            }),
        ),
        MessageType::ListAllUsers => (
            session.clone(),
            Some(ViewEffect::AllUsers {
                users: message.users().to_vec(),
            }),
        ),
        MessageType::Unknown => (session.clone(), None),
    }
}

/// Owns the session for one connection and mediates between the user, the
/// transport and the view.
///
/// Every entry point runs to completion; callers feed it one event at a time.
pub struct SessionEngine<T, V> {
    session: Session,
    transport: T,
    view: V,
    login_fallthrough: bool,
}

impl<T: Transport, V: View> SessionEngine<T, V> {
    pub fn new(transport: T, view: V) -> Self {
        Self {
            session: Session::new(),
            transport,
            view,
            login_fallthrough: false,
        }
    }

    /// When enabled, `login` while logged in also sends a `logout`, as older
    /// clients did.
    pub fn with_login_fallthrough(mut self, enabled: bool) -> Self {
        self.login_fallthrough = enabled;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_parts(self) -> (Session, T, V) {
        (self.session, self.transport, self.view)
    }

    /// Handles one line typed by the user.
    pub fn handle_user_query(&mut self, query: &str) {
        match parse_user_query(&self.session, query) {
            Ok(message) => {
                if message.message_type == MessageType::Login {
                    // Taken before the server confirms; the ack is matched against it.
                    self.session = Session::logging_in(message.sender_user_name.clone());
                }
                self.send(&message);
            }
            Err(CommandError::AlreadyLoggedIn) if self.login_fallthrough => {
                self.view.add_as_list_item(&CommandError::AlreadyLoggedIn.to_string());
                let logout = Message::logout(self.session.user_name());
                self.send(&logout);
            }
            Err(err) if err.is_rejection() => {
                debug!("Rejected command {:?}: {}", query, err);
                self.view.add_as_list_item(&err.to_string());
            }
            Err(err) => debug!("Ignoring input: {}", err),
        }
    }

    /// Handles one raw text frame from the server. Frames that do not decode
    /// are dropped.
    pub fn handle_frame(&mut self, frame: &str) {
        match Message::from_json(frame) {
            Ok(message) => self.handle_message_from_server(&message),
            Err(e) => warn!("Dropping frame {:?}: {}", frame, e),
        }
    }

    /// Handles one decoded message from the server.
    pub fn handle_message_from_server(&mut self, message: &Message) {
        debug!("Received {} from {:?}", message.message_type, message.sender_user_name);
        let (next, effect) = dispatch(&self.session, message);

        if next.is_logged_in() != self.session.is_logged_in() {
            info!(
                user = next.user_name(),
                logged_in = next.is_logged_in(),
                "Session state changed"
            );
        }
        self.session = next;

        match effect {
            Some(effect) => effect.render(&mut self.view),
            None => debug!("Ignoring message of unknown type"),
        }
    }

    fn send(&mut self, message: &Message) {
        match message.to_json() {
            Ok(text) => {
                debug!("Sending {} as {:?}", message.message_type, message.sender_user_name);
                self.transport.send(text);
            }
            Err(e) => warn!("Dropping outbound {}: {}", message.message_type, e),
        }
    }
}
