// tests/common/mod.rs
//
// A reference chat server and a channel-backed view for driving the client
// end to end.

#![allow(dead_code)]

use axum::{
    Router,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message as WsMessage, WebSocket},
    },
    response::IntoResponse,
    routing::get,
};
use chat_client::{ClientConfig, Message, MessageType, View};
use futures_util::{sink::SinkExt, stream::StreamExt};
use std::{collections::HashMap, net::SocketAddr, sync::Arc, time::Duration};
use tokio::sync::{Mutex, mpsc};

/// Logged-in users and the outbound queue of their connection.
type Users = Arc<Mutex<HashMap<String, mpsc::UnboundedSender<String>>>>;

#[derive(Clone)]
struct ServerState {
    users: Users,
    // Raw frames pushed to every new connection before anything else.
    greeting: Arc<Vec<String>>,
    // Every text frame received from any client, in arrival order.
    received: mpsc::UnboundedSender<String>,
}

/// Starts a chat server on an ephemeral port and returns its address.
pub async fn spawn_server(greeting: Vec<String>) -> SocketAddr {
    spawn_recording_server(greeting).await.0
}

/// Like [`spawn_server`], also returning the raw frames clients send.
pub async fn spawn_recording_server(
    greeting: Vec<String>,
) -> (SocketAddr, mpsc::UnboundedReceiver<String>) {
    let (received, frames) = mpsc::unbounded_channel();
    let state = ServerState {
        users: Arc::new(Mutex::new(HashMap::new())),
        greeting: Arc::new(greeting),
        received,
    };
    let app = Router::new()
        .route("/websocket", get(websocket_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, frames)
}

pub fn config_for(addr: SocketAddr) -> ClientConfig {
    ClientConfig {
        host: addr.to_string(),
        color: false,
        ..ClientConfig::default()
    }
}

async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<ServerState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: ServerState) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let write_task = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if sender.send(WsMessage::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    for frame in state.greeting.iter() {
        let _ = tx.send(frame.clone());
    }

    let mut user_name = None;
    while let Some(Ok(WsMessage::Text(text))) = receiver.next().await {
        let _ = state.received.send(text.as_str().to_owned());
        let Ok(msg) = Message::from_json(text.as_str()) else {
            continue;
        };
        route(&state.users, msg, &tx, &mut user_name).await;
    }

    if let Some(name) = user_name {
        state.users.lock().await.remove(&name);
    }
    write_task.abort();
}

/// Routes one client message the way the chat server does.
async fn route(
    users: &Users,
    msg: Message,
    connection: &mpsc::UnboundedSender<String>,
    user_name: &mut Option<String>,
) {
    let mut users = users.lock().await;
    let frame = msg.to_json().unwrap();

    match msg.message_type {
        MessageType::Login => {
            if users.contains_key(&msg.sender_user_name) {
                let failed = Message::login_failed("user name already taken");
                let _ = connection.send(failed.to_json().unwrap());
            } else {
                users.insert(msg.sender_user_name.clone(), connection.clone());
                *user_name = Some(msg.sender_user_name.clone());
                for user in users.values() {
                    let _ = user.send(frame.clone());
                }
            }
        }
        // Announced to the leaving user and everyone still logged in.
        MessageType::Logout => {
            users.remove(&msg.sender_user_name);
            *user_name = None;
            let _ = connection.send(frame.clone());
            for user in users.values() {
                let _ = user.send(frame.clone());
            }
        }
        MessageType::PublicMessage => {
            for user in users.values() {
                let _ = user.send(frame.clone());
            }
        }
        MessageType::PrivateMessage => {
            if let Some(receiver) = users.get(msg.receiver()) {
                let _ = receiver.send(frame.clone());
                let _ = connection.send(frame);
            }
        }
        MessageType::ListAllUsers => {
            let mut names: Vec<String> = users.keys().cloned().collect();
            names.sort();
            let _ = connection.send(Message::user_list(names).to_json().unwrap());
        }
        _ => {}
    }
}

/// Forwards every render call as a line of text.
pub struct ChannelView(mpsc::UnboundedSender<String>);

impl ChannelView {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(tx), rx)
    }

    fn push(&self, line: String) {
        let _ = self.0.send(line);
    }
}

impl View for ChannelView {
    fn render_user_login(&mut self, user_name: &str) {
        self.push(format!("joined {user_name}"));
    }
    fn render_user_login_failed(&mut self, text: &str) {
        self.push(format!("login failed: {text}"));
    }
    fn render_user_logout(&mut self, user_name: &str) {
        self.push(format!("left {user_name}"));
    }
    fn render_user_logout_failed(&mut self, text: &str) {
        self.push(format!("logout failed: {text}"));
    }
    fn render_public_message(&mut self, sender: &str, text: &str) {
        self.push(format!("{sender}: {text}"));
    }
    fn render_private_message(&mut self, sender: &str, receiver: &str, text: &str, is_received: bool) {
        if is_received {
            self.push(format!("private from {sender}: {text}"));
        } else {
            self.push(format!("private to {receiver}: {text}"));
        }
    }
    fn render_all_users(&mut self, users: &[String]) {
        self.push(format!("users: {}", users.join(", ")));
    }
    fn add_as_list_item(&mut self, text: &str) {
        self.push(text.to_string());
    }
}

/// Next rendered line, failing the test if none arrives in time.
pub async fn next_line(lines: &mut mpsc::UnboundedReceiver<String>) -> String {
    tokio::time::timeout(Duration::from_secs(5), lines.recv())
        .await
        .expect("timed out waiting for the view")
        .expect("view channel closed")
}
