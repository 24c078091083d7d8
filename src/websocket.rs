// src/websocket.rs

use crate::{config::ClientConfig, engine::SessionEngine, error::ChatError, state::Session, view::View};
use futures_util::{
    sink::SinkExt,
    stream::{SplitStream, StreamExt},
};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tracing::{debug, info, trace, warn};

// The read half of a client connection to the chat server.
type ServerStream = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Outbound half of the connection as the session engine sees it.
///
/// Sending is fire-and-forget: a dead connection swallows the text.
pub trait Transport {
    fn send(&mut self, text: String);
}

/// Feeds text frames to the connection's writer task.
#[derive(Clone, Debug)]
pub struct OutboundSender(mpsc::UnboundedSender<String>);

impl Transport for OutboundSender {
    fn send(&mut self, text: String) {
        if self.0.send(text).is_err() {
            debug!("Connection writer is gone, dropping outbound frame");
        }
    }
}

/// Runs one chat session against the server named by `config`.
///
/// User input arrives on `queries`, one line per item. The session ends when
/// `queries` is closed or the server goes away; queued frames are flushed and
/// the socket closed before the final session is returned.
pub async fn run_session<V: View>(
    config: &ClientConfig,
    view: V,
    mut queries: mpsc::Receiver<String>,
) -> Result<Session, ChatError> {
    let url = config.endpoint();
    info!("Connecting to {}", url);
    let (socket, _response) = connect_async(url.as_str())
        .await
        .map_err(|source| ChatError::Connect {
            url: url.clone(),
            source,
        })?;
    info!("Connected to {}", url);

    let (mut sink, stream) = socket.split();

    // Writer task: everything the engine sends goes through this channel.
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();
    let write_task = tokio::spawn(async move {
        while let Some(text) = outbound_rx.recv().await {
            if let Err(e) = sink.send(Message::Text(text.into())).await {
                warn!("Failed to send frame to server: {}", e);
                return;
            }
        }
        if let Err(e) = sink.close().await {
            debug!("Error closing connection: {}", e);
        }
    });

    // Reader task: inbound text frames are queued for the engine in arrival order.
    let (frame_tx, mut frame_rx) = mpsc::unbounded_channel::<String>();
    let read_task = tokio::spawn(read_from_server(stream, frame_tx));

    let mut engine = SessionEngine::new(OutboundSender(outbound_tx), view)
        .with_login_fallthrough(config.login_fallthrough);

    // The engine is only touched from this loop, one event at a time.
    loop {
        tokio::select! {
            query = queries.recv() => match query {
                Some(query) => engine.handle_user_query(&query),
                None => {
                    debug!("User input closed");
                    break;
                }
            },
            frame = frame_rx.recv() => match frame {
                Some(frame) => engine.handle_frame(&frame),
                None => {
                    info!("Connection closed by server");
                    break;
                }
            },
        }
    }

    // Dropping the transport lets the writer drain its queue and close the socket.
    let (session, transport, _view) = engine.into_parts();
    drop(transport);
    if let Err(e) = write_task.await {
        warn!("Writer task failed: {}", e);
    }
    read_task.abort();

    info!("Disconnected from {}", url);
    Ok(session)
}

/// Forwards text frames from the server until it closes or errors.
async fn read_from_server(mut stream: ServerStream, frames: mpsc::UnboundedSender<String>) {
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                trace!("Received frame: {}", text.as_str());
                if frames.send(text.as_str().to_owned()).is_err() {
                    break;
                }
            }
            Ok(Message::Close(frame)) => {
                debug!("Server sent close: {:?}", frame);
                break;
            }
            Ok(_) => {
                // Binary, ping and pong frames carry no protocol messages.
            }
            Err(e) => {
                warn!("Error reading from server: {}", e);
                break;
            }
        }
    }
}
