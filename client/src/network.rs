//! Background WebSocket connection for the render loop
//!
//! macroquad owns the main thread, so the connection runs on a dedicated
//! thread with its own tokio runtime. The two sides talk through channels:
//! moves go out over an unbounded tokio channel, server events come back
//! over a std channel the render loop drains once per frame.

use futures::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use shared::{ClientMessage, Direction, ServerMessage};
use std::sync::mpsc as std_mpsc;
use std::thread;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkEvent {
    Connected,
    Message(ServerMessage),
    Disconnected(String),
}

/// Render-loop side of the connection
pub struct NetworkHandle {
    commands: mpsc::UnboundedSender<Direction>,
    events: std_mpsc::Receiver<NetworkEvent>,
}

impl NetworkHandle {
    /// Queues a move. Returns false once the connection is gone.
    pub fn send_move(&self, direction: Direction) -> bool {
        self.commands.send(direction).is_ok()
    }

    /// Drains every event received since the last call.
    pub fn poll(&self) -> Vec<NetworkEvent> {
        self.events.try_iter().collect()
    }
}

/// Starts the connection thread. Dropping the handle closes the connection.
pub fn spawn(url: &str) -> std::io::Result<NetworkHandle> {
    let (commands, command_rx) = mpsc::unbounded_channel();
    let (event_tx, events) = std_mpsc::channel();
    let url = url.to_string();

    thread::Builder::new()
        .name("network".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!("Failed to start network runtime: {}", e);
                    let _ = event_tx.send(NetworkEvent::Disconnected(e.to_string()));
                    return;
                }
            };
            runtime.block_on(run_connection(url, command_rx, event_tx));
        })?;

    Ok(NetworkHandle { commands, events })
}

/// Connects to `url` and shuttles messages until either side goes away.
pub async fn run_connection(
    url: String,
    mut commands: mpsc::UnboundedReceiver<Direction>,
    events: std_mpsc::Sender<NetworkEvent>,
) {
    let (websocket, _) = match connect_async(url.as_str()).await {
        Ok(connection) => connection,
        Err(e) => {
            error!("Failed to connect to {}: {}", url, e);
            let _ = events.send(NetworkEvent::Disconnected(e.to_string()));
            return;
        }
    };
    info!("Connected to {}", url);
    let _ = events.send(NetworkEvent::Connected);

    let (mut sink, mut stream) = websocket.split();

    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => match ServerMessage::from_json(text.as_str()) {
                    Ok(message) => {
                        if events.send(NetworkEvent::Message(message)).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("Unrecognized server message: {}", e),
                },
                Some(Ok(Message::Close(_))) | None => {
                    let reason = "Connection closed".to_string();
                    let _ = events.send(NetworkEvent::Disconnected(reason));
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    error!("Error receiving message: {}", e);
                    let _ = events.send(NetworkEvent::Disconnected(e.to_string()));
                    break;
                }
            },
            command = commands.recv() => match command {
                Some(direction) => {
                    let text = match (ClientMessage::Move { direction }).to_json() {
                        Ok(text) => text,
                        Err(e) => {
                            error!("Failed to encode move: {}", e);
                            continue;
                        }
                    };
                    debug!("Sending move {:?}", direction);
                    if let Err(e) = sink.send(Message::text(text)).await {
                        error!("Error sending move: {}", e);
                        let _ = events.send(NetworkEvent::Disconnected(e.to_string()));
                        break;
                    }
                }
                None => {
                    let _ = sink.close().await;
                    break;
                }
            },
        }
    }
}
