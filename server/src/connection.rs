//! Per-connection handler: handshake, receive loop and cleanup
//!
//! Each accepted socket gets its own task running [`handle_connection`]. The
//! handler walks a small state machine:
//!
//! - **Connecting**: the HTTP upgrade is checked against the configured path.
//!   A failed upgrade leaves no trace in the registry.
//! - **Active**: the peer is registered, greeted and announced to everyone
//!   else. Inbound frames are then processed strictly in arrival order.
//! - **Closed**: the peer is deregistered and `playerLeft` is broadcast. This
//!   runs exactly once for every peer that made it into the registry, whether
//!   the socket closed, a read failed, the handshake could not be delivered,
//!   or the broadcast engine pruned the peer after a failed write.

use crate::broadcast::broadcast;
use crate::error::RelayError;
use crate::registry::{Membership, PeerSink, Registry};
use futures::{Stream, StreamExt};
use log::{debug, info, warn};
use shared::{ClientMessage, ServerMessage};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::WebSocketStream;

/// Upgrades an accepted socket, refusing requests for any other path with 404.
pub async fn accept_upgrade(
    stream: TcpStream,
    path: &str,
) -> Result<WebSocketStream<TcpStream>, RelayError> {
    let expected = path.to_owned();
    let check_path =
        move |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
            if request.uri().path() == expected {
                return Ok(response);
            }
            let mut rejection =
                ErrorResponse::new(Some(format!("No endpoint at {}", request.uri().path())));
            *rejection.status_mut() = StatusCode::NOT_FOUND;
            Err(rejection)
        };

    Ok(tokio_tungstenite::accept_hdr_async(stream, check_path).await?)
}

/// Runs one client connection from upgrade to cleanup.
pub async fn handle_connection(
    registry: Arc<Registry>,
    stream: TcpStream,
    addr: SocketAddr,
    path: Arc<str>,
) {
    let websocket = match accept_upgrade(stream, &path).await {
        Ok(websocket) => websocket,
        Err(e) => {
            warn!("WebSocket upgrade with {} failed: {}", addr, e);
            return;
        }
    };
    debug!("WebSocket connection established with {}", addr);

    let (sink, inbound) = websocket.split();
    run_peer(registry, Box::pin(sink), inbound).await;
}

/// Drives an upgraded channel: join, announce, read until closed, leave.
pub async fn run_peer<S>(registry: Arc<Registry>, sink: PeerSink, mut inbound: S)
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    let Membership { info, mut evicted } = match registry.join(sink).await {
        Ok(membership) => membership,
        Err(RelayError::Handshake { id, source }) => {
            warn!("Error greeting {}: {}", id, source);
            depart(&registry, &id).await;
            return;
        }
        Err(e) => {
            warn!("Error registering peer: {}", e);
            return;
        }
    };

    let id = info.id.clone();
    info!("New player connected: {} at ({}, {})", id, info.x, info.y);
    broadcast(&registry, &ServerMessage::NewPlayer(info), Some(&id)).await;

    loop {
        tokio::select! {
            frame = inbound.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    handle_text(&registry, &id, text.as_str()).await;
                }
                Some(Ok(Message::Close(_))) | None => {
                    debug!("{} closed the connection", id);
                    break;
                }
                Some(Ok(other)) => {
                    debug!("Ignoring non-text frame from {}: {:?}", id, other);
                }
                Some(Err(e)) => {
                    info!("Error reading from {}: {}", id, e);
                    break;
                }
            },
            _ = &mut evicted => {
                warn!("{} was dropped after a failed write", id);
                break;
            }
        }
    }

    depart(&registry, &id).await;
}

async fn handle_text(registry: &Registry, id: &str, text: &str) {
    let command = match ClientMessage::from_json(text) {
        Ok(command) => command,
        Err(e) => {
            debug!("Ignoring message from {}: {}", id, e);
            return;
        }
    };

    match command {
        ClientMessage::Move { direction } => {
            if let Some(position) = registry.apply_move(id, direction).await {
                broadcast(registry, &ServerMessage::PlayerMoved(position), None).await;
            }
        }
    }
}

async fn depart(registry: &Registry, id: &str) {
    if let Some(mut peer) = registry.remove(id).await {
        peer.close().await;
    }
    let left = ServerMessage::PlayerLeft { id: id.to_string() };
    broadcast(registry, &left, None).await;
    info!("Player disconnected: {}", id);
}
