//! Fan-out of server messages to registered peers

use crate::registry::Registry;
use log::{error, warn};
use shared::ServerMessage;
use tokio_tungstenite::tungstenite::Message;

/// Sends `message` to every registered peer except `exclude`.
///
/// The registry lock is held for the whole pass. A peer whose write fails is
/// removed and evicted on the spot, before the next peer is tried; writes are
/// never retried. Returns how many peers the message was delivered to.
pub async fn broadcast(
    registry: &Registry,
    message: &ServerMessage,
    exclude: Option<&str>,
) -> usize {
    let frame = match message.to_json() {
        Ok(json) => Message::text(json),
        Err(e) => {
            error!("Failed to encode {} message: {}", message.kind(), e);
            return 0;
        }
    };

    let mut peers = registry.lock().await;

    // Iterate over a copy of the keys so failed peers can be removed mid-pass
    let targets: Vec<String> = peers
        .keys()
        .filter(|id| Some(id.as_str()) != exclude)
        .cloned()
        .collect();

    let mut delivered = 0;
    for id in targets {
        let Some(peer) = peers.get_mut(&id) else {
            continue;
        };

        match peer.send(frame.clone()).await {
            Ok(()) => delivered += 1,
            Err(e) => {
                warn!("Error sending {} to {}: {}", message.kind(), id, e);
                if let Some(peer) = peers.remove(&id) {
                    peer.evict().await;
                }
            }
        }
    }

    delivered
}
