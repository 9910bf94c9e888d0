//! Error type shared by the relay's networking and registry layers

use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("Failed to encode message: {0}")]
    Codec(#[from] serde_json::Error),

    /// Sending `setPlayerId` or `allplayers` to a freshly registered peer failed.
    /// The peer has already been removed from the registry when this is returned.
    #[error("Handshake with {id} failed: {source}")]
    Handshake {
        id: String,
        #[source]
        source: Box<RelayError>,
    },
}
