//! # Position Relay Server Library
//!
//! This library implements a small real-time relay for multiplayer positions.
//! Clients connect over WebSocket, receive an identity and the current roster,
//! and then send directional moves that the server applies and rebroadcasts to
//! everyone who is connected.
//!
//! ## Core Responsibilities
//!
//! ### Peer Registry
//! A single table of connected peers keyed by id, holding each peer's position
//! and the sink used to write to it. The table is owned by an `Arc<Registry>`
//! handed to every connection task; nothing is global.
//!
//! ### Broadcasting
//! Messages are fanned out to some or all peers while the registry lock is
//! held. A peer whose write fails is removed in the same pass, so the
//! registry never keeps a peer it already knows to be unreachable.
//!
//! ### Connection Handling
//! Each client runs in its own tokio task:
//! - Upgrade on the configured path (`/ws` by default)
//! - Handshake: `setPlayerId` and `allplayers` to the newcomer, `newplayer` to
//!   everyone else
//! - Receive loop: `move` commands shift the peer by 10 units and trigger a
//!   `playerMoved` broadcast
//! - Cleanup: deregister and broadcast `playerLeft`
//!
//! ## Architecture Design
//!
//! ### One Task Per Connection
//! Connections are independent tasks on the multi-threaded runtime. The only
//! point of contention is the registry mutex; outbound writes happen while it
//! is held, which serializes every registry access. A slow client therefore
//! slows down everyone, which is acceptable at the scale this relay targets.
//!
//! ### Message Typing
//! Inbound frames are parsed into [`shared::ClientMessage`]; anything that does
//! not parse is dropped without a reply. Outbound messages are
//! [`shared::ServerMessage`] variants encoded as JSON text frames.
//!
//! ## Module Organization
//!
//! - `registry`: peer table, id allocation, handshake delivery
//! - `broadcast`: fan-out with inline pruning of failed peers
//! - `connection`: per-connection state machine
//! - `network`: listener and accept loop
//! - `error`: the crate's error type
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::RelayServer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = RelayServer::bind("0.0.0.0:8081", "/ws").await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod broadcast;
pub mod connection;
pub mod error;
pub mod network;
pub mod registry;

#[cfg(test)]
mod test_support;
