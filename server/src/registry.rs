//! Connected-peer registry for the relay
//!
//! The registry is the only shared state in the server. It maps peer ids to
//! their public position and the sink used to write to their WebSocket.
//! Every access goes through a single async mutex, including the writes the
//! broadcast engine performs while iterating, so no caller ever observes a
//! half-updated roster.
//!
//! Invariant: an id present in the map has a sink that has not failed yet.
//! Whoever sees a write fail removes the entry before releasing the lock.

use crate::error::RelayError;
use futures::{Sink, SinkExt};
use log::debug;
use shared::{player_id, spawn_coordinate, Direction, PlayerInfo, ServerMessage};
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{oneshot, Mutex, MutexGuard};
use tokio_tungstenite::tungstenite::{self, Message};

/// Outbound half of a peer's channel
pub type PeerSink = Pin<Box<dyn Sink<Message, Error = tungstenite::Error> + Send>>;

/// Server-side state of one connected client
pub struct Peer {
    pub info: PlayerInfo,
    sink: PeerSink,
    /// Dropped together with the peer; wakes the owning handler.
    eviction: oneshot::Sender<()>,
}

impl Peer {
    /// Creates a peer and the receiver its handler waits on to learn that
    /// the peer was removed from the registry by someone else.
    pub fn new(info: PlayerInfo, sink: PeerSink) -> (Self, oneshot::Receiver<()>) {
        let (eviction, evicted) = oneshot::channel();
        (
            Self {
                info,
                sink,
                eviction,
            },
            evicted,
        )
    }

    pub(crate) async fn send(&mut self, message: Message) -> Result<(), tungstenite::Error> {
        self.sink.send(message).await
    }

    pub(crate) async fn close(&mut self) {
        if let Err(e) = self.sink.close().await {
            debug!("Closing channel of {} failed: {}", self.info.id, e);
        }
    }

    /// Closes the sink and notifies the owning handler.
    pub(crate) async fn evict(mut self) {
        self.close().await;
        let _ = self.eviction.send(());
    }
}

/// Result of a successful [`Registry::join`]
pub struct Membership {
    pub info: PlayerInfo,
    /// Resolves once the peer is no longer registered.
    pub evicted: oneshot::Receiver<()>,
}

pub(crate) type PeerMap = HashMap<String, Peer>;

pub struct Registry {
    peers: Mutex<PeerMap>,
    next_sequence: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            peers: Mutex::new(HashMap::new()),
            next_sequence: AtomicU64::new(1),
        }
    }

    /// Allocates a fresh peer id. Ids are never handed out twice, no matter
    /// how many peers have come and gone.
    pub fn next_id(&self) -> String {
        player_id(self.next_sequence.fetch_add(1, Ordering::Relaxed))
    }

    pub async fn register(&self, peer: Peer) {
        let mut peers = self.peers.lock().await;
        peers.insert(peer.info.id.clone(), peer);
    }

    /// Removes a peer. Returns false if it was already gone.
    pub async fn deregister(&self, id: &str) -> bool {
        self.remove(id).await.is_some()
    }

    /// Removes a peer and hands it back so its channel can be closed
    /// after the lock is released.
    pub(crate) async fn remove(&self, id: &str) -> Option<Peer> {
        self.peers.lock().await.remove(id)
    }

    /// Copies the public fields of every registered peer. Order is unspecified.
    pub async fn snapshot(&self) -> Vec<PlayerInfo> {
        let peers = self.peers.lock().await;
        peers.values().map(|peer| peer.info.clone()).collect()
    }

    /// Moves a peer one step and returns its new position, or None if the
    /// peer is no longer registered.
    pub async fn apply_move(&self, id: &str, direction: Direction) -> Option<PlayerInfo> {
        let mut peers = self.peers.lock().await;
        let peer = peers.get_mut(id)?;
        peer.info.step(direction);
        Some(peer.info.clone())
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.peers.lock().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.peers.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.peers.lock().await.is_empty()
    }

    /// Registers a new peer and sends it `setPlayerId` followed by `allplayers`.
    ///
    /// Both messages are written before the lock is released, so no broadcast
    /// can reach the new peer ahead of them. The roster includes the new peer.
    /// If either write fails the peer is removed again and
    /// [`RelayError::Handshake`] carries the id that was assigned.
    pub async fn join(&self, sink: PeerSink) -> Result<Membership, RelayError> {
        let mut peers = self.peers.lock().await;

        let id = self.next_id();
        let spawn = spawn_coordinate(peers.len());
        let info = PlayerInfo::new(id.clone(), spawn, spawn);
        let (peer, evicted) = Peer::new(info.clone(), sink);
        peers.insert(id.clone(), peer);

        if let Err(source) = Self::greet(&mut peers, &id).await {
            peers.remove(&id);
            return Err(RelayError::Handshake {
                id,
                source: Box::new(source),
            });
        }

        Ok(Membership { info, evicted })
    }

    async fn greet(peers: &mut PeerMap, id: &str) -> Result<(), RelayError> {
        let welcome = match peers.get(id) {
            Some(peer) => ServerMessage::SetPlayerId(peer.info.clone()).to_json()?,
            None => return Ok(()),
        };
        let roster = ServerMessage::AllPlayers {
            players: peers.values().map(|peer| peer.info.clone()).collect(),
        }
        .to_json()?;

        if let Some(peer) = peers.get_mut(id) {
            peer.send(Message::text(welcome)).await?;
            peer.send(Message::text(roster)).await?;
        }
        Ok(())
    }

    /// Locks the peer map for the broadcast engine.
    pub(crate) async fn lock(&self) -> MutexGuard<'_, PeerMap> {
        self.peers.lock().await
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
