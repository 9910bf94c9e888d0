//! Client-side mirror of the relay's roster

use log::debug;
use shared::{PlayerInfo, ServerMessage};
use std::collections::BTreeMap;

/// Everything the client knows about connected peers
#[derive(Debug, Default)]
pub struct World {
    local_id: Option<String>,
    players: BTreeMap<String, PlayerInfo>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one server message to the local roster.
    pub fn apply(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::SetPlayerId(me) => {
                self.local_id = Some(me.id.clone());
                self.spawn(me);
            }
            ServerMessage::AllPlayers { players } => {
                for player in players {
                    self.spawn(player);
                }
            }
            ServerMessage::NewPlayer(player) => self.spawn(player),
            ServerMessage::PlayerMoved(player) => {
                self.players.insert(player.id.clone(), player);
            }
            ServerMessage::PlayerLeft { id } => {
                if self.players.remove(&id).is_none() {
                    debug!("Unknown player left: {}", id);
                }
            }
        }
    }

    /// Adds a player unless it is already known.
    fn spawn(&mut self, player: PlayerInfo) {
        self.players.entry(player.id.clone()).or_insert(player);
    }

    pub fn local_id(&self) -> Option<&str> {
        self.local_id.as_deref()
    }

    pub fn local_player(&self) -> Option<&PlayerInfo> {
        self.local_id.as_ref().and_then(|id| self.players.get(id))
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerInfo> {
        self.players.values()
    }

    pub fn get(&self, id: &str) -> Option<&PlayerInfo> {
        self.players.get(id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Forgets everything, e.g. after losing the connection.
    pub fn clear(&mut self) {
        self.local_id = None;
        self.players.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: &str, x: i32, y: i32) -> PlayerInfo {
        PlayerInfo::new(id, x, y)
    }

    #[test]
    fn test_world_creation() {
        let world = World::new();
        assert!(world.is_empty());
        assert_eq!(world.local_id(), None);
        assert!(world.local_player().is_none());
    }

    #[test]
    fn test_handshake_populates_roster() {
        let mut world = World::new();

        world.apply(ServerMessage::SetPlayerId(info("player-2", 150, 150)));
        world.apply(ServerMessage::AllPlayers {
            players: vec![info("player-1", 100, 100), info("player-2", 150, 150)],
        });

        assert_eq!(world.local_id(), Some("player-2"));
        assert_eq!(world.local_player(), Some(&info("player-2", 150, 150)));
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn test_duplicate_spawns_ignored() {
        let mut world = World::new();
        world.apply(ServerMessage::NewPlayer(info("player-3", 200, 200)));
        world.apply(ServerMessage::NewPlayer(info("player-3", 0, 0)));

        assert_eq!(world.len(), 1);
        assert_eq!(world.get("player-3"), Some(&info("player-3", 200, 200)));
    }

    #[test]
    fn test_player_moved_updates_position() {
        let mut world = World::new();
        world.apply(ServerMessage::NewPlayer(info("player-1", 100, 100)));
        world.apply(ServerMessage::PlayerMoved(info("player-1", 100, 90)));

        assert_eq!(world.get("player-1"), Some(&info("player-1", 100, 90)));
    }

    #[test]
    fn test_player_moved_spawns_unknown_player() {
        let mut world = World::new();
        world.apply(ServerMessage::PlayerMoved(info("player-4", 60, 70)));
        assert_eq!(world.get("player-4"), Some(&info("player-4", 60, 70)));
    }

    #[test]
    fn test_player_left_removes() {
        let mut world = World::new();
        world.apply(ServerMessage::NewPlayer(info("player-1", 100, 100)));
        world.apply(ServerMessage::NewPlayer(info("player-2", 150, 150)));

        world.apply(ServerMessage::PlayerLeft {
            id: "player-1".to_string(),
        });
        world.apply(ServerMessage::PlayerLeft {
            id: "player-9".to_string(),
        });

        let ids: Vec<&str> = world.players().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["player-2"]);
    }

    #[test]
    fn test_clear() {
        let mut world = World::new();
        world.apply(ServerMessage::SetPlayerId(info("player-1", 100, 100)));
        world.clear();

        assert!(world.is_empty());
        assert_eq!(world.local_id(), None);
    }
}
