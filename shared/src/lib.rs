use serde::{de, Deserialize, Serialize};

pub const SPAWN_ORIGIN: i32 = 100;
pub const SPAWN_SPACING: i32 = 50;
pub const MOVE_STEP: i32 = 10;

pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_PATH: &str = "/ws";

/// Prefix of every server-assigned peer id, followed by the sequence number.
pub const PLAYER_ID_PREFIX: &str = "player-";

pub fn player_id(sequence: u64) -> String {
    format!("{}{}", PLAYER_ID_PREFIX, sequence)
}

/// Spawn coordinate for a peer that joins while `occupancy` peers are registered.
pub fn spawn_coordinate(occupancy: usize) -> i32 {
    SPAWN_ORIGIN + SPAWN_SPACING * occupancy as i32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Coordinate delta for one step. Screen coordinates: "up" decreases y.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Left => (-MOVE_STEP, 0),
            Direction::Right => (MOVE_STEP, 0),
            Direction::Up => (0, -MOVE_STEP),
            Direction::Down => (0, MOVE_STEP),
        }
    }
}

/// Public part of a peer: what other clients get to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: String,
    pub x: i32,
    pub y: i32,
}

impl PlayerInfo {
    pub fn new(id: impl Into<String>, x: i32, y: i32) -> Self {
        Self { id: id.into(), x, y }
    }

    pub fn step(&mut self, direction: Direction) {
        let (dx, dy) = direction.offset();
        self.x += dx;
        self.y += dy;
    }
}

/// Messages sent from the relay to clients.
///
/// The `type` tag and field names are read by clients verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "setPlayerId")]
    SetPlayerId(PlayerInfo),
    #[serde(rename = "allplayers")]
    AllPlayers { players: Vec<PlayerInfo> },
    #[serde(rename = "newplayer")]
    NewPlayer(PlayerInfo),
    #[serde(rename = "playerMoved")]
    PlayerMoved(PlayerInfo),
    #[serde(rename = "playerLeft")]
    PlayerLeft { id: String },
}

impl ServerMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::SetPlayerId(_) => "setPlayerId",
            ServerMessage::AllPlayers { .. } => "allplayers",
            ServerMessage::NewPlayer(_) => "newplayer",
            ServerMessage::PlayerMoved(_) => "playerMoved",
            ServerMessage::PlayerLeft { .. } => "playerLeft",
        }
    }
}

/// Commands sent from clients to the relay.
///
/// Anything that does not parse into one of these is dropped by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Move { direction: Direction },
}

impl ClientMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses a command. Only JSON objects are accepted, never arrays.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(de::Error::custom("command must be a JSON object"));
        }
        serde_json::from_value(value)
    }
}
