//! Keyboard sampling and move throttling

use macroquad::prelude::*;
use shared::{Direction, PlayerInfo};
use std::time::{Duration, Instant};

/// Minimum time between two moves while a key is held
pub const MOVE_REPEAT: Duration = Duration::from_millis(100);

/// Turns held movement keys into a throttled stream of directions
pub struct InputManager {
    repeat: Duration,
    last_sent: Option<Instant>,
}

impl InputManager {
    pub fn new() -> Self {
        Self::with_repeat(MOVE_REPEAT)
    }

    pub fn with_repeat(repeat: Duration) -> Self {
        Self {
            repeat,
            last_sent: None,
        }
    }

    /// Samples the keyboard and returns a direction if a move is due this frame.
    pub fn update(&mut self) -> Option<Direction> {
        self.throttle(Self::held_direction(), Instant::now())
    }

    // Arrow keys and WASD; first match wins when several are held
    fn held_direction() -> Option<Direction> {
        if is_key_down(KeyCode::Left) || is_key_down(KeyCode::A) {
            Some(Direction::Left)
        } else if is_key_down(KeyCode::Right) || is_key_down(KeyCode::D) {
            Some(Direction::Right)
        } else if is_key_down(KeyCode::Up) || is_key_down(KeyCode::W) {
            Some(Direction::Up)
        } else if is_key_down(KeyCode::Down) || is_key_down(KeyCode::S) {
            Some(Direction::Down)
        } else {
            None
        }
    }

    /// A fresh key press moves immediately; holding it repeats every `repeat`.
    pub fn throttle(&mut self, held: Option<Direction>, now: Instant) -> Option<Direction> {
        let Some(direction) = held else {
            self.last_sent = None;
            return None;
        };

        let due = match self.last_sent {
            Some(last) => now.duration_since(last) >= self.repeat,
            None => true,
        };

        if due {
            self.last_sent = Some(now);
            Some(direction)
        } else {
            None
        }
    }
}

/// Whether stepping `player` in `direction` changes its position once the
/// result is clamped to `0..=max_x` and `0..=max_y`.
///
/// Moves that would only push the avatar against an edge are not worth
/// sending to the relay.
pub fn moves_within(player: &PlayerInfo, direction: Direction, max_x: i32, max_y: i32) -> bool {
    let (dx, dy) = direction.offset();
    let x = (player.x + dx).clamp(0, max_x.max(0));
    let y = (player.y + dy).clamp(0, max_y.max(0));
    x != player.x || y != player.y
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_manager_creation() {
        let input_manager = InputManager::new();
        assert_eq!(input_manager.repeat, MOVE_REPEAT);
        assert!(input_manager.last_sent.is_none());
    }

    #[test]
    fn test_first_press_moves_immediately() {
        let mut input = InputManager::new();
        let now = Instant::now();
        assert_eq!(input.throttle(Some(Direction::Left), now), Some(Direction::Left));
    }

    #[test]
    fn test_held_key_repeats_after_interval() {
        let mut input = InputManager::with_repeat(Duration::from_millis(100));
        let start = Instant::now();

        assert_eq!(input.throttle(Some(Direction::Up), start), Some(Direction::Up));
        assert_eq!(
            input.throttle(Some(Direction::Up), start + Duration::from_millis(50)),
            None
        );
        assert_eq!(
            input.throttle(Some(Direction::Up), start + Duration::from_millis(100)),
            Some(Direction::Up)
        );
    }

    #[test]
    fn test_release_resets_throttle() {
        let mut input = InputManager::with_repeat(Duration::from_millis(100));
        let start = Instant::now();

        assert!(input.throttle(Some(Direction::Down), start).is_some());
        assert!(input
            .throttle(None, start + Duration::from_millis(10))
            .is_none());
        assert_eq!(
            input.throttle(Some(Direction::Right), start + Duration::from_millis(20)),
            Some(Direction::Right)
        );
    }

    #[test]
    fn test_move_inside_area_allowed() {
        let player = PlayerInfo::new("player-1", 100, 100);
        for direction in Direction::ALL {
            assert!(moves_within(&player, direction, 768, 568));
        }
    }

    #[test]
    fn test_move_past_edges_blocked() {
        let top_left = PlayerInfo::new("player-1", 0, 0);
        assert!(!moves_within(&top_left, Direction::Left, 768, 568));
        assert!(!moves_within(&top_left, Direction::Up, 768, 568));
        assert!(moves_within(&top_left, Direction::Right, 768, 568));
        assert!(moves_within(&top_left, Direction::Down, 768, 568));

        let bottom_right = PlayerInfo::new("player-1", 768, 568);
        assert!(!moves_within(&bottom_right, Direction::Right, 768, 568));
        assert!(!moves_within(&bottom_right, Direction::Down, 768, 568));
        assert!(moves_within(&bottom_right, Direction::Left, 768, 568));
    }

    #[test]
    fn test_partial_step_toward_edge_allowed() {
        // A step that would overshoot still moves the avatar up to the edge
        let near_edge = PlayerInfo::new("player-1", 4, 300);
        assert!(moves_within(&near_edge, Direction::Left, 768, 568));
    }

    #[test]
    fn test_out_of_bounds_player_can_move_back() {
        // The window may shrink under a player the server placed further out
        let outside = PlayerInfo::new("player-3", 900, 100);
        assert!(moves_within(&outside, Direction::Left, 768, 568));
    }

    #[test]
    fn test_no_key_no_move() {
        let mut input = InputManager::new();
        assert_eq!(input.throttle(None, Instant::now()), None);
    }
}
