use crate::game::World;
use macroquad::prelude::*;
use shared::PlayerInfo;

pub const PLAYER_SIZE: f32 = 32.0;

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected(String),
}

pub struct Renderer {
    background: Color,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            background: Color::from_rgba(26, 26, 26, 255),
        }
    }

    pub fn render(&mut self, world: &World, status: &ConnectionStatus) {
        clear_background(self.background);

        let local_id = world.local_id();
        for player in world.players() {
            let is_local_player = Some(player.id.as_str()) == local_id;
            let color = if is_local_player {
                GREEN
            } else {
                Color::from_rgba(255, 68, 68, 255)
            };

            self.draw_player(player, color);
            self.draw_player_id(player);
        }

        self.draw_ui(world, status);
    }

    fn draw_player(&mut self, player: &PlayerInfo, color: Color) {
        let (x, y) = (player.x as f32, player.y as f32);
        draw_rectangle(x, y, PLAYER_SIZE, PLAYER_SIZE, color);
        draw_rectangle_lines(x, y, PLAYER_SIZE, PLAYER_SIZE, 2.0, WHITE);
    }

    fn draw_player_id(&mut self, player: &PlayerInfo) {
        draw_text(&player.id, player.x as f32, player.y as f32 - 6.0, 14.0, WHITE);
    }

    fn draw_ui(&mut self, world: &World, status: &ConnectionStatus) {
        let (label, color) = match status {
            ConnectionStatus::Connecting => ("Connecting...".to_string(), YELLOW),
            ConnectionStatus::Connected => ("Connected".to_string(), GREEN),
            ConnectionStatus::Disconnected(reason) => (format!("Disconnected: {}", reason), RED),
        };
        draw_rectangle(10.0, 10.0, 8.0, 8.0, color);
        draw_text(&label, 24.0, 18.0, 16.0, WHITE);

        let player_text = format!("{} players", world.len());
        draw_text(&player_text, 10.0, 36.0, 16.0, WHITE);

        if let Some(me) = world.local_player() {
            let position = format!("{} at ({}, {})", me.id, me.x, me.y);
            draw_text(&position, 10.0, 54.0, 16.0, WHITE);
        }

        draw_text(
            "Arrows/WASD to move, Esc to quit",
            10.0,
            screen_height() - 10.0,
            14.0,
            Color::from_rgba(136, 136, 136, 255),
        );
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
