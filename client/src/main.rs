use clap::Parser;
use client::game::World;
use client::input::{moves_within, InputManager};
use client::network::{self, NetworkEvent};
use client::rendering::{ConnectionStatus, Renderer, PLAYER_SIZE};
use log::{error, info, warn};
use macroquad::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// WebSocket URL of the relay
    #[arg(short = 's', long, default_value = "ws://127.0.0.1:8081/ws")]
    server: String,
}

#[macroquad::main("Position Relay")]
async fn main() {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting client...");
    info!("Connecting to: {}", args.server);
    info!("Controls: arrow keys or WASD to move");

    let network = match network::spawn(&args.server) {
        Ok(network) => network,
        Err(e) => {
            error!("Failed to start network thread: {}", e);
            return;
        }
    };

    let mut world = World::new();
    let mut input = InputManager::new();
    let mut renderer = Renderer::new();
    let mut status = ConnectionStatus::Connecting;

    loop {
        for event in network.poll() {
            match event {
                NetworkEvent::Connected => status = ConnectionStatus::Connected,
                NetworkEvent::Message(message) => world.apply(message),
                NetworkEvent::Disconnected(reason) => {
                    warn!("Disconnected: {}", reason);
                    world.clear();
                    status = ConnectionStatus::Disconnected(reason);
                }
            }
        }

        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        if status == ConnectionStatus::Connected {
            if let (Some(direction), Some(me)) = (input.update(), world.local_player()) {
                let max_x = (screen_width() - PLAYER_SIZE) as i32;
                let max_y = (screen_height() - PLAYER_SIZE) as i32;
                if moves_within(me, direction, max_x, max_y) {
                    network.send_move(direction);
                }
            }
        }

        renderer.render(&world, &status);
        next_frame().await;
    }
}
