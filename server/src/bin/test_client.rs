//! Headless bot that joins the relay, wanders around and leaves

use clap::Parser;
use futures::{SinkExt, StreamExt};
use log::{error, info, warn};
use rand::seq::SliceRandom;
use shared::{ClientMessage, Direction, ServerMessage};
use std::time::Duration;
use tokio::time::sleep;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// WebSocket URL of the relay
    #[arg(short, long, default_value = "ws://127.0.0.1:8081/ws")]
    server: String,

    /// Number of random moves to send before leaving
    #[arg(short, long, default_value_t = 20)]
    moves: u32,

    /// Delay between moves in milliseconds
    #[arg(short, long, default_value_t = 250)]
    delay_ms: u64,
}

fn random_direction() -> Direction {
    *Direction::ALL
        .choose(&mut rand::thread_rng())
        .unwrap_or(&Direction::Up)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let (websocket, _) = connect_async(args.server.as_str()).await?;
    info!("Connected to {}", args.server);

    let (mut sink, mut stream) = websocket.split();

    let reader = tokio::spawn(async move {
        while let Some(frame) = stream.next().await {
            match frame {
                Ok(Message::Text(text)) => match ServerMessage::from_json(text.as_str()) {
                    Ok(message) => info!("Received: {:?}", message),
                    Err(e) => warn!("Unrecognized message {}: {}", text.as_str(), e),
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    error!("Error receiving message: {}", e);
                    break;
                }
            }
        }
    });

    for _ in 0..args.moves {
        sleep(Duration::from_millis(args.delay_ms)).await;

        let direction = random_direction();
        let command = ClientMessage::Move { direction }.to_json()?;
        sink.send(Message::text(command)).await?;
        info!("Sent move {:?}", direction);
    }

    sink.close().await?;
    if tokio::time::timeout(Duration::from_secs(2), reader).await.is_err() {
        warn!("Server did not acknowledge close in time");
    }

    Ok(())
}
