//! In-memory peer channels for unit tests

use crate::registry::PeerSink;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{FutureExt, SinkExt, StreamExt};
use shared::{ClientMessage, Direction, ServerMessage};
use std::time::Duration;
use tokio_tungstenite::tungstenite::{self, Message};

/// A sink that behaves like a healthy WebSocket until `outbound` is dropped.
pub fn channel_sink() -> (PeerSink, UnboundedReceiver<Message>) {
    let (tx, rx) = mpsc::unbounded::<Message>();
    let sink: PeerSink = Box::pin(tx.sink_map_err(|_| tungstenite::Error::ConnectionClosed));
    (sink, rx)
}

/// A sink whose every write fails.
pub fn closed_sink() -> PeerSink {
    let (sink, outbound) = channel_sink();
    drop(outbound);
    sink
}

pub type Inbound = UnboundedReceiver<Result<Message, tungstenite::Error>>;

pub fn inbound_channel() -> (UnboundedSender<Result<Message, tungstenite::Error>>, Inbound) {
    mpsc::unbounded()
}

pub fn decode(message: Message) -> ServerMessage {
    match message {
        Message::Text(text) => ServerMessage::from_json(text.as_str()).unwrap(),
        other => panic!("Unexpected frame: {:?}", other),
    }
}

/// Messages already queued, without waiting for more.
pub fn pending(outbound: &mut UnboundedReceiver<Message>) -> Vec<ServerMessage> {
    let mut messages = Vec::new();
    while let Some(Some(message)) = outbound.next().now_or_never() {
        messages.push(decode(message));
    }
    messages
}

/// Waits for the next message, failing the test after a second.
pub async fn next_message(outbound: &mut UnboundedReceiver<Message>) -> ServerMessage {
    let message = tokio::time::timeout(Duration::from_secs(1), outbound.next())
        .await
        .expect("Timed out waiting for message")
        .expect("Channel closed");
    decode(message)
}

pub fn move_frame(direction: Direction) -> Result<Message, tungstenite::Error> {
    let text = ClientMessage::Move { direction }.to_json().unwrap();
    Ok(Message::text(text))
}
