//! # Position Relay Client Library
//!
//! A small graphical client for the position relay. It connects over
//! WebSocket, mirrors the server's roster locally, and turns arrow-key (or
//! WASD) presses into `move` commands.
//!
//! ## Architecture Overview
//!
//! The client never predicts movement. Every position it draws, including
//! its own, comes from a server message; a key press only sends a command and
//! waits for the resulting `playerMoved` broadcast.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! The local roster: which peers exist, where they are, and which one is us.
//!
//! ### Input Module (`input`)
//! Keyboard sampling with a repeat interval so a held key does not flood the
//! relay.
//!
//! ### Network Module (`network`)
//! The WebSocket connection, running on its own thread and runtime because
//! macroquad owns the main thread.
//!
//! ### Rendering Module (`rendering`)
//! Draws peers as squares labelled with their ids, plus a status line.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::game::World;
//! use client::network::{self, NetworkEvent};
//! use shared::Direction;
//!
//! let network = network::spawn("ws://127.0.0.1:8081/ws").unwrap();
//! let mut world = World::new();
//!
//! network.send_move(Direction::Up);
//! for event in network.poll() {
//!     if let NetworkEvent::Message(message) = event {
//!         world.apply(message);
//!     }
//! }
//! ```

pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
