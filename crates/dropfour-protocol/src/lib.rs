//! Wire protocol for dropfour.
//!
//! This crate defines the "language" that the client and the game server
//! speak:
//!
//! - **Types** ([`Token`], [`Stage`], [`Board`]): the vocabulary shared by
//!   board cells, turn ownership, and game lifecycle.
//! - **Inbound messages** ([`ServerMessage`], [`MessageDecoder`]): how a raw
//!   textual payload becomes exactly one typed server event, or fails
//!   explicitly.
//! - **Outbound commands** ([`Command`], [`CommandEnvelope`]): how a local
//!   intent is wrapped with session identity and serialized.
//! - **Errors** ([`ProtocolError`]): what can go wrong at the codec
//!   boundary.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw text frames) and the
//! session layer (player identity and game state). It doesn't know about
//! connections or tasks - it only knows how to turn text into typed messages
//! and back.
//!
//! ```text
//! Transport (text) → Protocol (ServerMessage) → Session (game state)
//! Session (intent) → Protocol (CommandEnvelope) → Transport (text)
//! ```

mod command;
mod error;
mod message;
mod types;

pub use command::{Command, CommandEnvelope};
pub use error::ProtocolError;
pub use message::{AssignPlayer, MessageDecoder, ServerMessage, StateUpdate};
pub use types::{Board, Stage, Token};
