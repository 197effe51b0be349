//! # dropfour-client
//!
//! Client-side connection and session layer for a networked Connect Four
//! game. The server is authoritative: this crate never computes game
//! outcomes, it only keeps a local snapshot of whatever state the server
//! asserts and translates local intents into protocol commands.
//!
//! # Architecture
//!
//! Two execution lanes run independently of the embedding application's
//! render/input loop:
//!
//! ```text
//! user intent → GameClient (dispatch) → outbound queue → send lane → socket
//! socket → receive lane → MessageDecoder → GameSession::apply → state cell
//!                                                                   │
//! render loop ──────────── session() / subscribe() ─────────────────┘
//! ```
//!
//! The receive lane is the only writer of [`GameSession`]; every update is
//! committed as one atomic snapshot through a `tokio::sync::watch` cell, so
//! a reader can never observe a torn state. Nothing the application calls
//! blocks on network I/O.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use dropfour_client::{ClientConfig, GameClient};
//!
//! # async fn run() {
//! let client = GameClient::connect(ClientConfig::for_endpoint("localhost", 8080));
//!
//! // ... from the render/input loop:
//! let session = client.session();
//! if session.my_turn {
//!     let _ = client.place(3);
//! }
//!
//! // ... on shutdown:
//! client.close().await;
//! # }
//! ```

mod client;
mod config;
mod connection;
mod error;
mod session;

pub use client::GameClient;
pub use config::ClientConfig;
pub use connection::{Connection, ConnectionStatus};
pub use error::ClientError;
pub use session::{GameSession, PlayerIdentity};

// Protocol vocabulary, re-exported so front-ends rarely need a direct
// dependency on dropfour-protocol.
pub use dropfour_protocol::{Board, ServerMessage, Stage, Token};
