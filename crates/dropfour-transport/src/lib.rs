//! Client-side transport layer for dropfour.
//!
//! Wraps `tokio-tungstenite` behind a small surface: [`connect`] opens a
//! WebSocket to the server, and [`WsConnection::split`] hands back the two
//! independent halves the connection layer runs its lanes on - a [`WsSink`]
//! for outbound text and a [`WsSource`] for inbound text.
//!
//! The transport speaks frames, not protocol: payloads are opaque strings
//! here, and everything protocol-shaped lives one layer up in
//! `dropfour-protocol`.

mod error;
mod websocket;

pub use error::TransportError;
pub use websocket::{connect, WsConnection, WsSink, WsSource};
