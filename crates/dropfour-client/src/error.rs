//! Unified error type for client operations.

use dropfour_protocol::ProtocolError;

/// Errors surfaced by [`GameClient`](crate::GameClient) operations.
///
/// None of these is fatal: a refused command leaves the connection and the
/// last-known-good state untouched, and the caller is free to retry once
/// the missing precondition (a live link, an assigned identity) is met.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A protocol-level error (encoding an outbound command).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Send attempted with no live transport. The payload was not
    /// transmitted and will not be retried.
    #[error("transport unavailable: not connected to the server")]
    TransportUnavailable,

    /// No session identity has been assigned yet - the server has not sent
    /// `assign_player`, so there is nothing to tag outbound traffic with.
    #[error("not connected: no session identity assigned")]
    NotConnected,

    /// The server terminated the session; local commands are refused.
    #[error("session closed by the server")]
    SessionClosed,
}
