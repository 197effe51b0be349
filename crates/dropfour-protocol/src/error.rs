//! Error types for the protocol layer.
//!
//! Every failure a codec can produce is one of these variants. None of them
//! is fatal to a connection: the receive lane logs the error and drops the
//! offending event, and the next message is processed normally.

/// Errors that can occur while encoding or decoding wire messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serializing an outbound command failed.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The inbound payload did not match the wire schema - invalid JSON,
    /// missing fields, a stage string outside the known vocabulary, or a
    /// ragged board grid.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// The server flagged the envelope as failed (`ok: false`). Carries the
    /// server's `reason` string.
    #[error("server reported error: {0}")]
    ServerError(String),

    /// The envelope carried a `message_type` this client does not know.
    #[error("unknown message type: {0}")]
    UnknownMessageType(String),

    /// An outbound envelope carried an unrecognized command verb. Only
    /// produced by the server-side decode path ([`CommandEnvelope::from_json`]).
    ///
    /// [`CommandEnvelope::from_json`]: crate::CommandEnvelope::from_json
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}
