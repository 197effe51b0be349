use tokio_tungstenite::tungstenite;

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Establishing the connection failed.
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] tungstenite::Error),

    /// Sending a frame failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] tungstenite::Error),

    /// Receiving a frame failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] tungstenite::Error),
}
