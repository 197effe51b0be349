//! Client configuration.

use std::time::Duration;

/// Default bound on the teardown wait in
/// [`GameClient::close`](crate::GameClient::close).
const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Configuration for a [`GameClient`](crate::GameClient) connection.
///
/// The only required field is the server URL; everything else has a
/// documented default.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket URL of the game server.
    pub url: String,

    /// How long [`GameClient::close`](crate::GameClient::close) waits for
    /// the connection tasks to finish before abandoning them. Teardown is
    /// best-effort and must never hang application shutdown.
    ///
    /// Defaults to **1 second**.
    pub shutdown_timeout: Duration,

    /// Accept the early stage-less `assign_player`/`state` payloads in
    /// addition to the canonical schema. Off by default - see
    /// [`MessageDecoder::with_legacy_assign`](dropfour_protocol::MessageDecoder::with_legacy_assign).
    pub accept_legacy_assign: bool,
}

impl ClientConfig {
    /// Creates a configuration with default values for the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            accept_legacy_assign: false,
        }
    }

    /// Builds the conventional endpoint URL for a host/port pair:
    /// `ws://<host>:<port>/websocket`.
    pub fn for_endpoint(host: &str, port: u16) -> Self {
        Self::new(format!("ws://{host}:{port}/websocket"))
    }

    /// Sets the bound on the teardown wait.
    #[must_use]
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Accept the early stage-less payload schema.
    #[must_use]
    pub fn with_legacy_assign(mut self) -> Self {
        self.accept_legacy_assign = true;
        self
    }
}
