//! `GameClient`: the facade the embedding application talks to.
//!
//! Wires the pieces together - decoder, connection lanes, and the session
//! state cell - and maps local intents (place a piece, new game, quit) to
//! outbound protocol commands tagged with the current identity.

use dropfour_protocol::{Command, CommandEnvelope, MessageDecoder};
use tokio::sync::watch;

use crate::connection::{Connection, ConnectionStatus};
use crate::session::{GameSession, PlayerIdentity};
use crate::{ClientConfig, ClientError};

/// A connected (or connecting) game client.
///
/// All methods are non-blocking: reads return the latest committed snapshot,
/// sends enqueue and return. Safe to drive from a fixed-rate render loop.
pub struct GameClient {
    connection: Connection,
    state: watch::Receiver<GameSession>,
    config: ClientConfig,
}

impl GameClient {
    /// Starts a client against the configured server.
    ///
    /// Returns immediately; the connection is established in the
    /// background. Progress is observable through
    /// [`status`](Self::status) and the session snapshots.
    ///
    /// Must be called within a Tokio runtime.
    pub fn connect(config: ClientConfig) -> Self {
        let mut decoder = MessageDecoder::new();
        if config.accept_legacy_assign {
            decoder = decoder.with_legacy_assign();
        }

        let (state_tx, state_rx) = watch::channel(GameSession::default());

        // The receive lane is the session's single writer: each decoded
        // event is applied inside `send_modify`, so readers always observe
        // whole snapshots.
        let connection =
            Connection::start(config.url.clone(), decoder, move |message| {
                state_tx.send_modify(|session| session.apply(message));
            });

        Self {
            connection,
            state: state_rx,
            config,
        }
    }

    // -- State access (render loop side) ---------------------------------

    /// The latest committed session snapshot.
    pub fn session(&self) -> GameSession {
        self.state.borrow().clone()
    }

    /// A receiver that yields a fresh snapshot on every inbound update -
    /// for front-ends that prefer awaiting changes over polling.
    pub fn subscribe(&self) -> watch::Receiver<GameSession> {
        self.state.clone()
    }

    /// Current transport status. Never blocks.
    pub fn status(&self) -> ConnectionStatus {
        self.connection.status()
    }

    /// Whether the transport link is live. Never blocks.
    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    // -- Command dispatch ------------------------------------------------

    /// Drops this player's token into `col`.
    ///
    /// The bounds check against the board width is advisory - a warning is
    /// logged but the command is still sent, because the server is the sole
    /// arbiter of legality.
    pub fn place(&self, col: usize) -> Result<(), ClientError> {
        let identity = self.identity()?;
        let width = self.state.borrow().board.columns();
        if col >= width {
            tracing::warn!(col, width, "column outside board width");
        }
        self.dispatch(
            Command::Place {
                col,
                token: identity.token,
            },
            &identity,
        )
    }

    /// Asks the server to start a fresh game in the same session.
    pub fn new_game(&self) -> Result<(), ClientError> {
        let identity = self.identity()?;
        self.dispatch(Command::NewGame, &identity)
    }

    /// Asks the server to re-broadcast the current state.
    pub fn request_state(&self) -> Result<(), ClientError> {
        let identity = self.identity()?;
        self.dispatch(Command::State, &identity)
    }

    /// Shuts the client down: best-effort `close` command, then bounded
    /// teardown of the connection lanes. Never hangs longer than the
    /// configured `shutdown_timeout`; no acknowledgment is awaited.
    pub async fn close(self) {
        match self.identity() {
            Ok(identity) => {
                if let Err(e) = self.dispatch(Command::Close, &identity) {
                    tracing::debug!(error = %e, "close command not sent");
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "close command not sent");
            }
        }
        self.connection.shutdown();
        self.connection.join(self.config.shutdown_timeout).await;
    }

    /// The identity every command must be tagged with.
    ///
    /// # Errors
    /// [`ClientError::SessionClosed`] once the server has terminated the
    /// session, [`ClientError::NotConnected`] before `assign_player` has
    /// arrived. Both are logged; nothing reaches the wire.
    fn identity(&self) -> Result<PlayerIdentity, ClientError> {
        let session = self.state.borrow();
        if session.terminated {
            tracing::warn!("session closed by server, command refused");
            return Err(ClientError::SessionClosed);
        }
        match &session.identity {
            Some(identity) => Ok(identity.clone()),
            None => {
                tracing::warn!(
                    "no session identity assigned yet, command refused"
                );
                Err(ClientError::NotConnected)
            }
        }
    }

    /// Encodes the command under the given identity and enqueues it. This
    /// is the only path by which commands reach the transport.
    fn dispatch(
        &self,
        command: Command,
        identity: &PlayerIdentity,
    ) -> Result<(), ClientError> {
        let payload = CommandEnvelope::new(
            command,
            identity.session.clone(),
            identity.player.clone(),
        )
        .to_json()?;
        self.connection.send(payload)
    }
}
