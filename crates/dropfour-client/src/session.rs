//! Session state: the client's view of one game.
//!
//! [`GameSession`] is mutated exclusively by the connection's receive lane
//! (through [`GameSession::apply`]) and read by the embedding application's
//! render loop. The single-writer rule is what makes the state cell safe:
//! every inbound update is applied as one whole-snapshot commit, never as a
//! sequence of field writes a reader could observe half-done.

use dropfour_protocol::{Board, ServerMessage, Stage, Token};

/// The identity the server assigned to this client on first contact.
///
/// Immutable for the lifetime of the connection. Required on every outbound
/// command - dispatch refuses to send until this exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    /// Server-side identifier correlating the two clients of one game.
    pub session: String,
    /// This client's identifier within the session.
    pub player: String,
    /// The marker this client plays with.
    pub token: Token,
}

/// The client-side model of one game, updated only by inbound messages.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GameSession {
    /// Assigned identity, `None` until the first `assign_player` arrives.
    pub identity: Option<PlayerIdentity>,

    /// Current lifecycle stage as asserted by the server.
    pub stage: Stage,

    /// Latest board snapshot. Wholesale-replaced on every update; the
    /// client never writes cells speculatively.
    pub board: Board,

    /// Whose move is next, `None` before the first snapshot.
    pub turn: Option<Token>,

    /// Whether it is this client's move. Derived: `turn == identity.token`,
    /// recomputed on every update, never cached across one.
    pub my_turn: bool,

    /// Set once the server sends `close`; dispatch refuses commands from
    /// then on.
    pub terminated: bool,
}

impl GameSession {
    /// Applies one decoded server event to the session.
    pub fn apply(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::AssignPlayer(assign) => {
                tracing::info!(
                    session = %assign.session,
                    player = %assign.player,
                    token = %assign.token,
                    "assigned to session"
                );
                self.identity = Some(PlayerIdentity {
                    session: assign.session,
                    player: assign.player,
                    token: assign.token,
                });
                self.stage = assign.state.stage;
                self.board = assign.state.board;
                self.turn = Some(assign.state.turn);
                self.recompute_my_turn();
            }
            ServerMessage::State(update) => {
                self.stage = update.stage;
                self.board = update.board;
                self.turn = Some(update.turn);
                self.recompute_my_turn();
            }
            ServerMessage::Close => {
                tracing::info!("session closed by server");
                self.terminated = true;
            }
        }
    }

    fn recompute_my_turn(&mut self) {
        self.my_turn = match (&self.identity, self.turn) {
            (Some(identity), Some(turn)) => identity.token == turn,
            _ => false,
        };
    }
}

// =========================================================================
// Tests
// =========================================================================
