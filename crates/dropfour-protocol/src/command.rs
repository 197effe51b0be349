//! Outbound commands: local intents serialized for the server.
//!
//! Commands are transient - constructed, wrapped in a [`CommandEnvelope`],
//! serialized, sent, discarded. The envelope is the ONLY place session and
//! player identity are attached to outbound traffic, which is what lets the
//! dispatch layer enforce "no identity, no send" in a single spot.

use serde::{Deserialize, Serialize};

use crate::{ProtocolError, Token};

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A client-initiated request.
///
/// `#[serde(tag = "command", content = "args")]` produces the adjacently
/// tagged wire shape: the verb under `"command"`, its arguments (if any)
/// under `"args"`. Argless verbs serialize with no `args` key at all:
///
/// ```text
/// { "command": "place", "args": { "col": 3, "token": "RED" } }
/// { "command": "new_game" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "snake_case")]
pub enum Command {
    /// Ask the server to re-broadcast the current state.
    State,

    /// Drop the player's own token into a column.
    Place { col: usize, token: Token },

    /// Leave the session.
    Close,

    /// Request a fresh game in the same session.
    NewGame,
}

// ---------------------------------------------------------------------------
// CommandEnvelope
// ---------------------------------------------------------------------------

/// A command wrapped with the sender's session identity.
///
/// `#[serde(flatten)]` merges the command's tag and args into the envelope
/// object, yielding the flat outbound wire shape:
///
/// ```text
/// { "session": "S1", "player": "P1", "command": "place",
///   "args": { "col": 3, "token": "RED" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub session: String,
    pub player: String,
    #[serde(flatten)]
    pub command: Command,
}

impl CommandEnvelope {
    /// Wraps a command with the identity it will be sent under.
    pub fn new(
        command: Command,
        session: impl Into<String>,
        player: impl Into<String>,
    ) -> Self {
        Self {
            session: session.into(),
            player: player.into(),
            command,
        }
    }

    /// Serializes the envelope to its wire form.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    /// Parses an envelope from its wire form - the server side of the
    /// codec, used by tests as the reference decoder.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::UnknownCommand`] - the `command` verb is outside
    ///   the known set.
    /// - [`ProtocolError::MalformedPayload`] - anything else that does not
    ///   match the schema.
    pub fn from_json(raw: &str) -> Result<Self, ProtocolError> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| ProtocolError::MalformedPayload(e.to_string()))?;

        // Check the verb before handing off to serde, so an unrecognized
        // command is reported as such rather than as a generic mismatch.
        if let Some(verb) = value.get("command").and_then(|v| v.as_str()) {
            if !matches!(verb, "state" | "place" | "close" | "new_game") {
                return Err(ProtocolError::UnknownCommand(verb.to_string()));
            }
        }

        serde_json::from_value(value)
            .map_err(|e| ProtocolError::MalformedPayload(e.to_string()))
    }
}

// =========================================================================
// Tests
// =========================================================================
