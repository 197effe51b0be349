//! Inbound server messages and their decoder.
//!
//! Every frame the server pushes is wrapped in the same envelope:
//!
//! ```text
//! { "ok": bool, "reason"?: string, "message_type": string, "data": object }
//! ```
//!
//! [`MessageDecoder::decode`] turns one raw payload into exactly one
//! [`ServerMessage`] variant, or fails with an explicit [`ProtocolError`].
//! There is no partial success: an envelope either becomes a typed event or
//! is rejected before any state can observe it.

use serde::Deserialize;

use crate::{Board, ProtocolError, Stage, Token};

// ---------------------------------------------------------------------------
// Typed inbound variants
// ---------------------------------------------------------------------------

/// A full game-state snapshot: lifecycle stage, board, and turn owner.
///
/// Sent inside `assign_player` on first contact and as the `data` of every
/// subsequent `state` broadcast. The client replaces its view wholesale with
/// each snapshot - snapshots are never merged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StateUpdate {
    pub stage: Stage,
    pub board: Board,
    pub turn: Token,
}

/// First-contact assignment: the server pairs this client with a session,
/// a player id, and a token, plus the opening snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssignPlayer {
    pub session: String,
    pub player: String,
    pub token: Token,
    pub state: StateUpdate,
}

/// One decoded server-pushed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// First contact only: adopt identity and the opening snapshot.
    AssignPlayer(AssignPlayer),

    /// Every subsequent update: replace the snapshot, identity untouched.
    State(StateUpdate),

    /// The server is terminating the session.
    Close,
}

// ---------------------------------------------------------------------------
// Raw wire shapes
// ---------------------------------------------------------------------------

/// The outer envelope, before the variant is known.
///
/// `reason`, `message_type`, and `data` are all optional at this level so a
/// decode failure points at the actual missing piece instead of serde's
/// generic "missing field" on the whole envelope.
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    ok: bool,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    message_type: Option<String>,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// Early-client snapshot shape: board and turn only, no stage.
#[derive(Debug, Deserialize)]
struct LegacyStateData {
    board: Board,
    turn: Token,
}

/// Early-client assignment shape, wrapping [`LegacyStateData`].
#[derive(Debug, Deserialize)]
struct LegacyAssignData {
    session: String,
    player: String,
    token: Token,
    state: LegacyStateData,
}

impl LegacyStateData {
    /// A stage-less snapshot means the legacy server considered the game
    /// immediately playable.
    fn upgrade(self) -> StateUpdate {
        StateUpdate {
            stage: Stage::InProgress,
            board: self.board,
            turn: self.turn,
        }
    }
}

// ---------------------------------------------------------------------------
// MessageDecoder
// ---------------------------------------------------------------------------

/// Decodes raw inbound payloads into [`ServerMessage`] variants.
///
/// The canonical schema carries `stage` inside every snapshot. An early
/// server generation omitted it; those payloads are rejected as malformed
/// unless the decoder is explicitly built with
/// [`with_legacy_assign`](Self::with_legacy_assign). Supporting both shapes
/// is a deliberate opt-in, not a silent fallback, so a schema drift on the
/// server side still surfaces in the logs of a default-configured client.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageDecoder {
    legacy_assign: bool,
}

impl MessageDecoder {
    /// Creates a decoder for the canonical schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also accept the early stage-less `assign_player`/`state` payloads.
    /// A missing `stage` decodes as [`Stage::InProgress`].
    #[must_use]
    pub fn with_legacy_assign(mut self) -> Self {
        self.legacy_assign = true;
        self
    }

    /// Decodes one raw payload into exactly one typed variant.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::MalformedPayload`] - invalid JSON or a `data`
    ///   object that does not match the selected variant's schema.
    /// - [`ProtocolError::ServerError`] - the envelope has `ok: false`;
    ///   carries the server's `reason`.
    /// - [`ProtocolError::UnknownMessageType`] - a `message_type` outside
    ///   `assign_player` / `state` / `close`.
    pub fn decode(&self, raw: &str) -> Result<ServerMessage, ProtocolError> {
        let envelope: RawEnvelope = serde_json::from_str(raw)
            .map_err(|e| ProtocolError::MalformedPayload(e.to_string()))?;

        if !envelope.ok {
            let reason = envelope
                .reason
                .unwrap_or_else(|| "no reason given".to_string());
            return Err(ProtocolError::ServerError(reason));
        }

        let message_type = envelope.message_type.ok_or_else(|| {
            ProtocolError::MalformedPayload(
                "envelope is missing message_type".to_string(),
            )
        })?;

        match message_type.as_str() {
            "assign_player" => self
                .decode_assign(require_data(envelope.data)?)
                .map(ServerMessage::AssignPlayer),
            "state" => self
                .decode_state(require_data(envelope.data)?)
                .map(ServerMessage::State),
            // `close` carries an empty data object; nothing to decode.
            "close" => Ok(ServerMessage::Close),
            _ => Err(ProtocolError::UnknownMessageType(message_type)),
        }
    }

    fn decode_assign(
        &self,
        data: serde_json::Value,
    ) -> Result<AssignPlayer, ProtocolError> {
        if self.legacy_assign {
            // Canonical shape first; only fall back when it doesn't fit.
            if let Ok(assign) =
                serde_json::from_value::<AssignPlayer>(data.clone())
            {
                return Ok(assign);
            }
            return serde_json::from_value::<LegacyAssignData>(data)
                .map(|legacy| AssignPlayer {
                    session: legacy.session,
                    player: legacy.player,
                    token: legacy.token,
                    state: legacy.state.upgrade(),
                })
                .map_err(|e| {
                    ProtocolError::MalformedPayload(e.to_string())
                });
        }
        serde_json::from_value(data)
            .map_err(|e| ProtocolError::MalformedPayload(e.to_string()))
    }

    fn decode_state(
        &self,
        data: serde_json::Value,
    ) -> Result<StateUpdate, ProtocolError> {
        if self.legacy_assign {
            if let Ok(update) =
                serde_json::from_value::<StateUpdate>(data.clone())
            {
                return Ok(update);
            }
            return serde_json::from_value::<LegacyStateData>(data)
                .map(LegacyStateData::upgrade)
                .map_err(|e| {
                    ProtocolError::MalformedPayload(e.to_string())
                });
        }
        serde_json::from_value(data)
            .map_err(|e| ProtocolError::MalformedPayload(e.to_string()))
    }
}

fn require_data(
    data: Option<serde_json::Value>,
) -> Result<serde_json::Value, ProtocolError> {
    data.ok_or_else(|| {
        ProtocolError::MalformedPayload("envelope is missing data".to_string())
    })
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn empty_board() -> serde_json::Value {
        json!(vec![vec![serde_json::Value::Null; 6]; 7])
    }

    fn assign_envelope() -> String {
        json!({
            "ok": true,
            "message_type": "assign_player",
            "data": {
                "session": "S1",
                "player": "P1",
                "token": "RED",
                "state": {
                    "stage": "IN_PROGRESS",
                    "board": empty_board(),
                    "turn": "RED"
                }
            }
        })
        .to_string()
    }

    // =====================================================================
    // Happy paths - one per variant
    // =====================================================================

    #[test]
    fn test_decode_assign_player() {
        let msg = MessageDecoder::new().decode(&assign_envelope()).unwrap();
        let ServerMessage::AssignPlayer(assign) = msg else {
            panic!("expected AssignPlayer, got {msg:?}");
        };
        assert_eq!(assign.session, "S1");
        assert_eq!(assign.player, "P1");
        assert_eq!(assign.token, Token::Red);
        assert_eq!(assign.state.stage, Stage::InProgress);
        assert_eq!(assign.state.turn, Token::Red);
        assert_eq!(assign.state.board.columns(), 7);
    }

    #[test]
    fn test_decode_state() {
        let raw = json!({
            "ok": true,
            "message_type": "state",
            "data": {
                "stage": "WON",
                "board": empty_board(),
                "turn": "YELLOW"
            }
        })
        .to_string();

        let msg = MessageDecoder::new().decode(&raw).unwrap();
        let ServerMessage::State(update) = msg else {
            panic!("expected State, got {msg:?}");
        };
        assert_eq!(update.stage, Stage::Won);
        assert_eq!(update.turn, Token::Yellow);
    }

    #[test]
    fn test_decode_close() {
        let raw = json!({
            "ok": true,
            "message_type": "close",
            "data": {}
        })
        .to_string();

        let msg = MessageDecoder::new().decode(&raw).unwrap();
        assert_eq!(msg, ServerMessage::Close);
    }

    #[test]
    fn test_decode_close_without_data() {
        // The close variant has no payload; a missing data object is fine.
        let raw = json!({ "ok": true, "message_type": "close" }).to_string();
        let msg = MessageDecoder::new().decode(&raw).unwrap();
        assert_eq!(msg, ServerMessage::Close);
    }

    // =====================================================================
    // Error taxonomy
    // =====================================================================

    #[test]
    fn test_ok_false_is_server_error_with_reason() {
        let raw = json!({
            "ok": false,
            "reason": "column full",
            "message_type": "state",
            "data": {}
        })
        .to_string();

        let err = MessageDecoder::new().decode(&raw).unwrap_err();
        let ProtocolError::ServerError(reason) = err else {
            panic!("expected ServerError, got {err:?}");
        };
        assert_eq!(reason, "column full");
    }

    #[test]
    fn test_ok_false_without_reason() {
        let raw = json!({ "ok": false }).to_string();
        let err = MessageDecoder::new().decode(&raw).unwrap_err();
        assert!(matches!(err, ProtocolError::ServerError(_)));
    }

    #[test]
    fn test_unknown_message_type() {
        let raw = json!({
            "ok": true,
            "message_type": "emote",
            "data": {}
        })
        .to_string();

        let err = MessageDecoder::new().decode(&raw).unwrap_err();
        let ProtocolError::UnknownMessageType(kind) = err else {
            panic!("expected UnknownMessageType, got {err:?}");
        };
        assert_eq!(kind, "emote");
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = MessageDecoder::new().decode("not json").unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedPayload(_)));
    }

    #[test]
    fn test_missing_message_type_is_malformed() {
        let raw = json!({ "ok": true, "data": {} }).to_string();
        let err = MessageDecoder::new().decode(&raw).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedPayload(_)));
    }

    #[test]
    fn test_missing_data_is_malformed() {
        let raw = json!({ "ok": true, "message_type": "state" }).to_string();
        let err = MessageDecoder::new().decode(&raw).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedPayload(_)));
    }

    #[test]
    fn test_state_with_bad_token_is_malformed() {
        let raw = json!({
            "ok": true,
            "message_type": "state",
            "data": {
                "stage": "IN_PROGRESS",
                "board": empty_board(),
                "turn": "GREEN"
            }
        })
        .to_string();

        let err = MessageDecoder::new().decode(&raw).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedPayload(_)));
    }

    #[test]
    fn test_state_with_ragged_board_is_malformed() {
        let raw = json!({
            "ok": true,
            "message_type": "state",
            "data": {
                "stage": "IN_PROGRESS",
                "board": [[null, null], [null]],
                "turn": "RED"
            }
        })
        .to_string();

        let err = MessageDecoder::new().decode(&raw).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedPayload(_)));
    }

    // =====================================================================
    // Legacy (stage-less) schema - explicit opt-in only
    // =====================================================================

    fn legacy_assign_envelope() -> String {
        json!({
            "ok": true,
            "message_type": "assign_player",
            "data": {
                "session": "S1",
                "player": "P1",
                "token": "YELLOW",
                "state": {
                    "board": empty_board(),
                    "turn": "RED"
                }
            }
        })
        .to_string()
    }

    #[test]
    fn test_stage_less_assign_rejected_by_default() {
        let err = MessageDecoder::new()
            .decode(&legacy_assign_envelope())
            .unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedPayload(_)));
    }

    #[test]
    fn test_stage_less_assign_accepted_with_legacy_flag() {
        let msg = MessageDecoder::new()
            .with_legacy_assign()
            .decode(&legacy_assign_envelope())
            .unwrap();
        let ServerMessage::AssignPlayer(assign) = msg else {
            panic!("expected AssignPlayer, got {msg:?}");
        };
        assert_eq!(assign.token, Token::Yellow);
        assert_eq!(assign.state.stage, Stage::InProgress);
    }

    #[test]
    fn test_legacy_flag_still_prefers_canonical_shape() {
        let msg = MessageDecoder::new()
            .with_legacy_assign()
            .decode(&assign_envelope())
            .unwrap();
        let ServerMessage::AssignPlayer(assign) = msg else {
            panic!("expected AssignPlayer, got {msg:?}");
        };
        assert_eq!(assign.state.stage, Stage::InProgress);
    }

    #[test]
    fn test_stage_less_state_accepted_with_legacy_flag() {
        let raw = json!({
            "ok": true,
            "message_type": "state",
            "data": { "board": empty_board(), "turn": "YELLOW" }
        })
        .to_string();

        let msg = MessageDecoder::new()
            .with_legacy_assign()
            .decode(&raw)
            .unwrap();
        let ServerMessage::State(update) = msg else {
            panic!("expected State, got {msg:?}");
        };
        assert_eq!(update.stage, Stage::InProgress);
        assert_eq!(update.turn, Token::Yellow);
    }
}
