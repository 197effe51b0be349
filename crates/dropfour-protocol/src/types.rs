//! Core vocabulary shared by both wire directions.
//!
//! Everything here travels on the wire inside inbound state snapshots and
//! outbound commands, so the serde attributes are part of the protocol
//! contract: a change to any rename is a protocol change.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// A player's marker identity.
///
/// The same value serves two purposes: it marks cells on the board, and it
/// expresses turn ownership ("it is RED's move"). Red is the first mover.
///
/// `#[serde(rename_all = "SCREAMING_SNAKE_CASE")]` pins the wire strings to
/// `"RED"` / `"YELLOW"`, which is what the server emits in board cells,
/// `turn` fields, and `assign_player` payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Token {
    Red,
    Yellow,
}

impl Token {
    /// The wire string for this token.
    pub fn as_str(self) -> &'static str {
        match self {
            Token::Red => "RED",
            Token::Yellow => "YELLOW",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Coarse game lifecycle phase.
///
/// The server owns this vocabulary; the client never infers a transition
/// itself, it only selects which view to present. The enum is closed - a
/// stage string outside this set fails decoding as a malformed payload
/// rather than being smuggled through as an opaque string.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// Waiting for the second player. The default before any server
    /// message has arrived.
    #[default]
    NotStarted,

    /// Both players joined, moves are being exchanged.
    InProgress,

    /// The game ended with a winner. The `turn` field of the final
    /// snapshot is left on the winning token.
    Won,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::NotStarted => f.write_str("NOT_STARTED"),
            Stage::InProgress => f.write_str("IN_PROGRESS"),
            Stage::Won => f.write_str("WON"),
        }
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// The game grid, column-major, row 0 at the top.
///
/// On the wire this is a nested array of columns, each cell `null` or a
/// token string. The `try_from`/`into` serde attributes route every
/// deserialization through [`Board::try_from`], so a ragged or empty grid
/// is rejected at the decode boundary instead of surfacing later as an
/// index panic.
///
/// The board is always replaced wholesale by the latest server snapshot;
/// nothing in the client writes individual cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<Vec<Option<Token>>>",
    into = "Vec<Vec<Option<Token>>>"
)]
pub struct Board {
    columns: Vec<Vec<Option<Token>>>,
}

impl Board {
    /// Standard Connect Four width.
    pub const COLUMNS: usize = 7;
    /// Standard Connect Four height.
    pub const ROWS: usize = 6;

    /// Creates an empty board with the given dimensions.
    pub fn empty(columns: usize, rows: usize) -> Self {
        Self {
            columns: vec![vec![None; rows]; columns],
        }
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows. Every column has the same height - enforced by
    /// [`Board::try_from`].
    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// The cell at `(col, row)`, or `None` when empty or out of range.
    pub fn cell(&self, col: usize, row: usize) -> Option<Token> {
        self.columns.get(col)?.get(row).copied().flatten()
    }

    /// The row a piece dropped into `col` would land in, or `None` when
    /// the column is full or out of range.
    ///
    /// Pieces stack from the bottom (highest row index), so this is the
    /// deepest empty cell of the column. Front-ends use it to draw hover
    /// shadows; it is advisory only - the server decides where pieces
    /// actually land.
    pub fn drop_row(&self, col: usize) -> Option<usize> {
        let column = self.columns.get(col)?;
        match column.iter().position(Option::is_some) {
            Some(0) => None,
            Some(filled) => Some(filled - 1),
            None => Some(column.len().checked_sub(1)?),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty(Self::COLUMNS, Self::ROWS)
    }
}

impl TryFrom<Vec<Vec<Option<Token>>>> for Board {
    type Error = String;

    fn try_from(
        columns: Vec<Vec<Option<Token>>>,
    ) -> Result<Self, Self::Error> {
        let rows = match columns.first() {
            Some(first) => first.len(),
            None => return Err("board has no columns".into()),
        };
        if rows == 0 {
            return Err("board has no rows".into());
        }
        if columns.iter().any(|column| column.len() != rows) {
            return Err("board columns have unequal heights".into());
        }
        Ok(Self { columns })
    }
}

impl From<Board> for Vec<Vec<Option<Token>>> {
    fn from(board: Board) -> Self {
        board.columns
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // =====================================================================
    // Token / Stage wire strings
    // =====================================================================

    #[test]
    fn test_token_serializes_as_screaming_snake() {
        assert_eq!(serde_json::to_string(&Token::Red).unwrap(), "\"RED\"");
        assert_eq!(
            serde_json::to_string(&Token::Yellow).unwrap(),
            "\"YELLOW\""
        );
    }

    #[test]
    fn test_token_deserializes_from_wire_string() {
        let token: Token = serde_json::from_str("\"YELLOW\"").unwrap();
        assert_eq!(token, Token::Yellow);
    }

    #[test]
    fn test_token_display_matches_wire() {
        assert_eq!(Token::Red.to_string(), "RED");
        assert_eq!(Token::Yellow.as_str(), "YELLOW");
    }

    #[test]
    fn test_stage_serializes_as_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&Stage::NotStarted).unwrap(),
            "\"NOT_STARTED\""
        );
        assert_eq!(
            serde_json::to_string(&Stage::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(serde_json::to_string(&Stage::Won).unwrap(), "\"WON\"");
    }

    #[test]
    fn test_stage_default_is_not_started() {
        assert_eq!(Stage::default(), Stage::NotStarted);
    }

    #[test]
    fn test_stage_rejects_unknown_string() {
        let result: Result<Stage, _> = serde_json::from_str("\"PAUSED\"");
        assert!(result.is_err());
    }

    // =====================================================================
    // Board
    // =====================================================================

    #[test]
    fn test_board_default_dimensions() {
        let board = Board::default();
        assert_eq!(board.columns(), Board::COLUMNS);
        assert_eq!(board.rows(), Board::ROWS);
        assert_eq!(board.cell(0, 0), None);
    }

    #[test]
    fn test_board_round_trip() {
        let mut columns = vec![vec![None; 6]; 7];
        columns[3][5] = Some(Token::Red);
        let board = Board::try_from(columns.clone()).unwrap();
        let json = serde_json::to_string(&board).unwrap();
        let decoded: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, board);
        assert_eq!(decoded.cell(3, 5), Some(Token::Red));
    }

    #[test]
    fn test_board_wire_format_uses_null_for_empty() {
        let board = Board::empty(2, 2);
        let json: serde_json::Value = serde_json::to_value(&board).unwrap();
        assert_eq!(json, serde_json::json!([[null, null], [null, null]]));
    }

    #[test]
    fn test_board_rejects_empty_grid() {
        let result: Result<Board, _> = serde_json::from_str("[]");
        assert!(result.is_err());
    }

    #[test]
    fn test_board_rejects_empty_columns() {
        let result: Result<Board, _> = serde_json::from_str("[[], []]");
        assert!(result.is_err());
    }

    #[test]
    fn test_board_rejects_ragged_columns() {
        let result: Result<Board, _> =
            serde_json::from_str(r#"[[null, null], [null]]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_board_cell_out_of_range_is_none() {
        let board = Board::default();
        assert_eq!(board.cell(99, 0), None);
        assert_eq!(board.cell(0, 99), None);
    }

    #[test]
    fn test_drop_row_on_empty_column_is_bottom() {
        let board = Board::default();
        assert_eq!(board.drop_row(0), Some(Board::ROWS - 1));
    }

    #[test]
    fn test_drop_row_stacks_upward() {
        let mut columns = vec![vec![None; 6]; 7];
        columns[2][5] = Some(Token::Red);
        columns[2][4] = Some(Token::Yellow);
        let board = Board::try_from(columns).unwrap();
        assert_eq!(board.drop_row(2), Some(3));
    }

    #[test]
    fn test_drop_row_full_column_is_none() {
        let mut columns = vec![vec![None; 6]; 7];
        columns[0] = vec![Some(Token::Red); 6];
        let board = Board::try_from(columns).unwrap();
        assert_eq!(board.drop_row(0), None);
    }

    #[test]
    fn test_drop_row_out_of_range_is_none() {
        let board = Board::default();
        assert_eq!(board.drop_row(99), None);
    }
}
