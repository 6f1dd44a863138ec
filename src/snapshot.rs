use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::color::Color;
use crate::errors::SnapshotError;
use crate::pieces::{Piece, PieceType};
use crate::position::Position;

/// One repetition-table row: a position signature and how often that
/// position has stood on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepetitionEntry {
    pub signature: String,
    pub occurrences: u32,
}

/// The full serializable game state, shaped for an external persistence
/// gateway. The `id` is assigned by that gateway and travels through the
/// engine untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub id: Option<String>,
    pub white_pieces: Vec<Piece>,
    pub black_pieces: Vec<Piece>,
    pub whites_turn: bool,
    pub turn_count: u32,
    #[serde(rename = "movesSinceChange")]
    pub halfmove_clock: u32,
    pub board_states: Vec<RepetitionEntry>,
    pub en_passant: Option<Position>,
    pub notation: String,
}

/// Signature length: one letter per cell plus the side to move.
const SIGNATURE_LEN: usize = 65;

/// Canonical signature of a position: 64 cells in column-major order, `e`
/// for empty or a case-coded piece letter (uppercase white), then `w`/`b`
/// for the side to move. Independent of piece-list ordering, so it is a
/// stable repetition-detection key.
pub fn position_signature(board: &Board, turn: Color) -> String {
    let mut signature = String::with_capacity(SIGNATURE_LEN);

    for col in 0..8u8 {
        for row in 0..8u8 {
            match board.get(Position::new(row, col)) {
                Some(occ) if occ.color.is_white() => {
                    signature.push(occ.kind.code().to_ascii_uppercase())
                }
                Some(occ) => signature.push(occ.kind.code()),
                None => signature.push('e'),
            }
        }
    }

    signature.push(if turn.is_white() { 'w' } else { 'b' });
    signature
}

impl GameSnapshot {
    /// Structural validation, run before a snapshot may replace live state:
    /// per-side piece limits, exactly one king each, every position on the
    /// board, no shared squares, and well-formed repetition rows.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        for (color, set) in [
            (Color::White, &self.white_pieces),
            (Color::Black, &self.black_pieces),
        ] {
            if set.len() > 16 {
                return Err(SnapshotError::TooManyPieces(color, set.len()));
            }

            let kings = set.iter().filter(|p| p.kind == PieceType::King).count();
            if kings != 1 {
                return Err(SnapshotError::KingCount(color, kings));
            }
        }

        let mut seen: Vec<Position> = Vec::new();
        for piece in self.white_pieces.iter().chain(&self.black_pieces) {
            if !piece.pos.in_bounds() {
                return Err(SnapshotError::OutOfBounds {
                    row: piece.pos.row,
                    col: piece.pos.col,
                });
            }
            if seen.contains(&piece.pos) {
                return Err(SnapshotError::OverlappingPieces(piece.pos));
            }
            seen.push(piece.pos);
        }

        if let Some(ep) = self.en_passant {
            if !ep.in_bounds() {
                return Err(SnapshotError::EnPassantOutOfBounds {
                    row: ep.row,
                    col: ep.col,
                });
            }
        }

        for entry in &self.board_states {
            if entry.signature.len() != SIGNATURE_LEN {
                return Err(SnapshotError::BadSignature(entry.signature.clone()));
            }
        }

        Ok(())
    }
}
