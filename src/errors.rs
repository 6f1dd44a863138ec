use crate::color::Color;
use crate::position::Position;
use thiserror::Error;

/// Why a loaded snapshot was rejected at the boundary. The live game is left
/// untouched whenever one of these comes back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("{0} has {1} pieces, the limit is 16")]
    TooManyPieces(Color, usize),

    #[error("piece out of bounds at row {row}, column {col}")]
    OutOfBounds { row: u8, col: u8 },

    #[error("two pieces share square {0}")]
    OverlappingPieces(Position),

    #[error("{0} must have exactly one king, found {1}")]
    KingCount(Color, usize),

    #[error("en passant target out of bounds at row {row}, column {col}")]
    EnPassantOutOfBounds { row: u8, col: u8 },

    #[error("malformed position signature: {0:?}")]
    BadSignature(String),
}
