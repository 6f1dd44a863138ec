use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::position::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// Lowercase signature letter, uppercased for White by the caller.
    pub fn code(&self) -> char {
        match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        }
    }

    /// Whether a pawn may promote to this type.
    pub fn is_promotion_target(&self) -> bool {
        matches!(
            self,
            PieceType::Queen | PieceType::Rook | PieceType::Bishop | PieceType::Knight
        )
    }
}

/// A piece owned by one of the two color-keyed sets.
///
/// `moved` is a single flag with three readings: for a Pawn it gates the
/// double-step, for a King or Rook it is the castling right, and for
/// everything else it is inert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    #[serde(rename = "type")]
    pub kind: PieceType,
    #[serde(rename = "position")]
    pub pos: Position,
    pub moved: bool,
}

impl Piece {
    pub fn new(kind: PieceType, pos: Position) -> Self {
        Piece {
            kind,
            pos,
            moved: false,
        }
    }
}

/// One side's pieces. A side starts with 16 and never gains any, so the set
/// lives on the stack.
pub type PieceSet = ArrayVec<Piece, 16>;

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// The standard sixteen-piece starting layout for one color.
pub fn start_set(color: Color) -> PieceSet {
    let (pawn_row, back_row) = match color {
        Color::White => (6, 7),
        Color::Black => (1, 0),
    };

    let mut set = PieceSet::new();

    for col in 0..8 {
        set.push(Piece::new(PieceType::Pawn, Position::new(pawn_row, col)));
    }
    for (col, kind) in BACK_RANK.iter().enumerate() {
        set.push(Piece::new(*kind, Position::new(back_row, col as u8)));
    }

    set
}

pub fn piece_at(set: &[Piece], pos: Position) -> Option<&Piece> {
    set.iter().find(|p| p.pos == pos)
}

pub fn king_of(set: &[Piece]) -> Option<&Piece> {
    set.iter().find(|p| p.kind == PieceType::King)
}
