use crate::color::Color;
use crate::pieces::{Piece, PieceType};
use crate::position::Position;
use std::fmt;

/// What a board cell holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Occupant {
    pub kind: PieceType,
    pub color: Color,
}

/// An 8x8 projection of the two piece sets.
///
/// The board is derived state: it is rebuilt from the piece collections and
/// must never be edited on its own. Keeping all lookups here means the move
/// generator never scans the piece lists for occupancy.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Occupant>; 64],
}

impl Board {
    pub fn from_sets(white: &[Piece], black: &[Piece]) -> Self {
        let mut squares = [None; 64];

        for (set, color) in [(white, Color::White), (black, Color::Black)] {
            for piece in set {
                squares[Self::index(piece.pos)] = Some(Occupant {
                    kind: piece.kind,
                    color,
                });
            }
        }

        Board { squares }
    }

    pub fn empty() -> Self {
        Board { squares: [None; 64] }
    }

    fn index(pos: Position) -> usize {
        pos.row as usize * 8 + pos.col as usize
    }

    pub fn get(&self, pos: Position) -> Option<Occupant> {
        if pos.in_bounds() {
            self.squares[Self::index(pos)]
        } else {
            None
        }
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// True if `pos` holds a piece of the opposite color to `color`.
    pub fn holds_opponent(&self, pos: Position, color: Color) -> bool {
        self.get(pos).is_some_and(|occ| occ.color != color)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..8u8 {
            write!(f, "{:2} ", 8 - row)?;
            for col in 0..8u8 {
                match self.get(Position::new(row, col)) {
                    Some(occ) => {
                        let c = match occ.color {
                            Color::White => occ.kind.code().to_ascii_uppercase(),
                            Color::Black => occ.kind.code(),
                        };
                        write!(f, "{} ", c)?;
                    }
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }

        write!(f, "   ")?;
        for col in 0..8u8 {
            write!(f, "{} ", (b'a' + col) as char)?;
        }
        Ok(())
    }
}
