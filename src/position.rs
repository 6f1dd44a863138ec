use serde::{Deserialize, Serialize};
use std::fmt;

/// A square on the board. Row 0 is Black's back rank, row 7 is White's, so
/// the algebraic rank is `8 - row`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    #[serde(rename = "column")]
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Self {
        Position { row, col }
    }

    pub fn in_bounds(&self) -> bool {
        self.row < 8 && self.col < 8
    }

    /// The square offset by `(d_row, d_col)`, or `None` if it falls off the
    /// board.
    pub fn offset(&self, d_row: i8, d_col: i8) -> Option<Position> {
        let row = self.row as i8 + d_row;
        let col = self.col as i8 + d_col;

        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Position::new(row as u8, col as u8))
        } else {
            None
        }
    }

    pub fn to_algebraic(&self) -> String {
        format!("{}{}", (b'a' + self.col) as char, 8 - self.row)
    }

    pub fn from_algebraic(s: &str) -> Result<Self, String> {
        let chars: Vec<char> = s.chars().collect();

        if chars.len() != 2 {
            return Err(format!("Invalid square name: {}", s));
        }

        let col = match chars[0] {
            c @ 'a'..='h' => c as u8 - b'a',
            c => return Err(format!("Invalid file character: {}", c)),
        };

        let rank = match chars[1] {
            c @ '1'..='8' => c as u8 - b'0',
            c => return Err(format!("Invalid rank character: {}", c)),
        };

        Ok(Position::new(8 - rank, col))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Position::new(7, 0), "a1")]
    #[case(Position::new(0, 7), "h8")]
    #[case(Position::new(4, 4), "e4")]
    #[case(Position::new(1, 3), "d7")]
    fn test_position_algebraic_round_trip(#[case] pos: Position, #[case] name: &str) {
        assert_eq!(pos.to_algebraic(), name);
        assert_eq!(Position::from_algebraic(name), Ok(pos));
    }

    #[test]
    fn test_position_from_algebraic_invalid() {
        assert!(Position::from_algebraic("e9").is_err());
        assert!(Position::from_algebraic("i4").is_err());
        assert!(Position::from_algebraic("e44").is_err());
        assert!(Position::from_algebraic("").is_err());
    }

    #[test]
    fn test_position_offset() {
        let pos = Position::new(4, 4);
        assert_eq!(pos.offset(-1, 0), Some(Position::new(3, 4)));
        assert_eq!(pos.offset(2, -2), Some(Position::new(6, 2)));

        assert_eq!(Position::new(0, 0).offset(-1, 0), None);
        assert_eq!(Position::new(7, 7).offset(0, 1), None);
    }
}
