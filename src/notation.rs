use crate::pieces::PieceType;
use crate::position::Position;

pub fn column_letter(col: u8) -> char {
    (b'a' + col) as char
}

pub fn cell_name(pos: Position) -> String {
    pos.to_algebraic()
}

/// SAN letter for a piece kind. Pawns have none.
pub fn piece_letter(kind: PieceType) -> &'static str {
    match kind {
        PieceType::Pawn => "",
        PieceType::Knight => "N",
        PieceType::Bishop => "B",
        PieceType::Rook => "R",
        PieceType::Queen => "Q",
        PieceType::King => "K",
    }
}

/// How much of the origin square a SAN token must spell out to single out
/// the mover among same-kind pieces that can also reach the destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disambiguator {
    None,
    Column,
    Row,
    Square,
}

/// Pick the shortest qualifier that separates `from` from the origin
/// squares of rival pieces: file first, then rank, then the full square.
pub fn disambiguator(from: Position, rivals: &[Position]) -> Disambiguator {
    if rivals.is_empty() {
        Disambiguator::None
    } else if rivals.iter().all(|r| r.col != from.col) {
        Disambiguator::Column
    } else if rivals.iter().all(|r| r.row != from.row) {
        Disambiguator::Row
    } else {
        Disambiguator::Square
    }
}

/// Assemble a SAN move token (without check or mate suffix):
/// piece letter, disambiguation, capture marker, destination, promotion.
/// Pawn captures carry their origin file instead of a piece letter.
pub fn move_token(
    kind: PieceType,
    from: Position,
    to: Position,
    capture: bool,
    promotion: Option<PieceType>,
    qualifier: Disambiguator,
) -> String {
    let mut token = String::new();

    if kind == PieceType::Pawn {
        if capture {
            token.push(column_letter(from.col));
        }
    } else {
        token.push_str(piece_letter(kind));
        match qualifier {
            Disambiguator::None => {}
            Disambiguator::Column => token.push(column_letter(from.col)),
            Disambiguator::Row => token.push_str(&(8 - from.row).to_string()),
            Disambiguator::Square => token.push_str(&cell_name(from)),
        }
    }

    if capture {
        token.push('x');
    }

    token.push_str(&cell_name(to));

    if let Some(promo) = promotion {
        token.push('=');
        token.push_str(piece_letter(promo));
    }

    token
}

pub fn castle_token(kingside: bool) -> &'static str {
    if kingside { "O-O" } else { "O-O-O" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn pos(name: &str) -> Position {
        Position::from_algebraic(name).expect("square name")
    }

    #[rstest]
    #[case(PieceType::Pawn, "")]
    #[case(PieceType::Knight, "N")]
    #[case(PieceType::Bishop, "B")]
    #[case(PieceType::Rook, "R")]
    #[case(PieceType::Queen, "Q")]
    #[case(PieceType::King, "K")]
    fn test_piece_letters(#[case] kind: PieceType, #[case] letter: &str) {
        assert_eq!(piece_letter(kind), letter);
    }

    #[test]
    fn test_plain_moves() {
        let token = move_token(
            PieceType::Knight,
            pos("g1"),
            pos("f3"),
            false,
            None,
            Disambiguator::None,
        );
        assert_eq!(token, "Nf3");

        let token = move_token(
            PieceType::Pawn,
            pos("e2"),
            pos("e4"),
            false,
            None,
            Disambiguator::None,
        );
        assert_eq!(token, "e4");
    }

    #[test]
    fn test_captures() {
        let token = move_token(
            PieceType::Queen,
            pos("h5"),
            pos("f7"),
            true,
            None,
            Disambiguator::None,
        );
        assert_eq!(token, "Qxf7");

        // Pawn captures carry the origin file.
        let token = move_token(
            PieceType::Pawn,
            pos("e4"),
            pos("d5"),
            true,
            None,
            Disambiguator::None,
        );
        assert_eq!(token, "exd5");
    }

    #[test]
    fn test_promotion_suffix() {
        let token = move_token(
            PieceType::Pawn,
            pos("e7"),
            pos("e8"),
            false,
            Some(PieceType::Queen),
            Disambiguator::None,
        );
        assert_eq!(token, "e8=Q");

        let token = move_token(
            PieceType::Pawn,
            pos("e7"),
            pos("d8"),
            true,
            Some(PieceType::Knight),
            Disambiguator::None,
        );
        assert_eq!(token, "exd8=N");
    }

    #[test]
    fn test_disambiguator_priority() {
        // Knights on b1 and f3 can both reach d2: files differ.
        assert_eq!(
            disambiguator(pos("b1"), &[pos("f3")]),
            Disambiguator::Column
        );

        // Rooks on a1 and a5 share the file: rank digit it is.
        assert_eq!(disambiguator(pos("a1"), &[pos("a5")]), Disambiguator::Row);

        // Queens on h4, e1, and h1: h4 shares its file with h1 and its rank
        // with nothing... e1 shares the rank with h1, so from h1 neither the
        // file nor the rank alone is unique.
        assert_eq!(
            disambiguator(pos("h1"), &[pos("h4"), pos("e1")]),
            Disambiguator::Square
        );

        assert_eq!(disambiguator(pos("g1"), &[]), Disambiguator::None);
    }

    #[test]
    fn test_disambiguated_tokens() {
        let token = move_token(
            PieceType::Knight,
            pos("b1"),
            pos("d2"),
            false,
            None,
            Disambiguator::Column,
        );
        assert_eq!(token, "Nbd2");

        let token = move_token(
            PieceType::Rook,
            pos("a1"),
            pos("a3"),
            false,
            None,
            Disambiguator::Row,
        );
        assert_eq!(token, "R1a3");

        let token = move_token(
            PieceType::Queen,
            pos("h4"),
            pos("e1"),
            true,
            None,
            Disambiguator::Square,
        );
        assert_eq!(token, "Qh4xe1");
    }

    #[test]
    fn test_castle_tokens() {
        assert_eq!(castle_token(true), "O-O");
        assert_eq!(castle_token(false), "O-O-O");
    }
}
