use crate::color::Color;
use crate::pieces::{Piece, PieceType, king_of};
use crate::position::Position;

/// Whether `player`'s king is attacked by any piece in `opponent`.
///
/// Works on the raw piece sets so the legality filter can probe hypothetical
/// positions without building a board. A set with no king reports "in check":
/// that position is corrupt and must never be reached through legal play, and
/// the snapshot boundary rejects it before it can get here.
pub fn king_in_check(player: &[Piece], opponent: &[Piece], player_color: Color) -> bool {
    let Some(king) = king_of(player) else {
        return true;
    };

    let target = king.pos;
    opponent
        .iter()
        .any(|attacker| threatens(attacker, target, player, opponent, player_color.opposite()))
}

fn threatens(
    attacker: &Piece,
    target: Position,
    player: &[Piece],
    opponent: &[Piece],
    attacker_color: Color,
) -> bool {
    match attacker.kind {
        PieceType::Pawn => pawn_threat(attacker.pos, target, attacker_color),
        PieceType::Knight => knight_threat(attacker.pos, target),
        PieceType::Bishop => diagonal_threat(attacker.pos, target, player, opponent),
        PieceType::Rook => straight_threat(attacker.pos, target, player, opponent),
        PieceType::Queen => {
            diagonal_threat(attacker.pos, target, player, opponent)
                || straight_threat(attacker.pos, target, player, opponent)
        }
        PieceType::King => king_threat(attacker.pos, target),
    }
}

fn pawn_threat(attacker: Position, target: Position, attacker_color: Color) -> bool {
    attacker.row as i8 + attacker_color.pawn_direction() == target.row as i8
        && (attacker.col as i8 - target.col as i8).abs() == 1
}

fn knight_threat(attacker: Position, target: Position) -> bool {
    let d_row = (attacker.row as i8 - target.row as i8).abs();
    let d_col = (attacker.col as i8 - target.col as i8).abs();

    (d_row == 1 && d_col == 2) || (d_row == 2 && d_col == 1)
}

fn diagonal_threat(attacker: Position, target: Position, player: &[Piece], opponent: &[Piece]) -> bool {
    let d_row = target.row as i8 - attacker.row as i8;
    let d_col = target.col as i8 - attacker.col as i8;

    d_row.abs() == d_col.abs() && d_row != 0 && ray_clear(attacker, target, player, opponent)
}

fn straight_threat(attacker: Position, target: Position, player: &[Piece], opponent: &[Piece]) -> bool {
    (attacker.row == target.row) != (attacker.col == target.col)
        && ray_clear(attacker, target, player, opponent)
}

fn king_threat(attacker: Position, target: Position) -> bool {
    let d_row = (attacker.row as i8 - target.row as i8).abs();
    let d_col = (attacker.col as i8 - target.col as i8).abs();

    d_row <= 1 && d_col <= 1 && d_row + d_col > 0
}

/// True if no piece from either set sits strictly between `from` and `to`,
/// which must already lie on a shared rank, file, or diagonal.
fn ray_clear(from: Position, to: Position, player: &[Piece], opponent: &[Piece]) -> bool {
    let d_row = to.row as i8 - from.row as i8;
    let d_col = to.col as i8 - from.col as i8;
    let steps = d_row.abs().max(d_col.abs());

    for i in 1..steps {
        let row = from.row as i8 + i * d_row.signum();
        let col = from.col as i8 + i * d_col.signum();
        let square = Position::new(row as u8, col as u8);

        if player.iter().chain(opponent).any(|p| p.pos == square) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(kind: PieceType, name: &str) -> Piece {
        Piece::new(kind, Position::from_algebraic(name).expect("square name"))
    }

    #[test]
    fn test_rook_check_and_interposition() {
        let player = vec![piece(PieceType::King, "e1")];
        let opponent = vec![piece(PieceType::Rook, "e8")];
        assert!(king_in_check(&player, &opponent, Color::White));

        let blocked = vec![piece(PieceType::King, "e1"), piece(PieceType::Bishop, "e4")];
        assert!(!king_in_check(&blocked, &opponent, Color::White));
    }

    #[test]
    fn test_bishop_and_queen_diagonals() {
        let player = vec![piece(PieceType::King, "e1")];

        let bishop = vec![piece(PieceType::Bishop, "a5")];
        assert!(king_in_check(&player, &bishop, Color::White));

        let queen = vec![piece(PieceType::Queen, "h4")];
        assert!(king_in_check(&player, &queen, Color::White));

        let off_line = vec![piece(PieceType::Bishop, "b5")];
        assert!(!king_in_check(&player, &off_line, Color::White));
    }

    #[test]
    fn test_diagonal_blocked_by_own_piece() {
        let player = vec![piece(PieceType::King, "e1"), piece(PieceType::Pawn, "f2")];
        let opponent = vec![piece(PieceType::Queen, "h4")];
        assert!(!king_in_check(&player, &opponent, Color::White));
    }

    #[test]
    fn test_knight_check_ignores_blockers() {
        let player = vec![
            piece(PieceType::King, "e1"),
            piece(PieceType::Pawn, "e2"),
            piece(PieceType::Pawn, "f2"),
        ];
        let opponent = vec![piece(PieceType::Knight, "f3")];
        assert!(king_in_check(&player, &opponent, Color::White));
    }

    #[test]
    fn test_pawn_check_direction() {
        // Black pawns attack towards row 7, so d2 covers e1.
        let white = vec![piece(PieceType::King, "e1")];
        let black_pawn = vec![piece(PieceType::Pawn, "d2")];
        assert!(king_in_check(&white, &black_pawn, Color::White));

        // A pawn never attacks the square straight ahead of it.
        let ahead = vec![piece(PieceType::Pawn, "e2")];
        assert!(!king_in_check(&white, &ahead, Color::White));

        // White pawns attack towards row 0.
        let black = vec![piece(PieceType::King, "e8")];
        let white_pawn = vec![piece(PieceType::Pawn, "f7")];
        assert!(king_in_check(&black, &white_pawn, Color::Black));
    }

    #[test]
    fn test_adjacent_king_checks() {
        let player = vec![piece(PieceType::King, "e4")];
        let opponent = vec![piece(PieceType::King, "d5")];
        assert!(king_in_check(&player, &opponent, Color::White));

        let distant = vec![piece(PieceType::King, "c6")];
        assert!(!king_in_check(&player, &distant, Color::White));
    }

    #[test]
    fn test_missing_king_reports_check() {
        let player = vec![piece(PieceType::Rook, "a1")];
        let opponent = vec![piece(PieceType::King, "e8")];
        assert!(king_in_check(&player, &opponent, Color::White));
    }
}
