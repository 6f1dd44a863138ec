use bitflags::bitflags;

use crate::attack::king_in_check;
use crate::board::Board;
use crate::color::Color;
use crate::pieces::{Piece, PieceSet, PieceType};
use crate::position::Position;

bitflags! {
    /// What an executed ply did. The clock, repetition, and notation hooks
    /// read these instead of re-deriving the move shape.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MoveEffects: u8 {
        const CAPTURE = 0b00000001;
        const DOUBLE_STEP = 0b00000010;
        const EN_PASSANT = 0b00000100;
        const CASTLE = 0b00001000;
        const PROMOTION = 0b00010000;
        const RIGHTS_CHANGE = 0b00100000;
        const PAWN_MOVE = 0b01000000;
    }
}

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Destination squares reachable by `piece` under movement and blocking
/// rules alone, before the own-king-safety filter.
pub fn pseudo_legal_moves(
    piece: &Piece,
    board: &Board,
    player: &[Piece],
    color: Color,
    en_passant: Option<Position>,
) -> Vec<Position> {
    match piece.kind {
        PieceType::Pawn => pawn_moves(piece, board, color, en_passant),
        PieceType::Knight => knight_moves(piece, board, color),
        PieceType::Bishop => sliding_moves(piece, board, color, &DIAGONALS),
        PieceType::Rook => sliding_moves(piece, board, color, &ORTHOGONALS),
        PieceType::Queen => {
            let mut moves = sliding_moves(piece, board, color, &DIAGONALS);
            moves.extend(sliding_moves(piece, board, color, &ORTHOGONALS));
            moves
        }
        PieceType::King => king_moves(piece, board, player, color),
    }
}

/// Pseudo-legal moves minus anything that leaves the mover's own king
/// attacked. Castling additionally may not start from, pass through, or land
/// on an attacked square.
pub fn legal_moves(
    piece: &Piece,
    board: &Board,
    player: &[Piece],
    opponent: &[Piece],
    color: Color,
    en_passant: Option<Position>,
) -> Vec<Position> {
    pseudo_legal_moves(piece, board, player, color, en_passant)
        .into_iter()
        .filter(|&dest| is_safe(piece, dest, board, player, opponent, color))
        .collect()
}

fn is_safe(
    piece: &Piece,
    dest: Position,
    board: &Board,
    player: &[Piece],
    opponent: &[Piece],
    color: Color,
) -> bool {
    let d_col = dest.col as i8 - piece.pos.col as i8;

    if piece.kind == PieceType::King && d_col.abs() >= 2 {
        // Castling: the king may not leave, cross, or enter an attacked
        // square. The path is empty, so no capture can happen.
        let Some(transit) = piece.pos.offset(0, d_col.signum()) else {
            return false;
        };

        !king_in_check(player, opponent, color)
            && !king_in_check(&relocated(player, piece.pos, transit), opponent, color)
            && !king_in_check(&relocated(player, piece.pos, dest), opponent, color)
    } else {
        // En passant removes the pawn behind the destination, every other
        // capture removes the occupant of the destination itself.
        let capture_square = if piece.kind == PieceType::Pawn
            && dest.col != piece.pos.col
            && board.is_empty(dest)
        {
            Position::new(piece.pos.row, dest.col)
        } else {
            dest
        };

        let after = relocated(player, piece.pos, dest);
        let remaining: PieceSet = opponent
            .iter()
            .copied()
            .filter(|p| p.pos != capture_square)
            .collect();

        !king_in_check(&after, &remaining, color)
    }
}

/// A copy of `player` with the piece on `from` standing on `to`.
fn relocated(player: &[Piece], from: Position, to: Position) -> PieceSet {
    player
        .iter()
        .copied()
        .map(|mut p| {
            if p.pos == from {
                p.pos = to;
                p.moved = true;
            }
            p
        })
        .collect()
}

fn pawn_moves(
    piece: &Piece,
    board: &Board,
    color: Color,
    en_passant: Option<Position>,
) -> Vec<Position> {
    let mut moves = Vec::new();
    let dir = color.pawn_direction();

    if let Some(one) = piece.pos.offset(dir, 0) {
        if board.is_empty(one) {
            moves.push(one);

            if !piece.moved {
                if let Some(two) = piece.pos.offset(2 * dir, 0) {
                    if board.is_empty(two) {
                        moves.push(two);
                    }
                }
            }
        }
    }

    for d_col in [-1, 1] {
        if let Some(diag) = piece.pos.offset(dir, d_col) {
            if board.holds_opponent(diag, color) {
                moves.push(diag);
            }
        }
    }

    // The en passant target is the square of the pawn that just
    // double-stepped; the capture lands one rank behind it.
    if let Some(ep) = en_passant {
        if ep.row == piece.pos.row && (ep.col as i8 - piece.pos.col as i8).abs() == 1 {
            if let Some(behind) = ep.offset(dir, 0) {
                moves.push(behind);
            }
        }
    }

    moves
}

fn knight_moves(piece: &Piece, board: &Board, color: Color) -> Vec<Position> {
    KNIGHT_OFFSETS
        .iter()
        .filter_map(|&(d_row, d_col)| piece.pos.offset(d_row, d_col))
        .filter(|&dest| board.is_empty(dest) || board.holds_opponent(dest, color))
        .collect()
}

fn sliding_moves(
    piece: &Piece,
    board: &Board,
    color: Color,
    directions: &[(i8, i8)],
) -> Vec<Position> {
    let mut moves = Vec::new();

    for &(d_row, d_col) in directions {
        let mut square = piece.pos;

        while let Some(next) = square.offset(d_row, d_col) {
            if board.is_empty(next) {
                moves.push(next);
                square = next;
                continue;
            }
            if board.holds_opponent(next, color) {
                moves.push(next);
            }
            break;
        }
    }

    moves
}

fn king_moves(piece: &Piece, board: &Board, player: &[Piece], color: Color) -> Vec<Position> {
    let mut moves = Vec::new();

    for d_row in -1..=1 {
        for d_col in -1..=1 {
            if d_row == 0 && d_col == 0 {
                continue;
            }
            if let Some(dest) = piece.pos.offset(d_row, d_col) {
                if board.is_empty(dest) || board.holds_opponent(dest, color) {
                    moves.push(dest);
                }
            }
        }
    }

    // Castling towards any own rook that has not moved, over an empty path.
    // Attack conditions are the legality filter's job.
    if !piece.moved {
        for rook in player
            .iter()
            .filter(|p| p.kind == PieceType::Rook && !p.moved && p.pos.row == piece.pos.row)
        {
            let dir = (rook.pos.col as i8 - piece.pos.col as i8).signum();
            if dir == 0 {
                continue;
            }

            let mut col = piece.pos.col as i8 + dir;
            let mut open = true;

            while col != rook.pos.col as i8 {
                if !board.is_empty(Position::new(piece.pos.row, col as u8)) {
                    open = false;
                    break;
                }
                col += dir;
            }

            if open {
                if let Some(dest) = piece.pos.offset(0, 2 * dir) {
                    moves.push(dest);
                }
            }
        }
    }

    moves
}
