use std::collections::HashMap;

use crate::attack::king_in_check;
use crate::board::Board;
use crate::color::Color;
use crate::moves::{self, MoveEffects};
use crate::notation::{self, Disambiguator};
use crate::pieces::{Piece, PieceSet, PieceType, piece_at, start_set};
use crate::position::Position;
use crate::snapshot::{GameSnapshot, RepetitionEntry, position_signature};
use crate::state::State;

use crate::errors::SnapshotError;

/// Plies without a pawn move or capture after which the game is drawn
/// (40 full moves per side).
const MOVE_RULE_LIMIT: u32 = 80;

/// A chosen move into a pawn's final rank, suspended until the promotion
/// piece arrives via [`Game::promote`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingPromotion {
    from: Position,
    to: Position,
}

/// The authoritative game state: two piece sets, whose turn it is, and the
/// bookkeeping the draw rules need. The board projection and the state
/// classification are derived values, refreshed after every mutation.
#[derive(Clone, Debug)]
pub struct Game {
    white: PieceSet,
    black: PieceSet,
    turn: Color,
    en_passant: Option<Position>,
    halfmove_clock: u32,
    turn_count: u32,
    repetition: HashMap<String, u32>,
    notation: String,
    id: Option<String>,

    selected: Option<Position>,
    pending: Option<PendingPromotion>,

    board: Board,
    state: State,
}

impl Game {
    pub fn new() -> Self {
        let white = start_set(Color::White);
        let black = start_set(Color::Black);
        let board = Board::from_sets(&white, &black);

        let mut repetition = HashMap::new();
        repetition.insert(position_signature(&board, Color::White), 1);

        Game {
            white,
            black,
            turn: Color::White,
            en_passant: None,
            halfmove_clock: 0,
            turn_count: 1,
            repetition,
            notation: String::new(),
            id: None,
            selected: None,
            pending: None,
            board,
            state: State::Running,
        }
    }

    /// Throw the position away and set up a fresh game.
    pub fn restart(&mut self) {
        *self = Game::new();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn en_passant(&self) -> Option<Position> {
        self.en_passant
    }

    pub fn notation(&self) -> &str {
        &self.notation
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    /// The file of a move waiting on a promotion choice, if any.
    pub fn promotion_column(&self) -> Option<u8> {
        self.pending.map(|p| p.to.col)
    }

    /// Occurrence counts per position signature since the last irreversible
    /// move.
    pub fn repetition_counts(&self) -> &HashMap<String, u32> {
        &self.repetition
    }

    /// Signature of the current position, keyed by placement plus side to
    /// move.
    pub fn signature(&self) -> String {
        position_signature(&self.board, self.turn)
    }

    fn sets(&self) -> (&PieceSet, &PieceSet) {
        match self.turn {
            Color::White => (&self.white, &self.black),
            Color::Black => (&self.black, &self.white),
        }
    }

    fn player_set_mut(&mut self) -> &mut PieceSet {
        match self.turn {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    fn opponent_set_mut(&mut self) -> &mut PieceSet {
        match self.turn {
            Color::White => &mut self.black,
            Color::Black => &mut self.white,
        }
    }

    /// Legal destinations for the side to move's piece on `pos`. Empty for
    /// anything else, and for everything once the game is over.
    pub fn legal_moves(&self, pos: Position) -> Vec<Position> {
        if self.state.is_terminal() {
            return Vec::new();
        }

        let (player, opponent) = self.sets();
        match piece_at(player, pos) {
            Some(piece) => moves::legal_moves(
                piece,
                &self.board,
                player,
                opponent,
                self.turn,
                self.en_passant,
            ),
            None => Vec::new(),
        }
    }

    /// Legal destinations of the currently selected piece.
    pub fn selected_moves(&self) -> Vec<Position> {
        match self.selected {
            Some(pos) => self.legal_moves(pos),
            None => Vec::new(),
        }
    }

    /// Selection input from an untrusted caller. Selecting an own piece
    /// highlights it; selecting a highlighted destination plays the move
    /// (or suspends it for a promotion choice); anything else clears the
    /// selection. Input while the game is over, or while a promotion choice
    /// is outstanding, is ignored.
    pub fn select(&mut self, pos: Position) {
        if self.state.is_terminal() || self.pending.is_some() || !pos.in_bounds() {
            return;
        }

        if let Some(from) = self.selected {
            if self.legal_moves(from).contains(&pos) {
                self.selected = None;

                let (player, _) = self.sets();
                if let Some(mover) = piece_at(player, from).copied() {
                    if mover.kind == PieceType::Pawn && pos.row == self.turn.promotion_row() {
                        self.pending = Some(PendingPromotion { from, to: pos });
                    } else {
                        self.execute(from, pos, None);
                    }
                }
                return;
            }
        }

        let (player, _) = self.sets();
        let target = piece_at(player, pos).map(|p| p.pos);
        self.selected = target;
    }

    /// Supply the piece type for a suspended promotion move. Ignored unless
    /// a promotion is pending and the type is one a pawn may become.
    pub fn promote(&mut self, kind: PieceType) {
        if self.state.is_terminal() || !kind.is_promotion_target() {
            return;
        }

        let Some(pending) = self.pending.take() else {
            return;
        };
        self.execute(pending.from, pending.to, Some(kind));
    }

    /// Post-move hooks run in a fixed order: apply the move, advance the
    /// clocks, toggle the side to move, refresh the derived state, append
    /// notation, then bump the turn counter.
    fn execute(&mut self, from: Position, to: Position, promotion: Option<PieceType>) {
        let (player, _) = self.sets();
        let Some(mover) = piece_at(player, from).copied() else {
            return;
        };

        let mover_is_white = self.turn.is_white();
        let token = self.move_token_for(&mover, to, promotion);

        let effects = self.apply_move(&mover, to, promotion);
        self.advance_clocks(effects);

        self.turn = self.turn.opposite();
        self.board = Board::from_sets(&self.white, &self.black);
        let signature = self.signature();
        *self.repetition.entry(signature).or_insert(0) += 1;
        self.state = self.classify();

        self.append_notation(&token, mover_is_white);

        if self.turn == Color::White {
            self.turn_count += 1;
        }
    }

    /// Mutate the piece sets and report what the ply did.
    fn apply_move(&mut self, mover: &Piece, to: Position, promotion: Option<PieceType>) -> MoveEffects {
        let from = mover.pos;
        let mut effects = MoveEffects::empty();

        let target_occupied = !self.board.is_empty(to);
        let double_step =
            mover.kind == PieceType::Pawn && (to.row as i8 - from.row as i8).abs() == 2;
        let en_passant_capture =
            mover.kind == PieceType::Pawn && !target_occupied && to.col != from.col;
        let castle =
            mover.kind == PieceType::King && (to.col as i8 - from.col as i8).abs() >= 2;

        if mover.kind == PieceType::Pawn {
            effects |= MoveEffects::PAWN_MOVE;
        }
        if matches!(mover.kind, PieceType::King | PieceType::Rook) && !mover.moved {
            effects |= MoveEffects::RIGHTS_CHANGE;
        }

        // The target is cleared on every executed move and only a double
        // step re-arms it.
        self.en_passant = None;
        if double_step {
            self.en_passant = Some(to);
            effects |= MoveEffects::DOUBLE_STEP;
        }

        if en_passant_capture {
            // The captured pawn stands behind the destination, on the
            // mover's own rank.
            let square = Position::new(from.row, to.col);
            self.opponent_set_mut().retain(|p| p.pos != square);
            effects |= MoveEffects::CAPTURE | MoveEffects::EN_PASSANT;
        } else if target_occupied {
            self.opponent_set_mut().retain(|p| p.pos != to);
            effects |= MoveEffects::CAPTURE;
        }

        if promotion.is_some() {
            effects |= MoveEffects::PROMOTION;
        }
        if castle {
            effects |= MoveEffects::CASTLE;
        }

        let set = self.player_set_mut();
        if let Some(piece) = set.iter_mut().find(|p| p.pos == from) {
            piece.pos = to;
            piece.moved = true;
            if let Some(kind) = promotion {
                piece.kind = kind;
            }
        }

        if castle {
            let dir = (to.col as i8 - from.col as i8).signum();
            // The rook comes to rest beside the king, on the side it
            // started from.
            if let Some(rook) = set.iter_mut().find(|p| {
                p.kind == PieceType::Rook
                    && !p.moved
                    && p.pos.row == from.row
                    && (p.pos.col as i8 - from.col as i8).signum() == dir
            }) {
                rook.pos = Position::new(to.row, (to.col as i8 - dir) as u8);
                rook.moved = true;
            }
        }

        effects
    }

    /// Conventional move-rule counting: only pawn moves and captures restart
    /// the clock. A first King or Rook move keeps the clock running but does
    /// clear the repetition table, because the position signature carries no
    /// castling rights and positions across a rights change must not compare
    /// equal.
    fn advance_clocks(&mut self, effects: MoveEffects) {
        if effects.intersects(MoveEffects::PAWN_MOVE | MoveEffects::CAPTURE) {
            self.halfmove_clock = 1;
            self.repetition.clear();
        } else {
            self.halfmove_clock += 1;
            if effects.contains(MoveEffects::RIGHTS_CHANGE) {
                self.repetition.clear();
            }
        }
    }

    /// Classify the position for the side to move, in rule-priority order.
    fn classify(&self) -> State {
        let (player, opponent) = self.sets();
        let checked = king_in_check(player, opponent, self.turn);

        let any_moves = player.iter().any(|piece| {
            !moves::legal_moves(
                piece,
                &self.board,
                player,
                opponent,
                self.turn,
                self.en_passant,
            )
            .is_empty()
        });

        if !any_moves {
            return if checked {
                State::CheckMate
            } else {
                State::StaleMate
            };
        }
        if self.halfmove_clock >= MOVE_RULE_LIMIT {
            return State::MoveRuleDraw;
        }
        if self.repetition.values().any(|&count| count >= 3) {
            return State::ThreeFoldRepetition;
        }
        if bare_material(&self.white) && bare_material(&self.black) {
            return State::InsufficientMaterial;
        }
        if checked { State::Check } else { State::Running }
    }

    /// SAN token for a move about to be played, computed against the
    /// pre-move position so disambiguation sees every rival mover.
    fn move_token_for(&self, mover: &Piece, to: Position, promotion: Option<PieceType>) -> String {
        if mover.kind == PieceType::King && (to.col as i8 - mover.pos.col as i8).abs() >= 2 {
            return notation::castle_token(to.col > mover.pos.col).to_string();
        }

        let target_occupied = !self.board.is_empty(to);
        let en_passant_capture =
            mover.kind == PieceType::Pawn && !target_occupied && to.col != mover.pos.col;
        let capture = target_occupied || en_passant_capture;

        let qualifier = if matches!(mover.kind, PieceType::Pawn | PieceType::King) {
            Disambiguator::None
        } else {
            let (player, opponent) = self.sets();
            let rivals: Vec<Position> = player
                .iter()
                .filter(|p| p.kind == mover.kind && p.pos != mover.pos)
                .filter(|p| {
                    moves::legal_moves(
                        p,
                        &self.board,
                        player,
                        opponent,
                        self.turn,
                        self.en_passant,
                    )
                    .contains(&to)
                })
                .map(|p| p.pos)
                .collect();
            notation::disambiguator(mover.pos, &rivals)
        };

        notation::move_token(mover.kind, mover.pos, to, capture, promotion, qualifier)
    }

    /// Append the finished token, its check or mate suffix, and the result
    /// tokens when the game just ended. White's tokens carry the move
    /// number.
    fn append_notation(&mut self, token: &str, mover_is_white: bool) {
        let (player, opponent) = self.sets();
        let checked = king_in_check(player, opponent, self.turn);

        if !self.notation.is_empty() {
            self.notation.push(' ');
        }
        if mover_is_white {
            self.notation.push_str(&self.turn_count.to_string());
            self.notation.push('.');
        }
        self.notation.push_str(token);

        if self.state == State::CheckMate {
            self.notation.push('#');
        } else if checked {
            self.notation.push('+');
        }

        if let Some(result) = self.state.result_token(self.turn.is_white()) {
            self.notation.push(' ');
            self.notation.push_str(result);
        }
    }

    /// Serializable copy of the full game state.
    pub fn snapshot(&self) -> GameSnapshot {
        let mut board_states: Vec<RepetitionEntry> = self
            .repetition
            .iter()
            .map(|(signature, &occurrences)| RepetitionEntry {
                signature: signature.clone(),
                occurrences,
            })
            .collect();
        board_states.sort_by(|a, b| a.signature.cmp(&b.signature));

        GameSnapshot {
            id: self.id.clone(),
            white_pieces: self.white.to_vec(),
            black_pieces: self.black.to_vec(),
            whites_turn: self.turn.is_white(),
            turn_count: self.turn_count,
            halfmove_clock: self.halfmove_clock,
            board_states,
            en_passant: self.en_passant,
            notation: self.notation.clone(),
        }
    }

    /// Replace the live state with a validated snapshot. On a validation
    /// error the current game is left exactly as it was.
    pub fn load(&mut self, snapshot: &GameSnapshot) -> Result<(), SnapshotError> {
        snapshot.validate()?;

        self.white = snapshot.white_pieces.iter().copied().collect();
        self.black = snapshot.black_pieces.iter().copied().collect();
        self.turn = if snapshot.whites_turn {
            Color::White
        } else {
            Color::Black
        };
        self.turn_count = snapshot.turn_count;
        self.halfmove_clock = snapshot.halfmove_clock;
        self.en_passant = snapshot.en_passant;
        self.notation = snapshot.notation.clone();
        self.id = snapshot.id.clone();
        self.repetition = snapshot
            .board_states
            .iter()
            .map(|e| (e.signature.clone(), e.occurrences))
            .collect();

        self.selected = None;
        self.pending = None;
        self.board = Board::from_sets(&self.white, &self.black);

        if self.repetition.is_empty() {
            self.repetition.insert(self.signature(), 1);
        }

        self.state = self.classify();
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Game(turn: {}, state: {})\n{}",
            self.turn, self.state, self.board
        )
    }
}

/// A side that could never mate on its own: at most the king plus one minor
/// piece.
fn bare_material(set: &[Piece]) -> bool {
    match set.len() {
        0 | 1 => true,
        2 => set
            .iter()
            .any(|p| matches!(p.kind, PieceType::Knight | PieceType::Bishop)),
        _ => false,
    }
}
