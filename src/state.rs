use std::fmt;

/// Classification of the position from the side to move's point of view.
///
/// `Running` and `Check` are the only states that accept further moves;
/// everything else ends the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum State {
    Running,
    Check,
    CheckMate,
    StaleMate,
    ThreeFoldRepetition,
    MoveRuleDraw,
    InsufficientMaterial,
}

impl State {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, State::Running | State::Check)
    }

    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            State::StaleMate
                | State::ThreeFoldRepetition
                | State::MoveRuleDraw
                | State::InsufficientMaterial
        )
    }

    /// The PGN result token closing the move log, if the game is over.
    /// On checkmate the side to move is the loser.
    pub fn result_token(&self, white_to_move: bool) -> Option<&'static str> {
        match self {
            State::CheckMate => Some(if white_to_move { "0-1" } else { "1-0" }),
            s if s.is_draw() => Some("1/2-1/2"),
            _ => None,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            State::Running => "running",
            State::Check => "check",
            State::CheckMate => "checkmate",
            State::StaleMate => "stalemate",
            State::ThreeFoldRepetition => "threefold_repetition",
            State::MoveRuleDraw => "move_rule_draw",
            State::InsufficientMaterial => "insufficient_material",
        };
        write!(f, "{}", s)
    }
}
