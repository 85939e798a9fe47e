//! Move Resolution: maps an agent's selector onto the board.
//!
//! Per turn the loop goes `AwaitingSelector -> {Resigned, Applied, Retry,
//! ForcedRandom}`. [`resolve`] produces the first three as a [`TurnOutcome`];
//! the [`ErrorCounter`] decides when a retry escalates to [`force_random`].
//! These two functions are the only places the board is mutated.

use rand::Rng;
use rand::seq::SliceRandom;
use std::num::IntErrorKind;

use crate::board::{GameBoard, MoveError};
use crate::describe::{LegalMove, LegalMoveList};

/// Commentary recorded for a move the agent did not choose.
pub const FORCED_MOVE_COMMENT: &str = "Too many errors occurred, and I made a random move.";

pub const ILLEGAL_MOVE_MESSAGE: &str = "That was not a legal move. Try again.";
pub const INVALID_MOVE_MESSAGE: &str = "That was not a syntactically-valid move. Try again.";
pub const OUT_OF_RANGE_MESSAGE: &str = "That move was out of range. Try again.";

/// Failures tolerated before a random move is forced.
pub const DEFAULT_MAX_ERRORS: u32 = 3;

const RESIGN_KEYWORD: &str = "resign";

/// The agent's raw move choice, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Resign,
    /// 1-based index into the legal-move list, not yet bounds-checked.
    Index(i64),
    Unparseable(String),
}

impl Selector {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case(RESIGN_KEYWORD) {
            return Self::Resign;
        }
        match trimmed.parse::<i64>() {
            Ok(index) => Self::Index(index),
            // Still a number, just one no list is long enough for.
            Err(err) if *err.kind() == IntErrorKind::PosOverflow => Self::Index(i64::MAX),
            Err(err) if *err.kind() == IntErrorKind::NegOverflow => Self::Index(i64::MIN),
            Err(_) => Self::Unparseable(trimmed.to_string()),
        }
    }
}

/// Tagged result of resolving one selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Applied(LegalMove),
    IllegalMove,
    InvalidNotation,
    OutOfRange,
    Resigned,
}

impl TurnOutcome {
    pub fn is_error(&self) -> bool {
        self.corrective_message().is_some()
    }

    /// System message fed back to the agent after a failed selection.
    pub fn corrective_message(&self) -> Option<&'static str> {
        match self {
            Self::IllegalMove => Some(ILLEGAL_MOVE_MESSAGE),
            Self::InvalidNotation => Some(INVALID_MOVE_MESSAGE),
            Self::OutOfRange => Some(OUT_OF_RANGE_MESSAGE),
            Self::Applied(_) | Self::Resigned => None,
        }
    }
}

/// Resolves `selector` against `legal` and applies the move on success.
///
/// `legal` must be the list that was shown to the agent for this board.
pub fn resolve(board: &mut GameBoard, legal: &LegalMoveList, selector: &Selector) -> TurnOutcome {
    let index = match selector {
        Selector::Resign => return TurnOutcome::Resigned,
        Selector::Unparseable(_) => return TurnOutcome::InvalidNotation,
        Selector::Index(index) => *index,
    };
    let Some(entry) = usize::try_from(index).ok().and_then(|i| legal.get(i)) else {
        return TurnOutcome::OutOfRange;
    };
    match board.push(&entry.mv) {
        Ok(()) => TurnOutcome::Applied(entry.clone()),
        Err(MoveError::Illegal) => TurnOutcome::IllegalMove,
        Err(MoveError::InvalidNotation) => TurnOutcome::InvalidNotation,
    }
}

/// Plays a uniformly random entry of `legal`. `None` if there is nothing to play.
pub fn force_random<R: Rng + ?Sized>(
    board: &mut GameBoard,
    legal: &LegalMoveList,
    rng: &mut R,
) -> Option<LegalMove> {
    let entry = legal.as_slice().choose(rng)?;
    board.push(&entry.mv).ok()?;
    Some(entry.clone())
}

/// Consecutive resolution failures within one unresolved turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCounter {
    count: u32,
    threshold: u32,
}

impl Default for ErrorCounter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ERRORS)
    }
}

impl ErrorCounter {
    pub fn new(threshold: u32) -> Self {
        Self {
            count: 0,
            threshold,
        }
    }

    /// Counts a failure; `true` once the count exceeds the threshold.
    pub fn record_failure(&mut self) -> bool {
        self.count += 1;
        self.count > self.threshold
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use shakmaty::Color;

    fn opening() -> (GameBoard, LegalMoveList) {
        let board = GameBoard::new();
        let legal = LegalMoveList::generate(&board).unwrap();
        (board, legal)
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!(Selector::parse("ReSiGn"), Selector::Resign);
        assert_eq!(Selector::parse(" 7\n"), Selector::Index(7));
        assert_eq!(Selector::parse("-2"), Selector::Index(-2));
        assert_eq!(
            Selector::parse("e4"),
            Selector::Unparseable("e4".to_string())
        );
        assert_eq!(Selector::parse(""), Selector::Unparseable(String::new()));
    }

    #[test]
    fn test_every_index_resolves_to_that_entry() {
        let (_, legal) = opening();
        for n in 1..=legal.len() {
            let mut board = GameBoard::new();
            let outcome = resolve(&mut board, &legal, &Selector::Index(n as i64));
            assert_eq!(outcome, TurnOutcome::Applied(legal.get(n).unwrap().clone()));
            assert_eq!(board.moves(), &[legal.get(n).unwrap().mv.clone()]);
        }
    }

    #[test]
    fn test_out_of_range_leaves_board_untouched() {
        let (mut board, legal) = opening();
        assert_eq!(legal.len(), 20);
        for index in [0, 21, 99, -1] {
            let outcome = resolve(&mut board, &legal, &Selector::Index(index));
            assert_eq!(outcome, TurnOutcome::OutOfRange);
            assert_eq!(outcome.corrective_message(), Some(OUT_OF_RANGE_MESSAGE));
        }
        assert_eq!(board.ply(), 0);
        assert_eq!(board.turn(), Color::White);
    }

    #[test]
    fn test_oversized_number_is_out_of_range() {
        let (mut board, legal) = opening();
        assert_eq!(Selector::parse("99999999999999999999"), Selector::Index(i64::MAX));
        assert_eq!(Selector::parse("-99999999999999999999"), Selector::Index(i64::MIN));
        for raw in ["99999999999999999999", "-99999999999999999999"] {
            let outcome = resolve(&mut board, &legal, &Selector::parse(raw));
            assert_eq!(outcome, TurnOutcome::OutOfRange);
            assert_eq!(outcome.corrective_message(), Some(OUT_OF_RANGE_MESSAGE));
        }
        assert_eq!(board.ply(), 0);
    }

    #[test]
    fn test_unparseable_selector_is_invalid_notation() {
        let (mut board, legal) = opening();
        let outcome = resolve(&mut board, &legal, &Selector::parse("e4"));
        assert_eq!(outcome, TurnOutcome::InvalidNotation);
        assert_eq!(outcome.corrective_message(), Some(INVALID_MOVE_MESSAGE));
        assert_eq!(board.ply(), 0);
    }

    #[test]
    fn test_stale_list_is_rejected_as_illegal() {
        let (mut board, legal) = opening();
        let e4 = board.parse_san("e4").unwrap();
        board.push(&e4).unwrap();
        // White's opening list no longer applies once Black is to move.
        let outcome = resolve(&mut board, &legal, &Selector::Index(1));
        assert_eq!(outcome, TurnOutcome::IllegalMove);
        assert_eq!(outcome.corrective_message(), Some(ILLEGAL_MOVE_MESSAGE));
        assert_eq!(board.ply(), 1);
    }

    #[test]
    fn test_resign_does_not_touch_board() {
        let (mut board, legal) = opening();
        let outcome = resolve(&mut board, &legal, &Selector::parse("RESIGN"));
        assert_eq!(outcome, TurnOutcome::Resigned);
        assert!(!outcome.is_error());
        assert_eq!(board.ply(), 0);
    }

    #[test]
    fn test_error_counter_escalates_on_fourth_failure() {
        let mut counter = ErrorCounter::default();
        assert!(!counter.record_failure());
        assert!(!counter.record_failure());
        assert!(!counter.record_failure());
        assert!(counter.record_failure());
        assert_eq!(counter.count(), 4);
        counter.reset();
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_force_random_plays_a_listed_move() {
        let (mut board, legal) = opening();
        let mut rng = StdRng::seed_from_u64(7);
        let forced = force_random(&mut board, &legal, &mut rng).unwrap();
        assert!(legal.iter().any(|entry| entry == &forced));
        assert_eq!(board.turn(), Color::Black);
        assert!(force_random(&mut GameBoard::new(), &LegalMoveList::default(), &mut rng).is_none());
    }
}
