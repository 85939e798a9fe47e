//! Board Describer: natural-language encodings of the game state.
//!
//! Every function here is a pure function of the board. The 1-indexed
//! [`LegalMoveList`] is the addressing scheme agents select moves with, so
//! its order must be exactly the rules engine's enumeration order.

use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Move, Position};
use std::fmt::Write as _;

use crate::board::{GameBoard, color_name, role_name, squares_top_down};
use crate::error::{ChessError, Result};

/// One-line sentence for a move played from `position`.
///
/// Castling is described by the king's origin and destination squares.
pub fn describe_move(position: &Chess, mv: &Move) -> Result<String> {
    let (from, to) = match mv.to_uci(CastlingMode::Standard) {
        UciMove::Normal { from, to, .. } => (from, to),
        _ => return Err(describe_error(position, mv)),
    };
    let piece = position
        .board()
        .piece_at(from)
        .ok_or_else(|| describe_error(position, mv))?;

    let mut description = format!(
        "{}'s {} moves from {} to {}",
        color_name(piece.color),
        role_name(piece.role),
        from,
        to
    );
    if let Some(captured) = mv.capture() {
        let _ = write!(
            description,
            ", capturing {}'s {}",
            color_name(piece.color.other()),
            role_name(captured)
        );
    }
    if let Some(promoted) = mv.promotion() {
        let _ = write!(description, " and promotes to {}", role_name(promoted));
    }
    Ok(description)
}

fn describe_error(position: &Chess, mv: &Move) -> ChessError {
    let board = format!(
        "{} to move\n{}",
        color_name(position.turn()),
        board_squares(position).trim_end()
    );
    tracing::error!(mv = ?mv, board = %board, "describer cannot render move");
    ChessError::Describe {
        mv: format!("{mv:?}"),
        board,
    }
}

/// Chronological, 1-indexed sentences for every applied move.
pub fn move_history(board: &GameBoard) -> Result<String> {
    let mut replay = Chess::default();
    let mut out = String::new();
    for (i, mv) in board.moves().iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, describe_move(&replay, mv)?);
        replay.play_unchecked(mv);
    }
    Ok(out)
}

/// "a8: Black Rook" style listing of all 64 squares, rank 8 first.
pub fn board_squares(position: &Chess) -> String {
    let board = position.board();
    let mut out = String::new();
    for square in squares_top_down() {
        match board.piece_at(square) {
            Some(piece) => {
                let _ = writeln!(
                    out,
                    "{}: {} {}",
                    square,
                    color_name(piece.color),
                    role_name(piece.role)
                );
            }
            None => {
                let _ = writeln!(out, "{square}: Empty");
            }
        }
    }
    out
}

/// A legal move with its 1-based address and both textual forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalMove {
    pub index: usize,
    pub mv: Move,
    pub description: String,
    pub san: String,
}

/// Snapshot of the legal moves for the side to move.
#[derive(Debug, Clone, Default)]
pub struct LegalMoveList {
    entries: Vec<LegalMove>,
}

impl LegalMoveList {
    pub fn generate(board: &GameBoard) -> Result<Self> {
        let position = board.position();
        let entries = board
            .legal_moves()
            .into_iter()
            .enumerate()
            .map(|(i, mv)| {
                Ok(LegalMove {
                    index: i + 1,
                    description: describe_move(position, &mv)?,
                    san: board.san(&mv),
                    mv,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a 1-based index; 0 and anything past the end are `None`.
    pub fn get(&self, index: usize) -> Option<&LegalMove> {
        index.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LegalMove> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[LegalMove] {
        &self.entries
    }

    /// "N. description (SAN)" lines as shown to the agent.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let _ = writeln!(out, "{}. {} ({})", entry.index, entry.description, entry.san);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(board: &mut GameBoard, sans: &[&str]) {
        for san in sans {
            let mv = board.parse_san(san).unwrap();
            board.push(&mv).unwrap();
        }
    }

    fn find<'a>(list: &'a LegalMoveList, san: &str) -> &'a LegalMove {
        list.iter().find(|entry| entry.san == san).unwrap()
    }

    #[test]
    fn test_list_matches_engine_order() {
        let mut board = GameBoard::new();
        play(&mut board, &["e4", "d5"]);
        let list = LegalMoveList::generate(&board).unwrap();
        let engine = board.legal_moves();
        assert_eq!(list.len(), engine.len());
        for (i, mv) in engine.iter().enumerate() {
            assert_eq!(&list.get(i + 1).unwrap().mv, mv);
            assert_eq!(list.get(i + 1).unwrap().index, i + 1);
        }
        assert!(list.get(0).is_none());
        assert!(list.get(engine.len() + 1).is_none());
    }

    #[test]
    fn test_describe_capture() {
        let mut board = GameBoard::new();
        play(&mut board, &["e4", "d5"]);
        let list = LegalMoveList::generate(&board).unwrap();
        assert_eq!(
            find(&list, "exd5").description,
            "White's Pawn moves from e4 to d5, capturing Black's Pawn"
        );
    }

    #[test]
    fn test_describe_castling_uses_king_squares() {
        let mut board = GameBoard::new();
        play(&mut board, &["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5"]);
        let list = LegalMoveList::generate(&board).unwrap();
        assert_eq!(
            find(&list, "O-O").description,
            "White's King moves from e1 to g1"
        );
    }

    #[test]
    fn test_describe_promotion() {
        let mut board = GameBoard::new();
        play(
            &mut board,
            &["h4", "g5", "hxg5", "Nf6", "gxf6", "Rg8", "fxe7", "Rh8"],
        );
        let list = LegalMoveList::generate(&board).unwrap();
        assert_eq!(
            find(&list, "exd8=Q+").description,
            "White's Pawn moves from e7 to d8, capturing Black's Queen and promotes to Queen"
        );
        assert_eq!(
            find(&list, "exf8=N").description,
            "White's Pawn moves from e7 to f8, capturing Black's Bishop and promotes to Knight"
        );
    }

    #[test]
    fn test_move_history_is_one_indexed() {
        let mut board = GameBoard::new();
        play(&mut board, &["Nf3", "e5"]);
        let history = move_history(&board).unwrap();
        assert_eq!(
            history,
            "1. White's Knight moves from g1 to f3\n2. Black's Pawn moves from e7 to e5\n"
        );
        assert_eq!(move_history(&GameBoard::new()).unwrap(), "");
    }

    #[test]
    fn test_board_squares_listing() {
        let listing = board_squares(GameBoard::new().position());
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 64);
        assert_eq!(lines[0], "a8: Black Rook");
        assert_eq!(lines[4], "e8: Black King");
        assert_eq!(lines[16], "a6: Empty");
        assert_eq!(lines[63], "h1: White Rook");
    }

    #[test]
    fn test_render_lists_san() {
        let list = LegalMoveList::generate(&GameBoard::new()).unwrap();
        let rendered = list.render();
        assert_eq!(rendered.lines().count(), 20);
        assert!(rendered.starts_with("1. "));
        assert!(rendered.contains("White's Knight moves from g1 to f3 (Nf3)"));
    }
}
