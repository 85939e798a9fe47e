//! Game board backed by the `shakmaty` rules engine.
//!
//! `shakmaty::Chess` knows legality but not history, so [`GameBoard`] keeps the
//! applied move stack and a repetition table next to the position. That is
//! enough to answer the draw-claim and game-over questions the game loop asks
//! after every turn.

use shakmaty::san::SanPlus;
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{Chess, Color, EnPassantMode, File, Move, Piece, Position, Rank, Role, Square};
use std::collections::HashMap;
use thiserror::Error;

use crate::outcome::Termination;

/// Display name of a side, as used in prompts and the game record.
pub fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

/// Capitalized piece name ("Knight", "Queen", ...).
pub fn role_name(role: Role) -> &'static str {
    match role {
        Role::Pawn => "Pawn",
        Role::Knight => "Knight",
        Role::Bishop => "Bishop",
        Role::Rook => "Rook",
        Role::Queen => "Queen",
        Role::King => "King",
    }
}

fn piece_symbol(piece: Piece) -> char {
    match (piece.color, piece.role) {
        (Color::White, Role::King) => '♔',
        (Color::White, Role::Queen) => '♕',
        (Color::White, Role::Rook) => '♖',
        (Color::White, Role::Bishop) => '♗',
        (Color::White, Role::Knight) => '♘',
        (Color::White, Role::Pawn) => '♙',
        (Color::Black, Role::King) => '♚',
        (Color::Black, Role::Queen) => '♛',
        (Color::Black, Role::Rook) => '♜',
        (Color::Black, Role::Bishop) => '♝',
        (Color::Black, Role::Knight) => '♞',
        (Color::Black, Role::Pawn) => '♟',
    }
}

/// Squares in describer order: rank 8 down to rank 1, file a to h.
pub fn squares_top_down() -> impl Iterator<Item = Square> {
    (0..8u32).rev().flat_map(|rank| {
        (0..8u32).map(move |file| Square::from_coords(File::new(file), Rank::new(rank)))
    })
}

/// Rejections signalled by the rules engine.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// Well-formed, but not playable in the current position.
    #[error("illegal move")]
    Illegal,
    /// Not a syntactically valid move.
    #[error("invalid move notation")]
    InvalidNotation,
}

/// The single mutable board of a game.
#[derive(Debug, Clone)]
pub struct GameBoard {
    position: Chess,
    moves: Vec<Move>,
    repetitions: HashMap<Zobrist64, u32>,
}

impl Default for GameBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBoard {
    /// Creates a board in the standard starting position.
    pub fn new() -> Self {
        let position = Chess::default();
        let mut repetitions = HashMap::new();
        repetitions.insert(position_key(&position), 1);
        Self {
            position,
            moves: Vec::new(),
            repetitions,
        }
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    /// Side to move.
    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    /// Applied moves, oldest first.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Number of half-moves played so far.
    pub fn ply(&self) -> usize {
        self.moves.len()
    }

    /// Legal moves in the engine's native enumeration order.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.position.legal_moves().into_iter().collect()
    }

    /// Applies a move, rejecting it if the engine considers it illegal.
    pub fn push(&mut self, mv: &Move) -> Result<(), MoveError> {
        if !self.position.is_legal(mv) {
            return Err(MoveError::Illegal);
        }
        self.position.play_unchecked(mv);
        self.moves.push(mv.clone());
        *self
            .repetitions
            .entry(position_key(&self.position))
            .or_insert(0) += 1;
        Ok(())
    }

    /// Parses standard algebraic notation against the current position.
    pub fn parse_san(&self, text: &str) -> Result<Move, MoveError> {
        let san: SanPlus = text
            .trim()
            .parse()
            .map_err(|_| MoveError::InvalidNotation)?;
        san.san
            .to_move(&self.position)
            .map_err(|_| MoveError::Illegal)
    }

    /// SAN (with check/mate suffix) of a move in the current position.
    pub fn san(&self, mv: &Move) -> String {
        let mut scratch = self.position.clone();
        SanPlus::from_move_and_play_unchecked(&mut scratch, mv).to_string()
    }

    /// SAN of every applied move, replayed from the starting position.
    pub fn san_history(&self) -> Vec<String> {
        let mut scratch = Chess::default();
        self.moves
            .iter()
            .map(|mv| SanPlus::from_move_and_play_unchecked(&mut scratch, mv).to_string())
            .collect()
    }

    pub fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    /// Either side may claim a draw by the fifty-move rule or threefold
    /// repetition, now or with their next move.
    pub fn can_claim_draw(&self) -> bool {
        self.can_claim_fifty_moves() || self.can_claim_threefold_repetition()
    }

    fn can_claim_fifty_moves(&self) -> bool {
        let legal = self.position.legal_moves();
        if legal.is_empty() {
            return false;
        }
        let halfmoves = self.position.halfmoves();
        if halfmoves >= 100 {
            return true;
        }
        halfmoves >= 99 && legal.iter().any(|mv| !mv.is_zeroing())
    }

    fn can_claim_threefold_repetition(&self) -> bool {
        if self.repetition_count(&self.position) >= 3 {
            return true;
        }
        self.position.legal_moves().iter().any(|mv| {
            let mut next = self.position.clone();
            next.play_unchecked(mv);
            self.repetition_count(&next) >= 2
        })
    }

    fn repetition_count(&self, position: &Chess) -> u32 {
        self.repetitions
            .get(&position_key(position))
            .copied()
            .unwrap_or(0)
    }

    /// Game-ending condition reached without any claim, if any.
    pub fn termination(&self) -> Option<Termination> {
        if self.position.is_checkmate() {
            return Some(Termination::Checkmate {
                winner: self.turn().other(),
            });
        }
        if self.position.is_stalemate() {
            return Some(Termination::Stalemate);
        }
        if self.position.is_insufficient_material() {
            return Some(Termination::InsufficientMaterial);
        }
        if self.position.halfmoves() >= 150 {
            return Some(Termination::SeventyFiveMoves);
        }
        if self.repetition_count(&self.position) >= 5 {
            return Some(Termination::FivefoldRepetition);
        }
        None
    }

    pub fn is_game_over(&self) -> bool {
        self.termination().is_some()
    }

    /// Unicode diagram, rank 8 first, one space between squares.
    pub fn unicode(&self) -> String {
        let board = self.position.board();
        let mut rows = Vec::with_capacity(8);
        for rank in (0..8u32).rev() {
            let row: Vec<String> = (0..8u32)
                .map(|file| {
                    let square = Square::from_coords(File::new(file), Rank::new(rank));
                    board
                        .piece_at(square)
                        .map_or(' ', piece_symbol)
                        .to_string()
                })
                .collect();
            rows.push(row.join(" "));
        }
        rows.join("\n")
    }
}

fn position_key(position: &Chess) -> Zobrist64 {
    position.zobrist_hash(EnPassantMode::Legal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(board: &mut GameBoard, sans: &[&str]) {
        for san in sans {
            let mv = board.parse_san(san).expect("valid san");
            board.push(&mv).expect("legal move");
        }
    }

    #[test]
    fn test_new_board_has_twenty_moves() {
        let board = GameBoard::new();
        assert_eq!(board.turn(), Color::White);
        assert_eq!(board.legal_moves().len(), 20);
        assert!(board.moves().is_empty());
        assert!(!board.is_game_over());
    }

    #[test]
    fn test_push_rejects_illegal_move() {
        let mut board = GameBoard::new();
        let black_reply = {
            let mut other = GameBoard::new();
            play(&mut other, &["e4"]);
            other.parse_san("e5").unwrap()
        };
        assert_eq!(board.push(&black_reply), Err(MoveError::Illegal));
        assert_eq!(board.ply(), 0);
    }

    #[test]
    fn test_parse_san_distinguishes_errors() {
        let board = GameBoard::new();
        assert_eq!(board.parse_san("hello"), Err(MoveError::InvalidNotation));
        assert_eq!(board.parse_san("Qh5"), Err(MoveError::Illegal));
        assert!(board.parse_san("Nf3").is_ok());
    }

    #[test]
    fn test_san_history_and_checkmate() {
        let mut board = GameBoard::new();
        play(&mut board, &["f3", "e5", "g4", "Qh4#"]);
        assert_eq!(board.san_history(), vec!["f3", "e5", "g4", "Qh4#"]);
        assert!(board.is_checkmate());
        assert_eq!(
            board.termination(),
            Some(Termination::Checkmate {
                winner: Color::Black
            })
        );
    }

    #[test]
    fn test_threefold_claim_available_one_move_early() {
        let mut board = GameBoard::new();
        play(&mut board, &["Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6"]);
        assert!(!board.can_claim_draw());
        play(&mut board, &["Ng1"]);
        // Ng8 would repeat the starting position a third time.
        assert!(board.can_claim_draw());
        assert!(!board.is_game_over());
    }

    #[test]
    fn test_unicode_layout() {
        let board = GameBoard::new();
        let diagram = board.unicode();
        let rows: Vec<&str> = diagram.lines().collect();
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0], "♜ ♞ ♝ ♛ ♚ ♝ ♞ ♜");
        assert_eq!(rows[7], "♖ ♘ ♗ ♕ ♔ ♗ ♘ ♖");
        assert_eq!(rows[3], "               ");
    }

    #[test]
    fn test_squares_top_down_order() {
        let squares: Vec<String> = squares_top_down().map(|sq| sq.to_string()).collect();
        assert_eq!(squares.len(), 64);
        assert_eq!(squares[0], "a8");
        assert_eq!(squares[7], "h8");
        assert_eq!(squares[63], "h1");
    }
}
