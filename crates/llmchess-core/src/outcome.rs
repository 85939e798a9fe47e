//! How a game ended and the result code it produces.

use serde::{Deserialize, Serialize};
use shakmaty::Color;
use std::fmt;

use crate::board::color_name;

/// PGN result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    /// Game abandoned or still in progress.
    Undecided,
}

impl GameResult {
    pub fn win_for(color: Color) -> Self {
        match color {
            Color::White => Self::WhiteWins,
            Color::Black => Self::BlackWins,
        }
    }

    pub fn as_pgn(&self) -> &'static str {
        match self {
            Self::WhiteWins => "1-0",
            Self::BlackWins => "0-1",
            Self::Draw => "1/2-1/2",
            Self::Undecided => "*",
        }
    }

    pub fn from_pgn(token: &str) -> Option<Self> {
        match token {
            "1-0" => Some(Self::WhiteWins),
            "0-1" => Some(Self::BlackWins),
            "1/2-1/2" => Some(Self::Draw),
            "*" => Some(Self::Undecided),
            _ => None,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_pgn())
    }
}

/// Why the game loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
    /// A draw became claimable after a move.
    ClaimableDraw,
    Resignation { loser: Color },
    Interrupted,
    /// The configured ply cap was reached.
    MoveLimit,
}

impl Termination {
    pub fn result(&self) -> GameResult {
        match self {
            Self::Checkmate { winner } => GameResult::win_for(*winner),
            Self::Resignation { loser } => GameResult::win_for(loser.other()),
            Self::Stalemate
            | Self::InsufficientMaterial
            | Self::SeventyFiveMoves
            | Self::FivefoldRepetition
            | Self::ClaimableDraw => GameResult::Draw,
            Self::Interrupted | Self::MoveLimit => GameResult::Undecided,
        }
    }

    /// Value for the PGN `Termination` tag.
    pub fn pgn_tag(&self) -> &'static str {
        match self {
            Self::Interrupted => "abandoned",
            Self::MoveLimit => "unterminated",
            _ => "normal",
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkmate { winner } => write!(f, "{} wins by checkmate.", color_name(*winner)),
            Self::Stalemate => f.write_str("The game is a draw by stalemate."),
            Self::InsufficientMaterial => {
                f.write_str("The game is a draw by insufficient material.")
            }
            Self::SeventyFiveMoves => f.write_str("The game is a draw by the seventy-five-move rule."),
            Self::FivefoldRepetition => f.write_str("The game is a draw by fivefold repetition."),
            Self::ClaimableDraw => f.write_str("The game is a draw."),
            Self::Resignation { loser } => write!(
                f,
                "{} resigns; {} wins.",
                color_name(*loser),
                color_name(loser.other())
            ),
            Self::Interrupted => f.write_str("The game was interrupted."),
            Self::MoveLimit => f.write_str("The move limit was reached."),
        }
    }
}
