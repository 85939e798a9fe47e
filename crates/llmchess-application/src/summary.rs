//! What a finished game leaves behind.

use chrono::NaiveDate;
use llmchess_core::{GameConfig, GameResult, Result, Termination, TokenUsage};
use llmchess_infrastructure::GameRecord;

/// Final state of one game: how it ended, the moves in SAN with their
/// commentary, and the token totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub termination: Termination,
    pub result: GameResult,
    pub moves: Vec<String>,
    pub comments: Vec<String>,
    pub usage: TokenUsage,
    pub calls: u64,
    pub white_model: String,
    pub black_model: String,
}

impl GameSummary {
    /// Builds the PGN record, headers taken from `config`.
    pub fn to_record(&self, config: &GameConfig, date: NaiveDate) -> Result<GameRecord> {
        let record = GameRecord::new(self.moves.clone(), self.comments.clone(), self.result)?
            .with_header("Event", config.event.as_str())
            .with_header("Site", config.site.as_str())
            .with_date(date)
            .with_header("Round", "1")
            .with_header("White", format!("AI White ({})", self.white_model))
            .with_header("Black", format!("AI Black ({})", self.black_model))
            .with_header("Termination", self.termination.pgn_tag());
        Ok(record)
    }
}
