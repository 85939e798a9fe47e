use anyhow::{Context, Result};
use llmchess_infrastructure::{read_record, replay};
use std::path::Path;

use crate::console;

pub fn run(path: &Path) -> Result<()> {
    let record =
        read_record(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let board = replay(&record)
        .with_context(|| format!("{} does not replay from the initial position", path.display()))?;

    console::print_replay(&record, &board);

    if let Some(termination) = board.termination() {
        if termination.result() != record.result() {
            tracing::warn!(
                recorded = record.result().as_pgn(),
                board = termination.result().as_pgn(),
                "recorded result disagrees with final position"
            );
        }
    }

    Ok(())
}
