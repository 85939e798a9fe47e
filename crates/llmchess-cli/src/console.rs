//! What the player sees on stdout.

use colored::Colorize;
use llmchess_application::{GameEvent, GameObserver};
use llmchess_core::{GameBoard, GameConfig, color_name};
use llmchess_infrastructure::GameRecord;
use std::path::Path;

pub fn print_header(config: &GameConfig) {
    println!("{}", "=== LLM Chess ===".bright_magenta().bold());
    println!("{} {}", "White:".bold(), config.white_model);
    println!("{} {}", "Black:".bold(), config.black_model);
    println!("{} {}", "Provider:".dimmed(), config.provider.as_str());
    println!();
}

pub fn print_record_path(path: &Path) {
    println!("{} {}", "Game record written to".dimmed(), path.display());
}

/// Prints game progress as it happens.
pub struct ConsoleObserver;

impl GameObserver for ConsoleObserver {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::MoveApplied {
                ply,
                description,
                san,
                forced,
                ..
            } => {
                let line = format!("{ply:>3}. {description} ({san})");
                if *forced {
                    println!("{}", line.yellow());
                } else {
                    println!("{}", line.green());
                }
            }
            GameEvent::Board { diagram } => println!("{diagram}\n"),
            GameEvent::InvalidSelector {
                color,
                selector,
                message,
                errors,
            } => println!(
                "{}",
                format!(
                    "{}: {message} (selector {selector:?}, {errors} in a row)",
                    color_name(*color)
                )
                .yellow()
            ),
            GameEvent::ForcedMove { color } => println!(
                "{}",
                format!("Too many errors from {}, making random move.", color_name(*color)).red()
            ),
            GameEvent::Resigned { color } => {
                println!("{}", format!("{} resigns", color_name(*color)).red().bold())
            }
            GameEvent::GameOver {
                termination,
                result,
            } => println!("{} {}", termination.to_string().bold(), result.as_pgn().cyan()),
            GameEvent::Usage { usage, calls } => println!(
                "Used {} input tokens and {} output tokens over {calls} requests.",
                usage.input, usage.output
            ),
        }
    }
}

pub fn print_replay(record: &GameRecord, board: &GameBoard) {
    for (name, value) in record.headers() {
        println!("{} {}", format!("{name}:").dimmed(), value);
    }
    println!();

    for (ply, (san, comment)) in record.moves().iter().zip(record.comments()).enumerate() {
        let number = if ply % 2 == 0 {
            format!("{}.", ply / 2 + 1)
        } else {
            format!("{}...", ply / 2 + 1)
        };
        if comment.is_empty() {
            println!("{number} {}", san.green());
        } else {
            println!("{number} {} {}", san.green(), comment.dimmed());
        }
    }
    println!();
    println!("{}\n", board.unicode());

    match board.termination() {
        Some(termination) => println!("{}", termination.to_string().bold()),
        None if board.can_claim_draw() => println!("{}", "A draw can be claimed.".bold()),
        None => println!("{}", "The game did not reach a finished position.".bold()),
    }
    println!("{} {}", "Recorded result:".dimmed(), record.result().as_pgn().cyan());
}
