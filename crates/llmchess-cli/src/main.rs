use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod console;
mod logging;

#[derive(Parser)]
#[command(name = "llmchess")]
#[command(about = "LLM Chess - two language models play a game of chess", long_about = None)]
struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG wins when unset.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game between two models and write the PGN record
    Play(commands::play::PlayArgs),
    /// Replay a PGN record and show the final position
    Replay {
        /// Path to the PGN file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Play(args) => commands::play::run(args).await?,
        Commands::Replay { path } => commands::replay::run(&path)?,
    }

    Ok(())
}
