use anyhow::{Context, Result};
use clap::Args;
use llmchess_application::PlayGameUseCase;
use llmchess_core::{GameConfig, Provider};
use llmchess_infrastructure::{ConfigStorage, Credentials};
use llmchess_interaction::OpenAiCompatibleAgent;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::console::{self, ConsoleObserver};

#[derive(Args, Debug, Default)]
pub struct PlayArgs {
    /// Configuration file [default: ~/.config/llmchess/config.toml]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Completion provider: groq, openrouter or openai
    #[arg(long)]
    provider: Option<Provider>,

    #[arg(long)]
    white_model: Option<String>,

    #[arg(long)]
    black_model: Option<String>,

    /// Where to write the PGN record
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Minimum milliseconds between completion requests
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Failed selections tolerated before a random move is forced
    #[arg(long)]
    max_errors: Option<u32>,

    /// Stop after this many plies
    #[arg(long)]
    max_plies: Option<u32>,

    /// Seed for forced random moves
    #[arg(long)]
    seed: Option<u64>,

    /// Keep an agent's failed attempts in its conversation after a forced move
    #[arg(long)]
    keep_history_on_forced_move: bool,
}

impl PlayArgs {
    /// Flags override whatever the file said.
    fn apply(&self, config: &mut GameConfig) {
        if let Some(provider) = self.provider {
            config.provider = provider;
        }
        if let Some(model) = &self.white_model {
            config.white_model = model.clone();
        }
        if let Some(model) = &self.black_model {
            config.black_model = model.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(delay_ms) = self.delay_ms {
            config.min_delay_ms = delay_ms;
        }
        if let Some(max_errors) = self.max_errors {
            config.max_errors = max_errors;
        }
        if self.max_plies.is_some() {
            config.max_plies = self.max_plies;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.keep_history_on_forced_move {
            config.clear_on_forced_move = false;
        }
    }
}

fn load_config(args: &PlayArgs) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => ConfigStorage::with_path(path)
            .load()
            .with_context(|| format!("Failed to load {}", path.display()))?
            .with_context(|| format!("Config file {} is missing or empty", path.display()))?,
        None => ConfigStorage::new()?
            .load_or_default()
            .context("Failed to load default config")?,
    };
    args.apply(&mut config);
    config.validate()?;
    Ok(config)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InterruptAction {
    /// Finish the request in flight, then stop and save.
    Stop,
    /// Give up immediately; nothing is saved.
    Exit,
}

fn on_interrupt(cancel: &CancellationToken) -> InterruptAction {
    if cancel.is_cancelled() {
        InterruptAction::Exit
    } else {
        cancel.cancel();
        InterruptAction::Stop
    }
}

fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            match on_interrupt(&cancel) {
                InterruptAction::Stop => tracing::warn!(
                    "interrupt received, stopping after the current request (Ctrl-C again to quit now)"
                ),
                InterruptAction::Exit => {
                    tracing::warn!("second interrupt, exiting without writing the record");
                    std::process::exit(130);
                }
            }
        }
    });
}

pub async fn run(args: PlayArgs) -> Result<()> {
    let config = load_config(&args)?;

    let credentials = Credentials::load();
    let api_key = credentials.key_for(config.provider)?;
    let agent = OpenAiCompatibleAgent::for_provider(config.provider, api_key)
        .with_timeout(config.request_timeout())?;

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    console::print_header(&config);
    let usecase = PlayGameUseCase::new(config, Arc::new(agent)).with_cancellation(cancel);
    let played = usecase.execute(Box::new(ConsoleObserver)).await?;
    console::print_record_path(&played.record_path);

    Ok(())
}
