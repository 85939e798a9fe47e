//! Use case: play one game and write its record.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use llmchess_core::{GameConfig, Termination};
use llmchess_infrastructure::write_record;
use llmchess_interaction::{CompletionClient, CompletionService, ExponentialBackoff};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::observer::GameObserver;
use crate::runner::GameRunner;
use crate::summary::GameSummary;

/// Finished game plus where its record went.
#[derive(Debug, Clone)]
pub struct PlayedGame {
    pub summary: GameSummary,
    pub record_path: PathBuf,
}

/// Wires a [`GameRunner`] to a completion service and persists the result.
///
/// The record is written for every ending, including interrupts. When the
/// loop itself fails the moves played so far are still written (marked
/// abandoned) before the error is returned.
pub struct PlayGameUseCase {
    config: GameConfig,
    service: Arc<dyn CompletionService>,
    cancel: CancellationToken,
    date: Option<NaiveDate>,
}

impl PlayGameUseCase {
    pub fn new(config: GameConfig, service: Arc<dyn CompletionService>) -> Self {
        Self {
            config,
            service,
            cancel: CancellationToken::new(),
            date: None,
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Fixes the record's date instead of using today's.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub async fn execute(&self, observer: Box<dyn GameObserver>) -> Result<PlayedGame> {
        let client = CompletionClient::new(self.service.clone())
            .with_min_delay(self.config.min_delay())
            .with_max_empty_retries(self.config.max_empty_retries)
            .with_max_service_retries(self.config.max_service_retries)
            .with_backoff(ExponentialBackoff::new(
                self.config.retry_base_delay(),
                self.config.retry_max_delay(),
            ));
        let mut runner = GameRunner::new(&self.config, client)
            .context("failed to set up game")?
            .with_observer(observer)
            .with_cancellation(self.cancel.clone());

        let outcome = runner.run().await;
        let summary = match &outcome {
            Ok(summary) => summary.clone(),
            Err(err) => {
                tracing::error!(error = %err, "game loop failed, saving moves played so far");
                runner.summary(Termination::Interrupted)
            }
        };

        let record_path = self.save(&summary)?;
        let summary = outcome.context("game loop failed")?;
        Ok(PlayedGame {
            summary,
            record_path,
        })
    }

    fn save(&self, summary: &GameSummary) -> Result<PathBuf> {
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        let record = summary
            .to_record(&self.config, date)
            .context("failed to build game record")?;
        let path = self.config.output.clone();
        write_record(&path, &record)
            .with_context(|| format!("failed to write game record to {}", path.display()))?;
        Ok(path)
    }
}
