//! Game configuration model.
//!
//! Every field has a default so a partial `config.toml` (or none at all) is
//! valid. Loading from disk lives in `llmchess-infrastructure`.

use serde::{Deserialize, Serialize};
use shakmaty::Color;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ChessError, Result};
use crate::resolution::DEFAULT_MAX_ERRORS;

pub const DEFAULT_MODEL: &str = "llama-3.1-70b-versatile";
pub const DEFAULT_OUTPUT: &str = "game.pgn";
pub const DEFAULT_MAX_EMPTY_RETRIES: u32 = 10;
pub const DEFAULT_MAX_SERVICE_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 500;
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 8_000;

/// OpenAI-compatible endpoints the completion client can talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Groq,
    OpenRouter,
    OpenAi,
}

impl Provider {
    pub fn base_url(&self) -> &'static str {
        match self {
            Provider::Groq => "https://api.groq.com/openai/v1",
            Provider::OpenRouter => "https://openrouter.ai/api/v1",
            Provider::OpenAi => "https://api.openai.com/v1",
        }
    }

    /// Environment variable holding this provider's credential.
    pub fn credential_var(&self) -> &'static str {
        match self {
            Provider::Groq => "GROQ_KEY",
            Provider::OpenRouter => "API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Groq => "groq",
            Provider::OpenRouter => "openrouter",
            Provider::OpenAi => "openai",
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "groq" => Ok(Provider::Groq),
            "openrouter" => Ok(Provider::OpenRouter),
            "openai" => Ok(Provider::OpenAi),
            other => Err(ChessError::config(format!("unknown provider '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub provider: Provider,
    pub white_model: String,
    pub black_model: String,
    /// Minimum spacing between completion calls; 0 disables the throttle.
    pub min_delay_ms: u64,
    /// Consecutive selector failures tolerated before a random move is forced.
    pub max_errors: u32,
    /// Retries after an empty choice set before giving up.
    pub max_empty_retries: u32,
    /// Retries after a rate-limit, server or connection error before giving up.
    pub max_service_retries: u32,
    /// First retry delay when the server gives no `Retry-After`; doubles per attempt.
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
    /// Clear the agent's conversation after a forced random move too.
    pub clear_on_forced_move: bool,
    pub max_plies: Option<u32>,
    pub request_timeout_secs: u64,
    pub seed: Option<u64>,
    pub output: PathBuf,
    pub event: String,
    pub site: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            white_model: DEFAULT_MODEL.to_string(),
            black_model: DEFAULT_MODEL.to_string(),
            min_delay_ms: 0,
            max_errors: DEFAULT_MAX_ERRORS,
            max_empty_retries: DEFAULT_MAX_EMPTY_RETRIES,
            max_service_retries: DEFAULT_MAX_SERVICE_RETRIES,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
            retry_max_delay_ms: DEFAULT_RETRY_MAX_DELAY_MS,
            clear_on_forced_move: true,
            max_plies: None,
            request_timeout_secs: 120,
            seed: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            event: "AI Chess Game".to_string(),
            site: "Local".to_string(),
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.white_model.trim().is_empty() || self.black_model.trim().is_empty() {
            return Err(ChessError::config("model identifiers must not be empty"));
        }
        if self.max_plies == Some(0) {
            return Err(ChessError::config("max_plies must be at least 1"));
        }
        Ok(())
    }

    pub fn model_for(&self, color: Color) -> &str {
        match color {
            Color::White => &self.white_model,
            Color::Black => &self.black_model,
        }
    }

    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub fn retry_max_delay(&self) -> Duration {
        Duration::from_millis(self.retry_max_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_setup() {
        let config = GameConfig::default();
        assert_eq!(config.provider, Provider::Groq);
        assert_eq!(config.model_for(Color::White), DEFAULT_MODEL);
        assert_eq!(config.min_delay(), Duration::ZERO);
        assert_eq!(config.max_errors, 3);
        assert_eq!(config.max_service_retries, 2);
        assert_eq!(config.retry_base_delay(), Duration::from_millis(500));
        assert!(config.clear_on_forced_move);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
provider = "openrouter"
black_model = "meta-llama/llama-3.1-8b-instruct"
min_delay_ms = 1500
"#,
        )
        .unwrap();
        assert_eq!(config.provider, Provider::OpenRouter);
        assert_eq!(config.model_for(Color::White), DEFAULT_MODEL);
        assert_eq!(
            config.model_for(Color::Black),
            "meta-llama/llama-3.1-8b-instruct"
        );
        assert_eq!(config.min_delay(), Duration::from_millis(1500));
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
    }

    #[test]
    fn test_rejects_empty_model() {
        let err = GameConfig::from_toml_str("white_model = \"  \"").unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("Groq".parse::<Provider>().unwrap(), Provider::Groq);
        assert_eq!("openai".parse::<Provider>().unwrap().credential_var(), "OPENAI_API_KEY");
        assert!("anthropic".parse::<Provider>().is_err());
    }
}
