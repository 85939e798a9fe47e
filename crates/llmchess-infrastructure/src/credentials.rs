//! API credentials read once at startup.
//!
//! Values come from the process environment after a `.env` file (if any) has
//! been merged in. Which one is used depends on the selected [`Provider`].

use llmchess_core::{ChessError, Provider, Result};

/// Generic key used by OpenRouter-style endpoints.
pub const API_KEY_VAR: &str = "API_KEY";
/// Groq-specific key.
pub const GROQ_KEY_VAR: &str = "GROQ_KEY";
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Clone, Default)]
pub struct Credentials {
    api_key: Option<String>,
    groq_key: Option<String>,
    openai_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("groq_key", &self.groq_key.as_ref().map(|_| "<redacted>"))
            .field("openai_key", &self.openai_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    /// Loads `.env` from the working directory (if present), then reads the
    /// process environment.
    pub fn load() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(err) if err.not_found() => {}
            Err(err) => tracing::warn!(error = %err, "failed to read .env"),
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds credentials from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        Self {
            api_key: read(API_KEY_VAR),
            groq_key: read(GROQ_KEY_VAR),
            openai_key: read(OPENAI_KEY_VAR),
        }
    }

    /// The key the given provider authenticates with.
    pub fn key_for(&self, provider: Provider) -> Result<&str> {
        let key = match provider {
            Provider::Groq => self.groq_key.as_deref(),
            Provider::OpenRouter => self.api_key.as_deref(),
            Provider::OpenAi => self.openai_key.as_deref(),
        };
        key.ok_or_else(|| {
            ChessError::config(format!(
                "{} not found in environment or .env (required for provider '{}')",
                provider.credential_var(),
                provider.as_str()
            ))
        })
    }
}
