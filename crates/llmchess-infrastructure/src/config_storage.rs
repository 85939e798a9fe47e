//! Loading [`GameConfig`] from a TOML file.

use llmchess_core::{GameConfig, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths::LlmChessPaths;

/// Read-only access to the game configuration file.
///
/// A missing or empty file is not an error: callers fall back to
/// [`GameConfig::default`].
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Storage at the default path (`~/.config/llmchess/config.toml`).
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: LlmChessPaths::config_file()?,
        })
    }

    /// Storage at a custom path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and validates the file.
    ///
    /// - `Ok(Some(config))`: loaded and valid
    /// - `Ok(None)`: file doesn't exist or is empty
    /// - `Err`: unreadable, malformed or invalid
    pub fn load(&self) -> Result<Option<GameConfig>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let config = GameConfig::from_toml_str(&content)?;
        tracing::debug!(path = %self.path.display(), "loaded configuration");
        Ok(Some(config))
    }

    /// Like [`load`](Self::load), but substitutes defaults for a missing file.
    pub fn load_or_default(&self) -> Result<GameConfig> {
        Ok(self.load()?.unwrap_or_default())
    }
}
