//! Platform paths for llmchess configuration.
//!
//! ```text
//! ~/.config/llmchess/          # Config directory (XDG on Linux)
//! └── config.toml              # Game configuration
//! ```

use llmchess_core::{ChessError, Result};
use std::path::PathBuf;

const APP_DIR: &str = "llmchess";
const CONFIG_FILE: &str = "config.toml";

pub struct LlmChessPaths;

impl LlmChessPaths {
    /// Returns the llmchess configuration directory.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| ChessError::config("Cannot find configuration directory"))
    }

    /// Returns the default configuration file path.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }
}
