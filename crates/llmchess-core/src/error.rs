//! Error types for the llmchess workspace.

use std::time::Duration;
use thiserror::Error;

/// A shared error type for the entire llmchess workspace.
///
/// Malformed agent selectors are deliberately absent here: they are ordinary
/// turn outcomes (see [`crate::resolution::TurnOutcome`]) and never escape the
/// game loop.
#[derive(Error, Debug, Clone)]
pub enum ChessError {
    /// Configuration error (missing credentials, invalid values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Prompt template could not be compiled or rendered
    #[error("Template error: {0}")]
    Template(String),

    /// The completion service rejected or failed a request
    #[error("Completion request failed (status {status:?}): {message}")]
    Completion {
        status: Option<u16>,
        message: String,
        is_retryable: bool,
        retry_after: Option<Duration>,
    },

    /// The completion service kept answering with an empty choice set
    #[error("Completion service returned no choices after {attempts} attempts")]
    EmptyResponse { attempts: u32 },

    /// The describer could not render a move the rules engine produced
    #[error("Cannot describe move {mv} on board:\n{board}")]
    Describe { mv: String, board: String },

    /// Game record could not be built, parsed or replayed
    #[error("Game record error: {0}")]
    Record(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChessError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Record error
    pub fn record(message: impl Into<String>) -> Self {
        Self::Record(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Creates a Completion error without HTTP status information
    pub fn completion(message: impl Into<String>, is_retryable: bool) -> Self {
        Self::Completion {
            status: None,
            message: message.into(),
            is_retryable,
            retry_after: None,
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this error came from the completion service
    pub fn is_completion(&self) -> bool {
        matches!(self, Self::Completion { .. } | Self::EmptyResponse { .. })
    }

    /// Whether retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Completion { is_retryable, .. } => *is_retryable,
            Self::EmptyResponse { .. } => true,
            _ => false,
        }
    }

    /// Server-requested wait before retrying, if it sent one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Completion { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ChessError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ChessError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ChessError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<minijinja::Error> for ChessError {
    fn from(err: minijinja::Error) -> Self {
        Self::Template(err.to_string())
    }
}

/// A type alias for `Result<T, ChessError>`.
pub type Result<T> = std::result::Result<T, ChessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_conversion_keeps_kind() {
        let err: ChessError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "game.pgn").into();
        assert!(err.is_io());
        assert!(err.to_string().contains("NotFound"));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ChessError::EmptyResponse { attempts: 3 }.is_retryable());
        assert!(ChessError::completion("timeout", true).is_retryable());
        assert!(!ChessError::completion("bad key", false).is_retryable());
        assert!(!ChessError::config("missing key").is_retryable());
    }

    #[test]
    fn test_retry_after_only_from_completion_errors() {
        let limited = ChessError::Completion {
            status: Some(429),
            message: "slow down".to_string(),
            is_retryable: true,
            retry_after: Some(Duration::from_secs(3)),
        };
        assert_eq!(limited.retry_after(), Some(Duration::from_secs(3)));
        assert_eq!(ChessError::completion("timeout", true).retry_after(), None);
        assert_eq!(ChessError::internal("bug").retry_after(), None);
    }

    #[test]
    fn test_toml_conversion() {
        let err: ChessError = toml::from_str::<toml::Value>("= broken").unwrap_err().into();
        match err {
            ChessError::Serialization { format, .. } => assert_eq!(format, "TOML"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
