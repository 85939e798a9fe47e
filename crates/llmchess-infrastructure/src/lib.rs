//! Infrastructure layer for llmchess.
//!
//! Filesystem and environment concerns: configuration file, credentials,
//! and the PGN game record.

pub mod atomic_file;
pub mod config_storage;
pub mod credentials;
pub mod paths;
pub mod pgn;

pub use config_storage::ConfigStorage;
pub use credentials::Credentials;
pub use paths::LlmChessPaths;
pub use pgn::{GameRecord, format_date, parse_record, read_record, replay, write_record};
