//! Domain layer of llmchess: board, describer, prompt, conversation, parser
//! and move resolution.
//!
//! The rules of chess come from `shakmaty`; nothing here generates moves.

pub mod board;
pub mod config;
pub mod conversation;
pub mod describe;
pub mod error;
pub mod outcome;
pub mod parser;
pub mod prompt;
pub mod resolution;
pub mod usage;

// Re-export common types
pub use board::{GameBoard, MoveError, color_name};
pub use config::{GameConfig, Provider};
pub use conversation::{AgentIdentity, Conversation, ConversationMessage, MessageRole};
pub use describe::{LegalMove, LegalMoveList};
pub use error::{ChessError, Result};
pub use outcome::{GameResult, Termination};
pub use usage::TokenUsage;

/// Re-exported so downstream crates name the same engine types.
pub use shakmaty::Color;
