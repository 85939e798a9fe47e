//! Application layer for llmchess.
//!
//! [`GameRunner`] drives the move negotiation between two agents;
//! [`PlayGameUseCase`] connects it to a completion service and writes the
//! game record afterwards.

pub mod observer;
pub mod play_usecase;
pub mod runner;
pub mod summary;

pub use observer::{EventLog, GameEvent, GameObserver, NoopObserver};
pub use play_usecase::{PlayGameUseCase, PlayedGame};
pub use runner::GameRunner;
pub use summary::GameSummary;
