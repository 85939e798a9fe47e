//! Progress events emitted by the game loop.
//!
//! The loop logs through `tracing` on its own; observers are for
//! presentation (the CLI console) and for tests that want to see what
//! happened without parsing log output.

use llmchess_core::{Color, GameResult, Termination, TokenUsage};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A move was played, chosen by the agent or forced.
    MoveApplied {
        color: Color,
        ply: usize,
        description: String,
        san: String,
        forced: bool,
    },
    /// Unicode diagram after a move.
    Board { diagram: String },
    /// The agent's selector could not be resolved; it will be asked again.
    InvalidSelector {
        color: Color,
        selector: String,
        message: &'static str,
        errors: u32,
    },
    /// The error threshold was exceeded and a random move is about to be played.
    ForcedMove { color: Color },
    Resigned { color: Color },
    GameOver {
        termination: Termination,
        result: GameResult,
    },
    Usage { usage: TokenUsage, calls: u64 },
}

pub trait GameObserver: Send {
    fn on_event(&mut self, event: &GameEvent);
}

impl<O: GameObserver + ?Sized> GameObserver for Box<O> {
    fn on_event(&mut self, event: &GameEvent) {
        (**self).on_event(event);
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl GameObserver for NoopObserver {
    fn on_event(&mut self, _event: &GameEvent) {}
}

/// Keeps every event in order. Clones share the same log, so a caller can
/// hand one to the runner and read the events back afterwards.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<GameEvent> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<GameEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GameObserver for EventLog {
    fn on_event(&mut self, event: &GameEvent) {
        self.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_clones_share_events() {
        let log = EventLog::new();
        let mut handle = log.clone();
        handle.on_event(&GameEvent::Resigned {
            color: Color::White,
        });
        assert_eq!(
            log.events(),
            vec![GameEvent::Resigned {
                color: Color::White
            }]
        );
    }
}
