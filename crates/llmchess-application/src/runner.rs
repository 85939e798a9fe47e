//! The game loop.
//!
//! One [`GameRunner`] plays one game. Each call to
//! [`play_turn`](GameRunner::play_turn) is one negotiation round with the
//! side to move: prompt, completion, parse, resolve. A failed round leaves
//! the board alone and keeps the agent's conversation so it can see its own
//! mistake; the next round asks the same side again.

use llmchess_core::board::color_name;
use llmchess_core::describe::LegalMove;
use llmchess_core::parser::parse_reply;
use llmchess_core::prompt::PromptBuilder;
use llmchess_core::resolution::{
    ErrorCounter, FORCED_MOVE_COMMENT, INVALID_MOVE_MESSAGE, Selector, TurnOutcome, force_random,
    resolve,
};
use llmchess_core::{
    AgentIdentity, ChessError, Color, Conversation, GameBoard, GameConfig, LegalMoveList, Result,
    Termination, TokenUsage,
};
use llmchess_interaction::{ClientContext, CompletionClient};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio_util::sync::CancellationToken;

use crate::observer::{GameEvent, GameObserver, NoopObserver};
use crate::summary::GameSummary;

/// One side of the board: who plays it and what they have been told.
#[derive(Debug)]
struct Seat {
    identity: AgentIdentity,
    conversation: Conversation,
}

impl Seat {
    fn new(color: Color, model: &str) -> Self {
        Self {
            identity: AgentIdentity::new(color, model),
            conversation: Conversation::new(),
        }
    }
}

pub struct GameRunner {
    board: GameBoard,
    white: Seat,
    black: Seat,
    client: CompletionClient,
    context: ClientContext,
    prompts: PromptBuilder,
    errors: ErrorCounter,
    comments: Vec<String>,
    rng: StdRng,
    clear_on_forced_move: bool,
    max_plies: Option<u32>,
    cancel: CancellationToken,
    observer: Box<dyn GameObserver>,
}

impl GameRunner {
    /// Sets up a game from the initial position.
    ///
    /// The client's throttle and retry settings are the caller's business;
    /// everything else comes from `config`.
    pub fn new(config: &GameConfig, client: CompletionClient) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            board: GameBoard::new(),
            white: Seat::new(Color::White, config.model_for(Color::White)),
            black: Seat::new(Color::Black, config.model_for(Color::Black)),
            client,
            context: ClientContext::new(),
            prompts: PromptBuilder::new()?,
            errors: ErrorCounter::new(config.max_errors),
            comments: Vec::new(),
            rng,
            clear_on_forced_move: config.clear_on_forced_move,
            max_plies: config.max_plies,
            cancel: CancellationToken::new(),
            observer: Box::new(NoopObserver),
        })
    }

    pub fn with_observer(mut self, observer: impl GameObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Token whose cancellation stops the game at the next check point.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn board(&self) -> &GameBoard {
        &self.board
    }

    pub fn conversation(&self, color: Color) -> &Conversation {
        &self.seat(color).conversation
    }

    pub fn error_count(&self) -> u32 {
        self.errors.count()
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn usage(&self) -> TokenUsage {
        self.context.usage()
    }

    /// Plays until the game ends, the ply cap is hit or the token is cancelled.
    pub async fn run(&mut self) -> Result<GameSummary> {
        tracing::info!(
            white = %self.white.identity.model,
            black = %self.black.identity.model,
            "game started"
        );

        let termination = loop {
            if let Some(termination) = self.board.termination() {
                break termination;
            }
            if self.cancel.is_cancelled() {
                break Termination::Interrupted;
            }
            if let Some(max_plies) = self.max_plies {
                if self.board.ply() >= max_plies as usize {
                    break Termination::MoveLimit;
                }
            }
            if let Some(termination) = self.play_turn().await? {
                break termination;
            }
        };

        Ok(self.finish(termination))
    }

    /// Wraps up the game with `termination`, emitting the closing events.
    pub fn finish(&mut self, termination: Termination) -> GameSummary {
        let summary = self.summary(termination);
        tracing::info!(
            result = summary.result.as_pgn(),
            plies = summary.moves.len(),
            input_tokens = summary.usage.input,
            output_tokens = summary.usage.output,
            "{}",
            termination
        );
        self.observer.on_event(&GameEvent::GameOver {
            termination,
            result: summary.result,
        });
        self.observer.on_event(&GameEvent::Usage {
            usage: summary.usage,
            calls: summary.calls,
        });
        summary
    }

    /// Snapshot of the game so far, as if it ended with `termination`.
    pub fn summary(&self, termination: Termination) -> GameSummary {
        GameSummary {
            termination,
            result: termination.result(),
            moves: self.board.san_history(),
            comments: self.comments.clone(),
            usage: self.context.usage(),
            calls: self.context.calls(),
            white_model: self.white.identity.model.clone(),
            black_model: self.black.identity.model.clone(),
        }
    }

    /// One negotiation round with the side to move.
    ///
    /// Returns the termination when the round ended the game (resignation,
    /// claimable draw, interrupt), `None` when play continues.
    pub async fn play_turn(&mut self) -> Result<Option<Termination>> {
        let color = self.board.turn();
        let legal = LegalMoveList::generate(&self.board)?;
        let prompt = self.prompts.build(&self.board, &legal)?;
        tracing::debug!(color = color_name(color), %prompt, "prompting agent");

        let seat = match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        };
        seat.conversation.push_user(prompt);
        let response = self
            .client
            .chat(
                &mut self.context,
                seat.conversation.messages(),
                &seat.identity.model,
            )
            .await?;
        tracing::debug!(color = color_name(color), %response, "agent replied");

        let reply = parse_reply(&response);
        seat.conversation.push_assistant(response);

        // The reply is discarded once an interrupt has arrived.
        if self.cancel.is_cancelled() {
            return Ok(Some(Termination::Interrupted));
        }

        let outcome = resolve(&mut self.board, &legal, &Selector::parse(&reply.selector));
        match &outcome {
            TurnOutcome::Resigned => {
                tracing::info!(color = color_name(color), "agent resigned");
                self.observer.on_event(&GameEvent::Resigned { color });
                Ok(Some(Termination::Resignation { loser: color }))
            }
            TurnOutcome::Applied(entry) => {
                self.comments.push(reply.reasoning);
                self.seat_mut(color).conversation.clear();
                self.errors.reset();
                Ok(self.after_move(color, entry, false))
            }
            rejected => {
                let message = rejected
                    .corrective_message()
                    .unwrap_or(INVALID_MOVE_MESSAGE);
                self.reject(color, &reply.selector, message, &legal)
            }
        }
    }

    fn reject(
        &mut self,
        color: Color,
        selector: &str,
        message: &'static str,
        legal: &LegalMoveList,
    ) -> Result<Option<Termination>> {
        self.seat_mut(color).conversation.push_system(message);
        let escalate = self.errors.record_failure();
        tracing::warn!(
            color = color_name(color),
            selector,
            errors = self.errors.count(),
            "{}",
            message
        );
        self.observer.on_event(&GameEvent::InvalidSelector {
            color,
            selector: selector.to_string(),
            message,
            errors: self.errors.count(),
        });

        if escalate {
            self.force_move(color, legal)
        } else {
            Ok(None)
        }
    }

    fn force_move(&mut self, color: Color, legal: &LegalMoveList) -> Result<Option<Termination>> {
        tracing::warn!(
            color = color_name(color),
            errors = self.errors.count(),
            "too many errors, making random move"
        );
        self.observer.on_event(&GameEvent::ForcedMove { color });

        let entry = force_random(&mut self.board, legal, &mut self.rng)
            .ok_or_else(|| ChessError::internal("no legal move available to force"))?;
        self.comments.push(FORCED_MOVE_COMMENT.to_string());
        self.errors.reset();
        if self.clear_on_forced_move {
            self.seat_mut(color).conversation.clear();
        }
        Ok(self.after_move(color, &entry, true))
    }

    /// Reports the applied move and checks for a claimable draw.
    fn after_move(&mut self, color: Color, entry: &LegalMove, forced: bool) -> Option<Termination> {
        let ply = self.board.ply();
        tracing::info!(
            color = color_name(color),
            ply,
            san = %entry.san,
            forced,
            "{}",
            entry.description
        );
        self.observer.on_event(&GameEvent::MoveApplied {
            color,
            ply,
            description: entry.description.clone(),
            san: entry.san.clone(),
            forced,
        });
        self.observer.on_event(&GameEvent::Board {
            diagram: self.board.unicode(),
        });

        // A decisive ending is reported by the loop's game-over check instead.
        if !self.board.is_game_over() && self.board.can_claim_draw() {
            Some(Termination::ClaimableDraw)
        } else {
            None
        }
    }

    fn seat(&self, color: Color) -> &Seat {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn seat_mut(&mut self, color: Color) -> &mut Seat {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
}
