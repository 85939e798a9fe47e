//! Prompt Builder: fills the move-request template from the describer output.

use minijinja::Environment;
use serde::Serialize;

use crate::board::{GameBoard, color_name};
use crate::describe::{LegalMoveList, board_squares, move_history};
use crate::error::Result;

const TEMPLATE_NAME: &str = "move_request";

const MOVE_REQUEST_TEMPLATE: &str = r#"
You are playing a game of chess as {{ color }}.

The following moves have been made thus far:
{{ move_history }}

The state of the board is visually represented below:
{{ board_diagram }}

The state of each board position is represented below:
{{ board_squares }}

The following moves are available to you:
{{ available_moves }}

Please make a move in the following format:

<reasoning>
    A brief justification of your reasoning behind this move. Incorporate past strategies, think in advance, or make observations here.
</reasoning>
<move>The number of the move in the "available" move list that you want to make. This tag should only contain the number. Alternatively, you can respond with "resign" to resign the game.</move>
"#;

const NO_MOVES_YET: &str = "No moves have been made yet.";

/// Values substituted into the template.
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    pub color: &'static str,
    pub move_history: String,
    pub board_diagram: String,
    pub board_squares: String,
    pub available_moves: String,
}

impl PromptContext {
    /// Collects every encoding of `board` for the side to move.
    pub fn from_board(board: &GameBoard, legal: &LegalMoveList) -> Result<Self> {
        let history = move_history(board)?;
        Ok(Self {
            color: color_name(board.turn()),
            move_history: if history.is_empty() {
                NO_MOVES_YET.to_string()
            } else {
                history
            },
            board_diagram: board.unicode(),
            board_squares: board_squares(board.position()),
            available_moves: legal.render(),
        })
    }
}

/// Renders the fixed move-request template.
pub struct PromptBuilder {
    env: Environment<'static>,
}

impl PromptBuilder {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, MOVE_REQUEST_TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn render(&self, context: &PromptContext) -> Result<String> {
        let template = self.env.get_template(TEMPLATE_NAME)?;
        Ok(template.render(context)?)
    }

    /// Builds the prompt for the side to move.
    pub fn build(&self, board: &GameBoard, legal: &LegalMoveList) -> Result<String> {
        self.render(&PromptContext::from_board(board, legal)?)
    }
}
