//! Game rules for tic-tac-toe.
//!
//! Pure functions classifying a board. Rules are kept apart from board
//! storage so the search and the turn state machine share one evaluator.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{LINES, check_winner};

use super::{Board, Outcome};

/// Classifies a board as won, drawn, or still in progress.
///
/// A completed line wins even when empty squares remain; a full board
/// without a line is a draw.
pub fn evaluate(board: &Board) -> Outcome {
    if let Some(winner) = check_winner(board) {
        Outcome::Won(winner)
    } else if is_full(board) {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}
