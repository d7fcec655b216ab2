mod minimax;
mod position;
mod rules;
mod symmetry;
mod types;

pub use minimax::{SelfPlay, score_moves, select_move, self_play};
pub use position::Position;
pub use rules::{LINES, check_winner, evaluate, is_draw, is_full};
pub use symmetry::Symmetry;
pub use types::{Board, Outcome, ParseBoardError, Player, Square};
