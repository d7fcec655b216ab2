//! Exhaustive minimax search for the computer's move.
//!
//! The search walks the full game tree below the given board with no
//! pruning and no depth limit; a 3x3 board bounds it at 9! leaves. Wins
//! score `10 - depth` and losses `depth - 10`, so among equal results the
//! engine prefers faster wins and slower losses. Candidate moves are tried
//! in ascending index order and only a strictly better score replaces the
//! current best, so ties resolve to the lowest index.

use super::rules::evaluate;
use super::{Board, Outcome, Player, Position, Square};
use tracing::{debug, instrument, trace};

/// Score of an immediate win at depth zero.
const WIN_SCORE: i32 = 10;

/// Scores every empty square for `acting`, in ascending index order.
///
/// Each score is the minimax value of the board after `acting` plays that
/// square, with `opponent` to move next.
///
/// # Panics
///
/// Panics if `acting == opponent`.
pub fn score_moves(board: &Board, acting: Player, opponent: Player) -> Vec<(Position, i32)> {
    assert_ne!(acting, opponent, "acting and opponent marks must differ");

    // Private copy: the search writes and erases marks in place.
    let mut scratch = *board;
    let mut scores = Vec::with_capacity(9);
    for pos in Position::ALL {
        if !scratch.is_empty(pos) {
            continue;
        }
        scratch.set(pos, Square::Occupied(acting));
        let score = minimax(&mut scratch, 0, false, acting, opponent);
        scratch.set(pos, Square::Empty);
        trace!(position = %pos, score, "Scored candidate move");
        scores.push((pos, score));
    }
    scores
}

/// Picks the best square for `acting`, assuming `opponent` plays optimally.
///
/// Returns `None` only when the board has no empty square. Callers should
/// evaluate the board first and skip move selection on a finished game.
///
/// # Panics
///
/// Panics if `acting == opponent`.
#[instrument(skip(board), fields(board = %board.compact()))]
pub fn select_move(board: &Board, acting: Player, opponent: Player) -> Option<Position> {
    let mut best: Option<(Position, i32)> = None;
    for (pos, score) in score_moves(board, acting, opponent) {
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((pos, score));
        }
    }

    match best {
        Some((pos, score)) => {
            debug!(position = %pos, score, "Selected move");
            Some(pos)
        }
        None => {
            debug!("No empty square to play");
            None
        }
    }
}

fn minimax(board: &mut Board, depth: i32, maximizing: bool, acting: Player, opponent: Player) -> i32 {
    match evaluate(board) {
        Outcome::Won(winner) if winner == acting => return WIN_SCORE - depth,
        Outcome::Won(_) => return depth - WIN_SCORE,
        Outcome::Draw => return 0,
        Outcome::InProgress => {}
    }

    let mover = if maximizing { acting } else { opponent };
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for pos in Position::ALL {
        if !board.is_empty(pos) {
            continue;
        }
        board.set(pos, Square::Occupied(mover));
        let score = minimax(board, depth + 1, !maximizing, acting, opponent);
        board.set(pos, Square::Empty);
        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }
    best
}

/// A finished engine-versus-engine game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfPlay {
    /// Moves in play order.
    pub moves: Vec<(Player, Position)>,
    /// Board after the last move.
    pub board: Board,
    /// Terminal classification of the final board.
    pub outcome: Outcome,
}

/// Plays the engine against itself from `board`, `to_move` moving first.
#[instrument(skip(board), fields(board = %board.compact()))]
pub fn self_play(board: Board, to_move: Player) -> SelfPlay {
    let mut board = board;
    let mut to_move = to_move;
    let mut moves = Vec::new();

    loop {
        let outcome = evaluate(&board);
        if outcome.is_terminal() {
            debug!(?outcome, moves = moves.len(), "Self-play finished");
            return SelfPlay {
                moves,
                board,
                outcome,
            };
        }
        // An in-progress board always has an empty square.
        let Some(pos) = select_move(&board, to_move, to_move.opponent()) else {
            return SelfPlay {
                moves,
                board,
                outcome,
            };
        };
        board.place(pos, to_move);
        moves.push((to_move, pos));
        to_move = to_move.opponent();
    }
}
