//! One request's worth of play: the human's move is already on the board,
//! the computer answers, and a finished game is recorded exactly once.

use derive_getters::Getters;
use tracing::{debug, info, instrument};

use crate::db::{DbError, GameOutcome, ScoreRecord};
use crate::games::tictactoe::{Board, Outcome, Player, Position, evaluate, select_move};
use crate::ledger::ScoreLedger;

/// Phases a turn passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// Waiting for the human to move.
    AwaitingMove,
    /// Classifying the current board.
    Evaluating,
    /// Board is undecided; the computer moves next.
    ContinuePlay,
    /// Game over.
    Terminal(Outcome),
}

/// Result of [`play_turn`].
#[derive(Debug, Clone, Getters)]
pub struct TurnReport {
    /// Board after the computer's reply (if any).
    board: Board,
    /// Classification of `board`.
    outcome: Outcome,
    /// Square the computer played, if it moved.
    computer_move: Option<Position>,
    /// Updated score record when a finished game was recorded.
    recorded: Option<ScoreRecord>,
    /// Phases visited, in order.
    phases: Vec<TurnPhase>,
}

/// Plays one turn on a client-supplied board.
///
/// `human` is the mark of the player whose move is already applied; the
/// computer plays the other mark. If the incoming board is finished, the
/// result is recorded and the computer does not move. Otherwise the
/// computer replies and the board is evaluated again. A finished game
/// triggers exactly one ledger update for `username`, attributed from the
/// human's side. Without a `username` nothing is recorded.
///
/// # Errors
///
/// Returns [`DbError`] if the ledger update fails.
#[instrument(skip(board, ledger), fields(board = %board.compact()))]
pub fn play_turn(
    board: Board,
    human: Player,
    username: Option<&str>,
    ledger: &dyn ScoreLedger,
) -> Result<TurnReport, DbError> {
    let computer = human.opponent();
    let mut board = board;
    let mut phases = vec![TurnPhase::AwaitingMove, TurnPhase::Evaluating];
    let mut computer_move = None;

    let mut outcome = evaluate(&board);
    if !outcome.is_terminal() {
        phases.push(TurnPhase::ContinuePlay);
        computer_move = select_move(&board, computer, human);
        if let Some(pos) = computer_move {
            board.place(pos, computer);
            debug!(position = %pos, mark = %computer, "Computer moved");
        }
        phases.push(TurnPhase::Evaluating);
        outcome = evaluate(&board);
    }

    let recorded = if outcome.is_terminal() {
        phases.push(TurnPhase::Terminal(outcome));
        record_result(outcome, human, username, ledger)?
    } else {
        phases.push(TurnPhase::AwaitingMove);
        None
    };

    Ok(TurnReport {
        board,
        outcome,
        computer_move,
        recorded,
        phases,
    })
}

fn record_result(
    outcome: Outcome,
    human: Player,
    username: Option<&str>,
    ledger: &dyn ScoreLedger,
) -> Result<Option<ScoreRecord>, DbError> {
    let Some(result) = GameOutcome::from_outcome(outcome, human) else {
        return Ok(None);
    };
    let Some(username) = username else {
        debug!(%result, "Anonymous game finished, nothing recorded");
        return Ok(None);
    };

    info!(username = %username, %result, "Recording finished game");
    ledger.record(username, result)
}
