//! Strictly Arena - tic-tac-toe against an unbeatable computer, with
//! accounts and a persistent leaderboard.
//!
//! # Architecture
//!
//! - **Engine**: board evaluation and exhaustive minimax move selection
//! - **Turn**: applies the engine to a client-supplied board and records
//!   finished games in the score ledger
//! - **Accounts / Ledger**: injected storage traits with SQLite and
//!   in-memory implementations
//! - **Server**: JSON HTTP API and the browser client
//!
//! # Example
//!
//! ```
//! use strictly_arena::{Board, Player, Position, select_move};
//!
//! let board: Board = "XX.OO....".parse().unwrap();
//! assert_eq!(select_move(&board, Player::X, Player::O), Some(Position::TopRight));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod accounts;
mod config;
mod db;
mod games;
mod ledger;
mod server;
mod turn;

// Crate-level exports - Game engine (tic-tac-toe)
pub use games::tictactoe::{
    Board, LINES, Outcome, ParseBoardError, Player, Position, SelfPlay, Square, Symmetry,
    check_winner, evaluate, is_draw, is_full, score_moves, select_move, self_play,
};

// Crate-level exports - Turn state machine
pub use turn::{TurnPhase, TurnReport, play_turn};

// Crate-level exports - Storage
pub use db::{DbError, DbErrorKind, GameOutcome, GameRepository, InMemoryStore, MIGRATIONS, NewUser, ScoreRecord, User};
pub use ledger::ScoreLedger;

// Crate-level exports - Accounts
pub use accounts::{
    AccountError, AccountErrorKind, AccountService, AccountStore, hash_password, verify_password,
};

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - HTTP server
pub use server::{ApiError, AppState, Credentials, MessageResponse, MoveRequest, MoveResponse, router};
