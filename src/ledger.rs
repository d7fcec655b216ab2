//! Score ledger: the persisted win/loss/draw counters keyed by player.

use crate::db::{DbError, GameOutcome, ScoreRecord};

/// Persisted win/loss/draw counters, one record per registered player.
///
/// Implementations must be safe to share across request handlers.
pub trait ScoreLedger: Send + Sync {
    /// Increments the counter matching `outcome` for `username`.
    ///
    /// Returns the updated record, or `None` if the player is unknown.
    fn record(&self, username: &str, outcome: GameOutcome) -> Result<Option<ScoreRecord>, DbError>;

    /// Current record for `username`, if registered.
    fn score(&self, username: &str) -> Result<Option<ScoreRecord>, DbError>;

    /// All records: most wins first, then most draws, then by name.
    fn leaderboard(&self) -> Result<Vec<ScoreRecord>, DbError>;
}
