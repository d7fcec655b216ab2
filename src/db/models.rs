//! Database models and domain types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::schema;
use crate::games::tictactoe::{Outcome, Player};

/// Registered account.
#[derive(Debug, Clone, Queryable, Selectable, Getters, new)]
#[diesel(table_name = schema::users)]
pub struct User {
    username: String,
    password_hash: String,
    created_at: NaiveDateTime,
}

/// Insertable user model for creating new accounts.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::users)]
pub struct NewUser<'a> {
    username: &'a str,
    password_hash: &'a str,
}

/// Win/loss/draw counters for one player.
///
/// Counters only ever grow; nothing in this crate decrements or resets them.
#[derive(
    Debug, Clone, PartialEq, Eq, Queryable, Selectable, Getters, Serialize, Deserialize, new,
)]
#[diesel(table_name = schema::scores)]
pub struct ScoreRecord {
    username: String,
    wins: i32,
    losses: i32,
    draws: i32,
}

impl ScoreRecord {
    /// Zeroed record for a freshly registered player.
    pub fn empty(username: impl Into<String>) -> Self {
        Self::new(username.into(), 0, 0, 0)
    }

    /// Total games recorded.
    pub fn total(&self) -> i32 {
        self.wins + self.losses + self.draws
    }

    /// Increments the counter matching `outcome`.
    pub(crate) fn bump(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::Win => self.wins += 1,
            GameOutcome::Loss => self.losses += 1,
            GameOutcome::Draw => self.draws += 1,
        }
    }

    /// Calculates win rate as a percentage (0.0–100.0).
    pub fn win_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            (self.wins as f64 / self.total() as f64) * 100.0
        }
    }
}

/// Game outcome from the human player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum GameOutcome {
    /// Human won the game.
    Win,
    /// Human lost the game.
    Loss,
    /// Game ended in a draw.
    Draw,
}

impl GameOutcome {
    /// Attributes a board outcome to the player holding `human`.
    ///
    /// Returns `None` while the game is still in progress.
    #[instrument]
    pub fn from_outcome(outcome: Outcome, human: Player) -> Option<Self> {
        match outcome {
            Outcome::InProgress => None,
            Outcome::Draw => Some(Self::Draw),
            Outcome::Won(winner) if winner == human => Some(Self::Win),
            Outcome::Won(_) => Some(Self::Loss),
        }
    }
}
