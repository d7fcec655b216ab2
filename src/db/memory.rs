//! In-memory account and score store.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::accounts::AccountStore;
use crate::db::{DbError, DbErrorKind, GameOutcome, ScoreRecord, User};
use crate::ledger::ScoreLedger;

#[derive(Debug, Default)]
struct Accounts {
    users: BTreeMap<String, User>,
    scores: BTreeMap<String, ScoreRecord>,
}

/// Volatile store backing tests and `serve --in-memory`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Accounts>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory store");
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Accounts>, DbError> {
        self.inner
            .lock()
            .map_err(|e| {
                DbError::new(DbErrorKind::Query, format!("In-memory store poisoned: {}", e))
            })
    }
}

impl AccountStore for InMemoryStore {
    #[instrument(skip(self, password_hash))]
    fn insert_user(&self, username: &str, password_hash: &str) -> Result<User, DbError> {
        let mut accounts = self.lock()?;
        if accounts.users.contains_key(username) {
            return Err(DbError::new(
                DbErrorKind::Duplicate,
                format!("User '{}' already exists", username),
            ));
        }

        let user = User::new(
            username.to_string(),
            password_hash.to_string(),
            Utc::now().naive_utc(),
        );
        accounts.users.insert(username.to_string(), user.clone());
        accounts
            .scores
            .insert(username.to_string(), ScoreRecord::empty(username));

        debug!(username = %username, "User stored");
        Ok(user)
    }

    fn find_user(&self, username: &str) -> Result<Option<User>, DbError> {
        Ok(self.lock()?.users.get(username).cloned())
    }
}

impl ScoreLedger for InMemoryStore {
    #[instrument(skip(self))]
    fn record(&self, username: &str, outcome: GameOutcome) -> Result<Option<ScoreRecord>, DbError> {
        let mut accounts = self.lock()?;
        match accounts.scores.get_mut(username) {
            Some(record) => {
                record.bump(outcome);
                debug!(username = %username, %outcome, "Game result recorded");
                Ok(Some(record.clone()))
            }
            None => {
                warn!(username = %username, %outcome, "No score row for user, result not recorded");
                Ok(None)
            }
        }
    }

    fn score(&self, username: &str) -> Result<Option<ScoreRecord>, DbError> {
        Ok(self.lock()?.scores.get(username).cloned())
    }

    fn leaderboard(&self) -> Result<Vec<ScoreRecord>, DbError> {
        let mut records: Vec<ScoreRecord> = self.lock()?.scores.values().cloned().collect();
        records.sort_by(|a, b| {
            b.wins()
                .cmp(a.wins())
                .then_with(|| b.draws().cmp(a.draws()))
                .then_with(|| a.username().cmp(b.username()))
        });
        Ok(records)
    }
}
