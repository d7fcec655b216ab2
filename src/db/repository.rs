//! SQLite repository for accounts and scores.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument, warn};

use crate::accounts::AccountStore;
use crate::db::{DbError, DbErrorKind, GameOutcome, NewUser, ScoreRecord, User, schema};
use crate::ledger::ScoreLedger;

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Milliseconds SQLite waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Database repository for user and score operations.
///
/// Opens a fresh connection per operation, so clones can be shared
/// freely across request handlers.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new(
                DbErrorKind::Config,
                "Database path must not be empty",
            ));
        }
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Path of the backing database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(
                DbErrorKind::Connection,
                format!("Failed to connect to '{}': {}", self.db_path, e),
            )
        })?;
        diesel::sql_query(format!("PRAGMA busy_timeout = {}", BUSY_TIMEOUT_MS))
            .execute(&mut conn)?;
        Ok(conn)
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<usize, DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| {
                DbError::new(DbErrorKind::Migration, format!("Migration failed: {}", e))
            })?;
        info!(count = applied.len(), "Migrations applied");
        Ok(applied.len())
    }

    /// Creates a user and their zeroed score row in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the username is already taken or a database error occurs.
    #[instrument(skip(self, password_hash))]
    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<User, DbError> {
        debug!(username = %username, "Creating user");
        let mut conn = self.connection()?;

        let user = conn.transaction::<_, DbError, _>(|conn| {
            let user = diesel::insert_into(schema::users::table)
                .values(&NewUser::new(username, password_hash))
                .returning(User::as_returning())
                .get_result(conn)?;

            diesel::insert_into(schema::scores::table)
                .values(schema::scores::username.eq(username))
                .execute(conn)?;

            Ok(user)
        })?;

        info!(username = %user.username(), "User created");
        Ok(user)
    }

    /// Gets a user by name. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_user(&self, username: &str) -> Result<Option<User>, DbError> {
        debug!(username = %username, "Looking up user");
        let mut conn = self.connection()?;

        let user = schema::users::table
            .find(username)
            .select(User::as_select())
            .first(&mut conn)
            .optional()?;

        debug!(found = user.is_some(), "User lookup finished");
        Ok(user)
    }

    /// Lists all users, ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_users(&self) -> Result<Vec<User>, DbError> {
        let mut conn = self.connection()?;

        let users = schema::users::table
            .order((schema::users::created_at.asc(), schema::users::username.asc()))
            .select(User::as_select())
            .load(&mut conn)?;

        info!(count = users.len(), "Users loaded");
        Ok(users)
    }

    /// Increments one counter of a user's score row.
    ///
    /// Returns the updated record, or `None` when no such user exists.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn record_outcome(
        &self,
        username: &str,
        outcome: GameOutcome,
    ) -> Result<Option<ScoreRecord>, DbError> {
        let mut conn = self.connection()?;
        let target = schema::scores::table.filter(schema::scores::username.eq(username));

        let updated = match outcome {
            GameOutcome::Win => diesel::update(target)
                .set(schema::scores::wins.eq(schema::scores::wins + 1))
                .execute(&mut conn)?,
            GameOutcome::Loss => diesel::update(target)
                .set(schema::scores::losses.eq(schema::scores::losses + 1))
                .execute(&mut conn)?,
            GameOutcome::Draw => diesel::update(target)
                .set(schema::scores::draws.eq(schema::scores::draws + 1))
                .execute(&mut conn)?,
        };

        if updated == 0 {
            warn!(username = %username, %outcome, "No score row for user, result not recorded");
            return Ok(None);
        }

        let record = schema::scores::table
            .find(username)
            .select(ScoreRecord::as_select())
            .first(&mut conn)
            .optional()?;

        info!(username = %username, %outcome, "Game result recorded");
        Ok(record)
    }

    /// Gets the score row for a user.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_score(&self, username: &str) -> Result<Option<ScoreRecord>, DbError> {
        let mut conn = self.connection()?;

        let record = schema::scores::table
            .find(username)
            .select(ScoreRecord::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(record)
    }

    /// All score rows: most wins first, then most draws, then by name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_leaderboard(&self) -> Result<Vec<ScoreRecord>, DbError> {
        let mut conn = self.connection()?;

        let records = schema::scores::table
            .order((
                schema::scores::wins.desc(),
                schema::scores::draws.desc(),
                schema::scores::username.asc(),
            ))
            .select(ScoreRecord::as_select())
            .load(&mut conn)?;

        debug!(count = records.len(), "Leaderboard loaded");
        Ok(records)
    }
}

impl AccountStore for GameRepository {
    fn insert_user(&self, username: &str, password_hash: &str) -> Result<User, DbError> {
        self.create_user(username, password_hash)
    }

    fn find_user(&self, username: &str) -> Result<Option<User>, DbError> {
        self.get_user(username)
    }
}

impl ScoreLedger for GameRepository {
    fn record(&self, username: &str, outcome: GameOutcome) -> Result<Option<ScoreRecord>, DbError> {
        self.record_outcome(username, outcome)
    }

    fn score(&self, username: &str) -> Result<Option<ScoreRecord>, DbError> {
        self.get_score(username)
    }

    fn leaderboard(&self) -> Result<Vec<ScoreRecord>, DbError> {
        self.get_leaderboard()
    }
}
