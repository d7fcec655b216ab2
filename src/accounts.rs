//! Account registration and login.

use std::sync::Arc;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use derive_more::{Display, Error};
use rand::Rng;
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, User};

/// Storage for registered accounts.
pub trait AccountStore: Send + Sync {
    /// Stores a new account and opens its zeroed score record.
    fn insert_user(&self, username: &str, password_hash: &str) -> Result<User, DbError>;

    /// Looks up an account by name.
    fn find_user(&self, username: &str) -> Result<Option<User>, DbError>;

    /// True if an account with this name exists.
    fn user_exists(&self, username: &str) -> Result<bool, DbError> {
        Ok(self.find_user(username)?.is_some())
    }
}

/// Reason an account operation was refused.
#[derive(Debug, Clone, Display)]
pub enum AccountErrorKind {
    /// Username or password was blank.
    #[display("Username and password required")]
    MissingCredentials,
    /// Another account already uses the name.
    #[display("Username already exists")]
    UsernameTaken,
    /// Unknown user or wrong password.
    #[display("Invalid username or password")]
    InvalidCredentials,
    /// Password hashing failed.
    #[display("Password hashing failed: {}", _0)]
    Hashing(String),
    /// Underlying store failed.
    #[display("{}", _0)]
    Store(DbError),
}

/// Account error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Account error: {} at {}:{}", kind, file, line)]
pub struct AccountError {
    /// What went wrong.
    pub kind: AccountErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl AccountError {
    /// Creates a new account error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: AccountErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<DbError> for AccountError {
    #[track_caller]
    fn from(err: DbError) -> Self {
        Self::new(AccountErrorKind::Store(err))
    }
}

fn salt() -> Result<SaltString, AccountError> {
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes);
    SaltString::encode_b64(&bytes)
        .map_err(|e| AccountError::new(AccountErrorKind::Hashing(e.to_string())))
}

/// Hashes a password with Argon2 and a random salt (PHC string format).
///
/// # Errors
///
/// Returns [`AccountError`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AccountError> {
    Argon2::default()
        .hash_password(password.as_bytes(), &salt()?)
        .map(|h| h.to_string())
        .map_err(|e| AccountError::new(AccountErrorKind::Hashing(e.to_string())))
}

/// Checks a password against a stored PHC hash. Malformed hashes never match.
pub fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|hash| {
            Argon2::default()
                .verify_password(password.as_bytes(), &hash)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Registration and login on top of an [`AccountStore`].
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService").finish_non_exhaustive()
    }
}

impl AccountService {
    /// Creates a new account service backed by the given store.
    #[instrument(skip(store))]
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        info!("Creating AccountService");
        Self { store }
    }

    /// Registers a new account; returns the trimmed username.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError`] for blank credentials, a taken name, or a
    /// store failure.
    #[instrument(skip(self, password))]
    pub fn register(&self, username: &str, password: &str) -> Result<String, AccountError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            debug!("Registration rejected: blank credentials");
            return Err(AccountError::new(AccountErrorKind::MissingCredentials));
        }
        if self.store.user_exists(username)? {
            debug!(username = %username, "Registration rejected: name taken");
            return Err(AccountError::new(AccountErrorKind::UsernameTaken));
        }

        let hash = hash_password(password)?;
        // A concurrent registration can claim the name after the check above.
        self.store.insert_user(username, &hash).map_err(|e| {
            if e.is_duplicate() {
                debug!(username = %username, "Registration rejected: name taken on insert");
                AccountError::new(AccountErrorKind::UsernameTaken)
            } else {
                AccountError::from(e)
            }
        })?;
        info!(username = %username, "Account registered");
        Ok(username.to_string())
    }

    /// Checks credentials; returns the trimmed username on success.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError`] with [`AccountErrorKind::InvalidCredentials`]
    /// for an unknown user or a wrong password.
    #[instrument(skip(self, password))]
    pub fn login(&self, username: &str, password: &str) -> Result<String, AccountError> {
        let username = username.trim();
        let Some(user) = self.store.find_user(username)? else {
            warn!(username = %username, "Login failed: unknown user");
            return Err(AccountError::new(AccountErrorKind::InvalidCredentials));
        };

        if !verify_password(password, user.password_hash()) {
            warn!(username = %username, "Login failed: wrong password");
            return Err(AccountError::new(AccountErrorKind::InvalidCredentials));
        }

        info!(username = %username, "Login successful");
        Ok(username.to_string())
    }
}
