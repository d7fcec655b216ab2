//! Persistence for accounts and the score ledger.

mod error;
mod memory;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::{DbError, DbErrorKind};
pub use memory::InMemoryStore;
pub use models::{GameOutcome, NewUser, ScoreRecord, User};
pub use repository::{GameRepository, MIGRATIONS};
