//! SQLite store for meetup users, events and their link tables.
//!
//! # Schema
//! - `users` and `events` hold scalar fields; nickname, email and title are
//!   unique.
//! - `user_friends(user_id, friend_id)` holds one row per friendship side.
//! - `user_events(user_id, event_id)` holds attendance; event attendee lists
//!   are read from the same rows.
//!
//! # Invariants
//! - Connections leave `open_db*` with `foreign_keys=ON` and the schema at
//!   `migrations::latest_version()`.
//! - Repositories refuse connections at any other schema version.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Connection, pragma or migration failure.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Database file was migrated by a newer `meetup` build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
