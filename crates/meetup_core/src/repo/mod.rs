//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the store contracts consumed by search and relationship logic.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Create paths validate input before persistence.
//! - Saves only rewrite relationship sets that were loaded.
//! - Store failures surface as `RepoError`; nothing is retried here.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::event::EventId;
use crate::model::user::UserId;
use crate::model::ValidationError;
use rusqlite::{ffi, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod event_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Identifies one stored record in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    User(UserId),
    Event(EventId),
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(id) => write!(f, "user {id}"),
            Self::Event(id) => write!(f, "event {id}"),
        }
    }
}

/// Store-level error for user/event persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(EntityRef),
    /// A unique column (nickname, email, title) already holds this value.
    UniqueViolation(String),
    /// Connection schema is not at the version this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::UniqueViolation(column) => write!(f, "duplicate value for `{column}`"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match unique_violation_column(&value) {
            Some(column) => Self::UniqueViolation(column),
            None => Self::Db(DbError::Sqlite(value)),
        }
    }
}

/// Extracts `table.column` from a SQLite UNIQUE constraint failure.
fn unique_violation_column(err: &rusqlite::Error) -> Option<String> {
    match err {
        rusqlite::Error::SqliteFailure(inner, message)
            if inner.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            let column = message
                .as_deref()
                .and_then(|text| text.rsplit(": ").next())
                .unwrap_or("unknown");
            Some(column.to_string())
        }
        _ => None,
    }
}

/// Rejects connections whose schema version differs from this binary.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}
