//! Domain model for users, events and their relationships.
//!
//! # Responsibility
//! - Define canonical records used by search and relationship logic.
//! - Model relationships as owned id sets instead of object graphs.
//!
//! # Invariants
//! - Entities are identified by store-assigned integer ids.
//! - The store is the single source of truth; in-memory sets are snapshots.
//!
//! # See also
//! - `repo` for selective relation loading and saving.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod event;
pub mod user;

/// Field-level validation failure for entity creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidNickname(String),
    InvalidName { field: &'static str, value: String },
    InvalidEmail,
    BlankTitle,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNickname(value) => write!(
                f,
                "invalid nickname `{value}`: must start with a letter or underscore and contain only letters, digits or underscores"
            ),
            Self::InvalidName { field, value } => {
                write!(f, "invalid {field} `{value}`: expected 2-25 letters")
            }
            Self::InvalidEmail => write!(f, "invalid email address"),
            Self::BlankTitle => write!(f, "event title must not be blank"),
        }
    }
}

impl Error for ValidationError {}
