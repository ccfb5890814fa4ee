//! Coarse error taxonomy shared by all service errors.
//!
//! Calling layers map `ErrorKind` to their own failure representation
//! instead of matching every concrete variant.

use crate::repo::RepoError;
use std::fmt::{Display, Formatter};

/// Category of a core failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Referenced entity id does not resolve in the store.
    NotFound,
    /// Duplicate creation where the policy forbids a silent no-op.
    Conflict,
    /// Store-level failure, including uniqueness violations.
    DataAccess,
    /// Malformed input.
    Validation,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::DataAccess => "data_access",
            Self::Validation => "validation",
        };
        f.write_str(label)
    }
}

impl RepoError {
    /// Returns the taxonomy category of this store error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Db(_)
            | Self::UniqueViolation(_)
            | Self::UninitializedConnection { .. }
            | Self::InvalidData(_) => ErrorKind::DataAccess,
        }
    }
}
