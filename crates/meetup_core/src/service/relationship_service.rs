//! Friendship and attendance coordination.
//!
//! # Responsibility
//! - Translate relationship requests into store link changes.
//! - Keep friendship symmetric through one atomic two-sided write.
//! - Apply attendance from the user side only.
//!
//! # Invariants
//! - Friendship additions are idempotent (`Unchanged`), never duplicated.
//! - Duplicate attendance is a conflict, not a no-op.
//! - Existence checks and link edits run in the same store transaction, so
//!   writers on overlapping pairs cannot overwrite each other.
//! - `establish_friendship`/`dissolve_friendship` change both sides in one
//!   store transaction, or neither.
//! - Within a process, mutations on the same pair are also serialized
//!   through `PairLocks`.
//!
//! # See also
//! - `locks::PairLocks` for the per-pair serialization.

use crate::error::ErrorKind;
use crate::locks::{PairKey, PairLocks};
use crate::model::event::EventId;
use crate::model::user::UserId;
use crate::repo::user_repo::{LinkChange, UserRepository};
use crate::repo::{EntityRef, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Result of a relationship mutation that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipOutcome {
    /// State changed and was persisted.
    Applied,
    /// Requested state already held; nothing was written.
    Unchanged,
}

impl RelationshipOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }

    fn from_applied(applied: bool) -> Self {
        if applied {
            Self::Applied
        } else {
            Self::Unchanged
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Unchanged => "unchanged",
        }
    }
}

/// Relationship coordination errors.
#[derive(Debug)]
pub enum RelationshipError {
    UserNotFound(UserId),
    EventNotFound(EventId),
    /// User already attends the event.
    AlreadyAttending { user_id: UserId, event_id: EventId },
    /// Both sides of a friendship are the same user.
    SelfRelationship(UserId),
    Repo(RepoError),
}

impl RelationshipError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UserNotFound(_) | Self::EventNotFound(_) => ErrorKind::NotFound,
            Self::AlreadyAttending { .. } => ErrorKind::Conflict,
            Self::SelfRelationship(_) => ErrorKind::Validation,
            Self::Repo(err) => err.kind(),
        }
    }
}

impl Display for RelationshipError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::EventNotFound(id) => write!(f, "event not found: {id}"),
            Self::AlreadyAttending { user_id, event_id } => {
                write!(f, "user {user_id} already attends event {event_id}")
            }
            Self::SelfRelationship(id) => write!(f, "user {id} cannot befriend itself"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RelationshipError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for RelationshipError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(EntityRef::User(id)) => Self::UserNotFound(id),
            RepoError::NotFound(EntityRef::Event(id)) => Self::EventNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type RelationshipResult = Result<RelationshipOutcome, RelationshipError>;

/// Coordinator for friendship and attendance mutations.
pub struct RelationshipService<U: UserRepository> {
    users: U,
    locks: Arc<PairLocks>,
}

impl<U: UserRepository> RelationshipService<U> {
    /// Creates a coordinator with a private lock registry.
    pub fn new(users: U) -> Self {
        Self::with_locks(users, Arc::new(PairLocks::new()))
    }

    /// Creates a coordinator sharing `locks` with other coordinators, e.g.
    /// one per worker thread, each on its own connection.
    pub fn with_locks(users: U, locks: Arc<PairLocks>) -> Self {
        Self { users, locks }
    }

    /// Adds `friend_id` to `user_id`'s friends (one side only).
    ///
    /// Returns `Unchanged` when already present. Prefer
    /// [`Self::establish_friendship`] to keep both sides consistent.
    pub fn add_friend(&self, user_id: UserId, friend_id: UserId) -> RelationshipResult {
        ensure_distinct(user_id, friend_id)?;
        self.locks
            .with_lock(PairKey::friendship(user_id, friend_id), || -> RelationshipResult {
                let applied = self.apply(&[LinkChange::AddFriend { user_id, friend_id }])?;
                Ok(RelationshipOutcome::from_applied(applied[0]))
            })
            .inspect(|outcome| log_mutation("friend_add", user_id, friend_id, *outcome))
    }

    /// Removes `friend_id` from `user_id`'s friends (one side only).
    ///
    /// Only `user_id` must exist; removing a non-friend is `Unchanged`.
    pub fn remove_friend(&self, user_id: UserId, friend_id: UserId) -> RelationshipResult {
        self.locks
            .with_lock(PairKey::friendship(user_id, friend_id), || -> RelationshipResult {
                let applied = self.apply(&[LinkChange::RemoveFriend { user_id, friend_id }])?;
                Ok(RelationshipOutcome::from_applied(applied[0]))
            })
            .inspect(|outcome| log_mutation("friend_remove", user_id, friend_id, *outcome))
    }

    /// Links both users as friends in one atomic write.
    ///
    /// A half-applied pair (only one side linked) is completed.
    pub fn establish_friendship(&self, user_id: UserId, friend_id: UserId) -> RelationshipResult {
        ensure_distinct(user_id, friend_id)?;
        self.locks
            .with_lock(PairKey::friendship(user_id, friend_id), || -> RelationshipResult {
                let applied = self.apply(&[
                    LinkChange::AddFriend { user_id, friend_id },
                    LinkChange::AddFriend {
                        user_id: friend_id,
                        friend_id: user_id,
                    },
                ])?;
                if applied[0] != applied[1] {
                    warn!(
                        "event=friendship_repair module=relationship status=ok user_id={} friend_id={}",
                        user_id, friend_id
                    );
                }
                Ok(RelationshipOutcome::from_applied(applied.contains(&true)))
            })
            .inspect(|outcome| log_mutation("friendship_establish", user_id, friend_id, *outcome))
    }

    /// Unlinks both users in one atomic write. Both users must exist.
    pub fn dissolve_friendship(&self, user_id: UserId, friend_id: UserId) -> RelationshipResult {
        ensure_distinct(user_id, friend_id)?;
        self.locks
            .with_lock(PairKey::friendship(user_id, friend_id), || -> RelationshipResult {
                let applied = self.apply(&[
                    LinkChange::RemoveFriend { user_id, friend_id },
                    LinkChange::RemoveFriend {
                        user_id: friend_id,
                        friend_id: user_id,
                    },
                ])?;
                Ok(RelationshipOutcome::from_applied(applied.contains(&true)))
            })
            .inspect(|outcome| log_mutation("friendship_dissolve", user_id, friend_id, *outcome))
    }

    /// Adds `event_id` to the user's attended events.
    ///
    /// # Errors
    /// - `AlreadyAttending` when the user already attends the event.
    pub fn add_attendance(&self, user_id: UserId, event_id: EventId) -> RelationshipResult {
        self.locks
            .with_lock(PairKey::attendance(user_id, event_id), || -> RelationshipResult {
                let applied = self.apply(&[LinkChange::AddAttendance { user_id, event_id }])?;
                if !applied[0] {
                    return Err(RelationshipError::AlreadyAttending { user_id, event_id });
                }
                Ok(RelationshipOutcome::Applied)
            })
            .inspect(|outcome| log_mutation("attendance_add", user_id, event_id, *outcome))
    }

    /// Removes `event_id` from the user's attended events.
    ///
    /// Succeeds whenever the user exists; the event is not looked up.
    pub fn remove_attendance(&self, user_id: UserId, event_id: EventId) -> RelationshipResult {
        self.locks
            .with_lock(PairKey::attendance(user_id, event_id), || -> RelationshipResult {
                let applied = self.apply(&[LinkChange::RemoveAttendance { user_id, event_id }])?;
                Ok(RelationshipOutcome::from_applied(applied[0]))
            })
            .inspect(|outcome| log_mutation("attendance_remove", user_id, event_id, *outcome))
    }

    fn apply(&self, changes: &[LinkChange]) -> Result<Vec<bool>, RelationshipError> {
        Ok(self.users.apply_links(changes)?)
    }
}

fn ensure_distinct(user_id: UserId, friend_id: UserId) -> Result<(), RelationshipError> {
    if user_id == friend_id {
        return Err(RelationshipError::SelfRelationship(user_id));
    }
    Ok(())
}

fn log_mutation(event: &str, left: i64, right: i64, outcome: RelationshipOutcome) {
    info!(
        "event={} module=relationship status=ok left_id={} right_id={} outcome={}",
        event,
        left,
        right,
        outcome.label()
    );
}
