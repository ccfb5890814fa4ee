//! Read-only profile and event detail lookups.

use crate::error::ErrorKind;
use crate::model::event::{Event, EventId, EventRelations};
use crate::model::user::{User, UserId, UserRelations};
use crate::repo::event_repo::EventRepository;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ProfileError {
    UserNotFound(UserId),
    EventNotFound(EventId),
    Repo(RepoError),
}

impl ProfileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UserNotFound(_) | Self::EventNotFound(_) => ErrorKind::NotFound,
            Self::Repo(err) => err.kind(),
        }
    }
}

impl Display for ProfileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::EventNotFound(id) => write!(f, "event not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProfileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ProfileError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Lookup facade for single users and events.
pub struct ProfileService<U: UserRepository, E: EventRepository> {
    users: U,
    events: E,
}

impl<U: UserRepository, E: EventRepository> ProfileService<U, E> {
    pub fn new(users: U, events: E) -> Self {
        Self { users, events }
    }

    /// Loads a user with friends and attended events.
    pub fn user_profile(&self, user_id: UserId) -> Result<User, ProfileError> {
        self.users
            .get_user(user_id, UserRelations::ALL)?
            .ok_or(ProfileError::UserNotFound(user_id))
    }

    /// Loads an event with its attendee ids.
    pub fn event_details(&self, event_id: EventId) -> Result<Event, ProfileError> {
        self.events
            .get_event(event_id, EventRelations::USERS)?
            .ok_or(ProfileError::EventNotFound(event_id))
    }
}
