//! Event domain model.
//!
//! # Invariants
//! - `id` is store-assigned and never reused.
//! - `users` mirrors `User::events`; it is read-only from the event side.
//! - `date` is a UTC instant stored with millisecond precision.

use crate::model::user::UserId;
use crate::model::ValidationError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Store-assigned event identifier.
pub type EventId = i64;

/// Creation input for a new event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: DateTime<Utc>,
}

impl NewEvent {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            location: location.into(),
            date,
        }
    }

    /// Rejects blank titles.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankTitle);
        }
        Ok(())
    }
}

/// Persisted event with an optionally loaded attendee set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: DateTime<Utc>,
    /// Attendee ids. `None` when the relation was not requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<BTreeSet<UserId>>,
}

impl Event {
    /// ISO-8601 form of `date` used for search scoring,
    /// e.g. `2024-05-01T18:00:00.000Z`.
    pub fn iso_date(&self) -> String {
        self.date.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Relations to populate when loading an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventRelations {
    pub users: bool,
}

impl EventRelations {
    pub const NONE: Self = Self { users: false };
    pub const USERS: Self = Self { users: true };
}

#[cfg(test)]
mod tests {
    use super::{Event, NewEvent, ValidationError};
    use chrono::{TimeZone, Utc};

    #[test]
    fn iso_date_uses_millis_and_z_suffix() {
        let event = Event {
            id: 1,
            title: "Rust meetup".to_string(),
            description: String::new(),
            location: "Berlin".to_string(),
            date: Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap(),
            users: None,
        };
        assert_eq!(event.iso_date(), "2024-05-01T18:00:00.000Z");
    }

    #[test]
    fn blank_title_is_rejected() {
        let event = NewEvent::new(
            "   ",
            "",
            "",
            Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap(),
        );
        assert!(matches!(event.validate(), Err(ValidationError::BlankTitle)));
    }
}
