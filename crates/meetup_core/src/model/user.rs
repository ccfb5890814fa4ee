//! User domain model.
//!
//! # Responsibility
//! - Define the user record and its relationship id sets.
//! - Validate registration-facing fields before persistence.
//!
//! # Invariants
//! - `id` is store-assigned and never reused.
//! - `friends`/`events` are `None` when not loaded, never an implicit empty.
//! - A user is never in its own `friends` set.

use crate::model::event::EventId;
use crate::model::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

static NICKNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").expect("valid nickname regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex")
});

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 25;

/// Store-assigned user identifier.
pub type UserId = i64;

/// Registration input for a new user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub nickname: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl NewUser {
    pub fn new(
        nickname: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            nickname: nickname.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    /// Validates registration fields.
    ///
    /// # Errors
    /// - Nickname must start with an ASCII letter and contain only ASCII
    ///   letters and digits.
    /// - First/last name must be 2 to 25 ASCII letters.
    /// - Email must look like `local@domain.tld`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !NICKNAME_RE.is_match(&self.nickname) {
            return Err(ValidationError::InvalidNickname(self.nickname.clone()));
        }
        validate_name("first_name", &self.first_name)?;
        validate_name("last_name", &self.last_name)?;
        if !EMAIL_RE.is_match(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }
}

/// Persisted user with optionally loaded relationship sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub nickname: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Friend ids. `None` when the relation was not requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friends: Option<BTreeSet<UserId>>,
    /// Attended event ids. `None` when the relation was not requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<BTreeSet<EventId>>,
}

/// Relations to populate when loading a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserRelations {
    pub friends: bool,
    pub events: bool,
}

impl UserRelations {
    /// Loads no relationship sets.
    pub const NONE: Self = Self {
        friends: false,
        events: false,
    };
    /// Loads only `friends`.
    pub const FRIENDS: Self = Self {
        friends: true,
        events: false,
    };
    /// Loads only `events`.
    pub const EVENTS: Self = Self {
        friends: false,
        events: true,
    };
    /// Loads every relationship set.
    pub const ALL: Self = Self {
        friends: true,
        events: true,
    };
}

fn validate_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let count = value.chars().count();
    let alphabetic = value.chars().all(|ch| ch.is_ascii_alphabetic());
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&count) || !alphabetic {
        return Err(ValidationError::InvalidName {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{NewUser, User, ValidationError};
    use std::collections::BTreeSet;

    fn valid() -> NewUser {
        NewUser::new("alice01", "Alice", "Smith", "alice@example.com")
    }

    #[test]
    fn valid_registration_passes() {
        valid().validate().expect("registration should be valid");
    }

    #[test]
    fn nickname_rejects_underscores_anywhere() {
        for nickname in ["_shadow", "al_ice", "alice_"] {
            let mut user = valid();
            user.nickname = nickname.to_string();
            assert!(
                matches!(user.validate(), Err(ValidationError::InvalidNickname(_))),
                "{nickname} should be rejected"
            );
        }
    }

    #[test]
    fn names_must_be_ascii_letters() {
        let mut user = valid();
        user.first_name = "Zo\u{eb}".to_string();
        assert!(matches!(
            user.validate(),
            Err(ValidationError::InvalidName {
                field: "first_name",
                ..
            })
        ));
    }

    #[test]
    fn nickname_must_start_with_letter() {
        let mut user = valid();
        user.nickname = "1alice".to_string();
        assert!(matches!(
            user.validate(),
            Err(ValidationError::InvalidNickname(_))
        ));

        user.nickname = String::new();
        assert!(matches!(
            user.validate(),
            Err(ValidationError::InvalidNickname(_))
        ));
    }

    #[test]
    fn names_are_length_and_alpha_checked() {
        let mut user = valid();
        user.first_name = "A".to_string();
        assert!(matches!(
            user.validate(),
            Err(ValidationError::InvalidName {
                field: "first_name",
                ..
            })
        ));

        let mut user = valid();
        user.last_name = "Sm1th".to_string();
        assert!(matches!(
            user.validate(),
            Err(ValidationError::InvalidName {
                field: "last_name",
                ..
            })
        ));
    }

    #[test]
    fn email_shape_is_checked() {
        let mut user = valid();
        user.email = "alice.example.com".to_string();
        assert!(matches!(user.validate(), Err(ValidationError::InvalidEmail)));
    }

    #[test]
    fn unloaded_relations_are_omitted_from_json() {
        let user = User {
            id: 1,
            nickname: "alice".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            email: "alice@example.com".to_string(),
            friends: Some(BTreeSet::new()),
            events: None,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["friends"], serde_json::json!([]));
        assert!(json.get("events").is_none());

        let decoded: User = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, user);
    }
}
