//! Core domain logic for the meetup backend.
//! Fuzzy user/event search and friendship/attendance consistency over a
//! SQLite-backed store.

pub mod config;
pub mod db;
pub mod error;
pub mod locks;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use config::{ConfigError, SearchConfig};
pub use error::ErrorKind;
pub use locks::{PairKey, PairLocks};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::event::{Event, EventId, EventRelations, NewEvent};
pub use model::user::{NewUser, User, UserId, UserRelations};
pub use model::ValidationError;
pub use repo::event_repo::{EventRepository, SqliteEventRepository};
pub use repo::user_repo::{LinkChange, SqliteUserRepository, UserRepository};
pub use repo::{EntityRef, RepoError, RepoResult};
pub use search::{levenshtein, normalize_page, paginate, rank, rank_by};
pub use service::profile_service::{ProfileError, ProfileService};
pub use service::relationship_service::{
    RelationshipError, RelationshipOutcome, RelationshipResult, RelationshipService,
};
pub use service::search_service::{SearchError, SearchService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
