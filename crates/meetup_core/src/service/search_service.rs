//! Fuzzy user/event search use-cases.
//!
//! # Responsibility
//! - Load the full candidate collection from the store.
//! - Rank candidates by two-field edit distance when a query is present.
//! - Slice the result into one page.
//!
//! # Invariants
//! - Without a query, results keep store order.
//! - Query and fields are lowercased before distance is computed.
//! - A candidate's score is the smaller of its two field distances.
//! - No failure modes beyond store reads.

use crate::config::SearchConfig;
use crate::error::ErrorKind;
use crate::model::event::Event;
use crate::model::user::User;
use crate::repo::event_repo::EventRepository;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use crate::search::{levenshtein, paginate, rank_by};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Search-layer error; wraps store read failures unchanged.
#[derive(Debug)]
pub enum SearchError {
    Repo(RepoError),
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Repo(err) => err.kind(),
        }
    }
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for SearchError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Search facade over user and event repositories.
pub struct SearchService<U: UserRepository, E: EventRepository> {
    users: U,
    events: E,
    config: SearchConfig,
}

impl<U: UserRepository, E: EventRepository> SearchService<U, E> {
    pub fn new(users: U, events: E, config: SearchConfig) -> Self {
        Self {
            users,
            events,
            config,
        }
    }

    /// Searches users by nickname or email.
    pub fn search_users(&self, page: u32, query: Option<&str>) -> Result<Vec<User>, SearchError> {
        let candidates = self.users.list_users()?;
        let total = candidates.len();
        let results = ranked_page(candidates, page, query, &self.config, |query, user| {
            two_field_distance(query, &user.nickname, &user.email)
        });
        log_search("user", page, query, total, results.len());
        Ok(results)
    }

    /// Searches events by title or ISO-8601 date.
    pub fn search_events(
        &self,
        page: u32,
        query: Option<&str>,
    ) -> Result<Vec<Event>, SearchError> {
        let candidates = self.events.list_events()?;
        let total = candidates.len();
        let results = ranked_page(candidates, page, query, &self.config, |query, event| {
            two_field_distance(query, &event.title, &event.iso_date())
        });
        log_search("event", page, query, total, results.len());
        Ok(results)
    }
}

/// Ranks `candidates` against `query` (if any) and returns one page.
///
/// `score` receives the already lowercased query. A missing or blank query
/// paginates `candidates` as given.
pub fn ranked_page<T, F>(
    candidates: Vec<T>,
    page: u32,
    query: Option<&str>,
    config: &SearchConfig,
    score: F,
) -> Vec<T>
where
    F: Fn(&str, &T) -> usize,
{
    let Some(query) = active_query(query) else {
        return paginate(candidates, page, config.page_size());
    };

    let lowered = query.to_lowercase();
    let ranked = rank_by(
        candidates,
        |candidate| score(&lowered, candidate),
        config.max_distance(),
    );
    paginate(ranked, page, config.page_size())
}

/// Distance from a lowercased query to the closer of two fields.
pub fn two_field_distance(lowered_query: &str, first: &str, second: &str) -> usize {
    let first = levenshtein(lowered_query, &first.to_lowercase());
    let second = levenshtein(lowered_query, &second.to_lowercase());
    first.min(second)
}

fn active_query(query: Option<&str>) -> Option<&str> {
    query.filter(|text| !text.trim().is_empty())
}

fn log_search(kind: &str, page: u32, query: Option<&str>, candidates: usize, returned: usize) {
    debug!(
        "event=search module=search status=ok kind={} page={} query_len={} candidates={} returned={}",
        kind,
        page,
        active_query(query).map_or(0, |text| text.chars().count()),
        candidates,
        returned
    );
}
