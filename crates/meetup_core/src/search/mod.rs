//! Fuzzy search building blocks.
//!
//! # Responsibility
//! - Edit distance between two strings.
//! - Generic rank/filter pipeline driven by a caller-supplied scorer.
//! - Page slicing over ordered results.
//!
//! # Invariants
//! - Everything here is pure and in-memory; no store access.
//!
//! # See also
//! - `service::search_service` for the composed user/event queries.

pub mod distance;
pub mod paginate;
pub mod rank;

pub use distance::levenshtein;
pub use paginate::{normalize_page, paginate};
pub use rank::{rank, rank_by, DEFAULT_MAX_DISTANCE};
