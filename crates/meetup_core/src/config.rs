//! Search configuration.
//!
//! # Invariants
//! - `page_size` is at least 1 and shared by every search call.
//! - `max_distance` is the inclusive fuzzy-match threshold.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 1000;
/// Threshold passed to ranking by search entry points.
pub const DEFAULT_SEARCH_MAX_DISTANCE: usize = 2;

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroPageSize,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroPageSize => write!(f, "page_size must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

/// Process-wide search settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    page_size: usize,
    max_distance: usize,
}

impl SearchConfig {
    /// Builds a config, rejecting a zero page size.
    pub fn new(page_size: usize, max_distance: usize) -> Result<Self, ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(Self {
            page_size,
            max_distance,
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn max_distance(&self) -> usize {
        self.max_distance
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_distance: DEFAULT_SEARCH_MAX_DISTANCE,
        }
    }
}
