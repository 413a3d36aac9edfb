//! Fallback seed sources for an empty inventory.
//!
//! # Responsibility
//! - Define the `SeedSource` contract consulted at startup.
//! - Map external catalog payloads into `RawBook` values.
//!
//! # Invariants
//! - Seed sources never assign generated ids; normalization does.
//! - Seed output always passes through `normalize_book` before adoption.

use crate::model::book::RawBook;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod open_library;

pub use open_library::{map_search_response, OpenLibrarySeed, OPEN_LIBRARY_SEARCH_URL};

pub type SeedResult<T> = Result<T, SeedError>;

/// Seed fetch failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedError {
    /// Transport failure or non-OK response reported by the host.
    Unavailable(String),
    /// Payload was received but could not be decoded.
    Malformed(String),
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "{message}"),
            Self::Malformed(message) => write!(f, "malformed seed payload: {message}"),
        }
    }
}

impl Error for SeedError {}

impl From<serde_json::Error> for SeedError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value.to_string())
    }
}

/// Source of raw records for an inventory with no stored state.
pub trait SeedSource {
    fn fetch_seed(&self) -> SeedResult<Vec<RawBook>>;
}

impl<F> SeedSource for F
where
    F: Fn() -> SeedResult<Vec<RawBook>>,
{
    fn fetch_seed(&self) -> SeedResult<Vec<RawBook>> {
        self()
    }
}

/// Fixed seed outcome, for tests and offline hosts.
#[derive(Debug, Clone)]
pub struct StaticSeed {
    outcome: SeedResult<Vec<RawBook>>,
}

impl StaticSeed {
    pub fn new(books: Vec<RawBook>) -> Self {
        Self { outcome: Ok(books) }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Seed that always fails with `err`.
    pub fn failing(err: SeedError) -> Self {
        Self { outcome: Err(err) }
    }
}

impl SeedSource for StaticSeed {
    fn fetch_seed(&self) -> SeedResult<Vec<RawBook>> {
        self.outcome.clone()
    }
}
