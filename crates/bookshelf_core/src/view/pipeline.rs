//! Filtered and sorted inventory projection.
//!
//! # Responsibility
//! - Filter records by a case-insensitive search term.
//! - Order records by one sort key and direction.
//!
//! # Invariants
//! - Pure: the input slice is never mutated.
//! - Sorting is stable; equal keys keep their input order in both
//!   directions.

use crate::model::book::Book;
use chrono::{DateTime, NaiveDate};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Field the list view is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    #[default]
    Title,
    Author,
    Publisher,
    PublishedDate,
    AuthorAge,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Title,
        SortKey::Author,
        SortKey::Publisher,
        SortKey::PublishedDate,
        SortKey::AuthorAge,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Publisher => "publisher",
            Self::PublishedDate => "publishedDate",
            Self::AuthorAge => "authorAge",
        }
    }
}

/// Unknown sort key string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSortKeyError(pub String);

impl Display for ParseSortKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported sort key `{}`; expected title|author|publisher|publishedDate|authorAge",
            self.0
        )
    }
}

impl Error for ParseSortKeyError {}

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == value.trim())
            .ok_or_else(|| ParseSortKeyError(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Returns the opposite direction, as a toggle button would.
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Unknown sort direction string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSortDirectionError(pub String);

impl Display for ParseSortDirectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unsupported sort direction `{}`; expected asc|desc", self.0)
    }
}

impl Error for ParseSortDirectionError {}

impl FromStr for SortDirection {
    type Err = ParseSortDirectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ParseSortDirectionError(value.to_string())),
        }
    }
}

/// View options driven by list-view UI state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    /// Raw search input; trimmed before matching.
    pub search: String,
    pub sort_key: SortKey,
    pub direction: SortDirection,
}

impl ViewQuery {
    pub fn new(search: impl Into<String>, sort_key: SortKey, direction: SortDirection) -> Self {
        Self {
            search: search.into(),
            sort_key,
            direction,
        }
    }
}

/// Extracted comparison value for one record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Number(i64),
    Text(String),
}

/// Projects records into display order.
///
/// Blank search terms match everything. Otherwise a record matches when its
/// title, author or publisher contains the term, ignoring case.
pub fn view_books(books: &[Book], query: &ViewQuery) -> Vec<Book> {
    let needle = query.search.trim().to_lowercase();
    let mut keyed = books
        .iter()
        .filter(|book| needle.is_empty() || matches_search(book, needle.as_str()))
        .map(|book| (sort_value(book, query.sort_key), book))
        .collect::<Vec<_>>();

    // `sort_by` is stable, which keeps ties in input order for both directions.
    keyed.sort_by(|(left, _), (right, _)| {
        let ordering = left.cmp(right);
        match query.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    keyed.into_iter().map(|(_, book)| book.clone()).collect()
}

fn matches_search(book: &Book, needle: &str) -> bool {
    [&book.title, &book.author, &book.publisher]
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}

fn sort_value(book: &Book, key: SortKey) -> SortValue {
    match key {
        SortKey::PublishedDate => SortValue::Number(published_epoch_ms(&book.published_date)),
        SortKey::AuthorAge => SortValue::Number(book.author_age.map_or(0, i64::from)),
        SortKey::Title => SortValue::Text(book.title.to_lowercase()),
        SortKey::Author => SortValue::Text(book.author.to_lowercase()),
        SortKey::Publisher => SortValue::Text(book.publisher.to_lowercase()),
    }
}

/// Parses a published date into epoch milliseconds (UTC).
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD`, `YYYY-MM` and `YYYY`.
/// Anything else maps to `0`.
pub fn published_epoch_ms(value: &str) -> i64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0;
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return timestamp.timestamp_millis();
    }

    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("{trimmed}-01-01"), "%Y-%m-%d"));

    date.ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map_or(0, |midnight| midnight.and_utc().timestamp_millis())
}
