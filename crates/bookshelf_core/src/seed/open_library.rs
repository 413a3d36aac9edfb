//! OpenLibrary search payload adapter.
//!
//! # Responsibility
//! - Map an OpenLibrary `search.json` body into `RawBook` records.
//! - Derive placeholder author metadata the catalog does not carry.
//!
//! # Invariants
//! - The HTTP request is performed by the host; this module only decodes.
//! - Ids come from the work key, else `"<publishYear>-<index>"`.
//! - Mapping is deterministic for a fixed `current_year`.

use super::{SeedError, SeedResult, SeedSource};
use crate::model::book::{RawBook, ISBN_UNKNOWN};
use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

/// Catalog query the host is expected to fetch.
pub const OPEN_LIBRARY_SEARCH_URL: &str =
    "https://openlibrary.org/search.json?q=programming&limit=18";

pub const FETCH_FAILED_MESSAGE: &str = "Unable to fetch books from the API.";

const WORK_KEY_PREFIX: &str = "/works/";
const UNTITLED: &str = "Untitled Book";
const UNKNOWN_AUTHOR: &str = "Unknown Author";
const UNKNOWN_PUBLISHER: &str = "Unknown Publisher";
const MISSING_OVERVIEW: &str = "Overview not available. Add details from the inventory form.";
const EMAIL_DOMAIN: &str = "books.local";
const AGE_OFFSET_YEARS: i64 = 28;
const AGE_MIN: i64 = 25;
const AGE_MAX: i64 = 90;

static NON_ALNUM_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\s]").expect("valid email sanitize regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Option<Vec<Value>>,
}

/// Seed source over a catalog response obtained by the host.
#[derive(Debug, Clone)]
pub struct OpenLibrarySeed {
    response: Result<String, String>,
    current_year: i32,
}

impl OpenLibrarySeed {
    /// Wraps a successful response body.
    pub fn from_body(body: impl Into<String>) -> Self {
        Self {
            response: Ok(body.into()),
            current_year: chrono::Local::now().year(),
        }
    }

    /// Records a failed fetch (transport error or non-OK status).
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
            current_year: chrono::Local::now().year(),
        }
    }

    /// Pins the year used for fallback dates and derived ages.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }
}

impl SeedSource for OpenLibrarySeed {
    fn fetch_seed(&self) -> SeedResult<Vec<RawBook>> {
        match &self.response {
            Ok(body) => map_search_response(body, self.current_year),
            Err(message) if message.trim().is_empty() => {
                Err(SeedError::Unavailable(FETCH_FAILED_MESSAGE.to_string()))
            }
            Err(message) => Err(SeedError::Unavailable(message.clone())),
        }
    }
}

/// Decodes a `search.json` body into raw records.
///
/// # Errors
/// - `SeedError::Malformed` when the body is not JSON or `docs` is not a list.
pub fn map_search_response(body: &str, current_year: i32) -> SeedResult<Vec<RawBook>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    let docs = response.docs.unwrap_or_default();
    Ok(docs
        .iter()
        .enumerate()
        .map(|(index, doc)| map_doc(doc, index, current_year))
        .collect())
}

fn map_doc(doc: &Value, index: usize, current_year: i32) -> RawBook {
    let author = first_text(doc.get("author_name")).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
    let publish_year = doc
        .get("first_publish_year")
        .and_then(Value::as_i64)
        .filter(|year| *year != 0)
        .unwrap_or_else(|| i64::from(current_year));
    let id = doc
        .get("key")
        .and_then(Value::as_str)
        .map(|key| key.replacen(WORK_KEY_PREFIX, "", 1))
        .filter(|key| !key.is_empty())
        .unwrap_or_else(|| format!("{publish_year}-{index}"));
    let author_age =
        (i64::from(current_year) - publish_year + AGE_OFFSET_YEARS).clamp(AGE_MIN, AGE_MAX);

    RawBook {
        id: Some(Value::from(id)),
        title: Some(Value::from(
            non_empty_text(doc.get("title")).unwrap_or_else(|| UNTITLED.to_string()),
        )),
        author_email: Some(Value::from(author_email(&author))),
        author: Some(Value::from(author)),
        author_age: Some(Value::from(author_age)),
        publisher: Some(Value::from(
            first_text(doc.get("publisher")).unwrap_or_else(|| UNKNOWN_PUBLISHER.to_string()),
        )),
        published_date: Some(Value::from(format!("{publish_year}-01-01"))),
        overview: Some(Value::from(overview(doc))),
        isbn: Some(Value::from(
            first_text(doc.get("isbn")).unwrap_or_else(|| ISBN_UNKNOWN.to_string()),
        )),
    }
}

fn overview(doc: &Value) -> String {
    match doc.get("first_sentence") {
        Some(Value::Array(_)) => first_text(doc.get("first_sentence")),
        sentence @ Some(Value::String(_)) => non_empty_text(sentence),
        _ => None,
    }
    .or_else(|| non_empty_text(doc.get("subtitle")))
    .unwrap_or_else(|| MISSING_OVERVIEW.to_string())
}

/// Builds a placeholder address from an author name.
///
/// `"Robert C. Martin"` becomes `robert.c.martin@books.local`.
pub fn author_email(author: &str) -> String {
    let lowered = author.to_lowercase();
    let stripped = NON_ALNUM_SPACE_RE.replace_all(&lowered, "");
    let local = WHITESPACE_RE.replace_all(stripped.trim(), ".");
    let local = if local.is_empty() { "author" } else { &*local };
    format!("{local}@{EMAIL_DOMAIN}")
}

fn first_text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(|first| non_empty_text(Some(first)))
}

fn non_empty_text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
