//! Book domain model.
//!
//! # Responsibility
//! - Define the canonical `Book` record held by the inventory store.
//! - Define the loosely-typed `RawBook` shape accepted from storage, seed
//!   sources and other untyped inputs.
//!
//! # Invariants
//! - `Book::id` is non-empty once a record is owned by the store.
//! - `Book::isbn` is never empty after normalization; unknown is `"N/A"`.
//! - Wire field names are camelCase (`authorAge`, `publishedDate`, ...).
//!
//! # See also
//! - `model::normalize` for the only `RawBook -> Book` conversion.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable identifier of a book record.
///
/// Opaque string: UUIDs for generated ids, source keys for seeded ids.
pub type BookId = String;

/// Sentinel stored in `isbn` when the value is unknown.
pub const ISBN_UNKNOWN: &str = "N/A";

/// Canonical book record.
///
/// Records created from user input satisfy every form rule. Records adopted
/// from storage or a seed source are only normalized, so string fields may
/// be empty and `author_age` may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Assigned once, never changed by updates.
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// `None` when the source did not provide a usable age.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_age: Option<u32>,
    pub author_email: String,
    pub publisher: String,
    /// `YYYY-MM-DD` for form-authored records.
    pub published_date: String,
    pub overview: String,
    pub isbn: String,
}

impl Book {
    /// Returns whether the isbn carries a real value.
    pub fn has_isbn(&self) -> bool {
        !self.isbn.is_empty() && self.isbn != ISBN_UNKNOWN
    }
}

/// Unvalidated record shape from storage or a seed source.
///
/// Every field is an untyped JSON value so that numbers, nulls and strings
/// all survive deserialization; unknown keys are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_age: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_email: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<Value>,
}

impl From<&Book> for RawBook {
    fn from(book: &Book) -> Self {
        Self {
            id: Some(Value::from(book.id.as_str())),
            title: Some(Value::from(book.title.as_str())),
            author: Some(Value::from(book.author.as_str())),
            author_age: book.author_age.map(Value::from),
            author_email: Some(Value::from(book.author_email.as_str())),
            publisher: Some(Value::from(book.publisher.as_str())),
            published_date: Some(Value::from(book.published_date.as_str())),
            overview: Some(Value::from(book.overview.as_str())),
            isbn: Some(Value::from(book.isbn.as_str())),
        }
    }
}
