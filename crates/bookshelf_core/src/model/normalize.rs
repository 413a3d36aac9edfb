//! Record normalization.
//!
//! # Responsibility
//! - Coerce any `RawBook` into a fully-populated `Book`.
//! - Generate identifiers for records that arrive without one.
//!
//! # Invariants
//! - Normalization is total and never mutates its input.
//! - Missing or falsy strings become `""`; a missing isbn becomes `"N/A"`.
//! - Generated ids are unique for the process lifetime.

use crate::model::book::{Book, BookId, RawBook, ISBN_UNKNOWN};
use rand::rngs::OsRng;
use rand::RngCore;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Builder;

static FALLBACK_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Converts one raw record into a canonical `Book`.
///
/// `id` is kept when it is a non-empty string or a number; otherwise a
/// fresh id is generated.
pub fn normalize_book(raw: &RawBook) -> Book {
    let id = raw
        .id
        .as_ref()
        .and_then(value_to_text)
        .unwrap_or_else(generate_book_id);

    let isbn = raw
        .isbn
        .as_ref()
        .and_then(value_to_text)
        .unwrap_or_else(|| ISBN_UNKNOWN.to_string());

    Book {
        id,
        title: text_or_empty(raw.title.as_ref()),
        author: text_or_empty(raw.author.as_ref()),
        author_age: raw.author_age.as_ref().and_then(value_to_age),
        author_email: text_or_empty(raw.author_email.as_ref()),
        publisher: text_or_empty(raw.publisher.as_ref()),
        published_date: text_or_empty(raw.published_date.as_ref()),
        overview: text_or_empty(raw.overview.as_ref()),
        isbn,
    }
}

/// Normalizes a whole list, preserving order.
pub fn normalize_books(raws: &[RawBook]) -> Vec<Book> {
    raws.iter().map(normalize_book).collect()
}

/// Generates a new record id.
///
/// Uses an OS-random v4 UUID; when the OS random source is unavailable it
/// falls back to `<epoch_ms>-<suffix>` built from the clock and a process
/// counter.
pub fn generate_book_id() -> BookId {
    let mut bytes = [0_u8; 16];
    match OsRng.try_fill_bytes(&mut bytes) {
        Ok(()) => Builder::from_random_bytes(bytes).into_uuid().to_string(),
        Err(err) => {
            log::warn!(
                "event=id_generate module=model status=fallback error_code=os_rng_unavailable error={}",
                err
            );
            fallback_book_id()
        }
    }
}

fn fallback_book_id() -> BookId {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let counter = FALLBACK_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix = u64::from(elapsed.subsec_nanos()) ^ counter.rotate_left(32);
    format!("{}-{:x}{:04x}", elapsed.as_millis(), suffix, counter)
}

fn text_or_empty(value: Option<&Value>) -> String {
    value.and_then(value_to_text).unwrap_or_default()
}

/// Returns text for truthy scalar values; `None` for null, false, `""`, 0.
fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) if number.as_f64() != Some(0.0) => Some(number.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn value_to_age(value: &Value) -> Option<u32> {
    let age = match value {
        Value::Number(number) => match number.as_u64() {
            Some(whole) => u32::try_from(whole).ok(),
            None => number
                .as_f64()
                .filter(|float| float.is_finite() && *float >= 1.0 && *float <= f64::from(u32::MAX))
                .map(|float| float.trunc() as u32),
        },
        Value::String(text) => text.trim().parse::<u32>().ok(),
        _ => None,
    }?;
    (age > 0).then_some(age)
}
