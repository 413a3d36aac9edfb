//! Book inventory domain model.
//!
//! # Responsibility
//! - Define the canonical `Book` record and its untyped `RawBook` input.
//! - Own the single `RawBook -> Book` normalization boundary.
//!
//! # Invariants
//! - Every record in the store is identified by a non-empty `BookId`.
//! - Machine-sourced records are normalized, never form-validated.

pub mod book;
pub mod normalize;
