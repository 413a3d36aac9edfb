//! Display projections over inventory records.
//!
//! # Responsibility
//! - Derive the list-view order from search and sort UI state.
//! - Keep projection logic pure and storage-agnostic.

pub mod pipeline;
