//! User-authored input boundary.
//!
//! # Responsibility
//! - Validate form submissions before they reach the inventory store.
//! - Produce form prefills for editing existing records.

pub mod validate;
