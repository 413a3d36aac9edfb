//! SQLite bootstrap for the durable inventory slot.
//!
//! # Responsibility
//! - Open and configure the connection behind `SqliteSlot`.
//! - Create and upgrade the `kv_slots` schema in deterministic order.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Slots are never read or written before migrations succeed.
//! - Failures surface as `StorageError`, the slot's own error type.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
