//! Core inventory engine for Bookshelf.
//! This crate is the single source of truth for book inventory invariants.

pub mod config;
pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod seed;
pub mod service;
pub mod storage;
pub mod view;

pub use config::InventoryConfig;
pub use form::validate::{validate_book_form, BookForm, FormErrors, FormField};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::book::{Book, BookId, RawBook, ISBN_UNKNOWN};
pub use model::normalize::{generate_book_id, normalize_book, normalize_books};
pub use seed::{OpenLibrarySeed, SeedError, SeedSource, StaticSeed};
pub use service::inventory::{
    InventoryError, InventoryStore, LoadPhase, StartupReport, StartupSource, SubmitError,
};
pub use storage::{MemorySlot, SqliteSlot, StorageError, StorageResult, StorageSlot};
pub use view::pipeline::{view_books, SortDirection, SortKey, ViewQuery};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
