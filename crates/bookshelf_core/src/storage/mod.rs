//! Durable key-value slot holding the serialized inventory.
//!
//! # Responsibility
//! - Define the `StorageSlot` contract used by the inventory store.
//! - Provide in-memory and SQLite-backed slot implementations.
//!
//! # Invariants
//! - A slot holds exactly one string value or nothing.
//! - An empty stored string is reported as absent.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemorySlot;
pub use sqlite::SqliteSlot;

pub type StorageResult<T> = Result<T, StorageError>;

/// Slot transport failure.
#[derive(Debug)]
pub enum StorageError {
    /// SQLite rejected an open, migration, read or write.
    Sqlite(rusqlite::Error),
    /// The slot file was written by a newer schema than this build knows.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "inventory storage failed: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "inventory storage failed: slot schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Single durable slot for the serialized record list.
pub trait StorageSlot {
    /// Reads the stored value, `None` when nothing (or `""`) is stored.
    fn load(&self) -> StorageResult<Option<String>>;
    /// Replaces the stored value.
    fn save(&mut self, serialized: &str) -> StorageResult<()>;
}
