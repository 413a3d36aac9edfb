//! SQLite-backed storage slot.
//!
//! # Invariants
//! - One slot maps to one `kv_slots` row keyed by `slot_key`.
//! - `save` is an upsert; the row is never deleted.

use super::{StorageResult, StorageSlot};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Storage slot persisted in a SQLite database.
pub struct SqliteSlot {
    conn: Connection,
    key: String,
}

impl SqliteSlot {
    /// Wraps an already-migrated connection.
    pub fn new(conn: Connection, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
        }
    }

    /// Opens the database file at `path` and binds the slot `key`.
    pub fn open(path: impl AsRef<Path>, key: impl Into<String>) -> StorageResult<Self> {
        Ok(Self::new(open_db(path)?, key))
    }

    /// Opens a private in-memory database and binds the slot `key`.
    pub fn open_in_memory(key: impl Into<String>) -> StorageResult<Self> {
        Ok(Self::new(open_db_in_memory()?, key))
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl StorageSlot for SqliteSlot {
    fn load(&self) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE slot_key = ?1;",
                [self.key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value.filter(|value| !value.is_empty()))
    }

    fn save(&mut self, serialized: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (slot_key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(slot_key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![self.key.as_str(), serialized],
        )?;
        Ok(())
    }
}
