//! Runtime configuration for hosts embedding the inventory.
//!
//! # Invariants
//! - Blank environment values are ignored, never treated as overrides.
//! - Defaults alone produce a working configuration.

use std::path::PathBuf;

pub const DEFAULT_STORAGE_KEY: &str = "bookInventory";
pub const DEFAULT_DB_FILE_NAME: &str = "bookshelf.sqlite3";
pub const DEFAULT_SEED_FAILURE_MESSAGE: &str = "Unable to load book inventory.";

pub const ENV_DB_PATH: &str = "BOOKSHELF_DB_PATH";
pub const ENV_STORAGE_KEY: &str = "BOOKSHELF_STORAGE_KEY";

/// Inventory settings shared by the store and its hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryConfig {
    /// Slot key under which the serialized list is stored.
    pub storage_key: String,
    /// SQLite file used by hosts that persist to disk.
    pub db_path: PathBuf,
    /// User-facing message when the seed fails without its own message.
    pub seed_failure_message: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            seed_failure_message: DEFAULT_SEED_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl InventoryConfig {
    /// Builds a config from defaults plus `BOOKSHELF_*` environment overrides.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config using a custom variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = non_blank(lookup(ENV_DB_PATH)) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(key) = non_blank(lookup(ENV_STORAGE_KEY)) {
            config.storage_key = key;
        }
        config
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{InventoryConfig, DEFAULT_STORAGE_KEY, ENV_DB_PATH, ENV_STORAGE_KEY};
    use std::path::PathBuf;

    #[test]
    fn lookup_overrides_apply_and_blank_values_are_ignored() {
        let config = InventoryConfig::from_lookup(|name| match name {
            ENV_DB_PATH => Some(" /data/books.sqlite3 ".to_string()),
            ENV_STORAGE_KEY => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.db_path, PathBuf::from("/data/books.sqlite3"));
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }
}
