use super::{StorageResult, StorageSlot};

/// In-process slot for tests and hosts without a database.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    value: Option<String>,
    save_count: usize,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a slot pre-filled with a stored value.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            save_count: 0,
        }
    }

    /// Raw stored value, including an empty string.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Number of `save` calls observed.
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl StorageSlot for MemorySlot {
    fn load(&self) -> StorageResult<Option<String>> {
        Ok(self.value.clone().filter(|value| !value.is_empty()))
    }

    fn save(&mut self, serialized: &str) -> StorageResult<()> {
        self.value = Some(serialized.to_string());
        self.save_count += 1;
        Ok(())
    }
}
