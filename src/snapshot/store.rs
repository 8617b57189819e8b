// Key-value state store seam plus the in-memory backend.

use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::PersistenceError;

/// Byte-valued key-value store holding the persisted snapshot.
#[async_trait::async_trait]
pub trait KvStore: Send + Sync {
    /// `Ok(None)` when the key has never been written.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError>;

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), PersistenceError>;
}

/// Process-local store. State does not survive a restart.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), PersistenceError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}
