use crate::domain::ports::RecordStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory key/value store.
///
/// Uses `Arc<RwLock<HashMap>>` so `Clone` shares the underlying map: two
/// handles model the same storage area, which is how tests and the CLI stand
/// in for both the persistent and the session-scoped medium.
#[derive(Default, Clone)]
pub struct InMemoryRecordStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryRecordStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(&self, key: &str) -> io::Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> io::Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> io::Result<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }

    async fn keys(&self) -> io::Result<Vec<String>> {
        let entries = self.entries.read().await;
        Ok(entries.keys().cloned().collect())
    }
}
