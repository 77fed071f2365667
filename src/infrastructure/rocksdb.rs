use crate::domain::ports::RecordStore;
use async_trait::async_trait;
use rocksdb::{DB, Options};
use std::io;
use std::path::Path;
use std::sync::Arc;

/// A persistent record store backed by RocksDB.
///
/// Models durable browser storage: encrypted records survive process
/// restarts while the session key does not, so a reopened store reads its
/// old records as absent and they purge on first access.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbRecordStore {
    db: Arc<DB>,
}

impl RocksDbRecordStore {
    /// Opens or creates a RocksDB instance at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path).map_err(io::Error::other)?;
        Ok(Self { db: Arc::new(db) })
    }
}

#[async_trait]
impl RecordStore for RocksDbRecordStore {
    async fn get(&self, key: &str) -> io::Result<Option<String>> {
        let value = self.db.get(key.as_bytes()).map_err(io::Error::other)?;
        value
            .map(|bytes| {
                String::from_utf8(bytes)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
            })
            .transpose()
    }

    async fn put(&self, key: &str, value: String) -> io::Result<()> {
        self.db
            .put(key.as_bytes(), value.into_bytes())
            .map_err(io::Error::other)
    }

    async fn remove(&self, key: &str) -> io::Result<()> {
        self.db.delete(key.as_bytes()).map_err(io::Error::other)
    }

    async fn keys(&self) -> io::Result<Vec<String>> {
        let mut keys = Vec::new();
        for item in self.db.iterator(rocksdb::IteratorMode::Start) {
            let (key, _value) = item.map_err(io::Error::other)?;
            keys.push(String::from_utf8_lossy(&key).into_owned());
        }
        Ok(keys)
    }
}
