use crate::domain::ports::RecordStoreBox;
use crate::error::{PaymentError, Result};
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

const KEY_LEN: usize = 32;
const IV_LEN: usize = 12;

/// Session-scoped slot holding the exported key bytes (JSON array of integers).
pub const SESSION_KEY_SLOT: &str = "payment-app-key";

/// Tunables for the encrypted record store.
#[derive(Debug, Clone)]
pub struct SecureStoreConfig {
    /// Prefix distinguishing encrypted records from other data sharing the medium.
    pub namespace: String,
    /// Age after which a record is treated as absent and purged on access.
    pub ttl: Duration,
}

impl Default for SecureStoreConfig {
    fn default() -> Self {
        Self {
            namespace: "secure_".to_string(),
            ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Envelope persisted for every logical key.
#[derive(Serialize, Deserialize)]
struct EncryptedRecord {
    data: Vec<u8>,
    iv: Vec<u8>,
    timestamp: u64,
}

/// Encrypting key/value store for cross-step wizard state.
///
/// Values are sealed with AES-256-GCM under a key minted once per session and
/// parked in the session-scoped medium; records live in the persistent medium
/// under a namespaced key together with their write timestamp. Reads lazily
/// purge expired or undecryptable records and report them as absent, so
/// encrypted state is a session-bound cache, not durable storage: losing the
/// session key makes every record unrecoverable.
pub struct SecureStore {
    records: RecordStoreBox,
    session: RecordStoreBox,
    config: SecureStoreConfig,
    key: Option<[u8; KEY_LEN]>,
}

impl SecureStore {
    pub fn new(records: RecordStoreBox, session: RecordStoreBox) -> Self {
        Self::with_config(records, session, SecureStoreConfig::default())
    }

    pub fn with_config(
        records: RecordStoreBox,
        session: RecordStoreBox,
        config: SecureStoreConfig,
    ) -> Self {
        Self {
            records,
            session,
            config,
            key: None,
        }
    }

    fn record_key(&self, key: &str) -> String {
        format!("{}{}", self.config.namespace, key)
    }

    /// Imports the session key, minting and exporting a fresh one on first use.
    async fn session_key(&mut self) -> Result<[u8; KEY_LEN]> {
        if let Some(key) = self.key {
            return Ok(key);
        }
        if let Some(exported) = self.session.get(SESSION_KEY_SLOT).await? {
            match serde_json::from_str::<Vec<u8>>(&exported) {
                Ok(bytes) if bytes.len() == KEY_LEN => {
                    let mut key = [0u8; KEY_LEN];
                    key.copy_from_slice(&bytes);
                    self.key = Some(key);
                    return Ok(key);
                }
                _ => {
                    // Records sealed under an unusable export are already
                    // lost; mint a replacement and let them purge on read.
                    warn!("discarding malformed session key material");
                    self.session.remove(SESSION_KEY_SLOT).await?;
                }
            }
        }
        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        self.session
            .put(SESSION_KEY_SLOT, serde_json::to_string(&key.to_vec())?)
            .await?;
        self.key = Some(key);
        Ok(key)
    }

    /// Encrypts `value` and writes it under `key`, replacing any prior record.
    ///
    /// A fresh random IV is drawn per call; IVs are never reused.
    pub async fn put(&mut self, key: &str, value: &str) -> Result<()> {
        let session_key = self.session_key().await?;
        let cipher =
            Aes256Gcm::new_from_slice(&session_key).map_err(|_| PaymentError::Crypto)?;
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);
        let data = cipher
            .encrypt(Nonce::from_slice(&iv), value.as_bytes())
            .map_err(|_| PaymentError::Crypto)?;
        let record = EncryptedRecord {
            data,
            iv: iv.to_vec(),
            timestamp: now_ms(),
        };
        self.records
            .put(&self.record_key(key), serde_json::to_string(&record)?)
            .await?;
        Ok(())
    }

    /// Reads and decrypts the record under `key`.
    ///
    /// Returns `Ok(None)` for absent, expired and undecryptable records
    /// alike; the latter two are deleted on the way out, so a caller can
    /// never observe a distinct "corrupted" state.
    pub async fn get(&mut self, key: &str) -> Result<Option<String>> {
        let record_key = self.record_key(key);
        let Some(stored) = self.records.get(&record_key).await? else {
            return Ok(None);
        };
        let record: EncryptedRecord = match serde_json::from_str(&stored) {
            Ok(record) => record,
            Err(_) => {
                warn!(key, "purging unreadable record");
                self.records.remove(&record_key).await?;
                return Ok(None);
            }
        };
        if now_ms().saturating_sub(record.timestamp) > self.config.ttl.as_millis() as u64 {
            debug!(key, "record expired");
            self.records.remove(&record_key).await?;
            return Ok(None);
        }
        if record.iv.len() != IV_LEN {
            warn!(key, "purging record with malformed IV");
            self.records.remove(&record_key).await?;
            return Ok(None);
        }
        let session_key = self.session_key().await?;
        let cipher =
            Aes256Gcm::new_from_slice(&session_key).map_err(|_| PaymentError::Crypto)?;
        let plaintext = cipher
            .decrypt(Nonce::from_slice(&record.iv), record.data.as_slice())
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok());
        match plaintext {
            Some(value) => Ok(Some(value)),
            None => {
                warn!(key, "purging undecryptable record");
                self.records.remove(&record_key).await?;
                Ok(None)
            }
        }
    }

    /// Deletes the record under `key`; absent keys are a no-op.
    pub async fn remove(&mut self, key: &str) -> Result<()> {
        self.records.remove(&self.record_key(key)).await?;
        Ok(())
    }

    /// Drops every namespaced record and the session key material.
    ///
    /// The next `put` or `get` mints a fresh key.
    pub async fn clear(&mut self) -> Result<()> {
        for key in self.records.keys().await? {
            if key.starts_with(&self.config.namespace) {
                self.records.remove(&key).await?;
            }
        }
        self.session.remove(SESSION_KEY_SLOT).await?;
        self.key = None;
        Ok(())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::RecordStore;
    use crate::infrastructure::in_memory::InMemoryRecordStore;

    fn store_over(records: InMemoryRecordStore, session: InMemoryRecordStore) -> SecureStore {
        SecureStore::new(Box::new(records), Box::new(session))
    }

    #[tokio::test]
    async fn test_round_trip() {
        let mut store = store_over(InMemoryRecordStore::new(), InMemoryRecordStore::new());
        store.put("selectedServiceId", "service1").await.unwrap();
        assert_eq!(
            store.get("selectedServiceId").await.unwrap(),
            Some("service1".to_string())
        );
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let mut store = store_over(InMemoryRecordStore::new(), InMemoryRecordStore::new());
        store.put("k", "old").await.unwrap();
        store.put("k", "new").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_absent_and_removed_keys() {
        let mut store = store_over(InMemoryRecordStore::new(), InMemoryRecordStore::new());
        assert_eq!(store.get("missing").await.unwrap(), None);

        store.put("k", "v").await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        // removing again is a no-op
        store.remove("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_records_are_namespaced_and_encrypted() {
        let records = InMemoryRecordStore::new();
        let mut store = store_over(records.clone(), InMemoryRecordStore::new());
        store.put("batchData", "[\"TXN001\"]").await.unwrap();

        assert_eq!(records.get("batchData").await.unwrap(), None);
        let raw = records.get("secure_batchData").await.unwrap().unwrap();
        assert!(!raw.contains("TXN001"));

        let record: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(record["iv"].as_array().unwrap().len(), IV_LEN);
        assert!(record["timestamp"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_fresh_iv_per_write() {
        let records = InMemoryRecordStore::new();
        let mut store = store_over(records.clone(), InMemoryRecordStore::new());

        store.put("k", "same value").await.unwrap();
        let first = records.get("secure_k").await.unwrap().unwrap();
        store.put("k", "same value").await.unwrap();
        let second = records.get("secure_k").await.unwrap().unwrap();

        let first: serde_json::Value = serde_json::from_str(&first).unwrap();
        let second: serde_json::Value = serde_json::from_str(&second).unwrap();
        assert_ne!(first["iv"], second["iv"]);
    }

    #[tokio::test]
    async fn test_clear_forgets_everything() {
        let records = InMemoryRecordStore::new();
        let session = InMemoryRecordStore::new();
        let mut store = store_over(records.clone(), session.clone());

        store.put("a", "1").await.unwrap();
        store.put("b", "2").await.unwrap();
        let old_key = session.get(SESSION_KEY_SLOT).await.unwrap().unwrap();

        store.clear().await.unwrap();
        assert_eq!(session.get(SESSION_KEY_SLOT).await.unwrap(), None);
        assert_eq!(store.get("a").await.unwrap(), None);
        assert_eq!(store.get("b").await.unwrap(), None);

        // a later write mints a different key
        store.put("a", "1").await.unwrap();
        let new_key = session.get(SESSION_KEY_SLOT).await.unwrap().unwrap();
        assert_ne!(old_key, new_key);
    }

    #[tokio::test]
    async fn test_malformed_session_key_is_replaced() {
        let records = InMemoryRecordStore::new();
        let session = InMemoryRecordStore::new();
        session
            .put(SESSION_KEY_SLOT, "not a key".to_string())
            .await
            .unwrap();

        let mut store = store_over(records, session.clone());
        store.put("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));

        let exported = session.get(SESSION_KEY_SLOT).await.unwrap().unwrap();
        let bytes: Vec<u8> = serde_json::from_str(&exported).unwrap();
        assert_eq!(bytes.len(), KEY_LEN);
    }
}
