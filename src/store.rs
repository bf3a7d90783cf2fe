//! Time-gated cache over a key-value persistence substrate

use crate::{constants::CacheKey, error::CacheError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// Key-value persistence the cache writes through to
///
/// The storage medium is up to the implementation; the cache only needs
/// opaque byte blobs under string keys.
#[async_trait]
pub trait PersistentStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<Vec<u8>>;

    async fn set(&self, key: &str, value: Vec<u8>);

    async fn remove(&self, key: &str);
}

/// Process-local `PersistentStore`
#[derive(Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersistentStore for InMemoryStore {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: Vec<u8>) {
        self.entries.write().await.insert(key.to_string(), value);
    }

    async fn remove(&self, key: &str) {
        self.entries.write().await.remove(key);
    }
}

/// Cache of serialized values that expire a fixed time after being written
///
/// Each value is stored under `CacheKey::value` with its write time under
/// `CacheKey::cached_at`. Both keys are read and written while holding one
/// lock, so a reader never pairs a value with another write's timestamp.
/// Expired entries stay in the substrate until overwritten.
pub struct CacheStore {
    backend: Arc<dyn PersistentStore>,
    validity: Duration,
    lock: Mutex<()>,
}

impl CacheStore {
    /// Creates a cache whose entries stay valid for `validity`
    pub fn new(backend: Arc<dyn PersistentStore>, validity: Duration) -> Self {
        Self {
            backend,
            validity,
            lock: Mutex::new(()),
        }
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Returns the cached bytes if they were written within the validity window
    pub async fn read(&self, key: &CacheKey) -> Option<Vec<u8>> {
        self.read_at(key, Utc::now()).await
    }

    /// Like [`read`](Self::read), judging freshness against `now`
    pub async fn read_at(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<Vec<u8>> {
        let _guard = self.lock.lock().await;

        let cached_at = self.backend.get(key.cached_at).await?;
        let cached_at: DateTime<Utc> = match serde_json::from_slice(&cached_at) {
            Ok(cached_at) => cached_at,
            Err(e) => {
                tracing::warn!(key = key.cached_at, error = %e, "Unreadable cache timestamp");
                return None;
            }
        };

        let age = now.signed_duration_since(cached_at);
        // A timestamp from the future counts as fresh
        if age.to_std().is_ok_and(|age| age >= self.validity) {
            tracing::debug!(key = key.value, age_secs = age.num_seconds(), "Cache entry expired");
            return None;
        }

        self.backend.get(key.value).await
    }

    /// Stores bytes stamped with the current time
    pub async fn write(&self, key: &CacheKey, value: Vec<u8>) {
        self.write_at(key, value, Utc::now()).await
    }

    /// Stores bytes stamped with `written_at`
    pub async fn write_at(&self, key: &CacheKey, value: Vec<u8>, written_at: DateTime<Utc>) {
        // DateTime<Utc> always encodes
        let stamp = serde_json::to_vec(&written_at).unwrap_or_default();

        let _guard = self.lock.lock().await;
        self.backend.set(key.value, value).await;
        self.backend.set(key.cached_at, stamp).await;
    }

    /// Reads and decodes a fresh entry; undecodable entries count as misses
    pub async fn read_value<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let bytes = self.read(key).await?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = key.value, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    /// Encodes and stores a value stamped with the current time
    pub async fn write_value<T: Serialize + ?Sized>(
        &self,
        key: &CacheKey,
        value: &T,
    ) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.write(key, bytes).await;
        Ok(())
    }

    /// Drops an entry so the next read misses
    pub async fn invalidate(&self, key: &CacheKey) {
        let _guard = self.lock.lock().await;
        self.backend.remove(key.cached_at).await;
        self.backend.remove(key.value).await;
    }
}
