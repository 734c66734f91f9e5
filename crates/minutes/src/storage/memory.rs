//! In-memory key-value store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::KeyValueStore;
use crate::error::{Error, Result};

/// Process-local store backed by a hash map.
///
/// An optional quota bounds the total bytes held (keys plus values). A write
/// that would exceed it is rejected and leaves the store unchanged, the way a
/// browser's local storage reports a full quota.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Create an unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that holds at most `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: RwLock::default(),
            quota: Some(quota),
        }
    }

    /// Number of keys stored.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

fn footprint<'a>(entries: impl Iterator<Item = (&'a String, &'a String)>) -> usize {
    entries.map(|(k, v)| k.len() + v.len()).sum()
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().await;

        if let Some(quota) = self.quota {
            let others = footprint(entries.iter().filter(|(k, _)| k.as_str() != key));
            let required = others + key.len() + value.len();
            if required > quota {
                return Err(Error::QuotaExceeded { required, quota });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        debug!(key, bytes = value.len(), "Stored value in memory");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    fn describe(&self) -> String {
        match self.quota {
            Some(quota) => format!("memory (quota {quota} bytes)"),
            None => "memory".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = MemoryStore::new();
        assert!(store.get("nothing").await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryStore::new();
        store.set("k", "one").await.unwrap();
        store.set("k", "two").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("two"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove_missing_is_ok() {
        let store = MemoryStore::new();
        assert!(store.remove("k").await.is_ok());
    }

    #[tokio::test]
    async fn test_quota_rejects_and_keeps_old_value() {
        let store = MemoryStore::with_quota(10);
        store.set("k", "1234").await.unwrap();

        let err = store.set("k", "0123456789").await.unwrap_err();
        assert!(matches!(err, Error::QuotaExceeded { quota: 10, .. }));
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("1234"));
    }

    #[tokio::test]
    async fn test_quota_counts_replaced_value_once() {
        let store = MemoryStore::with_quota(6);
        store.set("k", "12345").await.unwrap();
        // Replacing the value does not double count the old one.
        store.set("k", "54321").await.unwrap();
    }

    #[test]
    fn test_describe() {
        assert_eq!(MemoryStore::new().describe(), "memory");
        assert!(MemoryStore::with_quota(5).describe().contains("quota 5"));
    }
}
