//! Key-value storage backends.
//!
//! The persistence layer only needs three primitives from a platform: read a
//! string under a key, overwrite it, and remove it. [`KeyValueStore`] captures
//! that contract; the modules below provide the concrete adapters:
//!
//! - [`MemoryStore`]: process-local, with an optional byte quota
//! - [`FileStore`]: one JSON file per key in a data directory
//! - [`SqliteStore`]: a `kv` table in a `SQLite` database

pub mod file;
pub mod memory;
pub mod migrations;
pub mod schema;
pub mod sqlite;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Result;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A string-valued key-value store.
///
/// Every call is a single suspending operation against the underlying
/// platform store. `set` replaces the whole value in one write.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value under `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Human-readable description of where data lives.
    fn describe(&self) -> String;
}

/// Which backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// JSON files in the data directory.
    #[default]
    File,
    /// A `SQLite` database in the data directory.
    Sqlite,
    /// Process memory; nothing survives exit.
    Memory,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Sqlite => write!(f, "sqlite"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Enum wrapper for the storage backends, dispatching to the concrete
/// implementation selected in configuration.
#[derive(Debug)]
pub enum Backend {
    /// See [`FileStore`].
    File(FileStore),
    /// See [`SqliteStore`].
    Sqlite(SqliteStore),
    /// See [`MemoryStore`].
    Memory(MemoryStore),
}

impl Backend {
    /// Open the backend described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the `SQLite` database cannot be opened.
    pub fn open(config: &Config) -> Result<Self> {
        match config.storage.backend {
            BackendKind::File => Ok(Self::File(FileStore::new(config.data_dir()))),
            BackendKind::Sqlite => Ok(Self::Sqlite(SqliteStore::open(config.database_path())?)),
            BackendKind::Memory => Ok(Self::Memory(match config.storage.quota_bytes {
                0 => MemoryStore::new(),
                quota => MemoryStore::with_quota(quota),
            })),
        }
    }

    /// The kind of this backend.
    #[must_use]
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::File(_) => BackendKind::File,
            Self::Sqlite(_) => BackendKind::Sqlite,
            Self::Memory(_) => BackendKind::Memory,
        }
    }
}

#[async_trait]
impl KeyValueStore for Backend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            Self::File(s) => s.get(key).await,
            Self::Sqlite(s) => s.get(key).await,
            Self::Memory(s) => s.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        match self {
            Self::File(s) => s.set(key, value).await,
            Self::Sqlite(s) => s.set(key, value).await,
            Self::Memory(s) => s.set(key, value).await,
        }
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match self {
            Self::File(s) => s.remove(key).await,
            Self::Sqlite(s) => s.remove(key).await,
            Self::Memory(s) => s.remove(key).await,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::File(s) => s.describe(),
            Self::Sqlite(s) => s.describe(),
            Self::Memory(s) => s.describe(),
        }
    }
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_backend_kind_default() {
        assert_eq!(BackendKind::default(), BackendKind::File);
    }

    #[test]
    fn test_backend_kind_serde() {
        let kind: BackendKind = serde_json::from_str(r#""sqlite""#).unwrap();
        assert_eq!(kind, BackendKind::Sqlite);
        assert_eq!(serde_json::to_string(&BackendKind::Memory).unwrap(), r#""memory""#);
        assert_eq!(BackendKind::File.to_string(), "file");
    }

    #[test]
    fn test_open_memory_backend() {
        let mut config = Config::default();
        config.storage.backend = BackendKind::Memory;
        let backend = Backend::open(&config).unwrap();
        assert_eq!(backend.kind(), BackendKind::Memory);
        assert!(backend.describe().contains("memory"));
    }

    #[tokio::test]
    async fn test_backend_dispatch() {
        let backend = Backend::Memory(MemoryStore::new());
        backend.set("k", "v").await.unwrap();
        assert_eq!(backend.get("k").await.unwrap().as_deref(), Some("v"));
        backend.remove("k").await.unwrap();
        assert!(backend.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_shared_store_through_arc() {
        let shared = Arc::new(MemoryStore::new());
        let handle = Arc::clone(&shared);
        handle.set("k", "v").await.unwrap();
        assert_eq!(shared.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
