//! `SQLite`-backed key-value store.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::{migrations, KeyValueStore};
use crate::dates;
use crate::error::{Error, Result};

/// Key-value store kept in a `kv` table.
///
/// The connection is guarded by a mutex; each operation is a single
/// statement, so no lock is held across an await point.
#[derive(Debug)]
pub struct SqliteStore {
    path: PathBuf,
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a database at `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, the database
    /// cannot be opened, or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let path = PathBuf::from(":memory:");
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;
        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn with_conn<T>(
        &self,
        key: &str,
        write: bool,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T> {
        let fail = |message: String| {
            if write {
                Error::storage_write(key, message)
            } else {
                Error::storage_read(key, message)
            }
        };
        let conn = self
            .conn
            .lock()
            .map_err(|_| fail("database connection lock poisoned".to_string()))?;
        f(&conn).map_err(|e| fail(e.to_string()))
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(key, false, |conn| {
            conn.query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
        })
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let updated_at = dates::to_iso(&Utc::now());
        self.with_conn(key, true, |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![key, value, updated_at],
            )
        })?;
        debug!(key, bytes = value.len(), "Stored value in database");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.with_conn(key, true, |conn| {
            conn.execute("DELETE FROM kv WHERE key = ?1", [key])
        })?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite ({})", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.get("k").await.unwrap().is_none());

        store.set("k", "first").await.unwrap();
        store.set("k", "second").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("second"));

        store.remove("k").await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("minutes.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("meeting-minutes", "[]").await.unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("meeting-minutes").await.unwrap().as_deref(),
            Some("[]")
        );
        assert_eq!(reopened.path(), path.as_path());
    }

    #[test]
    fn test_describe() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.describe(), "sqlite (:memory:)");
    }
}
