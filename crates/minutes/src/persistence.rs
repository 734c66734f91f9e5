//! Persistence service for meeting records.
//!
//! The whole collection lives under a single key as a JSON array. Every
//! mutation is a read-modify-write of that array, which is safe under the
//! single-writer model the collection hook enforces.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::meeting::MeetingRecord;
use crate::storage::{Backend, KeyValueStore};
use crate::validation::validate_ids_free;

/// Key under which the collection is stored unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "meeting-minutes";

/// What `get_all` does when the stored collection cannot be read or decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadPolicy {
    /// Log a warning and behave as if nothing were stored.
    #[default]
    FailOpen,
    /// Return [`Error::StoreUnreadable`].
    Strict,
}

impl fmt::Display for ReadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailOpen => write!(f, "fail-open"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

/// Reads and writes the meeting collection through a [`KeyValueStore`].
#[derive(Debug)]
pub struct MeetingStore<S> {
    backend: S,
    key: String,
    read_policy: ReadPolicy,
}

impl<S: KeyValueStore> MeetingStore<S> {
    /// Store using [`DEFAULT_STORAGE_KEY`].
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, DEFAULT_STORAGE_KEY)
    }

    /// Store using a custom key.
    pub fn with_key(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            read_policy: ReadPolicy::default(),
        }
    }

    /// Set the read policy.
    #[must_use]
    pub fn with_read_policy(mut self, read_policy: ReadPolicy) -> Self {
        self.read_policy = read_policy;
        self
    }

    /// The storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The active read policy.
    pub fn read_policy(&self) -> ReadPolicy {
        self.read_policy
    }

    /// The underlying backend.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Every stored record, in stored order.
    ///
    /// A missing document is an empty collection. Under
    /// [`ReadPolicy::FailOpen`] an unreadable document is also treated as
    /// empty.
    ///
    /// # Errors
    ///
    /// Only under [`ReadPolicy::Strict`]: returns [`Error::StoreUnreadable`]
    /// if the document cannot be read or decoded.
    pub async fn get_all(&self) -> Result<Vec<MeetingRecord>> {
        match self.try_get_all().await {
            Ok(records) => Ok(records),
            Err(e) if self.read_policy == ReadPolicy::FailOpen => {
                warn!(key = %self.key, error = %e, "Error loading meetings, using empty collection");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Every stored record, failing if the document is unreadable
    /// regardless of the read policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnreadable`] if the document cannot be read or
    /// decoded.
    pub async fn try_get_all(&self) -> Result<Vec<MeetingRecord>> {
        let unreadable = |message: String| Error::StoreUnreadable {
            key: self.key.clone(),
            message,
        };

        let Some(raw) = self
            .backend
            .get(&self.key)
            .await
            .map_err(|e| unreadable(e.to_string()))?
        else {
            debug!(key = %self.key, "No stored meetings");
            return Ok(Vec::new());
        };

        let records: Vec<MeetingRecord> =
            serde_json::from_str(&raw).map_err(|e| unreadable(e.to_string()))?;
        debug!(key = %self.key, count = records.len(), "Loaded meetings");
        Ok(records)
    }

    /// Look up one record by id.
    ///
    /// # Errors
    ///
    /// See [`MeetingStore::get_all`].
    pub async fn get_one(&self, id: &str) -> Result<Option<MeetingRecord>> {
        Ok(self.get_all().await?.into_iter().find(|m| m.id == id))
    }

    /// Replace the whole collection with `records` in a single write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageWrite`] or [`Error::QuotaExceeded`] if the
    /// backend rejects the write.
    pub async fn save_all(&self, records: &[MeetingRecord]) -> Result<()> {
        let raw = serde_json::to_string(records)?;
        self.backend
            .set(&self.key, &raw)
            .await
            .map_err(|e| match e {
                Error::StorageWrite { .. } | Error::QuotaExceeded { .. } => e,
                other => Error::storage_write(&self.key, other.to_string()),
            })?;
        debug!(key = %self.key, count = records.len(), bytes = raw.len(), "Saved meetings");
        Ok(())
    }

    /// Insert `record`, or replace the stored record with the same id in
    /// place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if any of the record's ids belongs to a
    /// different stored record; nothing is written then. Otherwise see
    /// [`MeetingStore::get_all`] and [`MeetingStore::save_all`].
    pub async fn save_one(&self, record: &MeetingRecord) -> Result<()> {
        let mut records = self.get_all().await?;
        validate_ids_free(record, records.iter().filter(|m| m.id != record.id))
            .map_err(Error::Validation)?;
        match records.iter_mut().find(|m| m.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        self.save_all(&records).await?;
        info!(id = %record.id, title = %record.title, "Saved meeting");
        Ok(())
    }

    /// Remove the record with `id`. Removing a missing id still rewrites the
    /// collection unchanged.
    ///
    /// # Errors
    ///
    /// See [`MeetingStore::get_all`] and [`MeetingStore::save_all`].
    pub async fn delete_one(&self, id: &str) -> Result<()> {
        let mut records = self.get_all().await?;
        let before = records.len();
        records.retain(|m| m.id != id);
        self.save_all(&records).await?;
        info!(id, removed = before - records.len(), "Deleted meeting");
        Ok(())
    }

    /// Remove the stored document entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot remove the key.
    pub async fn clear_all(&self) -> Result<()> {
        self.backend.remove(&self.key).await?;
        info!(key = %self.key, "Cleared all meetings");
        Ok(())
    }
}

impl MeetingStore<Backend> {
    /// Open the configured backend with the configured key and read policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be opened.
    pub fn open(config: &Config) -> Result<Self> {
        let backend = Backend::open(config)?;
        debug!(backend = %backend.describe(), key = %config.storage.key, "Opened meeting store");
        Ok(Self::with_key(backend, config.storage.key.clone())
            .with_read_policy(config.storage.read_policy))
    }
}
