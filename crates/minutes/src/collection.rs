//! In-memory view of the stored collection.
//!
//! [`MeetingCollection`] keeps a snapshot of every record plus a loading flag
//! and the last error message. Each mutation writes through the
//! [`MeetingStore`] and then refreshes the snapshot, so callers always read
//! their own writes. Mutating methods take `&mut self`; there is exactly one
//! writer per collection.

use tracing::debug;

use crate::error::Result;
use crate::meeting::MeetingRecord;
use crate::persistence::MeetingStore;
use crate::storage::KeyValueStore;

/// Observable state of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionStatus {
    /// Nothing in flight and no outstanding error.
    Idle,
    /// A refresh is running.
    Loading,
    /// The last operation failed with this message.
    Error(String),
}

/// Sets a flag for the lifetime of the guard and clears it on drop.
struct LoadingGuard<'a>(&'a mut bool);

impl<'a> LoadingGuard<'a> {
    fn new(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Snapshot of the meeting collection with write-through mutations.
#[derive(Debug)]
pub struct MeetingCollection<S> {
    store: MeetingStore<S>,
    meetings: Vec<MeetingRecord>,
    loading: bool,
    error: Option<String>,
}

impl<S: KeyValueStore> MeetingCollection<S> {
    /// Wrap `store` without reading it yet.
    pub fn new(store: MeetingStore<S>) -> Self {
        Self {
            store,
            meetings: Vec::new(),
            loading: false,
            error: None,
        }
    }

    /// Wrap `store` and perform the initial refresh.
    ///
    /// A failed initial load is recorded in [`MeetingCollection::error`]
    /// rather than returned, so the collection is always usable.
    pub async fn load(store: MeetingStore<S>) -> Self {
        let mut collection = Self::new(store);
        // The failure is kept in `error`.
        let _ = collection.refresh().await;
        collection
    }

    /// Re-read the collection from the store.
    ///
    /// # Errors
    ///
    /// Returns the store error; the message is also kept in
    /// [`MeetingCollection::error`] and the previous snapshot is retained.
    pub async fn refresh(&mut self) -> Result<()> {
        let _loading = LoadingGuard::new(&mut self.loading);
        match self.store.get_all().await {
            Ok(meetings) => {
                debug!(count = meetings.len(), "Refreshed meeting collection");
                self.meetings = meetings;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(format!("Failed to load meetings: {e}"));
                Err(e)
            }
        }
    }

    /// Save `record` and refresh.
    ///
    /// # Errors
    ///
    /// Returns the store error after recording its message. The snapshot is
    /// left as it was before the call.
    pub async fn save(&mut self, record: &MeetingRecord) -> Result<()> {
        if let Err(e) = self.store.save_one(record).await {
            self.error = Some(format!("Failed to save meeting: {e}"));
            return Err(e);
        }
        self.refresh().await
    }

    /// Delete the record with `id` and refresh.
    ///
    /// # Errors
    ///
    /// Returns the store error after recording its message. The snapshot is
    /// left as it was before the call.
    pub async fn remove(&mut self, id: &str) -> Result<()> {
        if let Err(e) = self.store.delete_one(id).await {
            self.error = Some(format!("Failed to delete meeting: {e}"));
            return Err(e);
        }
        self.refresh().await
    }

    /// Remove every record.
    ///
    /// # Errors
    ///
    /// Returns the store error after recording its message.
    pub async fn clear(&mut self) -> Result<()> {
        if let Err(e) = self.store.clear_all().await {
            self.error = Some(format!("Failed to clear meetings: {e}"));
            return Err(e);
        }
        self.meetings.clear();
        self.error = None;
        Ok(())
    }

    /// Look up a record in the snapshot.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&MeetingRecord> {
        self.meetings.iter().find(|m| m.id == id)
    }

    /// The current snapshot in stored order.
    #[must_use]
    pub fn meetings(&self) -> &[MeetingRecord] {
        &self.meetings
    }

    /// Whether a refresh is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The last failure message, until the next successful operation.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Loading and error state as a single value.
    #[must_use]
    pub fn status(&self) -> CollectionStatus {
        if self.loading {
            CollectionStatus::Loading
        } else if let Some(message) = &self.error {
            CollectionStatus::Error(message.clone())
        } else {
            CollectionStatus::Idle
        }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &MeetingStore<S> {
        &self.store
    }
}
