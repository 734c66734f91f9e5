//! `meeting-minutes` - Local-first meeting minutes
//!
//! This library keeps a collection of meeting records under a single storage
//! key, offers an in-memory view with write-through mutations, validates form
//! drafts, and exports records to paginated PDFs.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod collection;
pub mod config;
pub mod dates;
pub mod draft;
pub mod error;
pub mod export;
pub mod logging;
pub mod meeting;
pub mod persistence;
pub mod storage;
pub mod validation;

pub use collection::{CollectionStatus, MeetingCollection};
pub use config::Config;
pub use draft::MeetingDraft;
pub use error::{Error, Result};
pub use export::{export_filename, Exporter};
pub use logging::init_logging;
pub use meeting::{ActionItem, ActionStatus, Decision, Discussion, MeetingRecord, Participant};
pub use persistence::{MeetingStore, ReadPolicy};
pub use storage::{Backend, KeyValueStore};
