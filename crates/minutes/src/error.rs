//! Error types for meeting-minutes.
//!
//! This module defines all error types used throughout the crate. Every
//! failure is scoped to the operation that produced it; none is fatal to the
//! process.

use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// The main error type for meeting-minutes operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Key-Value Storage Errors ===
    /// The underlying store failed to read a key.
    #[error("failed to read '{key}' from storage: {message}")]
    StorageRead {
        /// Storage key that was being read.
        key: String,
        /// Description of what went wrong.
        message: String,
    },

    /// The underlying store rejected a write.
    #[error("failed to write '{key}' to storage: {message}")]
    StorageWrite {
        /// Storage key that was being written.
        key: String,
        /// Description of what went wrong.
        message: String,
    },

    /// A write would exceed the configured storage quota.
    #[error("storage quota exceeded: {required} bytes needed, {quota} bytes allowed")]
    QuotaExceeded {
        /// Bytes the store would hold after the write.
        required: usize,
        /// Configured quota in bytes.
        quota: usize,
    },

    /// The stored collection exists but cannot be read back.
    #[error("stored collection under '{key}' is unreadable: {message}")]
    StoreUnreadable {
        /// Storage key of the collection.
        key: String,
        /// Description of what went wrong.
        message: String,
    },

    /// A stored value could not be decoded.
    #[error("failed to decode stored value: {0}")]
    Decode(String),

    // === Domain Errors ===
    /// A meeting draft or record failed validation.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// Exporting a meeting to a document failed.
    #[error("export failed: {message}")]
    Export {
        /// Description of what went wrong.
        message: String,
    },

    // === Database Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for meeting-minutes operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl Error {
    /// Create a storage read error.
    #[must_use]
    pub fn storage_read(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorageRead {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a storage write error.
    #[must_use]
    pub fn storage_write(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorageWrite {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an export error.
    #[must_use]
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
        }
    }

    /// Check if this error came from a rejected storage write.
    #[must_use]
    pub fn is_write_failure(&self) -> bool {
        matches!(
            self,
            Self::StorageWrite { .. } | Self::QuotaExceeded { .. }
        )
    }

    /// Check if this error is a validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The per-field validation errors, if this is a validation failure.
    #[must_use]
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldError;

    #[test]
    fn test_storage_write_display() {
        let err = Error::storage_write("meeting-minutes", "disk full");
        assert_eq!(
            err.to_string(),
            "failed to write 'meeting-minutes' to storage: disk full"
        );
        assert!(err.is_write_failure());
    }

    #[test]
    fn test_quota_exceeded_is_write_failure() {
        let err = Error::QuotaExceeded {
            required: 2048,
            quota: 1024,
        };
        assert!(err.is_write_failure());
        assert!(err.to_string().contains("2048"));
    }

    #[test]
    fn test_storage_read_is_not_write_failure() {
        let err = Error::storage_read("meeting-minutes", "permission denied");
        assert!(!err.is_write_failure());
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn test_export_error() {
        let err = Error::export("element not found");
        assert_eq!(err.to_string(), "export failed: element not found");
    }

    #[test]
    fn test_validation_error_exposes_fields() {
        let errors = ValidationErrors::from(vec![FieldError::new(
            "title",
            "Título é obrigatório",
        )]);
        let err: Error = errors.into();
        assert!(err.is_validation());
        let fields = err.validation_errors().unwrap();
        assert_eq!(fields.len(), 1);
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_store_unreadable_display() {
        let err = Error::StoreUnreadable {
            key: "meeting-minutes".to_string(),
            message: "expected value at line 1 column 1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("meeting-minutes"));
        assert!(msg.contains("unreadable"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "storage key must not be empty".to_string(),
        };
        assert!(err.to_string().contains("storage key"));
    }
}
