//! Error types for the library store and reminder scheduler.

use std::path::PathBuf;

use jiff::Timestamp;
use thiserror::Error;

/// Comprehensive error type for all library operations.
#[derive(Error, Debug)]
pub enum LibraryError {
    /// A required field is empty or a value is outside its closed set
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// No book exists for the given id, or the id is malformed
    #[error("Book with ID '{id}' not found")]
    NotFound { id: String },
    /// The store could not be opened or initialised
    #[error("Storage unavailable: {message}")]
    StorageUnavailable { message: String },
    /// The notification capability was refused
    #[error("Notification permission denied")]
    PermissionDenied,
    /// A reminder was requested for a time that is not in the future
    #[error("Reminder time {fire_at} is not in the future")]
    PastDeadline { fire_at: Timestamp },
    /// Underlying read/write failure
    #[error("I/O fault: {message}")]
    IoFault {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// The notification platform refused to arm a trigger
    #[error("Notification error: {message}")]
    Notification { message: String },
    /// Runtime and configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Coarse classification of a [`LibraryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    StorageUnavailable,
    PermissionDenied,
    PastDeadline,
    IoFault,
}

/// Builder for creating I/O fault errors with a message.
pub struct IoFaultBuilder {
    message: String,
}

impl IoFaultBuilder {
    /// Create a new I/O fault builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> LibraryError {
        LibraryError::IoFault {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> LibraryError {
        LibraryError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl LibraryError {
    /// Creates a builder for I/O fault errors.
    pub fn io_fault(message: impl Into<String>) -> IoFaultBuilder {
        IoFaultBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a not-found error for the given external id.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Maps the error onto the store's error taxonomy.
    ///
    /// Supporting variants fold into the closest entry: file system and XDG
    /// failures prevent the store from opening, everything else is an
    /// unclassified I/O fault.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::StorageUnavailable { .. } | Self::FileSystem { .. } | Self::XdgDirectory(_) => {
                ErrorKind::StorageUnavailable
            }
            Self::PermissionDenied => ErrorKind::PermissionDenied,
            Self::PastDeadline { .. } => ErrorKind::PastDeadline,
            Self::IoFault { .. }
            | Self::Serialization { .. }
            | Self::Notification { .. }
            | Self::Configuration { .. } => ErrorKind::IoFault,
        }
    }

    /// Wraps a join failure from a blocking task.
    pub(crate) fn task_join(err: tokio::task::JoinError) -> Self {
        Self::Configuration {
            message: format!("Task join error: {err}"),
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors to an I/O fault with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| LibraryError::io_fault(message).with_source(e))
    }
}

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, LibraryError>;
