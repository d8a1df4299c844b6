//! Core library for the Shelf reading tracker.
//!
//! This crate keeps a personal book library in a local SQLite store and arms
//! one-shot reading reminders for books that carry a reminder time.
//!
//! - [`db`]: synchronous SQLite access, schema migration and the single
//!   process-wide connection
//! - [`library`]: the async [`Library`] facade and its [`BookRepository`]
//! - [`reminder`]: the [`ReminderScheduler`] and the [`NotificationCenter`]
//!   platform seam
//! - [`models`] and [`params`]: persisted records and boundary inputs
//! - [`display`]: markdown formatting for terminal output
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use shelf_core::{params::CreateBook, LibraryBuilder, LocalNotificationCenter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let center = LocalNotificationCenter::new(true);
//! let library = LibraryBuilder::new()
//!     .with_database_path(Some("library.db"))
//!     .build(Arc::new(center))
//!     .await?;
//!
//! let saved = library
//!     .add_book(&CreateBook {
//!         status: Some("reading".to_string()),
//!         ..CreateBook::new("Dune", "Frank Herbert")
//!     })
//!     .await?;
//! println!("{}", saved.book);
//!
//! for book in library.books().list().await {
//!     println!("{}: {}", book.id, book.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod error;
pub mod identity;
pub mod library;
pub mod models;
pub mod params;
pub mod reminder;

// Re-export commonly used types
pub use db::{ConnectionManager, Database, StoreHandle, StoreLocation};
pub use display::{
    Books, CreateResult, DeleteResult, LocalDateTime, OperationStatus, Reminders, UpdateResult,
};
pub use error::{ErrorKind, LibraryError, Result};
pub use library::{BookRepository, Library, LibraryBuilder, ReminderOutcome, SavedBook};
pub use models::{Book, BookFilter, ReadingStatus, ReminderBinding, ReminderState, TriggerId};
pub use params::{CreateBook, NewBook};
pub use reminder::{
    Delivery, FireHook, LocalNotificationCenter, NotificationCenter, PermissionState,
    ReminderScheduler, TriggerRequest,
};
