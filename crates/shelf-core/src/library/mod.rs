//! High-level library API tying the store to reminders.
//!
//! [`Library`] is what front ends talk to. It owns a [`BookRepository`] for
//! persistence and a [`ReminderScheduler`] for triggers, and keeps the two in
//! step whenever a book's `reminder_time` changes or the book is removed.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Library      │    │ BookRepository  │    │    Database     │
//! │  (add, save,    │───▶│  (async CRUD)   │───▶│   (via db/)     │
//! │   remove)       │    └─────────────────┘    └─────────────────┘
//! │                 │    ┌───────────────────┐
//! │                 │───▶│ ReminderScheduler │
//! └─────────────────┘    └───────────────────┘
//! ```
//!
//! Reminders are best effort: a refused permission or a reminder time in the
//! past never fails a save. The outcome is reported in [`SavedBook`] instead.
//!
//! Writes that touch both sides run one at a time, so a removal can never
//! slip between a save's write and its arming and leave a trigger behind for
//! a deleted book.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use shelf_core::{params::CreateBook, LibraryBuilder, LocalNotificationCenter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let center = LocalNotificationCenter::new(true);
//! let library = LibraryBuilder::new()
//!     .in_memory()
//!     .build(Arc::new(center))
//!     .await?;
//!
//! let saved = library
//!     .add_book(&CreateBook::new("Dune", "Frank Herbert"))
//!     .await?;
//! assert_eq!(library.books().get_by_id(&saved.book.id).await?.title, "Dune");
//! # Ok(())
//! # }
//! ```

use jiff::Timestamp;
use log::{info, warn};
use tokio::sync::Mutex;

pub mod builder;
pub mod repository;

#[cfg(test)]
mod tests;

pub use builder::LibraryBuilder;
pub use repository::BookRepository;

use crate::{
    error::{LibraryError, Result},
    models::{Book, BookFilter},
    params::CreateBook,
    reminder::{NotificationCenter, ReminderScheduler},
};

/// What happened to a book's reminder as part of a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderOutcome {
    /// The book carries no reminder time and had no binding
    NotRequested,
    /// A trigger is armed for the given time
    Scheduled { fire_at: Timestamp },
    /// The book's previous reminder was cancelled
    Cancelled,
    /// Notification permission was refused; no trigger is armed
    PermissionDenied,
    /// The reminder time is not in the future; no trigger is armed
    PastDeadline { fire_at: Timestamp },
}

/// A persisted book together with its reminder outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedBook {
    pub book: Book,
    pub reminder: ReminderOutcome,
}

/// The book library with reminder support.
pub struct Library<N> {
    books: BookRepository,
    reminders: ReminderScheduler<N>,
    writes: Mutex<()>,
}

impl<N: NotificationCenter> Library<N> {
    pub(crate) fn new(books: BookRepository, reminders: ReminderScheduler<N>) -> Self {
        Self {
            books,
            reminders,
            writes: Mutex::new(()),
        }
    }

    /// Persistence operations.
    pub fn books(&self) -> &BookRepository {
        &self.books
    }

    /// Reminder operations.
    pub fn reminders(&self) -> &ReminderScheduler<N> {
        &self.reminders
    }

    /// Creates a book and arms its reminder if it carries one.
    pub async fn add_book(&self, params: &CreateBook) -> Result<SavedBook> {
        let _writes = self.writes.lock().await;
        let book = self.books.create(params).await?;
        let reminder = match book.reminder_time {
            Some(fire_at) => self.arm(&book, fire_at).await?,
            None => ReminderOutcome::NotRequested,
        };
        Ok(SavedBook { book, reminder })
    }

    /// Overwrites a stored book and brings its reminder in line with
    /// `reminder_time`.
    ///
    /// A book saved without a reminder time loses any armed reminder.
    pub async fn save_book(&self, book: &Book) -> Result<SavedBook> {
        let _writes = self.writes.lock().await;
        self.books.update(book).await?;

        let reminder = match book.reminder_time {
            Some(fire_at) => self.arm(book, fire_at).await?,
            None => {
                if self.reminders.binding(&book.id).await.is_some() {
                    self.reminders.cancel(&book.id).await;
                    ReminderOutcome::Cancelled
                } else {
                    ReminderOutcome::NotRequested
                }
            }
        };

        Ok(SavedBook {
            book: book.clone(),
            reminder,
        })
    }

    /// Deletes a book and cancels its reminder.
    ///
    /// Returns whether a stored book was removed.
    pub async fn remove_book(&self, id: &str) -> Result<bool> {
        let _writes = self.writes.lock().await;
        let removed = self.books.delete(id).await?;
        self.reminders.cancel(id).await;
        Ok(removed)
    }

    /// Cancels every reminder without touching stored reminder times.
    pub async fn clear_reminders(&self) {
        let _writes = self.writes.lock().await;
        self.reminders.cancel_all().await;
    }

    /// Books matching `filter`, most recently created first.
    pub async fn search(&self, filter: &BookFilter) -> Vec<Book> {
        filter.apply(self.books.list().await)
    }

    /// Re-arms reminders for stored books whose reminder time is still ahead.
    ///
    /// Nothing is re-armed automatically when the process starts; front ends
    /// that outlive a single command call this once after building the
    /// library. Returns the number of reminders armed.
    pub async fn rearm_pending_reminders(&self) -> Result<usize> {
        let _writes = self.writes.lock().await;
        let now = Timestamp::now();
        let books = self.books.try_list().await?;

        let mut armed = 0;
        for book in books.iter().filter(|book| book.has_pending_reminder(now)) {
            if let Some(fire_at) = book.reminder_time {
                if let ReminderOutcome::Scheduled { .. } = self.arm(book, fire_at).await? {
                    armed += 1;
                }
            }
        }

        info!("Re-armed {armed} pending reminders");
        Ok(armed)
    }

    /// Schedules a reminder, folding refusals into the outcome.
    ///
    /// A refused reminder also drops any earlier binding so the armed trigger
    /// never disagrees with the stored time.
    async fn arm(&self, book: &Book, fire_at: Timestamp) -> Result<ReminderOutcome> {
        match self.reminders.schedule(&book.id, &book.title, fire_at).await {
            Ok(()) => Ok(ReminderOutcome::Scheduled { fire_at }),
            Err(LibraryError::PermissionDenied) => {
                warn!("Reminder for book {} skipped: permission denied", book.id);
                self.reminders.cancel(&book.id).await;
                Ok(ReminderOutcome::PermissionDenied)
            }
            Err(LibraryError::PastDeadline { fire_at }) => {
                warn!(
                    "Reminder for book {} skipped: {fire_at} is not in the future",
                    book.id
                );
                self.reminders.cancel(&book.id).await;
                Ok(ReminderOutcome::PastDeadline { fire_at })
            }
            Err(err) => Err(err),
        }
    }
}
