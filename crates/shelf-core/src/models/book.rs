//! Book model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::ReadingStatus;

/// A library entry as persisted by the store.
///
/// `update` replaces every mutable field with the values carried here, so
/// callers must send the full state they want stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Opaque external identifier assigned by the store
    pub id: String,

    /// Title of the book (never empty)
    pub title: String,

    /// Author, may be empty
    #[serde(default)]
    pub author: String,

    /// Reading status
    #[serde(default)]
    pub status: ReadingStatus,

    /// When the reader wants to be reminded about this book
    pub reminder_time: Option<Timestamp>,

    /// Free-form notes
    pub notes: Option<String>,

    /// Cover image location
    pub image_uri: Option<String>,

    /// Creation time, millisecond precision, immutable
    pub created_at: Timestamp,

    pub total_pages: Option<i64>,
    pub current_page: Option<i64>,
    pub rating: Option<f64>,
    pub last_read_date: Option<String>,
}

impl Book {
    /// Whether the stored reminder time still lies after `now`.
    pub fn has_pending_reminder(&self, now: Timestamp) -> bool {
        self.reminder_time.is_some_and(|at| at > now)
    }
}
