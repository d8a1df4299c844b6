//! Parameter structures for library operations.
//!
//! These are the raw, interface-agnostic inputs accepted at the boundary. The
//! CLI (or any other front end) builds them from its own argument types, and
//! the core validates them once into typed values before touching storage.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │  Core Params    │    │ Validated Input │
//! │  (clap derives) │───▶│  (CreateBook)   │───▶│   (NewBook)     │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```

use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    error::{LibraryError, Result},
    models::ReadingStatus,
};

/// Parameters for adding a book to the library.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    /// Title of the book
    pub title: String,
    /// Author of the book
    #[serde(default)]
    pub author: String,
    /// Status string (planned, reading, finished); defaults to planned
    pub status: Option<String>,
    /// Optional reminder time
    pub reminder_time: Option<Timestamp>,
    pub notes: Option<String>,
    pub image_uri: Option<String>,
    pub total_pages: Option<i64>,
    pub current_page: Option<i64>,
    pub rating: Option<f64>,
    pub last_read_date: Option<String>,
}

/// A validated book ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub status: ReadingStatus,
    pub reminder_time: Option<Timestamp>,
    pub notes: Option<String>,
    pub image_uri: Option<String>,
    pub total_pages: Option<i64>,
    pub current_page: Option<i64>,
    pub rating: Option<f64>,
    pub last_read_date: Option<String>,
}

impl CreateBook {
    /// Create parameters for a book with just a title and author.
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Default::default()
        }
    }

    /// Validate the parameters into a [`NewBook`].
    ///
    /// Title and author are trimmed; an empty title or an unknown status
    /// fails with [`LibraryError::InvalidInput`].
    pub fn validate(&self) -> Result<NewBook> {
        let title = validate_title(&self.title)?;

        let status = match &self.status {
            Some(status_str) => parse_status(status_str)?,
            None => ReadingStatus::default(),
        };

        Ok(NewBook {
            title,
            author: self.author.trim().to_string(),
            status,
            reminder_time: self.reminder_time,
            notes: self.notes.clone(),
            image_uri: self.image_uri.clone(),
            total_pages: self.total_pages,
            current_page: self.current_page,
            rating: self.rating,
            last_read_date: self.last_read_date.clone(),
        })
    }
}

impl TryFrom<CreateBook> for NewBook {
    type Error = LibraryError;

    fn try_from(params: CreateBook) -> Result<Self> {
        params.validate()
    }
}

/// Trims a title and rejects it when nothing is left.
pub(crate) fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(LibraryError::invalid_input("title").with_reason("Title must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Parses a boundary status string.
pub fn parse_status(status: &str) -> Result<ReadingStatus> {
    ReadingStatus::from_str(status).map_err(|_| {
        LibraryError::invalid_input("status").with_reason(format!(
            "Invalid status: {status}. Must be 'planned', 'reading', or 'finished'"
        ))
    })
}
