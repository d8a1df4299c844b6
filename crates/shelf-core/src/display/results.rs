//! Result wrapper types for displaying operation outcomes.
//!
//! This module provides wrapper types that format the results of create, update,
//! and delete operations with consistent messaging and resource display.

use std::fmt;

use crate::{
    library::{ReminderOutcome, SavedBook},
    models::Book,
};

/// Wrapper type for displaying the result of create operations.
///
/// # Examples
///
/// ```rust
/// use shelf_core::{
///     display::CreateResult,
///     models::{Book, ReadingStatus},
///     ReminderOutcome, SavedBook,
/// };
/// use jiff::Timestamp;
///
/// let book = Book {
///     id: "1".to_string(),
///     title: "Dune".to_string(),
///     author: "Frank Herbert".to_string(),
///     status: ReadingStatus::Planned,
///     reminder_time: None,
///     notes: None,
///     image_uri: None,
///     created_at: Timestamp::now(),
///     total_pages: None,
///     current_page: None,
///     rating: None,
///     last_read_date: None,
/// };
///
/// let result = CreateResult::new(SavedBook { book, reminder: ReminderOutcome::NotRequested });
/// assert!(result.to_string().starts_with("Added book with ID: 1"));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    /// Create a new CreateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<SavedBook> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Added book with ID: {}", self.resource.book.id)?;
        fmt_reminder_note(f, &self.resource.reminder)?;
        writeln!(f)?;
        write!(f, "{}", self.resource.book)
    }
}

/// Wrapper type for displaying the result of update operations.
///
/// Tracks a list of human-readable changes shown above the updated record.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    /// Create a new UpdateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    /// Create an UpdateResult with a list of changes made.
    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl fmt::Display for UpdateResult<SavedBook> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated book with ID: {}", self.resource.book.id)?;
        fmt_reminder_note(f, &self.resource.reminder)?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource.book)
    }
}

/// Wrapper type for displaying the result of delete operations.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    /// Create a new DeleteResult wrapper.
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for DeleteResult<Book> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted book '{}' (ID: {})",
            self.resource.title, self.resource.id
        )
    }
}

fn fmt_reminder_note(f: &mut fmt::Formatter<'_>, outcome: &ReminderOutcome) -> fmt::Result {
    match outcome {
        ReminderOutcome::NotRequested => Ok(()),
        outcome => {
            writeln!(f)?;
            writeln!(f, "> {outcome}")
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::ReadingStatus;

    fn saved(reminder: ReminderOutcome) -> SavedBook {
        SavedBook {
            book: Book {
                id: "8".to_string(),
                title: "Emma".to_string(),
                author: "Jane Austen".to_string(),
                status: ReadingStatus::Reading,
                reminder_time: None,
                notes: None,
                image_uri: None,
                created_at: Timestamp::now(),
                total_pages: None,
                current_page: None,
                rating: None,
                last_read_date: None,
            },
            reminder,
        }
    }

    #[test]
    fn test_create_result_without_reminder() {
        let output = CreateResult::new(saved(ReminderOutcome::NotRequested)).to_string();
        assert!(output.starts_with("Added book with ID: 8\n\n# 8. Emma"));
        assert!(!output.contains("> "));
    }

    #[test]
    fn test_update_result_lists_changes_and_reminder() {
        let result = UpdateResult::with_changes(
            saved(ReminderOutcome::Cancelled),
            vec!["Status set to reading".to_string()],
        );
        let output = result.to_string();

        assert!(output.contains("> Reminder cancelled"));
        assert!(output.contains("Changes made:\n- Status set to reading"));
    }

    #[test]
    fn test_delete_result() {
        let output = DeleteResult::new(saved(ReminderOutcome::NotRequested).book).to_string();
        assert_eq!(output, "Deleted book 'Emma' (ID: 8)\n");
    }
}
