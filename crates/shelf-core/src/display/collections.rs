//! Collection wrapper types for displaying groups of domain objects.
//!
//! This module provides wrapper types that format collections of domain objects
//! with consistent structure and empty collection handling.

use std::{fmt, ops::Index};

use super::datetime::LocalDateTime;
use crate::models::{Book, ReminderBinding};

/// Newtype wrapper for displaying a book listing.
///
/// Each book is shown as a compact entry; use the [`Book`] Display impl for
/// the full record.
///
/// # Examples
///
/// ```rust
/// use shelf_core::{
///     display::Books,
///     models::{Book, ReadingStatus},
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
/// let output = format!("{}", Books(vec![book]));
/// assert!(output.contains("Dune"));
/// ```
pub struct Books(pub Vec<Book>);

impl Books {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of books in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get an iterator over the books.
    pub fn iter(&self) -> std::slice::Iter<'_, Book> {
        self.0.iter()
    }
}

impl Index<usize> for Books {
    type Output = Book;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for Books {
    type Item = Book;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Books {
    type Item = &'a Book;
    type IntoIter = std::slice::Iter<'a, Book>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Books {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No books found.");
        }

        for book in &self.0 {
            writeln!(f, "## {} (ID: {})", book.title, book.id)?;
            writeln!(f)?;
            if !book.author.is_empty() {
                writeln!(f, "- **Author**: {}", book.author)?;
            }
            writeln!(f, "- **Status**: {}", book.status.label())?;
            if let Some(progress) = book.progress() {
                writeln!(f, "- **Progress**: {progress}")?;
            }
            if let Some(reminder) = &book.reminder_time {
                writeln!(f, "- **Reminder**: {}", LocalDateTime(reminder))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying armed reminders.
pub struct Reminders(pub Vec<ReminderBinding>);

impl fmt::Display for Reminders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No reminders scheduled.");
        }
        for binding in &self.0 {
            write!(f, "{binding}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::{ReadingStatus, TriggerId};

    fn book(id: &str, title: &str) -> Book {
        Book {
            id: id.to_string(),
            title: title.to_string(),
            author: String::new(),
            status: ReadingStatus::Finished,
            reminder_time: None,
            notes: None,
            image_uri: None,
            created_at: Timestamp::now(),
            total_pages: Some(300),
            current_page: None,
            rating: None,
            last_read_date: None,
        }
    }

    #[test]
    fn test_books_display_empty() {
        assert_eq!(Books(vec![]).to_string(), "No books found.\n");
    }

    #[test]
    fn test_books_display_entries() {
        let books = Books(vec![book("2", "Emma"), book("1", "Dune")]);
        let output = books.to_string();

        assert_eq!(books.len(), 2);
        assert!(output.contains("## Emma (ID: 2)"));
        assert!(output.contains("- **Status**: Finished"));
        assert!(output.contains("- **Progress**: 300 pages"));
        assert!(!output.contains("**Author**"));
        assert!(output.find("Emma").unwrap() < output.find("Dune").unwrap());
    }

    #[test]
    fn test_reminders_display() {
        assert_eq!(Reminders(vec![]).to_string(), "No reminders scheduled.\n");

        let reminders = Reminders(vec![ReminderBinding {
            book_id: "4".to_string(),
            title: "Emma".to_string(),
            fire_at: Timestamp::now(),
            trigger: TriggerId(1),
        }]);
        assert!(reminders.to_string().contains("**Emma** (ID: 4)"));
    }
}
