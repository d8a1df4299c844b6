//! In-memory filtering of a listed snapshot.

use super::{Book, ReadingStatus};

/// Filter options applied to an already listed set of books.
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    /// Case-insensitive substring matched against title or author
    pub query: Option<String>,

    /// Only keep books with this status
    pub status: Option<ReadingStatus>,
}

impl BookFilter {
    /// Create a filter matching a search query.
    ///
    /// ```rust
    /// use shelf_core::models::BookFilter;
    ///
    /// let filter = BookFilter::search("dune");
    /// assert_eq!(filter.query.as_deref(), Some("dune"));
    /// assert!(filter.status.is_none());
    /// ```
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            status: None,
        }
    }

    /// Whether a single book passes the filter.
    pub fn matches(&self, book: &Book) -> bool {
        if let Some(status) = self.status {
            if book.status != status {
                return false;
            }
        }

        match self.query.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => {
                let needle = query.to_lowercase();
                book.title.to_lowercase().contains(&needle)
                    || book.author.to_lowercase().contains(&needle)
            }
        }
    }

    /// Keep only the matching books, preserving order.
    pub fn apply(&self, books: Vec<Book>) -> Vec<Book> {
        books.into_iter().filter(|book| self.matches(book)).collect()
    }
}
