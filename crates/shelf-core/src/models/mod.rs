//! Data models for books and reminders.
//!
//! Display implementations for these models live in
//! [`crate::display::models`] so presentation stays separate from the data
//! structures.
//!
//! # Examples
//!
//! ```rust
//! use shelf_core::models::{Book, ReadingStatus};
//! use jiff::Timestamp;
//!
//! let book = Book {
//!     id: "1".to_string(),
//!     title: "Dune".to_string(),
//!     author: "Frank Herbert".to_string(),
//!     status: ReadingStatus::Reading,
//!     // ... other fields
//! #   reminder_time: None,
//! #   notes: None,
//! #   image_uri: None,
//! #   created_at: Timestamp::now(),
//! #   total_pages: Some(612),
//! #   current_page: Some(40),
//! #   rating: None,
//! #   last_read_date: None,
//! };
//! println!("{}", book); // Formats with a markdown header and metadata
//! ```

pub mod book;
pub mod filters;
pub mod reminder;
pub mod status;


pub use book::Book;
pub use filters::BookFilter;
pub use reminder::{ReminderBinding, ReminderState, TriggerId};
pub use status::ReadingStatus;
