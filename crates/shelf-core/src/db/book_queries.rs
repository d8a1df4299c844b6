//! Book CRUD operations and queries.

use jiff::Timestamp;
use log::warn;
use rusqlite::{params, types::Type, OptionalExtension, Row};

use crate::{
    error::{DatabaseResultExt, LibraryError, Result},
    identity::encode_id,
    models::{Book, ReadingStatus},
    params::NewBook,
};

const BOOK_COLUMNS: &str = "id, title, author, status, reminderTime, notes, imageUri, createdAt, \
                            totalPages, currentPage, rating, lastReadDate";
const INSERT_BOOK_SQL: &str = "INSERT INTO books (title, author, status, reminderTime, notes, \
                               imageUri, createdAt, totalPages, currentPage, rating, lastReadDate) \
                               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";
const UPDATE_BOOK_SQL: &str = "UPDATE books SET title = ?1, author = ?2, status = ?3, \
                               reminderTime = ?4, notes = ?5, imageUri = ?6, totalPages = ?7, \
                               currentPage = ?8, rating = ?9, lastReadDate = ?10 WHERE id = ?11";
const DELETE_BOOK_SQL: &str = "DELETE FROM books WHERE id = ?1";

impl super::Database {
    /// Inserts a validated book and returns it exactly as stored.
    pub fn insert_book(&mut self, book: &NewBook) -> Result<Book> {
        let created_at = now_millis()?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(
            INSERT_BOOK_SQL,
            params![
                book.title,
                book.author,
                book.status.as_str(),
                book.reminder_time.map(|at| at.to_string()),
                book.notes,
                book.image_uri,
                created_at.as_millisecond(),
                book.total_pages,
                book.current_page,
                book.rating,
                book.last_read_date,
            ],
        )
        .db_context("Failed to insert book")?;

        let key = tx.last_insert_rowid();

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Book {
            id: encode_id(key),
            title: book.title.clone(),
            author: book.author.clone(),
            status: book.status,
            reminder_time: book.reminder_time,
            notes: book.notes.clone(),
            image_uri: book.image_uri.clone(),
            created_at,
            total_pages: book.total_pages,
            current_page: book.current_page,
            rating: book.rating,
            last_read_date: book.last_read_date.clone(),
        })
    }

    /// Retrieves a book by its row key.
    pub fn get_book(&self, key: i64) -> Result<Option<Book>> {
        let mut stmt = self
            .connection
            .prepare(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1"))
            .db_context("Failed to prepare query")?;

        stmt.query_row(params![key], book_from_row)
            .optional()
            .db_context("Failed to query book")
    }

    /// Lists every decodable book, most recently created first.
    pub fn list_books(&self) -> Result<Vec<Book>> {
        let mut stmt = self
            .connection
            .prepare(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id DESC"))
            .db_context("Failed to prepare query")?;

        let rows = stmt
            .query_map([], book_from_row)
            .db_context("Failed to query books")?;

        // A row that cannot be decoded is skipped so the rest stay readable.
        let mut books = Vec::new();
        for row in rows {
            match row {
                Ok(book) => books.push(book),
                Err(
                    err @ (rusqlite::Error::FromSqlConversionFailure(..)
                    | rusqlite::Error::InvalidColumnType(..)
                    | rusqlite::Error::IntegralValueOutOfRange(..)),
                ) => warn!("Skipping unreadable book row: {err}"),
                Err(err) => return Err(err).db_context("Failed to fetch books"),
            }
        }

        Ok(books)
    }

    /// Overwrites every mutable column of a row in one statement.
    ///
    /// `createdAt` is never touched. Returns `false` when no row has the key.
    pub fn update_book(&mut self, key: i64, book: &Book) -> Result<bool> {
        let changed = self
            .connection
            .execute(
                UPDATE_BOOK_SQL,
                params![
                    book.title,
                    book.author,
                    book.status.as_str(),
                    book.reminder_time.map(|at| at.to_string()),
                    book.notes,
                    book.image_uri,
                    book.total_pages,
                    book.current_page,
                    book.rating,
                    book.last_read_date,
                    key,
                ],
            )
            .db_context("Failed to update book")?;

        Ok(changed > 0)
    }

    /// Deletes a row, returning whether one was removed.
    pub fn delete_book(&mut self, key: i64) -> Result<bool> {
        let removed = self
            .connection
            .execute(DELETE_BOOK_SQL, params![key])
            .db_context("Failed to delete book")?;

        Ok(removed > 0)
    }
}

/// Current time truncated to the millisecond precision `createdAt` is stored
/// with, so the returned book compares equal to a later read.
fn now_millis() -> Result<Timestamp> {
    Timestamp::from_millisecond(Timestamp::now().as_millisecond()).map_err(|e| {
        LibraryError::Configuration {
            message: format!("System clock out of range: {e}"),
        }
    })
}

fn conversion_error(
    column: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    // Rows written before status had a default may carry NULL.
    let status = match row.get::<_, Option<String>>(3)? {
        Some(status_str) => status_str.parse::<ReadingStatus>().map_err(|reason| {
            conversion_error(
                3,
                std::io::Error::new(std::io::ErrorKind::InvalidData, reason),
            )
        })?,
        None => ReadingStatus::default(),
    };

    let reminder_time = row
        .get::<_, Option<String>>(4)?
        .map(|raw| raw.parse::<Timestamp>())
        .transpose()
        .map_err(|e| conversion_error(4, e))?;

    let created_at = match row.get::<_, Option<i64>>(7)? {
        Some(millis) => Timestamp::from_millisecond(millis)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Integer, Box::new(e)))?,
        None => Timestamp::UNIX_EPOCH,
    };

    Ok(Book {
        id: encode_id(row.get(0)?),
        title: row.get(1)?,
        author: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        status,
        reminder_time,
        notes: row.get(5)?,
        image_uri: row.get(6)?,
        created_at,
        total_pages: row.get(8)?,
        current_page: row.get(9)?,
        rating: row.get(10)?,
        last_read_date: row.get(11)?,
    })
}
