//! Async CRUD over the shared store connection.

use std::sync::Arc;

use log::{debug, warn};

use crate::{
    db::{ConnectionManager, StoreHandle},
    error::{LibraryError, Result},
    identity::decode_id,
    models::Book,
    params::{validate_title, CreateBook},
};

/// Persistence operations for books.
///
/// Every call acquires the process-wide connection through the shared
/// [`ConnectionManager`]; the first call opens and migrates the store.
#[derive(Clone)]
pub struct BookRepository {
    connections: Arc<ConnectionManager>,
}

impl BookRepository {
    pub fn new(connections: Arc<ConnectionManager>) -> Self {
        Self { connections }
    }

    /// The connection manager backing this repository.
    pub fn connections(&self) -> &Arc<ConnectionManager> {
        &self.connections
    }

    async fn store(&self) -> Result<StoreHandle> {
        self.connections.acquire().await
    }

    /// Validates and inserts a new book, returning it as stored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the title is empty after trimming or the
    /// status is not one of planned, reading or finished.
    pub async fn create(&self, params: &CreateBook) -> Result<Book> {
        let new_book = params.validate()?;
        let store = self.store().await?;

        let book = store.run(move |db| db.insert_book(&new_book)).await?;
        debug!("Created book {} ({})", book.id, book.title);
        Ok(book)
    }

    /// All books, most recently created first.
    ///
    /// Storage faults are logged and degrade to an empty list; use
    /// [`Self::try_list`] to observe them. Individual rows that cannot be
    /// decoded are skipped either way.
    pub async fn list(&self) -> Vec<Book> {
        match self.try_list().await {
            Ok(books) => books,
            Err(err) => {
                warn!("Listing books failed, returning no books: {err}");
                Vec::new()
            }
        }
    }

    /// All books, most recently created first, surfacing faults.
    pub async fn try_list(&self) -> Result<Vec<Book>> {
        let store = self.store().await?;
        store.run(|db| db.list_books()).await
    }

    /// Every book as a pretty-printed JSON array, newest first.
    pub async fn export_json(&self) -> Result<String> {
        let books = self.try_list().await?;
        Ok(serde_json::to_string_pretty(&books)?)
    }

    /// Loads a single book.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown or malformed ids.
    pub async fn get_by_id(&self, id: &str) -> Result<Book> {
        let key = decode_id(id)?;
        let store = self.store().await?;

        store
            .run(move |db| db.get_book(key))
            .await?
            .ok_or_else(|| LibraryError::not_found(id))
    }

    /// Replaces every mutable field of the stored book with `book`'s values.
    ///
    /// `created_at` is never written.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the title is empty after trimming
    /// - `NotFound` if the id is malformed or no longer stored
    pub async fn update(&self, book: &Book) -> Result<()> {
        validate_title(&book.title)?;
        let key = decode_id(&book.id)?;
        let store = self.store().await?;

        let stored = book.clone();
        let updated = store.run(move |db| db.update_book(key, &stored)).await?;
        if !updated {
            return Err(LibraryError::not_found(&book.id));
        }

        debug!("Updated book {}", book.id);
        Ok(())
    }

    /// Deletes a book, returning whether a row was removed.
    ///
    /// Deleting an unknown or malformed id is a no-op.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let Ok(key) = decode_id(id) else {
            debug!("Ignoring delete of malformed id {id:?}");
            return Ok(false);
        };
        let store = self.store().await?;

        let removed = store.run(move |db| db.delete_book(key)).await?;
        if removed {
            debug!("Deleted book {id}");
        }
        Ok(removed)
    }
}
