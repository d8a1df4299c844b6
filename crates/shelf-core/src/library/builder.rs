//! Builder for creating and configuring Library instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use super::{BookRepository, Library};
use crate::{
    db::{ConnectionManager, StoreLocation},
    error::{LibraryError, Result},
    reminder::{NotificationCenter, ReminderScheduler},
};

/// Builder for creating and configuring Library instances.
#[derive(Debug, Clone, Default)]
pub struct LibraryBuilder {
    location: Option<StoreLocation>,
}

impl LibraryBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/shelf/library.db` or `~/.local/share/shelf/library.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.location = Some(StoreLocation::File(path.as_ref().to_path_buf()));
        }
        self
    }

    /// Uses a private in-memory store.
    pub fn in_memory(mut self) -> Self {
        self.location = Some(StoreLocation::Memory);
        self
    }

    /// Builds the library, opening and migrating the store eagerly.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::FileSystem` if the database directory cannot be
    /// created, `LibraryError::XdgDirectory` if no default location exists,
    /// and `LibraryError::StorageUnavailable` if the store fails to open.
    pub async fn build<N: NotificationCenter>(self, center: Arc<N>) -> Result<Library<N>> {
        let location = match self.location {
            Some(location) => location,
            None => StoreLocation::File(Self::default_database_path()?),
        };

        if let StoreLocation::File(path) = &location {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| LibraryError::FileSystem {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let connections = Arc::new(ConnectionManager::new(location));
        connections.acquire().await?;

        Ok(Library::new(
            BookRepository::new(connections),
            ReminderScheduler::new(center),
        ))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    pub fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("shelf")
            .place_data_file("library.db")
            .map_err(|e| LibraryError::XdgDirectory(e.to_string()))
    }
}
