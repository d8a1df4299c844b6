//! Database operations and SQLite management for books.
//!
//! This module provides the low-level, synchronous side of the store: one
//! [`Database`] wraps one SQLite connection, [`schema`] declares and migrates
//! the `books` table, and [`book_queries`] holds the CRUD statements. The
//! async layer reaches a `Database` only through [`connection`], which owns
//! the single connection of the process.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod book_queries;
pub mod connection;
pub mod schema;

pub use connection::{ConnectionManager, StoreHandle, StoreLocation};

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens a database file and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut db = Self::open(path)?;
        db.initialize_schema()?;
        Ok(db)
    }

    /// Opens a fresh in-memory database with the schema initialized.
    pub fn new_in_memory() -> Result<Self> {
        let mut db = Self::open_in_memory()?;
        db.initialize_schema()?;
        Ok(db)
    }

    /// Opens a database file without touching the schema.
    pub(crate) fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        Ok(Self { connection })
    }

    /// Opens an in-memory database without touching the schema.
    pub(crate) fn open_in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().db_context("Failed to open in-memory database")?;
        Ok(Self { connection })
    }
}
