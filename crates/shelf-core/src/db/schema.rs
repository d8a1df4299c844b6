//! Database schema initialization and additive migrations.
//!
//! The base table comes from the embedded `schema.sql`. Every column added
//! after the base revision is listed in [`ADDITIVE_COLUMNS`] and applied with
//! `ALTER TABLE .. ADD COLUMN` when missing, so stores created by any earlier
//! revision are upgraded in place. Columns are never dropped or renamed and
//! rows are never rewritten.

use log::{debug, info, warn};

use crate::error::{DatabaseResultExt, Result};

/// Schema revision mirrored to `PRAGMA user_version` after migration.
pub const SCHEMA_VERSION: u32 = 2;

/// Columns added after the base revision, in the order they were introduced.
pub const ADDITIVE_COLUMNS: &[(&str, &str)] = &[
    ("imageUri", "TEXT"),
    ("totalPages", "INTEGER"),
    ("currentPage", "INTEGER"),
    ("rating", "REAL"),
    ("lastReadDate", "TEXT"),
];

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    ///
    /// Idempotent: running it against an up-to-date store changes nothing.
    pub(crate) fn initialize_schema(&mut self) -> Result<()> {
        let journal_mode: String = self
            .connection
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .db_context("Failed to set journal mode")?;
        debug!("Journal mode: {journal_mode}");

        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        self.apply_migrations()
    }

    /// Adds any missing columns and records the schema revision.
    fn apply_migrations(&mut self) -> Result<()> {
        let stored_version = self.schema_version()?;
        if stored_version > SCHEMA_VERSION {
            warn!(
                "Store schema revision {stored_version} is newer than {SCHEMA_VERSION}; \
                 continuing with known columns"
            );
        }

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin migration transaction")?;

        for (column, declaration) in ADDITIVE_COLUMNS {
            let exists: bool = tx
                .query_row(
                    "SELECT COUNT(*) FROM pragma_table_info('books') WHERE name = ?1",
                    [*column],
                    |row| row.get::<_, i64>(0),
                )
                .map(|count| count > 0)
                .db_context("Failed to inspect books table")?;

            if !exists {
                info!("Adding column {column} to books table");
                tx.execute_batch(&format!(
                    "ALTER TABLE books ADD COLUMN {column} {declaration}"
                ))
                .db_context("Failed to add column to books table")?;
            }
        }

        if stored_version < SCHEMA_VERSION {
            tx.pragma_update(None, "user_version", SCHEMA_VERSION)
                .db_context("Failed to record schema version")?;
        }

        tx.commit().db_context("Failed to commit migration")?;
        Ok(())
    }

    /// Returns the revision recorded in `PRAGMA user_version`.
    pub fn schema_version(&self) -> Result<u32> {
        self.connection
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .db_context("Failed to read schema version")
    }

    /// Returns the column names of the books table in declaration order.
    pub fn book_columns(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .connection
            .prepare("SELECT name FROM pragma_table_info('books') ORDER BY cid")
            .db_context("Failed to prepare query")?;
        let columns = stmt
            .query_map([], |row| row.get(0))
            .db_context("Failed to query columns")?
            .collect::<std::result::Result<Vec<String>, _>>()
            .db_context("Failed to fetch columns")?;
        Ok(columns)
    }
}
