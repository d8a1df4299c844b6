//! Conversion between the store's integer row keys and external book ids.
//!
//! Books are keyed by an `INTEGER PRIMARY KEY AUTOINCREMENT` column, but every
//! public operation speaks in opaque string ids. This module is the only place
//! the two representations meet.

use crate::error::{LibraryError, Result};

/// Renders an internal row key as an external id.
pub fn encode_id(key: i64) -> String {
    key.to_string()
}

/// Parses an external id back into the internal row key.
///
/// Only the canonical form produced by [`encode_id`] for a key the store can
/// assign is accepted: a positive decimal integer with no sign, padding or
/// leading zeros. Anything else cannot name a stored book and fails
/// [`LibraryError::NotFound`].
pub fn decode_id(id: &str) -> Result<i64> {
    let canonical = !id.is_empty()
        && id.bytes().all(|b| b.is_ascii_digit())
        && !id.starts_with('0');
    if !canonical {
        return Err(LibraryError::not_found(id));
    }

    id.parse::<i64>().map_err(|_| LibraryError::not_found(id))
}
