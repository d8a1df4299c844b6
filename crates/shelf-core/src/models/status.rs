//! Reading status of a book.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of reading statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReadingStatus {
    /// On the to-read list
    #[default]
    Planned,

    /// Currently being read
    Reading,

    /// Read to the end
    Finished,
}

impl FromStr for ReadingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planned" => Ok(ReadingStatus::Planned),
            "reading" => Ok(ReadingStatus::Reading),
            "finished" => Ok(ReadingStatus::Finished),
            _ => Err(format!("Invalid reading status: {s}")),
        }
    }
}

impl ReadingStatus {
    /// All statuses in shelf order.
    pub const ALL: [ReadingStatus; 3] = [
        ReadingStatus::Planned,
        ReadingStatus::Reading,
        ReadingStatus::Finished,
    ];

    /// Convert to the stored string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::Planned => "planned",
            ReadingStatus::Reading => "reading",
            ReadingStatus::Finished => "finished",
        }
    }

    /// Human-readable label used in listings.
    ///
    /// ```rust
    /// use shelf_core::models::ReadingStatus;
    ///
    /// assert_eq!(ReadingStatus::Reading.label(), "Reading");
    /// ```
    pub fn label(&self) -> &'static str {
        match self {
            ReadingStatus::Planned => "Planned",
            ReadingStatus::Reading => "Reading",
            ReadingStatus::Finished => "Finished",
        }
    }
}
