//! Reminder binding state kept by the scheduler.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Handle of a trigger armed on the notification platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriggerId(pub u64);

/// Live association between a book and its armed trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderBinding {
    pub book_id: String,
    pub title: String,
    pub fire_at: Timestamp,
    pub trigger: TriggerId,
}

/// Reminder state of a single book id as seen by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderState {
    /// No trigger is armed for the book
    NoReminder,
    /// A trigger is armed and will fire at the given time
    Scheduled { fire_at: Timestamp },
}
