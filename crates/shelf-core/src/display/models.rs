//! Display implementations for domain models.
//!
//! All output is markdown so the CLI renderer can style it.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    library::ReminderOutcome,
    models::{Book, ReadingStatus, ReminderBinding, ReminderState},
};

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Book {
    /// Reading progress such as `40/612 pages`, if any page is known.
    pub fn progress(&self) -> Option<String> {
        match (self.current_page, self.total_pages) {
            (Some(current), Some(total)) => Some(format!("{current}/{total} pages")),
            (Some(current), None) => Some(format!("page {current}")),
            (None, Some(total)) => Some(format!("{total} pages")),
            (None, None) => None,
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.title)?;
        writeln!(f)?;

        if !self.author.is_empty() {
            writeln!(f, "- Author: {}", self.author)?;
        }
        writeln!(f, "- Status: {}", self.status.label())?;
        if let Some(progress) = self.progress() {
            writeln!(f, "- Progress: {progress}")?;
        }
        if let Some(rating) = self.rating {
            writeln!(f, "- Rating: {rating}")?;
        }
        if let Some(reminder) = &self.reminder_time {
            writeln!(f, "- Reminder: {}", LocalDateTime(reminder))?;
        }
        if let Some(last_read) = &self.last_read_date {
            writeln!(f, "- Last read: {last_read}")?;
        }
        if let Some(cover) = &self.image_uri {
            writeln!(f, "- Cover: {cover}")?;
        }
        writeln!(f, "- Added: {}", LocalDateTime(&self.created_at))?;

        if let Some(notes) = &self.notes {
            writeln!(f)?;
            writeln!(f, "{notes}")?;
        }

        Ok(())
    }
}

impl fmt::Display for ReminderBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- **{}** (ID: {}) at {}",
            self.title,
            self.book_id,
            LocalDateTime(&self.fire_at)
        )
    }
}

impl fmt::Display for ReminderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReminderState::NoReminder => write!(f, "no reminder"),
            ReminderState::Scheduled { fire_at } => {
                write!(f, "scheduled for {}", LocalDateTime(fire_at))
            }
        }
    }
}

impl fmt::Display for ReminderOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReminderOutcome::NotRequested => write!(f, "No reminder set"),
            ReminderOutcome::Scheduled { fire_at } => {
                write!(f, "Reminder scheduled for {}", LocalDateTime(fire_at))
            }
            ReminderOutcome::Cancelled => write!(f, "Reminder cancelled"),
            ReminderOutcome::PermissionDenied => {
                write!(f, "Reminder not scheduled: notification permission denied")
            }
            ReminderOutcome::PastDeadline { fire_at } => write!(
                f,
                "Reminder not scheduled: {} is not in the future",
                LocalDateTime(fire_at)
            ),
        }
    }
}
