use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::{BookCommands, RemindCommands};

/// Personal reading library with one-shot reading reminders
///
/// Shelf keeps your books in a local SQLite store and can remind you to pick
/// a book up again at a time you choose. Running `shelf` without a command
/// lists the library.
#[derive(Parser)]
#[command(version, about, name = "shelf")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/shelf/library.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Answer given when reminders ask for notification permission
    #[arg(long, global = true, value_enum, default_value_t = NotificationsArg::Allow)]
    pub notifications: NotificationsArg,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Shelf CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Manage books
    #[command(alias = "b")]
    Book {
        #[command(subcommand)]
        command: BookCommands,
    },
    /// Manage reading reminders
    #[command(alias = "r")]
    Remind {
        #[command(subcommand)]
        command: RemindCommands,
    },
}

/// Notification permission answer
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum NotificationsArg {
    /// Grant permission when asked
    Allow,
    /// Refuse permission when asked
    Deny,
}
