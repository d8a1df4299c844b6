//! Shelf CLI Application
//!
//! Command-line interface for the shelf reading tracker.

mod args;
mod cli;
mod renderer;

use std::sync::Arc;

use anyhow::{Context, Result};
use args::{Args, Commands, NotificationsArg};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use shelf_core::{BookFilter, LibraryBuilder, LocalNotificationCenter};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        notifications,
        command,
    } = Args::parse();

    let center = LocalNotificationCenter::new(notifications == NotificationsArg::Allow);

    let library = LibraryBuilder::new()
        .with_database_path(database_file)
        .build(Arc::new(center))
        .await
        .context("Failed to open library")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Shelf started");

    let cli = Cli::new(library, renderer);
    match command {
        Some(Book { command }) => cli.handle_book_command(command).await,
        Some(Remind { command }) => cli.handle_remind_command(command).await,
        None => cli.list_books(BookFilter::default()).await,
    }
}
