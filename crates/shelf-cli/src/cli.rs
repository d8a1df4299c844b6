//! Command definitions and handlers.
//!
//! Argument structs carry clap-specific attributes and convert into core
//! parameter types; [`Cli`] runs one parsed command against the library and
//! renders the result.
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Library → Display → Renderer
//! ```

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use jiff::{civil::DateTime, tz::TimeZone, SignedDuration, Timestamp};
use log::info;
use shelf_core::{
    display::{Books, CreateResult, DeleteResult, OperationStatus, Reminders, UpdateResult},
    params::CreateBook,
    Book, BookFilter, Delivery, Library, LocalDateTime, LocalNotificationCenter, ReadingStatus,
};

use crate::renderer::TerminalRenderer;

/// Command-line representation of reading statuses
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// On the to-read list
    Planned,
    /// Currently being read
    Reading,
    /// Read to the end
    Finished,
}

impl From<StatusArg> for ReadingStatus {
    fn from(val: StatusArg) -> Self {
        match val {
            StatusArg::Planned => ReadingStatus::Planned,
            StatusArg::Reading => ReadingStatus::Reading,
            StatusArg::Finished => ReadingStatus::Finished,
        }
    }
}

/// Parses an absolute reminder time.
///
/// Accepts RFC 3339 timestamps and local civil times such as
/// `2025-06-01 20:30`, interpreted in the system time zone.
fn parse_reminder_time(value: &str) -> std::result::Result<Timestamp, String> {
    if let Ok(at) = value.parse::<Timestamp>() {
        return Ok(at);
    }
    let civil: DateTime = value
        .parse()
        .map_err(|e| format!("invalid reminder time '{value}': {e}"))?;
    civil
        .to_zoned(TimeZone::system())
        .map(|zoned| zoned.timestamp())
        .map_err(|e| format!("invalid reminder time '{value}': {e}"))
}

fn parse_delay(value: &str) -> std::result::Result<SignedDuration, String> {
    value
        .parse::<SignedDuration>()
        .map_err(|e| format!("invalid delay '{value}': {e}"))
}

/// When a reminder should fire
#[derive(Args, Clone, Copy)]
pub struct ReminderTimeArgs {
    /// Remind at this time (RFC 3339, or local "YYYY-MM-DD HH:MM")
    #[arg(long, value_parser = parse_reminder_time, conflicts_with = "remind_in")]
    pub remind_at: Option<Timestamp>,
    /// Remind after this delay from now (e.g. 90s, 30m, 2h)
    #[arg(long, value_parser = parse_delay)]
    pub remind_in: Option<SignedDuration>,
}

impl ReminderTimeArgs {
    /// The requested fire time, if any.
    pub fn resolve(&self) -> Result<Option<Timestamp>> {
        if let Some(at) = self.remind_at {
            return Ok(Some(at));
        }
        self.remind_in
            .map(|delay| {
                Timestamp::now()
                    .checked_add(delay)
                    .map_err(|e| anyhow!("Reminder delay out of range: {e}"))
            })
            .transpose()
    }
}

/// Add a book to the library
#[derive(Args)]
pub struct AddBookArgs {
    /// Title of the book
    pub title: String,
    #[arg(short, long, default_value = "", help = "Author of the book")]
    pub author: String,
    #[arg(short, long, help = "Reading status (defaults to planned)")]
    pub status: Option<StatusArg>,
    #[arg(short, long, help = "Free-form notes")]
    pub notes: Option<String>,
    #[arg(long, help = "Cover image location")]
    pub cover: Option<String>,
    #[arg(long, help = "Total number of pages")]
    pub total_pages: Option<i64>,
    #[arg(long, help = "Page you are on")]
    pub current_page: Option<i64>,
    #[arg(long, help = "Your rating")]
    pub rating: Option<f64>,
    #[arg(long, help = "Date you last read the book")]
    pub last_read: Option<String>,
    #[command(flatten)]
    pub reminder: ReminderTimeArgs,
}

impl AddBookArgs {
    /// Convert CLI arguments to core parameters.
    pub fn into_params(self) -> Result<CreateBook> {
        Ok(CreateBook {
            title: self.title,
            author: self.author,
            status: self
                .status
                .map(|status| ReadingStatus::from(status).as_str().to_string()),
            reminder_time: self.reminder.resolve()?,
            notes: self.notes,
            image_uri: self.cover,
            total_pages: self.total_pages,
            current_page: self.current_page,
            rating: self.rating,
            last_read_date: self.last_read,
        })
    }
}

/// List books, optionally filtered
#[derive(Args)]
pub struct ListBooksArgs {
    #[arg(short, long, help = "Only books whose title or author contains this text")]
    pub query: Option<String>,
    #[arg(short, long, help = "Only books with this status")]
    pub status: Option<StatusArg>,
}

impl From<ListBooksArgs> for BookFilter {
    fn from(val: ListBooksArgs) -> Self {
        BookFilter {
            query: val.query,
            status: val.status.map(ReadingStatus::from),
        }
    }
}

/// Identify a single book
#[derive(Args)]
pub struct BookIdArgs {
    #[arg(help = "ID of the book")]
    pub id: String,
}

/// Update a book's details
///
/// Only the given fields change; everything else keeps its stored value.
#[derive(Args)]
pub struct UpdateBookArgs {
    #[arg(help = "ID of the book to update")]
    pub id: String,
    #[arg(short, long, help = "New title")]
    pub title: Option<String>,
    #[arg(short, long, help = "New author")]
    pub author: Option<String>,
    #[arg(short, long, help = "New reading status")]
    pub status: Option<StatusArg>,
    #[arg(short, long, help = "Replace the notes")]
    pub notes: Option<String>,
    #[arg(long, help = "New cover image location")]
    pub cover: Option<String>,
    #[arg(long, help = "Total number of pages")]
    pub total_pages: Option<i64>,
    #[arg(long, help = "Page you are on")]
    pub current_page: Option<i64>,
    #[arg(long, help = "Your rating")]
    pub rating: Option<f64>,
    #[arg(long, help = "Date you last read the book")]
    pub last_read: Option<String>,
}

impl UpdateBookArgs {
    /// Applies the given fields to `book`, describing each change.
    pub fn apply(self, book: &mut Book) -> Vec<String> {
        let mut changes = Vec::new();

        if let Some(title) = self.title {
            changes.push(format!("Title set to '{title}'"));
            book.title = title;
        }
        if let Some(author) = self.author {
            changes.push(format!("Author set to '{author}'"));
            book.author = author;
        }
        if let Some(status) = self.status {
            let status = ReadingStatus::from(status);
            changes.push(format!("Status set to {status}"));
            book.status = status;
        }
        if let Some(notes) = self.notes {
            changes.push("Notes replaced".to_string());
            book.notes = Some(notes);
        }
        if let Some(cover) = self.cover {
            changes.push("Cover updated".to_string());
            book.image_uri = Some(cover);
        }
        if let Some(total) = self.total_pages {
            changes.push(format!("Total pages set to {total}"));
            book.total_pages = Some(total);
        }
        if let Some(current) = self.current_page {
            changes.push(format!("Current page set to {current}"));
            book.current_page = Some(current);
        }
        if let Some(rating) = self.rating {
            changes.push(format!("Rating set to {rating}"));
            book.rating = Some(rating);
        }
        if let Some(last_read) = self.last_read {
            changes.push(format!("Last read set to {last_read}"));
            book.last_read_date = Some(last_read);
        }

        changes
    }
}

/// Set a book's reminder
#[derive(Args)]
pub struct SetReminderArgs {
    #[arg(help = "ID of the book to be reminded about")]
    pub id: String,
    #[command(flatten)]
    pub time: ReminderTimeArgs,
}

#[derive(Subcommand)]
pub enum BookCommands {
    /// Add a book to the library
    #[command(alias = "a")]
    Add(AddBookArgs),
    /// List books, newest first
    #[command(aliases = ["l", "ls"])]
    List(ListBooksArgs),
    /// Show every detail of a book
    #[command(alias = "s")]
    Show(BookIdArgs),
    /// Update a book's details
    #[command(alias = "u")]
    Update(UpdateBookArgs),
    /// Delete a book and its reminder
    #[command(aliases = ["d", "rm"])]
    Delete(BookIdArgs),
    /// Print the whole library as JSON
    Export,
}

#[derive(Subcommand)]
pub enum RemindCommands {
    /// Set or move a book's reminder
    Set(SetReminderArgs),
    /// Remove a book's reminder
    Clear(BookIdArgs),
    /// Remove every reminder
    ClearAll,
    /// List books with a reminder still ahead
    #[command(aliases = ["l", "ls"])]
    List,
    /// Arm pending reminders and wait for them to fire
    Watch,
}

/// Runs commands against an open library.
pub struct Cli {
    library: Library<LocalNotificationCenter>,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(library: Library<LocalNotificationCenter>, renderer: TerminalRenderer) -> Self {
        Self { library, renderer }
    }

    pub async fn handle_book_command(self, command: BookCommands) -> Result<()> {
        match command {
            BookCommands::Add(args) => self.add_book(args).await,
            BookCommands::List(args) => self.list_books(args.into()).await,
            BookCommands::Show(args) => self.show_book(&args.id).await,
            BookCommands::Update(args) => self.update_book(args).await,
            BookCommands::Delete(args) => self.delete_book(&args.id).await,
            BookCommands::Export => self.export_books().await,
        }
    }

    pub async fn handle_remind_command(self, command: RemindCommands) -> Result<()> {
        match command {
            RemindCommands::Set(args) => self.set_reminder(args).await,
            RemindCommands::Clear(args) => self.clear_reminder(&args.id).await,
            RemindCommands::ClearAll => self.clear_all_reminders().await,
            RemindCommands::List => self.list_reminders().await,
            RemindCommands::Watch => self.watch().await,
        }
    }

    async fn add_book(&self, args: AddBookArgs) -> Result<()> {
        let params = args.into_params()?;
        let saved = self
            .library
            .add_book(&params)
            .await
            .context("Failed to add book")?;
        self.renderer.render(&CreateResult::new(saved).to_string())
    }

    pub async fn list_books(&self, filter: BookFilter) -> Result<()> {
        let books = self.library.search(&filter).await;
        self.renderer.render(&Books(books).to_string())
    }

    async fn show_book(&self, id: &str) -> Result<()> {
        let book = self.library.books().get_by_id(id).await?;
        self.renderer.render(&book.to_string())
    }

    async fn update_book(&self, args: UpdateBookArgs) -> Result<()> {
        let mut book = self.library.books().get_by_id(&args.id).await?;
        let changes = args.apply(&mut book);
        let saved = self
            .library
            .save_book(&book)
            .await
            .context("Failed to update book")?;
        self.renderer
            .render(&UpdateResult::with_changes(saved, changes).to_string())
    }

    async fn delete_book(&self, id: &str) -> Result<()> {
        let existing = self.library.books().get_by_id(id).await.ok();
        let removed = self.library.remove_book(id).await?;

        match existing {
            Some(book) if removed => self.renderer.render(&DeleteResult::new(book).to_string()),
            _ => self
                .renderer
                .render(&OperationStatus::failure(format!("No book with ID '{id}'")).to_string()),
        }
    }

    async fn export_books(&self) -> Result<()> {
        let json = self.library.books().export_json().await?;
        println!("{json}");
        Ok(())
    }

    async fn set_reminder(&self, args: SetReminderArgs) -> Result<()> {
        let Some(fire_at) = args.time.resolve()? else {
            bail!("Provide --remind-at or --remind-in");
        };

        let mut book = self.library.books().get_by_id(&args.id).await?;
        book.reminder_time = Some(fire_at);
        let saved = self.library.save_book(&book).await?;

        let change = format!("Reminder time set to {}", LocalDateTime(&fire_at));
        self.renderer
            .render(&UpdateResult::with_changes(saved, vec![change]).to_string())
    }

    async fn clear_reminder(&self, id: &str) -> Result<()> {
        let mut book = self.library.books().get_by_id(id).await?;
        if book.reminder_time.take().is_none() {
            return self.renderer.render(
                &OperationStatus::success(format!("Book '{}' has no reminder", book.title))
                    .to_string(),
            );
        }

        let saved = self.library.save_book(&book).await?;
        self.renderer.render(
            &UpdateResult::with_changes(saved, vec!["Reminder removed".to_string()]).to_string(),
        )
    }

    async fn clear_all_reminders(&self) -> Result<()> {
        let books = self.library.books().try_list().await?;

        let mut cleared = 0;
        for mut book in books {
            if book.reminder_time.take().is_some() {
                self.library.save_book(&book).await?;
                cleared += 1;
            }
        }
        self.library.clear_reminders().await;

        info!("Cleared {cleared} stored reminder times");
        self.renderer
            .render(&OperationStatus::success(format!("Cleared {cleared} reminders")).to_string())
    }

    async fn list_reminders(&self) -> Result<()> {
        let now = Timestamp::now();
        let mut pending: Vec<_> = self
            .library
            .books()
            .list()
            .await
            .into_iter()
            .filter(|book| book.has_pending_reminder(now))
            .collect();
        pending.sort_by_key(|book| book.reminder_time);

        self.renderer.render(&Books(pending).to_string())
    }

    async fn watch(self) -> Result<()> {
        let mut deliveries = self
            .library
            .reminders()
            .take_deliveries()
            .context("Reminder deliveries already taken")?;

        self.library.rearm_pending_reminders().await?;
        let bindings = self.library.reminders().bindings().await;
        self.renderer.render(&Reminders(bindings).to_string())?;

        // A binding is cleared only as its delivery is published, so an
        // empty table means every reminder has been queued.
        while !self.library.reminders().bindings().await.is_empty() {
            tokio::select! {
                delivery = deliveries.recv() => {
                    let Some(delivery) = delivery else {
                        break;
                    };
                    self.render_delivery(&delivery)?;
                }
                signal = tokio::signal::ctrl_c() => {
                    signal.context("Failed to listen for Ctrl-C")?;
                    info!("Interrupted; stopping reminder watch");
                    break;
                }
            }
        }

        // Reminders that fired together may still be queued.
        while let Ok(delivery) = deliveries.try_recv() {
            self.render_delivery(&delivery)?;
        }

        Ok(())
    }

    fn render_delivery(&self, delivery: &Delivery) -> Result<()> {
        self.renderer.render(&format!(
            "## Time to read: {}\n\n- Book ID: {}\n- Due: {}\n",
            delivery.title,
            delivery.book_id,
            LocalDateTime(&delivery.fire_at)
        ))
    }
}
