//! Tests for the library facade.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex as StdMutex,
    },
    time::Duration,
};

use jiff::SignedDuration;
use tempfile::TempDir;
use tokio::sync::{mpsc::UnboundedReceiver, Notify};

use super::*;
use crate::{
    error::ErrorKind,
    models::{ReadingStatus, ReminderState, TriggerId},
    reminder::{
        Delivery, FireHook, LocalNotificationCenter, PermissionState, TriggerRequest,
    },
};

type TestLibrary = Library<LocalNotificationCenter>;

/// Helper function to create a library over a temporary database file
async fn create_test_library(allow: bool) -> (TempDir, TestLibrary, UnboundedReceiver<Delivery>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("library.db");
    let library = LibraryBuilder::new()
        .with_database_path(Some(&db_path))
        .build(Arc::new(LocalNotificationCenter::new(allow)))
        .await
        .expect("Failed to create library");
    let deliveries = library
        .reminders()
        .take_deliveries()
        .expect("Failed to take deliveries");
    (temp_dir, library, deliveries)
}

/// Runs raw SQL against the library file through a second connection.
fn execute_raw(temp_dir: &TempDir, sql: &str) {
    let path = temp_dir.path().join("library.db");
    let conn = rusqlite::Connection::open(path).expect("Failed to open raw connection");
    conn.execute_batch(sql).expect("Failed to run raw SQL");
}

fn dune() -> CreateBook {
    CreateBook {
        status: Some("reading".to_string()),
        total_pages: Some(612),
        current_page: Some(40),
        ..CreateBook::new("Dune", "Frank Herbert")
    }
}

fn in_minutes(minutes: i64) -> Timestamp {
    Timestamp::now() + SignedDuration::from_mins(minutes)
}

#[tokio::test]
async fn test_add_book_round_trips() {
    let (_temp_dir, library, _rx) = create_test_library(true).await;

    let saved = library.add_book(&dune()).await.expect("Failed to add book");
    assert_eq!(saved.reminder, ReminderOutcome::NotRequested);
    assert!(!saved.book.id.is_empty());

    let stored = library
        .books()
        .get_by_id(&saved.book.id)
        .await
        .expect("Failed to get book");
    assert_eq!(stored, saved.book);
    assert_eq!(stored.status, ReadingStatus::Reading);
    assert_eq!(stored.total_pages, Some(612));
    assert_eq!(stored.current_page, Some(40));
    assert!(stored.reminder_time.is_none());

    let listed = library.books().list().await;
    assert!(listed.iter().any(|book| book.id == saved.book.id));
}

#[tokio::test]
async fn test_save_book_keeps_created_at() {
    let (_temp_dir, library, _rx) = create_test_library(true).await;
    let saved = library.add_book(&dune()).await.unwrap();

    let mut finished = saved.book.clone();
    finished.status = ReadingStatus::Finished;
    finished.created_at = Timestamp::UNIX_EPOCH;
    library.save_book(&finished).await.expect("Failed to save");

    let stored = library.books().get_by_id(&saved.book.id).await.unwrap();
    assert_eq!(stored.status, ReadingStatus::Finished);
    assert_eq!(stored.created_at, saved.book.created_at);
    assert_eq!(stored.title, "Dune");
    assert_eq!(stored.total_pages, Some(612));
}

#[tokio::test]
async fn test_reminder_follows_saved_time() {
    let (_temp_dir, library, _rx) = create_test_library(true).await;
    let fire_at = in_minutes(60);

    let saved = library
        .add_book(&CreateBook {
            reminder_time: Some(fire_at),
            ..dune()
        })
        .await
        .unwrap();
    assert_eq!(saved.reminder, ReminderOutcome::Scheduled { fire_at });
    assert_eq!(library.reminders().center().armed(), 1);

    let mut cleared = saved.book.clone();
    cleared.reminder_time = None;
    let resaved = library.save_book(&cleared).await.unwrap();

    assert_eq!(resaved.reminder, ReminderOutcome::Cancelled);
    assert_eq!(
        library.reminders().state(&saved.book.id).await,
        ReminderState::NoReminder
    );
    assert_eq!(library.reminders().center().armed(), 0);
}

#[tokio::test]
async fn test_past_reminder_still_saves_book() {
    let (_temp_dir, library, _rx) = create_test_library(true).await;
    let past = in_minutes(-5);

    let saved = library
        .add_book(&CreateBook {
            reminder_time: Some(past),
            ..dune()
        })
        .await
        .expect("book must still be saved");

    assert_eq!(saved.reminder, ReminderOutcome::PastDeadline { fire_at: past });
    let stored = library.books().get_by_id(&saved.book.id).await.unwrap();
    assert_eq!(stored.reminder_time, Some(past));
    assert!(library.reminders().bindings().await.is_empty());
}

#[tokio::test]
async fn test_denied_permission_still_saves_book() {
    let (_temp_dir, library, _rx) = create_test_library(false).await;

    let saved = library
        .add_book(&CreateBook {
            reminder_time: Some(in_minutes(30)),
            ..dune()
        })
        .await
        .expect("book must still be saved");

    assert_eq!(saved.reminder, ReminderOutcome::PermissionDenied);
    assert!(library.reminders().bindings().await.is_empty());
}

#[tokio::test]
async fn test_remove_book_cancels_reminder() {
    let (_temp_dir, library, _rx) = create_test_library(true).await;
    let saved = library
        .add_book(&CreateBook {
            reminder_time: Some(in_minutes(30)),
            ..dune()
        })
        .await
        .unwrap();

    assert!(library.remove_book(&saved.book.id).await.unwrap());

    let err = library.books().get_by_id(&saved.book.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(
        library.reminders().state(&saved.book.id).await,
        ReminderState::NoReminder
    );
    assert!(!library.remove_book(&saved.book.id).await.unwrap());
}

#[tokio::test]
async fn test_blank_title_is_rejected_before_storage() {
    let (_temp_dir, library, _rx) = create_test_library(true).await;

    let err = library
        .add_book(&CreateBook::new("   ", "Anyone"))
        .await
        .expect_err("blank title must fail");

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(library.books().list().await.is_empty());
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let (_temp_dir, library, _rx) = create_test_library(true).await;
    let saved = library.add_book(&dune()).await.unwrap();

    let mut ghost = saved.book.clone();
    ghost.id = "999999".to_string();
    let err = library.books().update(&ghost).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    ghost.id = "not-a-number".to_string();
    let err = library.books().update(&ghost).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_update_rejects_blank_title() {
    let (_temp_dir, library, _rx) = create_test_library(true).await;
    let saved = library.add_book(&dune()).await.unwrap();

    let mut blank = saved.book.clone();
    blank.title = " ".to_string();
    let err = library.save_book(&blank).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let stored = library.books().get_by_id(&saved.book.id).await.unwrap();
    assert_eq!(stored.title, "Dune");
}

#[tokio::test]
async fn test_malformed_ids() {
    let (_temp_dir, library, _rx) = create_test_library(true).await;

    let err = library.books().get_by_id("abc").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(!library.books().delete("abc").await.unwrap());
    assert!(!library.remove_book("").await.unwrap());
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let (_temp_dir, library, _rx) = create_test_library(true).await;
    for title in ["First", "Second", "Third"] {
        library
            .add_book(&CreateBook::new(title, ""))
            .await
            .unwrap();
    }

    let titles: Vec<_> = library
        .books()
        .list()
        .await
        .into_iter()
        .map(|book| book.title)
        .collect();
    assert_eq!(titles, vec!["Third", "Second", "First"]);
}

#[tokio::test]
async fn test_search_filters_listing() {
    let (_temp_dir, library, _rx) = create_test_library(true).await;
    library.add_book(&dune()).await.unwrap();
    library.add_book(&CreateBook::new("Emma", "Jane Austen")).await.unwrap();

    let found = library.search(&BookFilter::search("austen")).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Emma");

    let reading = library
        .search(&BookFilter {
            query: None,
            status: Some(ReadingStatus::Reading),
        })
        .await;
    assert_eq!(reading.len(), 1);
    assert_eq!(reading[0].title, "Dune");
}

#[tokio::test]
async fn test_rearm_only_pending_reminders() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("library.db");

    {
        let library = LibraryBuilder::new()
            .with_database_path(Some(&db_path))
            .build(Arc::new(LocalNotificationCenter::new(true)))
            .await
            .unwrap();
        library
            .add_book(&CreateBook {
                reminder_time: Some(in_minutes(45)),
                ..CreateBook::new("Ahead", "")
            })
            .await
            .unwrap();
        library
            .add_book(&CreateBook {
                reminder_time: Some(in_minutes(-45)),
                ..CreateBook::new("Behind", "")
            })
            .await
            .unwrap();
        library.add_book(&CreateBook::new("None", "")).await.unwrap();
    }

    let library = LibraryBuilder::new()
        .with_database_path(Some(&db_path))
        .build(Arc::new(LocalNotificationCenter::new(true)))
        .await
        .unwrap();
    assert!(library.reminders().bindings().await.is_empty());

    let armed = library.rearm_pending_reminders().await.unwrap();
    assert_eq!(armed, 1);

    let bindings = library.reminders().bindings().await;
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].title, "Ahead");
}

#[tokio::test]
async fn test_clear_reminders_keeps_stored_times() {
    let (_temp_dir, library, _rx) = create_test_library(true).await;
    let fire_at = in_minutes(15);
    let saved = library
        .add_book(&CreateBook {
            reminder_time: Some(fire_at),
            ..dune()
        })
        .await
        .unwrap();

    library.clear_reminders().await;

    assert!(library.reminders().bindings().await.is_empty());
    let stored = library.books().get_by_id(&saved.book.id).await.unwrap();
    assert_eq!(stored.reminder_time, Some(fire_at));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_get_distinct_ids() {
    let (_temp_dir, library, _rx) = create_test_library(true).await;
    let library = Arc::new(library);

    let tasks: Vec<_> = (0..10)
        .map(|i| {
            let library = Arc::clone(&library);
            tokio::spawn(async move {
                library
                    .add_book(&CreateBook::new(format!("Book {i}"), ""))
                    .await
            })
        })
        .collect();

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap().unwrap().book.id);
    }
    ids.sort();
    ids.dedup();

    assert_eq!(ids.len(), 10);
    assert_eq!(library.books().list().await.len(), 10);
    assert_eq!(library.books().connections().schema_initializations(), 1);
}

#[tokio::test]
async fn test_fired_reminder_clears_binding_and_keeps_stored_time() {
    let (_temp_dir, library, mut deliveries) = create_test_library(true).await;
    let fire_at = Timestamp::now() + SignedDuration::from_millis(100);
    let saved = library
        .add_book(&CreateBook {
            reminder_time: Some(fire_at),
            ..dune()
        })
        .await
        .unwrap();

    let delivery = tokio::time::timeout(Duration::from_secs(5), deliveries.recv())
        .await
        .expect("delivery timed out")
        .expect("channel closed");

    assert_eq!(delivery.book_id, saved.book.id);
    assert_eq!(
        library.reminders().state(&saved.book.id).await,
        ReminderState::NoReminder
    );
    assert_eq!(library.reminders().center().armed(), 0);
    let stored = library.books().get_by_id(&saved.book.id).await.unwrap();
    assert_eq!(stored.reminder_time, Some(fire_at));
}

#[tokio::test]
async fn test_undecodable_row_is_skipped_in_listing() {
    let (temp_dir, library, _rx) = create_test_library(true).await;
    library.add_book(&CreateBook::new("Dune", "")).await.unwrap();
    library.add_book(&CreateBook::new("Emma", "")).await.unwrap();

    execute_raw(&temp_dir, "UPDATE books SET status = 'abandoned' WHERE id = 1;");

    let books = library.books().list().await;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "Emma");
    assert_eq!(library.books().try_list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_storage_fault_degrades_list_but_not_try_list() {
    let (temp_dir, library, _rx) = create_test_library(true).await;
    library.add_book(&CreateBook::new("Dune", "")).await.unwrap();

    execute_raw(&temp_dir, "DROP TABLE books;");

    assert!(library.books().list().await.is_empty());
    let err = library
        .books()
        .try_list()
        .await
        .expect_err("missing table must surface");
    assert_eq!(err.kind(), ErrorKind::IoFault);
}

/// Notification center whose permission prompt waits to be released.
#[derive(Default)]
struct GatedCenter {
    entered: Notify,
    release: Notify,
    next_trigger: AtomicU64,
    live: StdMutex<Vec<(TriggerId, String)>>,
}

impl NotificationCenter for GatedCenter {
    fn permission_state(&self) -> PermissionState {
        PermissionState::NotDetermined
    }

    async fn request_permission(&self) -> PermissionState {
        self.entered.notify_one();
        self.release.notified().await;
        PermissionState::Granted
    }

    async fn arm(&self, request: TriggerRequest, _on_fire: FireHook) -> Result<TriggerId> {
        let trigger = TriggerId(self.next_trigger.fetch_add(1, Ordering::SeqCst) + 1);
        self.live.lock().unwrap().push((trigger, request.book_id));
        Ok(trigger)
    }

    async fn disarm(&self, trigger: TriggerId) {
        self.live.lock().unwrap().retain(|(live, _)| *live != trigger);
    }

    async fn disarm_all(&self) {
        self.live.lock().unwrap().clear();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_remove_during_save_leaves_no_trigger() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let center = Arc::new(GatedCenter::default());
    let library = Arc::new(
        LibraryBuilder::new()
            .with_database_path(Some(temp_dir.path().join("library.db")))
            .build(Arc::clone(&center))
            .await
            .unwrap(),
    );
    let book = library
        .add_book(&CreateBook::new("Dune", ""))
        .await
        .unwrap()
        .book;
    let id = book.id.clone();

    let save = tokio::spawn({
        let library = Arc::clone(&library);
        let book = Book {
            reminder_time: Some(in_minutes(30)),
            ..book
        };
        async move { library.save_book(&book).await }
    });
    center.entered.notified().await;

    let remove = tokio::spawn({
        let library = Arc::clone(&library);
        let id = id.clone();
        async move { library.remove_book(&id).await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    center.release.notify_one();

    let saved = save.await.unwrap().unwrap();
    assert!(matches!(saved.reminder, ReminderOutcome::Scheduled { .. }));
    assert!(remove.await.unwrap().unwrap());

    assert!(library.books().get_by_id(&id).await.is_err());
    assert!(library.reminders().binding(&id).await.is_none());
    assert!(center.live.lock().unwrap().is_empty());
}
