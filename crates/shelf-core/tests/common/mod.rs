use std::sync::{
    atomic::{AtomicU64, AtomicUsize, Ordering},
    Arc, Mutex,
};

use shelf_core::{
    FireHook, Library, LibraryBuilder, NotificationCenter, PermissionState, Result, TriggerId,
    TriggerRequest,
};
use tempfile::TempDir;

/// Notification center double that records prompts and live triggers.
pub struct RecordingCenter {
    permission: Mutex<PermissionState>,
    answer: PermissionState,
    prompts: AtomicUsize,
    next_trigger: AtomicU64,
    live: Mutex<Vec<(TriggerId, TriggerRequest)>>,
}

impl RecordingCenter {
    pub fn new(answer: PermissionState) -> Self {
        Self {
            permission: Mutex::new(PermissionState::NotDetermined),
            answer,
            prompts: AtomicUsize::new(0),
            next_trigger: AtomicU64::new(0),
            live: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    /// Book ids with a live trigger, in arming order.
    pub fn live_books(&self) -> Vec<String> {
        self.live
            .lock()
            .unwrap()
            .iter()
            .map(|(_, request)| request.book_id.clone())
            .collect()
    }
}

impl NotificationCenter for RecordingCenter {
    fn permission_state(&self) -> PermissionState {
        *self.permission.lock().unwrap()
    }

    async fn request_permission(&self) -> PermissionState {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        let mut permission = self.permission.lock().unwrap();
        *permission = self.answer;
        *permission
    }

    async fn arm(&self, request: TriggerRequest, _on_fire: FireHook) -> Result<TriggerId> {
        let trigger = TriggerId(self.next_trigger.fetch_add(1, Ordering::SeqCst) + 1);
        self.live.lock().unwrap().push((trigger, request));
        Ok(trigger)
    }

    async fn disarm(&self, trigger: TriggerId) {
        self.live.lock().unwrap().retain(|(live, _)| *live != trigger);
    }

    async fn disarm_all(&self) {
        self.live.lock().unwrap().clear();
    }
}

/// Helper function to create a test library over a temporary database
pub async fn create_test_library(
    answer: PermissionState,
) -> (TempDir, Arc<RecordingCenter>, Library<RecordingCenter>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("library.db");
    let center = Arc::new(RecordingCenter::new(answer));
    let library = LibraryBuilder::new()
        .with_database_path(Some(&db_path))
        .build(Arc::clone(&center))
        .await
        .expect("Failed to create library");
    (temp_dir, center, library)
}
