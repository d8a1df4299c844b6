//! In-process notification center backed by tokio timers.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};

use jiff::Timestamp;
use log::{debug, info};
use tokio::task::JoinHandle;

use super::capability::{Delivery, FireHook, NotificationCenter, PermissionState, TriggerRequest};
use crate::{error::Result, models::TriggerId};

type Timers = Arc<Mutex<HashMap<TriggerId, JoinHandle<()>>>>;

/// Notification center that fires triggers inside the process.
///
/// Each armed trigger is a task sleeping until its fire time. When it wakes
/// it runs the trigger's [`FireHook`]. The answer to the first permission
/// prompt is fixed at construction.
pub struct LocalNotificationCenter {
    permission: Mutex<PermissionState>,
    prompt_answer: PermissionState,
    next_trigger: AtomicU64,
    timers: Timers,
}

impl LocalNotificationCenter {
    /// Creates a center whose permission prompt answers `allow`.
    pub fn new(allow: bool) -> Self {
        Self {
            permission: Mutex::new(PermissionState::NotDetermined),
            prompt_answer: if allow {
                PermissionState::Granted
            } else {
                PermissionState::Denied
            },
            next_trigger: AtomicU64::new(0),
            timers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of triggers armed and not yet fired.
    pub fn armed(&self) -> usize {
        lock(&self.timers).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl NotificationCenter for LocalNotificationCenter {
    fn permission_state(&self) -> PermissionState {
        *lock(&self.permission)
    }

    async fn request_permission(&self) -> PermissionState {
        let mut permission = lock(&self.permission);
        if *permission == PermissionState::NotDetermined {
            *permission = self.prompt_answer;
            info!("Notification permission answered: {:?}", self.prompt_answer);
        }
        *permission
    }

    async fn arm(&self, request: TriggerRequest, on_fire: FireHook) -> Result<TriggerId> {
        let trigger = TriggerId(self.next_trigger.fetch_add(1, Ordering::SeqCst) + 1);
        let delay = Duration::try_from(request.fire_at.duration_since(Timestamp::now()))
            .unwrap_or(Duration::ZERO);

        let timers = Arc::clone(&self.timers);

        // Hold the table while spawning so the task cannot look itself up
        // before it is registered.
        let mut table = lock(&self.timers);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let still_armed = lock(&timers).remove(&trigger).is_some();
            if !still_armed {
                return;
            }

            debug!("Trigger {} fired for book {}", trigger.0, request.book_id);
            on_fire
                .fire(Delivery {
                    trigger,
                    book_id: request.book_id,
                    title: request.title,
                    fire_at: request.fire_at,
                })
                .await;
        });
        table.insert(trigger, handle);

        Ok(trigger)
    }

    async fn disarm(&self, trigger: TriggerId) {
        if let Some(handle) = lock(&self.timers).remove(&trigger) {
            handle.abort();
        }
    }

    async fn disarm_all(&self) {
        for (_, handle) in lock(&self.timers).drain() {
            handle.abort();
        }
    }
}
