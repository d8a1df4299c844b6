//! One-shot reading reminders.
//!
//! [`ReminderScheduler`] keeps at most one armed trigger per book id on top
//! of a [`NotificationCenter`]. It never reads or writes the store: callers
//! decide when a stored `reminderTime` should be armed or cancelled.
//!
//! ```text
//! ┌─────────────────┐    ┌───────────────────┐    ┌────────────────────┐
//! │    Library      │    │ ReminderScheduler │    │ NotificationCenter │
//! │ (add/save/del)  │───▶│  (book id → arm)  │───▶│ (prompt, triggers) │
//! └─────────────────┘    └─────────┬─────────┘    └─────────┬──────────┘
//!                                  │ deliveries             │ fire hook
//!                                  ▼                        │
//!                          clear binding ◀──────────────────┘
//! ```
//!
//! # Invariants
//!
//! - A book id has zero or one live binding.
//! - Rescheduling disarms the previous trigger before arming the new one.
//! - A binding is recorded only after the platform accepted the trigger.
//! - A fired trigger clears its binding before the delivery is published;
//!   a trigger that no longer matches its book's binding is dropped.
//!
//! Every operation holds the binding table for its whole duration, including
//! the awaits on the platform, so operations on the same book id never
//! interleave.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex as StdMutex, PoisonError},
};

use jiff::Timestamp;
use log::{debug, info, warn};
use tokio::sync::{mpsc, Mutex};

pub mod capability;
pub mod local;


pub use capability::{Delivery, FireHook, NotificationCenter, PermissionState, TriggerRequest};
pub use local::LocalNotificationCenter;

use crate::{
    error::{LibraryError, Result},
    models::{ReminderBinding, ReminderState},
};

type Bindings = Arc<Mutex<HashMap<String, ReminderBinding>>>;

/// Arms, replaces and cancels per-book reminder triggers.
pub struct ReminderScheduler<N> {
    center: Arc<N>,
    bindings: Bindings,
    deliveries: mpsc::UnboundedSender<Delivery>,
    receiver: StdMutex<Option<mpsc::UnboundedReceiver<Delivery>>>,
}

impl<N: NotificationCenter> ReminderScheduler<N> {
    /// Creates a scheduler with no bindings.
    pub fn new(center: Arc<N>) -> Self {
        let (deliveries, receiver) = mpsc::unbounded_channel();
        Self {
            center,
            bindings: Arc::new(Mutex::new(HashMap::new())),
            deliveries,
            receiver: StdMutex::new(Some(receiver)),
        }
    }

    /// Takes the stream of fired reminders.
    ///
    /// Each delivery arrives after its binding was cleared. Returns `None`
    /// once the stream has been taken.
    pub fn take_deliveries(&self) -> Option<mpsc::UnboundedReceiver<Delivery>> {
        self.receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// The notification center triggers are armed on.
    pub fn center(&self) -> &N {
        &self.center
    }

    /// Ensures notification permission, prompting only when not yet granted.
    ///
    /// Returns `true` without touching the platform prompt if permission was
    /// already granted.
    pub async fn request_permission(&self) -> bool {
        if self.center.permission_state() == PermissionState::Granted {
            return true;
        }

        let granted = self.center.request_permission().await == PermissionState::Granted;
        if !granted {
            warn!("Notification permission not granted");
        }
        granted
    }

    /// Arms a reminder for `book_id` at `fire_at`, replacing any existing one.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `book_id` is empty
    /// - `PastDeadline` if `fire_at` is not after the current time; checked
    ///   before permission so a past time never prompts, and again once the
    ///   binding table is held
    /// - `PermissionDenied` if notification permission is not granted
    ///
    /// On any error the existing binding for `book_id` is left untouched,
    /// except when the platform refuses the new trigger after the old one was
    /// disarmed; the book then has no binding.
    pub async fn schedule(&self, book_id: &str, title: &str, fire_at: Timestamp) -> Result<()> {
        if book_id.is_empty() {
            return Err(LibraryError::invalid_input("bookId").with_reason("must not be empty"));
        }
        if fire_at <= Timestamp::now() {
            return Err(LibraryError::PastDeadline { fire_at });
        }
        if !self.request_permission().await {
            return Err(LibraryError::PermissionDenied);
        }

        let mut bindings = self.bindings.lock().await;
        if fire_at <= Timestamp::now() {
            debug!("Reminder for book {book_id} expired while waiting to arm");
            return Err(LibraryError::PastDeadline { fire_at });
        }

        if let Some(previous) = bindings.remove(book_id) {
            debug!(
                "Replacing reminder for book {book_id} (was {})",
                previous.fire_at
            );
            self.center.disarm(previous.trigger).await;
        }

        let request = TriggerRequest {
            book_id: book_id.to_string(),
            title: title.to_string(),
            fire_at,
        };
        let trigger = self.center.arm(request, self.fire_hook()).await?;

        bindings.insert(
            book_id.to_string(),
            ReminderBinding {
                book_id: book_id.to_string(),
                title: title.to_string(),
                fire_at,
                trigger,
            },
        );
        info!("Reminder for book {book_id} scheduled at {fire_at}");

        Ok(())
    }

    /// Disarms and forgets the reminder for `book_id`, if any.
    pub async fn cancel(&self, book_id: &str) {
        let mut bindings = self.bindings.lock().await;
        if let Some(binding) = bindings.remove(book_id) {
            self.center.disarm(binding.trigger).await;
            info!("Reminder for book {book_id} cancelled");
        }
    }

    /// Disarms every trigger the application armed and forgets all bindings.
    pub async fn cancel_all(&self) {
        let mut bindings = self.bindings.lock().await;
        let count = bindings.len();
        bindings.clear();
        self.center.disarm_all().await;
        info!("Cancelled all reminders ({count} bound)");
    }

    /// Hook that retires a fired trigger's binding and publishes it.
    fn fire_hook(&self) -> FireHook {
        let bindings = Arc::clone(&self.bindings);
        let deliveries = self.deliveries.clone();

        FireHook::new(move |delivery| async move {
            let mut bindings = bindings.lock().await;
            let current = bindings
                .get(&delivery.book_id)
                .is_some_and(|binding| binding.trigger == delivery.trigger);
            if !current {
                debug!(
                    "Dropping stale trigger {} for book {}",
                    delivery.trigger.0, delivery.book_id
                );
                return;
            }

            bindings.remove(&delivery.book_id);
            info!("Reminder for book {} fired", delivery.book_id);
            if deliveries.send(delivery).is_err() {
                debug!("Delivery dropped: no receiver");
            }
        })
    }

    /// The live binding for `book_id`.
    pub async fn binding(&self, book_id: &str) -> Option<ReminderBinding> {
        self.bindings.lock().await.get(book_id).cloned()
    }

    /// Reminder state of `book_id`.
    pub async fn state(&self, book_id: &str) -> ReminderState {
        match self.binding(book_id).await {
            Some(binding) => ReminderState::Scheduled {
                fire_at: binding.fire_at,
            },
            None => ReminderState::NoReminder,
        }
    }

    /// Every live binding, soonest first.
    pub async fn bindings(&self) -> Vec<ReminderBinding> {
        let mut bindings: Vec<_> = self.bindings.lock().await.values().cloned().collect();
        bindings.sort_by(|a, b| {
            a.fire_at
                .cmp(&b.fire_at)
                .then_with(|| a.book_id.cmp(&b.book_id))
        });
        bindings
    }
}
