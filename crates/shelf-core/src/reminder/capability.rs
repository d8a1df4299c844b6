//! The notification platform seam.
//!
//! [`NotificationCenter`] is everything the scheduler needs from the host
//! platform: a permission prompt and one-shot triggers. Production code uses
//! [`super::LocalNotificationCenter`]; tests substitute a recording double.

use std::{fmt, future::Future};

use futures::future::{BoxFuture, FutureExt};
use jiff::Timestamp;

use crate::{error::Result, models::TriggerId};

/// Notification permission as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    /// The user has not been asked yet
    #[default]
    NotDetermined,
    Granted,
    /// The user refused or dismissed the prompt
    Denied,
}

/// What to show, and when, for a single reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerRequest {
    pub book_id: String,
    pub title: String,
    pub fire_at: Timestamp,
}

/// A trigger that has fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub trigger: TriggerId,
    pub book_id: String,
    pub title: String,
    pub fire_at: Timestamp,
}

/// Work a center runs when a trigger fires.
///
/// The scheduler passes one hook with every armed trigger. The center calls
/// it exactly once with the [`Delivery`], unless the trigger was disarmed
/// first; the hook decides whether the delivery is still current and
/// publishes it.
pub struct FireHook(Box<dyn FnOnce(Delivery) -> BoxFuture<'static, ()> + Send>);

impl FireHook {
    pub fn new<F, Fut>(hook: F) -> Self
    where
        F: FnOnce(Delivery) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self(Box::new(move |delivery| hook(delivery).boxed()))
    }

    /// Runs the hook for a fired trigger.
    pub async fn fire(self, delivery: Delivery) {
        (self.0)(delivery).await;
    }
}

impl fmt::Debug for FireHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FireHook")
    }
}

/// Platform capability for permission prompts and one-shot triggers.
pub trait NotificationCenter: Send + Sync + 'static {
    /// Current permission without prompting.
    fn permission_state(&self) -> PermissionState;

    /// Asks the user for permission; may show UI.
    fn request_permission(&self) -> impl Future<Output = PermissionState> + Send;

    /// Registers a one-shot trigger that runs `on_fire` when it fires.
    fn arm(
        &self,
        request: TriggerRequest,
        on_fire: FireHook,
    ) -> impl Future<Output = Result<TriggerId>> + Send;

    /// Removes a trigger; unknown or already fired triggers are ignored.
    fn disarm(&self, trigger: TriggerId) -> impl Future<Output = ()> + Send;

    /// Removes every trigger this application registered.
    fn disarm_all(&self) -> impl Future<Output = ()> + Send;
}
