//! Transient notifications with a cancel-and-restart hide timer.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::host::Notifier;

/// How long a notification stays visible.
pub const NOTIFICATION_DURATION: Duration = Duration::from_millis(3000);
/// Element id of the shared notification.
pub const NOTIFICATION_ID: &str = "share-notification";
/// Class of the notification element.
pub const NOTIFICATION_CLASS: &str = "share-notification";
/// Class toggled on while the notification is visible.
pub const NOTIFICATION_VISIBLE_CLASS: &str = "show";

pub const COPY_SUCCESS_MESSAGE: &str = "Link copied to clipboard! 📋";
pub const COPY_FAILURE_MESSAGE: &str = "Could not copy link ❌";

/// Identifier of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub i32);

/// One-shot timer capability.
pub trait Timers {
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId;
    fn cancel(&self, id: TimerId);
}

/// The element a notification is shown in.
pub trait NotificationSurface {
    /// Set the text and make the element visible, creating it if needed.
    fn display(&self, message: &str);
    fn hide(&self);
    fn remove(&self);
}

/// [`Notifier`] that owns a single hide timer.
///
/// Each `show` cancels the pending hide before scheduling a new one, so the
/// latest message always stays up for its full duration.
pub struct TransientNotifier<S, T> {
    surface: Rc<S>,
    timers: T,
    pending: Rc<Cell<Option<TimerId>>>,
}

impl<S: NotificationSurface + 'static, T: Timers> TransientNotifier<S, T> {
    pub fn new(surface: S, timers: T) -> Self {
        Self {
            surface: Rc::new(surface),
            timers,
            pending: Rc::new(Cell::new(None)),
        }
    }

    /// Whether a hide timer is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn cancel_pending(&self) {
        if let Some(id) = self.pending.take() {
            self.timers.cancel(id);
        }
    }
}

impl<S: NotificationSurface + 'static, T: Timers> Notifier for TransientNotifier<S, T> {
    fn show(&self, message: &str, duration: Duration) {
        self.cancel_pending();
        self.surface.display(message);

        let surface = Rc::clone(&self.surface);
        let pending = Rc::clone(&self.pending);
        let id = self.timers.schedule(
            duration,
            Box::new(move || {
                surface.hide();
                pending.set(None);
            }),
        );
        self.pending.set(Some(id));
    }

    fn remove(&self) {
        self.cancel_pending();
        self.surface.remove();
    }
}
