//! Host collaborator interfaces.
//!
//! The widget never touches a browser directly. Everything it needs from
//! the host (element lookup, mounting, popups, clipboard, printing,
//! notifications, analytics and task spawning) goes through these traits,
//! so a browser backend and the in-memory test host are interchangeable.
//!
//! The UI runtime is single-threaded, so none of these require
//! `Send + Sync`.

pub mod memory;

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::config::{OpenMethod, PageMetadata};
use crate::popup::Viewport;
use crate::view::WidgetView;

/// Boxed future for host async operations (no `Send` bound, for WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Clipboard errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("Clipboard API unavailable")]
    Unavailable,
    #[error("Clipboard write rejected: {0}")]
    Rejected(String),
    #[error("Fallback copy failed: {0}")]
    FallbackFailed(String),
}

/// Host page access.
pub trait Document {
    /// Title, location and meta description of the current page.
    fn page_metadata(&self) -> PageMetadata;

    /// Resolve an element locator to a mount point.
    fn find_target(&self, selector: &str) -> Option<Box<dyn RenderTarget>>;
}

/// An element owned exclusively by one widget.
pub trait RenderTarget {
    /// Append the view's elements to the (cleared) target.
    fn mount(&self, view: &WidgetView);

    /// Remove all content.
    fn clear(&self);
}

/// A window opened by [`WindowService::open`].
pub trait PopupWindow {
    fn focus(&self);
}

/// Host window capabilities.
pub trait WindowService {
    /// Current window position and inner size.
    fn viewport(&self) -> Viewport;

    /// Open `url` in a named window. `None` when the host blocked it.
    fn open(&self, url: &str, name: &str, features: &str) -> Option<Box<dyn PopupWindow>>;

    /// Open the print dialog.
    fn print(&self);
}

/// Host clipboard capabilities.
pub trait ClipboardService {
    /// Asynchronous clipboard write.
    fn write_text(&self, text: &str) -> BoxFuture<'static, Result<(), ClipboardError>>;

    /// Synchronous selection-and-copy fallback.
    fn fallback_copy(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Transient user-facing messages.
pub trait Notifier {
    /// Show `message`, hiding it after `duration`.
    fn show(&self, message: &str, duration: Duration);

    /// Remove the message element entirely.
    fn remove(&self);
}

/// Optional analytics destination.
pub trait AnalyticsSink {
    fn record(&self, event: &ShareEvent);
}

/// Runs detached futures on the host event loop.
pub trait Spawner {
    fn spawn(&self, task: BoxFuture<'static, ()>);
}

/// Analytics payload for one share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareEvent {
    /// Platform key.
    pub method: String,
    pub content_type: &'static str,
    /// Shared URL.
    pub item_id: String,
    pub custom_parameters: ShareEventParameters,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareEventParameters {
    pub open_method: OpenMethod,
}

impl ShareEvent {
    pub fn new(platform: &str, url: &str, open_method: OpenMethod) -> Self {
        Self {
            method: platform.to_string(),
            content_type: "article",
            item_id: url.to_string(),
            custom_parameters: ShareEventParameters { open_method },
        }
    }
}

/// Services injected into a widget.
#[derive(Clone)]
pub struct HostServices {
    pub window: Rc<dyn WindowService>,
    pub clipboard: Rc<dyn ClipboardService>,
    pub notifier: Rc<dyn Notifier>,
    pub analytics: Option<Rc<dyn AnalyticsSink>>,
    pub spawner: Rc<dyn Spawner>,
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices")
            .field("analytics", &self.analytics.is_some())
            .finish_non_exhaustive()
    }
}
