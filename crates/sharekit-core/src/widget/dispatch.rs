//! Click handling: actions, popups, and the share-completion step.

use std::rc::Rc;

use crate::config::{OpenMethod, PopupSettings, ShareCallback};
use crate::host::{ClipboardService, HostServices, Notifier, ShareEvent};
use crate::notify::{COPY_FAILURE_MESSAGE, COPY_SUCCESS_MESSAGE, NOTIFICATION_DURATION};
use crate::platform::ShareAction;
use crate::popup::{centered_position, feature_string, window_name};
use crate::view::ClickBehavior;

/// What the host should do with the click event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickOutcome {
    pub prevent_default: bool,
}

/// Everything needed to handle one click, detached from the widget.
///
/// Running a dispatch never borrows the widget, so the share callback is
/// free to call back into it.
#[derive(Debug)]
pub struct ShareDispatch {
    pub(crate) platform: String,
    pub(crate) behavior: ClickBehavior,
    pub(crate) url: String,
    pub(crate) open_method: OpenMethod,
    pub(crate) popup_settings: PopupSettings,
    pub(crate) on_share: Option<ShareCallback>,
    pub(crate) services: HostServices,
}

impl ShareDispatch {
    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn behavior(&self) -> &ClickBehavior {
        &self.behavior
    }

    /// Perform the click and the share-completion step.
    pub fn run(self) -> ClickOutcome {
        match &self.behavior {
            ClickBehavior::Action(ShareAction::Copy) => {
                let task = copy_link(
                    Rc::clone(&self.services.clipboard),
                    Rc::clone(&self.services.notifier),
                    self.url.clone(),
                );
                self.services.spawner.spawn(Box::pin(task));
            }
            ClickBehavior::Action(ShareAction::Print) => self.services.window.print(),
            ClickBehavior::Popup { share_url } => self.open_popup(share_url),
            ClickBehavior::Navigate => {}
        }

        self.complete();

        ClickOutcome {
            prevent_default: self.behavior.prevents_default(),
        }
    }

    fn open_popup(&self, share_url: &str) {
        let window = &self.services.window;
        let (left, top) = centered_position(&window.viewport(), &self.popup_settings);
        let features = feature_string(&self.popup_settings, left, top);

        match window.open(share_url, &window_name(&self.platform), &features) {
            Some(popup) => popup.focus(),
            None => log::debug!("Popup for {} was blocked", self.platform),
        }
    }

    fn complete(&self) {
        if let Some(analytics) = &self.services.analytics {
            analytics.record(&ShareEvent::new(&self.platform, &self.url, self.open_method));
        }
        log::info!("Shared on {} via {}: {}", self.platform, self.open_method, self.url);

        if let Some(callback) = &self.on_share {
            callback.call(&self.platform, self.open_method);
        }
    }
}

/// Copy `url`, falling back to the synchronous copy when the async write
/// fails, and tell the user how it went.
pub async fn copy_link(clipboard: Rc<dyn ClipboardService>, notifier: Rc<dyn Notifier>, url: String) {
    let result = match clipboard.write_text(&url).await {
        Ok(()) => Ok(()),
        Err(e) => {
            log::debug!("Async clipboard write failed ({}), using fallback copy", e);
            clipboard.fallback_copy(&url)
        }
    };

    match result {
        Ok(()) => notifier.show(COPY_SUCCESS_MESSAGE, NOTIFICATION_DURATION),
        Err(e) => {
            log::warn!("Could not copy link: {}", e);
            notifier.show(COPY_FAILURE_MESSAGE, NOTIFICATION_DURATION);
        }
    }
}
