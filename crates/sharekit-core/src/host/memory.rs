//! In-memory host implementations.
//!
//! Used by the tests and by the static renderer. Every service records
//! what the widget asked of it.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::task::{Context, Waker};
use std::time::Duration;

use super::{
    AnalyticsSink, BoxFuture, ClipboardError, ClipboardService, Document, HostServices, Notifier,
    PopupWindow, RenderTarget, ShareEvent, Spawner, WindowService,
};
use crate::config::PageMetadata;
use crate::notify::{NotificationSurface, TimerId, Timers};
use crate::popup::Viewport;
use crate::view::WidgetView;

/// Drive a future that never waits on an external wakeup to completion.
#[cfg(test)]
pub(crate) fn block_on<F: std::future::Future>(f: F) -> F::Output {
    use std::task::Poll;

    let mut cx = Context::from_waker(Waker::noop());
    let mut f = std::pin::pin!(f);
    loop {
        if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
            return result;
        }
    }
}

/// Page with a fixed set of resolvable selectors.
#[derive(Default)]
pub struct MemoryDocument {
    page: PageMetadata,
    targets: HashMap<String, MemoryTarget>,
}

impl MemoryDocument {
    pub fn new(page: PageMetadata) -> Self {
        Self {
            page,
            targets: HashMap::new(),
        }
    }

    /// Make `selector` resolvable and return its target.
    pub fn add_target(&mut self, selector: &str) -> MemoryTarget {
        self.targets.entry(selector.to_string()).or_default().clone()
    }
}

impl Document for MemoryDocument {
    fn page_metadata(&self) -> PageMetadata {
        self.page.clone()
    }

    fn find_target(&self, selector: &str) -> Option<Box<dyn RenderTarget>> {
        self.targets
            .get(selector)
            .map(|t| Box::new(t.clone()) as Box<dyn RenderTarget>)
    }
}

#[derive(Default)]
struct TargetState {
    children: Vec<WidgetView>,
    mounts: usize,
    clears: usize,
}

/// Mount point that keeps the mounted views.
#[derive(Clone, Default)]
pub struct MemoryTarget {
    state: Rc<RefCell<TargetState>>,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently mounted view still attached.
    pub fn current(&self) -> Option<WidgetView> {
        self.state.borrow().children.last().cloned()
    }

    /// Number of views currently attached.
    pub fn child_count(&self) -> usize {
        self.state.borrow().children.len()
    }

    /// Buttons currently attached across all views.
    pub fn button_count(&self) -> usize {
        self.state.borrow().children.iter().map(|v| v.buttons.len()).sum()
    }

    pub fn mount_count(&self) -> usize {
        self.state.borrow().mounts
    }

    pub fn clear_count(&self) -> usize {
        self.state.borrow().clears
    }

    pub fn html(&self) -> String {
        self.state.borrow().children.iter().map(WidgetView::to_html).collect()
    }
}

impl RenderTarget for MemoryTarget {
    fn mount(&self, view: &WidgetView) {
        let mut state = self.state.borrow_mut();
        state.children.push(view.clone());
        state.mounts += 1;
    }

    fn clear(&self) {
        let mut state = self.state.borrow_mut();
        state.children.clear();
        state.clears += 1;
    }
}

/// A `window.open` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedWindow {
    pub url: String,
    pub name: String,
    pub features: String,
}

#[derive(Default)]
struct WindowState {
    opened: Vec<OpenedWindow>,
    focused: usize,
    prints: usize,
}

/// Window service that records popups and prints.
#[derive(Clone, Default)]
pub struct RecordingWindow {
    viewport: Viewport,
    block_popups: Rc<Cell<bool>>,
    state: Rc<RefCell<WindowState>>,
}

struct RecordingPopup {
    state: Rc<RefCell<WindowState>>,
}

impl PopupWindow for RecordingPopup {
    fn focus(&self) {
        self.state.borrow_mut().focused += 1;
    }
}

impl RecordingWindow {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Default::default()
        }
    }

    /// Make `open` return no handle, as a popup blocker would.
    pub fn set_block_popups(&self, block: bool) {
        self.block_popups.set(block);
    }

    pub fn opened(&self) -> Vec<OpenedWindow> {
        self.state.borrow().opened.clone()
    }

    pub fn focus_count(&self) -> usize {
        self.state.borrow().focused
    }

    pub fn print_count(&self) -> usize {
        self.state.borrow().prints
    }
}

impl WindowService for RecordingWindow {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn open(&self, url: &str, name: &str, features: &str) -> Option<Box<dyn PopupWindow>> {
        self.state.borrow_mut().opened.push(OpenedWindow {
            url: url.to_string(),
            name: name.to_string(),
            features: features.to_string(),
        });
        if self.block_popups.get() {
            return None;
        }
        Some(Box::new(RecordingPopup {
            state: Rc::clone(&self.state),
        }))
    }

    fn print(&self) {
        self.state.borrow_mut().prints += 1;
    }
}

/// How the in-memory clipboard responds to writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipboardMode {
    /// The async write succeeds.
    #[default]
    Available,
    /// The async write is rejected; the fallback works.
    Rejecting,
    /// No async clipboard; the fallback works.
    Missing,
    /// Nothing works.
    Broken,
}

#[derive(Default)]
struct ClipboardState {
    mode: ClipboardMode,
    contents: Option<String>,
    async_writes: usize,
    fallback_copies: usize,
}

/// Clipboard with a switchable failure mode.
#[derive(Clone, Default)]
pub struct MemoryClipboard {
    state: Rc<RefCell<ClipboardState>>,
}

impl MemoryClipboard {
    pub fn new(mode: ClipboardMode) -> Self {
        let clipboard = Self::default();
        clipboard.set_mode(mode);
        clipboard
    }

    pub fn set_mode(&self, mode: ClipboardMode) {
        self.state.borrow_mut().mode = mode;
    }

    pub fn contents(&self) -> Option<String> {
        self.state.borrow().contents.clone()
    }

    pub fn async_writes(&self) -> usize {
        self.state.borrow().async_writes
    }

    pub fn fallback_copies(&self) -> usize {
        self.state.borrow().fallback_copies
    }
}

impl ClipboardService for MemoryClipboard {
    fn write_text(&self, text: &str) -> BoxFuture<'static, Result<(), ClipboardError>> {
        let state = Rc::clone(&self.state);
        let text = text.to_string();
        Box::pin(async move {
            let mut guard = state.borrow_mut();
            guard.async_writes += 1;
            match guard.mode {
                ClipboardMode::Available => {
                    guard.contents = Some(text);
                    Ok(())
                }
                ClipboardMode::Rejecting | ClipboardMode::Broken => {
                    Err(ClipboardError::Rejected("permission denied".to_string()))
                }
                ClipboardMode::Missing => Err(ClipboardError::Unavailable),
            }
        })
    }

    fn fallback_copy(&self, text: &str) -> Result<(), ClipboardError> {
        let mut state = self.state.borrow_mut();
        state.fallback_copies += 1;
        if state.mode == ClipboardMode::Broken {
            return Err(ClipboardError::FallbackFailed("copy command failed".to_string()));
        }
        state.contents = Some(text.to_string());
        Ok(())
    }
}

/// Notifier that records every message.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    shown: Rc<RefCell<Vec<(String, Duration)>>>,
    removed: Rc<Cell<usize>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.shown.borrow().iter().map(|(m, _)| m.clone()).collect()
    }

    pub fn shown(&self) -> Vec<(String, Duration)> {
        self.shown.borrow().clone()
    }

    pub fn remove_count(&self) -> usize {
        self.removed.get()
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, message: &str, duration: Duration) {
        self.shown.borrow_mut().push((message.to_string(), duration));
    }

    fn remove(&self) {
        self.removed.set(self.removed.get() + 1);
    }
}

/// Analytics sink that keeps every event.
#[derive(Clone, Default)]
pub struct RecordingAnalytics {
    events: Rc<RefCell<Vec<ShareEvent>>>,
}

impl RecordingAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ShareEvent> {
        self.events.borrow().clone()
    }
}

impl AnalyticsSink for RecordingAnalytics {
    fn record(&self, event: &ShareEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Spawner that queues tasks until [`QueueSpawner::run_all`].
#[derive(Clone, Default)]
pub struct QueueSpawner {
    queue: Rc<RefCell<Vec<BoxFuture<'static, ()>>>>,
}

impl QueueSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Poll queued tasks in spawn order, including tasks they spawn.
    ///
    /// Tasks still pending after their poll stay queued.
    pub fn run_all(&self) {
        let mut cx = Context::from_waker(Waker::noop());
        let mut stalled = Vec::new();
        loop {
            let tasks = std::mem::take(&mut *self.queue.borrow_mut());
            if tasks.is_empty() {
                break;
            }
            for mut task in tasks {
                if task.as_mut().poll(&mut cx).is_pending() {
                    stalled.push(task);
                }
            }
        }
        self.queue.borrow_mut().extend(stalled);
    }
}

impl Spawner for QueueSpawner {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        self.queue.borrow_mut().push(task);
    }
}

struct ScheduledTimer {
    id: TimerId,
    delay: Duration,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct TimerState {
    next_id: i32,
    scheduled: Vec<ScheduledTimer>,
    cancelled: Vec<TimerId>,
}

/// Timers that only fire when told to.
#[derive(Clone, Default)]
pub struct ManualTimers {
    state: Rc<RefCell<TimerState>>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays of the timers not yet fired or cancelled.
    pub fn pending_delays(&self) -> Vec<Duration> {
        self.state.borrow().scheduled.iter().map(|t| t.delay).collect()
    }

    pub fn cancelled(&self) -> Vec<TimerId> {
        self.state.borrow().cancelled.clone()
    }

    /// Fire every pending timer in scheduling order.
    pub fn fire_all(&self) {
        let timers = std::mem::take(&mut self.state.borrow_mut().scheduled);
        for timer in timers {
            (timer.callback)();
        }
    }
}

impl Timers for ManualTimers {
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = TimerId(state.next_id);
        state.scheduled.push(ScheduledTimer { id, delay, callback });
        id
    }

    fn cancel(&self, id: TimerId) {
        let mut state = self.state.borrow_mut();
        state.scheduled.retain(|t| t.id != id);
        state.cancelled.push(id);
    }
}

#[derive(Default)]
struct SurfaceState {
    text: String,
    visible: bool,
}

/// Notification element held in memory.
#[derive(Default)]
pub struct MemorySurface {
    element: RefCell<Option<SurfaceState>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists(&self) -> bool {
        self.element.borrow().is_some()
    }

    /// Text of the element while it is visible.
    pub fn visible_message(&self) -> Option<String> {
        self.element
            .borrow()
            .as_ref()
            .filter(|e| e.visible)
            .map(|e| e.text.clone())
    }
}

impl NotificationSurface for MemorySurface {
    fn display(&self, message: &str) {
        let mut element = self.element.borrow_mut();
        let element = element.get_or_insert_with(SurfaceState::default);
        element.text = message.to_string();
        element.visible = true;
    }

    fn hide(&self) {
        if let Some(element) = self.element.borrow_mut().as_mut() {
            element.visible = false;
        }
    }

    fn remove(&self) {
        self.element.borrow_mut().take();
    }
}

/// A complete in-memory host.
#[derive(Clone, Default)]
pub struct MemoryHost {
    pub window: RecordingWindow,
    pub clipboard: MemoryClipboard,
    pub notifier: RecordingNotifier,
    pub analytics: RecordingAnalytics,
    pub spawner: QueueSpawner,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            window: RecordingWindow::new(Viewport {
                screen_left: 0.0,
                screen_top: 0.0,
                width: 1280.0,
                height: 720.0,
            }),
            ..Default::default()
        }
    }

    /// Services backed by this host, with analytics attached.
    pub fn services(&self) -> HostServices {
        HostServices {
            window: Rc::new(self.window.clone()),
            clipboard: Rc::new(self.clipboard.clone()),
            notifier: Rc::new(self.notifier.clone()),
            analytics: Some(Rc::new(self.analytics.clone())),
            spawner: Rc::new(self.spawner.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clipboard_modes() {
        let clipboard = MemoryClipboard::new(ClipboardMode::Rejecting);
        assert!(block_on(clipboard.write_text("a")).is_err());
        assert!(clipboard.fallback_copy("a").is_ok());
        assert_eq!(clipboard.contents(), Some("a".to_string()));

        clipboard.set_mode(ClipboardMode::Broken);
        assert!(matches!(
            clipboard.fallback_copy("b"),
            Err(ClipboardError::FallbackFailed(_))
        ));
    }

    #[test]
    fn test_queue_spawner_runs_in_order() {
        let spawner = QueueSpawner::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let log = Rc::clone(&log);
            spawner.spawn(Box::pin(async move { log.borrow_mut().push(i) }));
        }
        assert_eq!(spawner.pending(), 3);
        spawner.run_all();
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
        assert_eq!(spawner.pending(), 0);
    }

    #[test]
    fn test_queue_spawner_keeps_stalled_tasks() {
        let spawner = QueueSpawner::new();
        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        spawner.spawn(Box::pin(std::future::pending::<()>()));
        spawner.spawn(Box::pin(async move { flag.set(true) }));

        spawner.run_all();
        assert!(ran.get());
        assert_eq!(spawner.pending(), 1);
    }

    #[test]
    fn test_document_resolves_registered_targets_only() {
        let mut document = MemoryDocument::new(PageMetadata::default());
        let target = document.add_target("#share");
        assert!(document.find_target("#missing").is_none());

        document.find_target("#share").unwrap().mount(&WidgetView::default());
        assert_eq!(target.mount_count(), 1);
        assert_eq!(target.child_count(), 1);
    }
}
