//! Browser implementations of the host services.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use sharekit_core::host::BoxFuture;
use sharekit_core::notify::{NOTIFICATION_CLASS, NOTIFICATION_ID, NOTIFICATION_VISIBLE_CLASS};
use sharekit_core::{
    AnalyticsSink, ClipboardError, ClipboardService, HostServices, NotificationSurface, PopupWindow,
    ShareEvent, Spawner, TimerId, Timers, TransientNotifier, Viewport, WindowService,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, HtmlDocument, HtmlElement, HtmlTextAreaElement, Window};

use crate::timer_slots::TimerSlots;

/// Services backed by the given browser window.
pub fn browser_services(window: &Window, document: &web_sys::Document) -> HostServices {
    let notifier = TransientNotifier::new(
        DomNotificationSurface::new(document.clone()),
        BrowserTimers::new(window.clone()),
    );

    HostServices {
        window: Rc::new(BrowserWindow::new(window.clone())),
        clipboard: Rc::new(BrowserClipboard::new(window.clone(), document.clone())),
        notifier: Rc::new(notifier),
        analytics: Some(Rc::new(GtagAnalytics)),
        spawner: Rc::new(LocalSpawner),
    }
}

/// Read a numeric window property, treating zero and absence alike.
fn number_property(target: &JsValue, name: &str) -> Option<f64> {
    js_sys::Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|v| v.as_f64())
        .filter(|v| *v != 0.0)
}

pub struct BrowserWindow {
    window: Window,
}

impl BrowserWindow {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn client_size(&self) -> Option<(f64, f64)> {
        let root = self.window.document()?.document_element()?;
        Some((f64::from(root.client_width()), f64::from(root.client_height())))
    }

    fn screen_size(&self) -> Option<(f64, f64)> {
        let screen = self.window.screen().ok()?;
        Some((f64::from(screen.width().ok()?), f64::from(screen.height().ok()?)))
    }
}

impl WindowService for BrowserWindow {
    fn viewport(&self) -> Viewport {
        let window: &JsValue = self.window.as_ref();
        let screen_left = number_property(window, "screenLeft")
            .or_else(|| number_property(window, "screenX"))
            .unwrap_or_default();
        let screen_top = number_property(window, "screenTop")
            .or_else(|| number_property(window, "screenY"))
            .unwrap_or_default();

        let inner = (
            self.window.inner_width().ok().and_then(|v| v.as_f64()).filter(|v| *v > 0.0),
            self.window.inner_height().ok().and_then(|v| v.as_f64()).filter(|v| *v > 0.0),
        );
        let client = self.client_size().unwrap_or_default();
        let screen = self.screen_size().unwrap_or_default();
        let pick = |inner: Option<f64>, client: f64, screen: f64| {
            inner.or(Some(client).filter(|v| *v > 0.0)).unwrap_or(screen)
        };

        Viewport {
            screen_left,
            screen_top,
            width: pick(inner.0, client.0, screen.0),
            height: pick(inner.1, client.1, screen.1),
        }
    }

    fn open(&self, url: &str, name: &str, features: &str) -> Option<Box<dyn PopupWindow>> {
        match self.window.open_with_url_and_target_and_features(url, name, features) {
            Ok(Some(popup)) => Some(Box::new(BrowserPopup(popup))),
            Ok(None) => None,
            Err(e) => {
                log::debug!("window.open failed: {:?}", e);
                None
            }
        }
    }

    fn print(&self) {
        if let Err(e) = self.window.print() {
            log::error!("Print failed: {:?}", e);
        }
    }
}

struct BrowserPopup(Window);

impl PopupWindow for BrowserPopup {
    fn focus(&self) {
        let _ = self.0.focus();
    }
}

pub struct BrowserClipboard {
    window: Window,
    document: web_sys::Document,
}

impl BrowserClipboard {
    pub fn new(window: Window, document: web_sys::Document) -> Self {
        Self { window, document }
    }

    fn has_async_clipboard(&self) -> bool {
        let navigator: JsValue = self.window.navigator().into();
        js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard"))
            .map(|c| !c.is_undefined() && !c.is_null())
            .unwrap_or(false)
    }

    fn copy_with_selection(&self, text: &str) -> Result<(), JsValue> {
        let body = self
            .document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        let area = self
            .document
            .create_element("textarea")?
            .dyn_into::<HtmlTextAreaElement>()
            .map_err(JsValue::from)?;
        area.set_value(text);
        let style = area.style();
        style.set_property("top", "0")?;
        style.set_property("left", "0")?;
        style.set_property("position", "fixed")?;
        style.set_property("opacity", "0")?;

        body.append_child(&area)?;
        let _ = area.focus();
        area.select();

        let copied = self
            .document
            .dyn_ref::<HtmlDocument>()
            .ok_or_else(|| JsValue::from_str("not an HTML document"))
            .and_then(|doc| doc.exec_command("copy"));
        area.remove();
        copied.map(|_| ())
    }
}

impl ClipboardService for BrowserClipboard {
    fn write_text(&self, text: &str) -> BoxFuture<'static, Result<(), ClipboardError>> {
        if !self.has_async_clipboard() {
            return Box::pin(async { Err(ClipboardError::Unavailable) });
        }
        let promise = self.window.navigator().clipboard().write_text(text);
        Box::pin(async move {
            JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|e| ClipboardError::Rejected(format!("{:?}", e)))
        })
    }

    fn fallback_copy(&self, text: &str) -> Result<(), ClipboardError> {
        self.copy_with_selection(text)
            .map_err(|e| ClipboardError::FallbackFailed(format!("{:?}", e)))
    }
}

/// Reports shares to a global `gtag` function when the page defines one.
pub struct GtagAnalytics;

impl AnalyticsSink for GtagAnalytics {
    fn record(&self, event: &ShareEvent) {
        let gtag = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("gtag"))
            .ok()
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok());
        let Some(gtag) = gtag else {
            return;
        };

        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let params = match event.serialize(&serializer) {
            Ok(params) => params,
            Err(e) => {
                log::warn!("Failed to encode share event: {}", e);
                return;
            }
        };
        if let Err(e) = gtag.call3(
            &JsValue::NULL,
            &JsValue::from_str("event"),
            &JsValue::from_str("share"),
            &params,
        ) {
            log::warn!("gtag call failed: {:?}", e);
        }
    }
}

/// Runs tasks on the browser microtask queue.
pub struct LocalSpawner;

impl Spawner for LocalSpawner {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

/// `setTimeout`-based timers.
///
/// Each timer's closure is owned here until it fires or is cancelled.
pub struct BrowserTimers {
    window: Window,
    slots: TimerSlots<Closure<dyn FnMut()>>,
}

impl BrowserTimers {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            slots: TimerSlots::new(),
        }
    }
}

impl Timers for BrowserTimers {
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        self.slots.sweep();

        let handle = Rc::new(Cell::new(0));
        let mut callback = Some(callback);
        let closure = {
            let handle = Rc::clone(&handle);
            let marker = self.slots.marker();
            Closure::<dyn FnMut()>::new(move || {
                if let Some(callback) = callback.take() {
                    callback();
                }
                marker.mark(handle.get());
            })
        };

        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(closure.as_ref().unchecked_ref(), millis)
        {
            Ok(id) => {
                handle.set(id);
                self.slots.insert(id, closure);
                TimerId(id)
            }
            Err(e) => {
                log::error!("setTimeout failed: {:?}", e);
                TimerId(0)
            }
        }
    }

    fn cancel(&self, id: TimerId) {
        self.window.clear_timeout_with_handle(id.0);
        self.slots.cancel(id.0);
    }
}

/// The shared `#share-notification` element, created on first use.
pub struct DomNotificationSurface {
    document: web_sys::Document,
}

impl DomNotificationSurface {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    fn existing(&self) -> Option<Element> {
        self.document.get_element_by_id(NOTIFICATION_ID)
    }

    fn element(&self) -> Result<Element, JsValue> {
        if let Some(element) = self.existing() {
            return Ok(element);
        }
        let element = self.document.create_element("div")?;
        element.set_id(NOTIFICATION_ID);
        element.set_class_name(NOTIFICATION_CLASS);
        let body: HtmlElement = self
            .document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        body.append_child(&element)?;
        Ok(element)
    }
}

impl NotificationSurface for DomNotificationSurface {
    fn display(&self, message: &str) {
        match self.element() {
            Ok(element) => {
                element.set_text_content(Some(message));
                let _ = element.class_list().add_1(NOTIFICATION_VISIBLE_CLASS);
            }
            Err(e) => log::error!("Failed to show notification: {:?}", e),
        }
    }

    fn hide(&self) {
        if let Some(element) = self.existing() {
            let _ = element.class_list().remove_1(NOTIFICATION_VISIBLE_CLASS);
        }
    }

    fn remove(&self) {
        if let Some(element) = self.existing() {
            element.remove();
        }
    }
}
