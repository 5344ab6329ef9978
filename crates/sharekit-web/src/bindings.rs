//! JavaScript-facing widget class and module start hook.

use std::cell::RefCell;
use std::rc::Rc;

use sharekit_core::ShareWidget;
use wasm_bindgen::prelude::*;

use crate::dom::{ClickRouter, RouterSlot, WebDocument};
use crate::options::{parse_descriptor, parse_overrides, parse_popup_patch};
use crate::services::browser_services;
use crate::shared::SharedWidget;

/// Initialize panic reporting and logging when the module loads.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&JsValue::from_str(&format!("Failed to initialize logger: {e}")));
    }
}

/// A row of share buttons rendered into a page element.
#[wasm_bindgen(js_name = ShareWidget)]
pub struct JsShareWidget {
    inner: SharedWidget,
}

#[wasm_bindgen(js_class = ShareWidget)]
impl JsShareWidget {
    /// Render into the first element matching `selector`.
    ///
    /// A selector that matches nothing is logged and produces an inert
    /// widget. Throws only when there is no browser document.
    #[wasm_bindgen(constructor)]
    pub fn new(selector: &str, options: JsValue) -> Result<JsShareWidget, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document available"))?;

        let router: RouterSlot = Rc::new(RefCell::new(None));
        let page = WebDocument::new(window.clone(), document.clone(), Rc::clone(&router));
        let services = browser_services(&window, &document);

        let widget = ShareWidget::new(selector, parse_overrides(&options), &page, services);
        let inner = SharedWidget::new(widget);

        let weak = inner.downgrade();
        let route: ClickRouter = Rc::new(move |platform: &str| {
            let dispatch = weak.upgrade()?.read(|w| w.prepare_click(platform))??;
            Some(dispatch.run())
        });
        *router.borrow_mut() = Some(route);

        Ok(JsShareWidget { inner })
    }

    fn with_widget(&self, f: impl FnOnce(&mut ShareWidget)) {
        self.inner.update(f);
    }

    #[wasm_bindgen(js_name = updateConfig)]
    pub fn update_config(&self, options: JsValue) {
        let overrides = parse_overrides(&options);
        self.with_widget(|w| w.update_config(overrides));
    }

    #[wasm_bindgen(js_name = setOpenMethod)]
    pub fn set_open_method(&self, method: &str) {
        self.with_widget(|w| w.set_open_method(method));
    }

    #[wasm_bindgen(js_name = setIconLibrary)]
    pub fn set_icon_library(&self, library: &str) {
        self.with_widget(|w| w.set_icon_library(library));
    }

    #[wasm_bindgen(js_name = updatePopupSettings)]
    pub fn update_popup_settings(&self, settings: JsValue) {
        match parse_popup_patch(&settings) {
            Ok(patch) => self.with_widget(|w| w.update_popup_settings(patch)),
            Err(e) => log::error!("Ignoring popup settings: {}", e),
        }
    }

    #[wasm_bindgen(js_name = addPlatform)]
    pub fn add_platform(&self, key: &str, descriptor: JsValue) {
        match parse_descriptor(&descriptor) {
            Ok(descriptor) => self.with_widget(|w| w.add_platform(key, descriptor)),
            Err(e) => log::error!("Ignoring platform {:?}: {}", key, e),
        }
    }

    #[wasm_bindgen(js_name = removePlatform)]
    pub fn remove_platform(&self, key: &str) {
        self.with_widget(|w| w.remove_platform(key));
    }

    pub fn destroy(&self) {
        self.with_widget(ShareWidget::destroy);
    }

    fn read<T>(&self, f: impl FnOnce(&ShareWidget) -> T) -> Option<T> {
        self.inner.read(f)
    }

    #[wasm_bindgen(getter)]
    pub fn url(&self) -> Option<String> {
        self.read(|w| w.config().url.clone())
    }

    #[wasm_bindgen(getter)]
    pub fn title(&self) -> Option<String> {
        self.read(|w| w.config().title.clone())
    }

    #[wasm_bindgen(getter, js_name = openMethod)]
    pub fn open_method(&self) -> Option<String> {
        self.read(|w| w.config().open_method.as_str().to_string())
    }

    #[wasm_bindgen(getter, js_name = iconLibrary)]
    pub fn icon_library(&self) -> Option<String> {
        self.read(|w| w.config().icon_library.as_str().to_string())
    }

    /// Enabled platform keys in display order.
    #[wasm_bindgen(getter)]
    pub fn platforms(&self) -> js_sys::Array {
        self.read(|w| {
            w.config()
                .platforms
                .iter()
                .map(|key| JsValue::from_str(key))
                .collect()
        })
        .unwrap_or_else(js_sys::Array::new)
    }

    #[wasm_bindgen(getter, js_name = isInert)]
    pub fn is_inert(&self) -> Option<bool> {
        self.read(ShareWidget::is_inert)
    }
}
