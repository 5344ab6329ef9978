//! DOM-backed page access and mounting.

use std::cell::RefCell;
use std::rc::Rc;

use sharekit_core::classes::{BUTTON_CLASS, TEXT_CLASS};
use sharekit_core::view::PLATFORM_ATTRIBUTE;
use sharekit_core::{ButtonView, ClickOutcome, Document, PageMetadata, RenderTarget, WidgetView};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlAnchorElement};

/// Routes a click on a platform's button back to the owning widget.
pub type ClickRouter = Rc<dyn Fn(&str) -> Option<ClickOutcome>>;

/// Slot filled with the router once the widget exists.
pub type RouterSlot = Rc<RefCell<Option<ClickRouter>>>;

/// The browser page.
pub struct WebDocument {
    window: web_sys::Window,
    document: web_sys::Document,
    router: RouterSlot,
}

impl WebDocument {
    pub fn new(window: web_sys::Window, document: web_sys::Document, router: RouterSlot) -> Self {
        Self {
            window,
            document,
            router,
        }
    }

    fn meta_description(&self) -> Option<String> {
        self.document
            .query_selector("meta[name=\"description\"]")
            .ok()
            .flatten()
            .and_then(|meta| meta.get_attribute("content"))
    }
}

impl Document for WebDocument {
    fn page_metadata(&self) -> PageMetadata {
        PageMetadata {
            title: self.document.title(),
            url: self.window.location().href().unwrap_or_default(),
            description: self.meta_description().unwrap_or_default(),
        }
    }

    fn find_target(&self, selector: &str) -> Option<Box<dyn RenderTarget>> {
        match self.document.query_selector(selector) {
            Ok(Some(element)) => match ElementTarget::new(self.document.clone(), element, Rc::clone(&self.router)) {
                Ok(target) => Some(Box::new(target)),
                Err(e) => {
                    log::error!("Failed to attach to {:?}: {:?}", selector, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::error!("Invalid selector {:?}: {:?}", selector, e);
                None
            }
        }
    }
}

/// An element the widget renders into.
///
/// Clicks are handled by one delegated listener on the element, so
/// re-rendering never drops a listener that may be running.
struct ElementTarget {
    document: web_sys::Document,
    element: Element,
    on_click: Closure<dyn FnMut(Event)>,
}

impl ElementTarget {
    fn new(document: web_sys::Document, element: Element, router: RouterSlot) -> Result<Self, JsValue> {
        let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(platform) = clicked_platform(&event) else {
                return;
            };
            let Some(route) = router.borrow().clone() else {
                return;
            };
            if let Some(outcome) = route(platform.as_str()) {
                if outcome.prevent_default {
                    event.prevent_default();
                }
            }
        });
        element.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;

        Ok(Self {
            document,
            element,
            on_click,
        })
    }

    fn create(&self, tag: &str, class: &str) -> Result<Element, JsValue> {
        let element = self.document.create_element(tag)?;
        element.set_class_name(class);
        Ok(element)
    }

    fn try_mount(&self, view: &WidgetView) -> Result<(), JsValue> {
        let root = self.create("div", &view.root_class)?;
        let buttons = self.create("div", &view.buttons_class)?;

        for button in &view.buttons {
            buttons.append_child(&self.create_button(button)?)?;
        }

        root.append_child(&buttons)?;
        self.element.append_child(&root)?;
        Ok(())
    }

    fn create_button(&self, button: &ButtonView) -> Result<HtmlAnchorElement, JsValue> {
        let anchor = self
            .create("a", &button.class)?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(JsValue::from)?;
        anchor.set_href(&button.href);
        anchor.set_attribute(PLATFORM_ATTRIBUTE, &button.platform)?;
        if let Some(target) = button.target {
            anchor.set_target(target);
        }
        if let Some(rel) = button.rel {
            anchor.set_rel(rel);
        }
        anchor.style().set_property("--share-color", &button.color)?;

        let icon = self.create("i", &button.icon_class)?;
        let text = self.create("span", TEXT_CLASS)?;
        text.set_text_content(Some(&button.label));
        anchor.append_child(&icon)?;
        anchor.append_child(&text)?;

        Ok(anchor)
    }
}

/// Platform key of the share button an event originated in.
fn clicked_platform(event: &Event) -> Option<String> {
    let origin = event.target()?.dyn_into::<Element>().ok()?;
    let button = origin.closest(&format!("a.{BUTTON_CLASS}")).ok()??;
    button.get_attribute(PLATFORM_ATTRIBUTE)
}

impl RenderTarget for ElementTarget {
    fn mount(&self, view: &WidgetView) {
        if let Err(e) = self.try_mount(view) {
            log::error!("Failed to render share buttons: {:?}", e);
        }
    }

    fn clear(&self) {
        self.element.set_inner_html("");
    }
}

impl Drop for ElementTarget {
    fn drop(&mut self) {
        let _ = self
            .element
            .remove_event_listener_with_callback("click", self.on_click.as_ref().unchecked_ref());
    }
}
