//! The share widget: configuration, registry, and the rendered buttons.
//!
//! A widget owns its target element exclusively. Every mutation that can
//! change the buttons clears the target and mounts a freshly built view;
//! there is no incremental patching.

mod dispatch;

pub use dispatch::{copy_link, ClickOutcome, ShareDispatch};

use thiserror::Error;

use crate::classes::{button_class, buttons_class, root_class};
use crate::config::{
    ConfigOverrides, IconLibrary, OpenMethod, PopupSettingsPatch, ShareConfig,
};
use crate::host::{Document, HostServices, RenderTarget};
use crate::icons::resolve_icon_class;
use crate::platform::{PlatformDescriptor, PlatformRegistry, ShareBehavior};
use crate::view::{
    ButtonView, ClickBehavior, WidgetView, ACTION_HREF, NEW_TAB_REL, NEW_TAB_TARGET,
};

/// Widget errors. Reported through the log, never returned to callers.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("Element with selector {0:?} not found")]
    TargetNotFound(String),
}

/// A row of share buttons bound to one host element.
pub struct ShareWidget {
    selector: String,
    /// `None` when the selector did not resolve; the widget is then inert.
    target: Option<Box<dyn RenderTarget>>,
    config: ShareConfig,
    registry: PlatformRegistry,
    services: HostServices,
    view: WidgetView,
}

impl ShareWidget {
    /// Create a widget on the element matching `selector` and render it.
    ///
    /// If nothing matches, the failure is logged and the returned widget
    /// ignores every later operation.
    pub fn new(
        selector: &str,
        overrides: ConfigOverrides,
        document: &dyn Document,
        services: HostServices,
    ) -> Self {
        let target = document.find_target(selector);
        if target.is_none() {
            log::error!("{}", WidgetError::TargetNotFound(selector.to_string()));
        }

        let mut config = ShareConfig::defaults(&document.page_metadata());
        config.apply(overrides);

        let mut registry = PlatformRegistry::builtin();
        registry.merge(config.custom_platforms.clone());

        let mut widget = Self {
            selector: selector.to_string(),
            target,
            config,
            registry,
            services,
            view: WidgetView::default(),
        };
        widget.render();
        widget
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Whether construction failed to find the target element.
    pub fn is_inert(&self) -> bool {
        self.target.is_none()
    }

    pub fn config(&self) -> &ShareConfig {
        &self.config
    }

    pub fn registry(&self) -> &PlatformRegistry {
        &self.registry
    }

    /// The most recently rendered view.
    pub fn view(&self) -> &WidgetView {
        &self.view
    }

    /// Build the view for the current configuration without mounting it.
    pub fn build_view(&self) -> WidgetView {
        let buttons = self
            .config
            .platforms
            .iter()
            .filter_map(|key| match self.registry.get(key) {
                Some(descriptor) => Some(self.build_button(key, descriptor)),
                None => {
                    log::debug!("Skipping unknown platform {:?}", key);
                    None
                }
            })
            .collect();

        WidgetView {
            root_class: root_class(self.config.theme, self.config.position),
            buttons_class: buttons_class(self.config.layout),
            buttons,
        }
    }

    fn build_button(&self, key: &str, descriptor: &PlatformDescriptor) -> ButtonView {
        let config = &self.config;
        let mut button = ButtonView {
            platform: key.to_string(),
            class: button_class(key, config.size, config.show_text),
            icon_class: resolve_icon_class(
                key,
                &descriptor.icons,
                config.icon_library,
                &config.custom_icons,
            ),
            label: descriptor.name.clone(),
            color: descriptor.color.clone(),
            href: ACTION_HREF.to_string(),
            target: None,
            rel: None,
            click: ClickBehavior::Navigate,
        };

        match &descriptor.behavior {
            ShareBehavior::Action(action) => button.click = ClickBehavior::Action(*action),
            ShareBehavior::Url(template) => {
                // Frozen here; every mutator that can change it re-renders.
                let share_url = template.render(&config.url, &config.title);
                button.href = share_url.clone();
                match config.open_method {
                    OpenMethod::Popup => button.click = ClickBehavior::Popup { share_url },
                    OpenMethod::NewTab => {
                        button.target = Some(NEW_TAB_TARGET);
                        button.rel = Some(NEW_TAB_REL);
                    }
                    OpenMethod::Same => {}
                }
            }
        }

        button
    }

    fn render(&mut self) {
        let Some(target) = &self.target else {
            return;
        };
        let view = self.build_view();
        target.mount(&view);
        self.view = view;
    }

    fn rerender(&mut self) {
        if let Some(target) = &self.target {
            target.clear();
        }
        self.render();
    }

    /// Snapshot the work for a click on `platform`'s button.
    ///
    /// `None` when the widget is inert or no such button is rendered.
    pub fn prepare_click(&self, platform: &str) -> Option<ShareDispatch> {
        if self.is_inert() {
            return None;
        }
        let button = self.view.button(platform)?;
        Some(ShareDispatch {
            platform: platform.to_string(),
            behavior: button.click.clone(),
            url: self.config.url.clone(),
            open_method: self.config.open_method,
            popup_settings: self.config.popup_settings,
            on_share: self.config.on_share.clone(),
            services: self.services.clone(),
        })
    }

    /// Handle a click on `platform`'s button.
    pub fn click(&self, platform: &str) -> Option<ClickOutcome> {
        self.prepare_click(platform).map(ShareDispatch::run)
    }

    /// Shallow-merge `overrides` into the configuration and re-render.
    pub fn update_config(&mut self, overrides: ConfigOverrides) {
        if self.is_inert() {
            return;
        }
        self.config.apply(overrides);
        self.rerender();
    }

    /// Set the open method from its string form. Invalid input is ignored.
    pub fn set_open_method(&mut self, method: &str) {
        if self.is_inert() {
            return;
        }
        match method.parse::<OpenMethod>() {
            Ok(method) => {
                self.config.open_method = method;
                self.rerender();
            }
            Err(e) => log::debug!("Ignoring open method: {}", e),
        }
    }

    /// Set the icon library from its string form. Invalid input is ignored.
    pub fn set_icon_library(&mut self, library: &str) {
        if self.is_inert() {
            return;
        }
        match library.parse::<IconLibrary>() {
            Ok(library) => {
                self.config.icon_library = library;
                self.rerender();
            }
            Err(e) => log::debug!("Ignoring icon library: {}", e),
        }
    }

    /// Merge popup settings. Read at click time, so no re-render.
    pub fn update_popup_settings(&mut self, patch: PopupSettingsPatch) {
        if self.is_inert() {
            return;
        }
        self.config.popup_settings.merge(patch);
    }

    /// Register `descriptor` under `key` and enable it if it is new.
    pub fn add_platform(&mut self, key: &str, descriptor: PlatformDescriptor) {
        if self.is_inert() {
            return;
        }
        self.registry.insert(key, descriptor);
        if !self.config.platforms.iter().any(|k| k == key) {
            self.config.platforms.push(key.to_string());
            self.rerender();
        }
    }

    /// Disable `key` if it is enabled.
    pub fn remove_platform(&mut self, key: &str) {
        if self.is_inert() {
            return;
        }
        if let Some(index) = self.config.platforms.iter().position(|k| k == key) {
            self.config.platforms.remove(index);
            self.rerender();
        }
    }

    /// Clear the rendered buttons and remove the notification element.
    pub fn destroy(&mut self) {
        let Some(target) = &self.target else {
            return;
        };
        target.clear();
        self.view = WidgetView::default();
        self.services.notifier.remove();
    }
}

impl std::fmt::Debug for ShareWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareWidget")
            .field("selector", &self.selector)
            .field("inert", &self.is_inert())
            .field("config", &self.config)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageMetadata;
    use crate::host::memory::{ClipboardMode, MemoryDocument, MemoryHost, MemoryTarget};
    use crate::notify::{COPY_FAILURE_MESSAGE, COPY_SUCCESS_MESSAGE};
    use crate::platform::{IconSet, ShareAction, UrlTemplate};
    use crate::view::ClickBehavior;
    use std::cell::RefCell;
    use std::rc::Rc;

    const PAGE_URL: &str = "https://example.com/post";

    fn document() -> (MemoryDocument, MemoryTarget) {
        let mut document = MemoryDocument::new(PageMetadata {
            title: "My Post".to_string(),
            url: PAGE_URL.to_string(),
            description: String::new(),
        });
        let target = document.add_target("#share");
        (document, target)
    }

    fn setup(overrides: ConfigOverrides) -> (ShareWidget, MemoryTarget, MemoryHost) {
        let (document, target) = document();
        let host = MemoryHost::new();
        let widget = ShareWidget::new("#share", overrides, &document, host.services());
        (widget, target, host)
    }

    fn mastodon() -> PlatformDescriptor {
        PlatformDescriptor::url(
            "Mastodon",
            IconSet {
                fontawesome: None,
                icomoon: Some("icon-mastodon".to_string()),
            },
            "#6364ff",
            UrlTemplate::pattern("https://mastodon.social/share?text={title}%20{url}"),
        )
    }

    #[test]
    fn test_default_render() {
        let (widget, target, _host) = setup(ConfigOverrides::default());

        assert!(!widget.is_inert());
        assert_eq!(target.mount_count(), 1);
        assert_eq!(target.clear_count(), 0);

        let view = target.current().unwrap();
        assert_eq!(
            view.platforms(),
            vec!["facebook", "twitter", "linkedin", "whatsapp", "email", "copy"]
        );
        assert_eq!(view.root_class, "universal-share");
        assert_eq!(view.buttons_class, "share-buttons");
        assert_eq!(&view, widget.view());
    }

    #[test]
    fn test_button_count_matches_known_sequence() {
        let sequences: &[&[&str]] = &[
            &[],
            &["print"],
            &["sms", "tumblr", "reddit"],
            &["copy", "telegram", "pinterest", "email", "facebook"],
        ];
        for sequence in sequences {
            let (_widget, target, _host) = setup(ConfigOverrides::platforms(sequence.iter().copied()));
            let view = target.current().unwrap();
            assert_eq!(view.buttons.len(), sequence.len());
            assert_eq!(view.platforms(), sequence.to_vec());
        }
    }

    #[test]
    fn test_unknown_platforms_skipped() {
        let (widget, target, _host) = setup(ConfigOverrides::platforms(["facebook", "myspace", "copy"]));
        assert_eq!(target.current().unwrap().platforms(), vec!["facebook", "copy"]);
        assert_eq!(widget.config().platforms.len(), 3);
    }

    #[test]
    fn test_container_and_button_classes() {
        let overrides = ConfigOverrides::from_json(
            r#"{"theme": "dark", "position": "floating", "layout": "grid", "size": "small", "showText": false}"#,
        )
        .unwrap();
        let (widget, _target, _host) = setup(overrides);

        let view = widget.view();
        assert_eq!(view.root_class, "universal-share dark floating");
        assert_eq!(view.buttons_class, "share-buttons grid");
        assert_eq!(
            view.button("twitter").unwrap().class,
            "share-btn twitter small icon-only"
        );
        // The label is still present; hiding it is a styling concern.
        assert_eq!(view.button("twitter").unwrap().label, "Twitter");
    }

    #[test]
    fn test_missing_target_is_inert() {
        let (document, _target) = document();
        let host = MemoryHost::new();
        let mut widget = ShareWidget::new("#nope", ConfigOverrides::default(), &document, host.services());

        assert!(widget.is_inert());
        assert!(widget.view().buttons.is_empty());

        widget.update_config(ConfigOverrides::url("https://x"));
        widget.set_open_method("newtab");
        widget.add_platform("mastodon", mastodon());
        widget.remove_platform("copy");
        widget.destroy();

        assert_eq!(widget.config().url, PAGE_URL);
        assert_eq!(widget.config().open_method, OpenMethod::Popup);
        assert!(!widget.registry().contains("mastodon"));
        assert!(widget.click("facebook").is_none());
        assert_eq!(host.notifier.remove_count(), 0);
    }

    #[test]
    fn test_update_config_round_trip() {
        let (mut widget, target, _host) = setup(ConfigOverrides::default());
        widget.update_config(ConfigOverrides::url("https://x"));

        assert_eq!(widget.config().url, "https://x");
        assert_eq!(widget.config().title, "My Post");
        assert_eq!(widget.config().platforms.len(), 6);
        assert_eq!(target.clear_count(), 1);
        assert_eq!(target.child_count(), 1);
        assert_eq!(
            target.current().unwrap().button("facebook").unwrap().href,
            "https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fx"
        );
    }

    #[test]
    fn test_newtab_scenario() {
        let overrides = ConfigOverrides {
            open_method: Some(OpenMethod::NewTab),
            ..ConfigOverrides::platforms(["facebook", "copy"])
        };
        let (widget, target, host) = setup(overrides);
        let view = target.current().unwrap();

        let facebook = view.button("facebook").unwrap();
        assert_eq!(facebook.target, Some("_blank"));
        assert_eq!(facebook.rel, Some("noopener noreferrer"));
        assert_eq!(
            facebook.href,
            "https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fexample.com%2Fpost"
        );
        assert_eq!(facebook.click, ClickBehavior::Navigate);

        let copy = view.button("copy").unwrap();
        assert_eq!(copy.href, "#");
        assert_eq!(copy.target, None);
        assert_eq!(copy.click, ClickBehavior::Action(ShareAction::Copy));

        let outcome = widget.click("copy").unwrap();
        assert!(outcome.prevent_default);
        host.spawner.run_all();
        assert_eq!(host.clipboard.contents(), Some(PAGE_URL.to_string()));

        let outcome = widget.click("facebook").unwrap();
        assert!(!outcome.prevent_default);
        assert!(host.window.opened().is_empty());
    }

    #[test]
    fn test_invalid_open_method_is_noop() {
        let (mut widget, target, _host) = setup(ConfigOverrides::default());
        let buttons_before = target.button_count();
        let mounts_before = target.mount_count();

        widget.set_open_method("invalid");

        assert_eq!(widget.config().open_method, OpenMethod::Popup);
        assert_eq!(target.mount_count(), mounts_before);
        assert_eq!(target.button_count(), buttons_before);
    }

    #[test]
    fn test_set_open_method_rerenders() {
        let (mut widget, target, _host) = setup(ConfigOverrides::default());
        widget.set_open_method("same");

        assert_eq!(widget.config().open_method, OpenMethod::Same);
        assert_eq!(target.mount_count(), 2);
        let twitter = target.current().unwrap().button("twitter").cloned().unwrap();
        assert_eq!(twitter.click, ClickBehavior::Navigate);
        assert_eq!(twitter.target, None);
    }

    #[test]
    fn test_set_icon_library() {
        let (mut widget, target, _host) = setup(ConfigOverrides::default());

        widget.set_icon_library("icomoon");
        assert_eq!(target.current().unwrap().button("email").unwrap().icon_class, "icon-mail");

        widget.set_icon_library("both");
        assert_eq!(
            target.current().unwrap().button("email").unwrap().icon_class,
            "fas fa-envelope icon-mail"
        );

        let mounts = target.mount_count();
        widget.set_icon_library("material");
        assert_eq!(widget.config().icon_library, IconLibrary::Both);
        assert_eq!(target.mount_count(), mounts);
    }

    #[test]
    fn test_custom_icons_and_platforms_from_config() {
        let overrides = ConfigOverrides::from_json(
            r##"{
                "platforms": ["facebook", "mastodon"],
                "iconLibrary": "fontawesome",
                "customIcons": {"facebook": "my-facebook"},
                "customPlatforms": {
                    "mastodon": {"name": "Mastodon", "icons": {"icomoon": "icon-mastodon"}, "color": "#6364ff", "url": "https://mastodon.social/share?text={title}%20{url}"}
                }
            }"##,
        )
        .unwrap();
        let (widget, _target, _host) = setup(overrides);
        let view = widget.view();

        assert_eq!(view.button("facebook").unwrap().icon_class, "my-facebook");
        let mastodon = view.button("mastodon").unwrap();
        assert_eq!(mastodon.icon_class, "icon-mastodon");
        assert_eq!(
            mastodon.href,
            "https://mastodon.social/share?text=My%20Post%20https%3A%2F%2Fexample.com%2Fpost"
        );
    }

    #[test]
    fn test_add_platform_idempotent() {
        let (mut widget, target, _host) = setup(ConfigOverrides::default());

        widget.add_platform("mastodon", mastodon());
        assert_eq!(widget.config().platforms.len(), 7);
        assert_eq!(target.mount_count(), 2);

        widget.add_platform("mastodon", mastodon());
        assert_eq!(widget.config().platforms.len(), 7);
        assert_eq!(target.mount_count(), 2);
        assert_eq!(target.button_count(), 7);
    }

    #[test]
    fn test_add_existing_key_updates_descriptor_only() {
        let (mut widget, target, _host) = setup(ConfigOverrides::default());
        widget.add_platform(
            "facebook",
            PlatformDescriptor::action("Facebook Copy", IconSet::default(), "#000", ShareAction::Copy),
        );

        assert_eq!(widget.registry().get("facebook").unwrap().name, "Facebook Copy");
        assert_eq!(widget.config().platforms.len(), 6);
        // Not re-rendered, so the old button remains until the next render.
        assert_eq!(target.mount_count(), 1);
        assert_eq!(widget.view().button("facebook").unwrap().label, "Facebook");
    }

    #[test]
    fn test_remove_platform() {
        let (mut widget, target, _host) = setup(ConfigOverrides::default());
        let before = target.current().unwrap();

        widget.remove_platform("copy");
        let after = target.current().unwrap();
        assert_eq!(after.buttons.len(), before.buttons.len() - 1);
        assert!(after.button("copy").is_none());
        assert_eq!(
            after.platforms(),
            vec!["facebook", "twitter", "linkedin", "whatsapp", "email"]
        );

        let mounts = target.mount_count();
        widget.remove_platform("copy");
        assert_eq!(target.mount_count(), mounts);
    }

    #[test]
    fn test_popup_click() {
        let (widget, _target, host) = setup(ConfigOverrides::default());
        let outcome = widget.click("twitter").unwrap();

        assert!(outcome.prevent_default);
        let opened = host.window.opened();
        assert_eq!(opened.len(), 1);
        assert_eq!(
            opened[0].url,
            "https://twitter.com/intent/tweet?url=https%3A%2F%2Fexample.com%2Fpost&text=My%20Post"
        );
        assert_eq!(opened[0].name, "share_twitter");
        assert_eq!(
            opened[0].features,
            "width=600,height=400,top=160,left=340,scrollbars=1,resizable=1,toolbar=0,\
             location=0,directories=0,status=0,menubar=0,copyhistory=0"
        );
        assert_eq!(host.window.focus_count(), 1);
        assert_eq!(host.analytics.events().len(), 1);
    }

    #[test]
    fn test_blocked_popup_still_completes() {
        let (widget, _target, host) = setup(ConfigOverrides::default());
        host.window.set_block_popups(true);

        let outcome = widget.click("linkedin").unwrap();
        assert!(outcome.prevent_default);
        assert_eq!(host.window.opened().len(), 1);
        assert_eq!(host.window.focus_count(), 0);
        assert!(host.notifier.messages().is_empty());
        assert_eq!(host.analytics.events().len(), 1);
    }

    #[test]
    fn test_popup_settings_apply_without_rerender() {
        let (mut widget, target, host) = setup(ConfigOverrides::default());
        widget.update_popup_settings(PopupSettingsPatch {
            width: Some(800),
            toolbar: Some(true),
            ..Default::default()
        });

        assert_eq!(target.mount_count(), 1);
        assert_eq!(widget.config().popup_settings.height, 400);

        widget.click("facebook");
        let features = &host.window.opened()[0].features;
        assert!(features.starts_with("width=800,height=400,top=160,left=240,"));
        assert!(features.contains("toolbar=1"));
    }

    #[test]
    fn test_share_completion_runs_once_per_click() {
        let calls: Rc<RefCell<Vec<(String, OpenMethod)>>> = Rc::default();
        let recorded = Rc::clone(&calls);
        let overrides = ConfigOverrides {
            on_share: Some(crate::config::ShareCallback::new(move |key, method| {
                recorded.borrow_mut().push((key.to_string(), method));
            })),
            platforms: Some(vec!["facebook".into(), "copy".into(), "print".into()]),
            ..Default::default()
        };
        let (widget, _target, host) = setup(overrides);

        widget.click("facebook");
        widget.click("copy");
        widget.click("print");
        host.spawner.run_all();

        assert_eq!(
            *calls.borrow(),
            vec![
                ("facebook".to_string(), OpenMethod::Popup),
                ("copy".to_string(), OpenMethod::Popup),
                ("print".to_string(), OpenMethod::Popup),
            ]
        );
        let events = host.analytics.events();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.item_id == PAGE_URL));
        assert_eq!(host.window.print_count(), 1);
        assert_eq!(host.notifier.messages(), vec![COPY_SUCCESS_MESSAGE]);
    }

    #[test]
    fn test_copy_failure_is_only_a_notification() {
        let (widget, _target, host) = setup(ConfigOverrides::default());
        host.clipboard.set_mode(ClipboardMode::Broken);

        let outcome = widget.click("copy").unwrap();
        assert!(outcome.prevent_default);
        assert_eq!(host.spawner.pending(), 1);
        host.spawner.run_all();

        assert_eq!(host.notifier.messages(), vec![COPY_FAILURE_MESSAGE]);
        assert_eq!(host.analytics.events().len(), 1);
    }

    #[test]
    fn test_copy_uses_url_at_click_time() {
        let (mut widget, _target, host) = setup(ConfigOverrides::default());
        widget.update_config(ConfigOverrides::url("https://new.example"));
        widget.click("copy");
        host.spawner.run_all();
        assert_eq!(host.clipboard.contents(), Some("https://new.example".to_string()));
    }

    #[test]
    fn test_callback_may_reenter_widget() {
        let (document, target) = document();
        let host = MemoryHost::new();
        let widget = Rc::new(RefCell::new(ShareWidget::new(
            "#share",
            ConfigOverrides::default(),
            &document,
            host.services(),
        )));

        let weak = Rc::downgrade(&widget);
        widget.borrow_mut().update_config(ConfigOverrides {
            on_share: Some(crate::config::ShareCallback::new(move |key, _| {
                if let Some(widget) = weak.upgrade() {
                    widget.borrow_mut().remove_platform(key);
                }
            })),
            ..Default::default()
        });

        let dispatch = widget.borrow().prepare_click("email").unwrap();
        dispatch.run();

        assert!(widget.borrow().view().button("email").is_none());
        assert_eq!(target.button_count(), 5);
    }

    #[test]
    fn test_click_unknown_button() {
        let (widget, _target, host) = setup(ConfigOverrides::platforms(["facebook"]));
        assert!(widget.click("twitter").is_none());
        assert!(host.analytics.events().is_empty());
    }

    #[test]
    fn test_destroy() {
        let (mut widget, target, host) = setup(ConfigOverrides::default());
        widget.destroy();

        assert_eq!(target.child_count(), 0);
        assert!(widget.view().buttons.is_empty());
        assert_eq!(host.notifier.remove_count(), 1);
        assert!(widget.click("facebook").is_none());
    }
}
