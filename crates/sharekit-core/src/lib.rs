//! sharekit core library
//!
//! Platform-agnostic configuration, platform registry, rendering model and
//! share dispatch for the sharekit share-button widget. Hosts plug in
//! through the traits in [`host`].

pub mod classes;
pub mod config;
pub mod host;
pub mod icons;
pub mod notify;
pub mod platform;
pub mod popup;
pub mod view;
pub mod widget;

pub use config::{
    ConfigError, ConfigOverrides, IconLibrary, Layout, OpenMethod, PageMetadata, PopupSettings,
    PopupSettingsPatch, Position, ShareCallback, ShareConfig, Size, Theme,
};
pub use host::{
    AnalyticsSink, ClipboardError, ClipboardService, Document, HostServices, Notifier,
    PopupWindow, RenderTarget, ShareEvent, Spawner, WindowService,
};
pub use notify::{NotificationSurface, TimerId, Timers, TransientNotifier};
pub use platform::{
    DescriptorError, IconSet, PlatformDescriptor, PlatformRegistry, ShareAction, ShareBehavior,
    UrlTemplate,
};
pub use popup::Viewport;
pub use view::{ButtonView, ClickBehavior, WidgetView};
pub use widget::{ClickOutcome, ShareDispatch, ShareWidget, WidgetError};
