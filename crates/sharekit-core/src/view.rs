//! Declarative description of the rendered widget.
//!
//! The widget builds a [`WidgetView`] on every render; hosts mount it as
//! real elements through a [`RenderTarget`](crate::host::RenderTarget).

use crate::classes::TEXT_CLASS;
use crate::platform::ShareAction;

/// Placeholder href for buttons that do not navigate.
pub const ACTION_HREF: &str = "#";
/// Link target for new-tab navigation.
pub const NEW_TAB_TARGET: &str = "_blank";
/// Link rel for new-tab navigation: no opener handle, no referrer.
pub const NEW_TAB_REL: &str = "noopener noreferrer";
/// Attribute carrying a button's platform key.
pub const PLATFORM_ATTRIBUTE: &str = "data-platform";

/// What a click on a button does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickBehavior {
    /// Prevent navigation and run an action.
    Action(ShareAction),
    /// Prevent navigation and open the share URL in a popup.
    Popup { share_url: String },
    /// Let the link navigate.
    Navigate,
}

impl ClickBehavior {
    /// Whether the host should cancel the default link navigation.
    pub fn prevents_default(&self) -> bool {
        !matches!(self, ClickBehavior::Navigate)
    }
}

/// One rendered share button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    pub platform: String,
    pub class: String,
    pub icon_class: String,
    pub label: String,
    pub color: String,
    pub href: String,
    pub target: Option<&'static str>,
    pub rel: Option<&'static str>,
    pub click: ClickBehavior,
}

/// The full rendered subtree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WidgetView {
    pub root_class: String,
    pub buttons_class: String,
    pub buttons: Vec<ButtonView>,
}

impl WidgetView {
    pub fn button(&self, platform: &str) -> Option<&ButtonView> {
        self.buttons.iter().find(|b| b.platform == platform)
    }

    /// Platform keys of the buttons, in display order.
    pub fn platforms(&self) -> Vec<&str> {
        self.buttons.iter().map(|b| b.platform.as_str()).collect()
    }

    /// Static markup for the view.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        html.push_str(&format!("<div class=\"{}\">", escape(&self.root_class)));
        html.push_str(&format!("<div class=\"{}\">", escape(&self.buttons_class)));
        for button in &self.buttons {
            html.push_str(&button.to_html());
        }
        html.push_str("</div></div>");
        html
    }
}

impl ButtonView {
    /// Static markup for the button.
    pub fn to_html(&self) -> String {
        let mut attrs = format!(
            "class=\"{}\" href=\"{}\" {PLATFORM_ATTRIBUTE}=\"{}\" style=\"--share-color: {}\"",
            escape(&self.class),
            escape(&self.href),
            escape(&self.platform),
            escape(&self.color)
        );
        if let Some(target) = self.target {
            attrs.push_str(&format!(" target=\"{target}\""));
        }
        if let Some(rel) = self.rel {
            attrs.push_str(&format!(" rel=\"{rel}\""));
        }
        format!(
            "<a {attrs}><i class=\"{}\"></i><span class=\"{TEXT_CLASS}\">{}</span></a>",
            escape(&self.icon_class),
            escape(&self.label)
        )
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
