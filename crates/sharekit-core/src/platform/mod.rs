//! Platform descriptors: display metadata plus share behavior.

mod registry;

pub use registry::{Builtin, PlatformRegistry, BUILTIN_PLATFORMS};

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Descriptor construction errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("Platform descriptor has both a URL template and an action")]
    Ambiguous,
    #[error("Platform descriptor has neither a URL template nor an action")]
    MissingBehavior,
    #[error("Unknown share action: {0:?}")]
    UnknownAction(String),
}

/// Built-in actions a button can trigger instead of navigating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareAction {
    /// Copy the configured URL to the clipboard.
    Copy,
    /// Open the host print dialog.
    Print,
}

impl ShareAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ShareAction::Copy => "copy",
            ShareAction::Print => "print",
        }
    }
}

impl std::str::FromStr for ShareAction {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "copy" => Ok(ShareAction::Copy),
            "print" => Ok(ShareAction::Print),
            other => Err(DescriptorError::UnknownAction(other.to_string())),
        }
    }
}

/// Percent-encode a share parameter. Everything except ALPHA, DIGIT and
/// `-_.~` is escaped.
pub fn encode_component(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Builds a share URL from `(url, title)`.
#[derive(Clone)]
pub enum UrlTemplate {
    /// A URL with `{url}` and `{title}` placeholders, substituted encoded.
    Pattern(String),
    /// A host function producing the full URL.
    Custom(Rc<dyn Fn(&str, &str) -> String>),
}

impl UrlTemplate {
    pub fn pattern(pattern: impl Into<String>) -> Self {
        UrlTemplate::Pattern(pattern.into())
    }

    pub fn custom(f: impl Fn(&str, &str) -> String + 'static) -> Self {
        UrlTemplate::Custom(Rc::new(f))
    }

    /// Compute the share URL for the given page URL and title.
    pub fn render(&self, url: &str, title: &str) -> String {
        match self {
            // Encoded values never contain braces, so substitution order is safe.
            UrlTemplate::Pattern(pattern) => pattern
                .replace("{url}", &encode_component(url))
                .replace("{title}", &encode_component(title)),
            UrlTemplate::Custom(f) => f(url, title),
        }
    }
}

impl fmt::Debug for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlTemplate::Pattern(p) => f.debug_tuple("Pattern").field(p).finish(),
            UrlTemplate::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// What a button does when clicked.
#[derive(Debug, Clone)]
pub enum ShareBehavior {
    /// Navigate to a computed share URL.
    Url(UrlTemplate),
    /// Run a named action in place.
    Action(ShareAction),
}

/// Icon identifiers per icon library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconSet {
    pub fontawesome: Option<String>,
    pub icomoon: Option<String>,
}

impl IconSet {
    pub fn new(fontawesome: &str, icomoon: &str) -> Self {
        Self {
            fontawesome: Some(fontawesome.to_string()),
            icomoon: Some(icomoon.to_string()),
        }
    }
}

/// Immutable description of one share destination.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawDescriptor")]
pub struct PlatformDescriptor {
    pub name: String,
    pub icons: IconSet,
    pub color: String,
    pub behavior: ShareBehavior,
}

impl PlatformDescriptor {
    /// Descriptor that navigates to a templated URL.
    pub fn url(name: &str, icons: IconSet, color: &str, template: UrlTemplate) -> Self {
        Self {
            name: name.to_string(),
            icons,
            color: color.to_string(),
            behavior: ShareBehavior::Url(template),
        }
    }

    /// Descriptor that runs an action.
    pub fn action(name: &str, icons: IconSet, color: &str, action: ShareAction) -> Self {
        Self {
            name: name.to_string(),
            icons,
            color: color.to_string(),
            behavior: ShareBehavior::Action(action),
        }
    }

    /// Build from optional parts, requiring exactly one behavior.
    pub fn from_parts(
        name: String,
        icons: IconSet,
        color: String,
        url: Option<UrlTemplate>,
        action: Option<ShareAction>,
    ) -> Result<Self, DescriptorError> {
        let behavior = match (url, action) {
            (Some(template), None) => ShareBehavior::Url(template),
            (None, Some(action)) => ShareBehavior::Action(action),
            (Some(_), Some(_)) => return Err(DescriptorError::Ambiguous),
            (None, None) => return Err(DescriptorError::MissingBehavior),
        };
        Ok(Self {
            name,
            icons,
            color,
            behavior,
        })
    }
}

/// Wire form of a descriptor; `url` is a pattern string.
#[derive(Deserialize)]
struct RawDescriptor {
    name: String,
    #[serde(default)]
    icons: IconSet,
    #[serde(default)]
    color: String,
    url: Option<String>,
    action: Option<ShareAction>,
}

impl TryFrom<RawDescriptor> for PlatformDescriptor {
    type Error = DescriptorError;

    fn try_from(raw: RawDescriptor) -> Result<Self, Self::Error> {
        PlatformDescriptor::from_parts(
            raw.name,
            raw.icons,
            raw.color,
            raw.url.map(UrlTemplate::Pattern),
            raw.action,
        )
    }
}
