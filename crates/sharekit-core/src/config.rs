//! Widget configuration: typed options, defaults, and shallow override merging.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::platform::PlatformDescriptor;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown {kind} value: {value:?}")]
    UnknownValue { kind: &'static str, value: String },
    #[error("Invalid options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Declares a closed option enumeration with a fixed string form.
macro_rules! option_enum {
    (
        $(#[$meta:meta])*
        $name:ident : $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// Every accepted value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The string form used in class names and options.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err(ConfigError::UnknownValue {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

option_enum! {
    /// Visual theme of the root container.
    Theme: "theme" {
        #[default]
        Default => "default",
        Minimal => "minimal",
        Rounded => "rounded",
        Dark => "dark",
    }
}

option_enum! {
    /// Button size.
    Size: "size" {
        Small => "small",
        #[default]
        Medium => "medium",
        Large => "large",
    }
}

option_enum! {
    /// Arrangement of the buttons container.
    Layout: "layout" {
        #[default]
        Horizontal => "horizontal",
        Vertical => "vertical",
        Grid => "grid",
    }
}

option_enum! {
    /// Placement of the root container on the page.
    Position: "position" {
        #[default]
        Inline => "inline",
        Floating => "floating",
        StickyTop => "sticky-top",
        StickyBottom => "sticky-bottom",
    }
}

option_enum! {
    /// Icon font the buttons reference.
    IconLibrary: "icon library" {
        #[default]
        FontAwesome => "fontawesome",
        IcoMoon => "icomoon",
        Both => "both",
    }
}

option_enum! {
    /// How an external share URL is presented to the user.
    OpenMethod: "open method" {
        #[default]
        Popup => "popup",
        NewTab => "newtab",
        Same => "same",
    }
}

/// Metadata of the host page, used for the content defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub url: String,
    pub description: String,
}

/// Caller hook invoked with `(platform key, open method)` after every share.
#[derive(Clone)]
pub struct ShareCallback(Rc<dyn Fn(&str, OpenMethod)>);

impl ShareCallback {
    pub fn new(f: impl Fn(&str, OpenMethod) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, platform: &str, method: OpenMethod) {
        (self.0)(platform, method);
    }
}

impl fmt::Debug for ShareCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ShareCallback(..)")
    }
}

/// Accepts `true`/`false` as well as the numeric `1`/`0` form.
#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Number(f64),
}

impl From<FlagRepr> for bool {
    fn from(flag: FlagRepr) -> Self {
        match flag {
            FlagRepr::Bool(b) => b,
            FlagRepr::Number(n) => n != 0.0,
        }
    }
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    FlagRepr::deserialize(deserializer).map(Into::into)
}

fn optional_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(Option::<FlagRepr>::deserialize(deserializer)?.map(Into::into))
}

fn serialize_flag<S: serde::Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

/// Popup window geometry and feature flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupSettings {
    pub width: u32,
    pub height: u32,
    #[serde(deserialize_with = "flag", serialize_with = "serialize_flag")]
    pub scrollbars: bool,
    #[serde(deserialize_with = "flag", serialize_with = "serialize_flag")]
    pub resizable: bool,
    #[serde(deserialize_with = "flag", serialize_with = "serialize_flag")]
    pub toolbar: bool,
    #[serde(deserialize_with = "flag", serialize_with = "serialize_flag")]
    pub location: bool,
    #[serde(deserialize_with = "flag", serialize_with = "serialize_flag")]
    pub directories: bool,
    #[serde(deserialize_with = "flag", serialize_with = "serialize_flag")]
    pub status: bool,
    #[serde(deserialize_with = "flag", serialize_with = "serialize_flag")]
    pub menubar: bool,
    #[serde(deserialize_with = "flag", serialize_with = "serialize_flag")]
    pub copyhistory: bool,
}

impl Default for PopupSettings {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
            scrollbars: true,
            resizable: true,
            toolbar: false,
            location: false,
            directories: false,
            status: false,
            menubar: false,
            copyhistory: false,
        }
    }
}

impl PopupSettings {
    /// Merge the fields present in `patch`, keeping the rest.
    pub fn merge(&mut self, patch: PopupSettingsPatch) {
        let PopupSettingsPatch {
            width,
            height,
            scrollbars,
            resizable,
            toolbar,
            location,
            directories,
            status,
            menubar,
            copyhistory,
        } = patch;

        if let Some(v) = width {
            self.width = v;
        }
        if let Some(v) = height {
            self.height = v;
        }
        if let Some(v) = scrollbars {
            self.scrollbars = v;
        }
        if let Some(v) = resizable {
            self.resizable = v;
        }
        if let Some(v) = toolbar {
            self.toolbar = v;
        }
        if let Some(v) = location {
            self.location = v;
        }
        if let Some(v) = directories {
            self.directories = v;
        }
        if let Some(v) = status {
            self.status = v;
        }
        if let Some(v) = menubar {
            self.menubar = v;
        }
        if let Some(v) = copyhistory {
            self.copyhistory = v;
        }
    }
}

/// Partial popup settings for `update_popup_settings`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PopupSettingsPatch {
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(deserialize_with = "optional_flag")]
    pub scrollbars: Option<bool>,
    #[serde(deserialize_with = "optional_flag")]
    pub resizable: Option<bool>,
    #[serde(deserialize_with = "optional_flag")]
    pub toolbar: Option<bool>,
    #[serde(deserialize_with = "optional_flag")]
    pub location: Option<bool>,
    #[serde(deserialize_with = "optional_flag")]
    pub directories: Option<bool>,
    #[serde(deserialize_with = "optional_flag")]
    pub status: Option<bool>,
    #[serde(deserialize_with = "optional_flag")]
    pub menubar: Option<bool>,
    #[serde(deserialize_with = "optional_flag")]
    pub copyhistory: Option<bool>,
}

/// Platforms enabled when the caller does not choose any.
pub const DEFAULT_PLATFORMS: &[&str] = &["facebook", "twitter", "linkedin", "whatsapp", "email", "copy"];

/// Fully resolved widget configuration.
///
/// Every recognized option has a concrete value; overrides are applied
/// with [`ShareConfig::apply`].
#[derive(Debug, Clone)]
pub struct ShareConfig {
    /// Enabled platform keys in display order.
    pub platforms: Vec<String>,
    pub theme: Theme,
    pub size: Size,
    pub layout: Layout,
    pub position: Position,
    pub show_text: bool,
    pub show_counter: bool,
    pub title: String,
    pub url: String,
    pub description: String,
    pub icon_library: IconLibrary,
    pub open_method: OpenMethod,
    pub popup_settings: PopupSettings,
    pub on_share: Option<ShareCallback>,
    /// Icon class overrides by platform key.
    pub custom_icons: BTreeMap<String, String>,
    /// Descriptors merged into the registry at construction.
    pub custom_platforms: BTreeMap<String, PlatformDescriptor>,
}

impl ShareConfig {
    /// Defaults, with the content fields taken from the host page.
    pub fn defaults(page: &PageMetadata) -> Self {
        Self {
            platforms: DEFAULT_PLATFORMS.iter().map(|s| s.to_string()).collect(),
            theme: Theme::Default,
            size: Size::Medium,
            layout: Layout::Horizontal,
            position: Position::Inline,
            show_text: true,
            show_counter: false,
            title: page.title.clone(),
            url: page.url.clone(),
            description: page.description.clone(),
            icon_library: IconLibrary::FontAwesome,
            open_method: OpenMethod::Popup,
            popup_settings: PopupSettings::default(),
            on_share: None,
            custom_icons: BTreeMap::new(),
            custom_platforms: BTreeMap::new(),
        }
    }

    /// Shallow merge: each present override replaces the whole field.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        let ConfigOverrides {
            platforms,
            theme,
            size,
            layout,
            position,
            show_text,
            show_counter,
            title,
            url,
            description,
            icon_library,
            open_method,
            popup_settings,
            on_share,
            custom_icons,
            custom_platforms,
        } = overrides;

        if let Some(v) = platforms {
            self.platforms = v;
        }
        if let Some(v) = theme {
            self.theme = v;
        }
        if let Some(v) = size {
            self.size = v;
        }
        if let Some(v) = layout {
            self.layout = v;
        }
        if let Some(v) = position {
            self.position = v;
        }
        if let Some(v) = show_text {
            self.show_text = v;
        }
        if let Some(v) = show_counter {
            self.show_counter = v;
        }
        if let Some(v) = title {
            self.title = v;
        }
        if let Some(v) = url {
            self.url = v;
        }
        if let Some(v) = description {
            self.description = v;
        }
        if let Some(v) = icon_library {
            self.icon_library = v;
        }
        if let Some(v) = open_method {
            self.open_method = v;
        }
        if let Some(v) = popup_settings {
            self.popup_settings = v;
        }
        if let Some(v) = on_share {
            self.on_share = Some(v);
        }
        if let Some(v) = custom_icons {
            self.custom_icons = v;
        }
        if let Some(v) = custom_platforms {
            self.custom_platforms = v;
        }
    }
}

/// Caller-supplied overrides. Absent fields keep their current value.
///
/// Options are read one field at a time: unrecognized keys are ignored, and
/// a field that fails to parse is logged and skipped without touching the
/// others.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub platforms: Option<Vec<String>>,
    pub theme: Option<Theme>,
    pub size: Option<Size>,
    pub layout: Option<Layout>,
    pub position: Option<Position>,
    pub show_text: Option<bool>,
    pub show_counter: Option<bool>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub icon_library: Option<IconLibrary>,
    pub open_method: Option<OpenMethod>,
    pub popup_settings: Option<PopupSettings>,
    pub on_share: Option<ShareCallback>,
    pub custom_icons: Option<BTreeMap<String, String>>,
    pub custom_platforms: Option<BTreeMap<String, PlatformDescriptor>>,
}

impl ConfigOverrides {
    /// Parse overrides from a JSON options object.
    ///
    /// Fails only when the input is not a JSON object.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let fields: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;

        let mut overrides = Self::default();
        for (key, value) in fields {
            if let Err(e) = overrides.set_field(&key, value) {
                log::warn!("Ignoring option {:?}: {}", key, e);
            }
        }
        Ok(overrides)
    }

    /// Set the field for the camelCase option `key`.
    ///
    /// `null` leaves the field unset. Unknown keys, `onShare` included,
    /// are ignored. Invalid `customPlatforms` entries are dropped one by one.
    pub fn set_field<'de, D: Deserializer<'de>>(&mut self, key: &str, value: D) -> Result<(), D::Error> {
        match key {
            "platforms" => assign(&mut self.platforms, value),
            "theme" => assign(&mut self.theme, value),
            "size" => assign(&mut self.size, value),
            "layout" => assign(&mut self.layout, value),
            "position" => assign(&mut self.position, value),
            "showText" => assign(&mut self.show_text, value),
            "showCounter" => assign(&mut self.show_counter, value),
            "title" => assign(&mut self.title, value),
            "url" => assign(&mut self.url, value),
            "description" => assign(&mut self.description, value),
            "iconLibrary" => assign(&mut self.icon_library, value),
            "openMethod" => assign(&mut self.open_method, value),
            "popupSettings" => assign(&mut self.popup_settings, value),
            "customIcons" => assign(&mut self.custom_icons, value),
            "customPlatforms" => {
                if let Some(platforms) = valid_platforms(value)? {
                    self.custom_platforms = Some(platforms);
                }
                Ok(())
            }
            _ => {
                log::debug!("Ignoring unknown option {:?}", key);
                Ok(())
            }
        }
    }

    /// Override only the share URL.
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Override only the enabled platform sequence.
    pub fn platforms<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            platforms: Some(keys.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }
}

fn assign<'de, T, D>(slot: &mut Option<T>, value: D) -> Result<(), D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    if let Some(v) = Option::<T>::deserialize(value)? {
        *slot = Some(v);
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CustomPlatform {
    Valid(PlatformDescriptor),
    Invalid(IgnoredAny),
}

fn valid_platforms<'de, D: Deserializer<'de>>(
    value: D,
) -> Result<Option<BTreeMap<String, PlatformDescriptor>>, D::Error> {
    let Some(entries) = Option::<BTreeMap<String, CustomPlatform>>::deserialize(value)? else {
        return Ok(None);
    };

    let platforms = entries
        .into_iter()
        .filter_map(|(key, entry)| match entry {
            CustomPlatform::Valid(descriptor) => Some((key, descriptor)),
            CustomPlatform::Invalid(_) => {
                log::warn!("Ignoring invalid custom platform {:?}", key);
                None
            }
        })
        .collect();
    Ok(Some(platforms))
}
