//! Conversion of JavaScript option objects into core types.
//!
//! Plain fields go through `serde-wasm-bindgen` one at a time.
//! Function-valued fields (`onShare` and custom platform `url` builders)
//! are wrapped by hand.

use std::collections::BTreeMap;

use js_sys::{Function, Object, Reflect};
use sharekit_core::{
    ConfigOverrides, DescriptorError, IconSet, OpenMethod, PlatformDescriptor, PopupSettingsPatch,
    ShareAction, ShareCallback, UrlTemplate,
};
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

const ON_SHARE: &str = "onShare";
const CUSTOM_PLATFORMS: &str = "customPlatforms";

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("Expected an object")]
    NotAnObject,
    #[error("Field {0:?} has the wrong type")]
    WrongType(&'static str),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error("Invalid options: {0}")]
    Serde(#[from] serde_wasm_bindgen::Error),
}

fn field(object: &JsValue, name: &str) -> JsValue {
    Reflect::get(object, &JsValue::from_str(name)).unwrap_or(JsValue::UNDEFINED)
}

fn is_missing(value: &JsValue) -> bool {
    value.is_undefined() || value.is_null()
}

/// Read widget options one key at a time.
///
/// A key whose value is unusable is logged and skipped; the other keys
/// still apply.
pub fn parse_overrides(options: &JsValue) -> ConfigOverrides {
    let mut overrides = ConfigOverrides::default();
    if is_missing(options) {
        return overrides;
    }
    let Some(object) = options.dyn_ref::<Object>() else {
        log::error!("Ignoring share options: {}", OptionsError::NotAnObject);
        return overrides;
    };

    for key in Object::keys(object).iter() {
        let Some(key) = key.as_string() else {
            continue;
        };
        let value = field(options, &key);
        let result = match key.as_str() {
            ON_SHARE => parse_callback(value).map(|callback| {
                if callback.is_some() {
                    overrides.on_share = callback;
                }
            }),
            CUSTOM_PLATFORMS => parse_platforms(&value).map(|platforms| {
                if platforms.is_some() {
                    overrides.custom_platforms = platforms;
                }
            }),
            _ => overrides
                .set_field(&key, serde_wasm_bindgen::Deserializer::from(value))
                .map_err(OptionsError::from),
        };
        if let Err(e) = result {
            log::warn!("Ignoring option {:?}: {}", key, e);
        }
    }

    overrides
}

fn parse_callback(value: JsValue) -> Result<Option<ShareCallback>, OptionsError> {
    if is_missing(&value) {
        return Ok(None);
    }
    let function = value
        .dyn_into::<Function>()
        .map_err(|_| OptionsError::WrongType(ON_SHARE))?;
    Ok(Some(share_callback(function)))
}

/// Read custom platforms, dropping entries that are not valid descriptors.
fn parse_platforms(
    value: &JsValue,
) -> Result<Option<BTreeMap<String, PlatformDescriptor>>, OptionsError> {
    if is_missing(value) {
        return Ok(None);
    }
    let object = value
        .dyn_ref::<Object>()
        .ok_or(OptionsError::WrongType(CUSTOM_PLATFORMS))?;

    let mut platforms = BTreeMap::new();
    for key in Object::keys(object).iter() {
        let Some(key) = key.as_string() else {
            continue;
        };
        match parse_descriptor(&field(value, &key)) {
            Ok(descriptor) => {
                platforms.insert(key, descriptor);
            }
            Err(e) => log::warn!("Ignoring custom platform {:?}: {}", key, e),
        }
    }
    Ok(Some(platforms))
}

/// Read one platform descriptor. `url` may be a pattern string or a
/// function of `(url, title)`.
pub fn parse_descriptor(value: &JsValue) -> Result<PlatformDescriptor, OptionsError> {
    if !value.is_object() {
        return Err(OptionsError::NotAnObject);
    }

    let name = field(value, "name")
        .as_string()
        .ok_or(OptionsError::WrongType("name"))?;
    let color = field(value, "color").as_string().unwrap_or_default();
    let icons_value = field(value, "icons");
    let icons: IconSet = if is_missing(&icons_value) {
        IconSet::default()
    } else {
        serde_wasm_bindgen::from_value(icons_value)?
    };

    let url_value = field(value, "url");
    let url = if is_missing(&url_value) {
        None
    } else if let Some(pattern) = url_value.as_string() {
        Some(UrlTemplate::Pattern(pattern))
    } else {
        let function = url_value
            .dyn_into::<Function>()
            .map_err(|_| OptionsError::WrongType("url"))?;
        Some(url_builder(function))
    };

    let action_value = field(value, "action");
    let action = if is_missing(&action_value) {
        None
    } else {
        let action = action_value
            .as_string()
            .ok_or(OptionsError::WrongType("action"))?;
        Some(action.parse::<ShareAction>()?)
    };

    Ok(PlatformDescriptor::from_parts(name, icons, color, url, action)?)
}

/// Read a partial popup settings object.
pub fn parse_popup_patch(value: &JsValue) -> Result<PopupSettingsPatch, OptionsError> {
    if is_missing(value) {
        return Ok(PopupSettingsPatch::default());
    }
    Ok(serde_wasm_bindgen::from_value(value.clone())?)
}

fn share_callback(function: Function) -> ShareCallback {
    ShareCallback::new(move |platform: &str, method: OpenMethod| {
        if let Err(e) = function.call2(
            &JsValue::NULL,
            &JsValue::from_str(platform),
            &JsValue::from_str(method.as_str()),
        ) {
            log::error!("onShare callback threw: {:?}", e);
        }
    })
}

fn url_builder(function: Function) -> UrlTemplate {
    UrlTemplate::custom(move |url: &str, title: &str| {
        match function.call2(&JsValue::NULL, &JsValue::from_str(url), &JsValue::from_str(title)) {
            Ok(value) => value.as_string().unwrap_or_default(),
            Err(e) => {
                log::error!("Custom share URL builder threw: {:?}", e);
                String::new()
            }
        }
    })
}
