//! Icon class resolution.

use std::collections::BTreeMap;

use crate::config::IconLibrary;
use crate::platform::IconSet;

/// Resolve the icon class for a platform.
///
/// A custom override for `key` always wins. Otherwise `Both` joins the
/// fontawesome and icomoon identifiers, and a single library falls back to
/// the other one when its own identifier is missing.
pub fn resolve_icon_class(
    key: &str,
    icons: &IconSet,
    library: IconLibrary,
    custom_icons: &BTreeMap<String, String>,
) -> String {
    if let Some(custom) = custom_icons.get(key).filter(|c| !c.is_empty()) {
        return custom.clone();
    }

    let fontawesome = icons.fontawesome.as_deref().filter(|s| !s.is_empty());
    let icomoon = icons.icomoon.as_deref().filter(|s| !s.is_empty());

    match library {
        IconLibrary::Both => [fontawesome, icomoon]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        IconLibrary::IcoMoon => icomoon.or(fontawesome).unwrap_or_default().to_string(),
        IconLibrary::FontAwesome => fontawesome.or(icomoon).unwrap_or_default().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> IconSet {
        IconSet::new("fab fa-x", "icon-x")
    }

    fn only_fontawesome() -> IconSet {
        IconSet {
            fontawesome: Some("fas fa-y".to_string()),
            icomoon: None,
        }
    }

    fn only_icomoon() -> IconSet {
        IconSet {
            fontawesome: None,
            icomoon: Some("icon-y".to_string()),
        }
    }

    #[test]
    fn test_custom_icon_always_wins() {
        let mut custom = BTreeMap::new();
        custom.insert("x".to_string(), "my-icon".to_string());
        for library in IconLibrary::ALL {
            assert_eq!(resolve_icon_class("x", &full(), *library, &custom), "my-icon");
        }
    }

    #[test]
    fn test_custom_icon_for_other_key_ignored() {
        let mut custom = BTreeMap::new();
        custom.insert("other".to_string(), "my-icon".to_string());
        assert_eq!(
            resolve_icon_class("x", &full(), IconLibrary::FontAwesome, &custom),
            "fab fa-x"
        );
    }

    #[test]
    fn test_both_concatenates_and_trims() {
        let none = BTreeMap::new();
        assert_eq!(resolve_icon_class("x", &full(), IconLibrary::Both, &none), "fab fa-x icon-x");
        assert_eq!(resolve_icon_class("y", &only_fontawesome(), IconLibrary::Both, &none), "fas fa-y");
        assert_eq!(resolve_icon_class("y", &only_icomoon(), IconLibrary::Both, &none), "icon-y");
        assert_eq!(resolve_icon_class("z", &IconSet::default(), IconLibrary::Both, &none), "");
    }

    #[test]
    fn test_single_library_fallbacks() {
        let none = BTreeMap::new();
        assert_eq!(resolve_icon_class("x", &full(), IconLibrary::IcoMoon, &none), "icon-x");
        assert_eq!(resolve_icon_class("x", &full(), IconLibrary::FontAwesome, &none), "fab fa-x");
        assert_eq!(resolve_icon_class("y", &only_fontawesome(), IconLibrary::IcoMoon, &none), "fas fa-y");
        assert_eq!(resolve_icon_class("y", &only_icomoon(), IconLibrary::FontAwesome, &none), "icon-y");
        assert_eq!(resolve_icon_class("z", &IconSet::default(), IconLibrary::FontAwesome, &none), "");
    }
}
