//! CSS class derivation for the rendered containers and buttons.

use crate::config::{Layout, Position, Size, Theme};

/// Base class of the root container.
pub const ROOT_CLASS: &str = "universal-share";
/// Base class of the buttons container.
pub const BUTTONS_CLASS: &str = "share-buttons";
/// Base class of each button.
pub const BUTTON_CLASS: &str = "share-btn";
/// Class of the label element inside a button.
pub const TEXT_CLASS: &str = "btn-text";
/// Added to buttons when text is hidden.
pub const ICON_ONLY_CLASS: &str = "icon-only";

/// Root container classes. Default theme and inline position add nothing.
pub fn root_class(theme: Theme, position: Position) -> String {
    let mut classes = vec![ROOT_CLASS];
    if theme != Theme::Default {
        classes.push(theme.as_str());
    }
    if position != Position::Inline {
        classes.push(position.as_str());
    }
    classes.join(" ")
}

/// Buttons container classes. Horizontal layout adds nothing.
pub fn buttons_class(layout: Layout) -> String {
    let mut classes = vec![BUTTONS_CLASS];
    if layout != Layout::Horizontal {
        classes.push(layout.as_str());
    }
    classes.join(" ")
}

/// Classes of the button for `key`.
pub fn button_class(key: &str, size: Size, show_text: bool) -> String {
    let mut classes = vec![BUTTON_CLASS, key];
    if size != Size::Medium {
        classes.push(size.as_str());
    }
    if !show_text {
        classes.push(ICON_ONLY_CLASS);
    }
    classes.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_class_all_combinations() {
        for theme in Theme::ALL {
            for position in Position::ALL {
                let mut expected = String::from("universal-share");
                if *theme != Theme::Default {
                    expected.push(' ');
                    expected.push_str(theme.as_str());
                }
                if *position != Position::Inline {
                    expected.push(' ');
                    expected.push_str(position.as_str());
                }
                assert_eq!(root_class(*theme, *position), expected);
            }
        }
    }

    #[test]
    fn test_root_class_examples() {
        assert_eq!(root_class(Theme::Default, Position::Inline), "universal-share");
        assert_eq!(root_class(Theme::Dark, Position::StickyTop), "universal-share dark sticky-top");
        assert_eq!(root_class(Theme::Default, Position::Floating), "universal-share floating");
    }

    #[test]
    fn test_buttons_class() {
        assert_eq!(buttons_class(Layout::Horizontal), "share-buttons");
        assert_eq!(buttons_class(Layout::Vertical), "share-buttons vertical");
        assert_eq!(buttons_class(Layout::Grid), "share-buttons grid");
    }

    #[test]
    fn test_button_class() {
        assert_eq!(button_class("facebook", Size::Medium, true), "share-btn facebook");
        assert_eq!(button_class("copy", Size::Large, true), "share-btn copy large");
        assert_eq!(button_class("sms", Size::Small, false), "share-btn sms small icon-only");
        assert_eq!(button_class("email", Size::Medium, false), "share-btn email icon-only");
    }
}
