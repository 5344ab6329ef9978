//! Popup window placement and feature strings.

use crate::config::PopupSettings;

/// Host viewport metrics used to center popups.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Left edge of the browser window on screen.
    pub screen_left: f64,
    /// Top edge of the browser window on screen.
    pub screen_top: f64,
    pub width: f64,
    pub height: f64,
}

/// Top-left corner that centers a `settings`-sized popup on the viewport.
pub fn centered_position(viewport: &Viewport, settings: &PopupSettings) -> (f64, f64) {
    let left = viewport.width / 2.0 - f64::from(settings.width) / 2.0 + viewport.screen_left;
    let top = viewport.height / 2.0 - f64::from(settings.height) / 2.0 + viewport.screen_top;
    (left, top)
}

/// Window feature string passed to `window.open`.
pub fn feature_string(settings: &PopupSettings, left: f64, top: f64) -> String {
    let flag = |on: bool| u8::from(on);
    [
        format!("width={}", settings.width),
        format!("height={}", settings.height),
        format!("top={top}"),
        format!("left={left}"),
        format!("scrollbars={}", flag(settings.scrollbars)),
        format!("resizable={}", flag(settings.resizable)),
        format!("toolbar={}", flag(settings.toolbar)),
        format!("location={}", flag(settings.location)),
        format!("directories={}", flag(settings.directories)),
        format!("status={}", flag(settings.status)),
        format!("menubar={}", flag(settings.menubar)),
        format!("copyhistory={}", flag(settings.copyhistory)),
    ]
    .join(",")
}

/// Window name used for a platform's popup.
pub fn window_name(platform: &str) -> String {
    format!("share_{platform}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_position() {
        let viewport = Viewport {
            screen_left: 100.0,
            screen_top: 50.0,
            width: 1200.0,
            height: 800.0,
        };
        let (left, top) = centered_position(&viewport, &PopupSettings::default());
        assert_eq!(left, 400.0);
        assert_eq!(top, 250.0);
    }

    #[test]
    fn test_feature_string_defaults() {
        let features = feature_string(&PopupSettings::default(), 400.0, 250.0);
        assert_eq!(
            features,
            "width=600,height=400,top=250,left=400,scrollbars=1,resizable=1,toolbar=0,\
             location=0,directories=0,status=0,menubar=0,copyhistory=0"
        );
    }

    #[test]
    fn test_feature_string_fractional_position() {
        let settings = PopupSettings {
            width: 601,
            ..Default::default()
        };
        let viewport = Viewport {
            width: 1000.0,
            height: 600.0,
            ..Default::default()
        };
        let (left, top) = centered_position(&viewport, &settings);
        assert!(feature_string(&settings, left, top).contains("left=199.5"));
    }
}
