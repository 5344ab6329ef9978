//! Server-side rendering of the widget markup.

use sharekit_core::host::memory::{MemoryDocument, MemoryHost};
use sharekit_core::{ConfigError, ConfigOverrides, PageMetadata, ShareWidget};
use thiserror::Error;

/// Selector the static renderer mounts into.
pub const STATIC_SELECTOR: &str = "#share";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Render the widget for a JSON options object to HTML.
///
/// Without page metadata the content fields default to empty, so the
/// options should carry `url` and `title`.
pub fn render_static(options_json: &str) -> Result<String, RenderError> {
    let overrides = ConfigOverrides::from_json(options_json)?;

    let mut document = MemoryDocument::new(PageMetadata::default());
    let target = document.add_target(STATIC_SELECTOR);
    let host = MemoryHost::new();

    let widget = ShareWidget::new(STATIC_SELECTOR, overrides, &document, host.services());
    log::debug!("Rendered {} share buttons", widget.view().buttons.len());

    Ok(target.html())
}
