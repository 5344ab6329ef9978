//! sharekit for the browser
//!
//! Binds the core widget to the DOM when built for `wasm32`, and offers a
//! static HTML renderer everywhere else.

pub mod static_page;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod shared;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod timer_slots;

pub use static_page::{render_static, RenderError, STATIC_SELECTOR};

#[cfg(target_arch = "wasm32")]
mod bindings;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod options;
#[cfg(target_arch = "wasm32")]
mod services;

#[cfg(target_arch = "wasm32")]
pub use bindings::JsShareWidget;
