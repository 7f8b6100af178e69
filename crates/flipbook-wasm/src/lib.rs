//! WebAssembly front end for the flipbook viewer
//!
//! This crate wires the host-independent `flipbook` core to the browser: it
//! binds the `St.PageFlip` widget, builds the DOM page units, fetches the
//! manifest, plays the flip sound and keeps the pager in sync with the widget.
//!
//! # Example Usage (HTML)
//!
//! ```html
//! <div id="book"></div>
//! <script src="vendor/page-flip.browser.js"></script>
//! <script type="module">
//!   import init from './flipbook_wasm.js';
//!   await init(); // boots with window.FLIPBOOK_CONFIG or the defaults
//! </script>
//! ```
//!
//! Set `window.FLIPBOOK_MANUAL_START = true` before `init()` and call
//! `startFlipbook(config)` to boot with an explicit configuration instead.

#![warn(missing_docs)]

use flipbook::ViewerConfig;
use wasm_bindgen::prelude::*;

/// Log to browser console
macro_rules! console_log {
    ($($t:tt)*) => {
        web_sys::console::log_1(&format!($($t)*).into())
    }
}

/// Warn in browser console
macro_rules! console_warn {
    ($($t:tt)*) => {
        web_sys::console::warn_1(&format!($($t)*).into())
    }
}

/// Error in browser console
macro_rules! console_error {
    ($($t:tt)*) => {
        web_sys::console::error_1(&format!($($t)*).into())
    }
}

mod app;
pub mod audio;
pub mod bindings;
pub mod dom;
pub mod loader;
pub mod pages;

pub use app::run;
pub use loader::{load_image, DEFAULT_TIMEOUT_MS};

const CONFIG_GLOBAL: &str = "FLIPBOOK_CONFIG";
const MANUAL_START_GLOBAL: &str = "FLIPBOOK_MANUAL_START";

/// Set the panic hook and boot the viewer unless a manual start was requested.
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let Some(window) = web_sys::window() else {
        return;
    };
    if window_flag(&window, MANUAL_START_GLOBAL) {
        return;
    }
    let config = config_from_window(&window);
    wasm_bindgen_futures::spawn_local(app::run(config));
}

/// Boot the viewer with an explicit configuration object.
///
/// Missing fields take their defaults; `undefined` or `null` means all defaults.
#[wasm_bindgen(js_name = startFlipbook)]
pub fn start_with_config(config: JsValue) -> Result<(), JsValue> {
    let config = if config.is_undefined() || config.is_null() {
        ViewerConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)?
    };
    wasm_bindgen_futures::spawn_local(app::run(config));
    Ok(())
}

fn config_from_window(window: &web_sys::Window) -> ViewerConfig {
    let value = js_sys::Reflect::get(window, &JsValue::from_str(CONFIG_GLOBAL))
        .unwrap_or(JsValue::UNDEFINED);
    if value.is_undefined() || value.is_null() {
        return ViewerConfig::default();
    }
    serde_wasm_bindgen::from_value(value).unwrap_or_else(|e| {
        console_warn!("Ignoring malformed {CONFIG_GLOBAL}: {e}");
        ViewerConfig::default()
    })
}

fn window_flag(window: &web_sys::Window, name: &str) -> bool {
    js_sys::Reflect::get(window, &JsValue::from_str(name))
        .map(|v| v.is_truthy())
        .unwrap_or(false)
}
