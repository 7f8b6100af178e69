//! Timeout-bounded image loading.
//!
//! [`load_image`] never fails because of the image itself: load, error and
//! timeout all resolve with the element, and callers read
//! `natural_width()`/`natural_height()` as possibly zero.

use std::cell::Cell;
use std::rc::Rc;

use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlImageElement;

pub use flipbook::config::DEFAULT_IMAGE_TIMEOUT_MS as DEFAULT_TIMEOUT_MS;

/// Load `url` into a fresh `<img>`, resolving after load, error or `timeout_ms`,
/// whichever happens first.
///
/// Returns `Err` only when no image element or timer can be created.
pub async fn load_image(url: &str, timeout_ms: u32) -> Result<HtmlImageElement, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let img = HtmlImageElement::new()?;
    img.set_attribute("decoding", "async")?;

    let mut setup_error = None;
    let promise = Promise::new(&mut |resolve: Function, _reject: Function| {
        // Load and error can race the timer, and a cached image can complete
        // synchronously; only the first of them may resolve.
        let done = Rc::new(Cell::new(false));
        let timer = Rc::new(Cell::new(None::<i32>));
        let finish: Rc<dyn Fn()> = {
            let done = Rc::clone(&done);
            let timer = Rc::clone(&timer);
            let window = window.clone();
            let img = img.clone();
            Rc::new(move || {
                if done.replace(true) {
                    return;
                }
                if let Some(handle) = timer.take() {
                    window.clear_timeout_with_handle(handle);
                }
                img.set_onload(None);
                img.set_onerror(None);
                let _ = resolve.call1(&JsValue::UNDEFINED, &img);
            })
        };

        let on_timeout = {
            let finish = Rc::clone(&finish);
            Closure::once_into_js(move || finish())
        };
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            on_timeout.unchecked_ref(),
            i32::try_from(timeout_ms).unwrap_or(i32::MAX),
        ) {
            Ok(handle) => timer.set(Some(handle)),
            Err(e) => {
                setup_error = Some(e);
                finish();
                return;
            }
        }

        let on_load = {
            let finish = Rc::clone(&finish);
            Closure::once_into_js(move || finish())
        };
        let on_error = {
            let finish = Rc::clone(&finish);
            Closure::once_into_js(move || finish())
        };
        img.set_onload(Some(on_load.unchecked_ref()));
        img.set_onerror(Some(on_error.unchecked_ref()));

        // Handlers go on before src.
        img.set_src(url);

        if img.complete() {
            finish();
        }
    });

    if let Some(e) = setup_error {
        return Err(e);
    }
    // The promise only ever resolves.
    let _ = JsFuture::from(promise).await;
    Ok(img)
}

/// Start a background load for the preload cache. Decoding failures are ignored.
pub fn preload_image(url: &str) -> Option<HtmlImageElement> {
    let img = HtmlImageElement::new().ok()?;
    let _ = img.set_attribute("decoding", "async");
    img.set_src(url);
    decode_quietly(&img);
    Some(img)
}

/// Ask the browser to decode `img` off the main thread, discarding the outcome.
pub fn decode_quietly(img: &HtmlImageElement) {
    let decoding = img.decode();
    wasm_bindgen_futures::spawn_local(async move {
        let _ = JsFuture::from(decoding).await;
    });
}
