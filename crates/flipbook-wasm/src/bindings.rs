//! Bindings for the `St.PageFlip` widget (StPageFlip, loaded as a global script).

use flipbook::{FlipbookError, FlipSettings, Result};
use js_sys::{Array, Function, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, Window};

/// Page loaders tried in order; older builds spell the method `loadFromHtml`.
const HTML_LOADERS: [&str; 2] = ["loadFromHTML", "loadFromHtml"];

#[wasm_bindgen]
extern "C" {
    /// A `St.PageFlip` instance.
    #[wasm_bindgen(js_namespace = St)]
    #[derive(Debug, Clone)]
    pub type PageFlip;

    /// Construct the widget inside `element`.
    #[wasm_bindgen(constructor, js_namespace = St, catch)]
    pub fn new(element: &HtmlElement, settings: &JsValue) -> std::result::Result<PageFlip, JsValue>;

    /// Physical index of the page currently shown.
    #[wasm_bindgen(method, js_name = getCurrentPageIndex)]
    pub fn current_page_index(this: &PageFlip) -> u32;

    /// Jump to a physical page without animation.
    #[wasm_bindgen(method, js_name = turnToPage)]
    pub fn turn_to_page(this: &PageFlip, index: u32);

    /// Animate a flip forward.
    #[wasm_bindgen(method, js_name = flipNext)]
    pub fn flip_next(this: &PageFlip);

    /// Animate a flip backward.
    #[wasm_bindgen(method, js_name = flipPrev)]
    pub fn flip_prev(this: &PageFlip);

    /// Subscribe to a widget event (`"init"`, `"flip"`, ...).
    #[wasm_bindgen(method)]
    pub fn on(this: &PageFlip, event: &str, callback: &Function);
}

/// Whether `window.St.PageFlip` exists and is callable.
pub fn page_flip_available(window: &Window) -> bool {
    Reflect::get(window, &JsValue::from_str("St"))
        .ok()
        .filter(|st| st.is_object())
        .and_then(|st| Reflect::get(&st, &JsValue::from_str("PageFlip")).ok())
        .is_some_and(|ctor| ctor.is_function())
}

impl PageFlip {
    /// Construct the widget with serialized settings.
    pub fn mount(element: &HtmlElement, settings: &FlipSettings) -> Result<PageFlip> {
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let settings = settings
            .serialize(&serializer)
            .map_err(|e| FlipbookError::Widget(format!("settings: {e}")))?;
        PageFlip::new(element, &settings).map_err(|e| FlipbookError::Widget(js_error_text(&e)))
    }

    /// Physical index of the current page as a `usize`.
    pub fn current(&self) -> usize {
        self.current_page_index() as usize
    }

    /// Hand the `.page` children of `book` to the widget.
    pub fn load_pages(&self, book: &HtmlElement) -> Result<usize> {
        let nodes = book
            .query_selector_all(".page")
            .map_err(|e| FlipbookError::Dom(js_error_text(&e)))?;
        let items = Array::from(&nodes);

        let loader = HTML_LOADERS
            .iter()
            .find_map(|name| {
                Reflect::get(self, &JsValue::from_str(name))
                    .ok()
                    .and_then(|f| f.dyn_into::<Function>().ok())
            })
            .ok_or_else(|| {
                FlipbookError::Widget("no HTML loader found on PageFlip instance".into())
            })?;

        loader
            .call1(self, &items)
            .map_err(|e| FlipbookError::Widget(js_error_text(&e)))?;
        Ok(items.length() as usize)
    }
}

/// Best readable text for a thrown JS value.
pub fn js_error_text(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
