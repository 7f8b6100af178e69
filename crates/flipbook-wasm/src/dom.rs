//! Viewer chrome: status line, counters, buttons, fullscreen and frame messaging.

use flipbook::{ElementIds, FlipbookError, Manifest, Result};
use js_sys::{Function, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlAnchorElement, HtmlButtonElement, HtmlElement, Window};

use crate::bindings::js_error_text;

/// Message type understood by the embedding page.
pub const CLOSE_MESSAGE_TYPE: &str = "flipbook:close";

fn element<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id)?.dyn_into().ok()
}

/// Status text element. Missing elements make every call a no-op.
#[derive(Debug, Clone, Default)]
pub struct StatusLine(Option<HtmlElement>);

impl StatusLine {
    /// Look up the status element.
    pub fn lookup(document: &Document, id: &str) -> Self {
        Self(element(document, id))
    }

    /// Show `msg`, or hide the line when `msg` is empty.
    pub fn set(&self, msg: &str) {
        let Some(el) = &self.0 else {
            return;
        };
        el.set_text_content(Some(msg));
        let display = if msg.is_empty() { "none" } else { "block" };
        let _ = el.style().set_property("display", display);
    }
}

/// Elements the viewer drives. Only `book` is required.
#[derive(Debug, Clone)]
pub struct ViewerElements {
    /// Status line.
    pub status: StatusLine,
    /// Book mount point.
    pub book: HtmlElement,
    /// Title heading.
    pub title: Option<HtmlElement>,
    /// "Previous" button.
    pub prev: Option<HtmlButtonElement>,
    /// "Next" button.
    pub next: Option<HtmlButtonElement>,
    /// Fullscreen button.
    pub fullscreen: Option<HtmlElement>,
    /// Original-PDF link.
    pub pdf_link: Option<HtmlAnchorElement>,
    /// Current page counter.
    pub page_now: Option<HtmlElement>,
    /// Total page counter.
    pub page_total: Option<HtmlElement>,
}

impl ViewerElements {
    /// Look up every element; fails only when the book mount is missing.
    pub fn lookup(document: &Document, ids: &ElementIds) -> Result<Self> {
        let book = element(document, &ids.book).ok_or_else(|| FlipbookError::MissingMount {
            id: ids.book.clone(),
        })?;
        Ok(Self {
            status: StatusLine::lookup(document, &ids.status),
            book,
            title: element(document, &ids.title),
            prev: element(document, &ids.prev),
            next: element(document, &ids.next),
            fullscreen: element(document, &ids.fullscreen),
            pdf_link: element(document, &ids.pdf_link),
            page_now: element(document, &ids.page_now),
            page_total: element(document, &ids.page_total),
        })
    }

    /// Show the manifest title in the document and the heading.
    pub fn show_title(&self, document: &Document, manifest: &Manifest) {
        let title = manifest.display_title();
        document.set_title(title);
        if let Some(el) = &self.title {
            el.set_text_content(Some(title));
        }
    }

    /// Point the PDF link at the original document, or hide it.
    pub fn show_pdf_link(&self, manifest: &Manifest) {
        let Some(link) = &self.pdf_link else {
            return;
        };
        match manifest.original_pdf() {
            Some(href) => {
                link.set_href(href);
                link.set_hidden(false);
            }
            None => link.set_hidden(true),
        }
    }

    /// Hide or reveal the book container.
    pub fn set_book_visible(&self, visible: bool) {
        let visibility = if visible { "visible" } else { "hidden" };
        let _ = self.book.style().set_property("visibility", visibility);
    }

    /// Current page counter (1-based).
    pub fn show_page(&self, page: usize) {
        if let Some(el) = &self.page_now {
            el.set_text_content(Some(&page.to_string()));
        }
    }

    /// Total page counter.
    pub fn show_total(&self, total: usize) {
        if let Some(el) = &self.page_total {
            el.set_text_content(Some(&total.to_string()));
        }
    }

    /// Enable or disable the navigation buttons.
    pub fn set_navigation(&self, prev_disabled: bool, next_disabled: bool) {
        if let Some(btn) = &self.prev {
            btn.set_disabled(prev_disabled);
        }
        if let Some(btn) = &self.next {
            btn.set_disabled(next_disabled);
        }
    }
}

/// Reveal the element with `id` if it exists. Used after unexpected failures
/// so a half-built book is not left hidden.
pub fn reveal_by_id(document: &Document, id: &str) {
    if let Some(el) = element::<HtmlElement>(document, id) {
        let _ = el.style().set_property("visibility", "visible");
    }
}

/// Whether `query` matches, e.g. `(max-width: 640px)`.
pub fn media_matches(window: &Window, query: &str) -> bool {
    matches!(window.match_media(query), Ok(Some(list)) if list.matches())
}

/// Enter fullscreen on the document element, or leave it if already active.
pub async fn toggle_fullscreen(document: &Document) -> std::result::Result<(), JsValue> {
    let pending = if document.fullscreen_element().is_some() {
        call_method(document, "exitFullscreen")?
    } else {
        let root = document
            .document_element()
            .ok_or_else(|| JsValue::from_str("no document element"))?;
        call_method(&root, "requestFullscreen")?
    };
    if let Some(promise) = pending {
        JsFuture::from(promise).await?;
    }
    Ok(())
}

/// Call a zero-argument method and return its promise, if it returned one.
fn call_method(target: &JsValue, name: &str) -> std::result::Result<Option<Promise>, JsValue> {
    let method: Function = Reflect::get(target, &JsValue::from_str(name))?
        .dyn_into()
        .map_err(|_| JsValue::from_str(&format!("{name} is not supported")))?;
    let result = method.call0(target)?;
    Ok(result.dyn_into::<Promise>().ok())
}

#[derive(Serialize)]
struct CloseMessage {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Ask the embedding page to close the viewer: once to `origin`, once to any origin.
pub fn post_close(window: &Window, origin: &str) {
    let Ok(Some(parent)) = window.parent() else {
        return;
    };
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    let Ok(message) = (CloseMessage {
        kind: CLOSE_MESSAGE_TYPE,
    })
    .serialize(&serializer) else {
        return;
    };
    for target in [origin, "*"] {
        // A malformed origin throws; the wildcard post still goes out.
        if let Err(e) = parent.post_message(&message, target) {
            console_warn!("postMessage to {target} failed: {}", js_error_text(&e));
        }
    }
}
