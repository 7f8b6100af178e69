//! DOM page units handed to the widget.

use flipbook::{FillerKind, PageSequence, PageSlot, PhysicalPage, ViewerConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlImageElement};

use crate::loader::decode_quietly;

/// Class shared by every page unit; the widget loads `.page` children.
pub const PAGE_CLASS: &str = "page";

/// `<div class="page"><img …></div>` for a cover or real page.
pub fn image_page(
    document: &Document,
    url: &str,
    alt: &str,
    eager: bool,
) -> Result<HtmlElement, JsValue> {
    let page = div(document, PAGE_CLASS)?;

    let img: HtmlImageElement = document.create_element("img")?.dyn_into()?;
    img.set_src(url);
    img.set_alt(alt);
    img.set_draggable(false);
    img.set_attribute("decoding", "async")?;
    img.set_attribute("loading", if eager { "eager" } else { "lazy" })?;
    decode_quietly(&img);

    page.append_child(&img)?;
    Ok(page)
}

/// Logo page with a caption, used for both fillers.
pub fn filler_page(
    document: &Document,
    logo_url: &str,
    logo_alt: &str,
    caption: &str,
) -> Result<HtmlElement, JsValue> {
    let page = div(document, "page filler")?;
    let inner = div(document, "inside-cover")?;

    let logo: HtmlImageElement = document.create_element("img")?.dyn_into()?;
    logo.set_src(logo_url);
    logo.set_alt(logo_alt);
    logo.set_draggable(false);
    logo.set_attribute("decoding", "async")?;

    let subtitle = div(document, "inside-cover-subtitle")?;
    subtitle.set_text_content(Some(caption));

    inner.append_child(&logo)?;
    inner.append_child(&subtitle)?;
    page.append_child(&inner)?;
    Ok(page)
}

/// Materialize one slot of the sequence.
pub fn page_unit(
    document: &Document,
    slot: &PageSlot<'_>,
    config: &ViewerConfig,
) -> Result<HtmlElement, JsValue> {
    let kind = match slot.page {
        PhysicalPage::Cover { url } | PhysicalPage::RealPage { url, .. } => {
            return image_page(document, url, &slot.alt_text(), slot.eager);
        }
        PhysicalPage::FillerFront => FillerKind::Front,
        PhysicalPage::FillerBack => FillerKind::Back,
    };
    filler_page(
        document,
        &config.logo_url,
        &config.logo_alt,
        config.caption(kind),
    )
}

/// Replace the contents of `book` with the sequence's page units.
pub fn mount(
    document: &Document,
    book: &HtmlElement,
    sequence: &PageSequence,
    config: &ViewerConfig,
) -> Result<usize, JsValue> {
    book.set_inner_html("");
    for slot in sequence.slots(config.eager_pages) {
        let unit = page_unit(document, &slot, config)?;
        book.append_child(&unit)?;
    }
    Ok(sequence.len())
}

fn div(document: &Document, class: &str) -> Result<HtmlElement, JsValue> {
    let el: HtmlElement = document.create_element("div")?.dyn_into()?;
    el.set_class_name(class);
    Ok(el)
}
