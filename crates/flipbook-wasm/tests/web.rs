//! Browser tests. Run with `wasm-pack test --headless --firefox crates/flipbook-wasm`.

#![cfg(target_arch = "wasm32")]

use flipbook::{ElementIds, PageSequence, ViewerConfig, GENERIC_FAILURE_STATUS};
use flipbook_wasm::dom::{post_close, StatusLine};
use flipbook_wasm::{load_image, pages, run};
use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{HtmlButtonElement, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// 1x1 transparent GIF.
const GIF: &str = "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";

/// Minimal `St.PageFlip`: flips and `turnToPage` fire `flip` synchronously,
/// and `init` follows page loading on a timer.
const PAGE_FLIP_STUB: &str = r#"
    window.__flipbookWidgets = window.__flipbookWidgets || 0;
    window.__flipbookWidgetThrows = throws;
    window.St = { PageFlip: class {
        constructor(el, settings) {
            if (window.__flipbookWidgetThrows) throw new Error('widget refused');
            window.__flipbookWidgets += 1;
            window.__flipbookLast = this;
            this.index = 0;
            this.count = 0;
            this.handlers = {};
        }
        on(name, cb) { (this.handlers[name] = this.handlers[name] || []).push(cb); return this; }
        trigger(name) { for (const cb of this.handlers[name] || []) cb({ data: this.index, object: this }); }
        getCurrentPageIndex() { return this.index; }
        loadFromHTML(items) { this.count = items.length; setTimeout(() => this.trigger('init'), 0); }
        turnToPage(i) { this.index = i; this.trigger('flip'); }
        flipNext() { if (this.index + 2 < this.count) { this.index += 2; this.trigger('flip'); } }
        flipPrev() { if (this.index > 0) { this.index = Math.max(0, this.index - 2); this.trigger('flip'); } }
    } };
"#;

fn eval_js(body: &str) -> JsValue {
    Function::new_no_args(body).call0(&JsValue::NULL).unwrap()
}

fn install_page_flip(throws: bool) {
    Function::new_with_args("throws", PAGE_FLIP_STUB)
        .call1(&JsValue::NULL, &JsValue::from_bool(throws))
        .unwrap();
}

fn global_number(name: &str) -> f64 {
    let window = web_sys::window().unwrap();
    Reflect::get(&window, &JsValue::from_str(name))
        .unwrap()
        .as_f64()
        .unwrap_or(0.0)
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

fn manifest_url(body: &str) -> String {
    format!(
        "data:application/json,{}",
        String::from(js_sys::encode_uri_component(body))
    )
}

fn four_page_manifest() -> String {
    let pages = vec![format!("\"{GIF}\""); 4].join(",");
    manifest_url(&format!(r#"{{"title":"Report","pages":[{pages}]}}"#))
}

/// Start counting `flipbook:close` messages that reach the parent window.
fn count_close_messages() {
    eval_js(
        r#"
        if (!window.__flipbookCloseListening) {
            window.__flipbookCloseListening = true;
            window.parent.addEventListener('message', (e) => {
                if (e.data && e.data.type === 'flipbook:close') window.__flipbookCloses += 1;
            });
        }
        window.__flipbookCloses = 0;
        "#,
    );
}

/// Viewer markup with ids under a unique prefix, removed on drop.
struct Fixture {
    root: HtmlElement,
    ids: ElementIds,
}

impl Fixture {
    fn new(prefix: &str) -> Self {
        let document = document();
        let root: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
        let ids = ElementIds {
            status: format!("{prefix}-status"),
            book: format!("{prefix}-book"),
            title: format!("{prefix}-title"),
            prev: format!("{prefix}-prev"),
            next: format!("{prefix}-next"),
            fullscreen: format!("{prefix}-fs"),
            pdf_link: format!("{prefix}-pdf"),
            page_now: format!("{prefix}-now"),
            page_total: format!("{prefix}-total"),
        };
        for (tag, id) in [
            ("div", &ids.status),
            ("div", &ids.book),
            ("h1", &ids.title),
            ("button", &ids.prev),
            ("button", &ids.next),
            ("button", &ids.fullscreen),
            ("a", &ids.pdf_link),
            ("span", &ids.page_now),
            ("span", &ids.page_total),
        ] {
            let el = document.create_element(tag).unwrap();
            el.set_id(id);
            root.append_child(&el).unwrap();
        }
        document.body().unwrap().append_child(&root).unwrap();
        Self { root, ids }
    }

    fn config(&self, manifest_url: String) -> ViewerConfig {
        ViewerConfig {
            manifest_url,
            image_timeout_ms: 2_000,
            close_origin: eval_js("return window.location.origin").as_string().unwrap(),
            ids: self.ids.clone(),
            ..ViewerConfig::default()
        }
    }

    fn element(&self, id: &str) -> HtmlElement {
        document().get_element_by_id(id).unwrap().dyn_into().unwrap()
    }

    fn text(&self, id: &str) -> String {
        self.element(id).text_content().unwrap_or_default()
    }

    fn button(&self, id: &str) -> HtmlButtonElement {
        self.element(id).dyn_into().unwrap()
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        self.root.remove();
    }
}

#[wasm_bindgen_test]
async fn broken_image_resolves_without_dimensions() {
    let img = load_image("data:image/png;base64,not-an-image", 5_000)
        .await
        .unwrap();
    assert_eq!(img.natural_width(), 0);
    assert_eq!(img.natural_height(), 0);
}

#[wasm_bindgen_test]
async fn loaded_image_reports_dimensions() {
    // 1x1 transparent GIF.
    let gif = "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";
    let img = load_image(gif, 5_000).await.unwrap();
    assert_eq!(img.natural_width(), 1);
}

#[wasm_bindgen_test]
async fn unresponsive_url_resolves_after_timeout() {
    // Non-routable address: the request neither loads nor errors quickly.
    let started = now_ms();
    let img = load_image("http://10.255.255.1/never.png", 150).await.unwrap();
    let elapsed = now_ms() - started;
    assert!(elapsed < 2_000.0, "took {elapsed} ms");
    assert_eq!(img.natural_width(), 0);
}

#[wasm_bindgen_test]
fn mount_builds_one_unit_per_physical_page() {
    let document = document();
    let book: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
    let urls: Vec<String> = (1..=4).map(|i| format!("p{i}.webp")).collect();
    let sequence = PageSequence::build(&urls);
    let config = ViewerConfig::default();

    let count = pages::mount(&document, &book, &sequence, &config).unwrap();
    assert_eq!(count, 6);
    assert_eq!(book.query_selector_all(".page").unwrap().length(), 6);
    assert_eq!(book.query_selector_all(".page.filler").unwrap().length(), 2);

    let captions = book.query_selector_all(".inside-cover-subtitle").unwrap();
    let first = captions.get(0).unwrap().text_content().unwrap();
    let last = captions.get(1).unwrap().text_content().unwrap();
    assert_eq!(first, config.front_caption);
    assert_eq!(last, config.back_caption);

    let images = book.query_selector_all(".page:not(.filler) > img").unwrap();
    assert_eq!(images.length(), 4);
    let cover: web_sys::HtmlImageElement = images.get(0).unwrap().dyn_into().unwrap();
    assert_eq!(cover.alt(), "Page 1");
    assert_eq!(cover.get_attribute("loading").as_deref(), Some("eager"));
    assert!(!cover.draggable());
    let last_page: web_sys::HtmlImageElement = images.get(3).unwrap().dyn_into().unwrap();
    assert_eq!(last_page.get_attribute("loading").as_deref(), Some("lazy"));
}

#[wasm_bindgen_test]
fn status_line_hides_when_cleared() {
    let document = document();
    let el: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
    el.set_id("flipbook-test-status");
    document.body().unwrap().append_child(&el).unwrap();

    let status = StatusLine::lookup(&document, "flipbook-test-status");
    status.set("Loading pages…");
    assert_eq!(el.style().get_property_value("display").unwrap(), "block");
    status.set("");
    assert_eq!(el.style().get_property_value("display").unwrap(), "none");
    el.remove();
}

#[wasm_bindgen_test]
async fn startup_reaches_interactive_pager() {
    let fixture = Fixture::new("flipbook-start");
    install_page_flip(false);
    run(fixture.config(four_page_manifest())).await;
    sleep(50).await;

    let ids = &fixture.ids;
    assert_eq!(fixture.text(&ids.title), "Report");
    assert_eq!(fixture.text(&ids.page_now), "1");
    assert_eq!(fixture.text(&ids.page_total), "4");
    assert!(fixture.button(&ids.prev).disabled());
    assert!(!fixture.button(&ids.next).disabled());
    let status = fixture.element(&ids.status);
    assert_eq!(status.style().get_property_value("display").unwrap(), "none");
    let book = fixture.element(&ids.book);
    assert_eq!(book.style().get_property_value("visibility").unwrap(), "visible");
    assert_eq!(book.query_selector_all(".page").unwrap().length(), 6);

    fixture.button(&ids.next).click();
    assert_eq!(fixture.text(&ids.page_now), "2");
}

#[wasm_bindgen_test]
async fn landing_on_back_filler_turns_back_to_last_page() {
    let fixture = Fixture::new("flipbook-landing");
    install_page_flip(false);
    run(fixture.config(four_page_manifest())).await;
    sleep(50).await;

    // The widget reports the back filler; the correction re-enters the flip
    // handler synchronously from inside turnToPage.
    eval_js("const w = window.__flipbookLast; w.index = 5; w.trigger('flip');");

    let ids = &fixture.ids;
    assert_eq!(eval_js("return window.__flipbookLast.index").as_f64(), Some(4.0));
    assert_eq!(fixture.text(&ids.page_now), "4");
    assert!(fixture.button(&ids.next).disabled());
    assert!(!fixture.button(&ids.prev).disabled());
}

#[wasm_bindgen_test]
async fn empty_manifest_never_constructs_widget() {
    let fixture = Fixture::new("flipbook-empty");
    install_page_flip(false);
    let widgets_before = global_number("__flipbookWidgets");

    run(fixture.config(manifest_url(r#"{"title":"Empty","pages":[]}"#))).await;

    let ids = &fixture.ids;
    assert_eq!(fixture.text(&ids.status), "No pages found in manifest.");
    assert_eq!(global_number("__flipbookWidgets"), widgets_before);
    assert_eq!(fixture.element(&ids.book).query_selector_all(".page").unwrap().length(), 0);
}

#[wasm_bindgen_test]
async fn widget_failure_reveals_book_with_generic_status() {
    let fixture = Fixture::new("flipbook-broken");
    install_page_flip(true);
    run(fixture.config(four_page_manifest())).await;
    install_page_flip(false);

    let ids = &fixture.ids;
    assert_eq!(fixture.text(&ids.status), GENERIC_FAILURE_STATUS);
    let book = fixture.element(&ids.book);
    assert_eq!(book.style().get_property_value("visibility").unwrap(), "visible");
}

#[wasm_bindgen_test]
async fn close_message_goes_to_origin_and_wildcard() {
    let window = web_sys::window().unwrap();
    let origin = eval_js("return window.location.origin").as_string().unwrap();

    count_close_messages();
    post_close(&window, &origin);
    sleep(50).await;
    assert_eq!(global_number("__flipbookCloses"), 2.0);

    // A foreign origin drops that copy; the wildcard copy still arrives.
    count_close_messages();
    post_close(&window, "https://example.invalid");
    sleep(50).await;
    assert_eq!(global_number("__flipbookCloses"), 1.0);
}

#[wasm_bindgen_test]
async fn escape_posts_close_even_when_startup_fails() {
    let fixture = Fixture::new("flipbook-escape");
    install_page_flip(false);
    run(fixture.config(manifest_url(r#"{"pages":[]}"#))).await;

    count_close_messages();
    eval_js("window.dispatchEvent(new KeyboardEvent('keydown', { key: 'Escape' }));");
    sleep(50).await;
    // Viewers booted by earlier tests listen too; this one adds both copies.
    assert!(global_number("__flipbookCloses") >= 2.0);
}
