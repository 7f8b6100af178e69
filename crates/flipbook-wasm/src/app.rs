//! Startup sequence and event wiring.

use std::cell::RefCell;
use std::rc::Rc;

use flipbook::controller::LOADING_STATUS;
use flipbook::{
    BookPlan, Effect, FlipbookController, FlipbookError, Key, Manifest, PreloadCache, Result,
    Startup, StartupPhase, ViewerConfig,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlImageElement, KeyboardEvent, RequestCache, RequestInit, Response, Window};

use crate::audio::{self, FlipSound};
use crate::bindings::{self, js_error_text, PageFlip};
use crate::dom::{self, StatusLine, ViewerElements};
use crate::loader::{load_image, preload_image};
use crate::pages;

/// Boot one viewer. Never returns an error: failures end up in the status line
/// and the console.
pub async fn run(config: ViewerConfig) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    // Both work even if the book never starts.
    install_close_key(&window, config.close_origin.clone());
    let sound = audio::flip_sound(&config);
    audio::install_unlock(&window, &sound);

    let status = StatusLine::lookup(&document, &config.ids.status);
    let startup = Rc::new(RefCell::new(Startup::new()));

    let ctx = Context {
        window,
        document,
        config,
        sound,
    };
    if let Err(err) = start(&ctx, &startup).await {
        let msg = startup.borrow_mut().fail(&err);
        console_error!("Flipbook startup failed: {err}");
        if !err.is_expected() {
            dom::reveal_by_id(&ctx.document, &ctx.config.ids.book);
        }
        status.set(&msg);
    }
}

struct Context {
    window: Window,
    document: Document,
    config: ViewerConfig,
    sound: Rc<RefCell<FlipSound>>,
}

async fn start(ctx: &Context, startup: &Rc<RefCell<Startup>>) -> Result<()> {
    let advance = |phase: StartupPhase| startup.borrow_mut().advance(phase);

    let elements = ViewerElements::lookup(&ctx.document, &ctx.config.ids)?;
    if !bindings::page_flip_available(&ctx.window) {
        return Err(FlipbookError::LibraryMissing);
    }

    advance(StartupPhase::Fetching)?;
    let manifest = fetch_manifest(&ctx.window, &ctx.config.manifest_url).await?;
    console_log!(
        "Manifest loaded: \"{}\" ({} pages)",
        manifest.display_title(),
        manifest.page_count()
    );
    elements.show_title(&ctx.document, &manifest);
    elements.show_pdf_link(&manifest);

    advance(StartupPhase::PreloadingFirstPage)?;
    elements.status.set(LOADING_STATUS);
    let first = load_image(&manifest.pages()[0], ctx.config.image_timeout_ms)
        .await
        .map_err(|e| FlipbookError::Dom(js_error_text(&e)))?;

    advance(StartupPhase::Building)?;
    let mobile = dom::media_matches(&ctx.window, &ctx.config.mobile_query);
    let plan = BookPlan::new(
        &manifest,
        first.natural_width(),
        first.natural_height(),
        mobile,
    );
    elements.set_book_visible(false);
    pages::mount(&ctx.document, &elements.book, &plan.sequence, &ctx.config)
        .map_err(|e| FlipbookError::Dom(js_error_text(&e)))?;

    advance(StartupPhase::WidgetInit)?;
    let widget = PageFlip::mount(&elements.book, &plan.settings)?;
    console_log!(
        "PageFlip ready: {} physical pages, {}x{} base",
        plan.sequence.len(),
        plan.geometry.width,
        plan.geometry.height
    );

    let session = Rc::new(Session {
        controller: FlipbookController::new(&manifest, &plan.sequence),
        widget,
        elements,
        document: ctx.document.clone(),
        sound: Rc::clone(&ctx.sound),
        preload: RefCell::new(PreloadCache::new()),
    });
    session.subscribe(startup);
    session.widget.load_pages(&session.elements.book)?;
    session.apply(session.controller.on_widget_ready());
    session.wire_inputs(&ctx.window);
    Ok(())
}

async fn fetch_manifest(window: &Window, url: &str) -> Result<Manifest> {
    let fetch_error = |e: JsValue| FlipbookError::ManifestFetch {
        url: url.to_string(),
        reason: js_error_text(&e),
    };

    let init = RequestInit::new();
    init.set_method("GET");
    init.set_cache(RequestCache::NoStore);

    let response: Response = JsFuture::from(window.fetch_with_str_and_init(url, &init))
        .await
        .map_err(fetch_error)?
        .dyn_into()
        .map_err(fetch_error)?;
    if !response.ok() {
        return Err(FlipbookError::ManifestStatus {
            url: url.to_string(),
            status: response.status(),
        });
    }

    let body = JsFuture::from(response.text().map_err(fetch_error)?)
        .await
        .map_err(fetch_error)?
        .as_string()
        .unwrap_or_default();
    Manifest::parse(url, &body)
}

/// State of a running viewer, shared by every event handler.
struct Session {
    controller: FlipbookController,
    widget: PageFlip,
    elements: ViewerElements,
    document: Document,
    sound: Rc<RefCell<FlipSound>>,
    preload: RefCell<PreloadCache<Option<HtmlImageElement>>>,
}

impl Session {
    /// Apply effects in order. No borrow is held across a widget call, so a
    /// `flip` emitted synchronously by `turnToPage` can re-enter safely.
    fn apply(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::PlayFlipSound => {
                    if let Ok(mut sound) = self.sound.try_borrow_mut() {
                        let _ = sound.play_flip();
                    }
                }
                Effect::TurnToPage(index) => self.widget.turn_to_page(index as u32),
                Effect::FlipNext => self.widget.flip_next(),
                Effect::FlipPrev => self.widget.flip_prev(),
                Effect::ShowPage(page) => self.elements.show_page(page),
                Effect::ShowTotal(total) => self.elements.show_total(total),
                Effect::SetNavigation {
                    prev_disabled,
                    next_disabled,
                } => self.elements.set_navigation(prev_disabled, next_disabled),
                Effect::Preload(url) => {
                    self.preload.borrow_mut().warm(&url, preload_image);
                }
                Effect::SetStatus(msg) => self.elements.status.set(&msg),
                Effect::RevealBook => self.elements.set_book_visible(true),
                Effect::ToggleFullscreen => {
                    let document = self.document.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        if let Err(e) = dom::toggle_fullscreen(&document).await {
                            console_warn!("Fullscreen toggle failed: {}", js_error_text(&e));
                        }
                    });
                }
            }
        }
    }

    /// Both handlers are `Fn`: `turnToPage` inside `apply` fires `flip` again
    /// before the outer call returns, and wasm-bindgen rejects re-entering an
    /// `FnMut` closure.
    fn subscribe(self: &Rc<Self>, startup: &Rc<RefCell<Startup>>) {
        let session = Rc::clone(self);
        let on_flip = Closure::<dyn Fn(JsValue)>::new(move |_event: JsValue| {
            let effects = session.controller.on_flip(session.widget.current());
            session.apply(effects);
        });
        self.widget.on("flip", on_flip.as_ref().unchecked_ref());
        on_flip.forget();

        let session = Rc::clone(self);
        let startup = Rc::clone(startup);
        let on_init = Closure::<dyn Fn(JsValue)>::new(move |_event: JsValue| {
            if let Err(e) = startup.borrow_mut().advance(StartupPhase::Interactive) {
                console_warn!("{e}");
            }
            let effects = session.controller.on_init(session.widget.current());
            session.apply(effects);
        });
        self.widget.on("init", on_init.as_ref().unchecked_ref());
        on_init.forget();
    }

    fn wire_inputs(self: &Rc<Self>, window: &Window) {
        let click = |target: Option<&web_sys::HtmlElement>,
                     handler: fn(&Session) -> Vec<Effect>| {
            let Some(target) = target else {
                return;
            };
            let session = Rc::clone(self);
            let cb = Closure::<dyn Fn()>::new(move || {
                let effects = handler(&session);
                session.apply(effects);
            });
            let _ = target.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref());
            cb.forget();
        };
        click(self.elements.prev.as_deref(), |s| s.controller.on_prev_clicked());
        click(self.elements.next.as_deref(), |s| {
            s.controller.on_next_clicked(s.widget.current())
        });
        click(self.elements.fullscreen.as_ref(), |s| {
            s.controller.on_fullscreen_clicked()
        });

        let session = Rc::clone(self);
        let on_key = Closure::<dyn Fn(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            let Some(key) = Key::from_key_name(&event.key()) else {
                return;
            };
            let effects = session.controller.on_key(key, session.widget.current());
            session.apply(effects);
        });
        let _ = window.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref());
        on_key.forget();
    }
}

/// Escape asks an embedding page to close the viewer.
fn install_close_key(window: &Window, origin: String) {
    let target = window.clone();
    let on_key = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        if Key::from_key_name(&event.key()) == Some(Key::Escape) {
            dom::post_close(&target, &origin);
        }
    });
    let _ = window.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref());
    on_key.forget();
}
