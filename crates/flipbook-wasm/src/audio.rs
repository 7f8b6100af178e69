//! `<audio>` clips for the flip sound and the one-time unlock gesture.

use std::cell::RefCell;
use std::rc::Rc;

use flipbook::sound::{pool_size, SoundClip, SoundError, SoundPlayer};
use flipbook::ViewerConfig;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AddEventListenerOptions, HtmlAudioElement, Window};

use crate::bindings::js_error_text;

/// First-gesture events that count as an unlock.
const UNLOCK_EVENTS: [&str; 3] = ["pointerdown", "touchstart", "click"];

/// Sound player over browser audio clips.
pub type FlipSound = SoundPlayer<AudioClip>;

/// One pooled `<audio>` element.
pub struct AudioClip {
    element: HtmlAudioElement,
}

impl AudioClip {
    /// Create a preloading clip at the given volume.
    pub fn new(src: &str, volume: f64) -> Result<Self, JsValue> {
        let element = HtmlAudioElement::new_with_src(src)?;
        element.set_preload("auto");
        element.set_volume(volume);
        Ok(Self { element })
    }

    /// Underlying element.
    pub fn element(&self) -> &HtmlAudioElement {
        &self.element
    }

    fn start(&self) -> Result<JsFuture, SoundError> {
        self.element
            .play()
            .map(JsFuture::from)
            .map_err(|e| SoundError::Rejected(js_error_text(&e)))
    }
}

impl SoundClip for AudioClip {
    fn pause(&mut self) -> Result<(), SoundError> {
        self.element
            .pause()
            .map_err(|e| SoundError::Rejected(js_error_text(&e)))
    }

    fn rewind(&mut self) -> Result<(), SoundError> {
        self.element.set_current_time(0.0);
        Ok(())
    }

    fn set_playback_rate(&mut self, rate: f64) -> Result<(), SoundError> {
        self.element.set_playback_rate(rate);
        Ok(())
    }

    fn play(&mut self) -> Result<(), SoundError> {
        let playing = self.start()?;
        // Autoplay rejections arrive asynchronously and are dropped.
        wasm_bindgen_futures::spawn_local(async move {
            let _ = playing.await;
        });
        Ok(())
    }

    fn prime(&mut self) -> Result<(), SoundError> {
        let playing = self.start()?;
        let element = self.element.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if playing.await.is_ok() {
                let _ = element.pause();
                element.set_current_time(0.0);
            }
        });
        Ok(())
    }
}

/// Build the clip pool described by `config`. Clips that cannot be created
/// are skipped; an empty pool simply stays silent.
pub fn flip_sound(config: &ViewerConfig) -> Rc<RefCell<FlipSound>> {
    let volume = config.clamped_volume();
    let clips = (0..pool_size(config.sound_pool_size))
        .filter_map(|_| AudioClip::new(&config.sound_url, volume).ok())
        .collect();
    Rc::new(RefCell::new(SoundPlayer::new(clips, js_sys::Math::random)))
}

/// Unlock `sound` on the first pointer, touch or click anywhere in the window.
pub fn install_unlock(window: &Window, sound: &Rc<RefCell<FlipSound>>) {
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    options.set_passive(true);

    for event in UNLOCK_EVENTS {
        let sound = Rc::clone(sound);
        let unlock = Closure::<dyn FnMut()>::new(move || {
            if let Ok(mut sound) = sound.try_borrow_mut() {
                let _ = sound.unlock();
            }
        });
        if let Err(e) = window.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            unlock.as_ref().unchecked_ref(),
            &options,
        ) {
            console_warn!("Could not listen for {event}: {}", js_error_text(&e));
        }
        unlock.forget();
    }
}
