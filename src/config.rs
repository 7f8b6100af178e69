//! Viewer configuration.
//!
//! Every field has a default matching the stock report-card deployment, so an
//! embedding page only needs to override what differs:
//!
//! ```json
//! { "manifestUrl": "books/2024/manifest.json", "ids": { "book": "reader" } }
//! ```

use serde::Deserialize;

use crate::layout::FillerKind;

/// Default per-image load timeout in milliseconds.
pub const DEFAULT_IMAGE_TIMEOUT_MS: u32 = 8000;

/// DOM element ids the viewer looks up. Only `book` is required to exist.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementIds {
    /// Status text element.
    pub status: String,
    /// Book mount element.
    pub book: String,
    /// Title element.
    pub title: String,
    /// "Previous page" button.
    pub prev: String,
    /// "Next page" button.
    pub next: String,
    /// Fullscreen toggle button.
    pub fullscreen: String,
    /// Link to the original PDF.
    pub pdf_link: String,
    /// Current page counter.
    pub page_now: String,
    /// Total page counter.
    pub page_total: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            status: "status".into(),
            book: "book".into(),
            title: "bookTitle".into(),
            prev: "prevBtn".into(),
            next: "nextBtn".into(),
            fullscreen: "fsBtn".into(),
            pdf_link: "pdfLink".into(),
            page_now: "pageNow".into(),
            page_total: "pageTotal".into(),
        }
    }
}

/// Viewer configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    /// Manifest location, fetched with caching disabled.
    pub manifest_url: String,
    /// Logo shown on filler pages.
    pub logo_url: String,
    /// Alt text of the filler logo.
    pub logo_alt: String,
    /// Page-flip sound clip.
    pub sound_url: String,
    /// Number of pooled sound clips (at least 2 are used).
    pub sound_pool_size: usize,
    /// Clip volume in `[0, 1]`.
    pub sound_volume: f64,
    /// Timeout for the first-page image load, in milliseconds.
    pub image_timeout_ms: u32,
    /// Number of leading physical pages whose images load eagerly.
    pub eager_pages: usize,
    /// Media query that selects the lighter mobile settings.
    pub mobile_query: String,
    /// Origin of the embedding page that receives the close message.
    pub close_origin: String,
    /// Caption of the inside-cover filler.
    pub front_caption: String,
    /// Caption of the inside-back filler.
    pub back_caption: String,
    /// DOM element ids.
    pub ids: ElementIds,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            manifest_url: "manifest.json".into(),
            logo_url: "assets/logo.png".into(),
            logo_alt: "BASIC logo".into(),
            sound_url: "assets/sounds/page-flip.wav".into(),
            sound_pool_size: 3,
            sound_volume: 0.35,
            image_timeout_ms: DEFAULT_IMAGE_TIMEOUT_MS,
            eager_pages: 4,
            mobile_query: "(max-width: 640px)".into(),
            close_origin: "https://www.borregobasic.org".into(),
            front_caption: "Report Card".into(),
            back_caption: "Thank you for supporting local students".into(),
            ids: ElementIds::default(),
        }
    }
}

impl ViewerConfig {
    /// Parse a JSON configuration, filling missing fields with defaults.
    pub fn from_json(body: &str) -> crate::Result<Self> {
        serde_json::from_str(body).map_err(crate::FlipbookError::Config)
    }

    /// Caption for a filler page.
    pub fn caption(&self, kind: FillerKind) -> &str {
        match kind {
            FillerKind::Front => &self.front_caption,
            FillerKind::Back => &self.back_caption,
        }
    }

    /// Sound volume clamped to the valid range.
    pub fn clamped_volume(&self) -> f64 {
        self.sound_volume.clamp(0.0, 1.0)
    }
}
