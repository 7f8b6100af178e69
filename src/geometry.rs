//! Book sizing and page-flip widget settings.

use serde::Serialize;

/// Height / width ratio used when the first page reports no dimensions (US Letter).
pub const FALLBACK_RATIO: f64 = 11.0 / 8.5;
/// Base width assumed when the first page reports no width.
pub const FALLBACK_WIDTH: u32 = 1200;
/// Upper bound on the base page width.
pub const MAX_BASE_WIDTH: u32 = 1400;
/// Smallest page width the widget may stretch down to.
pub const MIN_PAGE_WIDTH: u32 = 320;
/// Largest page width the widget may stretch up to.
pub const MAX_PAGE_WIDTH: u32 = 2500;

/// Flip animation length on desktop, in milliseconds.
pub const FLIPPING_TIME_DESKTOP_MS: u32 = 700;
/// Shorter flip animation used on small screens.
pub const FLIPPING_TIME_MOBILE_MS: u32 = 520;

/// Page dimensions derived from the first page image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookGeometry {
    /// Height divided by width.
    pub ratio: f64,
    /// Base page width in pixels.
    pub width: u32,
    /// Base page height in pixels.
    pub height: u32,
}

impl BookGeometry {
    /// Compute geometry from the natural size of the first page.
    ///
    /// Either dimension may be zero when the image failed or timed out; the
    /// fallback ratio and width are used in that case.
    pub fn from_natural_size(natural_width: u32, natural_height: u32) -> Self {
        let ratio = if natural_width > 0 && natural_height > 0 {
            f64::from(natural_height) / f64::from(natural_width)
        } else {
            FALLBACK_RATIO
        };
        let width = if natural_width > 0 {
            natural_width
        } else {
            FALLBACK_WIDTH
        }
        .min(MAX_BASE_WIDTH);

        Self {
            ratio,
            width,
            height: scale(width, ratio),
        }
    }

    /// Widget settings for this geometry.
    pub fn settings(&self, mobile: bool) -> FlipSettings {
        FlipSettings {
            width: self.width,
            height: self.height,
            size: "stretch",
            min_width: MIN_PAGE_WIDTH,
            max_width: MAX_PAGE_WIDTH,
            min_height: scale(MIN_PAGE_WIDTH, self.ratio),
            max_height: scale(MAX_PAGE_WIDTH, self.ratio),
            draw_shadow: !mobile,
            flipping_time: if mobile {
                FLIPPING_TIME_MOBILE_MS
            } else {
                FLIPPING_TIME_DESKTOP_MS
            },
            use_portrait: true,
            // A soft cover; `showCover: true` would make it a hard page.
            show_cover: false,
            mobile_scroll_support: true,
        }
    }
}

impl Default for BookGeometry {
    fn default() -> Self {
        Self::from_natural_size(0, 0)
    }
}

fn scale(width: u32, ratio: f64) -> u32 {
    (f64::from(width) * ratio).round() as u32
}

/// Settings object passed to the `St.PageFlip` constructor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlipSettings {
    /// Base page width.
    pub width: u32,
    /// Base page height.
    pub height: u32,
    /// Sizing mode; always `"stretch"` so the book fits its container.
    pub size: &'static str,
    /// Minimum page width.
    pub min_width: u32,
    /// Maximum page width.
    pub max_width: u32,
    /// Minimum page height.
    pub min_height: u32,
    /// Maximum page height.
    pub max_height: u32,
    /// Draw page shadows (disabled on mobile for performance).
    pub draw_shadow: bool,
    /// Flip animation duration in milliseconds.
    pub flipping_time: u32,
    /// Allow single-page portrait mode.
    pub use_portrait: bool,
    /// Render the first page as a hard cover.
    pub show_cover: bool,
    /// Let vertical swipes scroll the page on touch devices.
    pub mobile_scroll_support: bool,
}
