//! Startup state machine and flip event handling.
//!
//! The controller never touches the host directly. Each handler takes the
//! widget's current physical index and returns the [`Effect`]s to apply, in
//! order. The browser layer applies them after releasing any borrow of the
//! controller, which matters because [`Effect::TurnToPage`] makes the widget
//! emit a `flip` synchronously and re-enter [`FlipbookController::on_flip`].

use crate::geometry::{BookGeometry, FlipSettings};
use crate::layout::{PageMap, PageSequence};
use crate::manifest::Manifest;
use crate::{FlipbookError, Result};

/// Status text shown while the first page loads.
pub const LOADING_STATUS: &str = "Loading pages…";

/// Phases of viewer startup, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartupPhase {
    /// Checking for the widget library and mount element.
    #[default]
    Init,
    /// Fetching and parsing the manifest.
    Fetching,
    /// Loading the first page to learn its aspect ratio.
    PreloadingFirstPage,
    /// Building page units and geometry.
    Building,
    /// Constructing the widget and waiting for its `init` event.
    WidgetInit,
    /// Steady state: flips and navigation.
    Interactive,
    /// Startup failed. Terminal.
    Error,
}

impl StartupPhase {
    /// Short name for logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            StartupPhase::Init => "init",
            StartupPhase::Fetching => "fetching",
            StartupPhase::PreloadingFirstPage => "preloading-first-page",
            StartupPhase::Building => "building",
            StartupPhase::WidgetInit => "widget-init",
            StartupPhase::Interactive => "interactive",
            StartupPhase::Error => "error",
        }
    }

    fn successor(self) -> Option<StartupPhase> {
        match self {
            StartupPhase::Init => Some(StartupPhase::Fetching),
            StartupPhase::Fetching => Some(StartupPhase::PreloadingFirstPage),
            StartupPhase::PreloadingFirstPage => Some(StartupPhase::Building),
            StartupPhase::Building => Some(StartupPhase::WidgetInit),
            StartupPhase::WidgetInit => Some(StartupPhase::Interactive),
            StartupPhase::Interactive | StartupPhase::Error => None,
        }
    }
}

/// Tracks startup progress and enforces strict phase order.
#[derive(Debug, Default)]
pub struct Startup {
    phase: StartupPhase,
}

impl Startup {
    /// Start in [`StartupPhase::Init`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> StartupPhase {
        self.phase
    }

    /// Move to the next phase. Skipping, repeating or leaving a terminal
    /// phase is rejected.
    pub fn advance(&mut self, next: StartupPhase) -> Result<()> {
        if self.phase.successor() != Some(next) {
            return Err(FlipbookError::InvalidTransition {
                from: self.phase.name(),
                to: next.name(),
            });
        }
        self.phase = next;
        Ok(())
    }

    /// Enter the terminal error phase and return the status text to show.
    pub fn fail(&mut self, err: &FlipbookError) -> String {
        self.phase = StartupPhase::Error;
        err.status_message()
    }

    /// Whether the viewer reached the steady state.
    pub fn is_interactive(&self) -> bool {
        self.phase == StartupPhase::Interactive
    }
}

/// Something the host should do in response to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Play the flip sound.
    PlayFlipSound,
    /// Jump the widget to a physical page.
    TurnToPage(usize),
    /// Ask the widget to flip forward.
    FlipNext,
    /// Ask the widget to flip back.
    FlipPrev,
    /// Show the 1-based current logical page.
    ShowPage(usize),
    /// Show the total logical page count.
    ShowTotal(usize),
    /// Enable or disable the navigation buttons.
    SetNavigation {
        /// Disable "previous".
        prev_disabled: bool,
        /// Disable "next".
        next_disabled: bool,
    },
    /// Warm an image URL in the preload cache.
    Preload(String),
    /// Replace the status text; an empty string hides the status.
    SetStatus(String),
    /// Make the book container visible.
    RevealBook,
    /// Enter or leave fullscreen.
    ToggleFullscreen,
}

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// `ArrowLeft`.
    Left,
    /// `ArrowRight`.
    Right,
    /// `f` or `F`.
    Fullscreen,
    /// `Escape`.
    Escape,
}

impl Key {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "f" | "F" => Some(Key::Fullscreen),
            "Escape" => Some(Key::Escape),
            _ => None,
        }
    }
}

/// Everything built from the manifest before the widget is constructed.
#[derive(Debug, Clone)]
pub struct BookPlan {
    /// Physical pages to render.
    pub sequence: PageSequence,
    /// Base dimensions.
    pub geometry: BookGeometry,
    /// Widget constructor settings.
    pub settings: FlipSettings,
}

impl BookPlan {
    /// Build the sequence and geometry from the manifest and the first page's
    /// natural size (zero when it failed to load).
    pub fn new(manifest: &Manifest, natural_width: u32, natural_height: u32, mobile: bool) -> Self {
        let sequence = PageSequence::build(manifest.pages());
        let geometry = BookGeometry::from_natural_size(natural_width, natural_height);
        let settings = geometry.settings(mobile);
        Self {
            sequence,
            geometry,
            settings,
        }
    }
}

/// Per-session event handler.
#[derive(Debug, Clone)]
pub struct FlipbookController {
    pages: Vec<String>,
    map: PageMap,
}

impl FlipbookController {
    /// Create a controller for a manifest and the sequence built from it.
    pub fn new(manifest: &Manifest, sequence: &PageSequence) -> Self {
        Self {
            pages: manifest.pages().to_vec(),
            map: sequence.page_map(),
        }
    }

    /// Index mapper in use.
    pub fn page_map(&self) -> &PageMap {
        &self.map
    }

    /// Effects to apply right after the widget has been loaded with pages.
    pub fn on_widget_ready(&self) -> Vec<Effect> {
        vec![Effect::ShowTotal(self.map.logical_count())]
    }

    /// Widget `init` event.
    pub fn on_init(&self, current: usize) -> Vec<Effect> {
        let mut effects = self.warm_around(0);
        effects.extend(self.pager_update(current));
        effects.push(Effect::SetStatus(String::new()));
        effects.push(Effect::RevealBook);
        effects
    }

    /// Widget `flip` event.
    pub fn on_flip(&self, current: usize) -> Vec<Effect> {
        let mut effects = vec![Effect::PlayFlipSound];
        effects.extend(self.pager_update(current));
        effects
    }

    /// "Previous" button.
    pub fn on_prev_clicked(&self) -> Vec<Effect> {
        vec![Effect::FlipPrev]
    }

    /// "Next" button; ignored on the last real page.
    pub fn on_next_clicked(&self, current: usize) -> Vec<Effect> {
        if self.map.can_flip_next(current) {
            vec![Effect::FlipNext]
        } else {
            Vec::new()
        }
    }

    /// Fullscreen button.
    pub fn on_fullscreen_clicked(&self) -> Vec<Effect> {
        vec![Effect::ToggleFullscreen]
    }

    /// Keyboard shortcut. `Escape` yields nothing here; the close message is
    /// posted by a window-level listener that works even if startup failed.
    pub fn on_key(&self, key: Key, current: usize) -> Vec<Effect> {
        match key {
            Key::Left => vec![Effect::FlipPrev],
            Key::Right => self.on_next_clicked(current),
            Key::Fullscreen => vec![Effect::ToggleFullscreen],
            Key::Escape => Vec::new(),
        }
    }

    /// Counter, buttons and preloads for the page the widget reports.
    ///
    /// Landing on the back filler only produces a [`Effect::TurnToPage`] back
    /// to the last real page; the resulting flip updates the pager.
    pub fn pager_update(&self, current: usize) -> Vec<Effect> {
        if let Some(target) = self.map.landing_correction(current) {
            return vec![Effect::TurnToPage(target)];
        }

        let logical = self.map.logical_from_physical(current);
        let mut effects = vec![
            Effect::ShowPage(logical + 1),
            Effect::SetNavigation {
                prev_disabled: !self.map.can_flip_prev(current),
                next_disabled: !self.map.can_flip_next(current),
            },
        ];
        effects.extend(self.warm_around(logical));
        effects
    }

    fn warm_around(&self, logical: usize) -> Vec<Effect> {
        self.map
            .warm_targets(logical)
            .into_iter()
            .filter_map(|li| self.pages.get(li))
            .map(|url| Effect::Preload(url.clone()))
            .collect()
    }
}
