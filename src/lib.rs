//! Flipbook viewer core
//!
//! Host-independent logic for a browser "flipbook" viewer that shows a scanned
//! document through the `St.PageFlip` page-flip widget. The browser bindings
//! live in the `flipbook-wasm` crate; everything here is plain Rust and is
//! tested natively.
//!
//! # Features
//! - Manifest parsing with the same lenient rules the viewer has always used
//! - Physical page sequence with synthetic cover/back fillers, always even
//! - Physical ↔ logical page mapping and navigation boundaries
//! - Book geometry and the serialized widget settings
//! - Write-once preload cache and a round-robin flip-sound pool
//! - Explicit startup state machine and an effect-returning event controller
//!
//! # Quick start
//! ```
//! use flipbook::{BookPlan, Effect, FlipbookController, Manifest};
//!
//! let manifest = Manifest::parse("manifest.json", r#"{"pages":["p1.webp","p2.webp","p3.webp","p4.webp"]}"#).unwrap();
//! let plan = BookPlan::new(&manifest, 1700, 2200, false);
//! assert_eq!(plan.sequence.len(), 6);
//!
//! let controller = FlipbookController::new(&manifest, &plan.sequence);
//! // The widget landed on the back filler: send it back to the last real page.
//! assert_eq!(controller.pager_update(5), vec![Effect::TurnToPage(4)]);
//! ```

#![warn(missing_docs)]

pub mod config; // Viewer configuration
pub mod controller; // Startup state machine + event handling
mod error;
pub mod geometry; // Book sizing + widget settings
pub mod layout; // Page sequence + index mapping
pub mod manifest; // Manifest model
pub mod preload; // Preload cache
pub mod sound; // Flip sound pool

pub use config::{ElementIds, ViewerConfig};
pub use controller::{BookPlan, Effect, FlipbookController, Key, Startup, StartupPhase};
pub use error::{FlipbookError, Result, GENERIC_FAILURE_STATUS};
pub use geometry::{BookGeometry, FlipSettings};
pub use layout::{FillerKind, PageMap, PageSequence, PageSlot, PhysicalPage};
pub use manifest::Manifest;
pub use preload::PreloadCache;
pub use sound::{SoundClip, SoundError, SoundPlayer};
