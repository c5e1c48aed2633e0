#![forbid(unsafe_code)]

//! Chat bubble text model (headless).
//!
//! Turns a raw chat message into the lines of a bubble:
//! - preprocessing (emoji shortcodes, legacy format codes)
//! - fixed-advance width estimation and per-code-point wrapping
//! - frame-height bucket resolution against a sparse set of configured tile sets
//! - two-pass layout with a hard line cap and ellipsis truncation
//!
//! Everything here is pure: the same settings and input always produce the same layout.

pub mod config;
pub mod error;
pub mod layout;
pub mod markup;
pub mod preprocess;
pub mod settings;
pub mod text;

pub use config::BubbleConfig;
pub use error::{Error, Result};
pub use layout::{LayoutResolver, LayoutResult, pick_height, truncate_with_ellipsis};
pub use settings::{BubbleSettings, DisplayHints, FrameHeightSpec};
pub use text::{LineWrapEngine, WidthClass, WidthModel, split_by_newlines};

/// Preprocesses `raw` and lays it out with `settings`.
pub fn layout_message(raw: &str, settings: &BubbleSettings) -> LayoutResult {
    let cleaned = preprocess::clean_message(raw);
    LayoutResolver::new(settings).resolve(&cleaned)
}
