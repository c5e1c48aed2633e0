#![forbid(unsafe_code)]

//! Bubble frame composition and animation on top of `chatbubble-core`.
//!
//! [`BubbleEngine`] is the entry point: content goes in through [`BubbleEngine::submit_content`]
//! (or a [`ContentSender`] from another thread), and the owner drives it with one
//! [`BubbleEngine::tick`] per time step.

pub mod anim;
pub mod display;
pub mod engine;
pub mod frame;
pub mod glyph;

pub use anim::{
    AnimationController, AnimationFrame, AnimationHandle, AnimationSnapshot, AnimationTimings,
    Phase, TickReport,
};
pub use display::{AnchorPose, BubbleLayer, DisplayBackend, RecordingBackend};
pub use engine::{BubbleEngine, ComposedBubble, ContentSender, SubmittedBubble};
pub use frame::{ComposedFrame, SliceBackgroundComposer, TailSplit};
pub use glyph::{GlyphResolver, GlyphTable, NoGlyphs, expand_placeholders};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque key of the entity a bubble follows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SubjectId(pub u64);

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SubjectId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] chatbubble_core::Error),
    #[error("bubble engine is gone; content for subject {subject} was not delivered")]
    EngineClosed { subject: SubjectId },
}

pub type Result<T> = std::result::Result<T, Error>;
