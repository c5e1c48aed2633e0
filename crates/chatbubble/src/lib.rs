#![forbid(unsafe_code)]

//! `chatbubble` lays out chat messages as tiled speech bubbles and animates them in and out.
//!
//! The text model (wrapping, frame-height buckets, ellipsis truncation) is always available.
//!
//! # Features
//!
//! - `render`: frame composition, glyph resolution and the tick-driven animation engine
//!   (`chatbubble::render`)

pub use chatbubble_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use chatbubble_render::anim::{AnimationController, AnimationTimings, Phase};
    pub use chatbubble_render::{
        AnchorPose, AnimationFrame, BubbleEngine, BubbleLayer, ComposedBubble, ComposedFrame,
        ContentSender, DisplayBackend, GlyphResolver, GlyphTable, NoGlyphs, RecordingBackend,
        SubjectId, SubmittedBubble, TickReport,
    };

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Config(#[from] chatbubble_core::Error),
        #[error(transparent)]
        Render(#[from] chatbubble_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Builds an engine from a YAML or JSON config file; keys it leaves out take their defaults.
    pub fn engine_from_path(path: impl AsRef<std::path::Path>) -> Result<BubbleEngine> {
        let config = chatbubble_core::BubbleConfig::from_path(path)?;
        Ok(BubbleEngine::from_config(&config))
    }

    /// Lays out, frames and marks up `raw` without any animation state (executor-free).
    pub fn compose_sync(config: &chatbubble_core::BubbleConfig, raw: &str) -> ComposedBubble {
        BubbleEngine::from_config(config).compose(raw)
    }

    /// Runs one bubble for `subject` from submission until it finishes, collecting every frame.
    ///
    /// Returns `None` when bubbles are disabled. `max_ticks` caps the run.
    pub fn simulate_sync(
        engine: &mut BubbleEngine,
        subject: SubjectId,
        raw: &str,
        max_ticks: Option<u32>,
    ) -> Result<Option<(SubmittedBubble, Vec<AnimationFrame>)>> {
        engine.content_sender().submit(subject, raw)?;
        let mut backend = RecordingBackend::new();
        let mut ticks = 0u32;
        loop {
            engine.tick_with(&mut backend);
            ticks += 1;
            if engine.animations().snapshot(subject).is_none()
                || max_ticks.is_some_and(|max| ticks >= max)
            {
                break;
            }
        }
        let Some(bubble) = backend.presented.pop() else {
            return Ok(None);
        };
        let frames = backend.frames_for(subject).copied().collect();
        Ok(Some((bubble, frames)))
    }
}
