use crate::anim::{AnimationController, AnimationFrame, AnimationTimings, TickReport};
use crate::display::DisplayBackend;
use crate::frame::{ComposedFrame, SliceBackgroundComposer};
use crate::glyph::{self, GlyphResolver, GlyphTable};
use crate::{Error, Result, SubjectId};
use chatbubble_core::{
    BubbleConfig, BubbleSettings, DisplayHints, LayoutResolver, LayoutResult, markup, preprocess,
};
use futures::channel::mpsc;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;

/// Everything a display needs to draw a bubble, independent of any subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedBubble {
    pub layout: LayoutResult,
    pub frame: ComposedFrame,
    /// Final lines rendered through the text template, joined with `\n`.
    pub text_markup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedBubble {
    pub subject: SubjectId,
    pub generation: u64,
    pub content: ComposedBubble,
    pub display: DisplayHints,
    pub initial_scale: f32,
    pub initial_opacity: u8,
}

#[derive(Debug)]
struct InboxMessage {
    subject: SubjectId,
    text: String,
}

/// Cloneable handle for submitting content from other threads.
///
/// Messages are queued until the engine owner drains them; see [`BubbleEngine::drain_inbox`].
#[derive(Debug, Clone)]
pub struct ContentSender {
    tx: mpsc::UnboundedSender<InboxMessage>,
}

impl ContentSender {
    pub fn submit(&self, subject: SubjectId, text: impl Into<String>) -> Result<()> {
        self.tx
            .unbounded_send(InboxMessage {
                subject,
                text: text.into(),
            })
            .map_err(|_| Error::EngineClosed { subject })
    }
}

pub struct BubbleEngine {
    settings: BubbleSettings,
    glyphs: Box<dyn GlyphResolver + Send>,
    /// Set by [`BubbleEngine::with_glyph_resolver`]; settings swaps leave such a resolver alone.
    custom_glyphs: bool,
    animations: AnimationController,
    inbox_tx: mpsc::UnboundedSender<InboxMessage>,
    inbox_rx: mpsc::UnboundedReceiver<InboxMessage>,
    /// Messages already pulled off the channel but not yet submitted.
    pending: VecDeque<InboxMessage>,
}

impl std::fmt::Debug for BubbleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BubbleEngine")
            .field("settings", &self.settings)
            .field("animations", &self.animations)
            .finish_non_exhaustive()
    }
}

impl Default for BubbleEngine {
    fn default() -> Self {
        Self::new(BubbleSettings::default())
    }
}

impl BubbleEngine {
    /// Glyphs resolve against `settings.glyphs` until [`Self::with_glyph_resolver`] replaces them.
    pub fn new(settings: BubbleSettings) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded();
        Self {
            glyphs: Box::new(GlyphTable::from_map(settings.glyphs.clone())),
            custom_glyphs: false,
            animations: AnimationController::new(AnimationTimings::from_lifetime(
                settings.lifetime_ticks,
            )),
            settings,
            inbox_tx,
            inbox_rx,
            pending: VecDeque::new(),
        }
    }

    pub fn from_config(config: &BubbleConfig) -> Self {
        Self::new(BubbleSettings::from_config(config))
    }

    pub fn from_config_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = BubbleConfig::from_path(path)?;
        Ok(Self::from_config(&config))
    }

    pub fn with_glyph_resolver(mut self, resolver: impl GlyphResolver + Send + 'static) -> Self {
        self.glyphs = Box::new(resolver);
        self.custom_glyphs = true;
        self
    }

    pub fn settings(&self) -> &BubbleSettings {
        &self.settings
    }

    /// Swaps the settings. Running animations keep their timings; new ones use the new lifetime.
    ///
    /// The glyph table is rebuilt from `settings.glyphs` unless a custom resolver was installed.
    pub fn set_settings(&mut self, settings: BubbleSettings) {
        self.animations
            .set_timings(AnimationTimings::from_lifetime(settings.lifetime_ticks));
        if !self.custom_glyphs {
            self.glyphs = Box::new(GlyphTable::from_map(settings.glyphs.clone()));
        }
        self.settings = settings;
    }

    pub fn animations(&self) -> &AnimationController {
        &self.animations
    }

    /// Lays out `raw` and builds its frame without touching any animation state.
    pub fn compose(&self, raw: &str) -> ComposedBubble {
        let s = &self.settings;
        let cleaned = preprocess::clean_message(raw);
        let resolver = LayoutResolver::new(s);
        let layout = resolver.resolve(&cleaned);

        let spec = s.frame_spec(layout.frame_height);
        let frame = SliceBackgroundComposer::new(&*self.glyphs).compose(
            &layout,
            &spec,
            s.tail_trim_per_side,
            &resolver.width_model(),
        );
        let text_markup = if s.placeholders_in_text {
            markup::render_lines_with(&layout.lines, &s.text_template, |line| {
                glyph::expand_placeholders(&line, &*self.glyphs)
            })
        } else {
            markup::render_lines(&layout.lines, &s.text_template)
        };

        ComposedBubble {
            layout,
            frame,
            text_markup,
        }
    }

    /// Composes `raw` for `subject` and (re)starts its animation.
    ///
    /// Returns `None` without touching state when bubbles are disabled.
    pub fn submit_content(&mut self, subject: SubjectId, raw: &str) -> Option<SubmittedBubble> {
        if !self.settings.enabled {
            tracing::debug!(%subject, "bubbles are disabled; ignoring content");
            return None;
        }
        let content = self.compose(raw);
        let handle = self.animations.start(subject);
        let timings = self.animations.timings();
        Some(SubmittedBubble {
            subject,
            generation: handle.generation,
            content,
            display: self.settings.display,
            initial_scale: timings.start_scale,
            initial_opacity: timings.initial_opacity(),
        })
    }

    pub fn content_sender(&self) -> ContentSender {
        ContentSender {
            tx: self.inbox_tx.clone(),
        }
    }

    /// Moves everything waiting on the channel into `pending`.
    fn pull_inbox(&mut self) {
        // Empty and closed both end the pull; the engine holds a sender, so it never closes.
        while let Ok(msg) = self.inbox_rx.try_recv() {
            self.pending.push_back(msg);
        }
    }

    /// Submits everything queued through [`ContentSender`]s, in arrival order.
    pub fn drain_inbox(&mut self) -> Vec<SubmittedBubble> {
        self.pull_inbox();
        let mut out = Vec::with_capacity(self.pending.len());
        while let Some(msg) = self.pending.pop_front() {
            out.extend(self.submit_content(msg.subject, &msg.text));
        }
        out
    }

    /// Advances every animation one step. Does not drain the inbox.
    pub fn tick(&mut self) -> Vec<AnimationFrame> {
        self.animations.tick()
    }

    /// Drains the inbox into `backend`, then advances and applies one step.
    ///
    /// Subjects the backend reports dead are aborted; they and finished subjects are torn down.
    pub fn tick_with(&mut self, backend: &mut dyn DisplayBackend) -> TickReport {
        for bubble in self.drain_inbox() {
            backend.present(&bubble);
        }

        let report = self.animations.tick_with(|subject| backend.is_alive(subject));
        for frame in &report.frames {
            backend.apply(frame);
            if frame.finished {
                backend.teardown(frame.subject);
            }
        }
        for &subject in &report.aborted {
            backend.teardown(subject);
        }
        report
    }

    /// Cancels the subject's animation and drops any content still queued for it. Idempotent.
    ///
    /// Display objects are left alone; use [`Self::remove_subject_with`] to tear them down too.
    pub fn remove_subject(&mut self, subject: SubjectId) -> bool {
        self.pull_inbox();
        let before = self.pending.len();
        self.pending.retain(|msg| msg.subject != subject);
        let dropped = before - self.pending.len();
        if dropped > 0 {
            tracing::debug!(%subject, dropped, "discarded queued content for removed subject");
        }
        self.animations.remove(subject)
    }

    /// Like [`Self::remove_subject`], and also tears the subject's display objects down.
    ///
    /// The teardown happens even when nothing was running, so a repeated call is harmless.
    pub fn remove_subject_with(
        &mut self,
        subject: SubjectId,
        backend: &mut dyn DisplayBackend,
    ) -> bool {
        let removed = self.remove_subject(subject);
        backend.teardown(subject);
        removed
    }

    pub fn clear(&mut self) {
        self.animations.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_engine_ignores_content() {
        let mut engine = BubbleEngine::new(BubbleSettings {
            enabled: false,
            ..BubbleSettings::default()
        });
        assert!(engine.submit_content(SubjectId(1), "hi").is_none());
        assert!(engine.animations().is_empty());
    }

    #[test]
    fn compose_is_pure() {
        let engine = BubbleEngine::default();
        let a = engine.compose("Hello");
        let b = engine.compose("Hello");
        assert_eq!(a, b);
        assert!(engine.animations().is_empty());
        assert_eq!(a.layout.lines, vec!["Hello".to_string()]);
        assert_eq!(a.text_markup, "<white>Hello</white>");
    }

    #[test]
    fn sender_fails_once_the_engine_is_dropped() {
        let engine = BubbleEngine::default();
        let sender = engine.content_sender();
        drop(engine);
        let err = sender.submit(SubjectId(4), "late").unwrap_err();
        assert!(matches!(err, Error::EngineClosed { subject } if subject == SubjectId(4)));
    }
}
