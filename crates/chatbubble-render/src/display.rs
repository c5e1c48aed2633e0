//! Seam between the engine and whatever actually draws bubbles.
//!
//! A bubble is three stacked layers placed above the subject's head. The engine only hands out
//! content and per-tick transforms; spawning, moving and destroying display objects belongs to a
//! [`DisplayBackend`].

use crate::SubjectId;
use crate::anim::AnimationFrame;
use crate::engine::SubmittedBubble;
use chatbubble_core::DisplayHints;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Height of the layer stack above the anchor point.
pub const LAYER_LIFT: f64 = 0.5;
pub const STANDING_HEAD_HEIGHT: f64 = 1.9;
pub const CROUCHING_HEAD_HEIGHT: f64 = 1.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BubbleLayer {
    Background,
    Tail,
    Text,
}

impl BubbleLayer {
    /// Back to front.
    pub const ALL: [BubbleLayer; 3] = [Self::Background, Self::Tail, Self::Text];

    /// Offset toward the viewer; keeps the layers from z-fighting.
    pub fn depth_offset(self) -> f64 {
        match self {
            Self::Background => -0.010,
            Self::Tail => 0.0,
            Self::Text => 0.010,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorPose {
    #[default]
    Standing,
    Crouching,
}

impl AnchorPose {
    pub fn head_height(self) -> f64 {
        match self {
            Self::Standing => STANDING_HEAD_HEIGHT,
            Self::Crouching => CROUCHING_HEAD_HEIGHT,
        }
    }

    /// Height of the bubble's base above the subject's feet.
    pub fn anchor_height(self, hints: &DisplayHints) -> f64 {
        self.head_height() + hints.y_offset + LAYER_LIFT
    }
}

pub trait DisplayBackend {
    /// Shows (or replaces) the bubble for `bubble.subject` at its initial transform.
    fn present(&mut self, bubble: &SubmittedBubble);

    /// Whether the subject's display objects still exist. Checked once per tick.
    fn is_alive(&self, subject: SubjectId) -> bool {
        let _ = subject;
        true
    }

    fn apply(&mut self, frame: &AnimationFrame);

    /// Destroys the subject's display objects. May be called for subjects already gone.
    fn teardown(&mut self, subject: SubjectId);
}

/// Backend that only records what it was asked to do.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    pub presented: Vec<SubmittedBubble>,
    pub frames: Vec<AnimationFrame>,
    pub torn_down: Vec<SubjectId>,
    dead: FxHashSet<SubjectId>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `is_alive` report the subject gone, as if its objects were removed externally.
    pub fn kill(&mut self, subject: SubjectId) {
        self.dead.insert(subject);
    }

    pub fn frames_for(&self, subject: SubjectId) -> impl Iterator<Item = &AnimationFrame> + '_ {
        self.frames.iter().filter(move |f| f.subject == subject)
    }
}

impl DisplayBackend for RecordingBackend {
    fn present(&mut self, bubble: &SubmittedBubble) {
        self.dead.remove(&bubble.subject);
        self.presented.push(bubble.clone());
    }

    fn is_alive(&self, subject: SubjectId) -> bool {
        !self.dead.contains(&subject)
    }

    fn apply(&mut self, frame: &AnimationFrame) {
        self.frames.push(*frame);
    }

    fn teardown(&mut self, subject: SubjectId) {
        self.torn_down.push(subject);
    }
}
