//! Tick-driven enter/hold/exit animation, one state machine per subject.
//!
//! Every subject owns at most one entry in the controller's table. Starting a new animation
//! replaces the entry and bumps its generation, so anything still holding an
//! [`AnimationHandle`] for the old one can tell it is stale. There are no timers: the owner calls
//! [`AnimationController::tick`] once per time step and applies the returned frames.

pub mod ease;

use crate::SubjectId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

pub const ENTER_TICKS: u32 = 4;
pub const EXIT_TICKS: u32 = 4;
pub const MIN_PHASE_TICKS: u32 = 2;
pub const START_SCALE: f32 = 0.05;
pub const TARGET_SCALE: f32 = 1.0;
pub const END_SCALE: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationTimings {
    pub enter_ticks: u32,
    pub hold_ticks: u32,
    pub exit_ticks: u32,
    pub start_scale: f32,
    pub target_scale: f32,
    pub end_scale: f32,
    pub fade_with_scale: bool,
}

impl Default for AnimationTimings {
    fn default() -> Self {
        Self::from_lifetime(chatbubble_core::settings::DEFAULT_LIFETIME_TICKS)
    }
}

impl AnimationTimings {
    /// Default curves and phase lengths; whatever `lifetime_ticks` leaves after enter and exit
    /// becomes the hold.
    pub fn from_lifetime(lifetime_ticks: u32) -> Self {
        Self::with_phase_ticks(ENTER_TICKS, EXIT_TICKS, lifetime_ticks)
    }

    pub fn with_phase_ticks(enter_ticks: u32, exit_ticks: u32, lifetime_ticks: u32) -> Self {
        let enter_ticks = enter_ticks.max(MIN_PHASE_TICKS);
        let exit_ticks = exit_ticks.max(MIN_PHASE_TICKS);
        Self {
            enter_ticks,
            hold_ticks: lifetime_ticks.saturating_sub(enter_ticks + exit_ticks),
            exit_ticks,
            start_scale: START_SCALE,
            target_scale: TARGET_SCALE,
            end_scale: END_SCALE,
            fade_with_scale: true,
        }
    }

    /// Opacity a fresh animation starts with.
    pub fn initial_opacity(&self) -> u8 {
        if self.fade_with_scale { 0 } else { u8::MAX }
    }

    /// Number of ticks from start until the finishing frame, inclusive.
    pub fn total_ticks(&self) -> u32 {
        (self.enter_ticks + 1) + self.hold_ticks + (self.exit_ticks + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Entering,
    Holding,
    Exiting,
}

/// Identifies one particular animation run for a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationHandle {
    pub subject: SubjectId,
    pub generation: u64,
}

/// Transform values for one subject after one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationFrame {
    pub subject: SubjectId,
    pub generation: u64,
    pub phase: Phase,
    /// Step index within `phase`, starting at 0.
    pub step: u32,
    pub scale: f32,
    pub opacity: u8,
    /// Set on the last exit frame; the subject's state is gone after this tick.
    pub finished: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub frames: Vec<AnimationFrame>,
    /// Subjects whose display objects disappeared; their animation was dropped without a frame.
    pub aborted: Vec<SubjectId>,
}

/// Read-only view of a subject's current animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationSnapshot {
    pub generation: u64,
    pub phase: Phase,
    pub elapsed_ticks: u32,
    pub scale: f32,
    pub opacity: u8,
}

#[derive(Debug, Clone)]
struct SubjectAnimation {
    generation: u64,
    timings: AnimationTimings,
    phase: Phase,
    /// Steps already taken in `phase`.
    step: u32,
    scale: f32,
    opacity: u8,
}

impl SubjectAnimation {
    fn new(generation: u64, timings: AnimationTimings) -> Self {
        Self {
            generation,
            timings,
            phase: Phase::Entering,
            step: 0,
            scale: timings.start_scale,
            opacity: timings.initial_opacity(),
        }
    }

    fn advance(&mut self, subject: SubjectId) -> AnimationFrame {
        let tm = self.timings;
        let phase = self.phase;
        let step = self.step;
        let mut finished = false;

        match phase {
            Phase::Entering => {
                let p = ease::progress(step, tm.enter_ticks);
                self.scale = ease::lerp(tm.start_scale, tm.target_scale, ease::ease_out_back(p));
                if tm.fade_with_scale {
                    self.opacity = ease::opacity_from_fraction(p);
                }
                self.step += 1;
                if self.step > tm.enter_ticks {
                    self.phase = if tm.hold_ticks > 0 {
                        Phase::Holding
                    } else {
                        Phase::Exiting
                    };
                    self.step = 0;
                }
            }
            Phase::Holding => {
                self.step += 1;
                if self.step >= tm.hold_ticks {
                    self.phase = Phase::Exiting;
                    self.step = 0;
                }
            }
            Phase::Exiting => {
                let p = ease::progress(step, tm.exit_ticks);
                self.scale = ease::lerp(tm.target_scale, tm.end_scale, ease::ease_in_cubic(p));
                if tm.fade_with_scale {
                    self.opacity = ease::opacity_from_fraction(1.0 - p);
                }
                self.step += 1;
                finished = self.step > tm.exit_ticks;
            }
        }

        AnimationFrame {
            subject,
            generation: self.generation,
            phase,
            step,
            scale: self.scale,
            opacity: self.opacity,
            finished,
        }
    }

    fn snapshot(&self) -> AnimationSnapshot {
        AnimationSnapshot {
            generation: self.generation,
            phase: self.phase,
            elapsed_ticks: self.step,
            scale: self.scale,
            opacity: self.opacity,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnimationController {
    timings: AnimationTimings,
    states: FxHashMap<SubjectId, SubjectAnimation>,
    next_generation: u64,
}

impl AnimationController {
    pub fn new(timings: AnimationTimings) -> Self {
        Self {
            timings,
            states: FxHashMap::default(),
            next_generation: 0,
        }
    }

    pub fn timings(&self) -> &AnimationTimings {
        &self.timings
    }

    /// Applies to animations started after this call.
    pub fn set_timings(&mut self, timings: AnimationTimings) {
        self.timings = timings;
    }

    /// Starts a fresh enter animation, cancelling whatever the subject was doing.
    pub fn start(&mut self, subject: SubjectId) -> AnimationHandle {
        self.next_generation += 1;
        let generation = self.next_generation;
        if let Some(prev) = self
            .states
            .insert(subject, SubjectAnimation::new(generation, self.timings))
        {
            tracing::trace!(
                %subject,
                cancelled = prev.generation,
                generation,
                "replaced in-flight bubble animation"
            );
        }
        AnimationHandle {
            subject,
            generation,
        }
    }

    /// Cancels and forgets the subject's animation. Safe to call when none exists.
    pub fn remove(&mut self, subject: SubjectId) -> bool {
        self.states.remove(&subject).is_some()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    pub fn is_current(&self, handle: &AnimationHandle) -> bool {
        self.states
            .get(&handle.subject)
            .is_some_and(|s| s.generation == handle.generation)
    }

    pub fn snapshot(&self, subject: SubjectId) -> Option<AnimationSnapshot> {
        self.states.get(&subject).map(SubjectAnimation::snapshot)
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Advances every animation by one step.
    pub fn tick(&mut self) -> Vec<AnimationFrame> {
        self.tick_with(|_| true).frames
    }

    /// Advances every animation whose display objects are still alive; the rest are dropped.
    ///
    /// Frames come back ordered by subject so runs are reproducible.
    pub fn tick_with(&mut self, mut is_alive: impl FnMut(SubjectId) -> bool) -> TickReport {
        let mut subjects: Vec<SubjectId> = self.states.keys().copied().collect();
        subjects.sort_unstable();

        let mut report = TickReport::default();
        for subject in subjects {
            if !is_alive(subject) {
                if let Some(dropped) = self.states.remove(&subject) {
                    tracing::debug!(
                        %subject,
                        generation = dropped.generation,
                        "bubble display objects are gone; aborting animation"
                    );
                }
                report.aborted.push(subject);
                continue;
            }

            let Some(state) = self.states.get_mut(&subject) else {
                continue;
            };
            let frame = state.advance(subject);
            if frame.finished {
                self.states.remove(&subject);
            }
            report.frames.push(frame);
        }
        report
    }
}
