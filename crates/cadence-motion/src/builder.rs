//! Immutable, chainable construction of step sequences.
//!
//! Every `add_*` method returns a new builder whose step list is the parent's
//! list plus one appended step; the parent is never mutated, so intermediate
//! builders stay valid and can branch into different sequences.
//!
//! ```
//! use cadence_motion::builder::SequenceBuilder;
//!
//! let base = SequenceBuilder::new().add_fade_in(300.0);
//! let long = base.add_delay(300.0).add_fade_out(300.0);
//!
//! assert_eq!(base.len(), 1);
//! assert_eq!(long.len(), 3);
//! assert_eq!(long.total_duration_ms(), 900.0);
//! ```
//!
//! Playing a sequence requires a Tokio runtime:
//!
//! ```ignore
//! let handle = SequenceBuilder::new()
//!     .add_move_and_hide(1000.0)
//!     .play(surface);
//! // ... later
//! handle.reset();
//! ```

use crate::handle::PlaybackHandle;
use crate::player;
use crate::step::{MOVE_AND_HIDE_TRANSLATION, Step, StepKind};
use crate::transform::Translation;
use cadence_surface::Surface;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Builder and carrier of an ordered step sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceBuilder {
    steps: Vec<Step>,
}

impl SequenceBuilder {
    /// An empty sequence. Playing it is a no-op.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_step(&self, kind: StepKind, duration_ms: f64) -> Self {
        let mut steps = self.steps.clone();
        steps.push(Step::new(kind, duration_ms));
        Self { steps }
    }

    /// Append a fade-in over `duration_ms`.
    pub fn add_fade_in(&self, duration_ms: f64) -> Self {
        self.with_step(StepKind::FadeIn, duration_ms)
    }

    /// Append a fade-out over `duration_ms`.
    pub fn add_fade_out(&self, duration_ms: f64) -> Self {
        self.with_step(StepKind::FadeOut, duration_ms)
    }

    /// Append a move by `translation` over `duration_ms`.
    pub fn add_move(&self, duration_ms: f64, translation: Translation) -> Self {
        self.with_step(StepKind::Move { translation }, duration_ms)
    }

    /// Append a scale to `ratio` over `duration_ms`.
    pub fn add_scale(&self, duration_ms: f64, ratio: f64) -> Self {
        self.with_step(StepKind::Scale { ratio }, duration_ms)
    }

    /// Append a rotation to `angle_deg` degrees over `duration_ms`.
    pub fn add_rotate(&self, duration_ms: f64, angle_deg: f64) -> Self {
        self.with_step(StepKind::Rotate { angle_deg }, duration_ms)
    }

    /// Append a pause that consumes `duration_ms` in the schedule.
    pub fn add_delay(&self, duration_ms: f64) -> Self {
        self.with_step(StepKind::Delay, duration_ms)
    }

    /// Append the pulse oscillation. The step itself occupies no schedule
    /// time; the oscillation runs until the play is stopped.
    pub fn add_heartbeat(&self) -> Self {
        self.with_step(StepKind::Pulse, 0.0)
    }

    /// Move to the fixed offset, then fade out: the move takes 2/5 of
    /// `duration_ms`, the fade the remaining 3/5.
    pub fn add_move_and_hide(&self, duration_ms: f64) -> Self {
        self.add_move(duration_ms * 2.0 / 5.0, MOVE_AND_HIDE_TRANSLATION)
            .add_fade_out(duration_ms * 3.0 / 5.0)
    }

    /// Fade in, hold, fade out, each taking a third of `duration_ms`.
    pub fn add_show_and_hide(&self, duration_ms: f64) -> Self {
        self.add_fade_in(duration_ms / 3.0)
            .add_delay(duration_ms / 3.0)
            .add_fade_out(duration_ms / 3.0)
    }

    /// The built steps, in execution order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Sum of all step durations: the schedule's span and, when cycled, the
    /// repeat interval.
    pub fn total_duration_ms(&self) -> f64 {
        self.steps.iter().map(Step::duration_ms).sum()
    }

    /// Play this sequence once against `surface`.
    ///
    /// Must be called from within a Tokio runtime; steps fire on its time
    /// driver while the returned handle is available immediately.
    pub fn play(&self, surface: Arc<dyn Surface>) -> PlaybackHandle {
        player::play(self, surface, false)
    }

    /// Play this sequence against `surface`, re-playing it every
    /// total-duration interval until the handle stops it.
    pub fn play_cycled(&self, surface: Arc<dyn Surface>) -> PlaybackHandle {
        player::play(self, surface, true)
    }

    /// Package this sequence as a trigger callback: each invocation plays it
    /// once, non-cycled, against the surface it is handed.
    ///
    /// The handle is discarded inside the callback, so plays started this way
    /// cannot be stopped or reset; they run to completion.
    pub fn build_handler(&self) -> Box<dyn Fn(Arc<dyn Surface>) + Send + Sync> {
        let sequence = self.clone();
        Box::new(move |surface| {
            sequence.play(surface);
        })
    }
}
