//! Step model: the operations a sequence can schedule.
//!
//! A `Step` pairs one operation with the time it occupies in the schedule.
//! The operation set is a closed union; execution dispatches exhaustively
//! over it, so an unhandled operation kind cannot exist at runtime.

use crate::transform::Translation;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed cadence of the pulse oscillation.
pub const PULSE_INTERVAL_MS: f64 = 500.0;

/// Scale the pulse enlarges to on every other tick.
pub const PULSE_ENLARGED_RATIO: f64 = 1.4;

/// Scale the pulse returns to between enlarged ticks.
pub const PULSE_NEUTRAL_RATIO: f64 = 1.0;

/// Translation applied by the move-and-hide compound.
pub const MOVE_AND_HIDE_TRANSLATION: Translation = Translation { x: 100.0, y: 20.0 };

/// The closed set of operations a step can perform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
    /// Mark the surface visible.
    FadeIn,
    /// Mark the surface hidden.
    FadeOut,
    /// Set a translate transform.
    Move { translation: Translation },
    /// Set a scale transform.
    Scale { ratio: f64 },
    /// Set a rotate transform.
    Rotate { angle_deg: f64 },
    /// Consume time in the schedule without touching the surface.
    Delay,
    /// Start the scale oscillation (500ms tick, runs until stopped).
    Pulse,
}

/// One timed operation in a sequence. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    kind: StepKind,
    duration_ms: f64,
}

impl Step {
    /// Create a step. The duration is clamped to be non-negative
    /// (NaN clamps to zero).
    pub fn new(kind: StepKind, duration_ms: f64) -> Self {
        Self {
            kind,
            duration_ms: duration_ms.max(0.0),
        }
    }

    pub fn kind(&self) -> StepKind {
        self.kind
    }

    /// Time this step occupies in the schedule, in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }
}

/// Convert fractional milliseconds into a `Duration`, saturating on values
/// too large to represent.
pub(crate) fn ms_duration(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms.max(0.0) / 1000.0).unwrap_or(Duration::MAX)
}
