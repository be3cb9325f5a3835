//! Visual effect primitives and their reverts.
//!
//! Each primitive performs exactly one mutation against a surface and stamps
//! the step's duration as the surface's transition hint, so the render layer
//! knows how long to interpolate. Reverts return one effect family to its
//! neutral baseline; they are idempotent and safe to call even if the
//! corresponding effect never ran.
//!
//! Fades work through markers rather than an opacity value: fade-in marks the
//! surface [`VISIBLE_MARKER`] and clears [`HIDDEN_MARKER`], fade-out does the
//! opposite. What "visible" looks like is the render layer's business.

use crate::step::{PULSE_ENLARGED_RATIO, PULSE_NEUTRAL_RATIO, ms_duration};
use crate::transform::{Translation, compose_transform, rotate_transform};
use cadence_surface::Surface;

/// Marker added by fade-in and removed by fade-out.
pub const VISIBLE_MARKER: &str = "visible";

/// Marker added by fade-out and removed by fade-in.
pub const HIDDEN_MARKER: &str = "hidden";

/// Mark the surface visible, interpolated over `duration_ms`.
pub fn fade_in(surface: &dyn Surface, duration_ms: f64) {
    surface.set_transition_duration(Some(ms_duration(duration_ms)));
    surface.remove_marker(HIDDEN_MARKER);
    surface.add_marker(VISIBLE_MARKER);
}

/// Mark the surface hidden, interpolated over `duration_ms`.
pub fn fade_out(surface: &dyn Surface, duration_ms: f64) {
    surface.set_transition_duration(Some(ms_duration(duration_ms)));
    surface.remove_marker(VISIBLE_MARKER);
    surface.add_marker(HIDDEN_MARKER);
}

/// Offset the surface by `translation`, interpolated over `duration_ms`.
pub fn move_by(surface: &dyn Surface, duration_ms: f64, translation: Translation) {
    surface.set_transition_duration(Some(ms_duration(duration_ms)));
    surface.set_transform(Some(compose_transform(Some(translation), None)));
}

/// Scale the surface by `ratio`, interpolated over `duration_ms`.
pub fn scale(surface: &dyn Surface, duration_ms: f64, ratio: f64) {
    surface.set_transition_duration(Some(ms_duration(duration_ms)));
    surface.set_transform(Some(compose_transform(None, Some(ratio))));
}

/// Rotate the surface by `angle_deg` degrees, interpolated over
/// `duration_ms`.
pub fn rotate(surface: &dyn Surface, duration_ms: f64, angle_deg: f64) {
    surface.set_transition_duration(Some(ms_duration(duration_ms)));
    surface.set_transform(Some(rotate_transform(angle_deg)));
}

/// One tick of the pulse oscillation: enlarged or neutral scale.
///
/// Writes only the transform; the pulse rides on whatever transition hint is
/// already set.
pub fn pulse_tick(surface: &dyn Surface, enlarged: bool) {
    let ratio = if enlarged {
        PULSE_ENLARGED_RATIO
    } else {
        PULSE_NEUTRAL_RATIO
    };
    surface.set_transform(Some(compose_transform(None, Some(ratio))));
}

/// Undo a fade-in: clear the visible marker and the transition hint.
pub fn revert_fade_in(surface: &dyn Surface) {
    surface.remove_marker(VISIBLE_MARKER);
    surface.set_transition_duration(None);
}

/// Undo a fade-out: clear the hidden marker and the transition hint.
pub fn revert_fade_out(surface: &dyn Surface) {
    surface.remove_marker(HIDDEN_MARKER);
    surface.set_transition_duration(None);
}

/// Undo any move/scale/rotate: clear the transform and the transition hint.
pub fn revert_transform(surface: &dyn Surface) {
    surface.set_transform(None);
    surface.set_transition_duration(None);
}
