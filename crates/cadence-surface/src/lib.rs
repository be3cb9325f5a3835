//! Target surface boundary for the cadence sequencer.
//!
//! A surface is the visual element an animation mutates. The sequencer never
//! renders anything itself; it writes three pieces of observable state and
//! leaves interpolation to whatever layer actually draws the element:
//! - a transform descriptor string (`translate(..)`, `scale(..)`, `rotate(..)`)
//! - a transition-duration hint telling the render layer how long to
//!   interpolate towards the new state
//! - a set of named visibility markers (e.g. `"visible"`, `"hidden"`)
//!
//! `Surface` is the capability trait the host implements over its real
//! element type. `MemorySurface` is a plain in-memory implementation used by
//! tests and demos. `SurfaceSnapshot` captures the full observable state so a
//! play session can restore the element exactly as it found it.
//!
//! All methods take `&self`: implementations are expected to use interior
//! mutability, since timer tasks mutate the surface concurrently with the
//! caller holding it.

use parking_lot::Mutex;
use std::time::Duration;

/// Capability set the sequencer requires from a visual element.
///
/// Implementations must be safe to share across tasks; the scheduler holds
/// the surface behind an `Arc` and mutates it from timer callbacks.
pub trait Surface: Send + Sync {
    /// Current transform descriptor, if one is set.
    fn transform(&self) -> Option<String>;

    /// Replace the transform descriptor. `None` clears it.
    fn set_transform(&self, transform: Option<String>);

    /// Current transition-duration hint, if one is set.
    fn transition_duration(&self) -> Option<Duration>;

    /// Replace the transition-duration hint. `None` clears it.
    fn set_transition_duration(&self, hint: Option<Duration>);

    /// Whether the named marker is present.
    fn has_marker(&self, marker: &str) -> bool;

    /// Add a marker. Adding a marker that is already present is a no-op.
    fn add_marker(&self, marker: &str);

    /// Remove a marker. Removing an absent marker is a no-op.
    fn remove_marker(&self, marker: &str);

    /// The full marker set, in insertion order.
    fn markers(&self) -> Vec<String>;

    /// Replace the full marker set.
    fn set_markers(&self, markers: &[String]);
}

/// Point-in-time copy of a surface's observable state.
///
/// Captured when a play session starts and used to restore the surface on
/// reset, including state the session never touched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SurfaceSnapshot {
    transform: Option<String>,
    transition_duration: Option<Duration>,
    markers: Vec<String>,
}

impl SurfaceSnapshot {
    /// Capture the surface's current transform, duration hint, and markers.
    pub fn capture(surface: &dyn Surface) -> Self {
        Self {
            transform: surface.transform(),
            transition_duration: surface.transition_duration(),
            markers: surface.markers(),
        }
    }

    /// Overwrite the surface's state with the captured values.
    pub fn restore(&self, surface: &dyn Surface) {
        surface.set_transform(self.transform.clone());
        surface.set_transition_duration(self.transition_duration);
        surface.set_markers(&self.markers);
    }

    pub fn transform(&self) -> Option<&str> {
        self.transform.as_deref()
    }

    pub fn transition_duration(&self) -> Option<Duration> {
        self.transition_duration
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }
}

/// In-memory surface backing tests and demos.
///
/// Markers keep insertion order and never hold duplicates, mirroring how a
/// class-list behaves on a real element.
#[derive(Debug, Default)]
pub struct MemorySurface {
    state: Mutex<SurfaceState>,
}

#[derive(Debug, Default)]
struct SurfaceState {
    transform: Option<String>,
    transition_duration: Option<Duration>,
    markers: Vec<String>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Surface for MemorySurface {
    fn transform(&self) -> Option<String> {
        self.state.lock().transform.clone()
    }

    fn set_transform(&self, transform: Option<String>) {
        self.state.lock().transform = transform;
    }

    fn transition_duration(&self) -> Option<Duration> {
        self.state.lock().transition_duration
    }

    fn set_transition_duration(&self, hint: Option<Duration>) {
        self.state.lock().transition_duration = hint;
    }

    fn has_marker(&self, marker: &str) -> bool {
        self.state.lock().markers.iter().any(|m| m == marker)
    }

    fn add_marker(&self, marker: &str) {
        let mut state = self.state.lock();
        if !state.markers.iter().any(|m| m == marker) {
            state.markers.push(marker.to_string());
        }
    }

    fn remove_marker(&self, marker: &str) {
        self.state.lock().markers.retain(|m| m != marker);
    }

    fn markers(&self) -> Vec<String> {
        self.state.lock().markers.clone()
    }

    fn set_markers(&self, markers: &[String]) {
        self.state.lock().markers = markers.to_vec();
    }
}

static_assertions::assert_impl_all!(MemorySurface: Send, Sync);
static_assertions::assert_impl_all!(SurfaceSnapshot: Send, Sync);
