//! Pure composition of transform descriptor strings.
//!
//! Effects describe their visual result as a CSS-style descriptor the render
//! layer can apply directly:
//! - `translate(<x>px, <y>px)` for moves
//! - `scale(<ratio>)` for scaling
//! - `rotate(<angle>deg)` for rotation
//!
//! Translation and scale compose into a single descriptor; rotation is a
//! standalone descriptor and never composes with the other two within one
//! effect (sequencing them as separate steps is fine).
//!
//! # Usage
//!
//! ```
//! use cadence_motion::transform::{Translation, compose_transform};
//!
//! let t = compose_transform(Some(Translation::new(100.0, 10.0)), None);
//! assert_eq!(t, "translate(100px, 10px)");
//!
//! let t = compose_transform(Some(Translation::new(1.0, 2.0)), Some(2.0));
//! assert_eq!(t, "translate(1px, 2px) scale(2)");
//! ```

use serde::{Deserialize, Serialize};

/// Pixel offsets applied by a move effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub x: f64,
    pub y: f64,
}

impl Translation {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Translation {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Compose a transform descriptor from an optional translation and an
/// optional scale ratio.
///
/// Present components are joined with a single space; absent components
/// contribute nothing. Both absent yields the empty string. Integral values
/// render without a decimal point (`100px`, `scale(2)`), fractional values
/// keep their fraction (`scale(1.25)`).
pub fn compose_transform(translation: Option<Translation>, ratio: Option<f64>) -> String {
    let mut parts = Vec::with_capacity(2);
    if let Some(t) = translation {
        parts.push(format!("translate({}px, {}px)", t.x, t.y));
    }
    if let Some(r) = ratio {
        parts.push(format!("scale({r})"));
    }
    parts.join(" ")
}

/// Standalone rotation descriptor, in degrees.
pub fn rotate_transform(angle_deg: f64) -> String {
    format!("rotate({angle_deg}deg)")
}
