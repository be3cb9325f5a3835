//! Declarative, timer-driven animation sequencing.
//!
//! This crate provides:
//! - **Step sequences**: ordered, timed visual operations (fade, move,
//!   scale, rotate, delay, pulse) assembled through an immutable builder
//! - **Scheduling**: each step fires at its cumulative offset on the Tokio
//!   time driver, with optional whole-sequence cycling
//! - **Reversal**: a handle per play that can stop all timers or reset the
//!   surface to its exact pre-play snapshot
//!
//! # Architecture
//!
//! ```text
//! SequenceBuilder (immutable step list)
//!   ├── play / play_cycled → player (walker + cycle timer tasks)
//!   │     └── effects → surface mutations
//!   └── build_handler → fire-and-forget trigger callback
//!
//! PlaybackHandle
//!   ├── stop  → cancels every armed timer token
//!   └── reset → stop + reverts + snapshot restore
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use cadence_motion::SequenceBuilder;
//! use cadence_surface::{MemorySurface, Surface};
//! use std::sync::Arc;
//!
//! let surface: Arc<dyn Surface> = Arc::new(MemorySurface::new());
//! let handle = SequenceBuilder::new()
//!     .add_fade_in(300.0)
//!     .add_move(400.0, (100.0, 20.0).into())
//!     .play(surface);
//!
//! // later, from the owning side:
//! handle.reset();
//! ```

pub mod builder;
pub mod effects;
pub mod handle;
pub mod player;
pub mod step;
pub mod transform;

pub use builder::SequenceBuilder;
pub use effects::{HIDDEN_MARKER, VISIBLE_MARKER};
pub use handle::{PlayId, PlayState, PlaybackHandle};
pub use player::play;
pub use step::{
    MOVE_AND_HIDE_TRANSLATION, PULSE_ENLARGED_RATIO, PULSE_INTERVAL_MS, PULSE_NEUTRAL_RATIO, Step,
    StepKind,
};
pub use transform::{Translation, compose_transform, rotate_transform};
