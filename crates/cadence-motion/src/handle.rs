//! Live control over a scheduled play.
//!
//! `play` returns a `PlaybackHandle` immediately; the steps fire behind it on
//! timer tasks. The handle owns every cancellation token the session armed
//! (one-shot walkers and recurring triggers) plus the snapshot of the surface
//! taken before anything fired:
//! - `stop` cancels all tokens and leaves the surface as-is
//! - `reset` stops, reverts every effect family, and restores the snapshot
//!
//! Dropping a handle cancels nothing; timers run to exhaustion. That is what
//! allows trigger handlers to fire-and-forget a play.

use crate::effects;
use cadence_surface::{Surface, SurfaceSnapshot};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::AbortHandle;
use tracing::debug;

/// Unique identifier for a play invocation, for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayId(pub u64);

impl PlayId {
    /// Generate a new unique play ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for PlayId {
    fn default() -> Self {
        Self::new()
    }
}

/// Current state of a play invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayState {
    /// Timers are armed, nothing has fired yet.
    Scheduled,
    /// Steps are firing in sequence.
    Running,
    /// Explicitly stopped or reset; all timers cancelled.
    Stopped,
    /// The schedule ran through the end of its last step on its own (never
    /// reached when cycled: a cycled play stays `Running` until stopped).
    Completed,
}

impl PlayState {
    /// Whether the play can still fire steps.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::Completed)
    }
}

impl Default for PlayState {
    fn default() -> Self {
        Self::Scheduled
    }
}

/// State shared between a handle and the timer tasks it controls.
///
/// Pulse tasks register their tokens here at fire time, so a pulse started
/// deep inside a cycled re-walk is still cancellable through the handle.
pub(crate) struct PlaySession {
    pub(crate) id: PlayId,
    pub(crate) surface: Arc<dyn Surface>,
    pub(crate) cycled: bool,
    one_shots: Mutex<Vec<AbortHandle>>,
    recurring: Mutex<Vec<AbortHandle>>,
    state: Mutex<PlayState>,
}

impl PlaySession {
    pub(crate) fn new(surface: Arc<dyn Surface>, cycled: bool) -> Self {
        Self {
            id: PlayId::new(),
            surface,
            cycled,
            one_shots: Mutex::new(Vec::new()),
            recurring: Mutex::new(Vec::new()),
            state: Mutex::new(PlayState::Scheduled),
        }
    }

    pub(crate) fn register_one_shot(&self, token: AbortHandle) {
        self.one_shots.lock().push(token);
    }

    pub(crate) fn register_recurring(&self, token: AbortHandle) {
        self.recurring.lock().push(token);
    }

    pub(crate) fn state(&self) -> PlayState {
        *self.state.lock()
    }

    /// Scheduled -> Running, once the first step fires.
    pub(crate) fn mark_running(&self) {
        let mut state = self.state.lock();
        if *state == PlayState::Scheduled {
            *state = PlayState::Running;
        }
    }

    /// Non-cycled walker exhausted its schedule.
    pub(crate) fn mark_completed(&self) {
        let mut state = self.state.lock();
        if !state.is_terminal() {
            *state = PlayState::Completed;
        }
    }

    /// Abort and drop every armed token. Returns how many were cancelled.
    ///
    /// Aborting an already-finished task is a no-op, so cancelling after
    /// completion is safe; repeat calls find the sets already drained.
    pub(crate) fn cancel_all(&self) -> usize {
        let mut cancelled = 0;
        for token in self.one_shots.lock().drain(..) {
            token.abort();
            cancelled += 1;
        }
        for token in self.recurring.lock().drain(..) {
            token.abort();
            cancelled += 1;
        }
        let mut state = self.state.lock();
        if !state.is_terminal() {
            *state = PlayState::Stopped;
        }
        cancelled
    }
}

/// Controller for one play invocation.
pub struct PlaybackHandle {
    session: Arc<PlaySession>,
    snapshot: SurfaceSnapshot,
}

impl PlaybackHandle {
    pub(crate) fn new(session: Arc<PlaySession>, snapshot: SurfaceSnapshot) -> Self {
        Self { session, snapshot }
    }

    pub fn id(&self) -> PlayId {
        self.session.id
    }

    pub fn state(&self) -> PlayState {
        self.session.state()
    }

    /// Cancel every armed one-shot and recurring timer.
    ///
    /// Idempotent. Leaves the surface in whatever partial visual state it was
    /// in when stopped. A step firing in the same instant as the cancel may
    /// still land, matching the async timer model.
    pub fn stop(&self) {
        let cancelled = self.session.cancel_all();
        if cancelled > 0 {
            debug!(id = ?self.session.id, cancelled, "playback stopped");
        }
    }

    /// Stop, undo every effect family, and restore the pre-play snapshot.
    ///
    /// Reverts run unconditionally, whether or not the matching effect ever
    /// fired; each is idempotent. The snapshot then overwrites transform,
    /// transition hint, and markers with the exact pre-play values.
    pub fn reset(&self) {
        self.stop();

        let surface = &*self.session.surface;
        effects::revert_fade_in(surface);
        effects::revert_fade_out(surface);
        effects::revert_transform(surface);
        self.snapshot.restore(surface);

        debug!(id = ?self.session.id, "surface restored to pre-play state");
    }
}

impl fmt::Debug for PlaybackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackHandle")
            .field("id", &self.session.id)
            .field("state", &self.state())
            .finish()
    }
}

static_assertions::assert_impl_all!(PlaybackHandle: Send, Sync);
