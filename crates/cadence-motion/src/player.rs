//! Temporal scheduling of step sequences.
//!
//! `play` captures a snapshot of the surface, then arms the timers that fire
//! each step at its cumulative offset from the play call. Scheduling is
//! non-blocking: the handle returns immediately and steps fire on the
//! runtime's time driver.
//!
//! One cancellable walker task per pass sleeps to each step's absolute
//! deadline and fires it, which keeps construction order even when
//! neighbouring steps share an offset. A cycled play additionally arms a
//! repeating trigger that re-walks the whole sequence every total-duration
//! interval; those re-walk passes are not tracked by the handle and simply
//! exhaust on their own, while any pulse they start registers its token in
//! the shared session and stays cancellable.
//!
//! Must be called from within a Tokio runtime with the time driver enabled.

use crate::builder::SequenceBuilder;
use crate::effects;
use crate::handle::{PlaySession, PlaybackHandle};
use crate::step::{PULSE_INTERVAL_MS, Step, StepKind, ms_duration};
use cadence_surface::{Surface, SurfaceSnapshot};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep, sleep_until};
use tracing::{debug, trace};

/// Floor for the repeating trigger's period. A sequence with a total
/// duration of zero would otherwise demand a zero-period timer.
const MIN_CYCLE_PERIOD: Duration = Duration::from_millis(1);

/// Schedule `sequence` against `surface` and return the controlling handle.
///
/// The snapshot is captured synchronously, before this function returns and
/// before anything fires. With `cycled` set, the whole sequence re-plays
/// every total-duration interval until stopped.
///
/// # Panics
///
/// Panics if called outside a Tokio runtime.
pub fn play(sequence: &SequenceBuilder, surface: Arc<dyn Surface>, cycled: bool) -> PlaybackHandle {
    let snapshot = SurfaceSnapshot::capture(&*surface);
    let steps: Arc<[Step]> = sequence.steps().into();
    let total_ms = sequence.total_duration_ms();
    let session = Arc::new(PlaySession::new(surface, cycled));

    debug!(
        id = ?session.id,
        steps = steps.len(),
        total_ms,
        cycled,
        "scheduling playback"
    );

    let started = Instant::now();
    let walker = tokio::spawn(run_pass(
        Arc::clone(&session),
        Arc::clone(&steps),
        started,
        true,
    ));
    session.register_one_shot(walker.abort_handle());

    if cycled {
        let trigger = tokio::spawn(run_cycle(Arc::clone(&session), steps, total_ms));
        session.register_recurring(trigger.abort_handle());
    }

    PlaybackHandle::new(session, snapshot)
}

/// Fire every step at `started + cumulative offset`, in order, then hold the
/// pass open until the final step's duration has elapsed.
async fn run_pass(session: Arc<PlaySession>, steps: Arc<[Step]>, started: Instant, initial: bool) {
    let mut offset_ms = 0.0;
    for step in steps.iter() {
        sleep_until(step_deadline(started, offset_ms)).await;
        if initial {
            session.mark_running();
        }
        fire_step(&session, step, offset_ms);
        offset_ms += step.duration_ms();
    }
    sleep_until(step_deadline(started, offset_ms)).await;
    if initial && !session.cycled {
        session.mark_completed();
    }
}

/// Absolute deadline for a step offset. Offsets too large for the timeline
/// saturate to a deadline roughly thirty years out, so the walker parks
/// instead of overflowing the clock.
fn step_deadline(started: Instant, offset_ms: f64) -> Instant {
    const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);
    started
        .checked_add(ms_duration(offset_ms))
        .unwrap_or_else(|| Instant::now() + FAR_FUTURE)
}

/// Re-walk the whole sequence every `total_ms`, until cancelled.
async fn run_cycle(session: Arc<PlaySession>, steps: Arc<[Step]>, total_ms: f64) {
    let period = ms_duration(total_ms).max(MIN_CYCLE_PERIOD);
    loop {
        sleep(period).await;
        trace!(id = ?session.id, "cycle trigger fired");
        // Re-walk passes are not tracked by the handle; they exhaust on
        // their own even if the play is stopped mid-pass.
        tokio::spawn(run_pass(
            Arc::clone(&session),
            Arc::clone(&steps),
            Instant::now(),
            false,
        ));
    }
}

fn fire_step(session: &Arc<PlaySession>, step: &Step, offset_ms: f64) {
    trace!(id = ?session.id, kind = ?step.kind(), offset_ms, "step fired");
    let surface = &*session.surface;
    match step.kind() {
        StepKind::FadeIn => effects::fade_in(surface, step.duration_ms()),
        StepKind::FadeOut => effects::fade_out(surface, step.duration_ms()),
        StepKind::Move { translation } => {
            effects::move_by(surface, step.duration_ms(), translation);
        }
        StepKind::Scale { ratio } => effects::scale(surface, step.duration_ms(), ratio),
        StepKind::Rotate { angle_deg } => effects::rotate(surface, step.duration_ms(), angle_deg),
        StepKind::Delay => {}
        StepKind::Pulse => start_pulse(session),
    }
}

/// Spawn the pulse oscillation and register its token with the session.
fn start_pulse(session: &Arc<PlaySession>) {
    let surface = Arc::clone(&session.surface);
    let task = tokio::spawn(async move {
        let mut enlarged = false;
        loop {
            sleep(ms_duration(PULSE_INTERVAL_MS)).await;
            enlarged = !enlarged;
            effects::pulse_tick(&*surface, enlarged);
        }
    });
    session.register_recurring(task.abort_handle());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::PlayState;
    use crate::transform::Translation;
    use cadence_surface::MemorySurface;
    use parking_lot::Mutex;

    /// Let spawned timer tasks run up to their next await point.
    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    /// Sleep on the paused clock; auto-advance steps through every timer
    /// deadline in the window, so recorded timestamps stay exact.
    async fn pass_time(ms: u64) {
        sleep(Duration::from_millis(ms)).await;
        settle().await;
    }

    /// Surface that timestamps every mutation against the paused clock.
    struct RecordingSurface {
        inner: MemorySurface,
        epoch: Instant,
        log: Mutex<Vec<(u64, String)>>,
    }

    impl RecordingSurface {
        fn new() -> Self {
            Self {
                inner: MemorySurface::new(),
                epoch: Instant::now(),
                log: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, entry: String) {
            let at_ms = self.epoch.elapsed().as_millis() as u64;
            self.log.lock().push((at_ms, entry));
        }

        /// (timestamp, entry) pairs whose entry starts with `prefix`.
        fn entries(&self, prefix: &str) -> Vec<(u64, String)> {
            self.log
                .lock()
                .iter()
                .filter(|(_, entry)| entry.starts_with(prefix))
                .cloned()
                .collect()
        }
    }

    impl Surface for RecordingSurface {
        fn transform(&self) -> Option<String> {
            self.inner.transform()
        }

        fn set_transform(&self, transform: Option<String>) {
            self.record(format!(
                "transform:{}",
                transform.as_deref().unwrap_or("<none>")
            ));
            self.inner.set_transform(transform);
        }

        fn transition_duration(&self) -> Option<Duration> {
            self.inner.transition_duration()
        }

        fn set_transition_duration(&self, hint: Option<Duration>) {
            self.record("hint".to_string());
            self.inner.set_transition_duration(hint);
        }

        fn has_marker(&self, marker: &str) -> bool {
            self.inner.has_marker(marker)
        }

        fn add_marker(&self, marker: &str) {
            self.record(format!("add:{marker}"));
            self.inner.add_marker(marker);
        }

        fn remove_marker(&self, marker: &str) {
            self.record(format!("remove:{marker}"));
            self.inner.remove_marker(marker);
        }

        fn markers(&self) -> Vec<String> {
            self.inner.markers()
        }

        fn set_markers(&self, markers: &[String]) {
            self.record("set_markers".to_string());
            self.inner.set_markers(markers);
        }
    }

    fn timestamps(entries: &[(u64, String)]) -> Vec<u64> {
        entries.iter().map(|(at, _)| *at).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_steps_fire_at_cumulative_offsets() {
        let surface = Arc::new(RecordingSurface::new());
        let sequence = SequenceBuilder::new()
            .add_fade_in(300.0)
            .add_delay(300.0)
            .add_fade_out(300.0);

        let _handle = sequence.play(surface.clone());
        settle().await;
        pass_time(900).await;

        assert_eq!(timestamps(&surface.entries("add:visible")), vec![0]);
        assert_eq!(timestamps(&surface.entries("add:hidden")), vec![600]);
        // the delay between them mutates nothing
        assert_eq!(surface.entries("hint").len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_fires_before_its_offset() {
        let surface = Arc::new(RecordingSurface::new());
        let _handle = SequenceBuilder::new()
            .add_fade_in(300.0)
            .add_fade_out(300.0)
            .play(surface.clone());

        settle().await;
        pass_time(299).await;

        assert!(surface.entries("add:hidden").is_empty());
        assert!(surface.has_marker("visible"));

        pass_time(1).await;
        assert_eq!(timestamps(&surface.entries("add:hidden")), vec![300]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_duration_steps_fire_in_construction_order() {
        let surface = Arc::new(RecordingSurface::new());
        let _handle = SequenceBuilder::new()
            .add_move(0.0, Translation::new(1.0, 2.0))
            .add_scale(0.0, 2.0)
            .add_rotate(100.0, 90.0)
            .play(surface.clone());

        settle().await;

        let transforms = surface.entries("transform:");
        assert_eq!(
            transforms,
            vec![
                (0, "transform:translate(1px, 2px)".to_string()),
                (0, "transform:scale(2)".to_string()),
                (0, "transform:rotate(90deg)".to_string()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_step_deadline_saturates_for_unrepresentable_offsets() {
        let started = Instant::now();
        let deadline = step_deadline(started, f64::MAX);
        assert!(deadline > started + Duration::from_secs(86_400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_step_duration_parks_the_walker() {
        let surface = Arc::new(RecordingSurface::new());
        let handle = SequenceBuilder::new()
            .add_delay(f64::MAX)
            .add_fade_in(0.0)
            .play(surface.clone());

        settle().await;
        pass_time(60_000).await;

        // the delay fired at 0; the fade-in sits beyond the timeline, so the
        // walker parks without completing and stays cancellable
        assert_eq!(handle.state(), PlayState::Running);
        assert!(surface.entries("add:visible").is_empty());

        handle.stop();
        assert_eq!(handle.state(), PlayState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycled_replays_every_total_duration() {
        let surface = Arc::new(RecordingSurface::new());
        let sequence = SequenceBuilder::new().add_fade_in(600.0);
        assert_eq!(sequence.total_duration_ms(), 600.0);

        let handle = sequence.play_cycled(surface.clone());
        settle().await;
        pass_time(600).await;
        pass_time(600).await;

        assert_eq!(
            timestamps(&surface.entries("add:visible")),
            vec![0, 600, 1200]
        );
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_interval_sums_all_step_durations() {
        let surface = Arc::new(RecordingSurface::new());
        // 100 + 200 + 300 = 600ms per cycle
        let sequence = SequenceBuilder::new()
            .add_fade_in(100.0)
            .add_delay(200.0)
            .add_fade_out(300.0);

        let handle = sequence.play_cycled(surface.clone());
        settle().await;
        pass_time(1300).await;

        // passes start at 0, 600, 1200; each fires fade-in at +0 and
        // fade-out at +300 (the third pass's fade-out is beyond the window)
        assert_eq!(
            timestamps(&surface.entries("add:visible")),
            vec![0, 600, 1200]
        );
        assert_eq!(
            timestamps(&surface.entries("add:hidden")),
            vec![300, 900]
        );
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_does_not_cancel_inflight_cycle_pass() {
        let surface = Arc::new(RecordingSurface::new());
        let sequence = SequenceBuilder::new().add_delay(50.0).add_fade_in(50.0);

        let handle = sequence.play_cycled(surface.clone());
        settle().await;
        // first pass fires fade-in at 50; the cycle re-walks at 100
        pass_time(120).await;
        handle.stop();

        // the pass spawned at 100 is untracked and still fires its
        // fade-in at 150, but the stopped cycle never re-walks again
        pass_time(1000).await;
        assert_eq!(
            timestamps(&surface.entries("add:visible")),
            vec![50, 150]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_pulse_toggles_every_500ms() {
        let surface = Arc::new(RecordingSurface::new());
        let handle = SequenceBuilder::new().add_heartbeat().play(surface.clone());

        settle().await;
        assert!(surface.entries("transform:").is_empty());

        pass_time(1500).await;

        assert_eq!(
            surface.entries("transform:"),
            vec![
                (500, "transform:scale(1.4)".to_string()),
                (1000, "transform:scale(1)".to_string()),
                (1500, "transform:scale(1.4)".to_string()),
            ]
        );
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_progression_for_plain_play() {
        let surface: Arc<MemorySurface> = Arc::new(MemorySurface::new());
        let handle = SequenceBuilder::new()
            .add_fade_in(100.0)
            .play(surface.clone());
        assert_eq!(handle.state(), PlayState::Scheduled);

        settle().await;
        assert_eq!(handle.state(), PlayState::Running);

        pass_time(100).await;
        assert_eq!(handle.state(), PlayState::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycled_play_never_completes() {
        let surface: Arc<MemorySurface> = Arc::new(MemorySurface::new());
        let handle = SequenceBuilder::new()
            .add_delay(100.0)
            .play_cycled(surface.clone());

        settle().await;
        pass_time(1000).await;
        assert_eq!(handle.state(), PlayState::Running);

        handle.stop();
        assert_eq!(handle.state(), PlayState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_sequence_completes_without_running() {
        let surface = Arc::new(RecordingSurface::new());
        let handle = SequenceBuilder::new().play(surface.clone());

        settle().await;
        assert_eq!(handle.state(), PlayState::Completed);
        assert!(surface.log.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_cycled_sequence_stays_scheduled_until_stopped() {
        let surface = Arc::new(RecordingSurface::new());
        let handle = SequenceBuilder::new().play_cycled(surface.clone());

        settle().await;
        pass_time(10).await;
        assert_eq!(handle.state(), PlayState::Scheduled);
        assert!(surface.log.lock().is_empty());

        handle.stop();
        assert_eq!(handle.state(), PlayState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_is_captured_before_anything_fires() {
        let surface: Arc<MemorySurface> = Arc::new(MemorySurface::new());
        surface.add_marker("pristine");

        let handle = SequenceBuilder::new()
            .add_fade_out(0.0)
            .play(surface.clone());
        // the zero-offset fade-out fires on the very first poll
        settle().await;
        assert!(surface.has_marker("hidden"));

        handle.reset();
        assert_eq!(surface.markers(), vec!["pristine"]);
    }
}
