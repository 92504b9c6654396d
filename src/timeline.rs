use std::time::{Duration, Instant};

/// Host-agnostic progress timeline: feed it elapsed time, read back a
/// normalized position in `[0, 1]`. Decoupled from any scheduling mechanism
/// so tests can step it explicitly.
#[derive(Clone, Debug)]
pub struct Timeline {
    duration: Duration,
    elapsed: Duration,
}

impl Timeline {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
        }
    }

    /// Advance by `delta` and return the new progress, clamped to 1.
    pub fn advance(&mut self, delta: Duration) -> f64 {
        self.elapsed = self.elapsed.saturating_add(delta);
        self.progress()
    }

    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Running { started: Instant },
    PendingRestart { at: Instant },
    Complete,
}

/// Wall-clock animation driver.
///
/// Progress is always computed from absolute elapsed time, never from frame
/// counts, so skipped or delayed host frames self-correct. Exactly one
/// timeline is active at a time: every (re)start bumps a generation counter
/// that lets a host render loop drop continuations scheduled by an earlier
/// run.
#[derive(Clone, Debug)]
pub struct AnimationDriver {
    duration: Duration,
    replay_delay: Duration,
    phase: Phase,
    generation: u64,
}

impl AnimationDriver {
    /// Create a driver with the timeline already running, like the widget
    /// animating on mount.
    pub fn new(duration: Duration, replay_delay: Duration, now: Instant) -> Self {
        Self {
            duration,
            replay_delay,
            phase: Phase::Running { started: now },
            generation: 0,
        }
    }

    /// Start a fresh run at `now`, invalidating any pending continuation.
    pub fn start(&mut self, now: Instant) {
        self.generation = self.generation.wrapping_add(1);
        self.phase = Phase::Running { started: now };
        tracing::debug!(generation = self.generation, "timeline started");
    }

    /// Advance to `now` and return the current progress in `[0, 1]`.
    ///
    /// Entering the terminal state (progress 1) is latched: once complete,
    /// no further timing arithmetic happens until a reset.
    pub fn tick(&mut self, now: Instant) -> f64 {
        match self.phase {
            Phase::Complete => 1.0,
            Phase::PendingRestart { at } => {
                if now >= at {
                    // The restart was scheduled for `at`; anchor the fresh
                    // run there so a late first poll still measures real
                    // elapsed time.
                    self.start(at);
                    self.tick(now)
                } else {
                    0.0
                }
            }
            Phase::Running { started } => {
                let progress = if self.duration.is_zero() {
                    1.0
                } else {
                    let elapsed = now.saturating_duration_since(started);
                    (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
                };
                if progress >= 1.0 {
                    self.phase = Phase::Complete;
                    tracing::debug!(generation = self.generation, "timeline complete");
                }
                progress
            }
        }
    }

    /// Drop progress back to 0 and schedule a fresh run after the replay
    /// delay. The delay makes observers treat the next run as a new
    /// animation rather than a continuation of the final frame.
    pub fn reset(&mut self, now: Instant) {
        self.generation = self.generation.wrapping_add(1);
        self.phase = Phase::PendingRestart {
            at: now + self.replay_delay,
        };
        tracing::debug!(generation = self.generation, "timeline reset");
    }

    /// True while a run is in flight or about to restart.
    pub fn is_running(&self) -> bool {
        !matches!(self.phase, Phase::Complete)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.phase, Phase::Complete)
    }

    /// Token identifying the current run. A host callback captured with an
    /// older token must not reschedule itself.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUR: Duration = Duration::from_millis(4000);
    const DELAY: Duration = Duration::from_millis(100);

    #[test]
    fn timeline_advances_and_clamps() {
        let mut tl = Timeline::new(DUR);
        assert_eq!(tl.progress(), 0.0);
        assert_eq!(tl.advance(Duration::from_millis(1000)), 0.25);
        assert_eq!(tl.advance(Duration::from_millis(1000)), 0.5);
        assert_eq!(tl.advance(Duration::from_millis(5000)), 1.0);
        assert!(tl.is_complete());
        tl.reset();
        assert_eq!(tl.progress(), 0.0);
    }

    #[test]
    fn driver_progress_tracks_absolute_elapsed_time() {
        let t0 = Instant::now();
        let mut driver = AnimationDriver::new(DUR, DELAY, t0);
        assert_eq!(driver.tick(t0), 0.0);
        // Irregular frame spacing does not matter, only absolute time does.
        assert_eq!(driver.tick(t0 + Duration::from_millis(1000)), 0.25);
        assert_eq!(driver.tick(t0 + Duration::from_millis(3000)), 0.75);
        assert_eq!(driver.tick(t0 + Duration::from_millis(4000)), 1.0);
        assert!(driver.is_complete());
        // Terminal state is latched.
        assert_eq!(driver.tick(t0 + Duration::from_millis(9000)), 1.0);
    }

    #[test]
    fn reset_mid_flight_yields_a_fresh_full_run() {
        let t0 = Instant::now();
        let mut driver = AnimationDriver::new(DUR, DELAY, t0);
        driver.tick(t0 + Duration::from_millis(2000));

        let t_reset = t0 + Duration::from_millis(2500);
        driver.reset(t_reset);
        // Progress reads 0 while the restart is pending.
        assert_eq!(driver.tick(t_reset), 0.0);
        assert_eq!(driver.tick(t_reset + Duration::from_millis(50)), 0.0);

        // After the delay a new run begins and completes after the full
        // duration.
        let t_restart = t_reset + DELAY;
        assert_eq!(driver.tick(t_restart), 0.0);
        assert_eq!(driver.tick(t_restart + Duration::from_millis(2000)), 0.5);
        assert_eq!(driver.tick(t_restart + DUR), 1.0);
        assert!(driver.is_complete());
    }

    #[test]
    fn reset_at_exact_completion_restarts() {
        let t0 = Instant::now();
        let mut driver = AnimationDriver::new(DUR, DELAY, t0);
        assert_eq!(driver.tick(t0 + DUR), 1.0);
        driver.reset(t0 + DUR);
        assert!(driver.is_running());
        assert_eq!(driver.tick(t0 + DUR + DELAY + DUR), 1.0);
    }

    #[test]
    fn generation_invalidates_stale_continuations() {
        let t0 = Instant::now();
        let mut driver = AnimationDriver::new(DUR, DELAY, t0);
        let stale = driver.generation();
        driver.reset(t0 + Duration::from_millis(10));
        assert_ne!(driver.generation(), stale);
        driver.start(t0 + Duration::from_millis(200));
        assert_ne!(driver.generation(), stale);
    }

    #[test]
    fn progress_is_monotone_within_a_run() {
        let t0 = Instant::now();
        let mut driver = AnimationDriver::new(DUR, DELAY, t0);
        let mut last = 0.0;
        for ms in (0..=4500).step_by(130) {
            let p = driver.tick(t0 + Duration::from_millis(ms));
            assert!(p >= last);
            last = p;
        }
        assert_eq!(last, 1.0);
    }
}
