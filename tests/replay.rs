use std::time::{Duration, Instant};

use railviz::{AnimationDriver, ReplayState, Route, RouteWidget, VizConfig};

const DUR: Duration = Duration::from_millis(4000);
const DELAY: Duration = Duration::from_millis(100);

#[test]
fn reset_from_any_progress_reaches_completion_again() {
    let t0 = Instant::now();
    for reset_at_ms in [0u64, 137, 2000, 3999, 4000] {
        let mut driver = AnimationDriver::new(DUR, DELAY, t0);
        driver.tick(t0 + Duration::from_millis(reset_at_ms));

        let t_reset = t0 + Duration::from_millis(reset_at_ms);
        driver.reset(t_reset);
        assert_eq!(driver.tick(t_reset), 0.0, "reset at {reset_at_ms}ms");

        let t_done = t_reset + DELAY + DUR;
        assert_eq!(driver.tick(t_done), 1.0, "rerun after reset at {reset_at_ms}ms");
        assert!(driver.is_complete());
    }
}

#[test]
fn pending_restart_holds_progress_at_zero_for_the_delay() {
    let t0 = Instant::now();
    let mut driver = AnimationDriver::new(DUR, DELAY, t0);
    driver.tick(t0 + DUR);
    driver.reset(t0 + DUR);

    // Sample inside the hold-off window.
    for ms in [0u64, 30, 99] {
        assert_eq!(driver.tick(t0 + DUR + Duration::from_millis(ms)), 0.0);
    }
    // First tick at/after the deadline starts the fresh run.
    let p = driver.tick(t0 + DUR + DELAY + Duration::from_millis(1000));
    assert_eq!(p, 0.25);
}

#[test]
fn each_restart_bumps_the_generation() {
    let t0 = Instant::now();
    let mut driver = AnimationDriver::new(DUR, DELAY, t0);
    let g0 = driver.generation();

    driver.reset(t0 + Duration::from_millis(500));
    let g1 = driver.generation();
    assert_ne!(g0, g1);

    // The deferred start after the delay bumps it once more, so a callback
    // scheduled before the reset can never match again.
    driver.tick(t0 + Duration::from_millis(500) + DELAY);
    let g2 = driver.generation();
    assert_ne!(g1, g2);
    assert_ne!(g0, g2);
}

#[test]
fn widget_replay_control_is_armed_only_at_completion() {
    let t0 = Instant::now();
    let mut w = RouteWidget::new(Route::avignon_narbonne(), VizConfig::default(), t0).unwrap();

    // Inert at progress 0 and mid-flight.
    assert!(!w.replay(t0));
    let frame = w.tick(t0 + Duration::from_millis(1000)).unwrap();
    assert_eq!(frame.replay, ReplayState::InProgress);
    assert!(!w.replay(t0 + Duration::from_millis(1000)));

    // Armed exactly at completion.
    let frame = w.tick(t0 + DUR).unwrap();
    assert_eq!(frame.replay, ReplayState::Ready);
    assert_eq!(w.replay_state(), ReplayState::Ready);
    assert!(w.replay(t0 + DUR));

    // After the accepted replay the control disarms again.
    assert_eq!(w.replay_state(), ReplayState::InProgress);
    assert!(!w.replay(t0 + DUR + Duration::from_millis(10)));
}

#[test]
fn completed_widget_shows_full_reveal_and_no_train() {
    let t0 = Instant::now();
    let mut w = RouteWidget::new(Route::avignon_narbonne(), VizConfig::default(), t0).unwrap();
    let frame = w.tick(t0 + DUR + Duration::from_millis(500)).unwrap();
    assert_eq!(frame.journey.progress, 1.0);
    assert_eq!(frame.journey.dash_offset, 0.0);
    assert!(frame.train.is_none());
    assert!(frame.stops.last().unwrap().reached);
}
