use std::time::{Duration, Instant};

use crate::{
    config::VizConfig,
    error::RailvizResult,
    project::RouteLayout,
    route::Route,
    scene::{ReplayState, SceneFrame},
    svg,
    timeline::AnimationDriver,
};

/// The train-route widget: a route, its memoized drawing-space layout, and
/// the animation driver. The widget instance is the only owner of animation
/// state; hosts poll [`RouteWidget::tick`] once per frame and draw the
/// returned scene.
#[derive(Clone, Debug)]
pub struct RouteWidget {
    route: Route,
    config: VizConfig,
    layout: RouteLayout,
    driver: AnimationDriver,
}

impl RouteWidget {
    /// Build the widget and start the journey immediately, like the
    /// reference widget animating on mount.
    pub fn new(route: Route, config: VizConfig, now: Instant) -> RailvizResult<Self> {
        let layout = RouteLayout::new(&route, &config)?;
        let driver = AnimationDriver::new(
            Duration::from_millis(config.duration_ms),
            Duration::from_millis(config.replay_delay_ms),
            now,
        );
        Ok(Self {
            route,
            config,
            layout,
            driver,
        })
    }

    /// Advance the animation to `now` and evaluate the frame to draw.
    pub fn tick(&mut self, now: Instant) -> RailvizResult<SceneFrame> {
        let progress = self.driver.tick(now);
        SceneFrame::evaluate(&self.layout, &self.config, progress)
    }

    /// Activate the replay control. Accepted only while the control is
    /// armed (journey complete); otherwise a no-op returning `false`.
    pub fn replay(&mut self, now: Instant) -> bool {
        if !self.driver.is_complete() {
            return false;
        }
        self.driver.reset(now);
        true
    }

    /// State of the replay control without advancing the animation.
    pub fn replay_state(&self) -> ReplayState {
        if self.driver.is_complete() {
            ReplayState::Ready
        } else {
            ReplayState::InProgress
        }
    }

    /// Change the canvas dimensions, rebuilding the projected layout only
    /// when they actually differ.
    ///
    /// A rejected resize leaves the widget untouched: the candidate config
    /// is committed only after the new layout has been built.
    pub fn resize(&mut self, width: f64, height: f64) -> RailvizResult<()> {
        let mut candidate = self.config.clone();
        candidate.width = width;
        candidate.height = height;
        self.layout.resize(&self.route, &candidate)?;
        self.config = candidate;
        Ok(())
    }

    /// Render the current frame as an SVG document.
    pub fn svg(&mut self, now: Instant) -> RailvizResult<String> {
        let frame = self.tick(now)?;
        svg::write_svg(&frame, &self.layout, &self.config)
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn config(&self) -> &VizConfig {
        &self.config
    }

    pub fn layout(&self) -> &RouteLayout {
        &self.layout
    }

    /// Generation token of the underlying driver, for hosts that schedule
    /// frame callbacks and need to drop stale ones.
    pub fn generation(&self) -> u64 {
        self.driver.generation()
    }
}
