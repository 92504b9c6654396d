use kurbo::Point;

use crate::{
    config::VizConfig,
    ease::{Ease, lerp},
    error::RailvizResult,
    journey::{self, JourneySample},
    project::RouteLayout,
};

/// Pulse period of the train marker.
const PULSE_PERIOD_MS: f64 = 800.0;
const PULSE_RADIUS_MIN: f64 = 7.0;
const PULSE_RADIUS_MAX: f64 = 9.0;

/// Opacity of a stop label before the train has passed it.
const LABEL_DIM_OPACITY: f64 = 0.4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum StopRole {
    Origin,
    Intermediate,
    Terminus,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StopMarker {
    pub label: String,
    pub pos: Point,
    pub role: StopRole,
    /// Highlighted state. The origin is always highlighted, the terminus
    /// only once the journey completes, intermediates once passed.
    pub reached: bool,
    pub label_opacity: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TrainMarker {
    pub pos: Point,
    pub radius: f64,
}

/// State of the single user-facing control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ReplayState {
    /// Journey still running, the control is inert.
    InProgress,
    /// Journey complete, activating the control restarts the animation.
    Ready,
}

/// Everything the presentation layer needs to draw one frame, evaluated
/// from the layout and a progress value. Nothing in here survives to the
/// next frame.
#[derive(Clone, Debug, serde::Serialize)]
pub struct SceneFrame {
    pub journey: JourneySample,
    pub stops: Vec<StopMarker>,
    /// Present only while the train is en route; hidden at completion.
    pub train: Option<TrainMarker>,
    pub replay: ReplayState,
}

impl SceneFrame {
    #[tracing::instrument(skip(layout, config))]
    pub fn evaluate(
        layout: &RouteLayout,
        config: &VizConfig,
        progress: f64,
    ) -> RailvizResult<Self> {
        let journey = journey::sample(layout, progress)?;
        let progress = journey.progress;
        let complete = progress >= 1.0;
        let segments = layout.segment_count();
        let last = layout.stops().len() - 1;

        let stops = layout
            .stops()
            .iter()
            .enumerate()
            .map(|(i, stop)| {
                let role = if i == 0 {
                    StopRole::Origin
                } else if i == last {
                    StopRole::Terminus
                } else {
                    StopRole::Intermediate
                };
                let reached = match role {
                    StopRole::Origin => true,
                    StopRole::Terminus => complete,
                    StopRole::Intermediate => journey::stop_reached(progress, i, segments),
                };
                StopMarker {
                    label: stop.label.clone(),
                    pos: stop.pos,
                    role,
                    reached,
                    label_opacity: label_opacity(role, reached, progress, i, segments, config),
                }
            })
            .collect();

        let train = (!complete).then(|| TrainMarker {
            pos: journey.position,
            radius: pulse_radius(progress, config),
        });

        Ok(Self {
            journey,
            stops,
            train,
            replay: if complete {
                ReplayState::Ready
            } else {
                ReplayState::InProgress
            },
        })
    }
}

/// Intermediate labels sit at 0.4 opacity and fade to 1.0 over the
/// configured window once their stop is passed. Endpoint labels are always
/// fully opaque.
fn label_opacity(
    role: StopRole,
    reached: bool,
    progress: f64,
    ordinal: usize,
    segments: usize,
    config: &VizConfig,
) -> f64 {
    match role {
        StopRole::Origin | StopRole::Terminus => 1.0,
        StopRole::Intermediate => {
            if !reached || segments == 0 || config.duration_ms == 0 {
                return LABEL_DIM_OPACITY;
            }
            let threshold = ordinal as f64 / segments as f64;
            let since_ms = (progress - threshold) * config.duration_ms as f64;
            let t = if config.label_fade_ms == 0 {
                1.0
            } else {
                (since_ms / config.label_fade_ms as f64).clamp(0.0, 1.0)
            };
            lerp(LABEL_DIM_OPACITY, 1.0, Ease::OutCubic.apply(t))
        }
    }
}

/// Train dot radius, a linear 7→9→7 pulse on an 800 ms period, phased off
/// journey time so rasterized frame sequences pulse too.
fn pulse_radius(progress: f64, config: &VizConfig) -> f64 {
    let elapsed_ms = progress * config.duration_ms as f64;
    let t = (elapsed_ms / PULSE_PERIOD_MS).fract();
    let tri = 1.0 - (2.0 * t - 1.0).abs();
    lerp(PULSE_RADIUS_MIN, PULSE_RADIUS_MAX, tri)
}
