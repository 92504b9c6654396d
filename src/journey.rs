use kurbo::Point;

use crate::{
    error::{RailvizError, RailvizResult},
    project::RouteLayout,
};

/// Position of the train and the per-stop highlight state for one progress
/// value. Everything here is derived; nothing is stored between frames.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct JourneySample {
    pub progress: f64,
    /// Index of the stop the train last departed; equals the terminus index
    /// once the journey completes.
    pub segment: usize,
    /// Fractional position within that segment.
    pub local_t: f64,
    /// Interpolated train position in canvas coordinates.
    pub position: Point,
    /// Length of route revealed so far, `progress × total_len`.
    pub revealed_len: f64,
    /// Dash offset hiding the unrevealed remainder of the route.
    pub dash_offset: f64,
}

/// Sample the journey at `progress` (clamped to `[0, 1]`).
pub fn sample(layout: &RouteLayout, progress: f64) -> RailvizResult<JourneySample> {
    let stops = layout.stops();
    let Some(first) = stops.first() else {
        return Err(RailvizError::animation("cannot sample an empty layout"));
    };
    let progress = progress.clamp(0.0, 1.0);

    let segments = layout.segment_count();
    if segments == 0 {
        // Single-stop layout degenerates to a static display.
        return Ok(JourneySample {
            progress,
            segment: 0,
            local_t: 0.0,
            position: first.pos,
            revealed_len: 0.0,
            dash_offset: 0.0,
        });
    }

    // At progress 1 this lands on index N-1 with local_t 0, putting the
    // train exactly on the terminus; only `next` needs clamping.
    let scaled = progress * segments as f64;
    let segment = (scaled.floor() as usize).min(stops.len() - 1);
    let next = (segment + 1).min(stops.len() - 1);
    let local_t = scaled % 1.0;

    let a = stops[segment].pos;
    let b = stops[next].pos;
    let position = Point::new(a.x + (b.x - a.x) * local_t, a.y + (b.y - a.y) * local_t);

    let total = layout.total_len();
    Ok(JourneySample {
        progress,
        segment,
        local_t,
        position,
        revealed_len: total * progress,
        dash_offset: total * (1.0 - progress),
    })
}

/// Whether the intermediate stop with 1-indexed ordinal `ordinal` has been
/// passed. Strictly greater on purpose: at the exact boundary fraction the
/// stop still reads as unreached, which avoids highlighting a station the
/// train has not quite arrived at.
pub fn stop_reached(progress: f64, ordinal: usize, segments: usize) -> bool {
    if segments == 0 {
        return false;
    }
    progress > ordinal as f64 / segments as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::VizConfig, route::Route};

    fn layout() -> RouteLayout {
        RouteLayout::new(&Route::avignon_narbonne(), &VizConfig::default()).unwrap()
    }

    #[test]
    fn endpoints_match_origin_and_terminus() {
        let layout = layout();
        let start = sample(&layout, 0.0).unwrap();
        let end = sample(&layout, 1.0).unwrap();
        assert!(start.position.distance(layout.stops()[0].pos) < 1e-9);
        assert!(
            end.position
                .distance(layout.stops().last().unwrap().pos)
                < 1e-9
        );
        assert_eq!(start.segment, 0);
        assert_eq!(end.segment, layout.stops().len() - 1);
        assert_eq!(end.local_t, 0.0);
    }

    #[test]
    fn segment_plus_local_is_monotone() {
        let layout = layout();
        let mut last = f64::NEG_INFINITY;
        for i in 0..=1000 {
            let s = sample(&layout, i as f64 / 1000.0).unwrap();
            let combined = s.segment as f64 + s.local_t;
            assert!(combined >= last, "regressed at progress {}", s.progress);
            last = combined;
        }
    }

    #[test]
    fn midpoint_of_a_segment_is_the_segment_midpoint() {
        let layout = layout();
        let segments = layout.segment_count() as f64;
        // Halfway through the first segment.
        let s = sample(&layout, 0.5 / segments).unwrap();
        assert_eq!(s.segment, 0);
        assert!((s.local_t - 0.5).abs() < 1e-9);
        let a = layout.stops()[0].pos;
        let b = layout.stops()[1].pos;
        let mid = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        assert!(s.position.distance(mid) < 1e-9);
    }

    #[test]
    fn reveal_checkpoints() {
        let layout = layout();
        let total = layout.total_len();
        let s0 = sample(&layout, 0.0).unwrap();
        assert_eq!(s0.revealed_len, 0.0);
        assert_eq!(s0.dash_offset, total);
        let s5 = sample(&layout, 0.5).unwrap();
        assert!((s5.revealed_len - total / 2.0).abs() < 1e-9);
        assert!((s5.dash_offset - total / 2.0).abs() < 1e-9);
        let s1 = sample(&layout, 1.0).unwrap();
        assert!((s1.revealed_len - total).abs() < 1e-9);
        assert_eq!(s1.dash_offset, 0.0);
    }

    #[test]
    fn reached_flips_strictly_above_the_boundary() {
        let segments = 9;
        for ordinal in 1..segments {
            let boundary = ordinal as f64 / segments as f64;
            assert!(!stop_reached(boundary - 1e-9, ordinal, segments));
            assert!(!stop_reached(boundary, ordinal, segments));
            assert!(stop_reached(boundary + 1e-9, ordinal, segments));
        }
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        let layout = layout();
        let s = sample(&layout, 1.5).unwrap();
        assert_eq!(s.progress, 1.0);
        let s = sample(&layout, -0.5).unwrap();
        assert_eq!(s.progress, 0.0);
    }
}
