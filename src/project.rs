use kurbo::{BezPath, ParamCurveArclen, PathSeg, Point};

use crate::{
    config::VizConfig,
    error::{RailvizError, RailvizResult},
    route::{GeoBounds, Route},
};

/// Tolerance passed to kurbo arclength evaluation. The path is a polyline,
/// so any tolerance yields exact lengths; this keeps the call sites honest.
const ARCLEN_EPS: f64 = 1e-9;

/// Map a geographic point into a `inner_w × inner_h` drawing region.
///
/// Longitude maps linearly to x (left = `min_lng`), latitude maps linearly
/// to y but inverted: geographic north is up while drawing-space y grows
/// downward. No clamping; callers guarantee in-bounds input by deriving
/// `bounds` from the same waypoint set being projected.
pub fn project(
    lat: f64,
    lng: f64,
    bounds: &GeoBounds,
    inner_w: f64,
    inner_h: f64,
) -> RailvizResult<Point> {
    let lat_span = bounds.lat_span();
    let lng_span = bounds.lng_span();
    if !(lat_span > 0.0) || !(lng_span > 0.0) {
        return Err(RailvizError::projection(
            "degenerate bounds: all points share a latitude or longitude",
        ));
    }
    let x = (lng - bounds.min_lng) / lng_span * inner_w;
    let y = inner_h - (lat - bounds.min_lat) / lat_span * inner_h;
    Ok(Point::new(x, y))
}

/// A projected stop in canvas coordinates.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProjectedStop {
    pub pos: Point,
    pub label: String,
}

/// Derived drawing-space state of a route: projected stops, the polyline
/// connecting them and its total length.
///
/// This is a pure cache keyed by `(route, width, height, padding, margins)`.
/// Build it once and keep it; [`RouteLayout::resize`] rebuilds only when the
/// canvas actually changed.
#[derive(Clone, Debug)]
pub struct RouteLayout {
    stops: Vec<ProjectedStop>,
    path: BezPath,
    total_len: f64,
    key: LayoutKey,
}

/// The config fields the projection actually depends on. The route itself
/// is not part of the key; build a fresh layout when it changes.
#[derive(Clone, Copy, Debug, PartialEq)]
struct LayoutKey {
    width: f64,
    height: f64,
    padding: f64,
    margin_lat: f64,
    margin_lng: f64,
}

impl LayoutKey {
    fn of(config: &VizConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            padding: config.padding,
            margin_lat: config.margin_lat,
            margin_lng: config.margin_lng,
        }
    }
}

impl RouteLayout {
    #[tracing::instrument(skip(route, config), fields(stops = route.len()))]
    pub fn new(route: &Route, config: &VizConfig) -> RailvizResult<Self> {
        config.validate()?;
        route.validate()?;

        let bounds = route.geo_bounds(config.margin_lat, config.margin_lng)?;
        let (inner_w, inner_h) = (config.inner_width(), config.inner_height());

        let mut stops = Vec::with_capacity(route.len());
        for wp in &route.waypoints {
            let p = project(wp.lat, wp.lng, &bounds, inner_w, inner_h)?;
            stops.push(ProjectedStop {
                pos: Point::new(p.x + config.padding, p.y + config.padding),
                label: wp.label.clone(),
            });
        }

        let path = polyline(&stops);
        let total_len = path_length(&path);

        Ok(Self {
            stops,
            path,
            total_len,
            key: LayoutKey::of(config),
        })
    }

    /// Rebuild the layout for a changed config. Returns `false` when every
    /// projection-relevant field (dimensions, padding, geographic margins)
    /// is unchanged and the cached layout was kept.
    pub fn resize(
        &mut self,
        route: &Route,
        config: &VizConfig,
    ) -> RailvizResult<bool> {
        if LayoutKey::of(config) == self.key {
            return Ok(false);
        }
        *self = Self::new(route, config)?;
        Ok(true)
    }

    pub fn stops(&self) -> &[ProjectedStop] {
        &self.stops
    }

    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// Total polyline length in drawing units.
    pub fn total_len(&self) -> f64 {
        self.total_len
    }

    /// Number of segments between adjacent stops.
    pub fn segment_count(&self) -> usize {
        self.stops.len().saturating_sub(1)
    }
}

/// Move-to the first stop, line-to each subsequent one.
fn polyline(stops: &[ProjectedStop]) -> BezPath {
    let mut path = BezPath::new();
    for (i, stop) in stops.iter().enumerate() {
        if i == 0 {
            path.move_to(stop.pos);
        } else {
            path.line_to(stop.pos);
        }
    }
    path
}

fn path_length(path: &BezPath) -> f64 {
    path.segments()
        .map(|seg: PathSeg| seg.arclen(ARCLEN_EPS))
        .sum()
}
