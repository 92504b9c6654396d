use crate::error::{RailvizError, RailvizResult};

/// A named stop along the route. Order of waypoints in a [`Route`] encodes
/// travel direction from origin to terminus.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
    pub label: String,
}

impl Waypoint {
    pub fn new(lat: f64, lng: f64, label: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            label: label.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Route {
    pub waypoints: Vec<Waypoint>,
}

impl Route {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self { waypoints }
    }

    /// The Avignon Centre – Narbonne TER line, the compiled-in reference
    /// route (10 stops).
    pub fn avignon_narbonne() -> Self {
        Self::new(vec![
            Waypoint::new(43.9420, 4.8057, "Avignon Centre"),
            Waypoint::new(43.8059, 4.6600, "Tarascon"),
            Waypoint::new(43.6766, 4.6314, "Arles"),
            Waypoint::new(43.8328, 4.3642, "Nîmes"),
            Waypoint::new(43.6760, 4.1378, "Lunel"),
            Waypoint::new(43.6047, 3.8807, "Montpellier"),
            Waypoint::new(43.4096, 3.6962, "Sète"),
            Waypoint::new(43.3110, 3.4758, "Agde"),
            Waypoint::new(43.3447, 3.2170, "Béziers"),
            Waypoint::new(43.1858, 2.9967, "Narbonne"),
        ])
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn origin(&self) -> Option<&Waypoint> {
        self.waypoints.first()
    }

    pub fn terminus(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }

    /// "Avignon Centre — Narbonne" for the reference route.
    pub fn title(&self) -> String {
        match (self.origin(), self.terminus()) {
            (Some(a), Some(b)) => format!("{} — {}", a.label, b.label),
            _ => String::new(),
        }
    }

    pub fn validate(&self) -> RailvizResult<()> {
        if self.waypoints.len() < 2 {
            return Err(RailvizError::validation(
                "route must have at least 2 waypoints",
            ));
        }
        for wp in &self.waypoints {
            if !wp.lat.is_finite() || !wp.lng.is_finite() {
                return Err(RailvizError::validation(format!(
                    "waypoint '{}' has non-finite coordinates",
                    wp.label
                )));
            }
            if wp.label.trim().is_empty() {
                return Err(RailvizError::validation("waypoint label must be non-empty"));
            }
        }
        if let Some(w) = self
            .waypoints
            .windows(2)
            .find(|w| w[0].lat == w[1].lat && w[0].lng == w[1].lng)
        {
            return Err(RailvizError::validation(format!(
                "consecutive waypoints '{}' and '{}' coincide",
                w[0].label, w[1].label
            )));
        }
        Ok(())
    }

    /// Coordinate extremes of the route expanded by a fixed margin on each
    /// axis. The margin keeps every projected point strictly inside the
    /// drawing region.
    pub fn geo_bounds(&self, margin_lat: f64, margin_lng: f64) -> RailvizResult<GeoBounds> {
        if self.waypoints.is_empty() {
            return Err(RailvizError::validation(
                "cannot compute bounds of an empty route",
            ));
        }
        let mut bounds = GeoBounds {
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            min_lng: f64::INFINITY,
            max_lng: f64::NEG_INFINITY,
        };
        for wp in &self.waypoints {
            bounds.min_lat = bounds.min_lat.min(wp.lat);
            bounds.max_lat = bounds.max_lat.max(wp.lat);
            bounds.min_lng = bounds.min_lng.min(wp.lng);
            bounds.max_lng = bounds.max_lng.max(wp.lng);
        }
        bounds.min_lat -= margin_lat;
        bounds.max_lat += margin_lat;
        bounds.min_lng -= margin_lng;
        bounds.max_lng += margin_lng;
        bounds.validate()?;
        Ok(bounds)
    }
}

/// Geographic bounding box of the drawing region.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl GeoBounds {
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn lng_span(&self) -> f64 {
        self.max_lng - self.min_lng
    }

    pub fn validate(&self) -> RailvizResult<()> {
        if !(self.lat_span() > 0.0) || !(self.lng_span() > 0.0) {
            return Err(RailvizError::validation(
                "bounds must span a non-zero area on both axes",
            ));
        }
        Ok(())
    }
}
