use crate::error::{RailvizError, RailvizResult};

/// All knobs of the visualization in one place. The defaults reproduce the
/// reference instance: a 900×500 canvas with a 60 unit border, a 4 s journey
/// and a 100 ms pause before a replay starts.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VizConfig {
    /// Canvas width in drawing units.
    pub width: f64,
    /// Canvas height in drawing units.
    pub height: f64,
    /// Border kept free of projected points on every side.
    pub padding: f64,
    /// Geographic margin added to the latitude extremes of the route.
    pub margin_lat: f64,
    /// Geographic margin added to the longitude extremes of the route.
    pub margin_lng: f64,
    /// Total journey duration.
    pub duration_ms: u64,
    /// Pause between a replay request and the restart. Forces observers to
    /// see a fresh animation instead of a continuation of the final frame.
    pub replay_delay_ms: u64,
    /// Fade-in window for a stop label once the train has passed it.
    pub label_fade_ms: u64,
    pub palette: Palette,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 500.0,
            padding: 60.0,
            margin_lat: 0.15,
            margin_lng: 0.2,
            duration_ms: 4000,
            replay_delay_ms: 100,
            label_fade_ms: 300,
            palette: Palette::default(),
        }
    }
}

impl VizConfig {
    pub fn validate(&self) -> RailvizResult<()> {
        if !(self.width > 0.0) || !(self.height > 0.0) {
            return Err(RailvizError::validation("canvas width/height must be > 0"));
        }
        if !(self.padding >= 0.0) {
            return Err(RailvizError::validation("padding must be >= 0"));
        }
        if 2.0 * self.padding >= self.width.min(self.height) {
            return Err(RailvizError::validation(
                "padding leaves no drawing region inside the canvas",
            ));
        }
        if !(self.margin_lat >= 0.0) || !(self.margin_lng >= 0.0) {
            return Err(RailvizError::validation("geographic margins must be >= 0"));
        }
        if self.duration_ms == 0 {
            return Err(RailvizError::validation("duration_ms must be > 0"));
        }
        Ok(())
    }

    /// Width of the region projected points may occupy.
    pub fn inner_width(&self) -> f64 {
        self.width - 2.0 * self.padding
    }

    /// Height of the region projected points may occupy.
    pub fn inner_height(&self) -> f64 {
        self.height - 2.0 * self.padding
    }
}

/// Colors of the reference rendering, as `#rrggbb` strings usable directly
/// in SVG attributes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: String,
    pub grid: String,
    pub water: String,
    /// Full route shown before the train has revealed it.
    pub route_dim: String,
    /// Revealed route and reached stop markers.
    pub route_active: String,
    /// Darker end of the revealed-route gradient, also the train dot.
    pub route_active_dark: String,
    /// Halo stroked around stop markers.
    pub halo: String,
    /// Intermediate stop labels and the legend text ink.
    pub label_ink: String,
    /// Origin/terminus labels.
    pub title_ink: String,
    pub legend_ink: String,
    pub legend_border: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "#fdfbf7".to_string(),
            grid: "#e8e2d5".to_string(),
            water: "#d4e5ed".to_string(),
            route_dim: "#d9d4cb".to_string(),
            route_active: "#c73b3b".to_string(),
            route_active_dark: "#a02828".to_string(),
            halo: "#fdfbf7".to_string(),
            label_ink: "#8b7355".to_string(),
            title_ink: "#3d3d3d".to_string(),
            legend_ink: "#5c5c5c".to_string(),
            legend_border: "#ebe4d8".to_string(),
        }
    }
}
