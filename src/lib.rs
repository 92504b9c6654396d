#![forbid(unsafe_code)]

pub mod config;
pub mod ease;
pub mod error;
pub mod journey;
pub mod project;
pub mod render;
pub mod route;
pub mod scene;
pub mod svg;
pub mod timeline;
pub mod widget;

pub use config::{Palette, VizConfig};
pub use ease::Ease;
pub use error::{RailvizError, RailvizResult};
pub use journey::JourneySample;
pub use project::{ProjectedStop, RouteLayout, project};
pub use render::{FrameRgba, parse_svg, rasterize, render_frame};
pub use route::{GeoBounds, Route, Waypoint};
pub use scene::{ReplayState, SceneFrame, StopMarker, StopRole, TrainMarker};
pub use svg::write_svg;
pub use timeline::{AnimationDriver, Timeline};
pub use widget::RouteWidget;
