use std::fmt::Write as _;

use crate::{
    config::{Palette, VizConfig},
    error::{RailvizError, RailvizResult},
    project::RouteLayout,
    scene::{SceneFrame, StopRole},
};

const ROUTE_STROKE_WIDTH: f64 = 4.0;
const INTERMEDIATE_RADIUS: f64 = 5.0;
const ENDPOINT_RADIUS: f64 = 12.0;
const ENDPOINT_CORE_RADIUS: f64 = 5.0;
const TRAIN_CORE_RADIUS: f64 = 4.0;
const FONT_FAMILY: &str = "Crimson Text, Georgia, serif";

/// Serialize one frame to a standalone SVG document.
///
/// Drawing order matches the reference rendering: defs, background and
/// grid, water decoration, the muted full route, the revealed overlay, the
/// stop markers and labels, the train, the legend.
pub fn write_svg(
    frame: &SceneFrame,
    layout: &RouteLayout,
    config: &VizConfig,
) -> RailvizResult<String> {
    document(frame, layout, config)
        .map_err(|e| RailvizError::render(format!("svg serialization failed: {e}")))
}

fn document(
    frame: &SceneFrame,
    layout: &RouteLayout,
    config: &VizConfig,
) -> Result<String, std::fmt::Error> {
    let p = &config.palette;
    let (w, h) = (config.width, config.height);
    let mut out = String::with_capacity(8 * 1024);

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    )?;
    defs(&mut out, p)?;

    // Background and grid texture.
    writeln!(out, r#"  <rect width="{w}" height="{h}" fill="{}"/>"#, p.background)?;
    writeln!(
        out,
        r#"  <rect width="{w}" height="{h}" fill="url(#grid)" opacity="0.6"/>"#
    )?;

    // Stylized water body along the bottom edge.
    writeln!(
        out,
        r#"  <ellipse cx="{}" cy="{}" rx="{}" ry="200" fill="{}" opacity="0.4"/>"#,
        fmt(w / 2.0),
        fmt(h + 150.0),
        fmt(w * 0.8),
        p.water
    )?;

    let d = layout.path().to_svg();
    writeln!(
        out,
        r#"  <path d="{d}" fill="none" stroke="{}" stroke-width="{ROUTE_STROKE_WIDTH}" stroke-linecap="round" stroke-linejoin="round"/>"#,
        p.route_dim
    )?;
    writeln!(
        out,
        r#"  <path d="{d}" fill="none" stroke="url(#redGradient)" stroke-width="{ROUTE_STROKE_WIDTH}" stroke-linecap="round" stroke-linejoin="round" stroke-dasharray="{}" stroke-dashoffset="{}" filter="url(#glow)"/>"#,
        fmt(layout.total_len()),
        fmt(frame.journey.dash_offset)
    )?;

    for stop in frame.stops.iter().filter(|s| s.role == StopRole::Intermediate) {
        intermediate_stop(&mut out, stop, p)?;
    }
    for stop in &frame.stops {
        if stop.role != StopRole::Intermediate {
            endpoint_stop(&mut out, stop, p)?;
        }
    }

    if let Some(train) = &frame.train {
        writeln!(out, "  <g>")?;
        writeln!(
            out,
            r#"    <circle cx="{}" cy="{}" r="{}" fill="{}" filter="url(#glow)">"#,
            fmt(train.pos.x),
            fmt(train.pos.y),
            fmt(train.radius),
            p.route_active_dark
        )?;
        // Keeps the marker pulsing when the document is viewed live.
        writeln!(
            out,
            r#"      <animate attributeName="r" values="7;9;7" dur="0.8s" repeatCount="indefinite"/>"#
        )?;
        writeln!(out, "    </circle>")?;
        writeln!(
            out,
            r#"    <circle cx="{}" cy="{}" r="{TRAIN_CORE_RADIUS}" fill="{}"/>"#,
            fmt(train.pos.x),
            fmt(train.pos.y),
            p.halo
        )?;
        writeln!(out, "  </g>")?;
    }

    legend(&mut out, config)?;
    writeln!(out, "</svg>")?;
    Ok(out)
}

fn defs(out: &mut String, p: &Palette) -> Result<(), std::fmt::Error> {
    writeln!(out, "  <defs>")?;
    writeln!(
        out,
        r#"    <pattern id="grid" width="40" height="40" patternUnits="userSpaceOnUse">
      <path d="M 40 0 L 0 0 0 40" fill="none" stroke="{}" stroke-width="0.5"/>
    </pattern>"#,
        p.grid
    )?;
    writeln!(
        out,
        r#"    <filter id="glow">
      <feGaussianBlur stdDeviation="3" result="coloredBlur"/>
      <feMerge>
        <feMergeNode in="coloredBlur"/>
        <feMergeNode in="SourceGraphic"/>
      </feMerge>
    </filter>"#
    )?;
    writeln!(
        out,
        r#"    <linearGradient id="redGradient" x1="0%" y1="0%" x2="100%" y2="0%">
      <stop offset="0%" stop-color="{}"/>
      <stop offset="100%" stop-color="{}"/>
    </linearGradient>"#,
        p.route_active, p.route_active_dark
    )?;
    writeln!(out, "  </defs>")?;
    Ok(())
}

fn intermediate_stop(
    out: &mut String,
    stop: &crate::scene::StopMarker,
    p: &Palette,
) -> Result<(), std::fmt::Error> {
    let fill = if stop.reached { &p.route_active } else { &p.route_dim };
    writeln!(out, "  <g>")?;
    writeln!(
        out,
        r#"    <circle cx="{}" cy="{}" r="{INTERMEDIATE_RADIUS}" fill="{fill}" stroke="{}" stroke-width="2"/>"#,
        fmt(stop.pos.x),
        fmt(stop.pos.y),
        p.halo
    )?;
    writeln!(
        out,
        r#"    <text x="{}" y="{}" text-anchor="middle" fill="{}" font-size="11" font-family="{FONT_FAMILY}" opacity="{}">{}</text>"#,
        fmt(stop.pos.x),
        fmt(stop.pos.y - 12.0),
        p.label_ink,
        fmt(stop.label_opacity),
        escape(&stop.label)
    )?;
    writeln!(out, "  </g>")?;
    Ok(())
}

fn endpoint_stop(
    out: &mut String,
    stop: &crate::scene::StopMarker,
    p: &Palette,
) -> Result<(), std::fmt::Error> {
    let fill = if stop.reached { &p.route_active } else { &p.route_dim };
    let filter = if stop.reached { r#" filter="url(#glow)""# } else { "" };
    writeln!(out, "  <g>")?;
    writeln!(
        out,
        r#"    <circle cx="{}" cy="{}" r="{ENDPOINT_RADIUS}" fill="{fill}" stroke="{}" stroke-width="3"{filter}/>"#,
        fmt(stop.pos.x),
        fmt(stop.pos.y),
        p.halo
    )?;
    writeln!(
        out,
        r#"    <circle cx="{}" cy="{}" r="{ENDPOINT_CORE_RADIUS}" fill="{}"/>"#,
        fmt(stop.pos.x),
        fmt(stop.pos.y),
        p.halo
    )?;
    writeln!(
        out,
        r#"    <text x="{}" y="{}" text-anchor="middle" fill="{}" font-size="14" font-weight="600" font-family="{FONT_FAMILY}">{}</text>"#,
        fmt(stop.pos.x),
        fmt(stop.pos.y - 20.0),
        p.title_ink,
        escape(&stop.label)
    )?;
    writeln!(out, "  </g>")?;
    Ok(())
}

fn legend(out: &mut String, config: &VizConfig) -> Result<(), std::fmt::Error> {
    let p = &config.palette;
    writeln!(
        out,
        r#"  <g transform="translate({}, {})">"#,
        fmt(config.width - 140.0),
        fmt(config.height - 80.0)
    )?;
    writeln!(
        out,
        r#"    <rect x="-10" y="-10" width="130" height="70" fill="{}" stroke="{}" rx="4" opacity="0.9"/>"#,
        p.background, p.legend_border
    )?;
    writeln!(
        out,
        r#"    <circle cx="10" cy="12" r="6" fill="{}"/>"#,
        p.route_active
    )?;
    writeln!(
        out,
        r#"    <text x="25" y="16" fill="{}" font-size="11" font-family="{FONT_FAMILY}">Gare principale</text>"#,
        p.legend_ink
    )?;
    writeln!(
        out,
        r#"    <line x1="5" y1="35" x2="35" y2="35" stroke="{}" stroke-width="3"/>"#,
        p.route_active
    )?;
    writeln!(
        out,
        r#"    <text x="45" y="39" fill="{}" font-size="11" font-family="{FONT_FAMILY}">Tracé TER</text>"#,
        p.legend_ink
    )?;
    writeln!(out, "  </g>")?;
    Ok(())
}

/// Trim trailing float noise so the output stays diff-friendly.
fn fmt(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" || s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{route::Route, scene::SceneFrame};

    fn svg_at(progress: f64) -> String {
        let config = VizConfig::default();
        let layout = RouteLayout::new(&Route::avignon_narbonne(), &config).unwrap();
        let frame = SceneFrame::evaluate(&layout, &config, progress).unwrap();
        write_svg(&frame, &layout, &config).unwrap()
    }

    #[test]
    fn contains_all_station_labels() {
        let svg = svg_at(0.5);
        for label in [
            "Avignon Centre",
            "Tarascon",
            "Arles",
            "Nîmes",
            "Lunel",
            "Montpellier",
            "Sète",
            "Agde",
            "Béziers",
            "Narbonne",
        ] {
            assert!(svg.contains(label), "missing label {label}");
        }
    }

    #[test]
    fn train_marker_present_only_mid_journey() {
        assert!(svg_at(0.5).contains("animate attributeName"));
        assert!(!svg_at(1.0).contains("animate attributeName"));
    }

    #[test]
    fn reveal_overlay_uses_dash_offset() {
        let config = VizConfig::default();
        let layout = RouteLayout::new(&Route::avignon_narbonne(), &config).unwrap();
        let total = fmt(layout.total_len());

        let start = svg_at(0.0);
        assert!(start.contains(&format!(r#"stroke-dasharray="{total}""#)));
        assert!(start.contains(&format!(r#"stroke-dashoffset="{total}""#)));

        let done = svg_at(1.0);
        assert!(done.contains(r#"stroke-dashoffset="0""#));
    }

    #[test]
    fn fmt_trims_trailing_zeroes() {
        assert_eq!(fmt(60.0), "60");
        assert_eq!(fmt(59.5), "59.5");
        assert_eq!(fmt(59.499), "59.5");
        assert_eq!(fmt(0.0), "0");
        assert_eq!(fmt(-0.004), "0");
    }

    #[test]
    fn escapes_markup_in_labels() {
        assert_eq!(escape("A & B <C>"), "A &amp; B &lt;C&gt;");
    }
}
