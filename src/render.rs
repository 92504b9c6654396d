use crate::{
    config::VizConfig,
    error::{RailvizError, RailvizResult},
    project::RouteLayout,
    route::Route,
    scene::SceneFrame,
    svg,
};

/// One rasterized frame, RGBA8 row-major as produced by tiny-skia
/// (premultiplied; the opaque background makes every frame fully opaque in
/// practice, so PNG encoders can take the bytes as-is).
#[derive(Clone, Debug)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Parse an SVG document produced by [`svg::write_svg`].
pub fn parse_svg(svg_text: &str) -> RailvizResult<usvg::Tree> {
    let opts = usvg::Options::default();
    usvg::Tree::from_str(svg_text, &opts)
        .map_err(|e| RailvizError::render(format!("svg parse failed: {e}")))
}

/// Rasterize an SVG tree into an RGBA8 frame at its intrinsic size.
pub fn rasterize(tree: &usvg::Tree) -> RailvizResult<FrameRgba> {
    fn to_px(v: f32) -> RailvizResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(RailvizError::render("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let size = tree.size();
    let width = to_px(size.width())?;
    let height = to_px(size.height())?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| RailvizError::render("failed to allocate pixmap"))?;
    resvg::render(
        tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );

    Ok(FrameRgba {
        width,
        height,
        data: pixmap.take(),
    })
}

/// Evaluate, serialize and rasterize a single frame of the journey.
#[tracing::instrument(skip(route, config))]
pub fn render_frame(route: &Route, config: &VizConfig, progress: f64) -> RailvizResult<FrameRgba> {
    let layout = RouteLayout::new(route, config)?;
    let frame = SceneFrame::evaluate(&layout, config, progress)?;
    let text = svg::write_svg(&frame, &layout, config)?;
    let tree = parse_svg(&text)?;
    rasterize(&tree)
}
