use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "railviz", version)]
struct Cli {
    /// Route JSON (defaults to the compiled-in Avignon–Narbonne line).
    #[arg(long, global = true)]
    route: Option<PathBuf>,

    /// Visualization config JSON (defaults to the reference instance).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a single frame as SVG or PNG (chosen by the output extension).
    Frame(FrameArgs),
    /// Write the whole journey as numbered PNG frames.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Journey progress in [0, 1].
    #[arg(long, default_value_t = 1.0)]
    progress: f64,

    /// Output path ending in .svg or .png.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Output directory for frame_0000.png, frame_0001.png, ...
    #[arg(long)]
    out: PathBuf,

    /// Frames per second of the rendered sequence.
    #[arg(long, default_value_t = 30)]
    fps: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let route = match &cli.route {
        Some(path) => read_json::<railviz::Route>(path)?,
        None => railviz::Route::avignon_narbonne(),
    };
    let config = match &cli.config {
        Some(path) => read_json::<railviz::VizConfig>(path)?,
        None => railviz::VizConfig::default(),
    };
    route.validate()?;
    config.validate()?;

    match cli.cmd {
        Command::Frame(args) => cmd_frame(&route, &config, args),
        Command::Render(args) => cmd_render(&route, &config, args),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open '{}'", path.display()))?;
    let r = BufReader::new(f);
    serde_json::from_reader(r).with_context(|| format!("parse '{}'", path.display()))
}

fn cmd_frame(route: &railviz::Route, config: &railviz::VizConfig, args: FrameArgs) -> anyhow::Result<()> {
    if !(0.0..=1.0).contains(&args.progress) {
        anyhow::bail!("--progress must be in [0, 1]");
    }

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    match args.out.extension().and_then(|e| e.to_str()) {
        Some("svg") => {
            let layout = railviz::RouteLayout::new(route, config)?;
            let frame = railviz::SceneFrame::evaluate(&layout, config, args.progress)?;
            let text = railviz::write_svg(&frame, &layout, config)?;
            std::fs::write(&args.out, text)
                .with_context(|| format!("write svg '{}'", args.out.display()))?;
        }
        Some("png") => {
            let frame = railviz::render_frame(route, config, args.progress)?;
            save_png(&frame, &args.out)?;
        }
        _ => anyhow::bail!("--out must end in .svg or .png"),
    }

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(route: &railviz::Route, config: &railviz::VizConfig, args: RenderArgs) -> anyhow::Result<()> {
    if args.fps == 0 {
        anyhow::bail!("--fps must be > 0");
    }

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    // One frame per display tick over the journey, inclusive of the final
    // completed frame.
    let frame_count = (config.duration_ms * u64::from(args.fps)).div_ceil(1000) + 1;
    for i in 0..frame_count {
        let progress = if frame_count == 1 {
            1.0
        } else {
            (i as f64 / (frame_count - 1) as f64).min(1.0)
        };
        let frame = railviz::render_frame(route, config, progress)?;
        let path = args.out.join(format!("frame_{i:04}.png"));
        save_png(&frame, &path)?;
    }

    eprintln!("wrote {frame_count} frames to {}", args.out.display());
    Ok(())
}

fn save_png(frame: &railviz::FrameRgba, path: &Path) -> anyhow::Result<()> {
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}
