use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use stillwall::{
    DrawOutcome, EngineSettings, FileImageSource, FrameRGBA, MemorySurface, RenderEngine,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stillwall", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single wallpaper frame as a PNG.
    Frame(FrameArgs),
    /// Render frames across the full horizontal paging range.
    Sweep(SweepArgs),
}

#[derive(Args, Debug)]
struct SurfaceArgs {
    /// Wallpaper image file.
    #[arg(long)]
    image: PathBuf,

    /// Surface width in pixels.
    #[arg(long)]
    width: u32,

    /// Surface height in pixels.
    #[arg(long)]
    height: u32,

    /// Engine settings JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    surface: SurfaceArgs,

    /// Horizontal paging offset in [0, 1].
    #[arg(long, default_value_t = 0.5)]
    x_offset: f32,

    /// Vertical paging offset in [0, 1].
    #[arg(long, default_value_t = 0.5)]
    y_offset: f32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SweepArgs {
    #[command(flatten)]
    surface: SurfaceArgs,

    /// Number of frames; offsets are spread evenly over [0, 1].
    #[arg(long, default_value_t = 5)]
    frames: u32,

    /// Output directory for `frame_NNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sweep(args) => cmd_sweep(args),
    }
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<EngineSettings> {
    let settings = match path {
        Some(p) => EngineSettings::from_path(p)?,
        None => EngineSettings::default(),
    };
    Ok(settings.with_env_overrides()?)
}

fn start_engine(args: &SurfaceArgs) -> anyhow::Result<(RenderEngine, Arc<MemorySurface>)> {
    let settings = load_settings(args.config.as_deref())?;
    if !args.image.exists() {
        anyhow::bail!("wallpaper image '{}' does not exist", args.image.display());
    }

    let surface = Arc::new(MemorySurface::new(args.width, args.height));
    let images = Arc::new(FileImageSource::new(&args.image));
    let engine = RenderEngine::new(surface.clone(), images, settings);
    engine
        .on_surface_ready()
        .with_context(|| format!("load wallpaper '{}'", args.image.display()))?;
    engine.on_visibility_changed(true)?;
    Ok((engine, surface))
}

fn write_png(frame: &FrameRGBA, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    // Frames are cleared to an opaque color, so premultiplied and straight alpha coincide.
    image::save_buffer_with_format(
        out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}

fn render_at(
    engine: &RenderEngine,
    surface: &MemorySurface,
    x_offset: f32,
    y_offset: f32,
) -> anyhow::Result<FrameRGBA> {
    match engine.on_offsets_changed(x_offset, y_offset, 0, 0)? {
        DrawOutcome::Presented { translation } => {
            tracing::info!(x_offset, y_offset, dx = translation.x, dy = translation.y, "rendered");
        }
        DrawOutcome::Skipped => anyhow::bail!("surface refused the frame"),
    }
    surface
        .last_frame()
        .context("surface has no presented frame (bug)")
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (engine, surface) = start_engine(&args.surface)?;
    let frame = render_at(&engine, &surface, args.x_offset, args.y_offset)?;
    write_png(&frame, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sweep(args: SweepArgs) -> anyhow::Result<()> {
    if args.frames == 0 {
        anyhow::bail!("--frames must be at least 1");
    }
    let (engine, surface) = start_engine(&args.surface)?;

    let last = (args.frames - 1).max(1) as f32;
    for i in 0..args.frames {
        let x = i as f32 / last;
        let frame = render_at(&engine, &surface, x, 0.0)?;
        let out = args.out_dir.join(format!("frame_{i:04}.png"));
        write_png(&frame, &out)?;
    }

    let stats = engine.stats();
    eprintln!(
        "wrote {} frames to {} ({} presented)",
        args.frames,
        args.out_dir.display(),
        stats.frames_presented
    );
    Ok(())
}
