use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

const MAX_CELL: u32 = 8192;

#[derive(Parser, Debug)]
#[command(name = "tilepaint", version)]
struct Cli {
    /// Log paint and fill events to stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a JSON job to PNG.
    Render(RenderArgs),
    /// Render a transformed checkerboard swatch to PNG.
    Swatch(SwatchArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input job JSON; relative image paths resolve against its directory.
    #[arg(long)]
    job: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SwatchArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Square output size in pixels.
    #[arg(long, default_value_t = 256)]
    size: u32,

    /// Checker cell size in texels.
    #[arg(long, default_value_t = 16)]
    cell: u32,

    /// Uniform pattern scale.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Pattern rotation in degrees.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    rotate_deg: f64,

    /// Horizontal pattern shear.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    shear_x: f64,

    /// Vertical pattern shear.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    shear_y: f64,

    /// Sample with bilinear filtering instead of nearest neighbour.
    #[arg(long, default_value_t = false)]
    bilinear: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::WARN
        })
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Swatch(args) => cmd_swatch(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let job = tilepaint::TileJob::from_path(&args.job)?;
    let root = args.job.parent().unwrap_or_else(|| Path::new("."));
    let surface = job
        .render(root)
        .with_context(|| format!("render job '{}'", args.job.display()))?;
    write_png(&surface, &args.out)
}

fn cmd_swatch(args: SwatchArgs) -> anyhow::Result<()> {
    if args.cell == 0 || args.cell > MAX_CELL {
        anyhow::bail!("--cell must be in 1..={MAX_CELL}, got {}", args.cell);
    }
    let side = args.cell * 2;
    let board = tilepaint::checkerboard(
        side,
        side,
        args.cell,
        [236, 236, 236, 255],
        [40, 44, 52, 255],
    )?;

    let transform = tilepaint::Affine::rotate(args.rotate_deg.to_radians())
        * tilepaint::Affine::skew(args.shear_x, args.shear_y)
        * tilepaint::Affine::scale(args.scale);
    let paint = tilepaint::TransformedTexturePaint::new(
        board,
        tilepaint::Rect::new(0.0, 0.0, f64::from(side), f64::from(side)),
        Some(tilepaint::transform::affine::from_coeffs(transform.as_coeffs())?),
    )?;

    let hints = tilepaint::RenderingHints::new().with(if args.bilinear {
        tilepaint::Interpolation::Bilinear
    } else {
        tilepaint::Interpolation::NearestNeighbor
    });

    let mut surface = tilepaint::Surface::with_opts(
        args.size,
        args.size,
        tilepaint::SurfaceOpts::default().with_parallel(true),
    )?;
    let size = f64::from(args.size);
    surface.fill_rect(
        tilepaint::Rect::new(0.0, 0.0, size, size),
        &paint,
        tilepaint::Affine::IDENTITY,
        Some(&hints),
    )?;
    write_png(&surface, &args.out)
}

fn write_png(surface: &tilepaint::Surface, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    surface.save_png(out)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}
