//! slice2d CLI - demonstration driver for the slice2d library
//!
//! Usage:
//!   slice2d demo [-o <dir>] [--edges 10] [-n 1000] [--scale 10000]
//!   slice2d resample <input.txt> -o <output.txt> -n 500 [--scale 100]
//!   slice2d render <input.txt>... -o <output.svg> [--svg-scale 1.0] [--margin 10]
//!   slice2d info <input.txt> [--scale 100]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info, LevelFilter};
use rand::Rng;
use slice2d::{Color, FillRule, Point, Polygon, Polygons, Slice, SvgBuilder};
use std::path::PathBuf;

/// Resampling and SVG rendering for planar polygon cross-sections
#[derive(Parser, Debug)]
#[command(name = "slice2d")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a random slice, resample it, and render both to SVG
    Demo {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Vertex count of the generated polygon
        #[arg(long, default_value = "10")]
        edges: usize,

        /// Resampling point count
        #[arg(short = 'n', long, default_value = "1000")]
        samples: usize,

        /// Fixed-point scale of the generated slice
        #[arg(long, default_value = "10000")]
        scale: i64,
    },

    /// Resample a contour file with equidistant points
    Resample {
        /// Input contour file
        input: PathBuf,

        /// Output contour file
        #[arg(short, long)]
        output: PathBuf,

        /// Resampling point count
        #[arg(short = 'n', long, default_value = "100")]
        samples: usize,

        /// Fixed-point scale of the contour files
        #[arg(long, default_value = "100")]
        scale: i64,

        /// Decimal places written to the output file
        #[arg(long, default_value = "3")]
        decimals: usize,
    },

    /// Render one or more contour files into an SVG image
    Render {
        /// Input contour files, painted in argument order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output SVG file
        #[arg(short, long)]
        output: PathBuf,

        /// Fixed-point scale of the contour files
        #[arg(long, default_value = "100")]
        scale: i64,

        /// Drawing scale applied to the whole image
        #[arg(long, default_value = "1.0")]
        svg_scale: f64,

        /// Margin around the drawing, in output units
        #[arg(long, default_value = "10")]
        margin: i64,

        /// Label every vertex with its integer coordinates
        #[arg(long)]
        show_coords: bool,
    },

    /// Print loop statistics for a contour file
    Info {
        /// Input contour file
        input: PathBuf,

        /// Fixed-point scale of the contour file
        #[arg(long, default_value = "100")]
        scale: i64,
    },
}

/// Fill and stroke pairs cycled across rendered groups.
const PALETTE: [(u32, u32); 4] = [
    (0x1200_009C, 0xCCD3_D3DA),
    (0x6080_FF9C, 0xFF00_3300),
    (0x409C_3020, 0xFF40_1010),
    (0x4020_809C, 0xFF10_3040),
];

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.debug {
        LevelFilter::Debug
    } else if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Demo {
            out_dir,
            edges,
            samples,
            scale,
        } => run_demo(&out_dir, edges, samples, scale),
        Commands::Resample {
            input,
            output,
            samples,
            scale,
            decimals,
        } => run_resample(&input, &output, samples, scale, decimals),
        Commands::Render {
            inputs,
            output,
            scale,
            svg_scale,
            margin,
            show_coords,
        } => run_render(&inputs, &output, scale, svg_scale, margin, show_coords),
        Commands::Info { input, scale } => run_info(&input, scale),
    }
}

/// Make a polygon by randomly sampling vertices inside a rectangle.
fn make_random_poly(edges: usize, width: i64, height: i64, scale: i64) -> Polygons {
    let mut rng = rand::thread_rng();
    let mut pg = Polygon::with_capacity(edges);
    for _ in 0..edges {
        pg.push(Point::new(
            rng.gen_range(0..width * scale),
            rng.gen_range(0..height * scale),
        ));
    }
    vec![pg]
}

fn run_demo(out_dir: &PathBuf, edges: usize, samples: usize, scale: i64) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let mut slice = Slice::with_scale(scale);
    slice.set_contour(make_random_poly(edges, 1, 1, scale));

    let contour_path = out_dir.join("random_slice.txt");
    slice
        .save_to_file(&contour_path, 3)
        .with_context(|| format!("Failed to write {}", contour_path.display()))?;
    info!("wrote {}", contour_path.display());

    let mut resampled = Slice::with_scale(scale);
    resampled.set_contour(slice.resample_contour(samples));

    let resampled_path = out_dir.join("resampled_random_slice.txt");
    resampled
        .save_to_file(&resampled_path, 3)
        .with_context(|| format!("Failed to write {}", resampled_path.display()))?;
    info!("wrote {}", resampled_path.display());

    if resampled.contour().iter().all(|pg| !pg.is_empty()) {
        let normals = resampled.all_normals();
        debug!(
            "estimated {} normals over {} loops",
            normals.iter().map(Vec::len).sum::<usize>(),
            normals.len()
        );
    }

    let mut svg = SvgBuilder::new();
    svg.style.pen_width = 0.8;
    svg.style.fill_rule = FillRule::EvenOdd;
    svg.style.brush = Color(PALETTE[0].0);
    svg.style.pen = Color(PALETTE[0].1);
    svg.add_paths(slice.contour());
    svg.style.brush = Color(PALETTE[1].0);
    svg.style.pen = Color(PALETTE[1].1);
    svg.add_paths(resampled.contour());

    let svg_path = out_dir.join("solution.svg");
    svg.save_to_file(&svg_path, 0.1, 10)
        .with_context(|| format!("Failed to write {}", svg_path.display()))?;
    info!("wrote {}", svg_path.display());

    Ok(())
}

fn run_resample(
    input: &PathBuf,
    output: &PathBuf,
    samples: usize,
    scale: i64,
    decimals: usize,
) -> Result<()> {
    let slice = Slice::from_file_with_scale(input, scale)
        .with_context(|| format!("Failed to load {}", input.display()))?;
    info!(
        "loaded {} loops from {}",
        slice.contour().len(),
        input.display()
    );

    let mut resampled = Slice::with_scale(scale);
    resampled.set_contour(slice.resample_contour(samples));
    resampled
        .save_to_file(output, decimals)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("wrote {}", output.display());

    Ok(())
}

fn run_render(
    inputs: &[PathBuf],
    output: &PathBuf,
    scale: i64,
    svg_scale: f64,
    margin: i64,
    show_coords: bool,
) -> Result<()> {
    let mut svg = SvgBuilder::new();
    svg.style.show_coords = show_coords;

    for (i, input) in inputs.iter().enumerate() {
        let slice = Slice::from_file_with_scale(input, scale)
            .with_context(|| format!("Failed to load {}", input.display()))?;
        debug!(
            "loaded {} loops from {}",
            slice.contour().len(),
            input.display()
        );

        let (brush, pen) = PALETTE[i % PALETTE.len()];
        svg.style.brush = Color(brush);
        svg.style.pen = Color(pen);
        svg.add_paths(slice.contour());
    }

    svg.save_to_file(output, svg_scale, margin)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("wrote {}", output.display());

    Ok(())
}

fn run_info(input: &PathBuf, scale: i64) -> Result<()> {
    let slice = Slice::from_file_with_scale(input, scale)
        .with_context(|| format!("Failed to load {}", input.display()))?;

    let lengths = slice.contour_lengths();
    println!("{}: {} loops", input.display(), slice.contour().len());
    for (i, (pg, len)) in slice.contour().iter().zip(&lengths).enumerate() {
        println!(
            "  loop {:<3} {:>6} points  perimeter {:.3}{}",
            i,
            pg.len(),
            len / scale as f64,
            if pg.is_degenerate() { "  (degenerate)" } else { "" }
        );
    }

    Ok(())
}
