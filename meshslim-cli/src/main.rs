//! meshslim: simplify an OBJ mesh with quadric error metrics
//!
//! Usage: meshslim <INPUT> <OUTPUT> <RATIO> [--threshold T] [--placement midpoint|optimal]

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::{error, info, warn, LevelFilter};
use meshslim_io::{read_mesh, write_mesh};
use meshslim_simplification::{
    ContractionPlacement, SimplificationMesh, SimplificationReport, SimplifyOutcome,
    DEFAULT_PROXIMITY_THRESHOLD,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Placement {
    /// Midpoint of the two merged vertices
    Midpoint,
    /// Quadric minimiser, midpoint when singular
    Optimal,
}

impl From<Placement> for ContractionPlacement {
    fn from(p: Placement) -> Self {
        match p {
            Placement::Midpoint => ContractionPlacement::Midpoint,
            Placement::Optimal => ContractionPlacement::Optimal,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "meshslim", version, about = "Simplify a triangle mesh by quadric-error edge collapse")]
struct Cli {
    /// Input OBJ file
    input: PathBuf,

    /// Output OBJ file
    output: PathBuf,

    /// Share of triangles to keep, in (0, 1]
    ratio: f64,

    /// Vertices closer than this are paired even without a shared edge
    #[arg(short, long, default_value_t = DEFAULT_PROXIMITY_THRESHOLD)]
    threshold: f64,

    /// Where merged vertices are placed
    #[arg(short, long, value_enum, default_value_t = Placement::Midpoint)]
    placement: Placement,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn secs(d: Duration) -> f64 {
    d.as_secs_f64()
}

fn run(cli: &Cli) -> Result<()> {
    if !(cli.ratio.is_finite() && cli.ratio > 0.0) {
        bail!("ratio must be a positive number, got {}", cli.ratio);
    }

    let start = Instant::now();

    let input = read_mesh(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let mut mesh = SimplificationMesh::from_triangle_mesh(&input)
        .with_context(|| format!("invalid mesh in {}", cli.input.display()))?;
    mesh.set_placement(cli.placement.into());
    let loaded = Instant::now();

    mesh.accumulate_quadrics();
    let quadrics = Instant::now();

    mesh.generate_candidates(cli.threshold)?;
    let selected = Instant::now();

    let outcome = mesh.simplify(cli.ratio)?;
    let simplified = Instant::now();

    let report = SimplificationReport::from_mesh(&mesh, cli.ratio, outcome);
    match report.outcome {
        SimplifyOutcome::Done => info!(
            "Simplified {} -> {} triangles in {} contractions",
            report.original_triangles, report.final_triangles, report.contractions
        ),
        SimplifyOutcome::Exhausted => warn!(
            "Could not reach ratio {}: stopped at {} / {} triangles (achieved ratio {:.4})",
            cli.ratio,
            report.final_triangles,
            report.original_triangles,
            report.achieved_ratio()
        ),
    }

    info!("Evaluated Error: {}", report.total_error);
    info!("Total Running Time: {:.3} (s)", secs(simplified - start));
    info!("Load Mesh Time: {:.3} (s)", secs(loaded - start));
    info!("Calculate Q Time: {:.3} (s)", secs(quadrics - loaded));
    info!("Select Valid Pairs Time: {:.3} (s)", secs(selected - quadrics));
    info!("Simplify Time: {:.3} (s)", secs(simplified - selected));

    write_mesh(&mesh.export(), &cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
