//! meshdescent - optimize a mesh file by gradient descent and repair it
//!
//! ```text
//! meshdescent model.obj --iterations 100 --learning-rate 0.01
//! ```
//!
//! The result is written to `optimized_mesh.<ext>` next to the input unless
//! `--output` is given.

use anyhow::{Context, Result};
use clap::Parser;
use meshdescent_io::MeshFormat;
use meshdescent_optimize::{
    DescentConfig, OptimizationPipeline, PipelineConfig, DEFAULT_LEARNING_RATE,
    DEFAULT_NUM_ITERATIONS,
};
use meshdescent_repair::RepairOptions;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "meshdescent", version, about = "Optimize a triangle mesh by gradient descent")]
struct Args {
    /// Input mesh (.obj or .ply)
    input: PathBuf,

    /// Output mesh; defaults to optimized_mesh.<ext> beside the input
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Gradient descent step size
    #[arg(long, default_value_t = DEFAULT_LEARNING_RATE, allow_negative_numbers = true)]
    learning_rate: f32,

    /// Number of descent iterations
    #[arg(long, default_value_t = DEFAULT_NUM_ITERATIONS, allow_negative_numbers = true)]
    iterations: i64,

    /// Skip the repair pass after optimization
    #[arg(long)]
    no_repair: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let output = match &args.output {
        Some(path) => path.clone(),
        None => default_output_path(&args.input)?,
    };

    let config = PipelineConfig {
        descent: DescentConfig::new(args.learning_rate, args.iterations),
        repair: if args.no_repair {
            RepairOptions::none()
        } else {
            RepairOptions::default()
        },
    };

    tracing::info!(
        input = %args.input.display(),
        output = %output.display(),
        "Optimizing mesh"
    );

    let report = OptimizationPipeline::new(config)
        .process_file(&args.input, &output)
        .with_context(|| format!("failed to optimize {}", args.input.display()))?;

    tracing::info!(
        vertices_in = report.input_vertices,
        vertices_out = report.output_vertices,
        faces_in = report.input_faces,
        faces_out = report.output_faces,
        seconds = report.processing_time,
        "Done"
    );
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

/// `optimized_mesh.<ext>` in the input's directory, same format as the input
fn default_output_path(input: &Path) -> Result<PathBuf> {
    let format = MeshFormat::from_path(input)
        .with_context(|| format!("cannot pick an output format for {}", input.display()))?;
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    Ok(dir.join(format!("optimized_mesh.{}", format.extension())))
}
