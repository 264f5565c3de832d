use anyhow::{Context, Result};
use burn_ndarray::NdArray;
use clap::{Parser, Subcommand, ValueEnum};
use histreg_core::{Affine, Interpolation, TransformModel, Vector, Volume};
use histreg_registration::{
    build_histogram, clamp_with_bins, AxisSpec, ConsoleProgressCallback, Explorer, HistogramRegistration,
    OptimizerConfig, RegistrationConfig, SimilarityMeasure,
};
use nalgebra::Matrix4;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

type B = NdArray<f32>;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tasks for histreg")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Sampler {
    Nearest,
    Trilinear,
}

impl From<Sampler> for Interpolation {
    fn from(sampler: Sampler) -> Self {
        match sampler {
            Sampler::Nearest => Interpolation::Nearest,
            Sampler::Trilinear => Interpolation::Trilinear,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Recover a known shift of a synthetic volume by grid search and refinement
    Demo {
        /// Similarity measure (cc, cr, crl1, mi, nmi)
        #[arg(short, long, default_value = "cr")]
        measure: String,

        /// Shift applied to the "to" volume, in voxels
        #[arg(long, num_args = 3, allow_negative_numbers = true, default_values_t = [3.0, -2.0, 1.0])]
        shift: Vec<f64>,

        /// Edge length of the synthetic volume
        #[arg(long, default_value_t = 32)]
        size: usize,

        /// Subsampling spacing on the "from" grid
        #[arg(long, num_args = 3, default_values_t = [2, 2, 2])]
        spacing: Vec<i64>,

        /// Skip the Nelder-Mead refinement
        #[arg(long)]
        no_refine: bool,
    },

    /// Time joint histogram accumulation
    BenchHistogram {
        /// Edge length of the synthetic volume
        #[arg(long, default_value_t = 96)]
        size: usize,

        /// Number of timed repetitions
        #[arg(short, long, default_value_t = 10)]
        repeats: usize,

        #[arg(long, value_enum, default_value_t = Sampler::Nearest)]
        interpolation: Sampler,
    },

    /// List similarity measures and transform parameters
    Measures,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { measure, shift, size, spacing, no_refine } => {
            demo(&measure, &shift, size, &spacing, !no_refine)?;
        }
        Commands::BenchHistogram { size, repeats, interpolation } => {
            bench_histogram(size, repeats, interpolation.into())?;
        }
        Commands::Measures => list_measures(),
    }

    Ok(())
}

/// Two overlapping ellipsoidal blobs; smooth enough for the measures to have
/// a clear peak, asymmetric enough that rotations are distinguishable.
fn phantom(size: usize, shift: [f64; 3]) -> Result<Volume<B>> {
    let device = Default::default();
    let c = (size as f64 - 1.0) / 2.0;
    let s = size as f64 / 6.0;
    let mut samples = Vec::with_capacity(size * size * size);
    for i in 0..size {
        for j in 0..size {
            for k in 0..size {
                let (x, y, z) = (i as f64 - shift[0] - c, j as f64 - shift[1] - c, k as f64 - shift[2] - c);
                let a = (-(x * x / 2.0 + y * y + z * z) / (2.0 * s * s)).exp();
                let b = (-((x - s).powi(2) + (y + s).powi(2) + z * z) / (s * s)).exp();
                samples.push((800.0 * a + 400.0 * b) as f32);
            }
        }
    }
    Ok(Volume::from_samples(samples, [size; 3], Matrix4::identity(), &device)?)
}

fn triple<T: Copy>(values: &[T], what: &str) -> Result<[T; 3]> {
    values
        .try_into()
        .ok()
        .with_context(|| format!("{} needs exactly three values", what))
}

fn demo(measure: &str, shift: &[f64], size: usize, spacing: &[i64], refine: bool) -> Result<()> {
    let measure: SimilarityMeasure = measure.parse()?;
    let shift = triple(shift, "--shift")?;
    let config = RegistrationConfig::new()
        .with_measure(measure)
        .with_spacing(triple(spacing, "--spacing")?)?;

    let from = phantom(size, [0.0; 3])?;
    let to = phantom(size, shift)?;
    let mut session = HistogramRegistration::new(&from, &to, config)?;

    let offsets: Vec<f64> = (-5..=5).map(f64::from).collect();
    let axes = ["tx", "ty", "tz"]
        .into_iter()
        .map(|name| AxisSpec::named(TransformModel::Rigid, name, offsets.clone()))
        .collect::<histreg_registration::Result<Vec<_>>>()?;

    let explorer = Explorer::new()
        .with_batch_size(256)
        .with_callback(Arc::new(ConsoleProgressCallback::new(2)));

    let started = Instant::now();
    let exploration = session.explore_with(&explorer, &Affine::default(), &axes)?;
    info!(
        "Grid search over {} points took {:.2?}: {} = {:.6} at {:?}",
        exploration.trajectory.len(),
        started.elapsed(),
        measure,
        exploration.best_score,
        &exploration.best_params[..3]
    );

    let mut best = Affine::from_params(TransformModel::Rigid, &exploration.best_params)?;
    if refine {
        let started = Instant::now();
        let result = session.optimize(&best, &OptimizerConfig::new().with_max_iterations(150))?;
        info!(
            "Nelder-Mead took {:.2?} over {} iterations (converged: {}): {} = {:.6}",
            started.elapsed(),
            result.iterations,
            result.converged,
            measure,
            result.best_score
        );
        best = best.with_params(&result.best_params)?;
    }

    let t = best.translation();
    let r = best.rotation();
    println!("measure      {}", measure);
    println!("true shift   [{:.3}, {:.3}, {:.3}]", shift[0], shift[1], shift[2]);
    println!("recovered    [{:.3}, {:.3}, {:.3}]", t[0], t[1], t[2]);
    println!("rotation     [{:.4}, {:.4}, {:.4}] rad", r[0], r[1], r[2]);
    println!("score        {:.6}", session.last_score().unwrap_or(f64::NAN));
    Ok(())
}

fn bench_histogram(size: usize, repeats: usize, interpolation: Interpolation) -> Result<()> {
    let volume = clamp_with_bins(&phantom(size, [0.0; 3])?, 256)?;
    let transform = Affine::rigid(Vector::new([1.5, -0.5, 2.0]), Vector::new([0.05, 0.0, -0.1]));

    for spacing in [[1, 1, 1], [2, 2, 2], [4, 4, 4]] {
        let started = Instant::now();
        let mut total = 0;
        for _ in 0..repeats.max(1) {
            total = build_histogram(&volume, &volume, &transform, spacing, interpolation)?.total();
        }
        let per_run = started.elapsed() / repeats.max(1) as u32;
        println!(
            "{}^3 spacing {:?} {:?}: {:.2?} per histogram ({} pairs)",
            size, spacing, interpolation, per_run, total
        );
    }
    Ok(())
}

fn list_measures() {
    println!("Similarity measures (higher is better):");
    for measure in SimilarityMeasure::ALL {
        println!("  {}", measure);
    }
    println!();
    for model in [TransformModel::Rigid, TransformModel::Similarity, TransformModel::Affine] {
        println!("{:<11} {}", model, model.param_names().join(" "));
    }
}
