//! Histogram-based registration of 3D volumes.
//!
//! Volumes are clamped to integer intensity bins, a joint histogram is
//! accumulated under a candidate transform, and a similarity measure scores
//! the alignment. [`HistogramRegistration`] ties these together and drives
//! grid exploration and Nelder–Mead optimization over transform parameters.

pub mod clamp;
pub mod config;
pub mod error;
pub mod explorer;
pub mod histogram;
pub mod metric;
pub mod optimizer;
pub mod progress;
pub mod registration;
pub mod validation;

pub use clamp::{clamp, clamp_with_bins, ClampOptions, ClampedVolume};
pub use config::RegistrationConfig;
pub use error::{RegistrationError, Result};
pub use explorer::{AxisSpec, Exploration, Explorer, GridSample, ParameterGrid};
pub use histogram::{build_histogram, Histograms, JointHistogram, Stride};
pub use metric::{evaluate, Similarity, SimilarityMeasure};
pub use optimizer::{NelderMead, OptimizationResult, Optimizer, OptimizerConfig};
pub use progress::{ConsoleProgressCallback, EarlyStoppingCallback, HistoryCallback, ProgressCallback, ProgressInfo, ProgressTracker};
pub use registration::{Evaluation, HistogramRegistration};
pub use validation::ConvergenceChecker;
