//! Histogram registration session.
//!
//! A session clamps both volumes once, then scores candidate transforms by
//! building their joint histogram and evaluating the configured measure.
//! Grid exploration and simplex optimization run on top of that scoring.

use burn::tensor::backend::Backend;
use histreg_core::image::Volume;
use histreg_core::interpolation::Interpolation;
use histreg_core::transform::{Affine, Transform};

use crate::clamp::{clamp, ClampedVolume};
use crate::config::RegistrationConfig;
use crate::error::Result;
use crate::explorer::{AxisSpec, Exploration, Explorer, ParameterGrid};
use crate::histogram::{build_histogram, Histograms, Stride};
use crate::metric::{Similarity, SimilarityMeasure};
use crate::optimizer::{default_steps, NelderMead, OptimizationResult, Optimizer, OptimizerConfig};

/// Last evaluated transform's histograms and score.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub histograms: Histograms,
    pub score: f64,
}

/// Registration of a "from" volume onto a "to" volume.
///
/// Transforms passed to the session map "from" world coordinates to "to"
/// world coordinates.
#[derive(Debug, Clone)]
pub struct HistogramRegistration {
    from: ClampedVolume,
    to: ClampedVolume,
    config: RegistrationConfig,
    last: Option<Evaluation>,
}

impl HistogramRegistration {
    /// Clamp both volumes and start a session.
    pub fn new<B: Backend>(from: &Volume<B>, to: &Volume<B>, config: RegistrationConfig) -> Result<Self> {
        let from = clamp(from, &config.from_clamp)?;
        let to = clamp(to, &config.to_clamp)?;
        tracing::info!(
            "Registration session: from {:?} ({} bins), to {:?} ({} bins), measure {}",
            from.shape(),
            from.dynamic_range(),
            to.shape(),
            to.dynamic_range(),
            config.measure
        );
        Ok(Self::from_clamped(from, to, config))
    }

    /// Start a session on already clamped volumes. The clamp options in
    /// `config` are not applied.
    pub fn from_clamped(from: ClampedVolume, to: ClampedVolume, config: RegistrationConfig) -> Self {
        Self {
            from,
            to,
            config,
            last: None,
        }
    }

    pub fn from_volume(&self) -> &ClampedVolume {
        &self.from
    }

    pub fn to_volume(&self) -> &ClampedVolume {
        &self.to
    }

    pub fn config(&self) -> &RegistrationConfig {
        &self.config
    }

    pub fn spacing(&self) -> Stride {
        self.config.spacing
    }

    /// Change the voxel stride on the "from" grid. On error the session is
    /// unchanged.
    pub fn subsample(&mut self, spacing: [i64; 3]) -> Result<()> {
        self.config.spacing = Stride::new(spacing)?;
        tracing::debug!("Subsampling spacing set to {:?}", spacing);
        Ok(())
    }

    pub fn set_similarity(&mut self, measure: SimilarityMeasure) {
        self.config.measure = measure;
    }

    pub fn similarity(&self) -> SimilarityMeasure {
        self.config.measure
    }

    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.config.interpolation = interpolation;
    }

    pub fn interpolation(&self) -> Interpolation {
        self.config.interpolation
    }

    /// Joint histogram of the two volumes under `transform`.
    pub fn histograms<T: Transform + ?Sized>(&self, transform: &T) -> Result<Histograms> {
        build_histogram(
            &self.from,
            &self.to,
            transform,
            self.config.spacing.into(),
            self.config.interpolation,
        )
    }

    /// Score `transform` without recording it.
    pub fn score<T: Transform + ?Sized>(&self, transform: &T) -> Result<f64> {
        Ok(self.evaluate(transform)?.score)
    }

    fn evaluate<T: Transform + ?Sized>(&self, transform: &T) -> Result<Evaluation> {
        let histograms = self.histograms(transform)?;
        let score = self.config.measure.evaluate(&histograms);
        tracing::debug!(
            "{} = {:.6} over {} voxel pairs",
            self.config.measure,
            score,
            histograms.total()
        );
        Ok(Evaluation { histograms, score })
    }

    /// Score `transform` and keep its histograms as the last evaluation.
    pub fn eval<T: Transform + ?Sized>(&mut self, transform: &T) -> Result<f64> {
        let evaluation = self.evaluate(transform)?;
        let score = evaluation.score;
        self.last = Some(evaluation);
        Ok(score)
    }

    pub fn last_evaluation(&self) -> Option<&Evaluation> {
        self.last.as_ref()
    }

    pub fn last_histograms(&self) -> Option<&Histograms> {
        self.last.as_ref().map(|e| &e.histograms)
    }

    pub fn last_score(&self) -> Option<f64> {
        self.last.as_ref().map(|e| e.score)
    }

    /// Grid search around `base` with the default [`Explorer`].
    pub fn explore(&mut self, base: &Affine, axes: &[AxisSpec]) -> Result<Exploration> {
        self.explore_with(&Explorer::default(), base, axes)
    }

    /// Grid search around `base`; every parameter without an axis keeps its
    /// base value. The best point becomes the last evaluation.
    pub fn explore_with(&mut self, explorer: &Explorer, base: &Affine, axes: &[AxisSpec]) -> Result<Exploration> {
        let grid = ParameterGrid::new(&base.params(), axes)?;
        let session = &*self;
        let exploration = explorer.run(grid, |params| session.score(&base.with_params(params)?))?;
        self.eval(&base.with_params(&exploration.best_params)?)?;
        Ok(exploration)
    }

    /// Nelder–Mead refinement starting at `start`. Without explicit steps in
    /// `config`, steps suited to the transform model are used.
    pub fn optimize(&mut self, start: &Affine, config: &OptimizerConfig) -> Result<OptimizationResult> {
        let mut config = config.clone();
        if config.initial_step.is_none() {
            config.initial_step = Some(default_steps(start.model()));
        }
        self.optimize_with(&NelderMead::new(config), start)
    }

    /// Maximize the similarity over `start`'s parameters with `optimizer`.
    /// The best point becomes the last evaluation.
    pub fn optimize_with<O: Optimizer>(&mut self, optimizer: &O, start: &Affine) -> Result<OptimizationResult> {
        let session = &*self;
        let result = optimizer.maximize(&start.params(), |params| session.score(&start.with_params(params)?))?;
        self.eval(&start.with_params(&result.best_params)?)?;
        Ok(result)
    }
}
