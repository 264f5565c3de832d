//! Optimizers for refining transform parameters.
//!
//! Histogram scores are piecewise constant in the parameters, so the search
//! is derivative-free.
//!
//! # Examples
//!
//! ```
//! use histreg_registration::optimizer::{NelderMead, Optimizer, OptimizerConfig};
//!
//! let config = OptimizerConfig::new().with_initial_step(Some(vec![0.5, 0.5]));
//! let result = NelderMead::new(config)
//!     .maximize(&[0.0, 0.0], |p| Ok(-(p[0] - 1.0).powi(2) - (p[1] - 2.0).powi(2)))
//!     .unwrap();
//! assert!((result.best_params[0] - 1.0).abs() < 1e-2);
//! ```

pub mod trait_;
pub mod nelder_mead;

pub use trait_::Optimizer;
pub use nelder_mead::NelderMead;

use burn::config::Config;
use histreg_core::transform::TransformModel;
use serde::{Deserialize, Serialize};

/// Optimizer configuration.
#[derive(Config, Debug)]
pub struct OptimizerConfig {
    /// Maximum number of simplex iterations.
    #[config(default = 200)]
    pub max_iterations: usize,
    /// Stop once the score spread across the simplex is at most this.
    #[config(default = 1e-6)]
    pub tolerance: f64,
    /// Stop once the best score has not improved by `min_improvement` over
    /// this many iterations.
    #[config(default = 30)]
    pub patience: usize,
    /// Relative improvement of the best score expected over `patience`
    /// iterations.
    #[config(default = 1e-6)]
    pub min_improvement: f64,
    /// Initial simplex step per parameter; unit steps if `None`.
    pub initial_step: Option<Vec<f64>>,
}

/// Outcome of an optimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub best_params: Vec<f64>,
    pub best_score: f64,
    pub iterations: usize,
    pub converged: bool,
    /// Best score after each iteration.
    pub history: Vec<f64>,
}

/// Simplex steps suited to a transform model: 1 world unit for translations,
/// 1 degree for rotations and 0.05 for scales and shears.
pub fn default_steps(model: TransformModel) -> Vec<f64> {
    model
        .param_names()
        .iter()
        .map(|name| match name.as_bytes()[0] {
            b't' => 1.0,
            b'r' => 1.0f64.to_radians(),
            _ => 0.05,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OptimizerConfig::new();
        assert_eq!(config.max_iterations, 200);
        assert_eq!(config.patience, 30);
        assert_eq!(config.min_improvement, 1e-6);
        assert!(config.initial_step.is_none());
    }

    #[test]
    fn test_default_steps() {
        let steps = default_steps(TransformModel::Similarity);
        assert_eq!(steps.len(), 7);
        assert_eq!(steps[0], 1.0);
        assert!((steps[5] - std::f64::consts::PI / 180.0).abs() < 1e-15);
        assert_eq!(steps[6], 0.05);
    }
}
