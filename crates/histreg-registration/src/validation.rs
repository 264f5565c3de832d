//! Validation utilities for registration operations.
//!
//! Argument checks shared by the clamp, histogram and search code, and the
//! convergence test used by the optimizer.

use crate::error::{RegistrationError, Result};

/// Largest bin count representable by the `u16` labels of a clamped volume.
pub const MAX_BINS: usize = u16::MAX as usize + 1;

/// Validate a subsampling spacing and convert it to a voxel stride.
pub fn validate_spacing(spacing: [i64; 3]) -> Result<[usize; 3]> {
    if spacing.iter().any(|&s| s <= 0) {
        return Err(RegistrationError::invalid_argument(format!(
            "spacing components must be positive, got {:?}",
            spacing
        )));
    }
    Ok(spacing.map(|s| s as usize))
}

/// Validate a clamp bin count.
pub fn validate_bins(bins: usize) -> Result<()> {
    if bins == 0 {
        return Err(RegistrationError::invalid_argument("Number of bins must be at least 1"));
    }

    if bins > MAX_BINS {
        return Err(RegistrationError::invalid_argument(format!(
            "Number of bins too large: {} (max {})",
            bins, MAX_BINS
        )));
    }

    Ok(())
}

/// Validate an optional intensity window.
pub fn validate_thresholds(low: Option<f64>, high: Option<f64>) -> Result<()> {
    for (name, value) in [("low", low), ("high", high)] {
        if let Some(v) = value {
            if !v.is_finite() {
                return Err(RegistrationError::invalid_argument(format!(
                    "{} threshold must be finite, got {}",
                    name, v
                )));
            }
        }
    }

    if let (Some(lo), Some(hi)) = (low, high) {
        if lo > hi {
            return Err(RegistrationError::invalid_argument(format!(
                "low threshold ({}) must not exceed high threshold ({})",
                lo, hi
            )));
        }
    }

    Ok(())
}

/// Validate that marginal lengths agree with a `(from_bins, to_bins)` joint histogram.
pub fn validate_histogram_shapes(
    joint_shape: [usize; 2],
    from_marginal_len: usize,
    to_marginal_len: usize,
) -> Result<()> {
    if joint_shape != [from_marginal_len, to_marginal_len] {
        return Err(RegistrationError::ShapeMismatch {
            expected: joint_shape.to_vec(),
            actual: vec![from_marginal_len, to_marginal_len],
        });
    }
    Ok(())
}

/// Validate that both marginals account for every pair of the joint histogram.
pub fn validate_histogram_totals(joint_total: u64, from_total: u64, to_total: u64) -> Result<()> {
    if from_total != joint_total || to_total != joint_total {
        return Err(RegistrationError::ShapeMismatch {
            expected: vec![joint_total as usize; 2],
            actual: vec![from_total as usize, to_total as usize],
        });
    }
    Ok(())
}

/// Validate iteration count.
pub fn validate_iterations(iterations: usize) -> Result<()> {
    if iterations == 0 {
        return Err(RegistrationError::invalid_argument("Iterations must be positive"));
    }

    if iterations > 1_000_000 {
        return Err(RegistrationError::invalid_argument(format!(
            "Iterations too large: {}",
            iterations
        )));
    }

    Ok(())
}

/// Check for convergence based on the history of best scores.
///
/// Scores are maximized, so the history is expected to be non-decreasing.
#[derive(Debug, Clone)]
pub struct ConvergenceChecker {
    /// Minimum relative improvement over the patience window.
    pub min_improvement: f64,
    /// Number of iterations to check for improvement.
    pub patience: usize,
    /// Score at which the search stops immediately.
    pub target_score: Option<f64>,
}

impl Default for ConvergenceChecker {
    fn default() -> Self {
        Self {
            min_improvement: 1e-6,
            patience: 50,
            target_score: None,
        }
    }
}

impl ConvergenceChecker {
    /// Create a new convergence checker.
    pub fn new(min_improvement: f64, patience: usize) -> Self {
        Self {
            min_improvement,
            patience,
            target_score: None,
        }
    }

    /// Set a target score.
    pub fn with_target_score(mut self, target: f64) -> Self {
        self.target_score = Some(target);
        self
    }

    /// Returns true if the score history has converged.
    pub fn check_convergence(&self, score_history: &[f64]) -> bool {
        let Some(&current) = score_history.last() else {
            return false;
        };

        if let Some(target) = self.target_score {
            if current >= target {
                return true;
            }
        }

        // Need at least patience + 1 samples
        if score_history.len() < self.patience + 1 {
            return false;
        }

        let window = &score_history[score_history.len() - self.patience - 1..];
        let first = window[0];
        let relative_improvement = (current - first) / (first.abs() + 1e-10);

        relative_improvement < self.min_improvement
    }
}
