//! Optimizer trait for derivative-free parameter search.

use crate::error::Result;
use super::OptimizationResult;

/// Optimizer trait for maximizing a score over a parameter vector.
///
/// The objective is called from worker threads, so it must be `Sync`.
/// Errors returned by the objective abort the search and are propagated.
pub trait Optimizer {
    /// Maximize `objective`, starting at `start`.
    fn maximize<F>(&self, start: &[f64], objective: F) -> Result<OptimizationResult>
    where
        F: Fn(&[f64]) -> Result<f64> + Sync;

    /// Get the name of this optimizer.
    fn name(&self) -> &'static str;
}
