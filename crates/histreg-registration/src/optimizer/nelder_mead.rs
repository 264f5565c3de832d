//! Nelder–Mead simplex search.

use std::cmp::Ordering;
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{RegistrationError, Result};
use crate::progress::{ProgressCallback, ProgressTracker};
use crate::validation::{validate_iterations, ConvergenceChecker};
use super::{OptimizationResult, Optimizer, OptimizerConfig};

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

#[derive(Debug, Clone)]
struct Vertex {
    params: Vec<f64>,
    score: f64,
}

/// Downhill simplex maximizer.
#[derive(Clone)]
pub struct NelderMead {
    config: OptimizerConfig,
    tracker: ProgressTracker,
}

impl NelderMead {
    pub fn new(config: OptimizerConfig) -> Self {
        Self {
            config,
            tracker: ProgressTracker::new(),
        }
    }

    pub fn with_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.tracker.add_callback(callback);
        self
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    fn initial_simplex(&self, start: &[f64]) -> Result<Vec<Vec<f64>>> {
        let steps = match &self.config.initial_step {
            Some(steps) if steps.len() != start.len() => {
                return Err(RegistrationError::ShapeMismatch {
                    expected: vec![start.len()],
                    actual: vec![steps.len()],
                });
            }
            Some(steps) => steps.clone(),
            None => vec![1.0; start.len()],
        };
        if steps.iter().any(|s| !s.is_finite() || *s == 0.0) {
            return Err(RegistrationError::invalid_argument(
                "initial simplex steps must be finite and non-zero",
            ));
        }

        let mut simplex = vec![start.to_vec()];
        for (i, step) in steps.iter().enumerate() {
            let mut vertex = start.to_vec();
            vertex[i] += step;
            simplex.push(vertex);
        }
        Ok(simplex)
    }
}

/// `a + t (b - a)`.
fn lerp(a: &[f64], b: &[f64], t: f64) -> Vec<f64> {
    a.iter().zip(b).map(|(&x, &y)| x + t * (y - x)).collect()
}

/// Descending score order with NaN last.
fn best_first(a: &Vertex, b: &Vertex) -> Ordering {
    match (a.score.is_nan(), b.score.is_nan()) {
        (false, false) => b.score.total_cmp(&a.score),
        (a_nan, b_nan) => a_nan.cmp(&b_nan),
    }
}

fn score_all<F>(points: Vec<Vec<f64>>, objective: &F) -> Result<Vec<Vertex>>
where
    F: Fn(&[f64]) -> Result<f64> + Sync,
{
    points
        .into_par_iter()
        .map(|params| {
            let score = objective(&params)?;
            Ok(Vertex { params, score })
        })
        .collect()
}

impl Optimizer for NelderMead {
    fn maximize<F>(&self, start: &[f64], objective: F) -> Result<OptimizationResult>
    where
        F: Fn(&[f64]) -> Result<f64> + Sync,
    {
        validate_iterations(self.config.max_iterations)?;
        if start.is_empty() {
            return Err(RegistrationError::invalid_argument("cannot optimize zero parameters"));
        }

        let checker = ConvergenceChecker::new(self.config.min_improvement, self.config.patience);
        let n = start.len();
        let mut simplex = score_all(self.initial_simplex(start)?, &objective)?;
        let mut history = Vec::with_capacity(self.config.max_iterations);
        let mut converged = false;
        let mut iterations = 0;

        tracing::info!("Nelder-Mead over {} parameters, up to {} iterations", n, self.config.max_iterations);
        self.tracker.start();

        while iterations < self.config.max_iterations {
            simplex.sort_by(best_first);

            let spread = simplex[0].score - simplex[n].score;
            if spread <= self.config.tolerance || checker.check_convergence(&history) {
                converged = true;
                break;
            }
            iterations += 1;

            let centroid: Vec<f64> = (0..n)
                .map(|d| simplex[..n].iter().map(|v| v.params[d]).sum::<f64>() / n as f64)
                .collect();
            let worst = simplex[n].clone();
            let second_worst = simplex[n - 1].score;

            let reflected = lerp(&centroid, &worst.params, -REFLECTION);
            let reflected_score = objective(&reflected)?;

            if reflected_score > simplex[0].score {
                let expanded = lerp(&centroid, &reflected, EXPANSION);
                let expanded_score = objective(&expanded)?;
                simplex[n] = if expanded_score > reflected_score {
                    Vertex { params: expanded, score: expanded_score }
                } else {
                    Vertex { params: reflected, score: reflected_score }
                };
            } else if reflected_score > second_worst {
                simplex[n] = Vertex { params: reflected, score: reflected_score };
            } else {
                // Contract toward the better of the reflected and worst points.
                let (towards, towards_score) = if reflected_score > worst.score {
                    (&reflected, reflected_score)
                } else {
                    (&worst.params, worst.score)
                };
                let contracted = lerp(&centroid, towards, CONTRACTION);
                let contracted_score = objective(&contracted)?;

                if contracted_score > towards_score {
                    simplex[n] = Vertex { params: contracted, score: contracted_score };
                } else {
                    let best = simplex[0].params.clone();
                    let shrunk: Vec<Vec<f64>> = simplex[1..]
                        .iter()
                        .map(|v| lerp(&best, &v.params, SHRINK))
                        .collect();
                    let mut rescored = score_all(shrunk, &objective)?;
                    simplex.truncate(1);
                    simplex.append(&mut rescored);
                }
            }

            let best_score = simplex.iter().map(|v| v.score).fold(f64::NEG_INFINITY, f64::max);
            history.push(best_score);
            self.tracker.update(iterations, Some(self.config.max_iterations), best_score, best_score);
            tracing::debug!("Nelder-Mead iteration {}: best score {:.6}", iterations, best_score);

            if self.tracker.should_stop() {
                break;
            }
        }

        let best = simplex
            .into_iter()
            .filter(|v| !v.score.is_nan())
            .min_by(best_first)
            .ok_or_else(|| RegistrationError::numerical_instability("every simplex vertex scored NaN"))?;

        self.tracker.complete(iterations, best.score);
        tracing::info!(
            "Nelder-Mead finished after {} iterations (converged: {}), best score {:.6}",
            iterations,
            converged,
            best.score
        );

        Ok(OptimizationResult {
            best_params: best.params,
            best_score: best.score,
            iterations,
            converged,
            history,
        })
    }

    fn name(&self) -> &'static str {
        "nelder-mead"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bowl(p: &[f64]) -> Result<f64> {
        Ok(-(p[0] - 3.0).powi(2) - 2.0 * (p[1] + 1.0).powi(2) - (p[2] - 0.5).powi(2))
    }

    #[test]
    fn test_maximizes_quadratic() {
        let config = OptimizerConfig::new().with_max_iterations(500).with_tolerance(1e-12);
        let result = NelderMead::new(config).maximize(&[0.0, 0.0, 0.0], bowl).unwrap();

        assert!(result.converged);
        assert!((result.best_params[0] - 3.0).abs() < 1e-3);
        assert!((result.best_params[1] + 1.0).abs() < 1e-3);
        assert!((result.best_params[2] - 0.5).abs() < 1e-3);
        assert!(result.history.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_iteration_budget() {
        let config = OptimizerConfig::new().with_max_iterations(3).with_tolerance(0.0);
        let result = NelderMead::new(config).maximize(&[0.0, 0.0, 0.0], bowl).unwrap();
        assert_eq!(result.iterations, 3);
        assert_eq!(result.history.len(), 3);
        assert!(!result.converged);
    }

    #[test]
    fn test_patience_uses_min_improvement() {
        // Spread never reaches zero, so only the stall check can stop early.
        let stalled = OptimizerConfig::new()
            .with_tolerance(0.0)
            .with_patience(2)
            .with_min_improvement(1e9);
        let result = NelderMead::new(stalled).maximize(&[0.0, 0.0, 0.0], bowl).unwrap();
        assert!(result.converged);
        assert_eq!(result.iterations, 3);

        let patient = OptimizerConfig::new()
            .with_max_iterations(20)
            .with_tolerance(0.0)
            .with_patience(2)
            .with_min_improvement(0.0);
        let result = NelderMead::new(patient).maximize(&[0.0, 0.0, 0.0], bowl).unwrap();
        assert!(!result.converged);
        assert_eq!(result.iterations, 20);
    }

    #[test]
    fn test_invalid_steps() {
        let config = OptimizerConfig::new().with_initial_step(Some(vec![1.0, 1.0]));
        let err = NelderMead::new(config).maximize(&[0.0, 0.0, 0.0], bowl).unwrap_err();
        assert!(matches!(err, RegistrationError::ShapeMismatch { .. }));

        let config = OptimizerConfig::new().with_initial_step(Some(vec![1.0, 0.0, 1.0]));
        assert!(NelderMead::new(config).maximize(&[0.0, 0.0, 0.0], bowl).is_err());
    }

    #[test]
    fn test_objective_error_propagates() {
        let result = NelderMead::new(OptimizerConfig::new())
            .maximize(&[0.0], |_| Err(RegistrationError::invalid_argument("bad")));
        assert!(result.unwrap_err().is_invalid_argument());
    }
}
