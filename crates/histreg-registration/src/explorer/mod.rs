//! Brute-force search over a parameter grid.
//!
//! Grid points are pulled from a [`ParameterGrid`] in batches; each batch is
//! scored in parallel and merged in grid order, so the result does not depend
//! on scheduling. Ties keep the earliest point.

pub mod grid;

pub use grid::{AxisSpec, ParameterGrid};

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{RegistrationError, Result};
use crate::progress::{ProgressCallback, ProgressTracker};

/// Number of grid points scored per batch by default.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// One scored grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSample {
    pub params: Vec<f64>,
    pub score: f64,
}

/// Outcome of an exploration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exploration {
    pub best_score: f64,
    pub best_params: Vec<f64>,
    /// Every scored point, in grid order.
    pub trajectory: Vec<GridSample>,
    /// Whether a progress callback ended the search before the grid was exhausted.
    pub stopped_early: bool,
}

/// Batched, parallel grid search.
#[derive(Clone)]
pub struct Explorer {
    batch_size: usize,
    tracker: ProgressTracker,
}

impl Default for Explorer {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            tracker: ProgressTracker::new(),
        }
    }
}

impl Explorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of points scored between progress reports.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.tracker.add_callback(callback);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Score every point of `grid` with `objective` and keep the best one.
    pub fn run<F>(&self, mut grid: ParameterGrid, objective: F) -> Result<Exploration>
    where
        F: Fn(&[f64]) -> Result<f64> + Sync,
    {
        let total = grid.len();
        tracing::info!("Exploring {} grid points in batches of {}", total, self.batch_size);
        self.tracker.start();

        let mut trajectory: Vec<GridSample> = Vec::with_capacity(total);
        let mut best: Option<(usize, f64)> = None;
        let mut stopped_early = false;

        loop {
            let batch: Vec<Vec<f64>> = grid.by_ref().take(self.batch_size).collect();
            if batch.is_empty() {
                break;
            }

            let scores = batch
                .par_iter()
                .map(|params| objective(params))
                .collect::<Result<Vec<f64>>>();
            let scores = match scores {
                Ok(scores) => scores,
                Err(e) => {
                    self.tracker.error(&e.to_string());
                    return Err(e);
                }
            };

            let mut batch_best = f64::NEG_INFINITY;
            for (params, score) in batch.into_iter().zip(scores) {
                if best.map_or(true, |(_, b)| score > b) {
                    best = Some((trajectory.len(), score));
                }
                batch_best = batch_best.max(score);
                trajectory.push(GridSample { params, score });
            }

            let best_score = best.map_or(f64::NEG_INFINITY, |(_, s)| s);
            self.tracker.update(trajectory.len(), Some(total), batch_best, best_score);
            tracing::debug!(
                "Explored {}/{} points, best score so far {:.6}",
                trajectory.len(),
                total,
                best_score
            );

            if self.tracker.should_stop() {
                stopped_early = trajectory.len() < total;
                tracing::info!("Exploration stopped after {} of {} points", trajectory.len(), total);
                break;
            }
        }

        let Some((index, best_score)) = best else {
            return Err(RegistrationError::invalid_argument("parameter grid is empty"));
        };
        self.tracker.complete(trajectory.len(), best_score);
        tracing::info!(
            "Exploration finished: best score {:.6} at point {} of {}",
            best_score,
            index,
            trajectory.len()
        );

        Ok(Exploration {
            best_score,
            best_params: trajectory[index].params.clone(),
            trajectory,
            stopped_early,
        })
    }
}
