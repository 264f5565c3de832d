//! Progress tracking and callbacks for parameter searches.
//!
//! Exploration reports after every evaluated batch and optimization after
//! every simplex iteration. Any callback may ask the search to stop early; the
//! search then returns the best point found so far.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Progress information for one search step.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Number of completed evaluations or iterations.
    pub iteration: usize,
    /// Total number of steps (if known).
    pub total_iterations: Option<usize>,
    /// Score of the most recent step.
    pub score: f64,
    /// Best score seen so far.
    pub best_score: f64,
    /// Time elapsed since start.
    pub elapsed: Duration,
    /// Estimated remaining time.
    pub estimated_remaining: Option<Duration>,
}

impl ProgressInfo {
    pub fn new(
        iteration: usize,
        total_iterations: Option<usize>,
        score: f64,
        best_score: f64,
        elapsed: Duration,
    ) -> Self {
        Self {
            iteration,
            total_iterations,
            score,
            best_score,
            elapsed,
            estimated_remaining: None,
        }
    }

    /// Completed share of the search, if its length is known.
    pub fn progress_percent(&self) -> Option<f64> {
        self.total_iterations
            .filter(|&total| total > 0)
            .map(|total| (self.iteration as f64 / total as f64) * 100.0)
    }

    /// Extrapolate `estimated_remaining` from the mean step time.
    pub fn calculate_remaining(&mut self) {
        if let Some(total) = self.total_iterations {
            if self.iteration > 0 {
                let avg_time_per_iter = self.elapsed.as_secs_f64() / self.iteration as f64;
                let remaining_iters = total.saturating_sub(self.iteration);
                self.estimated_remaining = Some(Duration::from_secs_f64(
                    avg_time_per_iter * remaining_iters as f64,
                ));
            }
        }
    }
}

/// Observer of a running exploration or optimization.
pub trait ProgressCallback: Send + Sync {
    /// Called after each batch or iteration.
    fn on_progress(&self, info: &ProgressInfo);

    fn on_start(&self) {}

    /// Called when the search completes.
    fn on_complete(&self, _info: &ProgressInfo) {}

    /// Called when the search fails.
    fn on_error(&self, _error: &str) {}

    /// Whether the search should stop after the current step.
    fn should_stop(&self) -> bool {
        false
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Logs every `log_interval`-th step through `tracing`.
#[derive(Debug, Clone)]
pub struct ConsoleProgressCallback {
    /// Steps between log lines.
    pub log_interval: usize,
}

impl Default for ConsoleProgressCallback {
    fn default() -> Self {
        Self { log_interval: 10 }
    }
}

impl ConsoleProgressCallback {
    pub fn new(log_interval: usize) -> Self {
        Self {
            log_interval: log_interval.max(1),
        }
    }
}

impl ProgressCallback for ConsoleProgressCallback {
    fn on_progress(&self, info: &ProgressInfo) {
        if info.iteration % self.log_interval == 0 || info.total_iterations == Some(info.iteration) {
            let progress = info.progress_percent().unwrap_or(0.0);
            let remaining = info
                .estimated_remaining
                .map(|d| format!("{:.2}s", d.as_secs_f64()))
                .unwrap_or_else(|| "N/A".to_string());

            tracing::info!(
                "Step {}/{} ({:.1}%) | Score: {:.6} | Best: {:.6} | Elapsed: {:.2}s | ETA: {}",
                info.iteration,
                info.total_iterations.map(|n| n.to_string()).unwrap_or_else(|| "?".to_string()),
                progress,
                info.score,
                info.best_score,
                info.elapsed.as_secs_f64(),
                remaining
            );
        }
    }

    fn on_start(&self) {
        tracing::info!("Search started");
    }

    fn on_complete(&self, info: &ProgressInfo) {
        tracing::info!(
            "Search completed in {:.2}s with best score: {:.6}",
            info.elapsed.as_secs_f64(),
            info.best_score
        );
    }

    fn on_error(&self, error: &str) {
        tracing::error!("Search failed: {}", error);
    }
}

/// Records every report it receives.
#[derive(Debug, Clone, Default)]
pub struct HistoryCallback {
    history: Arc<Mutex<Vec<ProgressInfo>>>,
}

impl HistoryCallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the recorded history.
    pub fn get_history(&self) -> Vec<ProgressInfo> {
        lock(&self.history).clone()
    }

    /// Clear the history.
    pub fn clear(&self) {
        lock(&self.history).clear();
    }
}

impl ProgressCallback for HistoryCallback {
    fn on_progress(&self, info: &ProgressInfo) {
        lock(&self.history).push(info.clone());
    }
}

#[derive(Debug)]
struct EarlyStoppingState {
    counter: usize,
    best_score: f64,
    should_stop: bool,
}

/// Stops a search once the best score stalls or reaches a target.
#[derive(Debug, Clone)]
pub struct EarlyStoppingCallback {
    /// Minimum improvement of the best score to reset patience.
    pub min_improvement: f64,
    /// Number of steps to wait for improvement.
    pub patience: usize,
    /// Score at which to stop immediately.
    pub target_score: Option<f64>,
    state: Arc<Mutex<EarlyStoppingState>>,
}

impl EarlyStoppingCallback {
    /// Create a new early stopping callback.
    pub fn new(min_improvement: f64, patience: usize) -> Self {
        Self {
            min_improvement,
            patience,
            target_score: None,
            state: Arc::new(Mutex::new(EarlyStoppingState {
                counter: 0,
                best_score: f64::NEG_INFINITY,
                should_stop: false,
            })),
        }
    }

    /// Stop as soon as the best score reaches `target`.
    pub fn with_target_score(mut self, target: f64) -> Self {
        self.target_score = Some(target);
        self
    }

    /// Forget the scores seen so far.
    pub fn reset(&self) {
        let mut state = lock(&self.state);
        state.counter = 0;
        state.best_score = f64::NEG_INFINITY;
        state.should_stop = false;
    }
}

impl ProgressCallback for EarlyStoppingCallback {
    /// Each search starts with fresh patience.
    fn on_start(&self) {
        self.reset();
    }

    fn on_progress(&self, info: &ProgressInfo) {
        let mut state = lock(&self.state);

        if let Some(target) = self.target_score {
            if info.best_score >= target {
                state.should_stop = true;
                tracing::info!("Early stopping: score {} reached target {}", info.best_score, target);
                return;
            }
        }

        if info.best_score - state.best_score > self.min_improvement {
            state.best_score = info.best_score;
            state.counter = 0;
        } else {
            state.counter += 1;
        }

        if state.counter >= self.patience {
            state.should_stop = true;
            tracing::info!(
                "Early stopping: no improvement for {} steps (best score: {:.6})",
                self.patience,
                state.best_score
            );
        }
    }

    fn should_stop(&self) -> bool {
        lock(&self.state).should_stop
    }
}

/// Fans progress reports out to the registered callbacks.
#[derive(Clone, Default)]
pub struct ProgressTracker {
    callbacks: Vec<Arc<dyn ProgressCallback>>,
    start_time: Arc<Mutex<Option<Instant>>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_callback(&mut self, callback: Arc<dyn ProgressCallback>) {
        self.callbacks.push(callback);
    }

    /// Builder form of [`Self::add_callback`].
    pub fn with_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.add_callback(callback);
        self
    }

    /// Reset the clock and notify callbacks.
    pub fn start(&self) {
        *lock(&self.start_time) = Some(Instant::now());
        for callback in &self.callbacks {
            callback.on_start();
        }
    }

    fn elapsed(&self) -> Duration {
        lock(&self.start_time).map(|t| t.elapsed()).unwrap_or(Duration::ZERO)
    }

    pub fn update(&self, iteration: usize, total_iterations: Option<usize>, score: f64, best_score: f64) {
        let mut info = ProgressInfo::new(iteration, total_iterations, score, best_score, self.elapsed());
        info.calculate_remaining();

        for callback in &self.callbacks {
            callback.on_progress(&info);
        }
    }

    pub fn complete(&self, iterations: usize, best_score: f64) {
        let info = ProgressInfo::new(iterations, Some(iterations), best_score, best_score, self.elapsed());
        for callback in &self.callbacks {
            callback.on_complete(&info);
        }
    }

    pub fn error(&self, error: &str) {
        for callback in &self.callbacks {
            callback.on_error(error);
        }
    }

    /// Whether any callback asked to stop.
    pub fn should_stop(&self) -> bool {
        self.callbacks.iter().any(|c| c.should_stop())
    }
}
