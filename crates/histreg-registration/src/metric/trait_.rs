//! Similarity trait for histogram-based measures.
//!
//! Every measure reads a joint histogram of bin indices and its marginals and
//! returns a score where higher means better aligned.

use crate::histogram::Histograms;

/// Similarity measure computed from joint and marginal histograms.
///
/// Measures only see a [`Histograms`] bundle, whose marginals are checked
/// against the joint histogram's shape and total when it is built.
pub trait Similarity {
    /// Score the histograms. Degenerate inputs (no samples, zero variance
    /// or zero entropy) score `0.0`.
    fn evaluate(&self, histograms: &Histograms) -> f64;

    /// Get the identifier of this measure.
    fn name(&self) -> &'static str;
}

/// Statistics of count-weighted bin indices shared by the measures.
pub(crate) mod utils {
    /// Count-weighted mean and variance of bin indices.
    pub fn moments(counts: &[u64]) -> Option<(f64, f64)> {
        let n: u64 = counts.iter().sum();
        if n == 0 {
            return None;
        }
        let n = n as f64;
        let mean = counts
            .iter()
            .enumerate()
            .map(|(bin, &c)| bin as f64 * c as f64)
            .sum::<f64>()
            / n;
        let variance = counts
            .iter()
            .enumerate()
            .map(|(bin, &c)| {
                let d = bin as f64 - mean;
                d * d * c as f64
            })
            .sum::<f64>()
            / n;
        Some((mean, variance))
    }

    /// Lower weighted median of bin indices.
    pub fn median(counts: &[u64]) -> Option<usize> {
        let n: u64 = counts.iter().sum();
        if n == 0 {
            return None;
        }
        let mut cumulative = 0u64;
        counts.iter().position(|&c| {
            cumulative += c;
            2 * cumulative >= n
        })
    }

    /// Sum of `count * |bin - center|`.
    pub fn absolute_deviation(counts: &[u64], center: usize) -> f64 {
        counts
            .iter()
            .enumerate()
            .map(|(bin, &c)| bin.abs_diff(center) as f64 * c as f64)
            .sum()
    }

    /// Shannon entropy (nats) of counts normalized by `total`, with `0 log 0 = 0`.
    pub fn entropy<'a>(counts: impl IntoIterator<Item = &'a u64>, total: u64) -> f64 {
        if total == 0 {
            return 0.0;
        }
        let total = total as f64;
        -counts
            .into_iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let p = c as f64 / total;
                p * p.ln()
            })
            .sum::<f64>()
    }
}
