//! Mutual information measure.

use crate::histogram::Histograms;
use crate::metric::trait_::{utils, Similarity};

/// Marginal and joint Shannon entropies (nats) of a histogram bundle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entropies {
    pub from: f64,
    pub to: f64,
    pub joint: f64,
}

impl Entropies {
    pub fn compute(histograms: &Histograms) -> Self {
        let total = histograms.total();
        Self {
            from: utils::entropy(histograms.from_marginal(), total),
            to: utils::entropy(histograms.to_marginal(), total),
            joint: utils::entropy(histograms.joint().counts(), total),
        }
    }

    /// `H(from) + H(to) - H(from, to)`.
    pub fn mutual_information(&self) -> f64 {
        self.from + self.to - self.joint
    }
}

/// Mutual information `H(X) + H(Y) - H(X, Y)` in nats.
#[derive(Debug, Clone, Copy, Default)]
pub struct MutualInformation;

impl Similarity for MutualInformation {
    fn evaluate(&self, histograms: &Histograms) -> f64 {
        Entropies::compute(histograms).mutual_information()
    }

    fn name(&self) -> &'static str {
        "mi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::JointHistogram;
    use std::f64::consts::LN_2;

    fn histograms(counts: Vec<u64>, from_bins: usize, to_bins: usize) -> Histograms {
        Histograms::from_joint(JointHistogram::from_counts(counts, from_bins, to_bins).unwrap())
    }

    #[test]
    fn test_mutual_information_identical() {
        // MI(X, X) = H(X).
        let h = histograms(vec![5, 0, 0, 5], 2, 2);
        assert!((MutualInformation.evaluate(&h) - LN_2).abs() < 1e-12);
    }

    #[test]
    fn test_mutual_information_independent() {
        let h = histograms(vec![3, 3, 3, 3], 2, 2);
        assert!(MutualInformation.evaluate(&h).abs() < 1e-12);
    }

    #[test]
    fn test_empty_histogram() {
        assert_eq!(MutualInformation.evaluate(&histograms(vec![0; 6], 2, 3)), 0.0);
    }
}
