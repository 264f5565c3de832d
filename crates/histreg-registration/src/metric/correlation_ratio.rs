//! Correlation ratio measures.
//!
//! The correlation ratio measures how well one channel's bin predicts the
//! other's: the share of the predicted channel's dispersion explained by the
//! conditioning channel. The L2 variant uses variances, the L1 variant mean
//! absolute deviations around the median.

use serde::{Deserialize, Serialize};
use crate::histogram::Histograms;
use crate::metric::trait_::{utils, Similarity};

/// Direction of correlation ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationDirection {
    /// Predict the "to" bin from the "from" bin.
    #[default]
    ToGivenFrom,
    /// Predict the "from" bin from the "to" bin.
    FromGivenTo,
}

impl CorrelationDirection {
    /// Visit the conditional distributions and return the marginal of the
    /// predicted channel.
    fn conditionals<'a>(&self, histograms: &'a Histograms, mut visit: impl FnMut(&[u64])) -> &'a [u64] {
        let (joint, from_marginal, to_marginal) =
            (histograms.joint(), histograms.from_marginal(), histograms.to_marginal());
        let [from_bins, to_bins] = joint.shape();
        match self {
            Self::ToGivenFrom => {
                for x in (0..from_bins).filter(|&x| from_marginal[x] > 0) {
                    visit(joint.row(x));
                }
                to_marginal
            }
            Self::FromGivenTo => {
                let mut column = vec![0u64; from_bins];
                for y in (0..to_bins).filter(|&y| to_marginal[y] > 0) {
                    for (x, c) in column.iter_mut().enumerate() {
                        *c = joint.get(x, y);
                    }
                    visit(&column);
                }
                from_marginal
            }
        }
    }
}

/// Correlation ratio `η² = 1 - Σ n_x Var(Y|x) / (n Var(Y))`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrelationRatio {
    direction: CorrelationDirection,
}

impl CorrelationRatio {
    pub fn new(direction: CorrelationDirection) -> Self {
        Self { direction }
    }

    pub fn direction(&self) -> CorrelationDirection {
        self.direction
    }
}

impl Similarity for CorrelationRatio {
    fn evaluate(&self, histograms: &Histograms) -> f64 {
        let mut within = 0.0;
        let predicted = self.direction.conditionals(histograms, |conditional| {
            if let Some((_, variance)) = utils::moments(conditional) {
                let n: u64 = conditional.iter().sum();
                within += n as f64 * variance;
            }
        });

        let n: u64 = predicted.iter().sum();
        match utils::moments(predicted) {
            Some((_, variance)) if variance > 0.0 => 1.0 - within / (n as f64 * variance),
            _ => 0.0,
        }
    }

    fn name(&self) -> &'static str {
        "cr"
    }
}

/// L1 correlation ratio `1 - Σ n_x MAD(Y|x) / (n MAD(Y))`, deviations taken
/// around the weighted median.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrelationRatioL1 {
    direction: CorrelationDirection,
}

impl CorrelationRatioL1 {
    pub fn new(direction: CorrelationDirection) -> Self {
        Self { direction }
    }
}

impl Similarity for CorrelationRatioL1 {
    fn evaluate(&self, histograms: &Histograms) -> f64 {
        let mut within = 0.0;
        let predicted = self.direction.conditionals(histograms, |conditional| {
            if let Some(median) = utils::median(conditional) {
                within += utils::absolute_deviation(conditional, median);
            }
        });

        let total = utils::median(predicted).map(|m| utils::absolute_deviation(predicted, m));
        match total {
            Some(dispersion) if dispersion > 0.0 => 1.0 - within / dispersion,
            _ => 0.0,
        }
    }

    fn name(&self) -> &'static str {
        "crl1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::JointHistogram;

    fn histograms(counts: Vec<u64>, from_bins: usize, to_bins: usize) -> Histograms {
        Histograms::from_joint(JointHistogram::from_counts(counts, from_bins, to_bins).unwrap())
    }

    #[test]
    fn test_functional_dependence() {
        // Every "from" bin maps to a single "to" bin, but not the other way round.
        let h = histograms(vec![4, 0, 4, 0, 0, 2], 3, 2);
        assert!((CorrelationRatio::default().evaluate(&h) - 1.0).abs() < 1e-12);
        assert!((CorrelationRatioL1::default().evaluate(&h) - 1.0).abs() < 1e-12);

        let reverse = CorrelationRatio::new(CorrelationDirection::FromGivenTo).evaluate(&h);
        assert!(reverse < 1.0 && reverse > 0.0);
    }

    #[test]
    fn test_independent_channels() {
        let h = histograms(vec![2, 1, 2, 1], 2, 2);
        assert!(CorrelationRatio::default().evaluate(&h).abs() < 1e-12);
        assert!(CorrelationRatioL1::default().evaluate(&h).abs() < 1e-12);
    }

    #[test]
    fn test_partial_dependence() {
        // Y | x=0 is spread over {0, 1}; Y | x=1 is concentrated at 2.
        let h = histograms(vec![1, 1, 0, 0, 0, 2], 2, 3);
        // Var(Y) = 0.6875, within = 2 * 0.25 = 0.5, n = 4.
        let cr = CorrelationRatio::default().evaluate(&h);
        assert!((cr - (1.0 - 0.5 / (4.0 * 0.6875))).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(CorrelationRatio::default().evaluate(&histograms(vec![0; 4], 2, 2)), 0.0);
        // Constant "to" channel has no variance to explain.
        assert_eq!(CorrelationRatio::default().evaluate(&histograms(vec![3, 5], 2, 1)), 0.0);
        assert_eq!(CorrelationRatioL1::default().evaluate(&histograms(vec![3, 5], 2, 1)), 0.0);
    }
}
