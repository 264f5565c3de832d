//! Correlation coefficient measure.

use crate::histogram::Histograms;
use crate::metric::trait_::{utils, Similarity};

/// Pearson correlation between "from" and "to" bin indices, weighted by the
/// joint counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrelationCoefficient;

impl Similarity for CorrelationCoefficient {
    fn evaluate(&self, histograms: &Histograms) -> f64 {
        let (joint, from_marginal, to_marginal) =
            (histograms.joint(), histograms.from_marginal(), histograms.to_marginal());
        let (Some((mx, vx)), Some((my, vy))) = (utils::moments(from_marginal), utils::moments(to_marginal)) else {
            return 0.0;
        };
        if vx <= 0.0 || vy <= 0.0 {
            return 0.0;
        }

        let n = joint.total() as f64;
        let mut covariance = 0.0;
        for (x, _) in from_marginal.iter().enumerate().filter(|&(_, &c)| c > 0) {
            let dx = x as f64 - mx;
            for (y, &c) in joint.row(x).iter().enumerate().filter(|&(_, &c)| c > 0) {
                covariance += dx * (y as f64 - my) * c as f64;
            }
        }
        (covariance / n) / (vx * vy).sqrt()
    }

    fn name(&self) -> &'static str {
        "cc"
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
    fn test_perfect_correlation() {
        let h = histograms(vec![3, 0, 0, 0, 5, 0, 0, 0, 2], 3, 3);
        assert!((CorrelationCoefficient.evaluate(&h) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_anti_correlation() {
        let h = histograms(vec![0, 4, 4, 0], 2, 2);
        assert!((CorrelationCoefficient.evaluate(&h) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_independent_channels() {
        let h = histograms(vec![1, 1, 1, 1], 2, 2);
        assert!(CorrelationCoefficient.evaluate(&h).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(CorrelationCoefficient.evaluate(&histograms(vec![0; 4], 2, 2)), 0.0);
        // Constant "from" channel.
        assert_eq!(CorrelationCoefficient.evaluate(&histograms(vec![2, 3], 1, 2)), 0.0);
    }
}
