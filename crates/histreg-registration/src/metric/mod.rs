//! Similarity measures.
//!
//! This module contains the histogram-based measures used to score an
//! alignment. All of them are maximized.

pub mod trait_;
pub mod correlation_coefficient;
pub mod correlation_ratio;
pub mod mutual_information;
pub mod normalized_mutual_information;

pub use trait_::Similarity;
pub use correlation_coefficient::CorrelationCoefficient;
pub use correlation_ratio::{CorrelationDirection, CorrelationRatio, CorrelationRatioL1};
pub use mutual_information::{Entropies, MutualInformation};
pub use normalized_mutual_information::{NormalizationMethod, NormalizedMutualInformation};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RegistrationError, Result};
use crate::histogram::{Histograms, JointHistogram};

/// The closed set of similarity measures, addressable by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMeasure {
    /// Correlation coefficient.
    Cc,
    /// Correlation ratio.
    #[default]
    Cr,
    /// L1 correlation ratio.
    Crl1,
    /// Mutual information.
    Mi,
    /// Normalized mutual information.
    Nmi,
}

impl SimilarityMeasure {
    pub const ALL: [SimilarityMeasure; 5] = [Self::Cc, Self::Cr, Self::Crl1, Self::Mi, Self::Nmi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cc => "cc",
            Self::Cr => "cr",
            Self::Crl1 => "crl1",
            Self::Mi => "mi",
            Self::Nmi => "nmi",
        }
    }

    /// The measure with its default settings.
    pub fn similarity(&self) -> Box<dyn Similarity + Send + Sync> {
        match self {
            Self::Cc => Box::new(CorrelationCoefficient),
            Self::Cr => Box::new(CorrelationRatio::default()),
            Self::Crl1 => Box::new(CorrelationRatioL1::default()),
            Self::Mi => Box::new(MutualInformation),
            Self::Nmi => Box::new(NormalizedMutualInformation::default()),
        }
    }
}

impl Similarity for SimilarityMeasure {
    fn evaluate(&self, histograms: &Histograms) -> f64 {
        match self {
            Self::Cc => CorrelationCoefficient.evaluate(histograms),
            Self::Cr => CorrelationRatio::default().evaluate(histograms),
            Self::Crl1 => CorrelationRatioL1::default().evaluate(histograms),
            Self::Mi => MutualInformation.evaluate(histograms),
            Self::Nmi => NormalizedMutualInformation::default().evaluate(histograms),
        }
    }

    fn name(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for SimilarityMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimilarityMeasure {
    type Err = RegistrationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| RegistrationError::unsupported_measure(s))
    }
}

/// Score a joint histogram and its marginals with `measure`.
///
/// Fails with a shape mismatch if the marginal lengths or sums disagree
/// with the joint histogram.
pub fn evaluate(
    measure: SimilarityMeasure,
    joint: &JointHistogram,
    from_marginal: &[u64],
    to_marginal: &[u64],
) -> Result<f64> {
    let histograms = Histograms::new(joint.clone(), from_marginal.to_vec(), to_marginal.to_vec())?;
    Ok(measure.evaluate(&histograms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identifiers() {
        for measure in SimilarityMeasure::ALL {
            assert_eq!(measure.to_string().parse::<SimilarityMeasure>().unwrap(), measure);
            assert_eq!(measure.similarity().name(), measure.as_str());
        }
        let err = "ssd".parse::<SimilarityMeasure>().unwrap_err();
        assert_eq!(err, RegistrationError::UnsupportedMeasure("ssd".to_string()));
    }

    #[test]
    fn test_default_is_correlation_ratio() {
        assert_eq!(SimilarityMeasure::default(), SimilarityMeasure::Cr);
    }

    #[test]
    fn test_evaluate_checks_shapes() {
        let joint = JointHistogram::from_counts(vec![1, 0, 0, 1, 0, 0], 2, 3).unwrap();
        let err = evaluate(SimilarityMeasure::Cc, &joint, &[1, 1, 0], &[1, 1]).unwrap_err();
        assert!(matches!(err, RegistrationError::ShapeMismatch { .. }));

        let score = evaluate(SimilarityMeasure::Cc, &joint, &[1, 1], &[1, 1, 0]).unwrap();
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_checks_totals() {
        let joint = JointHistogram::from_counts(vec![1, 0, 0, 1], 2, 2).unwrap();
        for measure in SimilarityMeasure::ALL {
            let err = evaluate(measure, &joint, &[5, 5], &[5, 5]).unwrap_err();
            assert!(matches!(err, RegistrationError::ShapeMismatch { .. }));
        }

        // Non-empty marginals over an empty joint histogram.
        let empty = JointHistogram::zeros(2, 2);
        let err = evaluate(SimilarityMeasure::Cc, &empty, &[1, 1], &[1, 1]).unwrap_err();
        assert!(matches!(err, RegistrationError::ShapeMismatch { .. }));
        assert_eq!(evaluate(SimilarityMeasure::Cc, &empty, &[0, 0], &[0, 0]).unwrap(), 0.0);
    }
}
