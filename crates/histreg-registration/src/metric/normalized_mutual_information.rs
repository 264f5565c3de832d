//! Normalized Mutual Information measure.

use serde::{Deserialize, Serialize};
use crate::histogram::Histograms;
use crate::metric::mutual_information::Entropies;
use crate::metric::trait_::Similarity;

/// Normalization method for NMI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationMethod {
    /// Normalize by joint entropy: (H(X) + H(Y)) / H(X,Y)
    JointEntropy,
    /// Normalize by average of marginal entropies: 2 * MI / (H(X) + H(Y))
    #[default]
    AverageEntropy,
    /// Normalize by minimum of marginal entropies: MI / min(H(X), H(Y))
    MinEntropy,
    /// Normalize by maximum of marginal entropies: MI / max(H(X), H(Y))
    MaxEntropy,
}

/// Normalized Mutual Information.
///
/// With the default [`NormalizationMethod::AverageEntropy`] the score lies in
/// `[0, 1]` and equals `2 - 2 H(X,Y) / (H(X) + H(Y))`, an increasing function
/// of the Studholme ratio `(H(X) + H(Y)) / H(X,Y)`. Identical images score 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedMutualInformation {
    normalization_method: NormalizationMethod,
}

impl NormalizedMutualInformation {
    pub fn new(normalization_method: NormalizationMethod) -> Self {
        Self { normalization_method }
    }

    pub fn normalization_method(&self) -> NormalizationMethod {
        self.normalization_method
    }
}

impl Similarity for NormalizedMutualInformation {
    fn evaluate(&self, histograms: &Histograms) -> f64 {
        let h = Entropies::compute(histograms);
        let mi = h.mutual_information();
        let (numerator, denominator) = match self.normalization_method {
            NormalizationMethod::JointEntropy => (h.from + h.to, h.joint),
            NormalizationMethod::AverageEntropy => (2.0 * mi, h.from + h.to),
            NormalizationMethod::MinEntropy => (mi, h.from.min(h.to)),
            NormalizationMethod::MaxEntropy => (mi, h.from.max(h.to)),
        };
        if denominator > 0.0 {
            numerator / denominator
        } else {
            0.0
        }
    }

    fn name(&self) -> &'static str {
        "nmi"
    }
}
