//! Registration session configuration.

use histreg_core::interpolation::Interpolation;
use serde::{Deserialize, Serialize};

use crate::clamp::ClampOptions;
use crate::error::Result;
use crate::histogram::Stride;
use crate::metric::SimilarityMeasure;

/// Configuration for a [`HistogramRegistration`](crate::HistogramRegistration) session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Voxel stride on the "from" grid.
    pub spacing: Stride,
    /// Similarity measure maximized by the search.
    pub measure: SimilarityMeasure,
    /// Sampling of the "to" volume.
    pub interpolation: Interpolation,
    /// Clamping of the "from" volume.
    pub from_clamp: ClampOptions,
    /// Clamping of the "to" volume.
    pub to_clamp: ClampOptions,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            spacing: Stride::unit(),
            measure: SimilarityMeasure::default(),
            interpolation: Interpolation::default(),
            from_clamp: ClampOptions::default(),
            to_clamp: ClampOptions::default(),
        }
    }
}

impl RegistrationConfig {
    /// Create a new registration config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the subsampling spacing; any component `<= 0` is rejected.
    pub fn with_spacing(mut self, spacing: [i64; 3]) -> Result<Self> {
        self.spacing = Stride::new(spacing)?;
        Ok(self)
    }

    pub fn with_measure(mut self, measure: SimilarityMeasure) -> Self {
        self.measure = measure;
        self
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Use the same bin count for both volumes.
    pub fn with_bins(mut self, bins: usize) -> Self {
        self.from_clamp.bins = bins;
        self.to_clamp.bins = bins;
        self
    }

    pub fn with_from_clamp(mut self, options: ClampOptions) -> Self {
        self.from_clamp = options;
        self
    }

    pub fn with_to_clamp(mut self, options: ClampOptions) -> Self {
        self.to_clamp = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistrationConfig::new();
        assert_eq!(config.spacing.get(), [1, 1, 1]);
        assert_eq!(config.measure, SimilarityMeasure::Cr);
        assert_eq!(config.interpolation, Interpolation::Nearest);
        assert_eq!(config.from_clamp.bins, 256);
        assert_eq!(config.to_clamp.bins, 256);
    }

    #[test]
    fn test_builders() {
        let config = RegistrationConfig::new()
            .with_spacing([2, 1, 3])
            .unwrap()
            .with_measure(SimilarityMeasure::Nmi)
            .with_interpolation(Interpolation::Trilinear)
            .with_bins(64)
            .with_to_clamp(ClampOptions::new(165).with_low_threshold(10.0));

        assert_eq!(config.spacing.get(), [2, 1, 3]);
        assert_eq!(config.from_clamp.bins, 64);
        assert_eq!(config.to_clamp.bins, 165);
        assert_eq!(config.to_clamp.low_threshold, Some(10.0));

        assert!(RegistrationConfig::new().with_spacing([0, 1, 3]).is_err());
    }
}
