//! Intensity clamping.
//!
//! Raw samples are mapped to integer bins in `[0, bins - 1]` before any
//! histogram is accumulated. Integer volumes whose intensity window already
//! fits in the requested bins are only shifted, so their dynamic range may be
//! smaller than `bins`; everything else is affinely rescaled onto the bins.

use burn::tensor::backend::Backend;
use histreg_core::image::{SampleKind, Volume};
use histreg_core::interpolation::LabelView;
use nalgebra::Matrix4;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validation::{validate_bins, validate_thresholds};

/// Default number of intensity bins.
pub const DEFAULT_BINS: usize = 256;

/// Options for [`clamp`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClampOptions {
    /// Number of bins, in `[1, 65536]`.
    pub bins: usize,
    /// Lower bound of the intensity window; the observed minimum if `None`.
    pub low_threshold: Option<f64>,
    /// Upper bound of the intensity window; the observed maximum if `None`.
    pub high_threshold: Option<f64>,
}

impl Default for ClampOptions {
    fn default() -> Self {
        Self::new(DEFAULT_BINS)
    }
}

impl ClampOptions {
    pub fn new(bins: usize) -> Self {
        Self {
            bins,
            low_threshold: None,
            high_threshold: None,
        }
    }

    pub fn with_low_threshold(mut self, low: f64) -> Self {
        self.low_threshold = Some(low);
        self
    }

    pub fn with_high_threshold(mut self, high: f64) -> Self {
        self.high_threshold = Some(high);
        self
    }
}

/// A volume of intensity bins.
#[derive(Debug, Clone, PartialEq)]
pub struct ClampedVolume {
    data: Vec<u16>,
    shape: [usize; 3],
    affine: Matrix4<f64>,
    bins: usize,
    intensity_range: (f64, f64),
    dynamic_range: usize,
}

impl ClampedVolume {
    /// Bin labels in row-major `[dx, dy, dz]` order.
    pub fn data(&self) -> &[u16] {
        &self.data
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Voxel-to-world affine of the source volume.
    pub fn affine(&self) -> &Matrix4<f64> {
        &self.affine
    }

    /// Requested bin count.
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Intensity window `(lo, hi)` that was mapped onto the bins.
    pub fn intensity_range(&self) -> (f64, f64) {
        self.intensity_range
    }

    /// `max(label) + 1`: the histogram size along this volume's axis.
    pub fn dynamic_range(&self) -> usize {
        self.dynamic_range
    }

    /// Borrow the labels as a sampler view.
    pub fn view(&self) -> Result<LabelView<'_>> {
        Ok(LabelView::new(&self.data, self.shape)?)
    }
}

/// Clamp `volume` into `bins` bins over its full intensity range.
pub fn clamp_with_bins<B: Backend>(volume: &Volume<B>, bins: usize) -> Result<ClampedVolume> {
    clamp(volume, &ClampOptions::new(bins))
}

/// Map the samples of `volume` to intensity bins.
///
/// Samples outside the window saturate to the first or last bin; NaN samples
/// fall into bin 0. The source volume is left untouched.
pub fn clamp<B: Backend>(volume: &Volume<B>, options: &ClampOptions) -> Result<ClampedVolume> {
    validate_bins(options.bins)?;
    validate_thresholds(options.low_threshold, options.high_threshold)?;

    let samples = volume.host_samples()?;
    let (min, max) = samples
        .par_iter()
        .fold(
            || (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), &v| (lo.min(v), hi.max(v)),
        )
        .reduce(
            || (f64::INFINITY, f64::NEG_INFINITY),
            |a, b| (a.0.min(b.0), a.1.max(b.1)),
        );

    let lo = options.low_threshold.unwrap_or(min);
    let hi = options.high_threshold.unwrap_or(max).max(lo);
    let last_bin = (options.bins - 1) as f64;

    let data: Vec<u16> = if !lo.is_finite() || hi <= lo {
        vec![0; samples.len()]
    } else if volume.kind() == SampleKind::Integer && hi - lo <= last_bin {
        samples
            .par_iter()
            .map(|&v| (v.clamp(lo, hi) - lo).round() as u16)
            .collect()
    } else {
        let scale = last_bin / (hi - lo);
        samples
            .par_iter()
            .map(|&v| ((v.clamp(lo, hi) - lo) * scale).round().min(last_bin) as u16)
            .collect()
    };

    let dynamic_range = data.par_iter().copied().max().map_or(1, |m| m as usize + 1);
    tracing::debug!(
        "Clamped {} voxels into {} bins (window [{}, {}], dynamic range {})",
        data.len(),
        options.bins,
        lo,
        hi,
        dynamic_range
    );

    Ok(ClampedVolume {
        data,
        shape: volume.shape(),
        affine: *volume.affine(),
        bins: options.bins,
        intensity_range: (lo, hi),
        dynamic_range,
    })
}
