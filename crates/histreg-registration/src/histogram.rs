//! Joint intensity histograms.
//!
//! The "to" volume is resampled onto a strided subset of the "from" voxel
//! grid through `to_affine⁻¹ · T · from_affine`, and every in-bounds pair of
//! bins is counted. Counts are integers, so the parallel merge is exact and
//! repeated builds are bit-identical.

use histreg_core::image::StridedGrid;
use histreg_core::interpolation::Interpolation;
use histreg_core::transform::{MatrixTransform, Transform};
use nalgebra::Matrix4;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::clamp::ClampedVolume;
use crate::error::{RegistrationError, Result};
use crate::validation::{validate_histogram_shapes, validate_histogram_totals, validate_spacing};

/// A validated subsampling spacing: positive voxel steps along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[i64; 3]", into = "[i64; 3]")]
pub struct Stride([usize; 3]);

impl Stride {
    /// Validate `spacing`; any component `<= 0` is an invalid argument.
    pub fn new(spacing: [i64; 3]) -> Result<Self> {
        validate_spacing(spacing).map(Self)
    }

    /// Visit every voxel.
    pub fn unit() -> Self {
        Self([1, 1, 1])
    }

    pub fn get(&self) -> [usize; 3] {
        self.0
    }
}

impl Default for Stride {
    fn default() -> Self {
        Self::unit()
    }
}

impl TryFrom<[i64; 3]> for Stride {
    type Error = RegistrationError;

    fn try_from(spacing: [i64; 3]) -> Result<Self> {
        Self::new(spacing)
    }
}

impl From<Stride> for [i64; 3] {
    fn from(stride: Stride) -> Self {
        stride.0.map(|s| s as i64)
    }
}

/// Co-occurrence counts of `(from_bin, to_bin)` pairs, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointHistogram {
    counts: Vec<u64>,
    from_bins: usize,
    to_bins: usize,
}

impl JointHistogram {
    /// An all-zero histogram.
    pub fn zeros(from_bins: usize, to_bins: usize) -> Self {
        Self {
            counts: vec![0; from_bins * to_bins],
            from_bins,
            to_bins,
        }
    }

    /// Wrap existing row-major counts.
    pub fn from_counts(counts: Vec<u64>, from_bins: usize, to_bins: usize) -> Result<Self> {
        if counts.len() != from_bins * to_bins {
            return Err(RegistrationError::ShapeMismatch {
                expected: vec![from_bins, to_bins],
                actual: vec![counts.len()],
            });
        }
        Ok(Self {
            counts,
            from_bins,
            to_bins,
        })
    }

    /// `[from_bins, to_bins]`.
    pub fn shape(&self) -> [usize; 2] {
        [self.from_bins, self.to_bins]
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    #[inline]
    pub fn get(&self, from_bin: usize, to_bin: usize) -> u64 {
        self.counts[from_bin * self.to_bins + to_bin]
    }

    /// Counts for one "from" bin.
    pub fn row(&self, from_bin: usize) -> &[u64] {
        &self.counts[from_bin * self.to_bins..(from_bin + 1) * self.to_bins]
    }

    /// Number of accumulated pairs.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Row sums.
    pub fn from_marginal(&self) -> Vec<u64> {
        self.counts
            .chunks_exact(self.to_bins.max(1))
            .take(self.from_bins)
            .map(|row| row.iter().sum())
            .collect()
    }

    /// Column sums.
    pub fn to_marginal(&self) -> Vec<u64> {
        let mut marginal = vec![0u64; self.to_bins];
        for row in self.counts.chunks_exact(self.to_bins.max(1)) {
            for (m, &c) in marginal.iter_mut().zip(row) {
                *m += c;
            }
        }
        marginal
    }

    #[inline]
    fn increment(&mut self, from_bin: usize, to_bin: usize) {
        self.counts[from_bin * self.to_bins + to_bin] += 1;
    }

    fn merge(mut self, other: Self) -> Self {
        for (a, b) in self.counts.iter_mut().zip(other.counts) {
            *a += b;
        }
        self
    }
}

/// A joint histogram with its two marginals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histograms {
    joint: JointHistogram,
    from_marginal: Vec<u64>,
    to_marginal: Vec<u64>,
}

impl Histograms {
    /// Bundle a joint histogram with caller-supplied marginals.
    ///
    /// Each marginal must have one entry per bin of its axis and sum to the
    /// joint histogram's total.
    pub fn new(joint: JointHistogram, from_marginal: Vec<u64>, to_marginal: Vec<u64>) -> Result<Self> {
        validate_histogram_shapes(joint.shape(), from_marginal.len(), to_marginal.len())?;
        validate_histogram_totals(
            joint.total(),
            from_marginal.iter().sum(),
            to_marginal.iter().sum(),
        )?;
        Ok(Self {
            joint,
            from_marginal,
            to_marginal,
        })
    }

    /// Derive both marginals as exact axis sums of `joint`.
    pub fn from_joint(joint: JointHistogram) -> Self {
        let from_marginal = joint.from_marginal();
        let to_marginal = joint.to_marginal();
        Self {
            joint,
            from_marginal,
            to_marginal,
        }
    }

    pub fn joint(&self) -> &JointHistogram {
        &self.joint
    }

    pub fn from_marginal(&self) -> &[u64] {
        &self.from_marginal
    }

    pub fn to_marginal(&self) -> &[u64] {
        &self.to_marginal
    }

    /// Number of accumulated pairs.
    pub fn total(&self) -> u64 {
        self.from_marginal.iter().sum()
    }
}

/// Accumulate the joint histogram of `from` and `to` under `transform`.
///
/// `transform` maps "from" world points to "to" world points. `spacing` is
/// the voxel stride on the "from" grid. Pairs whose "to" sample falls outside
/// the volume are skipped.
pub fn build_histogram<T: Transform + ?Sized>(
    from: &ClampedVolume,
    to: &ClampedVolume,
    transform: &T,
    spacing: [i64; 3],
    interpolation: Interpolation,
) -> Result<Histograms> {
    let stride = Stride::new(spacing)?;
    let grid = StridedGrid::new(from.shape(), stride.get())?;
    let mapping = voxel_mapping(from, to, transform)?;

    let from_view = from.view()?;
    let to_view = to.view()?;
    let (from_bins, to_bins) = (from.dynamic_range(), to.dynamic_range());

    // Continuous "to" index of voxel (i, j, k) is origin + i*di + j*dj + k*dk.
    let origin = mapping.fixed_view::<3, 1>(0, 3).into_owned();
    let di = mapping.fixed_view::<3, 1>(0, 0).into_owned();
    let dj = mapping.fixed_view::<3, 1>(0, 1).into_owned();
    let dk = mapping.fixed_view::<3, 1>(0, 2).into_owned();

    let slabs: Vec<usize> = grid.axis_positions(0).collect();
    let joint = slabs
        .par_iter()
        .fold(
            || JointHistogram::zeros(from_bins, to_bins),
            |mut hist, &i| {
                let row = origin + di * i as f64;
                for j in grid.axis_positions(1) {
                    let line = row + dj * j as f64;
                    for k in grid.axis_positions(2) {
                        let p = line + dk * k as f64;
                        if let Some(to_bin) = interpolation.sample(&to_view, [p.x, p.y, p.z]) {
                            let from_bin = from_view.get(i, j, k);
                            hist.increment(from_bin as usize, to_bin as usize);
                        }
                    }
                }
                hist
            },
        )
        .reduce(|| JointHistogram::zeros(from_bins, to_bins), JointHistogram::merge);

    let histograms = Histograms::from_joint(joint);
    if histograms.total() == 0 {
        tracing::warn!(
            "No voxel pairs overlap under the current transform ({} grid points)",
            grid.len()
        );
    }
    Ok(histograms)
}

/// Homogeneous mapping from "from" voxel indices to "to" voxel indices.
pub fn voxel_mapping<T: Transform + ?Sized>(
    from: &ClampedVolume,
    to: &ClampedVolume,
    transform: &T,
) -> Result<Matrix4<f64>> {
    let to_index = MatrixTransform::new(*to.affine())?.inverse()?;
    Ok(to_index.matrix() * transform.matrix() * from.affine())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clamp::clamp_with_bins;
    use burn_ndarray::NdArray;
    use histreg_core::image::Volume;
    use histreg_core::spatial::Vector;
    use histreg_core::transform::Affine;

    type B = NdArray<f32>;

    fn labels(samples: Vec<u8>, shape: [usize; 3], affine: Matrix4<f64>) -> ClampedVolume {
        let device = Default::default();
        let volume = Volume::<B>::from_samples(samples, shape, affine, &device).unwrap();
        clamp_with_bins(&volume, 256).unwrap()
    }

    #[test]
    fn test_stride_validation() {
        assert_eq!(Stride::new([2, 1, 3]).unwrap().get(), [2, 1, 3]);
        assert!(Stride::new([0, 1, 3]).unwrap_err().is_invalid_argument());
        assert_eq!(<[i64; 3]>::from(Stride::default()), [1, 1, 1]);
    }

    #[test]
    fn test_identity_histogram_is_diagonal() {
        let samples: Vec<u8> = (0..24).map(|v| (v % 5) as u8).collect();
        let volume = labels(samples, [2, 3, 4], Matrix4::identity());
        let h = build_histogram(&volume, &volume, &Affine::default(), [1, 1, 1], Interpolation::Nearest)
            .unwrap();

        assert_eq!(h.joint().shape(), [5, 5]);
        assert_eq!(h.total(), 24);
        for a in 0..5 {
            for b in 0..5 {
                if a != b {
                    assert_eq!(h.joint().get(a, b), 0);
                }
            }
            assert_eq!(h.joint().get(a, a), h.from_marginal()[a]);
        }
    }

    #[test]
    fn test_out_of_bounds_pairs_are_skipped() {
        let volume = labels((0..8).collect(), [2, 2, 2], Matrix4::identity());
        let shift = Affine::rigid(Vector::new([1.0, 0.0, 0.0]), Vector::zeros());
        let h = build_histogram(&volume, &volume, &shift, [1, 1, 1], Interpolation::Nearest).unwrap();

        // Only the x = 0 slab maps inside; voxel (0, j, k) meets (1, j, k).
        assert_eq!(h.total(), 4);
        assert_eq!(h.joint().get(0, 4), 1);
        assert_eq!(h.joint().get(3, 7), 1);
        assert_eq!(h.from_marginal(), &[1, 1, 1, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_affines_are_respected() {
        // "to" has 2mm voxels covering the same world extent as "from".
        let from = labels((0..64).map(|v| (v / 16) as u8).collect(), [4, 4, 4], Matrix4::identity());
        let mut affine = Matrix4::identity();
        affine[(0, 0)] = 2.0;
        let to = labels(vec![0, 0, 0, 0, 1, 1, 1, 1], [2, 2, 2], affine);

        let h = build_histogram(&from, &to, &Affine::default(), [1, 2, 2], Interpolation::Nearest).unwrap();
        // x / 2 rounds half away from zero, so x = 3 lands outside; y, z = 2 are out.
        assert_eq!(h.joint().shape(), [4, 2]);
        assert_eq!(h.total(), 3);
        assert_eq!(h.joint().get(0, 0), 1);
        assert_eq!(h.joint().get(1, 1), 1);
        assert_eq!(h.joint().get(2, 1), 1);
    }

    #[test]
    fn test_invalid_spacing() {
        let volume = labels(vec![0; 8], [2, 2, 2], Matrix4::identity());
        let err = build_histogram(&volume, &volume, &Affine::default(), [1, 0, 1], Interpolation::Nearest)
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_histograms_shape_check() {
        let joint = JointHistogram::from_counts(vec![1, 2, 3, 4, 5, 6], 2, 3).unwrap();
        assert_eq!(joint.row(1), &[4, 5, 6]);
        assert_eq!(joint.from_marginal(), vec![6, 15]);
        assert_eq!(joint.to_marginal(), vec![5, 7, 9]);
        assert!(Histograms::new(joint.clone(), vec![6, 15], vec![5, 7, 9]).is_ok());
        assert!(Histograms::new(joint.clone(), vec![5, 7, 9], vec![6, 15]).is_err());
        assert!(Histograms::new(joint, vec![6, 14], vec![5, 7, 9]).is_err());
        assert!(JointHistogram::from_counts(vec![0; 5], 2, 3).is_err());
    }
}
