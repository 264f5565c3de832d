//! Sampling of integer-labelled volumes at continuous voxel coordinates.
//!
//! Samplers return `None` when the coordinate falls outside the volume, so
//! callers can exclude the sample instead of padding or clamping.

pub mod trait_;
pub mod nearest;
pub mod linear;

pub use trait_::{LabelView, VoxelSampler};
pub use nearest::NearestNeighborSampler;
pub use linear::TrilinearSampler;

use serde::{Deserialize, Serialize};

/// Interpolation policy used when resampling onto another grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Round to the nearest voxel. Exact on integer coordinates.
    #[default]
    Nearest,
    /// Blend the eight neighbouring labels and round to the nearest label.
    Trilinear,
}

impl Interpolation {
    /// Sample `view` at `coord`.
    #[inline]
    pub fn sample(&self, view: &LabelView<'_>, coord: [f64; 3]) -> Option<u16> {
        match self {
            Self::Nearest => NearestNeighborSampler.sample(view, coord),
            Self::Trilinear => TrilinearSampler.sample(view, coord),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Trilinear => "trilinear",
        }
    }
}
