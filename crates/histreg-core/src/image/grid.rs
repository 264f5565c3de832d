//! Strided traversal of a voxel grid.

use crate::error::{CoreError, Result};

/// The voxels visited when walking a `[dx, dy, dz]` grid with a stride.
///
/// Along each axis the visited positions are `0, s, 2s, ...` below the axis
/// length, so every axis contributes at least its first voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StridedGrid {
    shape: [usize; 3],
    stride: [usize; 3],
}

impl StridedGrid {
    /// Create a strided grid. Every stride component must be positive.
    pub fn new(shape: [usize; 3], stride: [usize; 3]) -> Result<Self> {
        if stride.iter().any(|&s| s == 0) {
            return Err(CoreError::invalid_argument(format!(
                "grid stride must be positive, got {:?}",
                stride
            )));
        }
        Ok(Self { shape, stride })
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn stride(&self) -> [usize; 3] {
        self.stride
    }

    /// Number of visited positions along `axis`.
    pub fn axis_len(&self, axis: usize) -> usize {
        (self.shape[axis] + self.stride[axis] - 1) / self.stride[axis]
    }

    /// Total number of visited voxels.
    pub fn len(&self) -> usize {
        (0..3).map(|axis| self.axis_len(axis)).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visited positions along `axis`, in increasing order.
    pub fn axis_positions(&self, axis: usize) -> impl Iterator<Item = usize> + Clone {
        (0..self.shape[axis]).step_by(self.stride[axis])
    }

    /// All visited indices in row-major order (last axis fastest).
    pub fn indices(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.axis_positions(0).flat_map(move |i| {
            self.axis_positions(1)
                .flat_map(move |j| self.axis_positions(2).map(move |k| [i, j, k]))
        })
    }
}
