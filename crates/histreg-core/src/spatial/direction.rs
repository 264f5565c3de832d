//! Orientation of the voxel axes in world space.

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};
use super::Vector;

/// Direction cosine matrix.
///
/// Column `i` holds the world-space direction of voxel axis `i`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction(pub Matrix3<f64>);

impl Direction {
    /// Axis-aligned orientation.
    pub fn identity() -> Self {
        Self(Matrix3::identity())
    }

    /// Build a direction matrix from the three axis directions.
    pub fn from_axes(x: Vector, y: Vector, z: Vector) -> Self {
        Self(Matrix3::from_columns(&[x.0, y.0, z.0]))
    }

    /// Check if the matrix is orthogonal within `1e-6`.
    pub fn is_orthogonal(&self) -> bool {
        let product = self.0 * self.0.transpose();
        (product - Matrix3::identity()).abs().max() < 1e-6
    }

    pub fn determinant(&self) -> f64 {
        self.0.determinant()
    }

    /// Try to compute the inverse of the direction matrix.
    pub fn try_inverse(&self) -> Option<Self> {
        self.0.try_inverse().map(Self)
    }

    /// Get the inner nalgebra matrix.
    pub fn inner(&self) -> &Matrix3<f64> {
        &self.0
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Index<(usize, usize)> for Direction {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.0[index]
    }
}

impl std::ops::Mul<Vector> for Direction {
    type Output = Vector;

    fn mul(self, vector: Vector) -> Self::Output {
        Vector(self.0 * vector.0)
    }
}
