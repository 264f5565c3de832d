//! Point type for positions in voxel or world space.

use nalgebra::{Point3 as NaPoint3, Vector4};
use serde::{Deserialize, Serialize};
use super::Vector;

/// A position in 3D space.
///
/// The same type is used for continuous voxel indices and for world
/// coordinates; which frame a point lives in is determined by the matrix
/// that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point(pub NaPoint3<f64>);

impl Point {
    /// Create a new point from coordinates.
    pub fn new(coords: [f64; 3]) -> Self {
        Self(NaPoint3::new(coords[0], coords[1], coords[2]))
    }

    /// The origin `(0, 0, 0)`.
    pub fn origin() -> Self {
        Self(NaPoint3::origin())
    }

    /// Point at an integer voxel index.
    pub fn from_index(index: [usize; 3]) -> Self {
        Self::new([index[0] as f64, index[1] as f64, index[2] as f64])
    }

    /// Homogeneous coordinates `(x, y, z, 1)`.
    pub fn to_homogeneous(&self) -> Vector4<f64> {
        self.0.to_homogeneous()
    }

    /// Build a point from homogeneous coordinates, dividing by `w`.
    ///
    /// Returns `None` when `w` is zero.
    pub fn from_homogeneous(h: Vector4<f64>) -> Option<Self> {
        NaPoint3::from_homogeneous(h).map(Self)
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.0.x, self.0.y, self.0.z]
    }

    /// Get the inner nalgebra point.
    pub fn inner(&self) -> &NaPoint3<f64> {
        &self.0
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::origin()
    }
}

impl std::ops::Index<usize> for Point {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0.coords[index]
    }
}

impl std::ops::IndexMut<usize> for Point {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0.coords[index]
    }
}

impl std::ops::Sub for Point {
    type Output = Vector;

    fn sub(self, other: Self) -> Self::Output {
        Vector(self.0 - other.0)
    }
}

impl std::ops::Add<Vector> for Point {
    type Output = Self;

    fn add(self, vector: Vector) -> Self::Output {
        Self(self.0 + vector.0)
    }
}
