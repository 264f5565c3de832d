//! Transform backed by an explicit homogeneous matrix.

use nalgebra::Matrix4;
use crate::error::Result;
use crate::image::volume::validate_affine;
use super::Transform;

/// An arbitrary invertible affine map stored as its 4×4 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixTransform(Matrix4<f64>);

impl MatrixTransform {
    /// Wrap a matrix, checking that it is an invertible affine.
    pub fn new(matrix: Matrix4<f64>) -> Result<Self> {
        validate_affine(&matrix)?;
        Ok(Self(matrix))
    }

    pub fn identity() -> Self {
        Self(Matrix4::identity())
    }

    pub(crate) fn from_matrix_unchecked(matrix: Matrix4<f64>) -> Self {
        Self(matrix)
    }

    pub fn into_inner(self) -> Matrix4<f64> {
        self.0
    }
}

impl Default for MatrixTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform for MatrixTransform {
    fn matrix(&self) -> Matrix4<f64> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Point;

    #[test]
    fn test_translation_inverse() {
        let mut m = Matrix4::identity();
        m[(0, 3)] = 2.0;
        m[(2, 3)] = -1.0;
        let t = MatrixTransform::new(m).unwrap();
        let p = Point::new([1.0, 1.0, 1.0]);
        let q = t.apply(&p);
        assert_eq!(q, Point::new([3.0, 1.0, 0.0]));
        assert_eq!(t.inverse().unwrap().apply(&q), p);
    }

    #[test]
    fn test_projective_matrix_rejected() {
        let mut m = Matrix4::identity();
        m[(3, 0)] = 1.0;
        assert!(MatrixTransform::new(m).is_err());
    }
}
