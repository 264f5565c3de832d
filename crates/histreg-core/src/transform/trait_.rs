//! Transform trait for homogeneous 3D mappings.

use nalgebra::Matrix4;
use crate::error::{CoreError, Result};
use crate::image::volume::apply_affine;
use crate::spatial::Point;
use super::MatrixTransform;

/// A spatial mapping expressible as a 4×4 homogeneous matrix.
///
/// During registration a transform maps world points of the "from" volume to
/// world points of the "to" volume.
pub trait Transform {
    /// The equivalent homogeneous matrix. The last row is `[0, 0, 0, 1]`.
    fn matrix(&self) -> Matrix4<f64>;

    /// Map a single point.
    fn apply(&self, point: &Point) -> Point {
        apply_affine(&self.matrix(), point)
    }

    /// `self ∘ other`: `other` is applied first.
    fn compose<T: Transform + ?Sized>(&self, other: &T) -> MatrixTransform
    where
        Self: Sized,
    {
        MatrixTransform::from_matrix_unchecked(self.matrix() * other.matrix())
    }

    /// The inverse mapping.
    fn inverse(&self) -> Result<MatrixTransform> {
        self.matrix()
            .try_inverse()
            .map(MatrixTransform::from_matrix_unchecked)
            .ok_or_else(|| CoreError::singular("transform matrix is not invertible"))
    }
}
