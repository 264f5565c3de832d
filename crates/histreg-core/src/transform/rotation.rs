//! Euler-angle rotations and shear matrices.
//!
//! Angles are `(rx, ry, rz)` in radians with `R = Rz(rz) * Ry(ry) * Rx(rx)`.

use nalgebra::{Matrix3, Rotation3};
use crate::spatial::Vector;

/// Rotation matrix for Euler angles.
///
/// Zero angles give the identity exactly.
pub fn rotation_matrix(angles: &Vector) -> Matrix3<f64> {
    Rotation3::from_euler_angles(angles[0], angles[1], angles[2]).into_inner()
}

/// Euler angles of a proper rotation matrix.
pub fn euler_angles(rotation: &Matrix3<f64>) -> Vector {
    let (rx, ry, rz) = Rotation3::from_matrix_unchecked(*rotation).euler_angles();
    Vector::new([rx, ry, rz])
}

/// Unit upper-triangular shear matrix from `(hxy, hxz, hyz)`.
pub fn shear_matrix(shears: &Vector) -> Matrix3<f64> {
    Matrix3::new(
        1.0, shears[0], shears[1],
        0.0, 1.0, shears[2],
        0.0, 0.0, 1.0,
    )
}
