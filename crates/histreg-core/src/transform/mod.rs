//! Spatial transforms between world frames.
//!
//! [`Affine`] is the parametric model explored during registration;
//! [`MatrixTransform`] carries the result of composing or inverting
//! transforms, which generally leaves the parametric family.

pub mod trait_;
pub mod model;
pub mod rotation;
pub mod affine;
pub mod matrix;

pub use trait_::Transform;
pub use model::TransformModel;
pub use affine::Affine;
pub use matrix::MatrixTransform;

use crate::error::Result;
use crate::spatial::Point;

/// `a ∘ b`: apply `b`, then `a`.
pub fn compose<A: Transform, B: Transform>(a: &A, b: &B) -> MatrixTransform {
    a.compose(b)
}

/// Inverse of `a`; fails if its matrix is singular.
pub fn invert<A: Transform>(a: &A) -> Result<MatrixTransform> {
    a.inverse()
}

/// Map a point through `a`.
pub fn apply<A: Transform>(a: &A, point: &Point) -> Point {
    a.apply(point)
}
