//! Core types for histogram-based volume registration.
//!
//! Provides the [`Volume`] container (a burn tensor plus a voxel-to-world
//! affine), fixed-3D spatial types, the parametric transform model and the
//! voxel samplers used when resampling one volume onto another's grid.

pub mod error;
pub mod image;
pub mod spatial;
pub mod transform;
pub mod interpolation;

pub use error::{CoreError, Result};
pub use image::{Volume, SampleKind, Sample};
pub use spatial::{Point, Vector, Spacing, Direction};
pub use transform::{Transform, Affine, TransformModel, MatrixTransform};
pub use interpolation::Interpolation;
