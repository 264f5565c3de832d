//! Spatial types for voxel and world coordinates.
//!
//! Volumes are always three-dimensional, so the types here are fixed to 3D
//! and wrap nalgebra for the underlying linear algebra.

pub mod point;
pub mod vector;
pub mod spacing;
pub mod direction;

pub use point::Point;
pub use vector::Vector;
pub use spacing::Spacing;
pub use direction::Direction;

pub type Point3 = Point;
pub type Vector3 = Vector;
pub type Spacing3 = Spacing;
pub type Direction3 = Direction;
