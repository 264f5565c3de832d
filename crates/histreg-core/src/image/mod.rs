//! Volume container and voxel grid traversal.
//!
//! A [`Volume`] pairs sample data held in a burn tensor with the affine that
//! maps voxel indices to world coordinates.

pub mod volume;
pub mod grid;

pub use volume::{Volume, SampleKind, Sample};
pub use grid::StridedGrid;
