//! Sampler trait and the label volume view it reads from.

use crate::error::{CoreError, Result};

/// Borrowed row-major `[dx, dy, dz]` volume of integer labels.
#[derive(Debug, Clone, Copy)]
pub struct LabelView<'a> {
    data: &'a [u16],
    shape: [usize; 3],
}

impl<'a> LabelView<'a> {
    /// Wrap a label buffer; its length must equal the product of `shape`.
    pub fn new(data: &'a [u16], shape: [usize; 3]) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(CoreError::ShapeMismatch {
                expected: vec![expected],
                actual: vec![data.len()],
            });
        }
        Ok(Self { data, shape })
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn data(&self) -> &'a [u16] {
        self.data
    }

    /// Label at an in-bounds integer index.
    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> u16 {
        self.data[(i * self.shape[1] + j) * self.shape[2] + k]
    }
}

/// Sampling strategy for a [`LabelView`].
pub trait VoxelSampler {
    /// Label at the continuous index `coord`, or `None` if it lies outside
    /// the volume.
    fn sample(&self, view: &LabelView<'_>, coord: [f64; 3]) -> Option<u16>;
}
