//! Nearest neighbor sampling.

use super::trait_::{LabelView, VoxelSampler};

/// Rounds each coordinate to the nearest voxel.
///
/// A sample is inside the volume when every rounded coordinate lies in
/// `[0, d - 1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighborSampler;

impl VoxelSampler for NearestNeighborSampler {
    #[inline]
    fn sample(&self, view: &LabelView<'_>, coord: [f64; 3]) -> Option<u16> {
        let shape = view.shape();
        let mut index = [0usize; 3];
        for axis in 0..3 {
            let rounded = coord[axis].round();
            // NaN fails both comparisons.
            if !(rounded >= 0.0 && rounded < shape[axis] as f64) {
                return None;
            }
            index[axis] = rounded as usize;
        }
        Some(view.get(index[0], index[1], index[2]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<u16> {
        (0..8).collect()
    }

    #[test]
    fn test_integer_coordinates() {
        let data = labels();
        let view = LabelView::new(&data, [2, 2, 2]).unwrap();
        assert_eq!(NearestNeighborSampler.sample(&view, [0.0, 0.0, 0.0]), Some(0));
        assert_eq!(NearestNeighborSampler.sample(&view, [1.0, 1.0, 1.0]), Some(7));
    }

    #[test]
    fn test_rounding() {
        let data = labels();
        let view = LabelView::new(&data, [2, 2, 2]).unwrap();
        assert_eq!(NearestNeighborSampler.sample(&view, [0.4, 0.6, -0.4]), Some(2));
    }

    #[test]
    fn test_out_of_bounds() {
        let data = labels();
        let view = LabelView::new(&data, [2, 2, 2]).unwrap();
        assert_eq!(NearestNeighborSampler.sample(&view, [-0.6, 0.0, 0.0]), None);
        assert_eq!(NearestNeighborSampler.sample(&view, [0.0, 1.5, 0.0]), None);
        assert_eq!(NearestNeighborSampler.sample(&view, [0.0, 0.0, f64::NAN]), None);
    }
}
