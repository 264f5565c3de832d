//! Trilinear sampling.

use super::trait_::{LabelView, VoxelSampler};

/// Blends the eight neighbouring labels and rounds to the nearest label.
///
/// A sample is inside the volume when every coordinate lies in
/// `[0, d - 1]`; on the upper face the missing neighbour carries zero weight.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrilinearSampler;

impl VoxelSampler for TrilinearSampler {
    fn sample(&self, view: &LabelView<'_>, coord: [f64; 3]) -> Option<u16> {
        let shape = view.shape();
        let mut lo = [0usize; 3];
        let mut hi = [0usize; 3];
        let mut frac = [0.0f64; 3];
        for axis in 0..3 {
            let x = coord[axis];
            let last = (shape[axis] - 1) as f64;
            if !(x >= 0.0 && x <= last) {
                return None;
            }
            let base = x.floor().min(last);
            lo[axis] = base as usize;
            hi[axis] = (lo[axis] + 1).min(shape[axis] - 1);
            frac[axis] = x - base;
        }

        let mut value = 0.0;
        for corner in 0..8 {
            let pick = |axis: usize| (corner >> axis) & 1 == 1;
            let mut weight = 1.0;
            let mut index = [0usize; 3];
            for axis in 0..3 {
                if pick(axis) {
                    weight *= frac[axis];
                    index[axis] = hi[axis];
                } else {
                    weight *= 1.0 - frac[axis];
                    index[axis] = lo[axis];
                }
            }
            if weight > 0.0 {
                value += weight * f64::from(view.get(index[0], index[1], index[2]));
            }
        }
        Some(value.round() as u16)
    }
}
