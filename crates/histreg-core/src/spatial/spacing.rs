//! Physical voxel size along each axis.

use super::Vector;

/// Physical distance between adjacent voxels along each axis.
pub type Spacing = Vector;

impl Spacing {
    /// Same spacing on every axis.
    pub fn uniform(value: f64) -> Self {
        Self::repeat(value)
    }

    /// Check if spacing is uniform (all components equal).
    pub fn is_uniform(&self) -> bool {
        (1..3).all(|i| (self[i] - self[0]).abs() < 1e-9)
    }

    /// Check that every component is finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        (0..3).all(|i| self[i].is_finite() && self[i] > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacing_uniform() {
        let s = Spacing::uniform(1.5);
        assert!(s.is_uniform());
        assert!(!Spacing::new([1.0, 2.0, 3.0]).is_uniform());
    }

    #[test]
    fn test_spacing_validity() {
        assert!(Spacing::new([0.5, 1.0, 2.0]).is_valid());
        assert!(!Spacing::new([0.0, 1.0, 1.0]).is_valid());
        assert!(!Spacing::new([1.0, -1.0, 1.0]).is_valid());
        assert!(!Spacing::new([1.0, f64::NAN, 1.0]).is_valid());
    }
}
