//! Vector type for displacements and axis directions.

use nalgebra::Vector3 as NaVector3;
use serde::{Deserialize, Serialize};

/// A displacement in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector(pub NaVector3<f64>);

impl Vector {
    /// Create a new vector from components.
    pub fn new(components: [f64; 3]) -> Self {
        Self(NaVector3::new(components[0], components[1], components[2]))
    }

    /// Create a zero vector.
    pub fn zeros() -> Self {
        Self(NaVector3::zeros())
    }

    /// Vector with every component equal to `value`.
    pub fn repeat(value: f64) -> Self {
        Self(NaVector3::repeat(value))
    }

    /// Create a vector from a slice, returning `None` unless it has exactly
    /// three components.
    pub fn from_slice(components: &[f64]) -> Option<Self> {
        match components {
            [x, y, z] => Some(Self::new([*x, *y, *z])),
            _ => None,
        }
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.0.x, self.0.y, self.0.z]
    }

    /// Get the inner nalgebra vector.
    pub fn inner(&self) -> &NaVector3<f64> {
        &self.0
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.0.norm()
    }
}

impl Default for Vector {
    fn default() -> Self {
        Self::zeros()
    }
}

impl std::ops::Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl std::ops::IndexMut<usize> for Vector {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl std::ops::Add for Vector {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self(self.0 + other.0)
    }
}

impl std::ops::Sub for Vector {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self(self.0 - other.0)
    }
}

impl std::ops::Mul<f64> for Vector {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self::Output {
        Self(self.0 * scalar)
    }
}

impl std::ops::Neg for Vector {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}
