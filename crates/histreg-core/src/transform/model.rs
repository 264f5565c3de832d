//! Degrees of freedom of the parametric transform.

use serde::{Deserialize, Serialize};

const RIGID_PARAMS: [&str; 6] = ["tx", "ty", "tz", "rx", "ry", "rz"];
const SIMILARITY_PARAMS: [&str; 7] = ["tx", "ty", "tz", "rx", "ry", "rz", "s"];
const AFFINE_PARAMS: [&str; 12] = [
    "tx", "ty", "tz", "rx", "ry", "rz", "sx", "sy", "sz", "hxy", "hxz", "hyz",
];

/// Which parameters of an [`Affine`](super::Affine) are free.
///
/// Parameters outside the model stay at their neutral value (scale 1,
/// shear 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformModel {
    /// Translation and rotation.
    #[default]
    Rigid,
    /// Rigid plus one isotropic scale.
    Similarity,
    /// Rigid plus per-axis scales and three shears.
    Affine,
}

impl TransformModel {
    /// Length of the parameter vector.
    pub fn param_count(self) -> usize {
        self.param_names().len()
    }

    /// Names of the parameters, in vector order.
    pub fn param_names(self) -> &'static [&'static str] {
        match self {
            Self::Rigid => &RIGID_PARAMS,
            Self::Similarity => &SIMILARITY_PARAMS,
            Self::Affine => &AFFINE_PARAMS,
        }
    }

    /// Position of a named parameter.
    pub fn param_index(self, name: &str) -> Option<usize> {
        self.param_names().iter().position(|&n| n == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Rigid => "rigid",
            Self::Similarity => "similarity",
            Self::Affine => "affine",
        }
    }
}

impl std::fmt::Display for TransformModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_counts() {
        assert_eq!(TransformModel::Rigid.param_count(), 6);
        assert_eq!(TransformModel::Similarity.param_count(), 7);
        assert_eq!(TransformModel::Affine.param_count(), 12);
    }

    #[test]
    fn test_param_index() {
        assert_eq!(TransformModel::Rigid.param_index("rz"), Some(5));
        assert_eq!(TransformModel::Rigid.param_index("sx"), None);
        assert_eq!(TransformModel::Affine.param_index("hyz"), Some(11));
    }
}
