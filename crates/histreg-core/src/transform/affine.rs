//! Parametric affine transform.
//!
//! The mapping is `x' = L (x - c) + c + t` with `L = R · K · S`:
//! `R` an Euler rotation, `K` a unit upper-triangular shear and `S` a
//! diagonal scale. `c` is a fixed center that is not part of the parameter
//! vector.

use nalgebra::{Matrix3, Matrix4};
use serde::{Deserialize, Serialize};
use crate::error::{CoreError, Result};
use crate::image::volume::validate_affine;
use crate::spatial::{Point, Vector};
use super::rotation::{euler_angles, rotation_matrix, shear_matrix};
use super::{Transform, TransformModel};

/// Parametric rigid / similarity / affine transform.
///
/// The parameter vector is laid out as `[tx, ty, tz, rx, ry, rz]`, followed by
/// `s` for [`TransformModel::Similarity`] or by
/// `[sx, sy, sz, hxy, hxz, hyz]` for [`TransformModel::Affine`].
/// The default value is the rigid identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    model: TransformModel,
    translation: Vector,
    rotation: Vector,
    scaling: Vector,
    shearing: Vector,
    center: Point,
}

impl Affine {
    /// Identity transform with the given free parameters.
    pub fn identity(model: TransformModel) -> Self {
        Self {
            model,
            translation: Vector::zeros(),
            rotation: Vector::zeros(),
            scaling: Vector::repeat(1.0),
            shearing: Vector::zeros(),
            center: Point::origin(),
        }
    }

    /// Rigid transform from a translation and Euler angles (radians).
    pub fn rigid(translation: Vector, rotation: Vector) -> Self {
        Self {
            translation,
            rotation,
            ..Self::identity(TransformModel::Rigid)
        }
    }

    /// Build a transform of `model` from a parameter vector.
    pub fn from_params(model: TransformModel, params: &[f64]) -> Result<Self> {
        Self::identity(model).with_params(params)
    }

    /// Re-parametrize an invertible affine matrix as a 12-parameter transform
    /// centered at the origin.
    ///
    /// Reflections are absorbed into a negative `sz`.
    pub fn from_matrix(matrix: &Matrix4<f64>) -> Result<Self> {
        validate_affine(matrix)?;
        let linear: Matrix3<f64> = matrix.fixed_view::<3, 3>(0, 0).into_owned();

        let qr = linear.qr();
        let mut q = qr.q();
        let mut r = qr.r();
        for i in 0..3 {
            if r[(i, i)] < 0.0 {
                q.column_mut(i).neg_mut();
                r.row_mut(i).neg_mut();
            }
        }
        if q.determinant() < 0.0 {
            q.column_mut(2).neg_mut();
            r.row_mut(2).neg_mut();
        }

        let scaling = Vector::new([r[(0, 0)], r[(1, 1)], r[(2, 2)]]);
        if (0..3).any(|i| scaling[i].abs() < f64::EPSILON) {
            return Err(CoreError::singular("affine matrix has a degenerate axis"));
        }
        let shearing = Vector::new([
            r[(0, 1)] / scaling[1],
            r[(0, 2)] / scaling[2],
            r[(1, 2)] / scaling[2],
        ]);

        Ok(Self {
            model: TransformModel::Affine,
            translation: Vector::new([matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]]),
            rotation: euler_angles(&q),
            scaling,
            shearing,
            center: Point::origin(),
        })
    }

    /// Set the fixed center of rotation and scaling.
    pub fn with_center(mut self, center: Point) -> Self {
        self.center = center;
        self
    }

    pub fn model(&self) -> TransformModel {
        self.model
    }

    pub fn translation(&self) -> Vector {
        self.translation
    }

    /// Euler angles `(rx, ry, rz)` in radians.
    pub fn rotation(&self) -> Vector {
        self.rotation
    }

    pub fn scaling(&self) -> Vector {
        self.scaling
    }

    /// Shears `(hxy, hxz, hyz)`.
    pub fn shearing(&self) -> Vector {
        self.shearing
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Current parameter vector for the model.
    pub fn params(&self) -> Vec<f64> {
        let mut params = Vec::with_capacity(self.model.param_count());
        params.extend_from_slice(&self.translation.to_array());
        params.extend_from_slice(&self.rotation.to_array());
        match self.model {
            TransformModel::Rigid => {}
            TransformModel::Similarity => params.push(self.scaling[0]),
            TransformModel::Affine => {
                params.extend_from_slice(&self.scaling.to_array());
                params.extend_from_slice(&self.shearing.to_array());
            }
        }
        params
    }

    /// Overwrite the free parameters.
    pub fn set_params(&mut self, params: &[f64]) -> Result<()> {
        let expected = self.model.param_count();
        if params.len() != expected {
            return Err(CoreError::InvalidParameter {
                model: self.model.name(),
                expected,
                actual: params.len(),
            });
        }
        if let Some(bad) = params.iter().position(|p| !p.is_finite()) {
            return Err(CoreError::invalid_argument(format!(
                "parameter {} ({}) is not finite",
                bad,
                self.model.param_names()[bad]
            )));
        }

        self.translation = Vector::new([params[0], params[1], params[2]]);
        self.rotation = Vector::new([params[3], params[4], params[5]]);
        match self.model {
            TransformModel::Rigid => {}
            TransformModel::Similarity => self.scaling = Vector::repeat(params[6]),
            TransformModel::Affine => {
                self.scaling = Vector::new([params[6], params[7], params[8]]);
                self.shearing = Vector::new([params[9], params[10], params[11]]);
            }
        }
        Ok(())
    }

    /// Copy of `self` with new parameters.
    pub fn with_params(&self, params: &[f64]) -> Result<Self> {
        let mut transform = *self;
        transform.set_params(params)?;
        Ok(transform)
    }

    /// The linear part `R · K · S`.
    pub fn linear(&self) -> Matrix3<f64> {
        rotation_matrix(&self.rotation)
            * shear_matrix(&self.shearing)
            * Matrix3::from_diagonal(&self.scaling.0)
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::identity(TransformModel::Rigid)
    }
}

impl Transform for Affine {
    fn matrix(&self) -> Matrix4<f64> {
        let linear = self.linear();
        let c = self.center.0.coords;
        let offset = self.translation.0 + c - linear * c;
        let mut matrix = linear.to_homogeneous();
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&offset);
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_identity_matrix_is_exact() {
        for model in [TransformModel::Rigid, TransformModel::Similarity, TransformModel::Affine] {
            assert_eq!(Affine::identity(model).matrix(), Matrix4::identity());
        }
        let centered = Affine::default().with_center(Point::new([12.5, -3.0, 7.25]));
        assert_eq!(centered.matrix(), Matrix4::identity());
    }

    #[test]
    fn test_params_layout() {
        let affine = Affine::from_params(
            TransformModel::Affine,
            &[1.0, 2.0, 3.0, 0.1, 0.2, 0.3, 1.1, 1.2, 1.3, 0.01, 0.02, 0.03],
        )
        .unwrap();
        assert_eq!(affine.translation(), Vector::new([1.0, 2.0, 3.0]));
        assert_eq!(affine.scaling(), Vector::new([1.1, 1.2, 1.3]));
        assert_eq!(affine.shearing(), Vector::new([0.01, 0.02, 0.03]));
        assert_eq!(affine.params().len(), 12);

        let similarity =
            Affine::from_params(TransformModel::Similarity, &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0]).unwrap();
        assert_eq!(similarity.scaling(), Vector::repeat(2.0));
        assert_eq!(similarity.params()[6], 2.0);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let mut rigid = Affine::default();
        let err = rigid.set_params(&[0.0; 7]).unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidParameter { model: "rigid", expected: 6, actual: 7 }
        );
        assert!(Affine::from_params(TransformModel::Affine, &[0.0; 6]).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut rigid = Affine::default();
        assert!(rigid.set_params(&[0.0, f64::NAN, 0.0, 0.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn test_rotation_about_center() {
        let transform = Affine::rigid(Vector::zeros(), Vector::new([0.0, 0.0, FRAC_PI_2]))
            .with_center(Point::new([1.0, 1.0, 0.0]));
        // The center is fixed.
        let c = transform.apply(&Point::new([1.0, 1.0, 0.0]));
        assert!((c - Point::new([1.0, 1.0, 0.0])).norm() < 1e-12);
        // (2, 1, 0) rotates to (1, 2, 0) around the center.
        let p = transform.apply(&Point::new([2.0, 1.0, 0.0]));
        assert!((p - Point::new([1.0, 2.0, 0.0])).norm() < 1e-12);
    }

    #[test]
    fn test_from_matrix_recovers_params() {
        let params = [4.0, -2.0, 1.5, 0.2, -0.1, 0.3, 1.5, 0.8, 1.2, 0.1, -0.05, 0.2];
        let original = Affine::from_params(TransformModel::Affine, &params).unwrap();
        let recovered = Affine::from_matrix(&original.matrix()).unwrap();
        for (a, b) in original.params().iter().zip(recovered.params()) {
            assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_from_matrix_absorbs_reflection() {
        let mut m = Matrix4::identity();
        m[(2, 2)] = -1.0;
        let recovered = Affine::from_matrix(&m).unwrap();
        assert!((recovered.matrix() - m).abs().max() < 1e-12);
    }

    #[test]
    fn test_compose_and_invert() {
        let a = Affine::rigid(Vector::new([1.0, 0.0, 0.0]), Vector::new([0.0, 0.0, 0.4]));
        let b = Affine::rigid(Vector::new([0.0, 2.0, -1.0]), Vector::new([0.3, 0.0, 0.0]));
        let p = Point::new([0.5, -1.0, 2.0]);

        let ab = a.compose(&b);
        let expected = a.apply(&b.apply(&p));
        assert!((ab.apply(&p) - expected).norm() < 1e-12);

        let back = a.inverse().unwrap().apply(&a.apply(&p));
        assert!((back - p).norm() < 1e-12);
    }
}
