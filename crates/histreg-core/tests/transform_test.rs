use histreg_core::spatial::{Point, Vector};
use histreg_core::transform::{self, Affine, MatrixTransform, Transform, TransformModel};
use histreg_core::CoreError;
use nalgebra::Matrix4;
use std::f64::consts::FRAC_PI_2;

#[test]
fn test_default_is_identity() {
    let t = Affine::default();
    assert_eq!(t.model(), TransformModel::Rigid);
    assert_eq!(t.params(), vec![0.0; 6]);
    assert_eq!(t.matrix(), Matrix4::identity());

    let p = Point::new([3.0, -4.0, 5.5]);
    assert_eq!(transform::apply(&t, &p), p);
}

#[test]
fn test_rigid_rotation_then_translation() {
    // (1, 0, 0) -> rotate 90 degrees about z -> (0, 1, 0) -> translate -> (1, 2, 3)
    let t = Affine::rigid(Vector::new([1.0, 1.0, 3.0]), Vector::new([0.0, 0.0, FRAC_PI_2]));
    let q = t.apply(&Point::new([1.0, 0.0, 0.0]));
    assert!((q - Point::new([1.0, 2.0, 3.0])).norm() < 1e-12);
}

#[test]
fn test_compose_is_right_to_left() {
    let shift = Affine::rigid(Vector::new([5.0, 0.0, 0.0]), Vector::zeros());
    let turn = Affine::rigid(Vector::zeros(), Vector::new([0.0, 0.0, FRAC_PI_2]));
    let p = Point::new([1.0, 0.0, 0.0]);

    // Turn first, then shift.
    let q = transform::compose(&shift, &turn).apply(&p);
    assert!((q - Point::new([5.0, 1.0, 0.0])).norm() < 1e-12);

    // Shift first, then turn.
    let q = transform::compose(&turn, &shift).apply(&p);
    assert!((q - Point::new([0.0, 6.0, 0.0])).norm() < 1e-12);
}

#[test]
fn test_invert_round_trip_and_reparametrize() {
    let t = Affine::from_params(
        TransformModel::Affine,
        &[1.0, -2.0, 0.5, 0.1, 0.2, -0.3, 1.2, 0.9, 1.1, 0.05, 0.0, -0.1],
    )
    .unwrap();
    let inverse = transform::invert(&t).unwrap();
    let identity = t.compose(&inverse);
    assert!((identity.matrix() - Matrix4::identity()).abs().max() < 1e-12);

    let reparam = Affine::from_matrix(&inverse.matrix()).unwrap();
    assert!((reparam.matrix() - inverse.matrix()).abs().max() < 1e-9);
}

#[test]
fn test_singular_transform_has_no_inverse() {
    let flat = Affine::from_params(
        TransformModel::Affine,
        &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0],
    )
    .unwrap();
    assert!(matches!(flat.inverse(), Err(CoreError::SingularMatrix(_))));
    assert!(MatrixTransform::new(flat.matrix()).is_err());
}

#[test]
fn test_wrong_parameter_length() {
    for (model, len) in [
        (TransformModel::Rigid, 12),
        (TransformModel::Similarity, 6),
        (TransformModel::Affine, 7),
    ] {
        let err = Affine::from_params(model, &vec![0.0; len]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidParameter { actual, .. } if actual == len));
    }
}
