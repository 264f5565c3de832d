use std::sync::Arc;

use burn_ndarray::NdArray;
use histreg_core::{Affine, TransformModel, Vector, Volume};
use histreg_registration::{
    AxisSpec, HistogramRegistration, HistoryCallback, OptimizerConfig, RegistrationConfig, SimilarityMeasure,
};
use nalgebra::Matrix4;

type B = NdArray<f32>;

/// Smooth blob so that nearby transforms score close to the optimum.
fn blob_volume(shape: [usize; 3]) -> Volume<B> {
    let device = Default::default();
    let center = shape.map(|n| (n as f64 - 1.0) / 2.0);
    let mut samples = Vec::with_capacity(shape.iter().product());
    for i in 0..shape[0] {
        for j in 0..shape[1] {
            for k in 0..shape[2] {
                let r2 = (i as f64 - center[0]).powi(2)
                    + (j as f64 - center[1]).powi(2)
                    + (k as f64 - center[2]).powi(2);
                samples.push((1000.0 * (-r2 / 32.0).exp()) as f32);
            }
        }
    }
    Volume::from_samples(samples, shape, Matrix4::identity(), &device).unwrap()
}

fn session(measure: SimilarityMeasure) -> HistogramRegistration {
    let volume = blob_volume([20, 20, 16]);
    HistogramRegistration::new(&volume, &volume, RegistrationConfig::new().with_measure(measure)).unwrap()
}

#[test]
fn test_explore() {
    let mut session = session(SimilarityMeasure::Cr);
    let axes = [AxisSpec::new(0, [-1.0, 0.0, 1.0]), AxisSpec::new(1, [-1.0, 0.0, 1.0])];
    let exploration = session.explore(&Affine::default(), &axes).unwrap();

    assert_eq!(exploration.trajectory.len(), 9);
    assert_eq!(exploration.best_params[0], 0.0);
    assert_eq!(exploration.best_params[1], 0.0);
    assert!((exploration.best_score - 1.0).abs() < 1e-9);
    assert_eq!(session.last_score(), Some(exploration.best_score));
}

#[test]
fn test_explore_by_name_around_offset_base() {
    let mut session = session(SimilarityMeasure::Cc);
    let base = Affine::rigid(Vector::new([0.0, 2.0, 0.0]), Vector::zeros());
    let offsets: Vec<f64> = (-3..=3).map(f64::from).collect();
    let axes = [AxisSpec::named(TransformModel::Rigid, "ty", offsets).unwrap()];

    let exploration = session.explore(&base, &axes).unwrap();
    assert_eq!(exploration.best_params[1], 0.0);
    assert!(exploration.trajectory.iter().all(|s| s.score <= exploration.best_score));
}

#[test]
fn test_explore_rejects_unknown_parameter_name() {
    assert!(AxisSpec::named(TransformModel::Rigid, "sx", [1.0]).is_err());
}

#[test]
fn test_subsample_rejects_zero_spacing() {
    let mut session = session(SimilarityMeasure::Cr);
    let err = session.subsample([0, 1, 3]).unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(session.spacing().get(), [1, 1, 1]);
}

#[test]
fn test_optimize_improves_misaligned_start() {
    let mut session = session(SimilarityMeasure::Cc);
    let start = Affine::rigid(Vector::new([2.0, -1.0, 0.0]), Vector::zeros());
    let start_score = session.score(&start).unwrap();

    let config = OptimizerConfig::new().with_max_iterations(60);
    let result = session.optimize(&start, &config).unwrap();

    assert!(result.best_score > start_score);
    assert!(result.history.windows(2).all(|w| w[1] >= w[0]));
    assert_eq!(session.last_score(), Some(result.best_score));
}

#[test]
fn test_explore_reports_progress() {
    let mut session = session(SimilarityMeasure::Nmi);
    let history = Arc::new(HistoryCallback::new());
    let explorer = histreg_registration::Explorer::new()
        .with_batch_size(3)
        .with_callback(history.clone());
    let axes = [AxisSpec::new(2, [-1.0, 0.0, 1.0]), AxisSpec::new(5, [-0.1, 0.0, 0.1])];

    let exploration = session.explore_with(&explorer, &Affine::default(), &axes).unwrap();
    assert_eq!(exploration.trajectory.len(), 9);
    assert_eq!(history.get_history().len(), 3);
    assert_eq!(exploration.best_params, vec![0.0; 6]);
}

#[test]
fn test_subsampled_score_tracks_full_score() {
    let mut session = session(SimilarityMeasure::Cc);
    let shifted = Affine::rigid(Vector::new([1.0, 0.0, -1.0]), Vector::zeros());

    session.subsample([1, 1, 1]).unwrap();
    let full = session.eval(&shifted).unwrap();
    session.subsample([2, 2, 2]).unwrap();
    let sparse = session.eval(&shifted).unwrap();

    assert!(full < 1.0);
    assert!((full - sparse).abs() < 0.05, "full {} vs subsampled {}", full, sparse);
}
