//! Volume type with a voxel-to-world affine.

use std::sync::Arc;

use burn::tensor::backend::Backend;
use burn::tensor::{Shape, Tensor, TensorData};
use nalgebra::{Matrix3, Matrix4, Vector4};
use serde::{Deserialize, Serialize};
use crate::error::{CoreError, Result};
use crate::spatial::{Direction, Point, Spacing};

/// Numeric nature of the samples a volume was built from.
///
/// Integer volumes whose dynamic range fits in the requested bin count are
/// binned by shifting rather than rescaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleKind {
    Integer,
    Float,
}

/// Element types accepted by [`Volume::from_samples`].
pub trait Sample: Copy + Send + Sync + 'static {
    const KIND: SampleKind;

    fn to_f32(self) -> f32;

    /// Exact for every implementing type.
    fn to_f64(self) -> f64;
}

macro_rules! impl_sample {
    ($kind:expr => $($t:ty),*) => {
        $(
            impl Sample for $t {
                const KIND: SampleKind = $kind;

                fn to_f32(self) -> f32 {
                    self as f32
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_sample!(SampleKind::Integer => u8, i8, u16, i16, u32, i32);
impl_sample!(SampleKind::Float => f32, f64);

/// A 3D scalar image.
///
/// Samples are stored in a `Tensor<B, 3>` of shape `[dx, dy, dz]`; index
/// `(i, j, k)` addresses element `i * dy * dz + j * dz + k`. The affine maps
/// homogeneous voxel indices to world coordinates.
///
/// Volumes built with [`Volume::from_samples`] also keep the samples at their
/// source precision, so integers beyond the backend float's exact range are
/// read back unchanged by [`Volume::host_samples`].
///
/// # Examples
/// ```rust
/// use histreg_core::{Volume, SampleKind};
/// use burn::tensor::Tensor;
/// use burn_ndarray::NdArray;
/// use nalgebra::Matrix4;
///
/// type Backend = NdArray<f32>;
///
/// let device = Default::default();
/// let data = Tensor::<Backend, 3>::zeros([4, 4, 2], &device);
/// let volume = Volume::new(data, Matrix4::identity(), SampleKind::Float).unwrap();
/// assert_eq!(volume.shape(), [4, 4, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct Volume<B: Backend> {
    data: Tensor<B, 3>,
    affine: Matrix4<f64>,
    kind: SampleKind,
    exact: Option<Arc<[f64]>>,
}

impl<B: Backend> Volume<B> {
    /// Create a volume from tensor data and a voxel-to-world affine.
    ///
    /// Fails if any axis is empty, if the affine's last row is not
    /// `[0, 0, 0, 1]`, or if the affine is not invertible.
    pub fn new(data: Tensor<B, 3>, affine: Matrix4<f64>, kind: SampleKind) -> Result<Self> {
        let shape = data.dims();
        if shape.iter().any(|&d| d == 0) {
            return Err(CoreError::invalid_argument(format!(
                "volume shape must be non-empty, got {:?}",
                shape
            )));
        }
        validate_affine(&affine)?;
        Ok(Self {
            data,
            affine,
            kind,
            exact: None,
        })
    }

    /// Create a volume from host samples in row-major `[dx, dy, dz]` order.
    pub fn from_samples<T: Sample>(
        samples: Vec<T>,
        shape: [usize; 3],
        affine: Matrix4<f64>,
        device: &B::Device,
    ) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if samples.len() != expected {
            return Err(CoreError::ShapeMismatch {
                expected: vec![expected],
                actual: vec![samples.len()],
            });
        }
        let exact: Arc<[f64]> = samples.iter().map(|&s| s.to_f64()).collect();
        let values: Vec<f32> = samples.into_iter().map(Sample::to_f32).collect();
        let data = Tensor::<B, 3>::from_data(TensorData::new(values, Shape::new(shape)), device);
        let mut volume = Self::new(data, affine, T::KIND)?;
        volume.exact = Some(exact);
        Ok(volume)
    }

    /// Create a volume whose affine is built from origin, spacing and direction:
    /// `world = origin + direction * (index * spacing)`.
    pub fn from_geometry(
        data: Tensor<B, 3>,
        origin: Point,
        spacing: Spacing,
        direction: Direction,
        kind: SampleKind,
    ) -> Result<Self> {
        if !spacing.is_valid() {
            return Err(CoreError::invalid_argument(format!(
                "voxel spacing must be positive, got {:?}",
                spacing.to_array()
            )));
        }
        let linear = direction.0 * Matrix3::from_diagonal(&spacing.0);
        let mut affine = linear.to_homogeneous();
        affine.fixed_view_mut::<3, 1>(0, 3).copy_from(&origin.0.coords);
        Self::new(data, affine, kind)
    }

    /// Get the sample tensor.
    pub fn data(&self) -> &Tensor<B, 3> {
        &self.data
    }

    /// Get the voxel-to-world affine.
    pub fn affine(&self) -> &Matrix4<f64> {
        &self.affine
    }

    pub fn kind(&self) -> SampleKind {
        self.kind
    }

    /// Shape as `[dx, dy, dz]`.
    pub fn shape(&self) -> [usize; 3] {
        self.data.dims()
    }

    pub fn voxel_count(&self) -> usize {
        self.shape().iter().product()
    }

    /// Map a continuous voxel index to world coordinates.
    pub fn index_to_world(&self, index: &Point) -> Point {
        apply_affine(&self.affine, index)
    }

    /// Map a world coordinate to a continuous voxel index.
    pub fn world_to_index(&self, point: &Point) -> Result<Point> {
        let inverse = self
            .affine
            .try_inverse()
            .ok_or_else(|| CoreError::singular("voxel-to-world affine"))?;
        Ok(apply_affine(&inverse, point))
    }

    /// Copy the samples to the host in row-major order, at source precision
    /// when the volume was built from host samples.
    pub fn host_samples(&self) -> Result<Vec<f64>> {
        if let Some(exact) = &self.exact {
            return Ok(exact.to_vec());
        }
        self.data
            .to_data()
            .convert::<f64>()
            .to_vec::<f64>()
            .map_err(|e| CoreError::TensorData(format!("{:?}", e)))
    }
}

/// Apply a homogeneous affine to a point, assuming a `[0, 0, 0, 1]` last row.
pub(crate) fn apply_affine(matrix: &Matrix4<f64>, point: &Point) -> Point {
    let h = matrix * point.to_homogeneous();
    Point::new([h.x, h.y, h.z])
}

pub(crate) fn validate_affine(affine: &Matrix4<f64>) -> Result<()> {
    let last_row = affine.row(3).transpose();
    if last_row != Vector4::new(0.0, 0.0, 0.0, 1.0) {
        return Err(CoreError::invalid_argument(format!(
            "affine last row must be [0, 0, 0, 1], got {:?}",
            last_row.as_slice()
        )));
    }
    if affine.try_inverse().is_none() {
        return Err(CoreError::singular("voxel-to-world affine"));
    }
    Ok(())
}
