//! Lazy Cartesian grids over transform parameters.

use histreg_core::transform::TransformModel;
use serde::{Deserialize, Serialize};

use crate::error::{RegistrationError, Result};

/// Offsets to try for one parameter, relative to its base value.
///
/// An empty offset list keeps the parameter at its base value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    /// Index into the transform's parameter vector.
    pub param: usize,
    pub offsets: Vec<f64>,
}

impl AxisSpec {
    pub fn new(param: usize, offsets: impl Into<Vec<f64>>) -> Self {
        Self {
            param,
            offsets: offsets.into(),
        }
    }

    /// Axis for a parameter addressed by name, e.g. `"tx"` or `"rz"`.
    pub fn named(model: TransformModel, name: &str, offsets: impl Into<Vec<f64>>) -> Result<Self> {
        let param = model.param_index(name).ok_or_else(|| {
            RegistrationError::invalid_parameter(format!(
                "{} transform has no parameter named {:?}",
                model, name
            ))
        })?;
        Ok(Self::new(param, offsets))
    }

    fn radix(&self) -> usize {
        self.offsets.len().max(1)
    }
}

/// Restartable iterator over the Cartesian product of axis offsets.
///
/// Points are generated on demand; the last axis varies fastest. Every
/// parameter without an axis stays at its base value.
#[derive(Debug, Clone)]
pub struct ParameterGrid {
    base: Vec<f64>,
    axes: Vec<AxisSpec>,
    len: usize,
    position: usize,
}

impl ParameterGrid {
    /// Build a grid around `base`.
    ///
    /// Fails if an axis addresses a parameter outside `base`, if two axes
    /// address the same parameter, or if an offset is not finite.
    pub fn new(base: &[f64], axes: &[AxisSpec]) -> Result<Self> {
        let mut seen = vec![false; base.len()];
        let mut len = 1usize;
        for axis in axes {
            if axis.param >= base.len() {
                return Err(RegistrationError::invalid_argument(format!(
                    "axis parameter {} is out of range for {} parameters",
                    axis.param,
                    base.len()
                )));
            }
            if std::mem::replace(&mut seen[axis.param], true) {
                return Err(RegistrationError::invalid_argument(format!(
                    "parameter {} appears on more than one axis",
                    axis.param
                )));
            }
            if axis.offsets.iter().any(|o| !o.is_finite()) {
                return Err(RegistrationError::invalid_argument(format!(
                    "offsets for parameter {} must be finite",
                    axis.param
                )));
            }
            len = len.checked_mul(axis.radix()).ok_or_else(|| {
                RegistrationError::invalid_argument("parameter grid size overflows usize")
            })?;
        }

        Ok(Self {
            base: base.to_vec(),
            axes: axes.to_vec(),
            len,
            position: 0,
        })
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn base(&self) -> &[f64] {
        &self.base
    }

    /// Restart from the first point.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// The point at `index` in iteration order.
    pub fn point(&self, index: usize) -> Option<Vec<f64>> {
        if index >= self.len {
            return None;
        }
        let mut params = self.base.clone();
        let mut rest = index;
        for axis in self.axes.iter().rev() {
            let radix = axis.radix();
            if let Some(offset) = axis.offsets.get(rest % radix) {
                params[axis.param] += offset;
            }
            rest /= radix;
        }
        Some(params)
    }
}

impl Iterator for ParameterGrid {
    type Item = Vec<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        let point = self.point(self.position)?;
        self.position += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len.saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ParameterGrid {}
