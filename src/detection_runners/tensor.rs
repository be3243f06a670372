use anyhow::Result;
use ndarray::{Array, IxDyn};

/// Model input, wrapper over [`Array<f32, IxDyn>`].
///
/// Preprocessing produces `[height, width, 3]` in standard (row-major) layout, so the flat
/// view is the interleaved RGB sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tensor(pub Array<f32, IxDyn>);

impl From<Array<f32, IxDyn>> for Tensor {
    fn from(x: Array<f32, IxDyn>) -> Self {
        Self(x)
    }
}

impl From<Vec<f32>> for Tensor {
    fn from(x: Vec<f32>) -> Self {
        Self(Array::from_vec(x).into_dyn())
    }
}

impl std::ops::Deref for Tensor {
    type Target = Array<f32, IxDyn>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Tensor {
    pub fn from_shape_vec(shape: &[usize], xs: Vec<f32>) -> Result<Self> {
        Ok(Self::from(Array::from_shape_vec(shape, xs)?))
    }

    pub fn from_hwc(height: usize, width: usize, xs: Vec<f32>) -> Result<Self> {
        Self::from_shape_vec(&[height, width, 3], xs)
    }

    pub fn ndim(&self) -> usize {
        self.0.ndim()
    }

    /// Values in memory order, copied if the array is not contiguous.
    pub fn to_vec(&self) -> Vec<f32> {
        match self.0.as_slice() {
            Some(xs) => xs.to_vec(),
            None => self.0.iter().copied().collect(),
        }
    }

    /// Planar `[3, height, width]` copy of an interleaved `[height, width, 3]` tensor.
    pub fn to_nchw(&self) -> Result<Self> {
        if self.ndim() != 3 {
            anyhow::bail!("Expected 3D tensor (HWC), got ndim={}", self.ndim());
        }
        let chw = self.0.view().permuted_axes(vec![2, 0, 1]);
        Ok(Self(chw.as_standard_layout().into_owned()))
    }

    /// Adds a leading batch dimension of 1.
    pub fn batched(&self) -> Self {
        Self(self.0.clone().insert_axis(ndarray::Axis(0)))
    }
}
