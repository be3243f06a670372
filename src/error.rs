use thiserror::Error;

use crate::common::DetectorKind;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the detection pipeline.
///
/// Every variant is recoverable at the call site: the caller skips the frame and retries on
/// the next capture. Only `ModelNotLoaded` points at a sequencing bug in the caller.
#[derive(Error, Debug)]
pub enum DetectError {
    /// The compressed source image could not be parsed.
    #[error("failed to decode source image")]
    Decode(#[source] image::ImageError),

    /// The preprocessing target is not a positive size.
    #[error("invalid preprocessing target {width}x{height}")]
    Dimension { width: u32, height: u32 },

    /// No prediction count explains the raw output tensor length.
    #[error("unsupported output shape: no plausible layout for {len} values")]
    UnsupportedOutputShape { len: usize },

    /// Opaque failure from the inference engine.
    #[error("inference failed")]
    Inference(#[source] BoxedError),

    /// The inference engine returned no output tensors at all.
    #[error("model returned no outputs")]
    NoOutputs,

    /// `detect` was called before the model finished loading.
    #[error("{0} model not loaded")]
    ModelNotLoaded(DetectorKind),

    /// The model loader could not produce a handle.
    #[error("failed to load model `{model}`")]
    Load {
        model: String,
        #[source]
        source: BoxedError,
    },
}

impl DetectError {
    pub(crate) fn inference(err: anyhow::Error) -> Self {
        DetectError::Inference(err.into())
    }

    pub(crate) fn load(model: &str, err: anyhow::Error) -> Self {
        DetectError::Load {
            model: model.to_string(),
            source: err.into(),
        }
    }

    /// True for errors that come from caller misuse rather than runtime conditions.
    pub fn is_sequencing_bug(&self) -> bool {
        matches!(self, DetectError::ModelNotLoaded(_))
    }
}

/// Why a requested crop rectangle could not be applied.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CropError {
    #[error("crop rectangle has non-finite coordinates")]
    NonFinite,
    #[error("crop rectangle has non-positive size {width}x{height}")]
    Degenerate { width: f32, height: f32 },
    #[error("crop rectangle does not intersect the {src_width}x{src_height} source")]
    OutOfBounds { src_width: u32, src_height: u32 },
}
