//! On-device detection pipeline: image preprocessing, output layout inference, detection
//! decoding and non-maximum suppression around a black-box inference engine.

mod utils;
mod detectors;
mod worker;
pub mod common;
pub mod data;
pub mod detection_runners;
pub mod detection_processing;
pub mod colour;
pub mod currency;
pub mod embedding;
pub mod error;

use std::time::Instant;
use crate::common::{Detection, ModelConfig};
use crate::data::{DetectorOptions, FrameRequest};
use crate::detection_runners::engine::{InferenceEngine, ModelLoader};

pub use crate::common::{center_square_crop, CropRect, CropResult, DetBox, DetectorKind, Normalization, SourceImage};
pub use crate::detection_runners::{decode, preprocess, preprocess_image, resolve_layout, suppress, RawOutput, Tensor};
pub use crate::detectors::{Detector, DetectorService, SingleFlight};
pub use crate::error::{CropError, DetectError};
pub use crate::worker::DetectionWorker;

pub type Result<T, E = DetectError> = std::result::Result<T, E>;

/// Builds a detector from a model config and loads it with `loader`.
pub fn init_detector<L: ModelLoader>(model_details: &ModelConfig, loader: &L) -> Result<Detector<L::Engine>> {
    let options = DetectorOptions::from_model_config(model_details)
        .map_err(|e| DetectError::load(&model_details.model_id, e))?;
    log::info!("Initializing {} detector\n{}", model_details.kind, model_details);
    Detector::load(loader, options)
}

/// Runs one frame through the full pipeline.
pub fn run_detection<E: InferenceEngine>(detector: &mut Detector<E>, frame: &FrameRequest) -> Result<Vec<Detection>> {
    let now = Instant::now();
    let (detections, crop) = detector.detect_frame(frame)?;
    log::debug!("Frame {} | {} detections | crop {:?} | {:?}", frame.id, detections.len(), crop, now.elapsed());
    Ok(detections)
}
