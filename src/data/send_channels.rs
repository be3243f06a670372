use std::time::Duration;
use crate::common::{CropRect, CropResult, Detection, SourceImage};
use crate::error::DetectError;

/// Pixels of one captured frame.
#[derive(Debug, Clone)]
pub enum FrameInput {
    /// Compressed image bytes (PNG, JPEG, ...).
    Encoded(Vec<u8>),
    /// Already decoded camera frame.
    Decoded(SourceImage),
}

/// One frame submitted to a [`crate::DetectionWorker`].
#[derive(Debug, Clone)]
pub struct FrameRequest {
    pub id: u64,
    pub input: FrameInput,
    pub crop: Option<CropRect>,
    /// Overrides the detector's confidence threshold for this frame.
    pub threshold: Option<f32>,
}

impl FrameRequest {
    pub fn encoded(id: u64, bytes: Vec<u8>) -> Self {
        Self { id, input: FrameInput::Encoded(bytes), crop: None, threshold: None }
    }

    pub fn decoded(id: u64, image: SourceImage) -> Self {
        Self { id, input: FrameInput::Decoded(image), crop: None, threshold: None }
    }

    pub fn with_crop(mut self, crop: CropRect) -> Self {
        self.crop = Some(crop);
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }
}

/// Result of one processed frame.
#[derive(Debug, Clone)]
pub struct FrameOutcome {
    pub id: u64,
    pub detections: Vec<Detection>,
    pub crop: CropResult,
    pub elapsed: Duration,
}

/// What the worker sends back. Errors carry the id of the frame that failed.
pub type FrameReply = (u64, Result<FrameOutcome, DetectError>);

/// Worker side of the frame channels.
#[derive(Debug)]
pub struct DetectionState {
    pub frame_rx: crossbeam_channel::Receiver<FrameRequest>,
    pub reply_tx: crossbeam_channel::Sender<FrameReply>,
}

/// Caller side of the frame channels.
#[derive(Debug)]
pub struct SendState {
    pub frame_tx: crossbeam_channel::Sender<FrameRequest>,
    pub reply_rx: crossbeam_channel::Receiver<FrameReply>,
}

/// Zero-capacity frame channel, so a send only succeeds when the worker is waiting for work.
pub fn frame_channels() -> (SendState, DetectionState) {
    let (frame_tx, frame_rx) = crossbeam_channel::bounded(0);
    let (reply_tx, reply_rx) = crossbeam_channel::unbounded();
    (SendState { frame_tx, reply_rx }, DetectionState { frame_rx, reply_tx })
}
