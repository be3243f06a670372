use std::sync::Arc;
use parking_lot::Mutex;
use crate::common::{CropResult, Detection, DetectorKind, SourceImage};
use crate::data::{DetectorOptions, FrameInput, FrameRequest, InputLayout, LabelTable, TimeCalc};
use crate::detection_runners::decoder::{decode_split, decode_with};
use crate::detection_runners::engine::{InferenceEngine, ModelLoader, RawOutput};
use crate::detection_runners::image_ops::{self, Preprocessed};
use crate::detection_runners::inference_process::{InferenceProcess, STAGE_INFERENCE, STAGE_POSTPROCESS, STAGE_PREPROCESS};
use crate::detection_runners::nms::nms;
use crate::detection_runners::tensor::Tensor;
use crate::error::DetectError;

/// Loaded detector: an inference engine plus everything needed to turn its output into
/// detections. One handle per detector kind.
pub struct Detector<E: InferenceEngine> {
    engine: E,
    options: DetectorOptions,
    timings: TimeCalc,
}

impl<E: InferenceEngine> std::fmt::Debug for Detector<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detector")
            .field("kind", &self.options.kind)
            .field("model_id", &self.options.model_id)
            .field("input_size", &self.options.input_size)
            .finish()
    }
}

impl<E: InferenceEngine> Detector<E> {
    pub fn load<L>(loader: &L, options: DetectorOptions) -> Result<Self, DetectError>
    where
        L: ModelLoader<Engine = E>,
    {
        log::info!(
            "Loading {} detector `{}` from {} ({}x{} input)",
            options.kind, options.model_id, options.weights_path, options.input_size, options.input_size
        );
        let engine = loader
            .load(&options)
            .map_err(|e| DetectError::load(&options.model_id, e))?;
        Ok(Self::with_engine(engine, options))
    }

    /// Wraps an already loaded engine. Labels fall back to the model's `names` metadata.
    pub fn with_engine(engine: E, mut options: DetectorOptions) -> Self {
        if options.labels.is_none() {
            options.labels = engine
                .metadata("names")
                .and_then(|names| LabelTable::from_metadata(&names).ok());
        }
        Self {
            engine,
            options,
            timings: TimeCalc::default(),
        }
    }

    pub fn kind(&self) -> DetectorKind {
        self.options.kind
    }

    pub fn options(&self) -> &DetectorOptions {
        &self.options
    }

    pub fn input_size(&self) -> u32 {
        self.options.input_size
    }

    pub fn timings(&self) -> &TimeCalc {
        &self.timings
    }

    /// Runs inference on a preprocessed tensor and returns suppressed detections.
    pub fn detect(&mut self, tensor: &Tensor, threshold: f32) -> Result<Vec<Detection>, DetectError> {
        let ys = self.inference(tensor)?;
        self.postprocess(&ys, threshold)
    }

    /// [`Detector::detect`] with the configured confidence threshold.
    pub fn detect_default(&mut self, tensor: &Tensor) -> Result<Vec<Detection>, DetectError> {
        self.detect(tensor, self.options.conf_threshold)
    }

    /// Raw engine outputs, without decoding or suppression.
    pub fn run_raw(&mut self, tensor: &Tensor) -> Result<Vec<RawOutput>, DetectError> {
        self.inference(tensor)
    }

    /// Full pipeline for one captured frame.
    pub fn detect_frame(&mut self, frame: &FrameRequest) -> Result<(Vec<Detection>, CropResult), DetectError> {
        let profile = self.options.profile;
        self.forward(frame, profile)
    }

    /// Engine inputs in the layout the model expects.
    fn engine_input(&self, tensor: &Tensor) -> Result<Tensor, DetectError> {
        match self.options.input_layout {
            InputLayout::Nhwc => Ok(tensor.clone()),
            InputLayout::Nchw => tensor.to_nchw().map_err(DetectError::inference),
        }
    }

    fn attach_labels(&self, detections: &mut [Detection]) {
        if let Some(labels) = &self.options.labels {
            for d in detections.iter_mut() {
                d.label = labels.get(d.class_id).map(str::to_string);
            }
        }
    }
}

/// True for `[boxes (N x 4), scores (N), classes (N)]` exports.
fn is_split_output(ys: &[RawOutput]) -> bool {
    match ys {
        [boxes, scores, classes, ..] => {
            !scores.is_empty() && scores.len() == classes.len() && boxes.len() == scores.len() * 4
        }
        _ => false,
    }
}

impl<E: InferenceEngine> InferenceProcess for Detector<E> {
    type Input = FrameRequest;

    fn preprocess(&self, x: &FrameRequest) -> Result<Preprocessed, DetectError> {
        let size = self.options.input_size;
        let normalization = self.options.normalization;
        match &x.input {
            FrameInput::Encoded(bytes) => image_ops::preprocess(bytes, size, size, normalization, x.crop.as_ref()),
            FrameInput::Decoded(image) => image_ops::preprocess_image(image, size, size, normalization, x.crop.as_ref()),
        }
    }

    fn inference(&mut self, x: &Tensor) -> Result<Vec<RawOutput>, DetectError> {
        let input = self.engine_input(x)?;
        let ys = self
            .engine
            .run(std::slice::from_ref(&input))
            .map_err(DetectError::inference)?;
        if ys.is_empty() {
            return Err(DetectError::NoOutputs);
        }
        Ok(ys)
    }

    fn postprocess(&self, ys: &[RawOutput], threshold: f32) -> Result<Vec<Detection>, DetectError> {
        let size = self.options.input_size;
        let mut detections = if is_split_output(ys) {
            decode_split(&ys[0], &ys[1], &ys[2], size, threshold)
        } else {
            let first = ys.first().ok_or(DetectError::NoOutputs)?;
            decode_with(first, size, threshold, &self.options.layout)?
        };

        nms(&mut detections, self.options.iou_threshold);
        self.attach_labels(&mut detections);
        Ok(detections)
    }

    fn threshold_for(&self, x: &FrameRequest) -> f32 {
        x.threshold.unwrap_or(self.options.conf_threshold)
    }

    fn timings_mut(&mut self) -> &mut TimeCalc {
        &mut self.timings
    }

    fn print_time(&self) {
        let avg = |i| self.timings.avg_i(i).unwrap_or_default();
        log::info!(
            "{} detector | runs: {} | preprocess: {:?} | inference: {:?} | postprocess: {:?}",
            self.options.kind,
            self.timings.n(),
            avg(STAGE_PREPROCESS),
            avg(STAGE_INFERENCE),
            avg(STAGE_POSTPROCESS),
        );
    }
}

/// Load-once slot for one detector kind.
///
/// `detect` before a successful `load` is a sequencing error, reported as
/// [`DetectError::ModelNotLoaded`].
pub struct DetectorService<L: ModelLoader> {
    loader: L,
    options: DetectorOptions,
    detector: Option<Detector<L::Engine>>,
}

impl<L: ModelLoader> DetectorService<L> {
    pub fn new(loader: L, options: DetectorOptions) -> Self {
        Self {
            loader,
            options,
            detector: None,
        }
    }

    pub fn kind(&self) -> DetectorKind {
        self.options.kind
    }

    /// Loads the model. A second call replaces the previous handle.
    pub fn load(&mut self) -> Result<(), DetectError> {
        let detector = Detector::load(&self.loader, self.options.clone())?;
        self.detector = Some(detector);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.detector.is_some()
    }

    pub fn unload(&mut self) {
        self.detector = None;
    }

    pub fn detector(&mut self) -> Result<&mut Detector<L::Engine>, DetectError> {
        let kind = self.options.kind;
        self.detector.as_mut().ok_or(DetectError::ModelNotLoaded(kind))
    }

    /// `threshold` defaults to the configured confidence of the kind.
    pub fn detect(&mut self, tensor: &Tensor, threshold: Option<f32>) -> Result<Vec<Detection>, DetectError> {
        let threshold = threshold.unwrap_or(self.options.conf_threshold);
        self.detector()?.detect(tensor, threshold)
    }

    pub fn run_raw(&mut self, tensor: &Tensor) -> Result<Vec<RawOutput>, DetectError> {
        self.detector()?.run_raw(tensor)
    }

    pub fn detect_image(&mut self, image: &SourceImage, threshold: Option<f32>) -> Result<Vec<Detection>, DetectError> {
        let detector = self.detector()?;
        let mut frame = FrameRequest::decoded(0, image.clone());
        frame.threshold = threshold;
        detector.detect_frame(&frame).map(|(detections, _)| detections)
    }
}

/// At most one request in flight over a shared value.
///
/// `try_run` does not wait: while another caller holds the value it returns `None`, which
/// is how a capture loop skips frames instead of queueing them.
pub struct SingleFlight<T> {
    inner: Arc<Mutex<T>>,
}

impl<T> Clone for SingleFlight<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SingleFlight<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(value)),
        }
    }

    pub fn try_run<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut guard = self.inner.try_lock()?;
        Some(f(&mut guard))
    }

    /// Waits for the running request, then runs `f`.
    pub fn run<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    pub fn is_busy(&self) -> bool {
        self.inner.is_locked()
    }
}
