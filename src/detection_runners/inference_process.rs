use std::time::Instant;
use crate::common::{CropResult, Detection};
use crate::data::TimeCalc;
use crate::detection_runners::engine::RawOutput;
use crate::detection_runners::image_ops::Preprocessed;
use crate::detection_runners::tensor::Tensor;
use crate::error::DetectError;
use crate::utils;

/// Stage slots in [`TimeCalc`].
pub const STAGE_PREPROCESS: usize = 0;
pub const STAGE_INFERENCE: usize = 1;
pub const STAGE_POSTPROCESS: usize = 2;

pub trait InferenceProcess {
    type Input;

    /// Pre-process the input data.
    fn preprocess(&self, x: &Self::Input) -> Result<Preprocessed, DetectError>;

    /// Executes the model on the preprocessed data.
    fn inference(&mut self, x: &Tensor) -> Result<Vec<RawOutput>, DetectError>;

    /// Post-process the model's output.
    fn postprocess(&self, ys: &[RawOutput], threshold: f32) -> Result<Vec<Detection>, DetectError>;

    /// Confidence threshold to use for `x`.
    fn threshold_for(&self, x: &Self::Input) -> f32;

    fn timings_mut(&mut self) -> &mut TimeCalc;

    /// Executes the full pipeline.
    fn run(&mut self, x: &Self::Input) -> Result<(Vec<Detection>, CropResult), DetectError> {
        let pre = self.preprocess(x)?;
        let ys = self.inference(&pre.tensor)?;
        let detections = self.postprocess(&ys, self.threshold_for(x))?;
        Ok((detections, pre.crop))
    }

    /// Executes the full pipeline, recording stage timings.
    fn forward(&mut self, x: &Self::Input, profile: bool) -> Result<(Vec<Detection>, CropResult), DetectError> {
        let detect_time = Instant::now();
        let mut checkpoint = detect_time.elapsed();

        let t_pre = Instant::now();
        let pre = self.preprocess(x)?;
        let t_pre = t_pre.elapsed();
        checkpoint = utils::trace(profile, "TIME", "Preprocessing input", detect_time, checkpoint);

        let t_exe = Instant::now();
        let ys = self.inference(&pre.tensor)?;
        let t_exe = t_exe.elapsed();
        checkpoint = utils::trace(profile, "TIME", "Detection run", detect_time, checkpoint);

        let t_post = Instant::now();
        let detections = self.postprocess(&ys, self.threshold_for(x))?;
        let t_post = t_post.elapsed();
        utils::trace(profile, "TIME", "Postprocessing", detect_time, checkpoint);

        let timings = self.timings_mut();
        timings.add_or_push(STAGE_PREPROCESS, t_pre);
        timings.add_or_push(STAGE_INFERENCE, t_exe);
        timings.add_or_push(STAGE_POSTPROCESS, t_post);

        if profile {
            log::info!("> Preprocess: {t_pre:?} | Inference: {t_exe:?} | Postprocess: {t_post:?}");
        }

        Ok((detections, pre.crop))
    }

    fn print_time(&self);
}
