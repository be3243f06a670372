//! Options for building detectors.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use crate::common::{DetectorKind, ModelConfig, Normalization};
use crate::data::LabelTable;
use crate::detection_runners::layout::LayoutHints;

/// Memory order of the image tensor handed to the engine.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputLayout {
    /// `[height, width, 3]`, the order preprocessing produces.
    #[default] Nhwc,
    /// `[3, height, width]`.
    Nchw,
}

#[derive(Debug, Clone)]
pub struct DetectorOptions {
    pub kind: DetectorKind,
    pub model_id: String,
    pub weights_path: String,
    pub ort_lib_path: Option<String>,
    pub input_size: u32,
    pub normalization: Normalization,
    pub input_layout: InputLayout,
    pub conf_threshold: f32,
    pub iou_threshold: f32,
    pub layout: LayoutHints,
    pub labels: Option<LabelTable>,
    pub profile: bool,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self::for_kind(DetectorKind::Object)
    }
}

impl DetectorOptions {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn for_kind(kind: DetectorKind) -> Self {
        Self {
            kind,
            model_id: kind.default_model_id().to_string(),
            weights_path: String::new(),
            ort_lib_path: None,
            input_size: kind.default_input_size(),
            normalization: Normalization::Raw,
            input_layout: InputLayout::Nhwc,
            conf_threshold: kind.default_confidence(),
            iou_threshold: 0.5,
            layout: LayoutHints::default(),
            labels: None,
            profile: false,
        }
    }

    /// Resolves paths and labels of a [`ModelConfig`].
    ///
    /// Labels come from `labels_path` when set, otherwise the built-in table of the kind.
    pub fn from_model_config(config: &ModelConfig) -> Result<Self> {
        let weights_path = config.resolve_weights_path()?;
        let labels = match &config.labels_path {
            Some(path) => LabelTable::from_file(path)?,
            None => LabelTable::for_kind(config.kind),
        };

        Ok(Self::for_kind(config.kind)
            .with_model_id(&config.model_id)
            .with_model(&weights_path.to_string_lossy())
            .with_ort_lib_path(config.ort_lib_path.as_deref())
            .with_input_size(config.input_size)
            .with_normalization(config.normalize.into())
            .with_conf(config.conf_threshold)
            .with_iou(config.iou_threshold)
            .with_labels(labels))
    }

    pub fn with_model_id(mut self, model_id: &str) -> Self {
        self.model_id = model_id.to_string();
        self
    }

    pub fn with_model(mut self, weights_path: &str) -> Self {
        self.weights_path = weights_path.to_string();
        self
    }

    pub fn with_ort_lib_path(mut self, ort_lib_path: Option<&str>) -> Self {
        self.ort_lib_path = ort_lib_path.map(str::to_string);
        self
    }

    pub fn with_input_size(mut self, n: u32) -> Self {
        self.input_size = n;
        self
    }

    pub fn with_normalization(mut self, x: Normalization) -> Self {
        self.normalization = x;
        self
    }

    pub fn with_input_layout(mut self, x: InputLayout) -> Self {
        self.input_layout = x;
        self
    }

    pub fn with_conf(mut self, x: f32) -> Self {
        self.conf_threshold = x;
        self
    }

    pub fn with_iou(mut self, x: f32) -> Self {
        self.iou_threshold = x;
        self
    }

    pub fn with_pred_candidates(mut self, x: &[usize]) -> Self {
        self.layout.pred_candidates = x.to_vec();
        self
    }

    pub fn with_layout_samples(mut self, n: usize) -> Self {
        self.layout.max_samples = n;
        self
    }

    pub fn with_labels(mut self, labels: LabelTable) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn with_profile(mut self, profile: bool) -> Self {
        self.profile = profile;
        self
    }
}
