use std::path::{Path, PathBuf};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use crate::common::DetectorKind;
use crate::data::FsAccess;

/// On-disk description of one detector model.
///
/// Only `kind` is required in JSON; every other field falls back to the shipped defaults of
/// that kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub kind: DetectorKind,
    #[serde(default)]
    pub model_id: String,
    #[serde(default)]
    pub weights_path: Option<String>,
    #[serde(default)]
    pub ort_lib_path: Option<String>,
    #[serde(default)]
    pub labels_path: Option<String>,
    #[serde(default)]
    pub input_size: u32,
    #[serde(default)]
    pub normalize: bool,
    #[serde(default)]
    pub conf_threshold: f32,
    #[serde(default)]
    pub iou_threshold: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::for_kind(DetectorKind::default())
    }
}

impl ModelConfig {
    pub fn for_kind(kind: DetectorKind) -> Self {
        Self {
            kind,
            model_id: kind.default_model_id().to_string(),
            weights_path: None,
            ort_lib_path: None,
            labels_path: None,
            input_size: kind.default_input_size(),
            normalize: false,
            conf_threshold: kind.default_confidence(),
            iou_threshold: 0.5,
        }
    }

    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: ModelConfig = serde_json::from_str(json).context("invalid model config")?;
        Ok(config.with_kind_defaults())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read model config {}", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // Zero / empty values mean "not set" in JSON.
    fn with_kind_defaults(mut self) -> Self {
        let defaults = Self::for_kind(self.kind);
        if self.model_id.is_empty() {
            self.model_id = defaults.model_id;
        }
        if self.input_size == 0 {
            self.input_size = defaults.input_size;
        }
        if self.conf_threshold <= 0. {
            self.conf_threshold = defaults.conf_threshold;
        }
        if self.iou_threshold <= 0. {
            self.iou_threshold = defaults.iou_threshold;
        }
        self
    }

    /// Explicit weights path if configured, `<models dir>/<model id>.onnx` otherwise.
    pub fn resolve_weights_path(&self) -> anyhow::Result<PathBuf> {
        match &self.weights_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(FsAccess::models_dir()?.join(format!("{}.onnx", self.model_id))),
        }
    }
}

impl std::fmt::Display for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Detector: {}\n\
        Model Id: {}\n\
        Weights File Path: {}\n\
        Labels Path: {}\n\
        Model Input Resolution: {}x{}\n\
        Normalized Input: {}\n\
        Detection Threshold: {}\n\
        IoU Threshold: {}",
               self.kind, self.model_id,
               self.weights_path.as_deref().unwrap_or("<default>"),
               self.labels_path.as_deref().unwrap_or("<built-in>"),
               self.input_size, self.input_size, self.normalize,
               self.conf_threshold, self.iou_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_takes_kind_defaults() {
        let config = ModelConfig::from_json_str(r#"{"kind": "currency"}"#).unwrap();
        assert_eq!(config, ModelConfig::for_kind(DetectorKind::Currency));
        assert_eq!(config.input_size, 416);
        assert_eq!(config.conf_threshold, 0.25);
    }

    #[test]
    fn explicit_fields_win() {
        let json = r#"{"kind": "object", "model_id": "yolo11s", "input_size": 320,
                       "normalize": true, "weights_path": "/tmp/m.onnx"}"#;
        let config = ModelConfig::from_json_str(json).unwrap();
        assert_eq!(config.model_id, "yolo11s");
        assert_eq!(config.input_size, 320);
        assert!(config.normalize);
        assert_eq!(config.conf_threshold, 0.3);
        assert_eq!(config.resolve_weights_path().unwrap(), PathBuf::from("/tmp/m.onnx"));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(ModelConfig::from_json_str(r#"{"kind": "face"}"#).is_err());
    }
}
