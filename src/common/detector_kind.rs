use serde::{Deserialize, Serialize};

/// Which detection screen a model serves. Each kind owns its own model handle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorKind {
    #[default] Object,
    Currency,
}

// Hardcoded kind names. Storing the "proper" spelling and the lowercase version.
const OBJECT: [&str; 2] = ["Object", "object"];
const CURRENCY: [&str; 2] = ["Currency", "currency"];

impl DetectorKind {
    pub fn from_str(kind: &str) -> Option<Self> {
        match kind.trim().to_lowercase().as_str() {
            "object" => Some(DetectorKind::Object),
            "currency" => Some(DetectorKind::Currency),
            _ => None,
        }
    }

    pub fn str(&self) -> &'static str {
        match self {
            DetectorKind::Object => OBJECT[0],
            DetectorKind::Currency => CURRENCY[0],
        }
    }

    pub fn str_lowercase(&self) -> &'static str {
        match self {
            DetectorKind::Object => OBJECT[1],
            DetectorKind::Currency => CURRENCY[1],
        }
    }

    /// Square input side the shipped model for this kind was exported with.
    pub fn default_input_size(&self) -> u32 {
        match self {
            DetectorKind::Object => 640,
            DetectorKind::Currency => 416,
        }
    }

    /// Confidence used when the caller passes no threshold.
    pub fn default_confidence(&self) -> f32 {
        match self {
            DetectorKind::Object => 0.3,
            DetectorKind::Currency => 0.25,
        }
    }

    pub fn default_model_id(&self) -> &'static str {
        match self {
            DetectorKind::Object => "yolov8n",
            DetectorKind::Currency => "currency_best",
        }
    }

    pub fn all_detector_kinds() -> Vec<String> {
        vec![
            DetectorKind::Object.str_lowercase().to_string(),
            DetectorKind::Currency.str_lowercase().to_string(),
        ]
    }

    pub fn is_valid_detector_kind(kind: &str) -> bool {
        DetectorKind::from_str(kind).is_some()
    }
}

impl std::fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.str())
    }
}
