use std::path::Path;
use anyhow::Context;
use regex::Regex;
use serde::{Deserialize, Serialize};
use crate::common::DetectorKind;
use crate::utils;

const COCO_NAMES: [&str; 80] = [
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat", "dog",
    "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack", "umbrella",
    "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball", "kite",
    "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket", "bottle",
    "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple", "sandwich", "orange",
    "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair", "couch", "potted plant",
    "bed", "dining table", "toilet", "tv", "laptop", "mouse", "remote", "keyboard", "cell phone",
    "microwave", "oven", "toaster", "sink", "refrigerator", "book", "clock", "vase", "scissors",
    "teddy bear", "hair drier", "toothbrush",
];

// Class order of the exported currency model, not numeric order.
const CURRENCY_NAMES: [&str; 8] = [
    "10 Rupees", "100 Rupees", "1000 Rupees", "20 Rupees",
    "50 Rupees", "500 Rupees", "5000 Rupees", "75 Rupees",
];

/// Class id to display label.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelTable {
    names: Vec<String>,
}

impl LabelTable {
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            names: names.iter().map(|x| x.as_ref().to_string()).collect(),
        }
    }

    /// One label per line; blank lines are skipped.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let lines = utils::file_to_vec(path)
            .with_context(|| format!("failed to read labels from {}", path.display()))?;
        let names: Vec<String> = lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Self { names })
    }

    /// Parses model metadata of the form `{0: 'person', 1: 'bicycle', 27: "lady's slipper"}`.
    pub fn from_metadata(names: &str) -> anyhow::Result<Self> {
        let re = Regex::new(r#"(['"])([-()\w '"]+)(['"])"#)?;
        let mut names_ = vec![];
        for (_, [_, name, _]) in re.captures_iter(names).map(|x| x.extract()) {
            names_.push(name.to_string());
        }
        if names_.is_empty() {
            anyhow::bail!("no class names found in metadata");
        }
        Ok(Self { names: names_ })
    }

    pub fn coco() -> Self {
        Self::from_names(&COCO_NAMES)
    }

    pub fn currency() -> Self {
        Self::from_names(&CURRENCY_NAMES)
    }

    pub fn for_kind(kind: DetectorKind) -> Self {
        match kind {
            DetectorKind::Object => Self::coco(),
            DetectorKind::Currency => Self::currency(),
        }
    }

    pub fn get(&self, class_id: usize) -> Option<&str> {
        self.names.get(class_id).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables() {
        let coco = LabelTable::coco();
        assert_eq!(coco.len(), 80);
        assert_eq!(coco.get(0), Some("person"));
        assert_eq!(coco.get(79), Some("toothbrush"));
        assert_eq!(coco.get(80), None);

        let currency = LabelTable::for_kind(DetectorKind::Currency);
        assert_eq!(currency.get(3), Some("20 Rupees"));
        assert_eq!(currency.get(7), Some("75 Rupees"));
    }

    #[test]
    fn parses_metadata_names() {
        let table = LabelTable::from_metadata(
            r#"{0: 'person', 1: 'sports ball', 2: "yellow_lady's_slipper"}"#,
        ).unwrap();
        assert_eq!(table.names(), &["person", "sports ball", "yellow_lady's_slipper"]);
        assert!(LabelTable::from_metadata("{}").is_err());
    }
}
