use serde::{Deserialize, Serialize};
use crate::common::DetBox;
use crate::detection_runners::nms::Nms;

/// One candidate object instance produced for a single frame.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: DetBox,
    pub score: f32,
    pub class_id: usize,
    pub label: Option<String>,
}

impl Nms for Detection {
    fn iou(&self, other: &Self) -> f32 {
        self.bbox.iou(&other.bbox)
    }

    fn confidence(&self) -> f32 {
        self.score
    }

    fn class_id(&self) -> usize {
        self.class_id
    }
}

impl Detection {
    pub fn new(bbox: DetBox, score: f32, class_id: usize) -> Self {
        Self {
            bbox,
            score,
            class_id,
            label: None,
        }
    }

    /// Sets the bounding box's coordinates using `(x1, y1, x2, y2)`.
    pub fn with_x1y1_x2y2(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.bbox = DetBox::new(x1, y1, x2, y2);
        self
    }

    /// Sets the bounding box from its center and size.
    pub fn with_cxcy_wh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bbox = DetBox::from_cxcy_wh(cx, cy, w, h);
        self
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    pub fn with_class_id(mut self, class_id: usize) -> Self {
        self.class_id = class_id;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn get_label(&self) -> String {
        self.label.clone().unwrap_or("Unknown".to_string())
    }

    /// The box as `[x1, y1, x2, y2]`.
    pub fn boxed(&self) -> [f32; 4] {
        self.bbox.as_array()
    }
}
