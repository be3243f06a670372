//! Turns final detections into spoken-style scene cues and preview overlay rectangles.

use serde::{Deserialize, Serialize};
use crate::common::{DetBox, Detection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Center,
    Right,
}

impl Direction {
    /// Which third of the input width the box centre falls in.
    pub fn of(bbox: &DetBox, input_size: u32) -> Self {
        let third = input_size as f32 / 3.;
        let cx = bbox.cx();
        if cx < third {
            Direction::Left
        } else if cx > third * 2. {
            Direction::Right
        } else {
            Direction::Center
        }
    }

    pub fn str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Center => "center",
            Direction::Right => "right",
        }
    }
}

/// Rough distance from how much of the frame a box covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Proximity {
    VeryClose,
    Near,
    Medium,
    Far,
}

impl Proximity {
    pub fn of(bbox: &DetBox, input_size: u32) -> Self {
        let image_area = input_size as f32 * input_size as f32;
        let ratio = if image_area > 0. { bbox.area() / image_area } else { 0. };
        if ratio > 0.25 {
            Proximity::VeryClose
        } else if ratio > 0.12 {
            Proximity::Near
        } else if ratio > 0.05 {
            Proximity::Medium
        } else {
            Proximity::Far
        }
    }

    pub fn str(&self) -> &'static str {
        match self {
            Proximity::VeryClose => "very close",
            Proximity::Near => "near",
            Proximity::Medium => "medium",
            Proximity::Far => "far",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneCue {
    pub label: String,
    pub direction: Direction,
    pub proximity: Proximity,
}

impl SceneCue {
    pub fn from_detection(detection: &Detection, input_size: u32) -> Self {
        Self {
            label: detection.get_label(),
            direction: Direction::of(&detection.bbox, input_size),
            proximity: Proximity::of(&detection.bbox, input_size),
        }
    }
}

impl std::fmt::Display for SceneCue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}, {}", self.label, self.direction.str(), self.proximity.str())
    }
}

/// Highest scoring detection; the earliest one wins ties.
pub fn best_detection(detections: &[Detection]) -> Option<&Detection> {
    detections.iter().fold(None, |best: Option<&Detection>, d| match best {
        Some(b) if b.score >= d.score => Some(b),
        _ => Some(d),
    })
}

/// Cue for the best detection, unless it is too far away to mention.
pub fn describe_best(detections: &[Detection], input_size: u32) -> Option<SceneCue> {
    best_detection(detections)
        .map(|d| SceneCue::from_detection(d, input_size))
        .filter(|cue| cue.proximity != Proximity::Far)
}

/// Overlay rectangle in preview coordinates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Maps a model-space box onto a preview that shows the centred square crop of the frame.
pub fn map_box_to_preview(bbox: &DetBox, preview_width: f32, preview_height: f32, model_size: u32) -> PreviewRect {
    let square = preview_width.min(preview_height);
    let offset_x = (preview_width - square) / 2.;
    let offset_y = (preview_height - square) / 2.;
    let scale = if model_size > 0 { square / model_size as f32 } else { 0. };

    let left = (offset_x + bbox.x1 * scale).clamp(0., preview_width.max(0.));
    let top = (offset_y + bbox.y1 * scale).clamp(0., preview_height.max(0.));
    let right = (offset_x + bbox.x2 * scale).clamp(0., preview_width.max(0.));
    let bottom = (offset_y + bbox.y2 * scale).clamp(0., preview_height.max(0.));

    PreviewRect {
        left,
        top,
        width: (right - left).max(0.),
        height: (bottom - top).max(0.),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_keeps_first_on_ties() {
        let dets = vec![
            Detection::new(DetBox::new(0., 0., 1., 1.), 0.7, 1),
            Detection::new(DetBox::new(0., 0., 1., 1.), 0.9, 2),
            Detection::new(DetBox::new(0., 0., 1., 1.), 0.9, 3),
        ];
        assert_eq!(best_detection(&dets).map(|d| d.class_id), Some(2));
        assert!(best_detection(&[]).is_none());
    }

    #[test]
    fn preview_mapping_offsets_landscape() {
        // 1000x600 preview shows a 600x600 square starting at x=200.
        let rect = map_box_to_preview(&DetBox::new(0., 0., 320., 640.), 1000., 600., 640);
        assert_eq!(rect, PreviewRect { left: 200., top: 0., width: 300., height: 600. });
    }
}
