//! Class-aware greedy non-maximum suppression.

pub trait Nms {
    fn iou(&self, other: &Self) -> f32;
    fn confidence(&self) -> f32;
    fn class_id(&self) -> usize;
}

/// Default overlap above which a same-class box counts as a duplicate.
pub const DEFAULT_IOU_THRESHOLD: f32 = 0.5;

/// Keeps the highest scoring box of every same-class cluster, in place.
///
/// Boxes are stably sorted by descending confidence. A box is dropped when it shares its
/// class with an already kept box and their IoU is at least `iou_threshold`, so every pair
/// of survivors of one class overlaps strictly less than the threshold.
pub fn nms<T: Nms>(boxes: &mut Vec<T>, iou_threshold: f32) {
    boxes.sort_by(|b1, b2| b2.confidence().total_cmp(&b1.confidence()));
    let mut current_index = 0;
    for index in 0..boxes.len() {
        let mut drop = false;
        for prev_index in 0..current_index {
            let kept = &boxes[prev_index];
            if kept.class_id() == boxes[index].class_id() && kept.iou(&boxes[index]) >= iou_threshold {
                drop = true;
                break;
            }
        }
        if !drop {
            boxes.swap(current_index, index);
            current_index += 1;
        }
    }
    boxes.truncate(current_index);
}

/// Owned variant of [`nms`].
pub fn suppress<T: Nms>(mut detections: Vec<T>, iou_threshold: f32) -> Vec<T> {
    nms(&mut detections, iou_threshold);
    detections
}
