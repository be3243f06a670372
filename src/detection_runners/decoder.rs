use ndarray::{s, ArrayView2, Axis};
use rayon::prelude::*;
use crate::common::{DetBox, Detection};
use crate::detection_runners::layout::{resolve_layout, Layout, LayoutHints, OutputLayout};
use crate::error::DetectError;

/// Box values at or below this are read as fractions of the input size.
const NORMALIZED_BOX_LIMIT: f32 = 2.0;

/// Decodes a packed `[cx, cy, w, h, class scores...]` output with the default resolver hints.
pub fn decode(raw: &[f32], input_size: u32, conf_threshold: f32) -> Result<Vec<Detection>, DetectError> {
    decode_with(raw, input_size, conf_threshold, &LayoutHints::default())
}

pub fn decode_with(
    raw: &[f32],
    input_size: u32,
    conf_threshold: f32,
    hints: &LayoutHints,
) -> Result<Vec<Detection>, DetectError> {
    let layout = resolve_layout(raw, input_size, hints)?;
    decode_with_layout(raw, &layout, input_size, conf_threshold)
}

/// Decodes with a known layout. Output keeps prediction order.
pub fn decode_with_layout(
    raw: &[f32],
    layout: &OutputLayout,
    input_size: u32,
    conf_threshold: f32,
) -> Result<Vec<Detection>, DetectError> {
    let unsupported = || DetectError::UnsupportedOutputShape { len: raw.len() };
    if layout.feat_count < 5 || layout.len() > raw.len() {
        return Err(unsupported());
    }

    let raw = &raw[..layout.len()];
    // (pred, feat) view either way.
    let preds = match layout.layout {
        Layout::PredFirst => ArrayView2::from_shape((layout.pred_count, layout.feat_count), raw),
        Layout::FeatFirst => ArrayView2::from_shape((layout.feat_count, layout.pred_count), raw)
            .map(|v| v.reversed_axes()),
    }
    .map_err(|_| unsupported())?;

    let size = input_size as f32;
    let detections = preds
        .axis_iter(Axis(0))
        .into_par_iter()
        .filter_map(|pred| {
            let (cx, cy, w, h) = (pred[0], pred[1], pred[2], pred[3]);
            if !(cx.is_finite() && cy.is_finite() && w.is_finite() && h.is_finite()) {
                return None;
            }

            // Highest class score, first one on ties. NaN scores never win.
            let (class_id, score) = pred
                .slice(s![4..])
                .iter()
                .enumerate()
                .fold((0usize, 0f32), |(best_id, best), (id, &v)| {
                    if v > best { (id, v) } else { (best_id, best) }
                });
            if score < conf_threshold {
                return None;
            }

            let scale = if cx.max(cy).max(w).max(h) <= NORMALIZED_BOX_LIMIT { size } else { 1. };
            let bbox = DetBox::from_cxcy_wh(cx * scale, cy * scale, w * scale, h * scale)
                .clamp_to_square(size);
            if bbox.is_degenerate() {
                return None;
            }

            Some(Detection::new(bbox, score, class_id))
        })
        .collect();

    Ok(detections)
}

/// Decodes the three-tensor export `[boxes (N x 4 corners), scores (N), classes (N)]`.
pub fn decode_split(
    boxes: &[f32],
    scores: &[f32],
    classes: &[f32],
    input_size: u32,
    conf_threshold: f32,
) -> Vec<Detection> {
    let size = input_size as f32;
    let n = scores.len().min(classes.len()).min(boxes.len() / 4);

    (0..n)
        .filter_map(|i| {
            let score = scores[i];
            if !score.is_finite() || score < conf_threshold {
                return None;
            }
            let class = classes[i];
            if !class.is_finite() || class < 0. {
                return None;
            }
            let corners = &boxes[i * 4..i * 4 + 4];
            if !corners.iter().all(|v| v.is_finite()) {
                return None;
            }
            let bbox = DetBox::new(corners[0], corners[1], corners[2], corners[3]).clamp_to_square(size);
            if bbox.is_degenerate() {
                return None;
            }
            Some(Detection::new(bbox, score, class as usize))
        })
        .collect()
}
