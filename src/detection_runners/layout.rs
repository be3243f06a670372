//! Infers prediction count, feature count and memory order of a flat detector output.
//!
//! Exported detectors disagree on whether the output is stored prediction by prediction
//! (`[pred][feat]`) or feature by feature (`[feat][pred]`), and no shape metadata is
//! available on the wire, so both are guessed from the length and a sample of the values.

use serde::{Deserialize, Serialize};
use crate::error::DetectError;

/// Prediction counts of common exports (640, 416, 1280, 416 v3, 560 and 320 inputs).
pub const DEFAULT_PRED_CANDIDATES: [usize; 6] = [8400, 3549, 25200, 10647, 6300, 2100];

/// 80 COCO classes plus the 4 box values.
pub const FALLBACK_FEATS: usize = 84;

/// Memory order of a flat `pred x feat` output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layout {
    /// All features of prediction 0, then prediction 1, ...
    #[default] PredFirst,
    /// All predictions for feature 0, then feature 1, ...
    FeatFirst,
}

/// Resolver knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutHints {
    /// Tried in order; the first that divides the length with a plausible feature count wins.
    pub pred_candidates: Vec<usize>,
    pub min_feats: usize,
    pub max_feats: usize,
    /// Feature count assumed when no candidate matches.
    pub fallback_feats: usize,
    /// Predictions inspected when choosing the layout.
    pub max_samples: usize,
}

impl Default for LayoutHints {
    fn default() -> Self {
        Self {
            pred_candidates: DEFAULT_PRED_CANDIDATES.to_vec(),
            min_feats: 6,
            max_feats: 200,
            fallback_feats: FALLBACK_FEATS,
            max_samples: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLayout {
    pub pred_count: usize,
    pub feat_count: usize,
    pub layout: Layout,
}

impl OutputLayout {
    pub fn new(pred_count: usize, feat_count: usize, layout: Layout) -> Self {
        Self { pred_count, feat_count, layout }
    }

    /// Flat index of feature `feat` of prediction `pred`.
    #[inline]
    pub fn index(&self, pred: usize, feat: usize) -> usize {
        match self.layout {
            Layout::PredFirst => pred * self.feat_count + feat,
            Layout::FeatFirst => feat * self.pred_count + pred,
        }
    }

    pub fn num_classes(&self) -> usize {
        self.feat_count.saturating_sub(4)
    }

    pub fn len(&self) -> usize {
        self.pred_count * self.feat_count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Picks `(pred_count, feat_count)` for an output of `len` values.
pub fn resolve_counts(len: usize, hints: &LayoutHints) -> Result<(usize, usize), DetectError> {
    if len == 0 {
        return Err(DetectError::UnsupportedOutputShape { len });
    }

    let found = hints.pred_candidates.iter().copied().find(|&pred| {
        pred > 0 && len % pred == 0 && (hints.min_feats..=hints.max_feats).contains(&(len / pred))
    });
    if let Some(pred) = found {
        return Ok((pred, len / pred));
    }

    if hints.fallback_feats > 0 && len % hints.fallback_feats == 0 {
        return Ok((len / hints.fallback_feats, hints.fallback_feats));
    }

    Err(DetectError::UnsupportedOutputShape { len })
}

/// Resolves counts and layout of `data` for a model with a square `input_size` input.
///
/// Each layout is scored by how many sampled predictions have finite box values no larger
/// than twice the input size. Equal scores fall back to how many samples have all class
/// scores inside `[0, 1]`, and a remaining tie picks [`Layout::PredFirst`].
pub fn resolve_layout(data: &[f32], input_size: u32, hints: &LayoutHints) -> Result<OutputLayout, DetectError> {
    let (pred_count, feat_count) = resolve_counts(data.len(), hints)?;
    let samples = pred_count.min(hints.max_samples);
    let box_limit = (input_size as f32 * 2.).max(2.);

    let pred_first = OutputLayout::new(pred_count, feat_count, Layout::PredFirst);
    let feat_first = OutputLayout::new(pred_count, feat_count, Layout::FeatFirst);

    let box_score = |layout: &OutputLayout| {
        (0..samples)
            .filter(|&p| plausible_box(data, layout, p, box_limit))
            .count()
    };
    let (a, b) = (box_score(&pred_first), box_score(&feat_first));

    let chosen = if a != b {
        if a > b { pred_first } else { feat_first }
    } else {
        let class_score = |layout: &OutputLayout| {
            (0..samples)
                .filter(|&p| plausible_scores(data, layout, p))
                .count()
        };
        if class_score(&feat_first) > class_score(&pred_first) {
            feat_first
        } else {
            pred_first
        }
    };

    log::trace!("Resolved output of {} values as {:?} (box plausibility {a} vs {b})", data.len(), chosen);
    Ok(chosen)
}

fn plausible_box(data: &[f32], layout: &OutputLayout, pred: usize, limit: f32) -> bool {
    let mut max = f32::MIN;
    for feat in 0..4 {
        let v = data[layout.index(pred, feat)];
        if !v.is_finite() {
            return false;
        }
        max = max.max(v);
    }
    max <= limit
}

fn plausible_scores(data: &[f32], layout: &OutputLayout, pred: usize) -> bool {
    (4..layout.feat_count)
        .map(|feat| data[layout.index(pred, feat)])
        .all(|v| v.is_finite() && (0.0..=1.0).contains(&v))
}
