//! Nearest-neighbour matching of face embeddings against a registered gallery.

use serde::{Deserialize, Serialize};

/// Distance under which two embeddings are taken to be the same person.
pub const DEFAULT_MAX_DISTANCE: f32 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceEntry {
    pub id: String,
    pub name: String,
    pub embedding: Vec<f32>,
}

/// Euclidean distance over the shared prefix of `a` and `b`.
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Closest gallery entry strictly nearer than `max_distance`, with its distance.
///
/// Entries whose embedding length differs from the query are skipped.
pub fn nearest_face<'a>(
    embedding: &[f32],
    gallery: &'a [FaceEntry],
    max_distance: f32,
) -> Option<(&'a FaceEntry, f32)> {
    gallery
        .iter()
        .filter(|entry| entry.embedding.len() == embedding.len())
        .map(|entry| (entry, l2_distance(embedding, &entry.embedding)))
        .filter(|(_, d)| d.is_finite() && *d < max_distance)
        .fold(None, |best: Option<(&FaceEntry, f32)>, cur| match best {
            Some(b) if b.1 <= cur.1 => Some(b),
            _ => Some(cur),
        })
}
