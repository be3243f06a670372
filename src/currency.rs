//! Banknote denominations from currency detections.

use crate::common::Detection;
use crate::data::LabelTable;

/// Value printed on a note, read from the digits of its label: `"500 Rupees"` is 500.
pub fn denomination(label: &str) -> Option<u64> {
    let digits: String = label.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Sum of every recognised note. Detections without a usable label count as zero.
pub fn total_amount(detections: &[Detection], labels: &LabelTable) -> u64 {
    detections
        .iter()
        .filter_map(|d| match &d.label {
            Some(label) => denomination(label),
            None => labels.get(d.class_id).and_then(denomination),
        })
        .sum()
}
