//! Duplicate-origin collapse for suppressed boxes.
//!
//! The decoder can emit distinct boxes from neighboring cells whose top
//! edges quantize to the same value; within such a group only the
//! best-scored box is a real detection.

use crate::boxes::BoxCandidate;

/// Keeps the first box of every group whose top edges agree within
/// `epsilon`.
///
/// Input order is preserved. Callers pass boxes already sorted by
/// descending score, so the retained occurrence is the best-scored one.
pub fn dedup_by_top_edge(boxes: &[BoxCandidate], epsilon: f32) -> Vec<BoxCandidate> {
    let mut kept: Vec<BoxCandidate> = Vec::new();

    'outer: for candidate in boxes.iter().copied() {
        for kept_box in kept.iter() {
            if (kept_box.y_min - candidate.y_min).abs() <= epsilon {
                continue 'outer;
            }
        }
        kept.push(candidate);
    }

    kept
}
