//! Greedy non-maximum suppression over candidate boxes.

use crate::boxes::{sort_boxes_desc, BoxCandidate, OverlapMetric};

/// Applies greedy NMS, keeping the best-scored box of every overlapping
/// group.
///
/// Boxes are sorted by descending score (ties broken by decode order) and
/// kept if their overlap with every previously kept box, as computed by
/// `metric`, stays below `iou_threshold`. The result keeps the descending
/// score order.
pub fn nms_boxes(
    boxes: &mut [BoxCandidate],
    iou_threshold: f32,
    metric: OverlapMetric,
) -> Vec<BoxCandidate> {
    sort_boxes_desc(boxes);
    let mut kept: Vec<BoxCandidate> = Vec::new();

    'outer: for candidate in boxes.iter().copied() {
        for kept_box in kept.iter() {
            if metric.overlap(kept_box, &candidate) >= iou_threshold {
                continue 'outer;
            }
        }
        kept.push(candidate);
    }

    kept
}
