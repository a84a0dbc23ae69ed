//! Diagnostic overlap scoring against ground-truth annotations.
//!
//! Evaluation-only tooling: the main pipeline does not depend on this
//! module. The overlap routine is the same true-IoU geometry backing
//! [`OverlapMetric::Union`](crate::boxes::OverlapMetric), so diagnostic
//! numbers stay comparable with union-based suppression.

use crate::boxes::{Corners, Detection};

/// Ground-truth annotation in center/size form, as read from a dataset.
///
/// Never mutated by the pipeline; converted to corners only for comparison.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundTruthBox {
    /// Annotated category.
    pub category: usize,
    /// Box center, x coordinate.
    pub center_x: f32,
    /// Box center, y coordinate.
    pub center_y: f32,
    /// Box width.
    pub width: f32,
    /// Box height.
    pub height: f32,
}

impl GroundTruthBox {
    /// Converts the center/size form to corner coordinates.
    pub fn to_corners(&self) -> Corners {
        let top = self.center_y - self.height / 2.0;
        let left = self.center_x - self.width / 2.0;
        Corners {
            top,
            left,
            bottom: top + self.height,
            right: left + self.width,
        }
    }
}

/// Dice-like aggregate overlap score for one image, in [0, 1].
///
/// Each detection contributes its best true IoU against the ground-truth
/// set; the sum is normalized by the total box count on both sides:
/// `2 * sum(max_iou) / (n_detected + n_truth)`. Two empty lists score 1.0
/// (vacuous agreement); exactly one empty side scores 0.0. This is an
/// overlap diagnostic, not mean average precision.
pub fn overlap_score(truths: &[GroundTruthBox], detections: &[Detection]) -> f32 {
    if truths.is_empty() && detections.is_empty() {
        return 1.0;
    }
    if truths.is_empty() || detections.is_empty() {
        return 0.0;
    }

    let truth_corners: Vec<Corners> = truths.iter().map(GroundTruthBox::to_corners).collect();
    let sum: f32 = detections
        .iter()
        .map(|detection| {
            let corners = detection.corners();
            truth_corners
                .iter()
                .map(|truth| corners.iou(truth))
                .fold(0.0f32, f32::max)
        })
        .sum();

    2.0 * sum / (detections.len() + truths.len()) as f32
}
