//! Box records and overlap geometry.
//!
//! Candidates are structured records from the moment they leave the decoder;
//! all downstream passes operate on whole boxes rather than parallel
//! coordinate arrays. Grid-space candidates become image-space detections
//! only through [`crate::rescale::to_image_space`].

use std::cmp::Ordering;

/// Axis-aligned box as explicit corner coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corners {
    /// Smallest y coordinate.
    pub top: f32,
    /// Smallest x coordinate.
    pub left: f32,
    /// Largest y coordinate.
    pub bottom: f32,
    /// Largest x coordinate.
    pub right: f32,
}

impl Corners {
    /// Box area. Non-positive extents yield a non-positive area.
    pub fn area(&self) -> f32 {
        (self.bottom - self.top) * (self.right - self.left)
    }

    /// Axis-aligned intersection area with another box.
    pub fn intersection(&self, other: &Corners) -> f32 {
        let h = (self.bottom.min(other.bottom) - self.top.max(other.top)).max(0.0);
        let w = (self.right.min(other.right) - self.left.max(other.left)).max(0.0);
        h * w
    }

    /// Standard intersection-over-union with another box.
    ///
    /// Defined as zero when the union is empty, so degenerate boxes never
    /// divide by zero.
    pub fn iou(&self, other: &Corners) -> f32 {
        let cross = self.intersection(other);
        let union = self.area() + other.area() - cross;
        if union <= 0.0 {
            return 0.0;
        }
        cross / union
    }
}

/// Candidate detection in grid-cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxCandidate {
    /// Category channel the box was decoded from.
    pub category: usize,
    /// Objectness score in [0, 1].
    pub score: f32,
    /// Top edge.
    pub y_min: f32,
    /// Left edge.
    pub x_min: f32,
    /// Bottom edge.
    pub y_max: f32,
    /// Right edge.
    pub x_max: f32,
    /// Anchor cell (row, col) the box was decoded from.
    pub cell: (usize, usize),
}

impl BoxCandidate {
    /// Returns the box as explicit corners.
    pub fn corners(&self) -> Corners {
        Corners {
            top: self.y_min,
            left: self.x_min,
            bottom: self.y_max,
            right: self.x_max,
        }
    }

    /// Box area in grid units.
    pub fn area(&self) -> f32 {
        self.corners().area()
    }
}

fn box_cmp_desc(a: &BoxCandidate, b: &BoxCandidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.cell.0.cmp(&b.cell.0))
        .then_with(|| a.cell.1.cmp(&b.cell.1))
        .then_with(|| a.category.cmp(&b.category))
}

/// Sorts boxes by descending score with deterministic tie-breaking.
///
/// Ties fall back to the decoder's row-major anchor order, so equal-scored
/// boxes keep the order in which they were produced.
pub(crate) fn sort_boxes_desc(boxes: &mut [BoxCandidate]) {
    boxes.sort_by(box_cmp_desc);
}

/// Overlap ratio used by the suppression loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverlapMetric {
    /// Intersection normalized by the kept (higher-scored) box's area.
    ///
    /// Removes any candidate that covers most of a confident detection,
    /// regardless of the candidate's own size. This matches the behavior of
    /// the detector this crate was built against.
    #[default]
    KeptFraction,
    /// Standard intersection-over-union. Stricter than [`Self::KeptFraction`]
    /// when the boxes differ greatly in area.
    Union,
}

impl OverlapMetric {
    /// Computes the overlap of `other` against a kept box.
    ///
    /// A kept box with zero or negative area overlaps nothing; the ratio is
    /// defined as zero instead of dividing by zero.
    pub fn overlap(self, kept: &BoxCandidate, other: &BoxCandidate) -> f32 {
        match self {
            OverlapMetric::KeptFraction => {
                let area = kept.area();
                if area <= 0.0 {
                    return 0.0;
                }
                kept.corners().intersection(&other.corners()) / area
            }
            OverlapMetric::Union => kept.corners().iou(&other.corners()),
        }
    }
}

/// Detection in image-pixel coordinates, tagged with its source image.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    /// Identifier of the image the box belongs to.
    pub image_id: String,
    /// Category channel the box was decoded from.
    pub category: usize,
    /// Objectness score in [0, 1].
    pub score: f32,
    /// Top edge in pixels.
    pub y_min: f32,
    /// Left edge in pixels.
    pub x_min: f32,
    /// Bottom edge in pixels.
    pub y_max: f32,
    /// Right edge in pixels.
    pub x_max: f32,
}

impl Detection {
    /// Returns the box as explicit corners.
    pub fn corners(&self) -> Corners {
        Corners {
            top: self.y_min,
            left: self.x_min,
            bottom: self.y_max,
            right: self.x_max,
        }
    }

    /// Corner coordinates rounded to the nearest integer pixel, in
    /// (top, left, bottom, right) order.
    ///
    /// Rounding belongs at the point of external consumption; the numeric
    /// pipeline itself keeps full precision.
    pub fn rounded_corners(&self) -> (i64, i64, i64, i64) {
        (
            round_half_up(self.y_min),
            round_half_up(self.x_min),
            round_half_up(self.y_max),
            round_half_up(self.x_max),
        )
    }
}

/// Rounds half-way values up: 2.5 -> 3, 2.49 -> 2.
fn round_half_up(v: f32) -> i64 {
    (v + 0.5).floor() as i64
}
