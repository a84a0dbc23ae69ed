//! Heat-map decoding into candidate boxes.
//!
//! Each grid cell predicts at most one detection center per category: the
//! category score gates emission, the shared offset channels recover the
//! sub-cell center, and the size channels give the extent in grid units.

use crate::boxes::BoxCandidate;
use crate::grid::PredictionGrid;
use crate::trace::{trace_event, trace_span};
use crate::util::{CenterBoxError, CenterBoxResult};

/// Decodes every category channel of `grid` into candidate boxes.
///
/// Cells with `score > score_threshold` produce a candidate centered at the
/// cell's integer coordinates plus the predicted offset. Candidates with a
/// non-positive extent or touching the grid boundary are dropped, then area
/// outliers more than a factor of ten from the per-category mean area are
/// dropped. Candidates are emitted in row-major anchor order per category,
/// categories concatenated in index order.
///
/// An empty result means no detections, not a failure.
pub fn decode_boxes(
    grid: &PredictionGrid<'_>,
    score_threshold: f32,
) -> CenterBoxResult<Vec<BoxCandidate>> {
    if !(0.0..=1.0).contains(&score_threshold) {
        return Err(CenterBoxError::InvalidThreshold {
            name: "score",
            value: score_threshold,
        });
    }

    let _span = trace_span!(
        "decode_boxes",
        width = grid.width(),
        height = grid.height(),
        categories = grid.categories()
    )
    .entered();

    let mut out = Vec::new();
    for category in 0..grid.categories() {
        let survivors = decode_category(grid, category, score_threshold);
        out.extend(filter_area_outliers(survivors));
    }

    trace_event!("decoded_candidates", count = out.len());
    Ok(out)
}

fn decode_category(
    grid: &PredictionGrid<'_>,
    category: usize,
    score_threshold: f32,
) -> Vec<BoxCandidate> {
    let grid_w = grid.width() as f32;
    let grid_h = grid.height() as f32;

    let mut kept = Vec::new();
    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let score = grid.score(row, col, category);
            if score <= score_threshold {
                continue;
            }

            let width = grid.width_norm(row, col) * grid_w;
            let height = grid.height_norm(row, col) * grid_h;
            if width <= 0.0 || height <= 0.0 {
                continue;
            }

            let x_c = grid.x_offset(row, col) + col as f32;
            let y_c = grid.y_offset(row, col) + row as f32;

            let x_min = x_c - width / 2.0;
            let y_min = y_c - height / 2.0;
            let x_max = x_c + width / 2.0;
            let y_max = y_c + height / 2.0;

            // Boxes reaching the grid boundary, even partially, are dropped.
            if !(y_min > 0.0 && x_min > 0.0 && y_max < grid_h && x_max < grid_w) {
                continue;
            }

            kept.push(BoxCandidate {
                category,
                score,
                y_min,
                x_min,
                y_max,
                x_max,
                cell: (row, col),
            });
        }
    }
    kept
}

/// Drops boxes whose area lies outside (mean / 10, mean * 10).
///
/// The window is relative to the surviving set's own mean, so it rejects
/// runaway regressions without a fixed absolute threshold that would need
/// retuning per dataset.
fn filter_area_outliers(boxes: Vec<BoxCandidate>) -> Vec<BoxCandidate> {
    if boxes.is_empty() {
        return boxes;
    }

    let mean = boxes.iter().map(BoxCandidate::area).sum::<f32>() / boxes.len() as f32;
    let lo = mean / 10.0;
    let hi = mean * 10.0;
    boxes
        .into_iter()
        .filter(|b| {
            let area = b.area();
            area > lo && area < hi
        })
        .collect()
}
