//! The full per-image post-processing chain.
//!
//! Decoding, per-category suppression, duplicate collapse, and rescaling run
//! in sequence over one image's predictions. Images are independent, so
//! batches parallelize across images with the `rayon` feature; the numeric
//! core itself stays single-threaded and pure.

use crate::boxes::{sort_boxes_desc, BoxCandidate, Detection, OverlapMetric};
use crate::candidate::collapse::dedup_by_top_edge;
use crate::candidate::nms::nms_boxes;
use crate::decode::decode_boxes;
use crate::grid::PredictionGrid;
use crate::rescale::to_image_space;
use crate::trace::{trace_event, trace_span};
use crate::util::{CenterBoxError, CenterBoxResult};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Post-processing parameters for one detector head.
///
/// The grid resolution is explicit configuration rather than a crate
/// constant, so the pipeline can run at small synthetic sizes in tests as
/// well as the production 128x128 head.
#[derive(Clone, Copy, Debug)]
pub struct PipelineConfig {
    /// Expected grid width of incoming predictions.
    pub grid_width: usize,
    /// Expected grid height of incoming predictions.
    pub grid_height: usize,
    /// Minimum objectness score for a cell to produce a candidate.
    pub score_threshold: f32,
    /// Overlap ratio at or above which a candidate is suppressed.
    pub iou_threshold: f32,
    /// Overlap ratio definition used during suppression.
    pub overlap: OverlapMetric,
    /// Tolerance of the duplicate top-edge collapse, in grid units.
    pub collapse_epsilon: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            grid_width: 128,
            grid_height: 128,
            score_threshold: 0.3,
            iou_threshold: 0.4,
            overlap: OverlapMetric::default(),
            collapse_epsilon: 1e-6,
        }
    }
}

/// Per-image input for batch processing.
#[derive(Clone, Copy)]
pub struct ImageInput<'a> {
    /// The image's raw predictions.
    pub grid: PredictionGrid<'a>,
    /// Target image size as (width, height) pixels.
    pub image_size: (usize, usize),
    /// Identifier carried onto every detection of this image.
    pub image_id: &'a str,
}

/// Runs the decode, suppress, rescale chain with a fixed configuration.
pub struct Pipeline {
    cfg: PipelineConfig,
}

impl Pipeline {
    /// Creates a pipeline with default parameters.
    pub fn new() -> Self {
        Self {
            cfg: PipelineConfig::default(),
        }
    }

    /// Creates a pipeline with the given parameters.
    pub fn with_config(cfg: PipelineConfig) -> Self {
        Self { cfg }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    /// Processes one image's predictions into image-space detections.
    ///
    /// Fails fast when the grid's spatial shape does not match the
    /// configured resolution or a threshold is out of range. An empty
    /// detection list is a normal result. `image_size` is (width, height)
    /// in pixels.
    pub fn process_image(
        &self,
        grid: &PredictionGrid<'_>,
        image_size: (usize, usize),
        image_id: &str,
    ) -> CenterBoxResult<Vec<Detection>> {
        let cfg = &self.cfg;
        if grid.width() != cfg.grid_width || grid.height() != cfg.grid_height {
            return Err(CenterBoxError::GridSizeMismatch {
                expected_width: cfg.grid_width,
                expected_height: cfg.grid_height,
                width: grid.width(),
                height: grid.height(),
            });
        }
        if !(0.0..=1.0).contains(&cfg.iou_threshold) {
            return Err(CenterBoxError::InvalidThreshold {
                name: "iou",
                value: cfg.iou_threshold,
            });
        }

        let _span = trace_span!("process_image", categories = grid.categories()).entered();

        let candidates = decode_boxes(grid, cfg.score_threshold)?;
        let survivors = self.suppress(candidates);
        trace_event!("kept_boxes", count = survivors.len());

        to_image_space(
            &survivors,
            (cfg.grid_width, cfg.grid_height),
            image_size,
            image_id,
        )
    }

    /// Suppresses candidates independently per category, then merges the
    /// survivors, re-sorts globally by score, and collapses duplicate top
    /// edges.
    fn suppress(&self, candidates: Vec<BoxCandidate>) -> Vec<BoxCandidate> {
        if candidates.is_empty() {
            return candidates;
        }

        let last_category = candidates.iter().map(|b| b.category).max().unwrap_or(0);
        let mut merged = Vec::new();
        for category in 0..=last_category {
            let mut group: Vec<BoxCandidate> = candidates
                .iter()
                .copied()
                .filter(|b| b.category == category)
                .collect();
            if group.is_empty() {
                continue;
            }
            merged.extend(nms_boxes(
                &mut group,
                self.cfg.iou_threshold,
                self.cfg.overlap,
            ));
        }

        sort_boxes_desc(&mut merged);
        dedup_by_top_edge(&merged, self.cfg.collapse_epsilon)
    }

    /// Processes a batch of independent images sequentially.
    ///
    /// Returns one result per input so a caller can skip a failing image
    /// and keep the rest.
    pub fn process_batch(
        &self,
        inputs: &[ImageInput<'_>],
    ) -> Vec<CenterBoxResult<Vec<Detection>>> {
        inputs
            .iter()
            .map(|input| self.process_image(&input.grid, input.image_size, input.image_id))
            .collect()
    }

    /// Processes a batch of independent images in parallel.
    ///
    /// Result-identical to [`Self::process_batch`]; only the scheduling
    /// differs.
    #[cfg(feature = "rayon")]
    pub fn process_batch_par(
        &self,
        inputs: &[ImageInput<'_>],
    ) -> Vec<CenterBoxResult<Vec<Detection>>> {
        inputs
            .par_iter()
            .map(|input| self.process_image(&input.grid, input.image_size, input.image_id))
            .collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
