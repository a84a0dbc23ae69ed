//! CenterBox is the post-processing stage of a keypoint-based (CenterNet
//! style) object detector.
//!
//! The crate decodes a dense per-cell heat-map + size/offset prediction grid
//! into candidate boxes, prunes them with greedy non-maximum suppression,
//! and rescales the survivors to image-pixel coordinates. The numeric core
//! is pure and single-threaded; batches of images can be processed in
//! parallel via the `rayon` feature.

pub mod boxes;
mod candidate;
pub mod decode;
pub mod eval;
pub mod grid;
#[cfg(feature = "image-io")]
pub mod io;
pub mod pipeline;
pub mod rescale;
mod trace;
pub mod util;

pub use boxes::{BoxCandidate, Corners, Detection, OverlapMetric};
pub use candidate::collapse::dedup_by_top_edge;
pub use candidate::nms::nms_boxes;
pub use decode::decode_boxes;
pub use eval::{overlap_score, GroundTruthBox};
pub use grid::PredictionGrid;
pub use pipeline::{ImageInput, Pipeline, PipelineConfig};
pub use rescale::to_image_space;
pub use util::{CenterBoxError, CenterBoxResult};
