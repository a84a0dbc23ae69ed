//! Grid-space to image-space coordinate mapping.

use crate::boxes::{BoxCandidate, Detection};
use crate::util::{CenterBoxError, CenterBoxResult};

/// Maps suppressed boxes from grid coordinates to image-pixel coordinates
/// and tags them with their source image.
///
/// Vertical fields scale by `image_h / grid_h`, horizontal fields by
/// `image_w / grid_w`; scores, categories, and ordering are untouched. Both
/// sizes are (width, height) pairs. Equal grid and image sizes leave the
/// coordinates unchanged up to f32 rounding. No suppression or filtering
/// happens here.
pub fn to_image_space(
    boxes: &[BoxCandidate],
    grid_size: (usize, usize),
    image_size: (usize, usize),
    image_id: &str,
) -> CenterBoxResult<Vec<Detection>> {
    let (grid_w, grid_h) = grid_size;
    let (image_w, image_h) = image_size;
    if grid_w == 0 || grid_h == 0 {
        return Err(CenterBoxError::InvalidDimensions {
            width: grid_w,
            height: grid_h,
        });
    }
    if image_w == 0 || image_h == 0 {
        return Err(CenterBoxError::InvalidDimensions {
            width: image_w,
            height: image_h,
        });
    }

    let scale_x = image_w as f32 / grid_w as f32;
    let scale_y = image_h as f32 / grid_h as f32;

    Ok(boxes
        .iter()
        .map(|b| Detection {
            image_id: image_id.to_owned(),
            category: b.category,
            score: b.score,
            y_min: b.y_min * scale_y,
            x_min: b.x_min * scale_x,
            y_max: b.y_max * scale_y,
            x_max: b.x_max * scale_x,
        })
        .collect())
}
