//! Convenience helpers for measuring images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. The rescale target is
//! read from the image file itself rather than trusted from annotation
//! metadata.

use crate::util::{CenterBoxError, CenterBoxResult};
use std::path::Path;

/// Reads the pixel dimensions of an image file as (width, height).
///
/// Only the image header is decoded.
pub fn image_size<P: AsRef<Path>>(path: P) -> CenterBoxResult<(usize, usize)> {
    let (width, height) =
        image::image_dimensions(path).map_err(|err| CenterBoxError::ImageIo {
            reason: err.to_string(),
        })?;
    Ok((width as usize, height as usize))
}
