//! Prediction grid views.
//!
//! `PredictionGrid` is a borrowed (height, width, channels) view into a flat
//! row-major `f32` buffer produced by the network head. The channel layout
//! is `n_cat` per-category scores followed by four regression channels
//! shared across categories: x-offset, y-offset, normalized width,
//! normalized height. In the observed single-class layout (C = 5) that is
//! 0 = score, 1 = x-offset, 2 = y-offset, 3 = width, 4 = height.

use crate::util::{CenterBoxError, CenterBoxResult};

/// Number of shared regression channels following the category scores.
pub const REGRESSION_CHANNELS: usize = 4;

/// Borrowed view over one image's raw predictions.
#[derive(Copy, Clone)]
pub struct PredictionGrid<'a> {
    data: &'a [f32],
    width: usize,
    height: usize,
    channels: usize,
}

impl<'a> PredictionGrid<'a> {
    /// Creates a view over a contiguous row-major (H, W, C) buffer.
    ///
    /// Fails fast when a spatial dimension is zero, when `channels` cannot
    /// hold at least one category plus the regression block, or when the
    /// buffer is shorter than the declared shape requires. The buffer is
    /// never truncated or padded.
    pub fn from_slice(
        data: &'a [f32],
        width: usize,
        height: usize,
        channels: usize,
    ) -> CenterBoxResult<Self> {
        if width == 0 || height == 0 {
            return Err(CenterBoxError::InvalidDimensions { width, height });
        }
        if channels <= REGRESSION_CHANNELS {
            return Err(CenterBoxError::ChannelMismatch {
                needed: REGRESSION_CHANNELS + 1,
                got: channels,
            });
        }
        let needed = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(channels))
            .ok_or(CenterBoxError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(CenterBoxError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Returns the grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the total channel count.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns the number of category score channels.
    pub fn categories(&self) -> usize {
        self.channels - REGRESSION_CHANNELS
    }

    fn at(&self, row: usize, col: usize, channel: usize) -> f32 {
        debug_assert!(row < self.height && col < self.width && channel < self.channels);
        self.data[(row * self.width + col) * self.channels + channel]
    }

    /// Objectness score of `category` at cell (row, col).
    pub fn score(&self, row: usize, col: usize, category: usize) -> f32 {
        debug_assert!(category < self.categories());
        self.at(row, col, category)
    }

    /// Sub-cell x offset in [0, 1) at cell (row, col).
    pub fn x_offset(&self, row: usize, col: usize) -> f32 {
        self.at(row, col, self.categories())
    }

    /// Sub-cell y offset in [0, 1) at cell (row, col).
    pub fn y_offset(&self, row: usize, col: usize) -> f32 {
        self.at(row, col, self.categories() + 1)
    }

    /// Box width at cell (row, col), normalized by the grid width.
    pub fn width_norm(&self, row: usize, col: usize) -> f32 {
        self.at(row, col, self.categories() + 2)
    }

    /// Box height at cell (row, col), normalized by the grid height.
    pub fn height_norm(&self, row: usize, col: usize) -> f32 {
        self.at(row, col, self.categories() + 3)
    }
}
