//! Rendering-surface boundary.
//!
//! Vector rendering, image decode and raster encode live in the host. The
//! core only needs four things from it: the current board-to-device matrix,
//! a way to submit a composed frame, a signal that the submitted frame has
//! actually been drawn, and a raster read-back.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use kurbo::Affine;

use crate::compose::ComposedScene;
use crate::consts::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::error::ErrorCode;

/// Encoding of a captured raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterFormat {
    #[default]
    Png,
}

impl RasterFormat {
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
        }
    }
}

/// Pixel size and encoding for one capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRequest {
    pub width_px: u32,
    pub height_px: u32,
    pub format: RasterFormat,
}

impl CaptureRequest {
    /// Capture the whole board at `pixel_ratio` output pixels per board unit.
    ///
    /// Ratios below one output pixel per unit are raised to one.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn for_pixel_ratio(pixel_ratio: f64) -> Self {
        let ratio = if pixel_ratio.is_finite() { pixel_ratio.max(1.0) } else { 1.0 };
        Self {
            width_px: (BOARD_WIDTH * ratio).round() as u32,
            height_px: (BOARD_HEIGHT * ratio).round() as u32,
            format: RasterFormat::Png,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("rendering surface is not mounted")]
    NotMounted,
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("raster encode failed: {0}")]
    Encode(String),
    #[error("surface returned an empty raster")]
    Empty,
}

impl ErrorCode for CaptureError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotMounted => "E_SURFACE_NOT_MOUNTED",
            Self::Decode(_) => "E_IMAGE_DECODE",
            Self::Encode(_) => "E_RASTER_ENCODE",
            Self::Empty => "E_EMPTY_RASTER",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::NotMounted)
    }
}

/// Host drawing target. Enables swapping the real surface for a mock in tests.
#[async_trait::async_trait]
pub trait RenderSurface: Send {
    /// Current board-to-device matrix, or `None` before the surface is mounted.
    fn screen_transform(&self) -> Option<Affine>;

    /// Submit a frame. Drawing may complete asynchronously.
    fn render(&mut self, frame: &ComposedScene<'_>);

    /// Resolves once the most recently submitted frame is on the surface.
    async fn frame_rendered(&mut self);

    /// Read the surface back as an encoded raster.
    ///
    /// # Errors
    ///
    /// Returns a [`CaptureError`] if the surface can't decode its sources or
    /// encode the output.
    async fn capture(&mut self, request: CaptureRequest) -> Result<Vec<u8>, CaptureError>;
}
