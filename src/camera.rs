//! Coordinate mapping between device pixels and board space.
//!
//! The rendering surface owns the board-to-device matrix; it can change
//! between any two pointer events (resize, zoom), so it is read fresh on every
//! conversion and never cached here.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use kurbo::{Affine, Point, Size, Vec2};

use crate::consts::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::surface::RenderSurface;

/// Convert a device-space point to board space using the surface's current transform.
///
/// Returns the origin when the surface is not mounted yet.
#[must_use]
pub fn to_board_space<S: RenderSurface + ?Sized>(surface: &S, device: Point) -> Point {
    map_device_point(surface.screen_transform(), device)
}

/// Invert `board_to_device` and apply it to `device`.
///
/// Falls back to the origin when there is no transform or it is singular.
#[must_use]
pub fn map_device_point(board_to_device: Option<Affine>, device: Point) -> Point {
    let Some(transform) = board_to_device else {
        return Point::ORIGIN;
    };
    let det = transform.determinant();
    if !det.is_finite() || det.abs() < f64::EPSILON {
        return Point::ORIGIN;
    }
    transform.inverse() * device
}

/// Pan/zoom state a host surface can use to place the board in its viewport.
///
/// `pan_x` / `pan_y` are in device pixels.
/// `zoom` is device pixels per board unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Largest zoom that fits the whole board in `viewport`, centered.
    ///
    /// An empty viewport yields the identity camera.
    #[must_use]
    pub fn fit_board(viewport: Size) -> Self {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return Self::default();
        }
        let zoom = (viewport.width / BOARD_WIDTH).min(viewport.height / BOARD_HEIGHT);
        Self {
            pan_x: (viewport.width - BOARD_WIDTH * zoom) / 2.0,
            pan_y: (viewport.height - BOARD_HEIGHT * zoom) / 2.0,
            zoom,
        }
    }

    /// Board-to-device matrix for this camera.
    #[must_use]
    pub fn board_to_device(&self) -> Affine {
        Affine::translate(Vec2::new(self.pan_x, self.pan_y)) * Affine::scale(self.zoom)
    }

    /// Convert a device-space point to board space.
    #[must_use]
    pub fn device_to_board(&self, device: Point) -> Point {
        map_device_point(Some(self.board_to_device()), device)
    }

    /// Convert a board-space point to device space.
    #[must_use]
    pub fn board_to_device_point(&self, board: Point) -> Point {
        self.board_to_device() * board
    }
}
