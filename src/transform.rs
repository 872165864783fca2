//! Center-anchored draw transforms for image elements.
//!
//! An image stores its visual center plus scale, rotation and flip. The draw
//! box is the scaled base size placed so its center lands on that point;
//! rotation and flip pivot on the box's own center. Changing scale or
//! rotation therefore never moves the image's center on the board.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use std::f64::consts::PI;

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::consts::{TEXT_ADVANCE_RATIO, TEXT_LINE_HEIGHT};
use crate::doc::{ImageProps, TextProps};

/// Resolved placement of an image in board space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    /// Unscaled image size; the local space `transform` maps from.
    pub base_size: Size,
    /// Scaled box size.
    pub size: Size,
    /// Top-left of the scaled box before rotation: `center - size / 2`.
    pub top_left: Point,
    /// Clockwise rotation in degrees about the box center.
    pub rotation: f64,
    pub flip_x: bool,
    /// Maps image-local pixels (`0..W`, `0..H`) into board space.
    pub transform: Affine,
}

/// Compute the placement for an image centered at `center`.
#[must_use]
pub fn image_placement(center: Point, props: &ImageProps) -> ImagePlacement {
    let size = Size::new(props.base_size.width * props.scale, props.base_size.height * props.scale);
    let top_left = Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0);
    let pivot = Vec2::new(size.width / 2.0, size.height / 2.0);

    let mut local = Affine::rotate(props.rotation.to_radians());
    if props.flip_x {
        // Y-mirror plus a half turn is a horizontal mirror.
        local = local * Affine::rotate(PI) * Affine::scale_non_uniform(1.0, -1.0);
    }

    let transform = Affine::translate(top_left.to_vec2())
        * Affine::translate(pivot)
        * local
        * Affine::translate(-pivot)
        * Affine::scale(props.scale);

    ImagePlacement { base_size: props.base_size, size, top_left, rotation: props.rotation, flip_x: props.flip_x, transform }
}

impl ImagePlacement {
    fn local_rect(&self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, self.base_size)
    }

    /// Center of the transformed box in board space.
    #[must_use]
    pub fn center(&self) -> Point {
        self.transform * self.local_rect().center()
    }

    /// Axis-aligned bounding box of the transformed image.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.transform.transform_rect_bbox(self.local_rect())
    }

    /// Board-space corners, clockwise from the image's own top-left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        let r = self.local_rect();
        [
            self.transform * Point::new(r.x0, r.y0),
            self.transform * Point::new(r.x1, r.y0),
            self.transform * Point::new(r.x1, r.y1),
            self.transform * Point::new(r.x0, r.y1),
        ]
    }

    /// Whether a board-space point falls inside the transformed image.
    #[must_use]
    pub fn contains(&self, board: Point) -> bool {
        let det = self.transform.determinant();
        if !det.is_finite() || det.abs() < f64::EPSILON {
            return false;
        }
        let local = self.transform.inverse() * board;
        let r = self.local_rect();
        local.x >= r.x0 && local.x <= r.x1 && local.y >= r.y0 && local.y <= r.y1
    }
}

/// Estimated board-space box of a text element centered at `center`.
///
/// Glyph metrics belong to the rendering surface; this uses a fixed advance
/// per character and a fixed line height, which is close enough for picking.
#[must_use]
pub fn text_bounds(center: Point, props: &TextProps) -> Rect {
    let lines = props.content.lines().count().max(1);
    let longest = props.content.lines().map(|l| l.chars().count()).max().unwrap_or(0).max(1);

    #[allow(clippy::cast_precision_loss)]
    let size = Size::new(
        longest as f64 * props.font_size * TEXT_ADVANCE_RATIO,
        lines as f64 * props.font_size * TEXT_LINE_HEIGHT,
    );
    Rect::from_center_size(center, size)
}
