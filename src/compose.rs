//! Scene composition: one back-to-front draw list for the rendering surface.
//!
//! Index 0 of the output is drawn first and is visually furthest back. Layers
//! are unique by construction; the sort is still stable over creation order so
//! a scene that somehow carries duplicate layers composes deterministically.

#[cfg(test)]
#[path = "compose_test.rs"]
mod compose_test;

use kurbo::{Point, Rect, RoundedRect};

use crate::consts::{BOARD_CORNER_RADIUS, BOARD_HEIGHT, BOARD_WIDTH};
use crate::doc::{ElementId, ElementKind, ImageProps, Scene, TextProps};
use crate::transform::{ImagePlacement, image_placement, text_bounds};

/// The image element resolved for drawing.
#[derive(Debug, Clone, Copy)]
pub struct ImageDraw<'a> {
    pub id: ElementId,
    pub layer: i64,
    pub props: &'a ImageProps,
    pub placement: ImagePlacement,
}

/// A text element resolved for drawing.
#[derive(Debug, Clone, Copy)]
pub struct TextDraw<'a> {
    pub id: ElementId,
    pub layer: i64,
    pub center: Point,
    pub props: &'a TextProps,
    /// Estimated extent, see [`text_bounds`].
    pub bounds: Rect,
}

/// One entry of the draw list.
#[derive(Debug, Clone, Copy)]
pub enum Drawable<'a> {
    Image(ImageDraw<'a>),
    Text(TextDraw<'a>),
}

impl Drawable<'_> {
    #[must_use]
    pub fn id(&self) -> ElementId {
        match self {
            Self::Image(d) => d.id,
            Self::Text(d) => d.id,
        }
    }

    #[must_use]
    pub fn layer(&self) -> i64 {
        match self {
            Self::Image(d) => d.layer,
            Self::Text(d) => d.layer,
        }
    }

    /// Whether the board-space point lands on this drawable.
    #[must_use]
    pub fn contains(&self, board: Point) -> bool {
        match self {
            Self::Image(d) => d.placement.contains(board),
            Self::Text(d) => d.bounds.contains(board),
        }
    }
}

/// Board background: the rounded outline, filled and used as the fill's clip.
///
/// Only the fill is clipped. Elements may extend past the outline.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardBackground<'a> {
    pub outline: RoundedRect,
    pub fill: &'a str,
}

/// Everything the surface needs to draw one frame.
#[derive(Debug, Clone)]
pub struct ComposedScene<'a> {
    pub background: BoardBackground<'a>,
    /// Back to front.
    pub items: Vec<Drawable<'a>>,
    pub show_guides: bool,
}

/// Rounded-rectangle board outline in board space.
#[must_use]
pub fn board_outline() -> RoundedRect {
    RoundedRect::new(0.0, 0.0, BOARD_WIDTH, BOARD_HEIGHT, BOARD_CORNER_RADIUS)
}

/// Build the back-to-front draw list for every element in `scene`.
#[must_use]
pub fn compose(scene: &Scene) -> Vec<Drawable<'_>> {
    let mut items: Vec<Drawable<'_>> = scene
        .elements()
        .iter()
        .map(|element| match &element.kind {
            ElementKind::Image(props) => Drawable::Image(ImageDraw {
                id: element.id,
                layer: element.layer(),
                props,
                placement: image_placement(element.center, props),
            }),
            ElementKind::Text(props) => Drawable::Text(TextDraw {
                id: element.id,
                layer: element.layer(),
                center: element.center,
                props,
                bounds: text_bounds(element.center, props),
            }),
        })
        .collect();
    items.sort_by_key(Drawable::layer);
    items
}

/// Compose the full frame: background, draw list and overlay flag.
#[must_use]
pub fn compose_frame(scene: &Scene) -> ComposedScene<'_> {
    ComposedScene {
        background: BoardBackground { outline: board_outline(), fill: &scene.settings.background },
        items: compose(scene),
        show_guides: scene.settings.show_guides,
    }
}
