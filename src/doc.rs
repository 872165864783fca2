//! Document model: board elements, their attributes, and the scene that owns them.
//!
//! This module defines what is on the board (`Element`, `ElementKind`), a
//! sparse-update type for attribute edits (`ElementPatch`), the board-level
//! display settings (`BoardSettings`), and the `Scene` that owns every live
//! element in creation order.
//!
//! Positions are centers, never top-left corners. Layer values are assigned at
//! creation and afterwards changed only by [`crate::order`]; nothing in this
//! module renumbers them.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{
    BOARD_HEIGHT, BOARD_WIDTH, DEFAULT_BACKGROUND, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_TEXT_FILL,
    FONT_SIZE_MAX, FONT_SIZE_MIN, OPACITY_MAX, OPACITY_MIN, ROTATION_MAX_DEG, ROTATION_MIN_DEG, SCALE_MAX, SCALE_MIN,
    STROKE_WIDTH_MAX, STROKE_WIDTH_MIN,
};
use crate::order;

/// Unique identifier for a board element.
pub type ElementId = Uuid;

/// Where the pixels of an image element come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageSource {
    /// Stable reference returned by the object store.
    Remote { url: String },
    /// Local `data:` URL used when the upload failed.
    Embedded { data_url: String },
}

impl ImageSource {
    /// The string the rendering surface loads the image from.
    #[must_use]
    pub fn href(&self) -> &str {
        match self {
            Self::Remote { url } => url,
            Self::Embedded { data_url } => data_url,
        }
    }
}

/// Attributes specific to the image element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageProps {
    pub source: ImageSource,
    /// Decoded (unscaled) size in board units.
    pub base_size: Size,
    /// Uniform scale factor, `SCALE_MIN..=SCALE_MAX`.
    pub scale: f64,
    /// Clockwise rotation in degrees, `-180..=180`.
    pub rotation: f64,
    pub opacity: f64,
    /// Mirror horizontally about the center.
    pub flip_x: bool,
}

impl ImageProps {
    #[must_use]
    pub fn new(source: ImageSource, base_size: Size) -> Self {
        Self { source, base_size, scale: 1.0, rotation: 0.0, opacity: 1.0, flip_x: false }
    }
}

/// Attributes specific to a text box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextProps {
    pub content: String,
    pub font_family: String,
    /// Font size in board units, `FONT_SIZE_MIN..=FONT_SIZE_MAX`.
    pub font_size: f64,
    /// Fill color as a CSS color string.
    pub fill: String,
    /// Stroke width in board units, `STROKE_WIDTH_MIN..=STROKE_WIDTH_MAX`.
    pub stroke_width: f64,
    /// Stroke color; no outline is drawn when absent.
    pub stroke: Option<String>,
}

impl TextProps {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            fill: DEFAULT_TEXT_FILL.to_string(),
            stroke_width: 0.0,
            stroke: None,
        }
    }
}

/// The closed set of element variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementKind {
    Image(ImageProps),
    Text(TextProps),
}

/// A single element on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    /// Stacking order; lower values are drawn beneath higher values.
    pub(crate) layer: i64,
    /// Visual center in board space.
    pub center: Point,
    pub kind: ElementKind,
}

impl Element {
    #[must_use]
    pub fn layer(&self) -> i64 {
        self.layer
    }

    #[must_use]
    pub fn is_image(&self) -> bool {
        matches!(self.kind, ElementKind::Image(_))
    }

    #[must_use]
    pub fn as_image(&self) -> Option<&ImageProps> {
        match &self.kind {
            ElementKind::Image(props) => Some(props),
            ElementKind::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&TextProps> {
        match &self.kind {
            ElementKind::Text(props) => Some(props),
            ElementKind::Image(_) => None,
        }
    }
}

/// Sparse update for an element. Only present fields are applied; fields that
/// don't exist on the element's variant are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flip_x: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    /// `Some(None)` clears the stroke color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Option<String>>,
}

/// Board-level display settings shared by every element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSettings {
    /// Background fill as a CSS color string.
    pub background: String,
    /// Whether guide overlays are drawn on top of the board.
    pub show_guides: bool,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self { background: DEFAULT_BACKGROUND.to_string(), show_guides: true }
    }
}

/// Every live element plus the board settings.
///
/// Elements are kept in creation order; draw order comes from
/// [`crate::compose::compose`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub(crate) elements: Vec<Element>,
    pub settings: BoardSettings,
}

/// Center of the board; new elements are placed here.
#[must_use]
pub fn board_center() -> Point {
    Point::new(BOARD_WIDTH / 2.0, BOARD_HEIGHT / 2.0)
}

impl Scene {
    /// Create an empty scene with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text box at the board center above every existing element.
    pub fn add_text(&mut self, props: TextProps) -> ElementId {
        self.add_text_at(props, board_center())
    }

    /// Add a text box at `center` above every existing element.
    pub fn add_text_at(&mut self, mut props: TextProps, center: Point) -> ElementId {
        props.font_size = clamp_font_size(props.font_size);
        props.stroke_width = clamp_stroke_width(props.stroke_width);
        let id = Uuid::new_v4();
        let layer = order::next_layer(self);
        self.elements.push(Element { id, layer, center, kind: ElementKind::Text(props) });
        id
    }

    /// Set the board image.
    ///
    /// With no image present, a new one is created at the board center above
    /// every existing element. Otherwise the existing image's source and base
    /// size are replaced in place; its id, layer, center and transform
    /// attributes are kept.
    pub fn set_image(&mut self, source: ImageSource, base_size: Size) -> ElementId {
        if let Some(existing) = self.elements.iter_mut().find(|e| e.is_image()) {
            if let ElementKind::Image(props) = &mut existing.kind {
                props.source = source;
                props.base_size = base_size;
            }
            return existing.id;
        }

        let id = Uuid::new_v4();
        let layer = order::next_layer(self);
        let kind = ElementKind::Image(ImageProps::new(source, base_size));
        self.elements.push(Element { id, layer, center: board_center(), kind });
        id
    }

    /// Remove an element by id, returning it if it was present.
    ///
    /// Remaining layers are left untouched.
    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        let index = self.elements.iter().position(|e| &e.id == id)?;
        Some(self.elements.remove(index))
    }

    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| &e.id == id)
    }

    /// The image element, if one exists.
    #[must_use]
    pub fn image(&self) -> Option<&Element> {
        self.elements.iter().find(|e| e.is_image())
    }

    /// Text elements in creation order.
    pub fn texts(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| !e.is_image())
    }

    /// All elements in creation order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Shift an element's center by `delta`. Returns false if it doesn't exist.
    pub fn translate(&mut self, id: &ElementId, delta: Vec2) -> bool {
        let Some(element) = self.get_mut(id) else {
            return false;
        };
        element.center += delta;
        true
    }

    /// Apply a partial update to an existing element. Returns false if the element doesn't exist.
    ///
    /// Numeric values are clamped into their valid ranges; non-finite values are ignored.
    pub fn apply_patch(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        let Some(element) = self.get_mut(id) else {
            return false;
        };
        if let Some(x) = patch.center_x.filter(|v| v.is_finite()) {
            element.center.x = x;
        }
        if let Some(y) = patch.center_y.filter(|v| v.is_finite()) {
            element.center.y = y;
        }

        match &mut element.kind {
            ElementKind::Image(props) => {
                if let Some(s) = patch.scale.filter(|v| v.is_finite()) {
                    props.scale = clamp_scale(s);
                }
                if let Some(r) = patch.rotation.filter(|v| v.is_finite()) {
                    props.rotation = normalize_rotation(r);
                }
                if let Some(o) = patch.opacity.filter(|v| v.is_finite()) {
                    props.opacity = clamp_opacity(o);
                }
                if let Some(flip) = patch.flip_x {
                    props.flip_x = flip;
                }
            }
            ElementKind::Text(props) => {
                if let Some(ref content) = patch.content {
                    props.content.clone_from(content);
                }
                if let Some(ref family) = patch.font_family {
                    props.font_family.clone_from(family);
                }
                if let Some(size) = patch.font_size.filter(|v| v.is_finite()) {
                    props.font_size = clamp_font_size(size);
                }
                if let Some(ref fill) = patch.fill {
                    props.fill.clone_from(fill);
                }
                if let Some(w) = patch.stroke_width.filter(|v| v.is_finite()) {
                    props.stroke_width = clamp_stroke_width(w);
                }
                if let Some(ref stroke) = patch.stroke {
                    props.stroke.clone_from(stroke);
                }
            }
        }
        true
    }
}

// =============================================================
// Attribute bounds
// =============================================================

#[must_use]
pub fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(SCALE_MIN, SCALE_MAX)
}

#[must_use]
pub fn clamp_opacity(opacity: f64) -> f64 {
    opacity.clamp(OPACITY_MIN, OPACITY_MAX)
}

#[must_use]
pub fn clamp_font_size(size: f64) -> f64 {
    size.clamp(FONT_SIZE_MIN, FONT_SIZE_MAX)
}

#[must_use]
pub fn clamp_stroke_width(width: f64) -> f64 {
    width.clamp(STROKE_WIDTH_MIN, STROKE_WIDTH_MAX)
}

/// Wrap an angle in degrees into `-180..=180`. In-range values are returned unchanged.
#[must_use]
pub fn normalize_rotation(degrees: f64) -> f64 {
    if (ROTATION_MIN_DEG..=ROTATION_MAX_DEG).contains(&degrees) {
        return degrees;
    }
    (degrees + 180.0).rem_euclid(360.0) - 180.0
}
