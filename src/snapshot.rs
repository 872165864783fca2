//! Serializable scene snapshots exchanged with the persistence service.
//!
//! Snapshots written by older editors may lack layer values. Loading fills
//! them in: a text box without a layer takes its index in the list, an image
//! without a layer goes above every text box. If that (or a corrupt source)
//! still produces duplicates the layers are re-ranked so the loaded scene
//! starts out with unique layers.

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::consts::{DEFAULT_BACKGROUND, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_TEXT_FILL};
use crate::doc::{
    BoardSettings, Element, ElementKind, ImageProps, ImageSource, Scene, TextProps, clamp_font_size, clamp_opacity,
    clamp_scale, clamp_stroke_width, normalize_rotation,
};
use crate::order;

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

fn default_true() -> bool {
    true
}

fn default_one() -> f64 {
    1.0
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_text_fill() -> String {
    DEFAULT_TEXT_FILL.to_string()
}

/// Persisted form of the image element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub source: ImageSource,
    pub base_size: Size,
    pub center_x: f64,
    pub center_y: f64,
    #[serde(default = "default_one")]
    pub scale: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_one")]
    pub opacity: f64,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<i64>,
    /// Index of the image among all elements in creation order. Missing in
    /// older snapshots, where the image is restored after every text box.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

/// Persisted form of one text box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub content: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_text_fill")]
    pub fill: String,
    #[serde(default)]
    pub stroke_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    pub center_x: f64,
    pub center_y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<i64>,
}

/// Everything needed to rebuild a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_true")]
    pub show_guides: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageSnapshot>,
    /// Text boxes in creation order.
    #[serde(default)]
    pub texts: Vec<TextSnapshot>,
}

impl From<&Scene> for SceneSnapshot {
    fn from(scene: &Scene) -> Self {
        let image = scene.elements().iter().enumerate().find(|(_, e)| e.is_image());
        let image = image.and_then(|(position, element)| {
            let props = element.as_image()?;
            Some(ImageSnapshot {
                id: Some(element.id),
                source: props.source.clone(),
                base_size: props.base_size,
                center_x: element.center.x,
                center_y: element.center.y,
                scale: props.scale,
                rotation: props.rotation,
                opacity: props.opacity,
                flip_x: props.flip_x,
                layer: Some(element.layer()),
                position: Some(position),
            })
        });

        let texts = scene
            .texts()
            .filter_map(|element| {
                let props = element.as_text()?;
                Some(TextSnapshot {
                    id: Some(element.id),
                    content: props.content.clone(),
                    font_family: props.font_family.clone(),
                    font_size: props.font_size,
                    fill: props.fill.clone(),
                    stroke_width: props.stroke_width,
                    stroke: props.stroke.clone(),
                    center_x: element.center.x,
                    center_y: element.center.y,
                    layer: Some(element.layer()),
                })
            })
            .collect();

        Self {
            background: scene.settings.background.clone(),
            show_guides: scene.settings.show_guides,
            image,
            texts,
        }
    }
}

impl From<SceneSnapshot> for Scene {
    fn from(snapshot: SceneSnapshot) -> Self {
        let mut elements = Vec::with_capacity(snapshot.texts.len() + 1);

        for (index, text) in snapshot.texts.into_iter().enumerate() {
            #[allow(clippy::cast_possible_wrap)]
            let layer = text.layer.unwrap_or(index as i64);
            let props = TextProps {
                content: text.content,
                font_family: text.font_family,
                font_size: clamp_font_size(text.font_size),
                fill: text.fill,
                stroke_width: clamp_stroke_width(text.stroke_width),
                stroke: text.stroke,
            };
            elements.push(Element {
                id: text.id.unwrap_or_else(Uuid::new_v4),
                layer,
                center: Point::new(text.center_x, text.center_y),
                kind: ElementKind::Text(props),
            });
        }

        if let Some(image) = snapshot.image {
            let above_texts = elements.iter().map(|e| e.layer).max().map_or(0, |max| max.saturating_add(1));
            let props = ImageProps {
                source: image.source,
                base_size: image.base_size,
                scale: clamp_scale(image.scale),
                rotation: normalize_rotation(image.rotation),
                opacity: clamp_opacity(image.opacity),
                flip_x: image.flip_x,
            };
            let position = image.position.map_or(elements.len(), |p| p.min(elements.len()));
            elements.insert(
                position,
                Element {
                    id: image.id.unwrap_or_else(Uuid::new_v4),
                    layer: image.layer.unwrap_or(above_texts),
                    center: Point::new(image.center_x, image.center_y),
                    kind: ElementKind::Image(props),
                },
            );
        }

        let mut scene = Scene {
            elements,
            settings: BoardSettings { background: snapshot.background, show_guides: snapshot.show_guides },
        };
        if !order::has_unique_layers(&scene) {
            warn!(elements = scene.len(), "snapshot has duplicate layers; re-ranking");
            order::normalize_layers(&mut scene);
        }
        scene
    }
}
