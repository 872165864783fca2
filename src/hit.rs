#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use kurbo::Point;

use crate::compose::{Drawable, compose};
use crate::doc::{ElementId, Scene};

/// Topmost element under `board`, if any.
///
/// Walks the composed draw list front to back so the element the user sees
/// on top wins.
#[must_use]
pub fn hit_test(scene: &Scene, board: Point) -> Option<ElementId> {
    compose(scene)
        .iter()
        .rev()
        .find(|d| d.contains(board))
        .map(Drawable::id)
}
