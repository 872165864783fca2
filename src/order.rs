//! Layer ordering: keeps every element's `layer` pairwise distinct.
//!
//! All reordering is a pairwise swap of two existing values, so the multiset
//! of layers is only ever permuted. New elements take `max + 1`. Together
//! these keep the layer set free of duplicates for the lifetime of a scene.
//! The image takes part in ordering exactly like any text box.

#[cfg(test)]
#[path = "order_test.rs"]
mod order_test;

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::doc::{ElementId, Scene};

/// Minimum and maximum layer among a set of elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerBounds {
    pub min: i64,
    pub max: i64,
}

/// The layer a newly created element must take: one above the current maximum, or 0.
///
/// A loaded scene may already hold `i64::MAX`. Layers are re-ranked to
/// `0..n` first in that case, so the result is still strictly above every
/// existing layer.
pub fn next_layer(scene: &mut Scene) -> i64 {
    let Some(max) = scene.elements.iter().map(|e| e.layer).max() else {
        return 0;
    };
    if let Some(next) = max.checked_add(1) {
        return next;
    }
    warn!(elements = scene.elements.len(), "layer range exhausted; re-ranking");
    normalize_layers(scene);
    i64::try_from(scene.elements.len()).unwrap_or(i64::MAX)
}

/// Swap `id` with the element directly above it. Returns false (and changes
/// nothing) when `id` is unknown or already topmost.
pub fn move_up(scene: &mut Scene, id: &ElementId) -> bool {
    let Some(current) = scene.get(id).map(|e| e.layer) else {
        return false;
    };
    let neighbor = scene
        .elements
        .iter()
        .enumerate()
        .filter(|(_, e)| e.layer > current)
        .min_by_key(|(_, e)| e.layer)
        .map(|(i, _)| i);
    swap_with(scene, id, neighbor)
}

/// Swap `id` with the element directly below it. Returns false (and changes
/// nothing) when `id` is unknown or already bottommost.
pub fn move_down(scene: &mut Scene, id: &ElementId) -> bool {
    let Some(current) = scene.get(id).map(|e| e.layer) else {
        return false;
    };
    let neighbor = scene
        .elements
        .iter()
        .enumerate()
        .filter(|(_, e)| e.layer < current)
        .max_by_key(|(_, e)| e.layer)
        .map(|(i, _)| i);
    swap_with(scene, id, neighbor)
}

fn swap_with(scene: &mut Scene, id: &ElementId, neighbor: Option<usize>) -> bool {
    let Some(target) = scene.elements.iter().position(|e| &e.id == id) else {
        return false;
    };
    let Some(neighbor) = neighbor else {
        return false;
    };

    let target_layer = scene.elements[target].layer;
    let neighbor_layer = scene.elements[neighbor].layer;
    scene.elements[target].layer = neighbor_layer;
    scene.elements[neighbor].layer = target_layer;

    debug!(
        %id,
        other = %scene.elements[neighbor].id,
        from = target_layer,
        to = neighbor_layer,
        "layers swapped"
    );
    true
}

/// Layer bounds over every element except `id`. `None` when no other element exists.
#[must_use]
pub fn layer_bounds_excluding(scene: &Scene, id: &ElementId) -> Option<LayerBounds> {
    let mut layers = scene.elements.iter().filter(|e| &e.id != id).map(|e| e.layer);
    let first = layers.next()?;
    let (min, max) = layers.fold((first, first), |(lo, hi), l| (lo.min(l), hi.max(l)));
    Some(LayerBounds { min, max })
}

/// Whether `move_up(id)` would change anything.
#[must_use]
pub fn can_move_up(scene: &Scene, id: &ElementId) -> bool {
    let Some(layer) = scene.get(id).map(|e| e.layer) else {
        return false;
    };
    layer_bounds_excluding(scene, id).is_some_and(|b| b.max > layer)
}

/// Whether `move_down(id)` would change anything.
#[must_use]
pub fn can_move_down(scene: &Scene, id: &ElementId) -> bool {
    let Some(layer) = scene.get(id).map(|e| e.layer) else {
        return false;
    };
    layer_bounds_excluding(scene, id).is_some_and(|b| b.min < layer)
}

/// True when no two elements share a layer.
#[must_use]
pub fn has_unique_layers(scene: &Scene) -> bool {
    let mut seen = HashSet::with_capacity(scene.elements.len());
    scene.elements.iter().all(|e| seen.insert(e.layer))
}

/// Re-rank layers to `0..n`, ordered by `(layer, creation order)`.
///
/// Only needed to repair a scene whose layers arrived with duplicates.
/// Relative order of distinct layers is kept.
pub fn normalize_layers(scene: &mut Scene) {
    let mut ranked: Vec<usize> = (0..scene.elements.len()).collect();
    ranked.sort_by_key(|&i| scene.elements[i].layer);
    for (rank, index) in ranked.into_iter().enumerate() {
        scene.elements[index].layer = i64::try_from(rank).unwrap_or(i64::MAX);
    }
}
