//! Drag sessions: pointer-down over an element, incremental moves, release.
//!
//! All points here are already in board space; the caller converts device
//! coordinates through [`crate::camera`] on every event. Each move shifts the
//! element by the pointer delta since the previous event, so the element
//! keeps its offset from the pointer wherever it was grabbed.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use kurbo::Point;
use tracing::debug;

use crate::doc::{ElementId, Scene};
use crate::hit::hit_test;

/// State of the single drag session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// An element is following the pointer.
    Dragging {
        /// Id of the element being dragged.
        id: ElementId,
        /// Board-space pointer position at the previous event.
        last_board: Point,
    },
}

/// Turns pointer events into element moves. At most one session is active.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Id of the element being dragged, if any.
    #[must_use]
    pub fn active(&self) -> Option<ElementId> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging { id, .. } => Some(id),
        }
    }

    /// Start dragging `id` from `board`. Replaces any session in progress.
    ///
    /// Returns false and leaves the controller idle if `id` is not in the scene.
    pub fn begin(&mut self, scene: &Scene, id: ElementId, board: Point) -> bool {
        if scene.get(&id).is_none() {
            self.state = DragState::Idle;
            return false;
        }
        debug!(%id, x = board.x, y = board.y, "drag started");
        self.state = DragState::Dragging { id, last_board: board };
        true
    }

    /// Hit-test at `board` and start dragging the topmost element found.
    pub fn pointer_down(&mut self, scene: &Scene, board: Point) -> Option<ElementId> {
        let Some(id) = hit_test(scene, board) else {
            self.state = DragState::Idle;
            return None;
        };
        self.begin(scene, id, board);
        Some(id)
    }

    /// Move the dragged element by the pointer delta since the last event.
    ///
    /// Returns the element's new center, or `None` when no drag is active. If
    /// the element disappeared mid-drag the session ends.
    pub fn pointer_move(&mut self, scene: &mut Scene, board: Point) -> Option<(ElementId, Point)> {
        let DragState::Dragging { id, last_board } = self.state else {
            return None;
        };
        if !scene.translate(&id, board - last_board) {
            debug!(%id, "dragged element vanished; ending drag");
            self.state = DragState::Idle;
            return None;
        }
        self.state = DragState::Dragging { id, last_board: board };
        scene.get(&id).map(|e| (id, e.center))
    }

    /// End the session. The element stays where the last move put it.
    pub fn pointer_up(&mut self) -> Option<ElementId> {
        let id = self.active();
        if let Some(id) = id {
            debug!(%id, "drag finished");
        }
        self.state = DragState::Idle;
        id
    }

    /// Abort the session (pointer-cancel). Same outcome as [`Self::pointer_up`].
    pub fn cancel(&mut self) -> Option<ElementId> {
        self.pointer_up()
    }
}
