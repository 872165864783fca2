use kurbo::{Point, Size};
use tracing::info;

use crate::camera;
use crate::compose::{Drawable, compose, compose_frame};
use crate::doc::{Element, ElementId, ElementPatch, ImageSource, Scene, TextProps};
use crate::export::{self, BatchError, BatchExport, BatchExportJob, ExportError, ExportOptions, Raster};
use crate::input::DragController;
use crate::order::{self, LayerBounds};
use crate::snapshot::SceneSnapshot;
use crate::store::{self, ObjectStore, ShareId, SnapshotStore, StoreError};
use crate::surface::RenderSurface;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from editing operations for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ElementCreated { id: ElementId },
    ElementUpdated { id: ElementId },
    ElementMoved { id: ElementId, center: Point },
    ElementDeleted { id: ElementId },
    LayersChanged,
    DragStarted { id: ElementId },
    DragEnded { id: ElementId },
    RenderNeeded,
}

/// Core editing state: all logic that doesn't depend on the rendering surface.
///
/// Separated from `Editor` so it can be tested without a surface.
#[derive(Debug, Clone, Default)]
pub struct EditorCore {
    pub scene: Scene,
    pub drag: DragController,
}

impl EditorCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the editor from a persisted snapshot. Any drag is dropped.
    #[must_use]
    pub fn from_snapshot(snapshot: SceneSnapshot) -> Self {
        Self { scene: Scene::from(snapshot), drag: DragController::new() }
    }

    #[must_use]
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot::from(&self.scene)
    }

    // --- Elements ---

    /// Add a text box above every existing element.
    pub fn add_text(&mut self, props: TextProps) -> (ElementId, Vec<Action>) {
        let id = self.scene.add_text(props);
        (id, vec![Action::ElementCreated { id }, Action::RenderNeeded])
    }

    /// Set or replace the board image. See [`Scene::set_image`].
    pub fn set_image(&mut self, source: ImageSource, base_size: Size) -> (ElementId, Vec<Action>) {
        let existed = self.scene.image().is_some();
        let id = self.scene.set_image(source, base_size);
        let change = if existed { Action::ElementUpdated { id } } else { Action::ElementCreated { id } };
        (id, vec![change, Action::RenderNeeded])
    }

    /// Delete an element. Ends the drag if it was the one being dragged.
    pub fn delete(&mut self, id: &ElementId) -> Vec<Action> {
        if self.scene.remove(id).is_none() {
            return Vec::new();
        }
        let mut actions = Vec::with_capacity(3);
        if self.drag.active() == Some(*id) {
            self.drag.cancel();
            actions.push(Action::DragEnded { id: *id });
        }
        actions.push(Action::ElementDeleted { id: *id });
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Apply a sparse attribute update.
    pub fn update(&mut self, id: &ElementId, patch: &ElementPatch) -> Vec<Action> {
        if !self.scene.apply_patch(id, patch) {
            return Vec::new();
        }
        vec![Action::ElementUpdated { id: *id }, Action::RenderNeeded]
    }

    // --- Ordering ---

    pub fn move_up(&mut self, id: &ElementId) -> Vec<Action> {
        if !order::move_up(&mut self.scene, id) {
            return Vec::new();
        }
        vec![Action::LayersChanged, Action::RenderNeeded]
    }

    pub fn move_down(&mut self, id: &ElementId) -> Vec<Action> {
        if !order::move_down(&mut self.scene, id) {
            return Vec::new();
        }
        vec![Action::LayersChanged, Action::RenderNeeded]
    }

    #[must_use]
    pub fn layer_bounds_excluding(&self, id: &ElementId) -> Option<LayerBounds> {
        order::layer_bounds_excluding(&self.scene, id)
    }

    #[must_use]
    pub fn can_move_up(&self, id: &ElementId) -> bool {
        order::can_move_up(&self.scene, id)
    }

    #[must_use]
    pub fn can_move_down(&self, id: &ElementId) -> bool {
        order::can_move_down(&self.scene, id)
    }

    // --- Board settings ---

    pub fn set_background(&mut self, color: impl Into<String>) -> Vec<Action> {
        self.scene.settings.background = color.into();
        vec![Action::RenderNeeded]
    }

    pub fn set_show_guides(&mut self, show: bool) -> Vec<Action> {
        self.scene.settings.show_guides = show;
        vec![Action::RenderNeeded]
    }

    // --- Pointer input (board space) ---

    pub fn pointer_down(&mut self, board: Point) -> Vec<Action> {
        match self.drag.pointer_down(&self.scene, board) {
            Some(id) => vec![Action::DragStarted { id }],
            None => Vec::new(),
        }
    }

    pub fn pointer_move(&mut self, board: Point) -> Vec<Action> {
        match self.drag.pointer_move(&mut self.scene, board) {
            Some((id, center)) => vec![Action::ElementMoved { id, center }, Action::RenderNeeded],
            None => Vec::new(),
        }
    }

    pub fn pointer_up(&mut self) -> Vec<Action> {
        match self.drag.pointer_up() {
            Some(id) => vec![Action::DragEnded { id }],
            None => Vec::new(),
        }
    }

    pub fn pointer_cancel(&mut self) -> Vec<Action> {
        match self.drag.cancel() {
            Some(id) => vec![Action::DragEnded { id }],
            None => Vec::new(),
        }
    }

    // --- Queries ---

    /// Back-to-front draw list.
    #[must_use]
    pub fn compose(&self) -> Vec<Drawable<'_>> {
        compose(&self.scene)
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.scene.get(id)
    }
}

/// The full editor. Wraps `EditorCore` and owns the rendering surface.
pub struct Editor<S: RenderSurface> {
    surface: S,
    pub core: EditorCore,
    pub options: ExportOptions,
}

impl<S: RenderSurface> Editor<S> {
    /// Create an editor with an empty scene bound to `surface`.
    #[must_use]
    pub fn new(surface: S, options: ExportOptions) -> Self {
        Self { surface, core: EditorCore::new(), options }
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Submit the current scene to the surface.
    pub fn render(&mut self) {
        self.surface.render(&compose_frame(&self.core.scene));
    }

    /// Map a device point through the surface's current transform.
    #[must_use]
    pub fn to_board_space(&self, device: Point) -> Point {
        camera::to_board_space(&self.surface, device)
    }

    // --- Pointer input (device space) ---

    pub fn on_pointer_down(&mut self, device: Point) -> Vec<Action> {
        let board = self.to_board_space(device);
        self.core.pointer_down(board)
    }

    pub fn on_pointer_move(&mut self, device: Point) -> Vec<Action> {
        let board = self.to_board_space(device);
        self.core.pointer_move(board)
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.core.pointer_up()
    }

    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.core.pointer_cancel()
    }

    // --- Export ---

    /// Export the scene as one raster named after `design_name`.
    ///
    /// # Errors
    ///
    /// See [`export::export_single`].
    pub async fn export_png(&mut self, design_name: &str) -> Result<Raster, ExportError> {
        export::export_single(&mut self.core.scene, &mut self.surface, design_name, &self.options).await
    }

    /// Export one raster per color in `job` and zip them.
    ///
    /// # Errors
    ///
    /// See [`export::export_batch`].
    pub async fn export_batch(&mut self, job: &BatchExportJob) -> Result<BatchExport, BatchError> {
        export::export_batch(&mut self.core.scene, &mut self.surface, job, &self.options).await
    }

    // --- Collaborators ---

    /// Upload image bytes and place them as the board image. Upload failure
    /// falls back to an embedded source.
    pub async fn add_image<O: ObjectStore + ?Sized>(
        &mut self,
        objects: &O,
        bytes: &[u8],
        mime_type: &str,
        base_size: Size,
    ) -> (ElementId, Vec<Action>) {
        let source = store::upload_or_embed(objects, bytes, mime_type).await;
        self.core.set_image(source, base_size)
    }

    /// Persist the current scene.
    ///
    /// # Errors
    ///
    /// Propagates the store's [`StoreError`].
    pub async fn save<P: SnapshotStore + ?Sized>(&self, snapshots: &P) -> Result<ShareId, StoreError> {
        snapshots.save(&self.core.snapshot()).await
    }

    /// Replace the current scene with the snapshot stored under `id`.
    ///
    /// # Errors
    ///
    /// Propagates the store's [`StoreError`]; the current scene is kept on error.
    pub async fn load<P: SnapshotStore + ?Sized>(&mut self, snapshots: &P, id: ShareId) -> Result<Vec<Action>, StoreError> {
        let snapshot = snapshots.load(id).await?;
        self.core = EditorCore::from_snapshot(snapshot);
        info!(%id, elements = self.core.scene.len(), "snapshot loaded");
        Ok(vec![Action::RenderNeeded])
    }
}
