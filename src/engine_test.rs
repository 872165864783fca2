#![allow(clippy::float_cmp)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use kurbo::Affine;
use uuid::Uuid;

use super::*;
use crate::doc::ImageSource;
use crate::store::UploadError;
use crate::surface::test_helpers::{MockSurface, SurfaceEvent};

// =============================================================
// Mocks
// =============================================================

#[derive(Default)]
struct MemoryStore {
    snapshots: Mutex<HashMap<ShareId, SceneSnapshot>>,
}

#[async_trait::async_trait]
impl SnapshotStore for MemoryStore {
    async fn save(&self, snapshot: &SceneSnapshot) -> Result<ShareId, StoreError> {
        let id = Uuid::new_v4();
        self.snapshots.lock().unwrap().insert(id, snapshot.clone());
        Ok(id)
    }

    async fn load(&self, id: ShareId) -> Result<SceneSnapshot, StoreError> {
        self.snapshots.lock().unwrap().get(&id).cloned().ok_or(StoreError::NotFound(id))
    }
}

struct MockObjects {
    url: Option<String>,
}

#[async_trait::async_trait]
impl ObjectStore for MockObjects {
    async fn upload(&self, _bytes: &[u8], _mime_type: &str) -> Result<String, UploadError> {
        self.url.clone().ok_or_else(|| UploadError::Rejected("too large".into()))
    }
}

fn editor() -> Editor<MockSurface> {
    let options = ExportOptions { settle_delay: Duration::ZERO, ..ExportOptions::default() };
    Editor::new(MockSurface::mounted(Affine::scale(8.0)), options)
}

// =============================================================
// EditorCore: elements
// =============================================================

#[test]
fn add_text_emits_created() {
    let mut core = EditorCore::new();
    let (id, actions) = core.add_text(TextProps::new("a"));
    assert_eq!(actions, vec![Action::ElementCreated { id }, Action::RenderNeeded]);
    assert!(core.element(&id).is_some());
}

#[test]
fn second_image_emits_updated() {
    let mut core = EditorCore::new();
    let (first, actions) = core.set_image(ImageSource::Remote { url: "a".into() }, Size::new(1.0, 1.0));
    assert_eq!(actions[0], Action::ElementCreated { id: first });
    let (second, actions) = core.set_image(ImageSource::Remote { url: "b".into() }, Size::new(1.0, 1.0));
    assert_eq!(first, second);
    assert_eq!(actions[0], Action::ElementUpdated { id: first });
    assert_eq!(core.scene.len(), 1);
}

#[test]
fn update_unknown_is_noop() {
    let mut core = EditorCore::new();
    assert!(core.update(&Uuid::new_v4(), &ElementPatch::default()).is_empty());
}

#[test]
fn update_emits_updated() {
    let mut core = EditorCore::new();
    let (id, _) = core.add_text(TextProps::new("a"));
    let patch = ElementPatch { content: Some("b".into()), ..Default::default() };
    assert_eq!(core.update(&id, &patch), vec![Action::ElementUpdated { id }, Action::RenderNeeded]);
    assert_eq!(core.element(&id).unwrap().as_text().unwrap().content, "b");
}

#[test]
fn delete_unknown_is_noop() {
    let mut core = EditorCore::new();
    assert!(core.delete(&Uuid::new_v4()).is_empty());
}

#[test]
fn delete_dragged_element_ends_drag() {
    let mut core = EditorCore::new();
    let (id, _) = core.add_text(TextProps::new("a"));
    assert_eq!(core.pointer_down(Point::new(16.0, 52.5)), vec![Action::DragStarted { id }]);

    let actions = core.delete(&id);

    assert_eq!(actions, vec![Action::DragEnded { id }, Action::ElementDeleted { id }, Action::RenderNeeded]);
    assert!(core.drag.active().is_none());
    assert!(core.pointer_move(Point::new(0.0, 0.0)).is_empty());
}

#[test]
fn delete_other_element_keeps_drag() {
    let mut core = EditorCore::new();
    let other = core.scene.add_text_at(TextProps::new("corner"), Point::new(2.0, 2.0));
    let (dragged, _) = core.add_text(TextProps::new("b"));
    core.pointer_down(Point::new(16.0, 52.5));

    assert_eq!(core.delete(&other), vec![Action::ElementDeleted { id: other }, Action::RenderNeeded]);
    assert_eq!(core.drag.active(), Some(dragged));
}

// =============================================================
// EditorCore: ordering and settings
// =============================================================

#[test]
fn image_over_two_texts_moves_between_them() {
    let mut core = EditorCore::new();
    let (a, _) = core.add_text(TextProps::new("a"));
    let (b, _) = core.add_text(TextProps::new("b"));
    let (image, _) = core.set_image(ImageSource::Remote { url: "u".into() }, Size::new(4.0, 4.0));
    assert!(!core.can_move_up(&image));

    assert_eq!(core.move_down(&image), vec![Action::LayersChanged, Action::RenderNeeded]);

    let order: Vec<ElementId> = core.compose().iter().map(Drawable::id).collect();
    assert_eq!(order, vec![a, image, b]);
    assert!(core.can_move_up(&image));
    assert!(core.can_move_down(&image));
    assert_eq!(core.layer_bounds_excluding(&image), Some(LayerBounds { min: 0, max: 2 }));
}

#[test]
fn move_at_boundary_emits_nothing() {
    let mut core = EditorCore::new();
    let (a, _) = core.add_text(TextProps::new("a"));
    let (b, _) = core.add_text(TextProps::new("b"));
    assert!(core.move_down(&a).is_empty());
    assert!(core.move_up(&b).is_empty());
}

#[test]
fn board_settings_request_render() {
    let mut core = EditorCore::new();
    assert_eq!(core.set_background("#000000"), vec![Action::RenderNeeded]);
    assert_eq!(core.set_show_guides(false), vec![Action::RenderNeeded]);
    assert_eq!(core.scene.settings.background, "#000000");
    assert!(!core.scene.settings.show_guides);
}

#[test]
fn snapshot_round_trips_through_core() {
    let mut core = EditorCore::new();
    core.add_text(TextProps::new("a"));
    core.set_background("#445566");
    let restored = EditorCore::from_snapshot(core.snapshot());
    assert_eq!(restored.scene, core.scene);
}

// =============================================================
// Editor: pointer input through the surface transform
// =============================================================

#[test]
fn device_points_map_through_surface_transform() {
    let mut editor = editor();
    let (id, _) = editor.core.add_text(TextProps::new("drag"));

    assert_eq!(editor.to_board_space(Point::new(128.0, 420.0)), Point::new(16.0, 52.5));
    assert_eq!(editor.on_pointer_down(Point::new(128.0, 420.0)), vec![Action::DragStarted { id }]);

    let actions = editor.on_pointer_move(Point::new(144.0, 428.0));
    assert_eq!(actions, vec![Action::ElementMoved { id, center: Point::new(18.0, 53.5) }, Action::RenderNeeded]);
    assert_eq!(editor.on_pointer_up(), vec![Action::DragEnded { id }]);
}

#[test]
fn transform_change_mid_drag_is_picked_up() {
    let mut editor = editor();
    let (id, _) = editor.core.add_text(TextProps::new("drag"));
    editor.on_pointer_down(Point::new(128.0, 420.0));

    editor.surface_mut().transform = Some(Affine::scale(16.0));
    editor.on_pointer_move(Point::new(272.0, 840.0));

    assert_eq!(editor.core.element(&id).unwrap().center, Point::new(17.0, 52.5));
}

#[test]
fn unmounted_surface_maps_to_origin() {
    let mut editor = Editor::new(MockSurface::default(), ExportOptions::default());
    editor.core.add_text(TextProps::new("centered"));
    assert_eq!(editor.to_board_space(Point::new(128.0, 420.0)), Point::ORIGIN);
    assert!(editor.on_pointer_down(Point::new(128.0, 420.0)).is_empty());
}

#[test]
fn pointer_cancel_ends_drag_in_place() {
    let mut editor = editor();
    let (id, _) = editor.core.add_text(TextProps::new("drag"));
    editor.on_pointer_down(Point::new(128.0, 420.0));
    editor.on_pointer_move(Point::new(136.0, 420.0));

    assert_eq!(editor.on_pointer_cancel(), vec![Action::DragEnded { id }]);
    assert_eq!(editor.core.element(&id).unwrap().center, Point::new(17.0, 52.5));
}

#[test]
fn render_submits_current_scene() {
    let mut editor = editor();
    editor.core.add_text(TextProps::new("a"));
    editor.render();
    assert_eq!(
        editor.surface().events,
        vec![SurfaceEvent::Render { background: "#ffffff".into(), show_guides: true, items: 1 }]
    );
}

// =============================================================
// Editor: export and collaborators
// =============================================================

#[tokio::test]
async fn export_png_through_editor() {
    let mut editor = editor();
    editor.core.add_text(TextProps::new("a"));

    let raster = editor.export_png("Poster").await.unwrap();

    assert_eq!(raster.name, "poster.png");
    assert!(editor.core.scene.settings.show_guides);
}

#[tokio::test]
async fn export_batch_through_editor() {
    let mut editor = editor();
    editor.core.add_text(TextProps::new("a"));
    let job = BatchExportJob::new("poster", ["#ff0000", "#0000ff"]);

    let batch = editor.export_batch(&job).await.unwrap();

    assert_eq!(batch.archive.entries, vec!["poster-ff0000.png", "poster-0000ff.png"]);
    assert_eq!(editor.surface().captured_backgrounds(), ["#ff0000", "#0000ff"]);
    assert_eq!(editor.core.scene.settings.background, "#ffffff");
}

#[tokio::test]
async fn add_image_uses_uploaded_url() {
    let mut editor = editor();
    let objects = MockObjects { url: Some("https://cdn.test/a.png".into()) };

    let (id, actions) = editor.add_image(&objects, &[1, 2, 3], "image/png", Size::new(20.0, 10.0)).await;

    assert_eq!(actions[0], Action::ElementCreated { id });
    let props = editor.core.element(&id).unwrap().as_image().unwrap();
    assert_eq!(props.source, ImageSource::Remote { url: "https://cdn.test/a.png".into() });
    assert_eq!(props.base_size, Size::new(20.0, 10.0));
}

#[tokio::test]
async fn add_image_falls_back_to_embedded() {
    let mut editor = editor();
    let objects = MockObjects { url: None };

    let (id, _) = editor.add_image(&objects, &[1, 2, 3], "image/png", Size::new(20.0, 10.0)).await;

    let props = editor.core.element(&id).unwrap().as_image().unwrap();
    assert_eq!(props.source, ImageSource::Embedded { data_url: "data:image/png;base64,AQID".into() });
}

#[tokio::test]
async fn save_and_load_replace_scene() {
    let store = MemoryStore::default();
    let mut source = editor();
    let (id, _) = source.core.add_text(TextProps::new("kept"));
    source.core.set_background("#010203");
    let share = source.save(&store).await.unwrap();

    let mut target = editor();
    target.core.add_text(TextProps::new("discarded"));
    assert_eq!(target.load(&store, share).await.unwrap(), vec![Action::RenderNeeded]);

    assert_eq!(target.core.scene, source.core.scene);
    assert!(target.core.element(&id).is_some());
}

#[tokio::test]
async fn failed_load_keeps_current_scene() {
    let store = MemoryStore::default();
    let mut editor = editor();
    editor.core.add_text(TextProps::new("current"));
    let before = editor.core.scene.clone();

    let err = editor.load(&store, Uuid::new_v4()).await.unwrap_err();

    assert!(matches!(err, StoreError::NotFound(_)));
    assert_eq!(editor.core.scene, before);
}
