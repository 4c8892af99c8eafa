//! Editor state
//!
//! [`Editor`] ties the core services together: it owns the entity store, edit
//! history, selection, sketch state and gizmo coordinator, drives the
//! [`Viewport`] and records [`EditorEvent`]s for the UI.

use std::path::Path;
use std::sync::Arc;

use glam::{Vec2, Vec3};
use parking_lot::Mutex;
use sb_core::mesh::build_solid_mesh;
use sb_core::{
    EditHistory, EditorConfig, EntityStore, Highlight, ImportReport, Pick, PrimitiveType,
    Profile, RayHit, SceneDocument, SceneError, Selection, SelectionTarget, Shape, ShapeError,
    ShapeId, ShapeKind, SketchMode, SketchState, Snap, Transform, TransformPatch,
    build_shape_mesh, import_scene, resolve_pick,
};
use tracing::{debug, info};

use crate::actions::EditorAction;
use crate::gizmo::{GizmoMode, TransformCoordinator};
use crate::viewport::{NullViewport, Viewport};

/// Current editor tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorTool {
    #[default]
    Select,
    Translate,
    Rotate,
    Scale,
    Sketch(SketchMode),
}

impl EditorTool {
    pub fn name(&self) -> &'static str {
        match self {
            EditorTool::Select => "Select",
            EditorTool::Translate => "Translate",
            EditorTool::Rotate => "Rotate",
            EditorTool::Scale => "Scale",
            EditorTool::Sketch(SketchMode::Rectangle) => "Sketch Rectangle",
            EditorTool::Sketch(SketchMode::Circle) => "Sketch Circle",
        }
    }

    /// Gizmo mode for transform tools
    pub fn gizmo_mode(&self) -> Option<GizmoMode> {
        match self {
            EditorTool::Translate => Some(GizmoMode::Translate),
            EditorTool::Rotate => Some(GizmoMode::Rotate),
            EditorTool::Scale => Some(GizmoMode::Scale),
            EditorTool::Select | EditorTool::Sketch(_) => None,
        }
    }
}

/// Selection plus the live state of its shape, for display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionDescriptor {
    pub selection: Selection,
    pub kind: ShapeKind,
    pub transform: Transform,
}

/// Notifications for the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    SelectionChanged(Option<SelectionDescriptor>),
    TransformChanged(SelectionDescriptor),
    ShapeCreated(ShapeId),
    ShapeRemoved(ShapeId),
}

/// The editing session
pub struct Editor {
    config: EditorConfig,
    store: EntityStore,
    history: EditHistory,
    selection: Option<Selection>,
    target: SelectionTarget,
    tool: EditorTool,
    coordinator: TransformCoordinator,
    sketch: SketchState,
    snap: Snap,
    viewport: Box<dyn Viewport>,
    events: Vec<EditorEvent>,
    pending_actions: Vec<EditorAction>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default(), Box::new(NullViewport))
    }
}

impl Editor {
    pub fn new(config: EditorConfig, viewport: Box<dyn Viewport>) -> Self {
        let config = config.sanitized();
        Self {
            coordinator: TransformCoordinator::new(config.history),
            snap: config.snap,
            config,
            store: EntityStore::new(),
            history: EditHistory::new(),
            selection: None,
            target: SelectionTarget::default(),
            tool: EditorTool::default(),
            sketch: SketchState::new(),
            viewport,
            events: Vec::new(),
            pending_actions: Vec::new(),
        }
    }

    // ============== Accessors ==============

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn selection_target(&self) -> SelectionTarget {
        self.target
    }

    pub fn tool(&self) -> EditorTool {
        self.tool
    }

    pub fn coordinator(&self) -> &TransformCoordinator {
        &self.coordinator
    }

    pub fn sketch(&self) -> &SketchState {
        &self.sketch
    }

    pub fn snap(&self) -> &Snap {
        &self.snap
    }

    /// The selection together with its shape's kind and live transform
    pub fn descriptor(&self) -> Option<SelectionDescriptor> {
        let selection = self.selection?;
        let shape = self.store.get(selection.id())?;
        Some(SelectionDescriptor {
            selection,
            kind: shape.kind(),
            transform: shape.transform,
        })
    }

    /// Events recorded since the last [`Editor::take_events`]
    pub fn events(&self) -> &[EditorEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Queue an action
    pub fn queue_action(&mut self, action: EditorAction) {
        self.pending_actions.push(action);
    }

    /// Take pending actions
    pub fn take_pending_actions(&mut self) -> Vec<EditorAction> {
        std::mem::take(&mut self.pending_actions)
    }

    // ============== Shapes ==============

    /// Create a primitive at a clicked point (snapped) with configured dimensions
    pub fn create_primitive(&mut self, primitive: PrimitiveType, point: Vec3) -> ShapeId {
        let params = self.config.primitives.params_for(primitive);
        let id = self.store.create(params, self.snap.point3(point));
        self.register(id);
        id
    }

    /// Create a shape from a wire kind and parameter object
    pub fn create_shape(
        &mut self,
        kind: &str,
        params: serde_json::Value,
        position: Vec3,
    ) -> Result<ShapeId, ShapeError> {
        let id = self.store.create_from_wire(kind, params, position)?;
        self.register(id);
        Ok(id)
    }

    fn register(&mut self, id: ShapeId) {
        if let Some(shape) = self.store.get(id) {
            let mesh = build_shape_mesh(&shape.params, self.config.feature_edge_angle);
            self.viewport.shape_added(shape, &mesh);
            self.events.push(EditorEvent::ShapeCreated(id));
        }
    }

    /// Remove a shape, dropping any selection or gizmo binding that refers to it
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let shape = self.store.remove(id)?;
        self.forget(id);
        Some(shape)
    }

    /// Remove the selected shape
    pub fn delete_selected(&mut self) -> Option<ShapeId> {
        let id = self.selection?.id();
        self.remove_shape(id).map(|_| id)
    }

    fn forget(&mut self, id: ShapeId) {
        if self.coordinator.release(id) {
            self.viewport.detach_gizmo();
        }
        if self.selection.is_some_and(|s| s.id() == id) {
            self.set_pick(None);
        }
        self.viewport.shape_removed(id);
        self.events.push(EditorEvent::ShapeRemoved(id));
    }

    // ============== Selection ==============

    /// Resolve a ray-cast hit list with the current selection target
    pub fn pick(&mut self, hits: &[RayHit<'_>]) -> Option<Selection> {
        let pick = resolve_pick(hits, self.target, &self.store);
        self.set_pick(pick);
        self.selection
    }

    /// Select a whole shape by id, or clear the selection
    pub fn select_shape(&mut self, id: Option<ShapeId>) {
        let pick = id.and_then(|id| self.store.get(id)).map(|shape| Pick {
            selection: Selection::shape(shape.id),
            highlight: Highlight::Outline {
                bounds: build_solid_mesh(&shape.params)
                    .bounds()
                    .transform(&shape.world_matrix()),
            },
        });
        self.set_pick(pick);
    }

    pub fn clear_selection(&mut self) {
        self.set_pick(None);
    }

    fn set_pick(&mut self, pick: Option<Pick>) {
        self.viewport.clear_highlight();
        if let Some(pick) = &pick {
            self.viewport.show_highlight(&pick.highlight);
        }
        self.selection = pick.map(|p| p.selection);
        self.rebind_gizmo();
        let descriptor = self.descriptor();
        self.events.push(EditorEvent::SelectionChanged(descriptor));
    }

    pub fn set_selection_target(&mut self, target: SelectionTarget) {
        if self.target != target {
            debug!("Selection target set to {}", target.name());
            self.target = target;
        }
    }

    // ============== Tools and gizmo ==============

    pub fn set_tool(&mut self, tool: EditorTool) {
        if matches!(self.tool, EditorTool::Sketch(_)) && tool != self.tool {
            self.sketch.finish_stroke();
        }
        self.tool = tool;
        if let Some(mode) = tool.gizmo_mode() {
            self.coordinator.set_mode(mode);
            self.viewport.set_gizmo_mode(mode, mode.space());
        }
        self.rebind_gizmo();
        debug!("Tool set to {}", tool.name());
    }

    /// Attach the gizmo when a transform tool is active and a shape is selected
    fn rebind_gizmo(&mut self) {
        let was_bound = self.coordinator.bound();
        let wanted = self
            .tool
            .gizmo_mode()
            .and_then(|_| self.coordinator.attach(self.selection.as_ref(), &self.store));
        match wanted.and_then(|id| self.store.get(id)) {
            Some(shape) => self.viewport.attach_gizmo(shape.id, &shape.transform),
            None => {
                // attach() may already have released the old binding
                self.coordinator.detach();
                if was_bound.is_some() {
                    self.viewport.detach_gizmo();
                }
            }
        }
    }

    /// Gizmo drag started
    pub fn gizmo_begin(&mut self) -> bool {
        self.coordinator.begin(&self.store)
    }

    /// Gizmo moved the bound shape to `transform`
    pub fn gizmo_change(&mut self, transform: Transform) -> Option<SelectionDescriptor> {
        let id = self.coordinator.bound()?;
        let applied = self
            .coordinator
            .change(&mut self.store, &mut self.history, transform)?;
        self.viewport.shape_transformed(id, &applied);
        self.emit_transform(id)
    }

    /// Gizmo drag finished
    pub fn gizmo_end(&mut self) {
        self.coordinator.end(&mut self.history);
    }

    /// Numeric transform edit, recorded as one undoable step
    pub fn apply_transform(&mut self, id: ShapeId, patch: &TransformPatch) -> Option<Transform> {
        let applied =
            self.coordinator
                .apply_patch(&mut self.store, &mut self.history, id, patch)?;
        self.viewport.shape_transformed(id, &applied);
        self.emit_transform(id);
        Some(applied)
    }

    fn emit_transform(&mut self, id: ShapeId) -> Option<SelectionDescriptor> {
        let descriptor = self.descriptor().filter(|d| d.selection.id() == id)?;
        self.events.push(EditorEvent::TransformChanged(descriptor));
        Some(descriptor)
    }

    // ============== History ==============

    pub fn undo(&mut self) -> bool {
        let entry = self.history.undo(&mut self.store);
        self.after_history_step(entry.map(|e| e.shape_id))
    }

    pub fn redo(&mut self) -> bool {
        let entry = self.history.redo(&mut self.store);
        self.after_history_step(entry.map(|e| e.shape_id))
    }

    fn after_history_step(&mut self, id: Option<ShapeId>) -> bool {
        let Some(id) = id else {
            return false;
        };
        if let Some(shape) = self.store.get(id) {
            self.viewport.shape_transformed(id, &shape.transform);
        }
        self.emit_transform(id);
        true
    }

    // ============== Sketch ==============

    /// Begin a sketch stroke at a ground-plane point
    pub fn start_sketch(&mut self, mode: SketchMode, point: Vec2) {
        self.sketch
            .start(mode, point, &self.snap, self.config.min_profile_extent);
    }

    /// Update the sketch preview with the current ground-plane point
    pub fn update_sketch(&mut self, point: Vec2) -> Option<Profile> {
        self.sketch
            .update_preview(point, &self.snap, self.config.min_profile_extent)
    }

    pub fn finish_sketch_stroke(&mut self) {
        self.sketch.finish_stroke();
    }

    /// Extrude the sketched profile into a new shape
    pub fn commit_sketch(&mut self) -> Option<ShapeId> {
        let id = self
            .sketch
            .commit(&mut self.store, self.config.extrude_depth)?;
        self.register(id);
        Some(id)
    }

    pub fn clear_sketch(&mut self) {
        self.sketch.clear();
    }

    // ============== Snap ==============

    pub fn toggle_snap(&mut self) {
        self.snap.toggle();
        info!("Snap {}", if self.snap.enabled { "on" } else { "off" });
    }

    pub fn set_snap_step(&mut self, step: f32) -> bool {
        self.snap.set_step(step)
    }

    // ============== Scene ==============

    /// Export the scene and selection
    pub fn export_scene(&self) -> Result<SceneDocument, SceneError> {
        SceneDocument::export(&self.store, self.selection.as_ref())
    }

    pub fn export_json(&self) -> Result<String, SceneError> {
        self.export_scene()?.to_json()
    }

    /// Replace the scene with a JSON document
    ///
    /// Clears history and sketch state; restores the recorded selection when
    /// its shape was recreated.
    pub fn import_json(&mut self, json: &str) -> Result<ImportReport, SceneError> {
        let previous: Vec<ShapeId> = self.store.iter().map(|s| s.id).collect();
        let report = import_scene(&mut self.store, json)?;

        for id in previous {
            self.forget(id);
        }
        self.history.clear();
        self.sketch.clear();
        for id in &report.created {
            self.register(*id);
        }
        self.select_shape(report.selection.map(|s| s.id()));
        Ok(report)
    }

    pub fn save_scene(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        self.export_scene()?.save(path)
    }

    pub fn load_scene(&mut self, path: impl AsRef<Path>) -> Result<ImportReport, SceneError> {
        let json = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SceneError::Io(e.to_string()))?;
        self.import_json(&json)
    }

    /// Remove every shape and reset history and sketch state
    pub fn new_scene(&mut self) {
        for shape in self.store.clear() {
            self.forget(shape.id);
        }
        self.history.clear();
        self.sketch.clear();
        info!("New scene");
    }

    /// Per-frame upkeep: drop a selection or gizmo binding whose shape is gone
    pub fn frame(&mut self) {
        if let Some(id) = self.coordinator.bound() {
            if !self.store.contains(id) {
                self.coordinator.detach();
                self.viewport.detach_gizmo();
            }
        }
        if self.selection.is_some_and(|s| !self.store.contains(s.id())) {
            self.set_pick(None);
        }
    }
}

pub type SharedEditor = Arc<Mutex<Editor>>;

/// Create a new shared editor
pub fn create_shared_editor(config: EditorConfig, viewport: Box<dyn Viewport>) -> SharedEditor {
    Arc::new(Mutex::new(Editor::new(config, viewport)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gizmo::GizmoSpace;
    use sb_core::{HistoryPolicy, HitTarget, ShapeMesh, ShapeParams};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Highlight(Highlight),
        ClearHighlight,
        Attach(ShapeId),
        Detach,
        Mode(GizmoMode, GizmoSpace),
        Added(ShapeId),
        Removed(ShapeId),
        Transformed(ShapeId, Transform),
    }

    #[derive(Clone, Default)]
    struct RecordingViewport {
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl RecordingViewport {
        fn take(&self) -> Vec<Call> {
            std::mem::take(&mut *self.calls.lock())
        }
    }

    impl Viewport for RecordingViewport {
        fn show_highlight(&mut self, highlight: &Highlight) {
            self.calls.lock().push(Call::Highlight(*highlight));
        }
        fn clear_highlight(&mut self) {
            self.calls.lock().push(Call::ClearHighlight);
        }
        fn attach_gizmo(&mut self, id: ShapeId, _transform: &Transform) {
            self.calls.lock().push(Call::Attach(id));
        }
        fn detach_gizmo(&mut self) {
            self.calls.lock().push(Call::Detach);
        }
        fn set_gizmo_mode(&mut self, mode: GizmoMode, space: GizmoSpace) {
            self.calls.lock().push(Call::Mode(mode, space));
        }
        fn shape_added(&mut self, shape: &Shape, _mesh: &ShapeMesh) {
            self.calls.lock().push(Call::Added(shape.id));
        }
        fn shape_removed(&mut self, id: ShapeId) {
            self.calls.lock().push(Call::Removed(id));
        }
        fn shape_transformed(&mut self, id: ShapeId, transform: &Transform) {
            self.calls.lock().push(Call::Transformed(id, *transform));
        }
    }

    fn editor_with(config: EditorConfig) -> (Editor, RecordingViewport) {
        let viewport = RecordingViewport::default();
        (Editor::new(config, Box::new(viewport.clone())), viewport)
    }

    fn position(editor: &Editor, id: ShapeId) -> Vec3 {
        editor.store().get(id).unwrap().transform.position
    }

    fn at(x: f32) -> Transform {
        Transform::from_position(Vec3::new(x, 0.0, 0.0))
    }

    #[test]
    fn test_drag_then_undo_to_origin() {
        let (mut editor, _) = editor_with(EditorConfig::default());
        let id = editor.create_primitive(PrimitiveType::Box, Vec3::ZERO);
        editor.select_shape(Some(id));
        editor.set_tool(EditorTool::Translate);

        assert!(editor.gizmo_begin());
        for x in [1.0, 2.0, 3.0] {
            editor.gizmo_change(at(x));
        }
        editor.gizmo_end();
        assert_eq!(editor.history().len(), 4);
        assert_eq!(position(&editor, id), Vec3::new(3.0, 0.0, 0.0));

        for _ in 0..3 {
            assert!(editor.undo());
        }
        assert_eq!(position(&editor, id), Vec3::ZERO);
        assert!(!editor.undo());
        assert_eq!(position(&editor, id), Vec3::ZERO);
    }

    #[test]
    fn test_empty_gesture_writes_no_history() {
        let (mut editor, _) = editor_with(EditorConfig::default());
        let id = editor.create_primitive(PrimitiveType::Sphere, Vec3::ZERO);
        editor.select_shape(Some(id));
        editor.set_tool(EditorTool::Rotate);
        editor.gizmo_begin();
        editor.gizmo_end();
        assert!(editor.history().is_empty());
    }

    #[test]
    fn test_per_gesture_policy() {
        let config = EditorConfig {
            history: HistoryPolicy::PerGesture,
            ..EditorConfig::default()
        };
        let (mut editor, _) = editor_with(config);
        let id = editor.create_primitive(PrimitiveType::Box, Vec3::ZERO);
        editor.select_shape(Some(id));
        editor.set_tool(EditorTool::Translate);
        editor.gizmo_begin();
        for x in [1.0, 2.0, 3.0] {
            editor.gizmo_change(at(x));
        }
        editor.gizmo_end();
        assert_eq!(editor.history().len(), 2);
        assert!(editor.undo());
        assert_eq!(position(&editor, id), Vec3::ZERO);
    }

    #[test]
    fn test_gizmo_changes_emit_descriptor() {
        let (mut editor, viewport) = editor_with(EditorConfig::default());
        let id = editor.create_primitive(PrimitiveType::Cylinder, Vec3::ZERO);
        editor.select_shape(Some(id));
        editor.set_tool(EditorTool::Scale);
        editor.take_events();
        viewport.take();

        editor.gizmo_begin();
        let descriptor = editor.gizmo_change(at(2.0)).unwrap();
        editor.gizmo_end();
        assert_eq!(descriptor.kind, ShapeKind::Cylinder);
        assert_eq!(descriptor.transform, at(2.0));
        assert_eq!(
            editor.take_events(),
            vec![EditorEvent::TransformChanged(descriptor)]
        );
        assert_eq!(viewport.take(), vec![Call::Transformed(id, at(2.0))]);
    }

    #[test]
    fn test_undo_refreshes_selected_descriptor() {
        let (mut editor, _) = editor_with(EditorConfig::default());
        let id = editor.create_primitive(PrimitiveType::Box, Vec3::ZERO);
        editor.select_shape(Some(id));
        editor.set_tool(EditorTool::Translate);
        editor.gizmo_begin();
        editor.gizmo_change(at(4.0));
        editor.gizmo_end();
        editor.take_events();

        editor.undo();
        let events = editor.take_events();
        let Some(EditorEvent::TransformChanged(descriptor)) = events.last() else {
            panic!("expected a transform event, got {events:?}");
        };
        assert_eq!(descriptor.transform, Transform::IDENTITY);

        editor.redo();
        assert_eq!(editor.descriptor().unwrap().transform, at(4.0));
    }

    #[test]
    fn test_gizmo_follows_tool_and_selection() {
        let (mut editor, viewport) = editor_with(EditorConfig::default());
        let id = editor.create_primitive(PrimitiveType::Box, Vec3::ZERO);
        editor.select_shape(Some(id));
        assert_eq!(editor.coordinator().bound(), None);

        viewport.take();
        editor.set_tool(EditorTool::Rotate);
        assert_eq!(editor.coordinator().bound(), Some(id));
        assert_eq!(
            viewport.take(),
            vec![
                Call::Mode(GizmoMode::Rotate, GizmoSpace::Local),
                Call::Attach(id)
            ]
        );

        editor.set_tool(EditorTool::Select);
        assert_eq!(editor.coordinator().bound(), None);
        assert_eq!(viewport.take(), vec![Call::Detach]);
    }

    #[test]
    fn test_remove_clears_selection_and_gizmo() {
        let (mut editor, viewport) = editor_with(EditorConfig::default());
        let id = editor.create_primitive(PrimitiveType::Box, Vec3::ZERO);
        editor.set_tool(EditorTool::Translate);
        editor.select_shape(Some(id));
        editor.take_events();
        viewport.take();

        assert_eq!(editor.delete_selected(), Some(id));
        assert!(editor.selection().is_none());
        assert_eq!(editor.coordinator().bound(), None);
        assert!(editor.store().is_empty());
        assert_eq!(
            editor.take_events(),
            vec![
                EditorEvent::SelectionChanged(None),
                EditorEvent::ShapeRemoved(id)
            ]
        );
        let calls = viewport.take();
        assert!(calls.contains(&Call::Detach));
        assert!(calls.contains(&Call::ClearHighlight));
        assert!(calls.contains(&Call::Removed(id)));
    }

    #[test]
    fn test_removing_other_shape_keeps_selection() {
        let (mut editor, _) = editor_with(EditorConfig::default());
        let kept = editor.create_primitive(PrimitiveType::Box, Vec3::ZERO);
        let other = editor.create_primitive(PrimitiveType::Box, Vec3::X);
        editor.select_shape(Some(kept));
        editor.remove_shape(other);
        assert_eq!(editor.selection(), Some(&Selection::shape(kept)));
    }

    #[test]
    fn test_pick_face_with_target() {
        let (mut editor, viewport) = editor_with(EditorConfig::default());
        let id = editor.create_primitive(PrimitiveType::Box, Vec3::ZERO);
        let params = editor.store().get(id).unwrap().params;
        let mesh = build_shape_mesh(&params, 1.0);
        editor.set_selection_target(SelectionTarget::Face);
        viewport.take();

        let hits = [RayHit {
            entity: Some(id),
            point: Vec3::new(0.5, 0.0, 0.0),
            target: HitTarget::Face {
                mesh: &mesh.solid,
                face_index: Some(0),
            },
        }];
        let selection = editor.pick(&hits).unwrap();
        assert_eq!(selection.target(), SelectionTarget::Face);
        let calls = viewport.take();
        assert_eq!(calls[0], Call::ClearHighlight);
        assert!(matches!(calls[1], Call::Highlight(Highlight::Triangle { .. })));

        // Nothing hit: selection and highlight cleared
        assert!(editor.pick(&[]).is_none());
        assert_eq!(viewport.take(), vec![Call::ClearHighlight]);
    }

    #[test]
    fn test_face_selection_does_not_bind_gizmo() {
        let (mut editor, _) = editor_with(EditorConfig::default());
        let id = editor.create_primitive(PrimitiveType::Box, Vec3::ZERO);
        let params = editor.store().get(id).unwrap().params;
        let mesh = build_shape_mesh(&params, 1.0);
        editor.set_tool(EditorTool::Translate);
        editor.set_selection_target(SelectionTarget::Edge);
        let hits = [RayHit {
            entity: Some(id),
            point: Vec3::splat(0.5),
            target: HitTarget::Edge { lines: &mesh.edges },
        }];
        editor.pick(&hits);
        assert!(matches!(editor.selection(), Some(Selection::Edge { .. })));
        assert_eq!(editor.coordinator().bound(), None);
        assert!(!editor.gizmo_begin());
    }

    #[test]
    fn test_losing_shape_selection_detaches_viewport_gizmo() {
        let (mut editor, viewport) = editor_with(EditorConfig::default());
        let id = editor.create_primitive(PrimitiveType::Box, Vec3::ZERO);
        let params = editor.store().get(id).unwrap().params;
        let mesh = build_shape_mesh(&params, 1.0);
        editor.set_tool(EditorTool::Translate);
        editor.select_shape(Some(id));
        viewport.take();

        // Missed pick clears the selection
        editor.pick(&[]);
        assert_eq!(editor.coordinator().bound(), None);
        assert!(viewport.take().contains(&Call::Detach));

        // Face pick replaces the shape selection
        editor.select_shape(Some(id));
        assert!(viewport.take().contains(&Call::Attach(id)));
        editor.set_selection_target(SelectionTarget::Face);
        let hits = [RayHit {
            entity: Some(id),
            point: Vec3::new(0.5, 0.0, 0.0),
            target: HitTarget::Face {
                mesh: &mesh.solid,
                face_index: Some(0),
            },
        }];
        editor.pick(&hits);
        assert!(matches!(editor.selection(), Some(Selection::Face { .. })));
        assert_eq!(editor.coordinator().bound(), None);
        assert!(viewport.take().contains(&Call::Detach));

        // Already unbound: no second detach
        editor.pick(&[]);
        assert!(!viewport.take().contains(&Call::Detach));
    }

    #[test]
    fn test_create_primitive_snaps_position() {
        let (mut editor, viewport) = editor_with(EditorConfig::default());
        let id = editor.create_primitive(PrimitiveType::Box, Vec3::new(0.74, 1.3, 0.0));
        assert_eq!(position(&editor, id), Vec3::new(0.5, 1.5, 0.0));
        assert_eq!(viewport.take(), vec![Call::Added(id)]);

        editor.toggle_snap();
        let id = editor.create_primitive(PrimitiveType::Box, Vec3::new(0.74, 1.3, 0.0));
        assert_eq!(position(&editor, id), Vec3::new(0.74, 1.3, 0.0));
    }

    #[test]
    fn test_create_shape_rejects_unknown_kind() {
        let (mut editor, _) = editor_with(EditorConfig::default());
        assert!(
            editor
                .create_shape("torus", json!({"r": 1.0}), Vec3::ZERO)
                .is_err()
        );
        assert!(editor.store().is_empty());
        assert!(editor.events().is_empty());
    }

    #[test]
    fn test_apply_transform_is_undoable() {
        let (mut editor, _) = editor_with(EditorConfig::default());
        let id = editor.create_primitive(PrimitiveType::Box, Vec3::ZERO);
        editor.apply_transform(id, &TransformPatch::position(Vec3::new(0.0, 0.0, 2.0)));
        assert_eq!(position(&editor, id), Vec3::new(0.0, 0.0, 2.0));
        assert!(editor.undo());
        assert_eq!(position(&editor, id), Vec3::ZERO);
    }

    #[test]
    fn test_sketch_commit_creates_extrusion() {
        let (mut editor, viewport) = editor_with(EditorConfig::default());
        editor.set_snap_step(0.1);
        editor.set_tool(EditorTool::Sketch(SketchMode::Rectangle));
        editor.start_sketch(SketchMode::Rectangle, Vec2::ZERO);
        editor.update_sketch(Vec2::new(2.03, 0.97));
        editor.finish_sketch_stroke();

        let id = editor.commit_sketch().unwrap();
        let shape = editor.store().get(id).unwrap();
        assert_eq!(shape.kind(), ShapeKind::Extrude);
        let ShapeParams::Extrude(params) = shape.params else {
            panic!("expected extrusion");
        };
        assert_eq!(
            params.profile,
            Profile::Rectangle {
                min: Vec2::ZERO,
                max: Vec2::new(2.0, 1.0)
            }
        );
        assert_eq!(params.depth, editor.config().extrude_depth);
        assert!(!editor.sketch().has_profile());
        assert!(viewport.take().contains(&Call::Added(id)));
        assert!(editor.commit_sketch().is_none());
    }

    #[test]
    fn test_clear_sketch_creates_nothing() {
        let (mut editor, _) = editor_with(EditorConfig::default());
        editor.start_sketch(SketchMode::Circle, Vec2::ZERO);
        editor.update_sketch(Vec2::new(1.0, 0.0));
        editor.clear_sketch();
        assert!(editor.commit_sketch().is_none());
        assert!(editor.store().is_empty());
    }

    #[test]
    fn test_import_replaces_scene() {
        let (mut editor, viewport) = editor_with(EditorConfig::default());
        let old = editor.create_primitive(PrimitiveType::Sphere, Vec3::ZERO);
        editor.select_shape(Some(old));
        editor.apply_transform(old, &TransformPatch::position(Vec3::ONE));
        viewport.take();

        let json = json!({
            "items": [
                {"kind": "torus", "params": {"r": 1}, "position": [0, 0, 0],
                 "rotation": [0, 0, 0], "scale": [1, 1, 1]},
                {"kind": "box", "params": {"w": 1, "h": 1, "d": 1}, "position": [1, 2, 3],
                 "rotation": [0, 0, 0], "scale": [1, 1, 1]}
            ],
            "selection": null
        })
        .to_string();
        let report = editor.import_json(&json).unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(editor.store().len(), 1);
        let shape = &editor.store().list()[0];
        assert_eq!(shape.kind(), ShapeKind::Box);
        assert_eq!(shape.transform.position, Vec3::new(1.0, 2.0, 3.0));
        assert!(editor.selection().is_none());
        assert!(editor.history().is_empty());
        let calls = viewport.take();
        assert!(calls.contains(&Call::Removed(old)));
        assert!(calls.contains(&Call::Added(shape.id)));
    }

    #[test]
    fn test_export_import_restores_selection() {
        let (mut source, _) = editor_with(EditorConfig::default());
        source.create_primitive(PrimitiveType::Box, Vec3::ZERO);
        let selected = source.create_primitive(PrimitiveType::Cylinder, Vec3::new(2.0, 0.0, 0.0));
        source.select_shape(Some(selected));
        let json = source.export_json().unwrap();

        let (mut target, viewport) = editor_with(EditorConfig::default());
        target.import_json(&json).unwrap();
        assert_eq!(target.store().len(), 2);
        assert_eq!(target.selection(), Some(&Selection::shape(selected)));
        assert!(
            viewport
                .take()
                .iter()
                .any(|c| matches!(c, Call::Highlight(Highlight::Outline { .. })))
        );
    }

    #[test]
    fn test_failed_import_keeps_scene() {
        let (mut editor, _) = editor_with(EditorConfig::default());
        let id = editor.create_primitive(PrimitiveType::Box, Vec3::ZERO);
        editor.select_shape(Some(id));
        assert!(editor.import_json("not json").is_err());
        assert!(editor.store().contains(id));
        assert_eq!(editor.selection(), Some(&Selection::shape(id)));
    }

    #[test]
    fn test_save_and_load_scene() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        let (mut editor, _) = editor_with(EditorConfig::default());
        editor.create_primitive(PrimitiveType::Box, Vec3::ZERO);
        editor.create_primitive(PrimitiveType::Sphere, Vec3::X);
        editor.save_scene(&path).unwrap();

        editor.new_scene();
        assert!(editor.store().is_empty());
        let report = editor.load_scene(&path).unwrap();
        assert_eq!(report.created.len(), 2);
        assert_eq!(editor.store().len(), 2);
    }

    #[test]
    fn test_frame_keeps_live_binding() {
        let (mut editor, _) = editor_with(EditorConfig::default());
        let id = editor.create_primitive(PrimitiveType::Box, Vec3::ZERO);
        editor.set_tool(EditorTool::Translate);
        editor.select_shape(Some(id));
        editor.frame();
        assert_eq!(editor.coordinator().bound(), Some(id));
        assert_eq!(editor.selection(), Some(&Selection::shape(id)));
    }

    #[test]
    fn test_frame_drops_stale_binding() {
        let (mut editor, viewport) = editor_with(EditorConfig::default());
        let id = editor.create_primitive(PrimitiveType::Box, Vec3::ZERO);
        editor.set_tool(EditorTool::Translate);
        editor.select_shape(Some(id));
        editor.take_events();
        viewport.take();

        // Bypass remove_shape so only frame() can notice
        editor.store.remove(id);
        editor.frame();
        assert_eq!(editor.coordinator().bound(), None);
        assert!(editor.selection().is_none());
        assert_eq!(viewport.take(), vec![Call::Detach, Call::ClearHighlight]);
        assert_eq!(
            editor.take_events(),
            vec![EditorEvent::SelectionChanged(None)]
        );
    }
}
