//! Action handling
//!
//! UI code queues [`EditorAction`]s on the editor; they are processed once per
//! frame by [`process_pending_actions`].

use std::path::PathBuf;

use glam::Vec3;
use sb_core::{PrimitiveType, SelectionTarget, ShapeId, TransformPatch};

use crate::editor::{EditorTool, SharedEditor};

/// Actions that can be performed on the editor
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    SetTool(EditorTool),
    SetSelectionTarget(SelectionTarget),
    /// Create a primitive at a ground point
    CreatePrimitive {
        primitive: PrimitiveType,
        position: Vec3,
    },
    DeleteSelected,
    SelectShape(Option<ShapeId>),
    /// Numeric transform edit from a properties panel
    UpdateTransform {
        id: ShapeId,
        patch: TransformPatch,
    },
    /// Extrude the current sketch profile
    Extrude,
    ClearSketch,
    Undo,
    Redo,
    ToggleSnap,
    SetSnapStep(f32),
    NewScene,
    /// Replace the scene with a JSON document
    ImportScene(String),
    SaveScene(PathBuf),
    LoadScene(PathBuf),
}

/// Dispatch an action to the appropriate handler
pub fn dispatch_action(action: EditorAction, editor: &SharedEditor) {
    match action {
        // Scene file actions
        EditorAction::NewScene
        | EditorAction::ImportScene(_)
        | EditorAction::SaveScene(_)
        | EditorAction::LoadScene(_) => handle_scene_action(action, editor),

        // Shape actions
        EditorAction::CreatePrimitive { .. }
        | EditorAction::DeleteSelected
        | EditorAction::SelectShape(_)
        | EditorAction::UpdateTransform { .. }
        | EditorAction::Extrude
        | EditorAction::ClearSketch => handle_shape_action(action, editor),

        // Editor settings and history
        EditorAction::SetTool(tool) => editor.lock().set_tool(tool),
        EditorAction::SetSelectionTarget(target) => editor.lock().set_selection_target(target),
        EditorAction::Undo => {
            if !editor.lock().undo() {
                tracing::debug!("Nothing to undo");
            }
        }
        EditorAction::Redo => {
            if !editor.lock().redo() {
                tracing::debug!("Nothing to redo");
            }
        }
        EditorAction::ToggleSnap => editor.lock().toggle_snap(),
        EditorAction::SetSnapStep(step) => {
            if !editor.lock().set_snap_step(step) {
                tracing::warn!("Ignoring invalid snap step {}", step);
            }
        }
    }
}

/// Process all queued actions in order
pub fn process_pending_actions(editor: &SharedEditor) {
    let actions = editor.lock().take_pending_actions();
    for action in actions {
        dispatch_action(action, editor);
    }
}

fn handle_shape_action(action: EditorAction, editor: &SharedEditor) {
    let mut editor = editor.lock();
    match action {
        EditorAction::CreatePrimitive {
            primitive,
            position,
        } => {
            let id = editor.create_primitive(primitive, position);
            tracing::info!("Created {} {}", primitive.kind().display_name(), id);
        }
        EditorAction::DeleteSelected => match editor.delete_selected() {
            Some(id) => tracing::info!("Deleted shape {}", id),
            None => tracing::debug!("Nothing selected to delete"),
        },
        EditorAction::SelectShape(id) => editor.select_shape(id),
        EditorAction::UpdateTransform { id, patch } => {
            if editor.apply_transform(id, &patch).is_none() {
                tracing::warn!("Transform update for unknown shape {}", id);
            }
        }
        EditorAction::Extrude => {
            if editor.commit_sketch().is_none() {
                tracing::debug!("No sketch profile to extrude");
            }
        }
        EditorAction::ClearSketch => editor.clear_sketch(),
        _ => {}
    }
}

fn handle_scene_action(action: EditorAction, editor: &SharedEditor) {
    let mut editor = editor.lock();
    match action {
        EditorAction::NewScene => editor.new_scene(),
        EditorAction::ImportScene(json) => match editor.import_json(&json) {
            Ok(report) => tracing::info!(
                "Imported {} shapes ({} skipped)",
                report.created.len(),
                report.skipped
            ),
            Err(e) => tracing::error!("Failed to import scene: {}", e),
        },
        EditorAction::SaveScene(path) => match editor.save_scene(&path) {
            Ok(()) => tracing::info!("Saved scene to {:?}", path),
            Err(e) => tracing::error!("Failed to save scene: {}", e),
        },
        EditorAction::LoadScene(path) => match editor.load_scene(&path) {
            Ok(report) => tracing::info!(
                "Loaded scene from {:?}: {} shapes ({} skipped)",
                path,
                report.created.len(),
                report.skipped
            ),
            Err(e) => tracing::error!("Failed to load scene: {}", e),
        },
        _ => {}
    }
}
