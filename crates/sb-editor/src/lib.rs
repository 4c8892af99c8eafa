//! Sketchbox interactive editing layer
//!
//! Wires the core services to a viewport: selection and highlighting, gizmo
//! gesture recording, sketch tools and queued UI actions.

pub mod actions;
pub mod editor;
pub mod gizmo;
pub mod viewport;

// Re-exports for convenience
pub use actions::{EditorAction, dispatch_action, process_pending_actions};
pub use editor::{
    Editor, EditorEvent, EditorTool, SelectionDescriptor, SharedEditor, create_shared_editor,
};
pub use gizmo::{GizmoMode, GizmoSpace, TransformCoordinator};
pub use viewport::{NullViewport, Viewport};
