//! Rendering collaborator interface
//!
//! The editor never draws anything itself. It tells the viewport which
//! highlight to show, where the gizmo goes and which shapes changed.

use sb_core::{Highlight, Shape, ShapeId, ShapeMesh, Transform};

use crate::gizmo::{GizmoMode, GizmoSpace};

/// Rendering side of the editor
pub trait Viewport: Send {
    /// Replace the selection highlight overlay
    fn show_highlight(&mut self, highlight: &Highlight);

    /// Remove the selection highlight overlay
    fn clear_highlight(&mut self);

    /// Bind the gizmo to a shape at its current transform
    fn attach_gizmo(&mut self, id: ShapeId, transform: &Transform);

    fn detach_gizmo(&mut self);

    fn set_gizmo_mode(&mut self, mode: GizmoMode, space: GizmoSpace);

    /// A shape was created; `mesh` holds its buffers for upload and picking
    fn shape_added(&mut self, _shape: &Shape, _mesh: &ShapeMesh) {}

    fn shape_removed(&mut self, _id: ShapeId) {}

    fn shape_transformed(&mut self, _id: ShapeId, _transform: &Transform) {}
}

/// Viewport that ignores everything (headless use)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullViewport;

impl Viewport for NullViewport {
    fn show_highlight(&mut self, _highlight: &Highlight) {}

    fn clear_highlight(&mut self) {}

    fn attach_gizmo(&mut self, _id: ShapeId, _transform: &Transform) {}

    fn detach_gizmo(&mut self) {}

    fn set_gizmo_mode(&mut self, _mode: GizmoMode, _space: GizmoSpace) {}
}
