//! Transform gizmo coordination
//!
//! Binds the external gizmo to the selected shape and turns its
//! begin → change* → end drag gestures into edit-history entries.

use sb_core::{
    EditHistory, EntityStore, HistoryEntry, HistoryPolicy, Selection, ShapeId, Transform,
    TransformPatch,
};
use tracing::{debug, warn};

/// Gizmo mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GizmoMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl GizmoMode {
    pub fn name(&self) -> &'static str {
        match self {
            GizmoMode::Translate => "Translate",
            GizmoMode::Rotate => "Rotate",
            GizmoMode::Scale => "Scale",
        }
    }

    /// Coordinate space the gizmo operates in; fixed per mode
    pub fn space(&self) -> GizmoSpace {
        match self {
            GizmoMode::Translate => GizmoSpace::World,
            GizmoMode::Rotate | GizmoMode::Scale => GizmoSpace::Local,
        }
    }
}

/// Gizmo coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GizmoSpace {
    #[default]
    World,
    Local,
}

/// Gizmo binding and gesture recording
#[derive(Debug, Default)]
pub struct TransformCoordinator {
    bound: Option<ShapeId>,
    mode: GizmoMode,
    policy: HistoryPolicy,
    dragging: bool,
    /// Snapshot taken at gesture begin, cleared once recorded
    pending_before: Option<HistoryEntry>,
    /// Latest post-change snapshot (per-gesture policy only)
    pending_after: Option<HistoryEntry>,
}

impl TransformCoordinator {
    pub fn new(policy: HistoryPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Bind the gizmo to a shape selection
    ///
    /// Face and edge selections, and shapes missing from the store, leave the
    /// gizmo unbound. Returns the bound shape.
    pub fn attach(&mut self, selection: Option<&Selection>, store: &EntityStore) -> Option<ShapeId> {
        match selection {
            Some(Selection::Shape { id }) if store.contains(*id) => {
                if self.bound != Some(*id) {
                    self.reset_gesture();
                    debug!("Gizmo attached to {}", id);
                }
                self.bound = Some(*id);
            }
            _ => {
                self.detach();
            }
        }
        self.bound
    }

    /// Unbind the gizmo, abandoning any gesture in progress
    pub fn detach(&mut self) -> Option<ShapeId> {
        self.reset_gesture();
        let previous = self.bound.take();
        if let Some(id) = previous {
            debug!("Gizmo detached from {}", id);
        }
        previous
    }

    /// Detach if bound to `id`; returns whether it was
    pub fn release(&mut self, id: ShapeId) -> bool {
        if self.bound == Some(id) {
            self.detach();
            true
        } else {
            false
        }
    }

    pub fn bound(&self) -> Option<ShapeId> {
        self.bound
    }

    pub fn mode(&self) -> GizmoMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: GizmoMode) {
        self.mode = mode;
    }

    pub fn space(&self) -> GizmoSpace {
        self.mode.space()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Start a drag gesture, capturing the bound shape's transform
    pub fn begin(&mut self, store: &EntityStore) -> bool {
        let Some(shape) = self.bound.and_then(|id| store.get(id)) else {
            return false;
        };
        if self.dragging {
            warn!("Gizmo gesture began while another was in progress");
        }
        self.dragging = true;
        self.pending_before = Some(HistoryEntry::capture(shape));
        self.pending_after = None;
        true
    }

    /// Apply a live transform from the gizmo and record it
    ///
    /// Returns the shape's new transform, or `None` when nothing is bound.
    pub fn change(
        &mut self,
        store: &mut EntityStore,
        history: &mut EditHistory,
        transform: Transform,
    ) -> Option<Transform> {
        let id = self.bound?;
        let applied = store.set_transform(id, transform)?;
        let after = HistoryEntry::new(id, applied);

        match self.policy {
            HistoryPolicy::PerChange => {
                if let Some(before) = self.pending_before.take().filter(|b| b.shape_id == id) {
                    history.push(before);
                }
                history.push(after);
            }
            HistoryPolicy::PerGesture if self.dragging => {
                self.pending_after = Some(after);
            }
            HistoryPolicy::PerGesture => history.push(after),
        }
        Some(applied)
    }

    /// Finish the gesture; an empty gesture records nothing
    pub fn end(&mut self, history: &mut EditHistory) {
        if let (Some(before), Some(after)) = (self.pending_before, self.pending_after) {
            if before.transform != after.transform {
                history.push(before);
                history.push(after);
            }
        }
        self.reset_gesture();
    }

    /// Apply a partial transform as a single recorded edit
    ///
    /// Used for numeric edits that bypass the gizmo. Records the previous and
    /// new transform unless nothing changed.
    pub fn apply_patch(
        &mut self,
        store: &mut EntityStore,
        history: &mut EditHistory,
        id: ShapeId,
        patch: &TransformPatch,
    ) -> Option<Transform> {
        let before = HistoryEntry::capture(store.get(id)?);
        let applied = store.apply_transform(id, patch)?;
        if applied != before.transform {
            history.push(before);
            history.push(HistoryEntry::new(id, applied));
        }
        Some(applied)
    }

    fn reset_gesture(&mut self) {
        self.dragging = false;
        self.pending_before = None;
        self.pending_after = None;
    }
}
