//! Selection state

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::shape::ShapeId;

/// What a click in the viewport selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionTarget {
    #[default]
    Shape,
    Face,
    Edge,
}

impl SelectionTarget {
    pub fn name(&self) -> &'static str {
        match self {
            SelectionTarget::Shape => "Shape",
            SelectionTarget::Face => "Face",
            SelectionTarget::Edge => "Edge",
        }
    }

    pub fn all() -> &'static [SelectionTarget] {
        &[
            SelectionTarget::Shape,
            SelectionTarget::Face,
            SelectionTarget::Edge,
        ]
    }
}

/// The current selection
///
/// Face and edge selections carry world-space measurements taken when they
/// were picked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    Shape {
        id: ShapeId,
    },
    Face {
        id: ShapeId,
        /// Unit normal of the picked triangle
        normal: Vec3,
        /// Area of the planar face the triangle belongs to
        area: f32,
    },
    Edge {
        id: ShapeId,
        a: Vec3,
        b: Vec3,
        length: f32,
    },
}

impl Selection {
    pub fn shape(id: ShapeId) -> Self {
        Selection::Shape { id }
    }

    /// The shape this selection belongs to
    pub fn id(&self) -> ShapeId {
        match *self {
            Selection::Shape { id } | Selection::Face { id, .. } | Selection::Edge { id, .. } => id,
        }
    }

    pub fn target(&self) -> SelectionTarget {
        match self {
            Selection::Shape { .. } => SelectionTarget::Shape,
            Selection::Face { .. } => SelectionTarget::Face,
            Selection::Edge { .. } => SelectionTarget::Edge,
        }
    }

    pub fn is_shape(&self) -> bool {
        matches!(self, Selection::Shape { .. })
    }
}
