//! Scene document serialization
//!
//! The whole scene is one JSON document:
//!
//! ```json
//! {
//!   "items": [{"id": "...", "kind": "box", "params": {"w": 1, "h": 1, "d": 1},
//!              "position": [0, 0, 0], "rotation": [0, 0, 0], "scale": [1, 1, 1]}],
//!   "selection": {"id": "...", "type": "shape"}
//! }
//! ```
//!
//! Import is lenient per item: an item with an unknown kind or malformed
//! fields is skipped and the rest of the document still loads.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::selection::{Selection, SelectionTarget};
use crate::shape::{Shape, ShapeError, ShapeId, ShapeParams, Transform};
use crate::store::EntityStore;

/// Scene-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

/// One exported shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneItem {
    /// Id at export time; reused on import when possible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub kind: String,
    pub params: serde_json::Value,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl SceneItem {
    pub fn from_shape(shape: &Shape) -> Result<Self, SceneError> {
        let params = shape
            .params
            .to_wire()
            .map_err(|e| SceneError::Serialize(e.to_string()))?;
        Ok(Self {
            id: Some(shape.id.to_string()),
            kind: shape.kind().to_string(),
            params,
            position: shape.transform.position,
            rotation: shape.transform.rotation,
            scale: shape.transform.scale,
        })
    }

    /// Rebuild the shape, rejecting unknown kinds and malformed parameters
    pub fn to_shape(&self) -> Result<Shape, ShapeError> {
        let params = ShapeParams::from_wire(&self.kind, self.params.clone())?;
        let transform = Transform {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        };
        if !transform.is_finite() {
            return Err(ShapeError::InvalidParams(format!(
                "non-finite transform {transform:?}"
            )));
        }
        let mut shape = Shape::with_transform(params, transform);
        if let Some(id) = self.id.as_deref().and_then(|s| Uuid::parse_str(s).ok()) {
            shape.id = id;
        }
        Ok(shape)
    }
}

/// Reference to the selected shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRef {
    pub id: String,
    #[serde(rename = "type")]
    pub target: SelectionTarget,
}

impl From<&Selection> for SelectionRef {
    fn from(selection: &Selection) -> Self {
        Self {
            id: selection.id().to_string(),
            target: selection.target(),
        }
    }
}

/// The exported scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub items: Vec<SceneItem>,
    pub selection: Option<SelectionRef>,
}

impl SceneDocument {
    /// Snapshot the store, in its iteration order, and the selection
    pub fn export(store: &EntityStore, selection: Option<&Selection>) -> Result<Self, SceneError> {
        let items = store
            .iter()
            .map(SceneItem::from_shape)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            items,
            selection: selection.map(SelectionRef::from),
        })
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        serde_json::to_string_pretty(self).map_err(|e| SceneError::Serialize(e.to_string()))
    }

    /// Parse a document strictly: any malformed item fails the whole parse
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        serde_json::from_str(json).map_err(|e| SceneError::Deserialize(e.to_string()))
    }

    /// Save the document to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let content = self.to_json()?;
        std::fs::write(path.as_ref(), content).map_err(|e| SceneError::Io(e.to_string()))
    }

    /// Load a document from a file (strict parse)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        Self::from_json(&read_file(path.as_ref())?)
    }
}

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Ids of the recreated shapes, in document order
    pub created: Vec<ShapeId>,
    /// Number of items that could not be recreated
    pub skipped: usize,
    /// The restored selection, if its shape was recreated
    pub selection: Option<Selection>,
}

/// Document shape accepted on import, before per-item validation
#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    items: Vec<serde_json::Value>,
    #[serde(default)]
    selection: Option<serde_json::Value>,
}

/// Replace the contents of `store` with the shapes of a JSON document
///
/// A document that is not a JSON object fails before the store is touched.
/// Otherwise every existing shape is removed first and each recognized item
/// is recreated; unusable items are skipped.
pub fn import_scene(store: &mut EntityStore, json: &str) -> Result<ImportReport, SceneError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| SceneError::Deserialize(e.to_string()))?;
    if !value.is_object() {
        return Err(SceneError::Deserialize(
            "scene document is not a JSON object".to_string(),
        ));
    }
    let raw: RawDocument =
        serde_json::from_value(value).map_err(|e| SceneError::Deserialize(e.to_string()))?;

    let removed = store.clear();
    let mut report = ImportReport::default();

    for (index, value) in raw.items.into_iter().enumerate() {
        let shape = serde_json::from_value::<SceneItem>(value)
            .map_err(|e| ShapeError::InvalidParams(e.to_string()))
            .and_then(|item| item.to_shape());
        match shape {
            Ok(shape) => report.created.push(store.insert(shape)),
            Err(e) => {
                warn!("Skipping scene item {}: {}", index, e);
                report.skipped += 1;
            }
        }
    }

    report.selection = raw
        .selection
        .and_then(|value| serde_json::from_value::<SelectionRef>(value).ok())
        .and_then(|selection| Uuid::parse_str(&selection.id).ok())
        .filter(|id| store.contains(*id))
        .map(Selection::shape);

    info!(
        "Imported scene: {} removed, {} created, {} skipped",
        removed.len(),
        report.created.len(),
        report.skipped
    );
    Ok(report)
}

/// Import a scene document from a file
pub fn import_scene_file(
    store: &mut EntityStore,
    path: impl AsRef<Path>,
) -> Result<ImportReport, SceneError> {
    import_scene(store, &read_file(path.as_ref())?)
}

fn read_file(path: &Path) -> Result<String, SceneError> {
    std::fs::read_to_string(path).map_err(|e| SceneError::Io(e.to_string()))
}
