//! Sketchbox editing core
//!
//! Domain logic that sits between pointer/ray events and the rendering layer:
//! - Shape model with per-kind parameters and rigid transforms
//! - Entity store
//! - Mesh buffer generation (primitives, extrusions, feature edges)
//! - Picking of shapes, faces and edges from raw mesh buffers
//! - Cursor-addressed transform history (undo/redo)
//! - Sketch-to-extrusion pipeline and grid snapping
//! - Scene JSON export/import and editor configuration

pub mod config;
pub mod constants;
pub mod history;
pub mod mesh;
pub mod pick;
pub mod scene;
pub mod selection;
pub mod shape;
pub mod sketch;
pub mod snap;
pub mod store;

pub use config::{ConfigError, EditorConfig, PrimitiveDefaults};
pub use history::{EditHistory, HistoryEntry, HistoryPolicy};
pub use mesh::{BoundingBox, LineSegments, MeshBuffers, ShapeMesh, build_shape_mesh};
pub use pick::{Highlight, HitTarget, Pick, RayHit, resolve_pick};
pub use scene::{
    ImportReport, SceneDocument, SceneError, SceneItem, SelectionRef, import_scene,
    import_scene_file,
};
pub use selection::{Selection, SelectionTarget};
pub use shape::{
    BoxParams, CylinderParams, ExtrudeParams, PrimitiveType, Profile, Shape, ShapeError, ShapeId,
    ShapeKind, ShapeParams, SphereParams, Transform, TransformPatch,
};
pub use sketch::{SketchMode, SketchPhase, SketchState, ground_point};
pub use snap::{Snap, quantize};
pub use store::EntityStore;
