//! Entity store
//!
//! Owns every placed shape and its transform. Iteration order is creation
//! order, which is also the order shapes are exported in.

use glam::Vec3;
use tracing::{debug, info};
use uuid::Uuid;

use crate::shape::{Shape, ShapeError, ShapeId, ShapeParams, Transform, TransformPatch};

/// The set of placed shapes
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    shapes: Vec<Shape>,
}

impl EntityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shape with a fresh id at `position`, returns its id
    pub fn create(&mut self, params: ShapeParams, position: Vec3) -> ShapeId {
        self.insert(Shape::new(params, position))
    }

    /// Create a shape from a wire `kind`/`params` pair
    ///
    /// Unknown kinds and malformed parameters are rejected and nothing is stored.
    pub fn create_from_wire(
        &mut self,
        kind: &str,
        params: serde_json::Value,
        position: Vec3,
    ) -> Result<ShapeId, ShapeError> {
        let params = ShapeParams::from_wire(kind, params)?;
        Ok(self.create(params, position))
    }

    /// Insert a fully built shape
    ///
    /// A shape whose id is nil or already taken is given a fresh id.
    pub fn insert(&mut self, mut shape: Shape) -> ShapeId {
        if shape.id.is_nil() || self.contains(shape.id) {
            shape.id = Uuid::new_v4();
        }
        let id = shape.id;
        info!("Created {} {}", shape.kind(), id);
        self.shapes.push(shape);
        id
    }

    /// Remove a shape by ID
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.shapes.iter().position(|s| s.id == id)?;
        let shape = self.shapes.remove(index);
        info!("Removed {} {}", shape.kind(), id);
        Some(shape)
    }

    /// Remove every shape, returning them in creation order
    pub fn clear(&mut self) -> Vec<Shape> {
        std::mem::take(&mut self.shapes)
    }

    /// Get a shape by ID
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Get a mutable shape by ID
    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.get(id).is_some()
    }

    /// All shapes in creation order
    pub fn list(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Overwrite the given transform fields, returns the resulting transform
    pub fn apply_transform(&mut self, id: ShapeId, patch: &TransformPatch) -> Option<Transform> {
        let shape = self.get_mut(id)?;
        shape.transform.apply(patch);
        debug!("Transform of {} set to {:?}", id, shape.transform);
        Some(shape.transform)
    }

    /// Replace a shape's whole transform
    pub fn set_transform(&mut self, id: ShapeId, transform: Transform) -> Option<Transform> {
        let shape = self.get_mut(id)?;
        shape.transform = transform;
        Some(transform)
    }
}
