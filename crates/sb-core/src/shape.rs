//! Shape entity definitions
//!
//! A shape is a placed primitive or extruded solid: a stable id, a kind drawn
//! from a closed set, kind-specific parameters and a rigid transform.
//!
//! Z is up. The ground plane is z = 0 and a sketch coordinate `(u, v)` maps to
//! the world point `(u, v, 0)`.

use std::f32::consts::TAU;
use std::fmt;
use std::str::FromStr;

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::constants::CIRCLE_PROFILE_SEGMENTS;

/// Stable identifier of a shape entity
pub type ShapeId = Uuid;

/// Shape-related errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("Unknown shape kind: {0}")]
    UnknownKind(String),
    #[error("Invalid shape parameters: {0}")]
    InvalidParams(String),
}

/// The closed set of shape kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Box,
    Sphere,
    Cylinder,
    Extrude,
}

impl ShapeKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Box => "box",
            ShapeKind::Sphere => "sphere",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Extrude => "extrude",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ShapeKind::Box => "Box",
            ShapeKind::Sphere => "Sphere",
            ShapeKind::Cylinder => "Cylinder",
            ShapeKind::Extrude => "Extrusion",
        }
    }

    /// All shape kinds
    pub fn all() -> &'static [ShapeKind] {
        &[
            ShapeKind::Box,
            ShapeKind::Sphere,
            ShapeKind::Cylinder,
            ShapeKind::Extrude,
        ]
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ShapeError::UnknownKind(s.to_string()))
    }
}

/// Primitive type for shapes created by clicking into the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Box,
    Cylinder,
    Sphere,
}

impl PrimitiveType {
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::Box => "Box",
            PrimitiveType::Cylinder => "Cylinder",
            PrimitiveType::Sphere => "Sphere",
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            PrimitiveType::Box => ShapeKind::Box,
            PrimitiveType::Cylinder => ShapeKind::Cylinder,
            PrimitiveType::Sphere => ShapeKind::Sphere,
        }
    }
}

/// Box dimensions. Width runs along X, depth along Y and height along Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxParams {
    #[serde(rename = "w")]
    pub width: f32,
    #[serde(rename = "h")]
    pub height: f32,
    #[serde(rename = "d")]
    pub depth: f32,
}

impl BoxParams {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Extents along the world axes
    pub fn size(&self) -> Vec3 {
        Vec3::new(self.width, self.depth, self.height)
    }
}

impl Default for BoxParams {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

/// Sphere radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereParams {
    #[serde(rename = "r")]
    pub radius: f32,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self { radius: 0.5 }
    }
}

/// Cylinder along the Z axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CylinderParams {
    #[serde(rename = "r")]
    pub radius: f32,
    #[serde(rename = "h")]
    pub height: f32,
}

impl Default for CylinderParams {
    fn default() -> Self {
        Self {
            radius: 0.5,
            height: 1.0,
        }
    }
}

/// Closed 2-D profile on the ground plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Profile {
    /// Axis-aligned rectangle
    Rectangle { min: Vec2, max: Vec2 },
    /// Circle approximated by a regular polygon when extruded
    Circle { center: Vec2, radius: f32 },
}

impl Profile {
    /// Rectangle spanned by two opposite corners, grown to at least `min_extent` per side
    pub fn rectangle(a: Vec2, b: Vec2, min_extent: f32) -> Self {
        let min = a.min(b);
        let max = a.max(b).max(min + Vec2::splat(min_extent));
        Profile::Rectangle { min, max }
    }

    /// Circle with its radius clamped to at least `min_extent`
    pub fn circle(center: Vec2, radius: f32, min_extent: f32) -> Self {
        Profile::Circle {
            center,
            radius: radius.max(min_extent),
        }
    }

    /// Counter-clockwise outline polygon. Rectangle corners start at `min`.
    pub fn outline(&self) -> Vec<Vec2> {
        match *self {
            Profile::Rectangle { min, max } => vec![
                min,
                Vec2::new(max.x, min.y),
                max,
                Vec2::new(min.x, max.y),
            ],
            Profile::Circle { center, radius } => (0..CIRCLE_PROFILE_SEGMENTS)
                .map(|i| {
                    let theta = (i as f32 / CIRCLE_PROFILE_SEGMENTS as f32) * TAU;
                    center + Vec2::new(theta.cos(), theta.sin()) * radius
                })
                .collect(),
        }
    }

    /// Exact enclosed area
    pub fn area(&self) -> f32 {
        match *self {
            Profile::Rectangle { min, max } => (max.x - min.x) * (max.y - min.y),
            Profile::Circle { radius, .. } => std::f32::consts::PI * radius * radius,
        }
    }

    fn validate(&self) -> Result<(), ShapeError> {
        let ok = match *self {
            Profile::Rectangle { min, max } => {
                min.is_finite() && max.is_finite() && max.x > min.x && max.y > min.y
            }
            Profile::Circle { center, radius } => {
                center.is_finite() && radius.is_finite() && radius > 0.0
            }
        };
        if ok {
            Ok(())
        } else {
            Err(ShapeError::InvalidParams(format!(
                "degenerate profile {self:?}"
            )))
        }
    }
}

/// Parameters of an extruded profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtrudeParams {
    pub profile: Profile,
    pub depth: f32,
}

/// Kind-specific parameters, one variant per [`ShapeKind`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeParams {
    Box(BoxParams),
    Sphere(SphereParams),
    Cylinder(CylinderParams),
    Extrude(ExtrudeParams),
}

impl ShapeParams {
    /// Get the kind these parameters belong to
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeParams::Box(_) => ShapeKind::Box,
            ShapeParams::Sphere(_) => ShapeKind::Sphere,
            ShapeParams::Cylinder(_) => ShapeKind::Cylinder,
            ShapeParams::Extrude(_) => ShapeKind::Extrude,
        }
    }

    /// Parse a wire `kind` string and `params` object
    pub fn from_wire(kind: &str, params: serde_json::Value) -> Result<Self, ShapeError> {
        let kind: ShapeKind = kind.parse()?;
        let parsed = match kind {
            ShapeKind::Box => serde_json::from_value(params).map(ShapeParams::Box),
            ShapeKind::Sphere => serde_json::from_value(params).map(ShapeParams::Sphere),
            ShapeKind::Cylinder => serde_json::from_value(params).map(ShapeParams::Cylinder),
            ShapeKind::Extrude => serde_json::from_value(params).map(ShapeParams::Extrude),
        }
        .map_err(|e| ShapeError::InvalidParams(format!("{kind}: {e}")))?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Serialize to the wire `params` object
    pub fn to_wire(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            ShapeParams::Box(p) => serde_json::to_value(p),
            ShapeParams::Sphere(p) => serde_json::to_value(p),
            ShapeParams::Cylinder(p) => serde_json::to_value(p),
            ShapeParams::Extrude(p) => serde_json::to_value(p),
        }
    }

    /// Check that every dimension is finite and positive
    pub fn validate(&self) -> Result<(), ShapeError> {
        let dims = match self {
            ShapeParams::Box(p) => vec![p.width, p.height, p.depth],
            ShapeParams::Sphere(p) => vec![p.radius],
            ShapeParams::Cylinder(p) => vec![p.radius, p.height],
            ShapeParams::Extrude(p) => {
                p.profile.validate()?;
                vec![p.depth]
            }
        };
        if dims.iter().all(|d| d.is_finite() && *d > 0.0) {
            Ok(())
        } else {
            Err(ShapeError::InvalidParams(format!(
                "{}: dimensions must be positive, got {dims:?}",
                self.kind()
            )))
        }
    }
}

/// Rigid transform with Euler rotation (XYZ order, radians)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Rotation as a quaternion
    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    /// Local-to-world matrix
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }

    /// Overwrite the fields present in `patch`
    pub fn apply(&mut self, patch: &TransformPatch) {
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(scale) = patch.scale {
            self.scale = scale;
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}

/// Partial transform update
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformPatch {
    pub position: Option<Vec3>,
    pub rotation: Option<Vec3>,
    pub scale: Option<Vec3>,
}

impl TransformPatch {
    pub fn position(position: Vec3) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn rotation(rotation: Vec3) -> Self {
        Self {
            rotation: Some(rotation),
            ..Self::default()
        }
    }

    pub fn scale(scale: Vec3) -> Self {
        Self {
            scale: Some(scale),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.rotation.is_none() && self.scale.is_none()
    }
}

/// A placed shape
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub params: ShapeParams,
    pub transform: Transform,
}

impl Shape {
    /// Create a new shape with a fresh id at the given position
    pub fn new(params: ShapeParams, position: Vec3) -> Self {
        Self::with_transform(params, Transform::from_position(position))
    }

    /// Create a new shape with a fresh id and a full transform
    pub fn with_transform(params: ShapeParams, transform: Transform) -> Self {
        Self {
            id: Uuid::new_v4(),
            params,
            transform,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.params.kind()
    }

    /// Local-to-world matrix
    pub fn world_matrix(&self) -> Mat4 {
        self.transform.matrix()
    }
}
