//! Editor configuration
//!
//! Settings that can be serialized to and loaded from a RON file. Missing
//! sections fall back to their defaults, so partial files are valid.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{DEFAULT_EXTRUDE_DEPTH, FEATURE_EDGE_ANGLE_DEG, MIN_PROFILE_EXTENT};
use crate::history::HistoryPolicy;
use crate::shape::{BoxParams, CylinderParams, PrimitiveType, ShapeParams, SphereParams};
use crate::snap::Snap;

/// Configuration-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

/// Dimensions of primitives created by clicking into the scene
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PrimitiveDefaults {
    #[serde(default, rename = "box")]
    pub box_params: BoxParams,
    #[serde(default)]
    pub sphere: SphereParams,
    #[serde(default)]
    pub cylinder: CylinderParams,
}

impl PrimitiveDefaults {
    /// Parameters for a new primitive of the given type
    pub fn params_for(&self, primitive: PrimitiveType) -> ShapeParams {
        match primitive {
            PrimitiveType::Box => ShapeParams::Box(self.box_params),
            PrimitiveType::Sphere => ShapeParams::Sphere(self.sphere),
            PrimitiveType::Cylinder => ShapeParams::Cylinder(self.cylinder),
        }
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditorConfig {
    /// Grid snapping
    #[serde(default)]
    pub snap: Snap,
    /// Depth of extrusions created from a sketch
    #[serde(default = "default_extrude_depth")]
    pub extrude_depth: f32,
    /// Smallest sketched rectangle side or circle radius
    #[serde(default = "default_min_profile_extent")]
    pub min_profile_extent: f32,
    /// How gizmo drags are recorded in the undo history
    #[serde(default)]
    pub history: HistoryPolicy,
    /// Primitive dimensions
    #[serde(default)]
    pub primitives: PrimitiveDefaults,
    /// Crease angle (degrees) for edge extraction
    #[serde(default = "default_feature_edge_angle")]
    pub feature_edge_angle: f32,
}

fn default_extrude_depth() -> f32 {
    DEFAULT_EXTRUDE_DEPTH
}

fn default_min_profile_extent() -> f32 {
    MIN_PROFILE_EXTENT
}

fn default_feature_edge_angle() -> f32 {
    FEATURE_EDGE_ANGLE_DEG
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap: Snap::default(),
            extrude_depth: DEFAULT_EXTRUDE_DEPTH,
            min_profile_extent: MIN_PROFILE_EXTENT,
            history: HistoryPolicy::default(),
            primitives: PrimitiveDefaults::default(),
            feature_edge_angle: FEATURE_EDGE_ANGLE_DEG,
        }
    }
}

impl EditorConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace out-of-range values with their defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !positive(self.snap.step) {
            warn!("Invalid snap step {}, using default", self.snap.step);
            self.snap.step = defaults.snap.step;
        }
        if !positive(self.extrude_depth) {
            warn!("Invalid extrude depth {}, using default", self.extrude_depth);
            self.extrude_depth = defaults.extrude_depth;
        }
        if !positive(self.min_profile_extent) {
            warn!(
                "Invalid minimum profile extent {}, using default",
                self.min_profile_extent
            );
            self.min_profile_extent = defaults.min_profile_extent;
        }
        if !(self.feature_edge_angle.is_finite() && (0.0..180.0).contains(&self.feature_edge_angle))
        {
            warn!(
                "Invalid feature edge angle {}, using default",
                self.feature_edge_angle
            );
            self.feature_edge_angle = defaults.feature_edge_angle;
        }
        for primitive in [PrimitiveType::Box, PrimitiveType::Sphere, PrimitiveType::Cylinder] {
            if let Err(e) = self.primitives.params_for(primitive).validate() {
                warn!("{}, using default {} size", e, primitive.name());
                match primitive {
                    PrimitiveType::Box => self.primitives.box_params = BoxParams::default(),
                    PrimitiveType::Sphere => self.primitives.sphere = SphereParams::default(),
                    PrimitiveType::Cylinder => {
                        self.primitives.cylinder = CylinderParams::default()
                    }
                }
            }
        }
        self
    }

    /// Parse a RON document
    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig =
            ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        Ok(config.sanitized())
    }

    /// Serialize to a pretty-printed RON document
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Load configuration from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = self.to_ron_string()?;
        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Io(e.to_string()))
    }
}
