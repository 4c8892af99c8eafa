//! Global constants for sb-core

/// Default number of segments for cylinder mesh generation
pub const CYLINDER_SEGMENTS: u32 = 32;

/// Default number of latitude segments for sphere mesh generation
pub const SPHERE_LAT_SEGMENTS: u32 = 16;

/// Default number of longitude segments for sphere mesh generation
pub const SPHERE_LON_SEGMENTS: u32 = 32;

/// Number of polygon segments used to approximate a circular sketch profile
pub const CIRCLE_PROFILE_SEGMENTS: u32 = 32;

/// Extrusion depth used when committing a sketch
pub const DEFAULT_EXTRUDE_DEPTH: f32 = 1.0;

/// Smallest width, height or radius a sketched profile may have
pub const MIN_PROFILE_EXTENT: f32 = 0.01;

/// Default grid snapping increment
pub const DEFAULT_SNAP_STEP: f32 = 0.5;

/// Angle (degrees) above which a shared triangle edge counts as a feature edge
pub const FEATURE_EDGE_ANGLE_DEG: f32 = 1.0;

/// Vertex position precision used when welding edges (multiply, then round)
pub const VERTEX_WELD_PRECISION: f32 = 10000.0;

/// Tolerance for treating two triangles as lying on the same plane
pub const COPLANAR_TOLERANCE: f32 = 1e-4;
