//! Mesh buffer generation
//!
//! Builds the raw vertex/index buffers the rendering layer uploads for each
//! shape kind, plus the line-segment buffers used for edge picking:
//! - Box (one quad per side, split normals)
//! - Cylinder (with end caps)
//! - Sphere (UV sphere)
//! - Extrusion of a sketched profile
//! - Feature edges of any triangle mesh

mod bounds;
mod box_mesh;
mod cylinder;
mod edges;
mod extrude;
mod sphere;

use std::collections::HashMap;

use glam::Vec3;

use crate::constants::VERTEX_WELD_PRECISION;
use crate::shape::ShapeParams;

pub use bounds::BoundingBox;
pub use box_mesh::generate_box_mesh;
pub use cylinder::{generate_cylinder_mesh, generate_cylinder_mesh_with_segments};
pub use edges::feature_edges;
pub use extrude::generate_extrude_mesh;
pub use sphere::{generate_sphere_mesh, generate_sphere_mesh_with_segments};

/// Mesh data: vertices, normals, and triangle indices
pub type MeshData = (Vec<[f32; 3]>, Vec<[f32; 3]>, Vec<u32>);

/// Triangle mesh buffers, optionally indexed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices; without them every three consecutive vertices form a triangle
    pub indices: Option<Vec<u32>>,
}

impl From<MeshData> for MeshBuffers {
    fn from((positions, normals, indices): MeshData) -> Self {
        Self {
            positions,
            normals,
            indices: Some(indices),
        }
    }
}

impl MeshBuffers {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get a vertex position by index
    pub fn vertex(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index).copied().map(Vec3::from)
    }

    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    /// Vertex indices of a triangle
    pub fn triangle_indices(&self, face: usize) -> Option<[usize; 3]> {
        let first = face.checked_mul(3)?;
        let corners = match &self.indices {
            Some(indices) => {
                let tri = indices.get(first..first.checked_add(3)?)?;
                [tri[0] as usize, tri[1] as usize, tri[2] as usize]
            }
            None => [first, first.checked_add(1)?, first.checked_add(2)?],
        };
        corners
            .iter()
            .all(|&i| i < self.positions.len())
            .then_some(corners)
    }

    /// Corner positions of a triangle in local space
    pub fn triangle(&self, face: usize) -> Option<[Vec3; 3]> {
        let [a, b, c] = self.triangle_indices(face)?;
        Some([self.vertex(a)?, self.vertex(b)?, self.vertex(c)?])
    }

    /// Iterate over all triangles in local space
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        (0..self.triangle_count()).filter_map(|face| self.triangle(face))
    }

    /// Expand indexed buffers so that every triangle owns its three vertices
    pub fn to_non_indexed(&self) -> MeshBuffers {
        let Some(indices) = &self.indices else {
            return self.clone();
        };
        let pick = |buffer: &[[f32; 3]]| -> Vec<[f32; 3]> {
            indices
                .iter()
                .filter_map(|&i| buffer.get(i as usize).copied())
                .collect()
        };
        MeshBuffers {
            positions: pick(&self.positions),
            normals: pick(&self.normals),
            indices: None,
        }
    }

    /// Raw position bytes for GPU upload
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw index bytes for GPU upload (empty when not indexed)
    pub fn index_bytes(&self) -> &[u8] {
        self.indices
            .as_deref()
            .map(bytemuck::cast_slice)
            .unwrap_or(&[])
    }

    /// Local-space bounds
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(self.positions.iter().copied().map(Vec3::from))
    }
}

/// Line segments: vertices `2i` and `2i + 1` form segment `i`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineSegments {
    pub positions: Vec<[f32; 3]>,
}

impl LineSegments {
    pub fn segment_count(&self) -> usize {
        self.positions.len() / 2
    }

    pub fn vertex(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index).copied().map(Vec3::from)
    }

    pub fn segment(&self, index: usize) -> Option<(Vec3, Vec3)> {
        Some((self.vertex(index * 2)?, self.vertex(index * 2 + 1)?))
    }

    pub fn push(&mut self, a: Vec3, b: Vec3) {
        self.positions.push(a.to_array());
        self.positions.push(b.to_array());
    }

    /// Raw position bytes for GPU upload
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Local-space bounds
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(self.positions.iter().copied().map(Vec3::from))
    }
}

/// Everything the renderer needs to display and pick one shape
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeMesh {
    pub solid: MeshBuffers,
    pub edges: LineSegments,
}

/// Build the solid mesh for a shape's parameters
pub fn build_solid_mesh(params: &ShapeParams) -> MeshBuffers {
    let data = match params {
        ShapeParams::Box(p) => generate_box_mesh(p.size()),
        ShapeParams::Sphere(p) => generate_sphere_mesh(p.radius),
        ShapeParams::Cylinder(p) => generate_cylinder_mesh(p.radius, p.height),
        ShapeParams::Extrude(p) => generate_extrude_mesh(&p.profile.outline(), p.depth),
    };
    MeshBuffers::from(data)
}

/// Build solid and feature-edge buffers for a shape's parameters
pub fn build_shape_mesh(params: &ShapeParams, feature_edge_angle_deg: f32) -> ShapeMesh {
    let solid = build_solid_mesh(params);
    let edges = feature_edges(&solid, feature_edge_angle_deg);
    ShapeMesh { solid, edges }
}

/// Quantized vertex position, so coincident vertices compare equal
pub(crate) type WeldKey = [i64; 3];

pub(crate) fn weld_key(p: Vec3) -> WeldKey {
    let q = (p * VERTEX_WELD_PRECISION).round();
    [q.x as i64, q.y as i64, q.z as i64]
}

/// Direction-independent key of the edge between two vertices
pub(crate) fn edge_key(a: Vec3, b: Vec3) -> Option<(WeldKey, WeldKey)> {
    let (ka, kb) = (weld_key(a), weld_key(b));
    match ka.cmp(&kb) {
        std::cmp::Ordering::Less => Some((ka, kb)),
        std::cmp::Ordering::Greater => Some((kb, ka)),
        std::cmp::Ordering::Equal => None,
    }
}

/// Triangles sharing each welded edge, in triangle order
pub(crate) fn edge_adjacency(
    triangles: &[[Vec3; 3]],
) -> HashMap<(WeldKey, WeldKey), Vec<usize>> {
    let mut adjacency: HashMap<_, Vec<usize>> = HashMap::new();
    for (i, [a, b, c]) in triangles.iter().enumerate() {
        for (p, q) in [(a, b), (b, c), (c, a)] {
            if let Some(key) = edge_key(*p, *q) {
                adjacency.entry(key).or_default().push(i);
            }
        }
    }
    adjacency
}
