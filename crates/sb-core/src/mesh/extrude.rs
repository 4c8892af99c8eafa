//! Extruded profile mesh generation
//!
//! The profile lies on the ground plane (z = 0) and is swept along +Z.

use glam::{Vec2, Vec3};

use super::MeshData;

/// Generate a prism from a counter-clockwise outline and a depth
///
/// Caps are fan-triangulated from the first outline vertex, which is exact for
/// the convex profiles the sketch tool produces. Each side is its own quad.
pub fn generate_extrude_mesh(outline: &[Vec2], depth: f32) -> MeshData {
    let n = outline.len();
    let mut vertices = Vec::with_capacity(n * 6);
    let mut normals = Vec::with_capacity(n * 6);
    let mut indices = Vec::new();
    if n < 3 {
        return (vertices, normals, indices);
    }

    // Bottom cap faces down, top cap faces up
    for (z, normal) in [(0.0, Vec3::NEG_Z), (depth, Vec3::Z)] {
        let base = vertices.len() as u32;
        for p in outline {
            vertices.push([p.x, p.y, z]);
            normals.push(normal.to_array());
        }
        for i in 1..(n as u32 - 1) {
            if normal.z > 0.0 {
                indices.extend_from_slice(&[base, base + i, base + i + 1]);
            } else {
                indices.extend_from_slice(&[base, base + i + 1, base + i]);
            }
        }
    }

    for i in 0..n {
        let a = outline[i];
        let b = outline[(i + 1) % n];
        let edge = b - a;
        let normal = Vec3::new(edge.y, -edge.x, 0.0).normalize_or_zero();

        let base = vertices.len() as u32;
        for corner in [
            a.extend(0.0),
            b.extend(0.0),
            b.extend(depth),
            a.extend(depth),
        ] {
            vertices.push(corner.to_array());
            normals.push(normal.to_array());
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (vertices, normals, indices)
}
