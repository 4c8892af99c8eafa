//! Cylinder mesh generation (with end caps)

use std::f32::consts::TAU;

use glam::Vec3;

use super::MeshData;

/// Generate a cylinder along the Z axis, centered on the origin
///
/// # Arguments
/// * `radius` - Cylinder radius
/// * `height` - Extent along Z
pub fn generate_cylinder_mesh(radius: f32, height: f32) -> MeshData {
    use crate::constants::CYLINDER_SEGMENTS;
    generate_cylinder_mesh_with_segments(radius, height, CYLINDER_SEGMENTS)
}

/// Generate a cylinder with custom segment count
pub fn generate_cylinder_mesh_with_segments(radius: f32, height: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let half = height / 2.0;
    let rim = |i: u32| {
        let theta = (i as f32 / segments as f32) * TAU;
        Vec3::new(theta.cos(), theta.sin(), 0.0)
    };

    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    // Side: bottom/top vertex pairs, seam duplicated at the end
    for i in 0..=segments {
        let dir = rim(i);
        vertices.push((dir * radius - Vec3::Z * half).to_array());
        vertices.push((dir * radius + Vec3::Z * half).to_array());
        normals.push(dir.to_array());
        normals.push(dir.to_array());
    }
    for i in 0..segments {
        let base = i * 2;
        indices.extend_from_slice(&[base, base + 2, base + 1, base + 1, base + 2, base + 3]);
    }

    // Caps: a center vertex fanned to its own rim ring
    for (z, normal) in [(half, Vec3::Z), (-half, Vec3::NEG_Z)] {
        let center = vertices.len() as u32;
        vertices.push([0.0, 0.0, z]);
        normals.push(normal.to_array());
        for i in 0..=segments {
            vertices.push((rim(i) * radius + Vec3::Z * z).to_array());
            normals.push(normal.to_array());
        }
        let first = center + 1;
        for i in 0..segments {
            if normal.z > 0.0 {
                indices.extend_from_slice(&[center, first + i, first + i + 1]);
            } else {
                indices.extend_from_slice(&[center, first + i + 1, first + i]);
            }
        }
    }

    (vertices, normals, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cylinder_extent() {
        let (vertices, normals, indices) = generate_cylinder_mesh_with_segments(0.5, 2.0, 8);
        assert_eq!(vertices.len(), normals.len());
        assert_eq!(indices.len() / 3, 8 * 4);
        let max_z = vertices.iter().map(|v| v[2]).fold(f32::MIN, f32::max);
        let min_z = vertices.iter().map(|v| v[2]).fold(f32::MAX, f32::min);
        assert_eq!((min_z, max_z), (-1.0, 1.0));
    }
}
