//! Sphere mesh generation (UV sphere)

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::MeshData;

/// Generate a UV sphere centered on the origin with its poles on the Z axis
pub fn generate_sphere_mesh(radius: f32) -> MeshData {
    use crate::constants::{SPHERE_LAT_SEGMENTS, SPHERE_LON_SEGMENTS};
    generate_sphere_mesh_with_segments(radius, SPHERE_LAT_SEGMENTS, SPHERE_LON_SEGMENTS)
}

/// Generate a UV sphere with custom resolution
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `lat_segments` - Number of latitude bands
/// * `lon_segments` - Number of longitude segments
///
/// The bands touching a pole only emit their non-degenerate triangle, so every
/// triangle has a well-defined normal.
pub fn generate_sphere_mesh_with_segments(
    radius: f32,
    lat_segments: u32,
    lon_segments: u32,
) -> MeshData {
    let lat_segments = lat_segments.max(2);
    let lon_segments = lon_segments.max(3);
    let ring = lon_segments + 1;

    let mut vertices = Vec::with_capacity(((lat_segments + 1) * ring) as usize);
    let mut normals = Vec::with_capacity(vertices.capacity());
    let mut indices = Vec::new();

    for lat in 0..=lat_segments {
        let theta = (lat as f32 / lat_segments as f32) * PI;
        for lon in 0..=lon_segments {
            let phi = (lon as f32 / lon_segments as f32) * TAU;
            let n = Vec3::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos());
            vertices.push((n * radius).to_array());
            normals.push(n.to_array());
        }
    }

    for lat in 0..lat_segments {
        for lon in 0..lon_segments {
            let current = lat * ring + lon;
            let next = current + ring;

            if lat != 0 {
                indices.extend_from_slice(&[current, next, current + 1]);
            }
            if lat != lat_segments - 1 {
                indices.extend_from_slice(&[current + 1, next, next + 1]);
            }
        }
    }

    (vertices, normals, indices)
}
