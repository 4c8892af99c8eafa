//! Box mesh generation

use glam::Vec3;

use super::MeshData;

/// Generate a box centered on the origin
///
/// `size` holds the extents along X, Y and Z. Every side gets its own four
/// vertices so normals stay flat: 24 vertices, 12 triangles.
pub fn generate_box_mesh(size: Vec3) -> MeshData {
    let half = size * 0.5;

    let mut vertices = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for axis in 0..3 {
        for sign in [1.0f32, -1.0] {
            let normal = Vec3::AXES[axis] * sign;
            // (u, v) span the side with u x v == normal
            let (u, v) = {
                let a = Vec3::AXES[(axis + 1) % 3];
                let b = Vec3::AXES[(axis + 2) % 3];
                if sign > 0.0 { (a, b) } else { (b, a) }
            };
            let center = normal * half[axis];
            let du = u * half.dot(u);
            let dv = v * half.dot(v);

            let base = vertices.len() as u32;
            for corner in [
                center - du - dv,
                center + du - dv,
                center + du + dv,
                center - du + dv,
            ] {
                vertices.push(corner.to_array());
                normals.push(normal.to_array());
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }

    (vertices, normals, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_normals_match_winding() {
        let (vertices, normals, indices) = generate_box_mesh(Vec3::new(1.0, 2.0, 3.0));
        for tri in indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from(vertices[i as usize]));
            let n = (b - a).cross(c - a).normalize();
            assert!(n.abs_diff_eq(Vec3::from(normals[tri[0] as usize]), 1e-6));
        }
    }

    #[test]
    fn test_box_corners() {
        let (vertices, _, _) = generate_box_mesh(Vec3::new(2.0, 4.0, 6.0));
        for v in vertices {
            assert_eq!(v.map(f32::abs), [1.0, 2.0, 3.0]);
        }
    }
}
