//! Feature-edge extraction
//!
//! Keeps the edges where the surface creases: the welded edge is emitted when
//! its adjacent face normals differ by at least the threshold angle, or when
//! it borders a single face.

use std::collections::HashMap;

use glam::Vec3;

use super::{LineSegments, MeshBuffers, WeldKey, edge_key};

struct EdgeRecord {
    a: Vec3,
    b: Vec3,
    normals: Vec<Vec3>,
}

impl EdgeRecord {
    fn is_feature(&self, cos_threshold: f32) -> bool {
        match self.normals.as_slice() {
            [] => false,
            [_] => true,
            [first, rest @ ..] => rest.iter().any(|n| first.dot(*n) <= cos_threshold),
        }
    }
}

/// Extract feature edges of a triangle mesh
///
/// Degenerate triangles are ignored. Output follows the order in which edges
/// are first met while walking the triangles, so it is deterministic.
pub fn feature_edges(mesh: &MeshBuffers, threshold_deg: f32) -> LineSegments {
    let cos_threshold = threshold_deg.to_radians().cos();
    let mut lookup: HashMap<(WeldKey, WeldKey), usize> = HashMap::new();
    let mut records: Vec<EdgeRecord> = Vec::new();

    for [a, b, c] in mesh.triangles() {
        let normal = (b - a).cross(c - a);
        if normal.length_squared() <= f32::EPSILON * f32::EPSILON {
            continue;
        }
        let normal = normal.normalize();

        for (p, q) in [(a, b), (b, c), (c, a)] {
            let Some(key) = edge_key(p, q) else {
                continue;
            };
            match lookup.get(&key) {
                Some(&index) => records[index].normals.push(normal),
                None => {
                    lookup.insert(key, records.len());
                    records.push(EdgeRecord {
                        a: p,
                        b: q,
                        normals: vec![normal],
                    });
                }
            }
        }
    }

    let mut lines = LineSegments::default();
    for record in records.iter().filter(|r| r.is_feature(cos_threshold)) {
        lines.push(record.a, record.b);
    }
    lines
}
