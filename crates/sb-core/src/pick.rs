//! Picking and selection resolution
//!
//! Turns the ordered hit list of a ray cast into a typed [`Selection`] plus the
//! highlight the viewport should draw for it. Face and edge measurements are
//! derived from the raw mesh buffers of the hit shape.

use std::collections::VecDeque;

use glam::{Mat4, Vec3};

use crate::constants::COPLANAR_TOLERANCE;
use crate::mesh::{BoundingBox, LineSegments, MeshBuffers, edge_adjacency, edge_key};
use crate::selection::{Selection, SelectionTarget};
use crate::shape::{Shape, ShapeId};
use crate::store::EntityStore;

/// What the ray hit
#[derive(Debug, Clone, Copy)]
pub enum HitTarget<'a> {
    /// The solid mesh, with the index of the triangle hit if known
    Face {
        mesh: &'a MeshBuffers,
        face_index: Option<usize>,
    },
    /// The edge line segments drawn over the solid
    Edge { lines: &'a LineSegments },
}

impl HitTarget<'_> {
    fn local_bounds(&self) -> BoundingBox {
        match self {
            HitTarget::Face { mesh, .. } => mesh.bounds(),
            HitTarget::Edge { lines } => lines.bounds(),
        }
    }
}

/// One entry of a ray cast, nearest first
#[derive(Debug, Clone, Copy)]
pub struct RayHit<'a> {
    /// Owning shape, if the hit object belongs to one
    pub entity: Option<ShapeId>,
    /// World-space hit point
    pub point: Vec3,
    pub target: HitTarget<'a>,
}

/// Overlay drawn for the current selection, in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Highlight {
    Outline { bounds: BoundingBox },
    Segment { a: Vec3, b: Vec3 },
    Triangle { a: Vec3, b: Vec3, c: Vec3 },
}

/// A resolved pick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pick {
    pub selection: Selection,
    pub highlight: Highlight,
}

/// Resolve a hit list into a selection for the given target mode
///
/// Returns `None` when no hit matches, which clears the selection.
pub fn resolve_pick(
    hits: &[RayHit<'_>],
    target: SelectionTarget,
    store: &EntityStore,
) -> Option<Pick> {
    match target {
        SelectionTarget::Shape => hits.iter().find_map(|hit| pick_shape(hit, store)),
        SelectionTarget::Face => hits.iter().find_map(|hit| pick_face(hit, store)),
        SelectionTarget::Edge => hits.iter().find_map(|hit| pick_edge(hit, store)),
    }
}

fn owner<'s>(hit: &RayHit<'_>, store: &'s EntityStore) -> Option<&'s Shape> {
    hit.entity.and_then(|id| store.get(id))
}

fn pick_shape(hit: &RayHit<'_>, store: &EntityStore) -> Option<Pick> {
    let shape = owner(hit, store)?;
    let bounds = hit.target.local_bounds().transform(&shape.world_matrix());
    Some(Pick {
        selection: Selection::shape(shape.id),
        highlight: Highlight::Outline { bounds },
    })
}

fn pick_edge(hit: &RayHit<'_>, store: &EntityStore) -> Option<Pick> {
    let HitTarget::Edge { lines } = hit.target else {
        return None;
    };
    let shape = owner(hit, store)?;
    let (a, b) = nearest_segment(lines, &shape.world_matrix(), hit.point)?;
    Some(Pick {
        selection: Selection::Edge {
            id: shape.id,
            a,
            b,
            length: a.distance(b),
        },
        highlight: Highlight::Segment { a, b },
    })
}

fn pick_face(hit: &RayHit<'_>, store: &EntityStore) -> Option<Pick> {
    let HitTarget::Face {
        mesh,
        face_index: Some(face),
    } = hit.target
    else {
        return None;
    };
    let shape = owner(hit, store)?;
    let feature = face_feature(mesh, face, &shape.world_matrix())?;
    let [a, b, c] = feature.vertices;
    Some(Pick {
        selection: Selection::Face {
            id: shape.id,
            normal: feature.normal,
            area: feature.area,
        },
        highlight: Highlight::Triangle { a, b, c },
    })
}

/// World-space endpoints of the segment nearest to `point`
///
/// The nearest vertex index is rounded down to even and paired with the next
/// index, clamped to the buffer.
pub fn nearest_segment(lines: &LineSegments, world: &Mat4, point: Vec3) -> Option<(Vec3, Vec3)> {
    let nearest = lines
        .positions
        .iter()
        .map(|p| world.transform_point3(Vec3::from(*p)).distance_squared(point))
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))?
        .0;
    let start = nearest & !1;
    let end = (start + 1).min(lines.positions.len() - 1);
    Some((
        world.transform_point3(lines.vertex(start)?),
        world.transform_point3(lines.vertex(end)?),
    ))
}

/// Measurements of a picked face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceFeature {
    /// The hit triangle in world space
    pub vertices: [Vec3; 3],
    pub normal: Vec3,
    /// Area of the hit triangle alone
    pub triangle_area: f32,
    /// Area of the connected coplanar region around the hit triangle
    pub area: f32,
}

/// Measure triangle `face` of `mesh` under the `world` transform
pub fn face_feature(mesh: &MeshBuffers, face: usize, world: &Mat4) -> Option<FaceFeature> {
    let vertices = mesh.triangle(face)?.map(|v| world.transform_point3(v));
    let [a, b, c] = vertices;
    let cross = (b - a).cross(c - a);
    let triangle_area = 0.5 * cross.length();
    let normal = cross.normalize_or_zero();
    let area = if normal == Vec3::ZERO {
        triangle_area
    } else {
        coplanar_area(mesh, face, world, normal, a)
    };
    Some(FaceFeature {
        vertices,
        normal,
        triangle_area,
        area,
    })
}

/// Flood over triangles sharing welded edges and lying in the seed's plane
fn coplanar_area(mesh: &MeshBuffers, seed: usize, world: &Mat4, normal: Vec3, origin: Vec3) -> f32 {
    // Indexed by face; out-of-range triangles collapse to a point and never connect
    let local: Vec<[Vec3; 3]> = (0..mesh.triangle_count())
        .map(|face| mesh.triangle(face).unwrap_or([Vec3::ZERO; 3]))
        .collect();
    let placed: Vec<[Vec3; 3]> = local
        .iter()
        .map(|tri| tri.map(|v| world.transform_point3(v)))
        .collect();
    let in_plane = |tri: &[Vec3; 3]| {
        let n = (tri[1] - tri[0]).cross(tri[2] - tri[0]).normalize_or_zero();
        n.dot(normal) >= 1.0 - COPLANAR_TOLERANCE
            && tri
                .iter()
                .all(|p| (*p - origin).dot(normal).abs() <= COPLANAR_TOLERANCE)
    };
    let adjacency = edge_adjacency(&local);

    let mut visited = vec![false; local.len()];
    let mut queue = VecDeque::from([seed]);
    visited[seed] = true;
    let mut area = 0.0;
    while let Some(i) = queue.pop_front() {
        let [a, b, c] = placed[i];
        area += 0.5 * (b - a).cross(c - a).length();

        let [p, q, r] = local[i];
        for key in [edge_key(p, q), edge_key(q, r), edge_key(r, p)]
            .into_iter()
            .flatten()
        {
            for &j in adjacency.get(&key).into_iter().flatten() {
                if !visited[j] && in_plane(&placed[j]) {
                    visited[j] = true;
                    queue.push_back(j);
                }
            }
        }
    }
    area
}
