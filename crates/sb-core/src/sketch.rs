//! Sketch and extrude pipeline
//!
//! Ground-plane pointer drags become a 2-D profile; committing the sketch
//! extrudes the profile into a new shape. The live profile survives the end of
//! a stroke so the user can still extrude or discard it.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::constants::DEFAULT_EXTRUDE_DEPTH;
use crate::shape::{ExtrudeParams, Profile, ShapeId, ShapeParams};
use crate::snap::Snap;
use crate::store::EntityStore;

/// Profile shape being drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SketchMode {
    Rectangle,
    Circle,
}

impl SketchMode {
    pub fn name(&self) -> &'static str {
        match self {
            SketchMode::Rectangle => "Rectangle",
            SketchMode::Circle => "Circle",
        }
    }

    fn profile(&self, start: Vec2, current: Vec2, min_extent: f32) -> Profile {
        match self {
            SketchMode::Rectangle => Profile::rectangle(start, current, min_extent),
            SketchMode::Circle => Profile::circle(start, start.distance(current), min_extent),
        }
    }
}

/// Whether a stroke is in progress
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SketchPhase {
    #[default]
    Idle,
    Drawing { mode: SketchMode, start: Vec2 },
}

/// Sketch state: the stroke phase, the live profile and every earlier preview
#[derive(Debug, Clone, Default)]
pub struct SketchState {
    phase: SketchPhase,
    live_profile: Option<Profile>,
    retained_previews: Vec<Profile>,
}

impl SketchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a stroke at a (snapped) ground point
    pub fn start(&mut self, mode: SketchMode, ground_point: Vec2, snap: &Snap, min_extent: f32) {
        let start = snap.point2(ground_point);
        self.phase = SketchPhase::Drawing { mode, start };
        self.replace_live(mode.profile(start, start, min_extent));
        debug!("Sketch {} started at {}", mode.name(), start);
    }

    /// Recompute the live profile from the (snapped) pointer position
    ///
    /// The previous preview is kept in the retained list. Returns the new
    /// profile, or `None` when no stroke is in progress.
    pub fn update_preview(
        &mut self,
        ground_point: Vec2,
        snap: &Snap,
        min_extent: f32,
    ) -> Option<Profile> {
        let SketchPhase::Drawing { mode, start } = self.phase else {
            return None;
        };
        let profile = mode.profile(start, snap.point2(ground_point), min_extent);
        self.replace_live(profile);
        Some(profile)
    }

    /// End the stroke, keeping the live profile for a later commit
    pub fn finish_stroke(&mut self) {
        self.phase = SketchPhase::Idle;
    }

    /// Extrude the most recent profile into a new shape at the origin
    ///
    /// Uses the live profile, or the last retained preview when there is none.
    /// All sketch state is cleared afterwards. Returns `None` when there was
    /// nothing to extrude.
    pub fn commit(&mut self, store: &mut EntityStore, depth: f32) -> Option<ShapeId> {
        let Some(profile) = self
            .live_profile
            .or_else(|| self.retained_previews.last().copied())
        else {
            debug!("Nothing to extrude");
            return None;
        };
        let depth = if depth.is_finite() && depth > 0.0 {
            depth
        } else {
            warn!(
                "Invalid extrude depth {}, using {}",
                depth, DEFAULT_EXTRUDE_DEPTH
            );
            DEFAULT_EXTRUDE_DEPTH
        };

        let id = store.create(
            ShapeParams::Extrude(ExtrudeParams { profile, depth }),
            Vec3::ZERO,
        );
        info!(
            "Extruded sketch into {} ({} previews discarded)",
            id,
            self.retained_previews.len()
        );
        self.clear();
        Some(id)
    }

    /// Discard all sketch state without creating anything
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn replace_live(&mut self, profile: Profile) {
        if let Some(previous) = self.live_profile.replace(profile) {
            self.retained_previews.push(previous);
        }
    }

    pub fn phase(&self) -> SketchPhase {
        self.phase
    }

    /// Whether a stroke is in progress
    pub fn is_active(&self) -> bool {
        matches!(self.phase, SketchPhase::Drawing { .. })
    }

    pub fn live_profile(&self) -> Option<&Profile> {
        self.live_profile.as_ref()
    }

    pub fn retained_previews(&self) -> &[Profile] {
        &self.retained_previews
    }

    /// Whether there is anything a commit would extrude
    pub fn has_profile(&self) -> bool {
        self.live_profile.is_some() || !self.retained_previews.is_empty()
    }
}

/// Intersect a ray with the ground plane (z = 0)
///
/// Returns the sketch coordinate of the hit, or `None` when the ray is
/// parallel to the plane or points away from it.
pub fn ground_point(ray_origin: Vec3, ray_dir: Vec3) -> Option<Vec2> {
    ray_plane_intersection(ray_origin, ray_dir, Vec3::ZERO, Vec3::Z).map(|p| p.truncate())
}

fn ray_plane_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    plane_point: Vec3,
    plane_normal: Vec3,
) -> Option<Vec3> {
    let denom = ray_dir.dot(plane_normal);
    if denom.abs() < 1e-6 {
        return None;
    }

    let t = (plane_point - ray_origin).dot(plane_normal) / denom;
    if t < 0.0 {
        return None;
    }

    Some(ray_origin + ray_dir * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MIN_PROFILE_EXTENT;
    use crate::shape::ShapeKind;
    use approx::assert_relative_eq;

    #[test]
    fn test_snapped_rectangle_extrusion() {
        let mut store = EntityStore::new();
        let mut sketch = SketchState::new();
        let snap = Snap::new(true, 0.1);

        sketch.start(SketchMode::Rectangle, Vec2::ZERO, &snap, MIN_PROFILE_EXTENT);
        sketch.update_preview(Vec2::new(2.03, 0.97), &snap, MIN_PROFILE_EXTENT);
        let id = sketch.commit(&mut store, 1.0).unwrap();

        let shape = store.get(id).unwrap();
        assert_eq!(shape.kind(), ShapeKind::Extrude);
        assert_eq!(shape.transform.position, Vec3::ZERO);
        let ShapeParams::Extrude(params) = shape.params else {
            panic!("expected extrusion");
        };
        assert_eq!(
            params.profile.outline(),
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(2.0, 0.0),
                Vec2::new(2.0, 1.0),
                Vec2::new(0.0, 1.0)
            ]
        );
        assert!(!sketch.has_profile());
        assert!(!sketch.is_active());
    }

    #[test]
    fn test_every_preview_is_retained_until_commit() {
        let mut store = EntityStore::new();
        let mut sketch = SketchState::new();
        let snap = Snap::off();

        sketch.start(SketchMode::Circle, Vec2::ZERO, &snap, MIN_PROFILE_EXTENT);
        for x in [0.5, 1.0, 1.5] {
            sketch.update_preview(Vec2::new(x, 0.0), &snap, MIN_PROFILE_EXTENT);
        }
        assert_eq!(sketch.retained_previews().len(), 3);
        assert_eq!(
            sketch.live_profile(),
            Some(&Profile::Circle {
                center: Vec2::ZERO,
                radius: 1.5
            })
        );

        sketch.commit(&mut store, 1.0).unwrap();
        assert!(sketch.retained_previews().is_empty());
        assert!(sketch.live_profile().is_none());
    }

    #[test]
    fn test_circle_radius_is_clamped() {
        let mut sketch = SketchState::new();
        let snap = Snap::off();
        sketch.start(SketchMode::Circle, Vec2::ONE, &snap, MIN_PROFILE_EXTENT);
        let profile = sketch
            .update_preview(Vec2::ONE, &snap, MIN_PROFILE_EXTENT)
            .unwrap();
        assert_eq!(
            profile,
            Profile::Circle {
                center: Vec2::ONE,
                radius: MIN_PROFILE_EXTENT
            }
        );
    }

    #[test]
    fn test_profile_survives_end_of_stroke() {
        let mut store = EntityStore::new();
        let mut sketch = SketchState::new();
        let snap = Snap::off();
        sketch.start(SketchMode::Rectangle, Vec2::ZERO, &snap, MIN_PROFILE_EXTENT);
        sketch.update_preview(Vec2::new(1.0, 1.0), &snap, MIN_PROFILE_EXTENT);
        sketch.finish_stroke();

        assert!(!sketch.is_active());
        assert!(sketch.update_preview(Vec2::new(5.0, 5.0), &snap, MIN_PROFILE_EXTENT).is_none());
        let id = sketch.commit(&mut store, 2.0).unwrap();
        let ShapeParams::Extrude(params) = store.get(id).unwrap().params else {
            panic!("expected extrusion");
        };
        assert_relative_eq!(params.profile.area(), 1.0);
        assert_eq!(params.depth, 2.0);
    }

    #[test]
    fn test_clear_creates_nothing() {
        let mut store = EntityStore::new();
        let mut sketch = SketchState::new();
        let snap = Snap::default();
        sketch.start(SketchMode::Rectangle, Vec2::ZERO, &snap, MIN_PROFILE_EXTENT);
        sketch.update_preview(Vec2::new(3.0, 3.0), &snap, MIN_PROFILE_EXTENT);
        sketch.clear();

        assert!(sketch.commit(&mut store, 1.0).is_none());
        assert!(store.is_empty());
        assert_eq!(sketch.phase(), SketchPhase::Idle);
    }

    #[test]
    fn test_invalid_depth_falls_back_to_default() {
        let mut store = EntityStore::new();
        let mut sketch = SketchState::new();
        sketch.start(SketchMode::Rectangle, Vec2::ZERO, &Snap::off(), 1.0);
        let id = sketch.commit(&mut store, 0.0).unwrap();
        let ShapeParams::Extrude(params) = store.get(id).unwrap().params else {
            panic!("expected extrusion");
        };
        assert_eq!(params.depth, DEFAULT_EXTRUDE_DEPTH);
    }

    #[test]
    fn test_ground_point() {
        let p = ground_point(Vec3::new(1.0, 2.0, 5.0), Vec3::new(0.0, 0.0, -1.0)).unwrap();
        assert_eq!(p, Vec2::new(1.0, 2.0));
        assert!(ground_point(Vec3::new(0.0, 0.0, 5.0), Vec3::X).is_none());
        assert!(ground_point(Vec3::new(0.0, 0.0, 5.0), Vec3::Z).is_none());
    }
}
