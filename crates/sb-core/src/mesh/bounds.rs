//! Axis-aligned bounds, used for selection outlines

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned box. `min > max` on any axis means empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self::new(Vec3::INFINITY, Vec3::NEG_INFINITY)
    }

    /// Smallest box containing all points; empty when there are none
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points.into_iter().fold(Self::empty(), |acc, p| {
            Self::new(acc.min.min(p), acc.max.max(p))
        })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// The eight corners, min first, max last
    pub fn corners(&self) -> [Vec3; 8] {
        std::array::from_fn(|i| {
            Vec3::select(
                glam::BVec3::new(i & 1 != 0, i & 2 != 0, i & 4 != 0),
                self.max,
                self.min,
            )
        })
    }

    /// Axis-aligned box around the transformed corners
    ///
    /// May be larger than the tight bounds of the transformed geometry.
    pub fn transform(&self, transform: &Mat4) -> BoundingBox {
        if !self.is_valid() {
            return *self;
        }
        BoundingBox::from_points(self.corners().map(|c| transform.transform_point3(c)))
    }

    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all()
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}
