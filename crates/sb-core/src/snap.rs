//! Grid snapping

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SNAP_STEP;

/// Quantize `value` to the nearest multiple of `step`
///
/// A non-positive or non-finite step leaves the value untouched.
pub fn quantize(value: f32, step: f32) -> f32 {
    if !(step.is_finite() && step > 0.0) {
        return value;
    }
    (value / step).round() * step
}

/// Global snapping switch and grid increment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snap {
    pub enabled: bool,
    pub step: f32,
}

impl Default for Snap {
    fn default() -> Self {
        Self {
            enabled: true,
            step: DEFAULT_SNAP_STEP,
        }
    }
}

impl Snap {
    pub fn new(enabled: bool, step: f32) -> Self {
        Self { enabled, step }
    }

    /// Snapping disabled
    pub fn off() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Snap a scalar if enabled
    pub fn value(&self, value: f32) -> f32 {
        if self.enabled {
            quantize(value, self.step)
        } else {
            value
        }
    }

    /// Snap a ground-plane point if enabled
    pub fn point2(&self, point: Vec2) -> Vec2 {
        Vec2::new(self.value(point.x), self.value(point.y))
    }

    /// Snap a world point if enabled
    pub fn point3(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            self.value(point.x),
            self.value(point.y),
            self.value(point.z),
        )
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Set the grid increment; rejects non-positive steps
    pub fn set_step(&mut self, step: f32) -> bool {
        if step.is_finite() && step > 0.0 {
            self.step = step;
            true
        } else {
            tracing::warn!("Ignoring invalid snap step {}", step);
            false
        }
    }
}
