//! Physics configuration constants.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Configuration for the physics world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity acceleration (units/second²).
    pub gravity: Vec3,

    /// Duration of one step (seconds). Accelerations are scaled by its square.
    pub time_step: f32,

    /// Distance at which touching geometry is reported as a contact even
    /// without penetration.
    pub contact_margin: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            time_step: 1.0 / 60.0,
            contact_margin: 0.005,
        }
    }
}

impl PhysicsConfig {
    /// Gravity converted to a per-step velocity change.
    pub fn gravity_per_step(&self) -> Vec3 {
        self.gravity * self.time_step * self.time_step
    }
}
