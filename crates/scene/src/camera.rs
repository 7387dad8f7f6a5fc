//! First-person camera parameters.

use serde::{Deserialize, Serialize};

/// Projection parameters of a camera node.
///
/// The camera's placement comes from its node; this only describes how the
/// view is projected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Field of view in degrees.
    pub fov: f32,

    /// Near clipping plane.
    pub z_near: f32,

    /// Far clipping plane.
    pub z_far: f32,

    /// Aspect ratio (width / height).
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov: 75.0,
            z_near: 0.025,
            z_far: 1000.0,
            aspect: 16.0 / 9.0,
        }
    }
}
