//! Ray segments and hit results.

use glam::Vec3;

use super::geometry::{GeometryHandle, MaterialId};
use crate::body::BodyHandle;

/// A segment starting at `origin` and ending at `origin + dir`.
///
/// `dir` is not normalized; its length is the reach of the ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    /// A ray from `begin` reaching exactly to `end`.
    pub fn from_two_points(begin: Vec3, end: Vec3) -> Self {
        Self {
            origin: begin,
            dir: end - begin,
        }
    }

    /// Point at parameter `t`, where `t = 1` is the end of the segment.
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// One ray hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayCastResult {
    /// Hit point, world space.
    pub position: Vec3,
    /// Surface normal facing the ray origin.
    pub normal: Vec3,
    /// Segment parameter of the hit in `[0, 1]`.
    pub toi: f32,
    /// Set when a body was hit.
    pub body: Option<BodyHandle>,
    /// Set when static geometry was hit.
    pub geometry: Option<GeometryHandle>,
    pub material: Option<MaterialId>,
}
