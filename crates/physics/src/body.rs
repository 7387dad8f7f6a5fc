//! Capsule bodies and their contacts.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::collision::{GeometryHandle, MaterialId};

new_key_type! {
    /// Stable handle to a body in a [`PhysicsWorld`](crate::PhysicsWorld).
    pub struct BodyHandle;
}

/// Minimum contact normal Y (cos 45°) for a contact to count as ground.
pub const MIN_GROUND_NORMAL_Y: f32 = 0.707;

/// A vertical capsule.
///
/// The lower sphere is centered on the body position and the upper sphere
/// sits `height` above it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapsuleShape {
    pub radius: f32,
    height: f32,
}

impl CapsuleShape {
    pub fn new(radius: f32, height: f32) -> Self {
        Self {
            radius,
            height: height.max(0.0),
        }
    }

    /// Distance between the centers of the two spheres.
    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = height.max(0.0);
    }
}

/// The triangle a contact was made with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleRef {
    /// Index of the triangle inside its geometry.
    pub index: usize,
    /// Material of the triangle, if it has one.
    pub material: Option<MaterialId>,
}

/// A touching pair between a body and static geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub geometry: GeometryHandle,
    /// Contact point on the geometry, world space.
    pub position: Vec3,
    /// Surface normal pointing from the geometry toward the body.
    pub normal: Vec3,
    pub triangle: Option<TriangleRef>,
}

/// A movable capsule body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Center of the lower sphere, world space.
    pub position: Vec3,

    /// Displacement per step.
    pub velocity: Vec3,

    pub shape: CapsuleShape,

    /// Acceleration accumulated for the next step (units/second²).
    acceleration: Vec3,

    /// Contacts found by the last step.
    #[serde(skip)]
    contacts: Vec<Contact>,
}

impl Body {
    /// Create a resting body at `position`.
    pub fn new(position: Vec3, shape: CapsuleShape) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            shape,
            acceleration: Vec3::ZERO,
            contacts: Vec::new(),
        }
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    pub fn set_x_velocity(&mut self, x: f32) {
        self.velocity.x = x;
    }

    pub fn set_y_velocity(&mut self, y: f32) {
        self.velocity.y = y;
    }

    pub fn set_z_velocity(&mut self, z: f32) {
        self.velocity.z = z;
    }

    /// Add acceleration for the next step only.
    pub fn add_acceleration(&mut self, acceleration: Vec3) {
        self.acceleration += acceleration;
    }

    pub(crate) fn take_acceleration(&mut self) -> Vec3 {
        std::mem::take(&mut self.acceleration)
    }

    /// Contacts found by the last step, in enumeration order.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    #[inline]
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    pub(crate) fn contacts_mut(&mut self) -> &mut Vec<Contact> {
        &mut self.contacts
    }

    /// Whether any contact is walkable ground.
    pub fn has_ground_contact(&self) -> bool {
        self.contacts.iter().any(|c| c.normal.y > MIN_GROUND_NORMAL_Y)
    }

    /// World-space center of the upper sphere.
    pub fn top(&self) -> Vec3 {
        self.position + Vec3::new(0.0, self.shape.height(), 0.0)
    }

    /// Axis-aligned bounds, grown by `margin`.
    pub fn bounds(&self, margin: f32) -> (Vec3, Vec3) {
        let r = Vec3::splat(self.shape.radius + margin);
        (self.position - r, self.top() + r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn contact(normal: Vec3) -> Contact {
        let mut geometries: SlotMap<GeometryHandle, ()> = SlotMap::with_key();
        Contact {
            geometry: geometries.insert(()),
            position: Vec3::ZERO,
            normal,
            triangle: None,
        }
    }

    #[test]
    fn test_capsule_height_never_negative() {
        let mut shape = CapsuleShape::new(0.2, 0.5);
        shape.set_height(-1.0);
        assert_eq!(shape.height(), 0.0);
    }

    #[test]
    fn test_ground_contact_threshold() {
        let mut body = Body::new(Vec3::ZERO, CapsuleShape::new(0.2, 0.5));
        assert!(!body.has_ground_contact());

        body.contacts_mut().push(contact(Vec3::new(0.0, 0.7, 0.714)));
        assert!(!body.has_ground_contact(), "steeper than 45 degrees is a wall");

        body.contacts_mut().push(contact(Vec3::Y));
        assert!(body.has_ground_contact());
    }

    #[test]
    fn test_per_axis_velocity() {
        let mut body = Body::new(Vec3::ZERO, CapsuleShape::new(0.2, 0.5));
        body.set_velocity(Vec3::new(1.0, 2.0, 3.0));
        body.set_y_velocity(0.5);
        body.set_x_velocity(0.0);
        assert_eq!(body.velocity, Vec3::new(0.0, 0.5, 3.0));
    }
}
