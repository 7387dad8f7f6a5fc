//! Scene nodes and their kinds.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::camera::Camera;
use crate::mesh::Mesh;

new_key_type! {
    /// Stable handle to a node in a [`Scene`](crate::Scene).
    pub struct NodeHandle;
}

/// RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const RED: Self = Self::new(255, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Point light parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// Influence radius. Zero disables the light.
    pub radius: f32,
    pub color: Color,
    pub cast_shadows: bool,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            radius: 2.0,
            color: Color::WHITE,
            cast_shadows: true,
        }
    }
}

/// Piecewise-linear color ramp over a particle's normalized lifetime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorGradient {
    points: Vec<(f32, Color)>,
}

impl ColorGradient {
    /// Add a point, keeping points sorted by location.
    pub fn add_point(&mut self, location: f32, color: Color) {
        let index = self.points.partition_point(|(l, _)| *l <= location);
        self.points.insert(index, (location, color));
    }

    pub fn points(&self) -> &[(f32, Color)] {
        &self.points
    }
}

/// Description of a particle emitter. Simulation and drawing belong to the
/// renderer; the scene only carries the parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleSystem {
    /// Radius of the spherical emitter volume.
    pub emitter_radius: f32,
    pub max_particles: u32,
    /// Particles spawned per second.
    pub spawn_rate: u32,
    pub acceleration: Vec3,
    pub color_over_lifetime: ColorGradient,
    /// Path of the particle texture, if any.
    pub texture: Option<String>,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self {
            emitter_radius: 1.0,
            max_particles: 100,
            spawn_rate: 25,
            acceleration: Vec3::ZERO,
            color_over_lifetime: ColorGradient::default(),
            texture: None,
        }
    }
}

/// What a node represents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Plain transform pivot.
    Base,
    Camera(Camera),
    Light(Light),
    Mesh(Mesh),
    ParticleSystem(ParticleSystem),
}

/// A node in the scene hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub local_position: Vec3,
    pub local_rotation: Quat,
    pub local_scale: Vec3,
    pub visible: bool,
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,
}

impl Node {
    /// Create an unnamed, unparented node at the origin.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: String::new(),
            kind,
            local_position: Vec3::ZERO,
            local_rotation: Quat::IDENTITY,
            local_scale: Vec3::ONE,
            visible: true,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Builder-style name assignment.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder-style local position assignment.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.local_position = position;
        self
    }

    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// Transform relative to the parent.
    pub fn local_transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.local_scale, self.local_rotation, self.local_position)
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_points_sorted() {
        let mut gradient = ColorGradient::default();
        gradient.add_point(1.0, Color::new(255, 255, 255, 0));
        gradient.add_point(0.0, Color::new(0, 0, 0, 0));
        gradient.add_point(0.5, Color::new(9, 9, 9, 9));

        let locations: Vec<f32> = gradient.points().iter().map(|(l, _)| *l).collect();
        assert_eq!(locations, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_local_transform() {
        let node = Node::new(NodeKind::Base).with_position(Vec3::new(1.0, 2.0, 3.0));
        let point = node.local_transform().transform_point3(Vec3::ZERO);
        assert_eq!(point, Vec3::new(1.0, 2.0, 3.0));
    }
}
