//! Thrown projectiles.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use shooter_physics::{Body, BodyHandle, CapsuleShape, PhysicsWorld};
use shooter_scene::{Mesh, Node, NodeHandle, NodeKind, Scene};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    Grenade,
}

impl ProjectileKind {
    /// Launch speed (units/frame).
    pub fn speed(self) -> f32 {
        match self {
            ProjectileKind::Grenade => 0.15,
        }
    }

    /// Frames before the projectile expires.
    pub fn lifetime(self) -> u32 {
        match self {
            ProjectileKind::Grenade => 120,
        }
    }

    fn radius(self) -> f32 {
        match self {
            ProjectileKind::Grenade => 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub body: BodyHandle,
    pub node: NodeHandle,
    /// Frames left to live.
    pub lifetime: u32,
}

impl Projectile {
    /// Launch a projectile from `position` along `direction`.
    pub fn new(
        kind: ProjectileKind,
        scene: &mut Scene,
        physics: &mut PhysicsWorld,
        position: Vec3,
        direction: Vec3,
    ) -> Self {
        let radius = kind.radius();
        let mut body = Body::new(position, CapsuleShape::new(radius, 0.0));
        body.set_velocity(direction.normalize_or_zero() * kind.speed());
        let body = physics.add_body(body);

        let mesh = Mesh::cuboid(Vec3::ZERO, Vec3::splat(radius), None);
        let node = scene.add_node(
            Node::new(NodeKind::Mesh(mesh))
                .with_name("Grenade")
                .with_position(position),
        );

        log::trace!("{:?} launched from {:?}", kind, position);
        Self {
            kind,
            body,
            node,
            lifetime: kind.lifetime(),
        }
    }

    /// Advance one frame. Returns false once the projectile has expired.
    pub fn update(&mut self, scene: &mut Scene, physics: &PhysicsWorld) -> bool {
        if let Some(body) = physics.body(self.body) {
            scene.set_local_position(self.node, body.position);
        }
        self.lifetime = self.lifetime.saturating_sub(1);
        self.lifetime > 0
    }

    /// Release the body and node.
    pub fn free(&self, scene: &mut Scene, physics: &mut PhysicsWorld) {
        physics.remove_body(self.body);
        scene.remove_node(self.node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shooter_physics::PhysicsConfig;

    #[test]
    fn test_grenade_launch_velocity() {
        let mut scene = Scene::new();
        let mut physics = PhysicsWorld::new(PhysicsConfig::default());
        let grenade = Projectile::new(
            ProjectileKind::Grenade,
            &mut scene,
            &mut physics,
            Vec3::Y,
            Vec3::new(0.0, 0.0, 2.0),
        );

        let body = physics.body(grenade.body).unwrap();
        assert!((body.velocity - Vec3::new(0.0, 0.0, 0.15)).length() < 1e-6);
        assert_eq!(scene.global_position(grenade.node), Vec3::Y);
    }

    #[test]
    fn test_node_follows_body_until_expiry() {
        let mut scene = Scene::new();
        let mut physics = PhysicsWorld::new(PhysicsConfig::default());
        let mut grenade = Projectile::new(
            ProjectileKind::Grenade,
            &mut scene,
            &mut physics,
            Vec3::ZERO,
            Vec3::X,
        );

        let mut frames = 0;
        loop {
            physics.step();
            frames += 1;
            if !grenade.update(&mut scene, &physics) {
                break;
            }
            let body = physics.body(grenade.body).unwrap();
            assert_eq!(scene.global_position(grenade.node), body.position);
        }
        assert_eq!(frames, ProjectileKind::Grenade.lifetime());

        grenade.free(&mut scene, &mut physics);
        assert_eq!(physics.body_count(), 0);
        assert!(!scene.contains(grenade.node));
    }
}
