//! Pickups lying around the level.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use shooter_physics::PhysicsWorld;
use shooter_scene::{NodeHandle, NodeKind, Scene};
use slotmap::SlotMap;

use crate::actor::{Actor, ActorHandle};
use crate::services::ResourceManager;

/// Health nobody can be healed past.
pub const MAX_HEALTH: f32 = 100.0;

/// Distance from an actor's body to the item at which it is picked up.
const PICKUP_RADIUS: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Medkit,
}

impl ItemKind {
    pub fn model_path(self) -> &'static str {
        match self {
            ItemKind::Medkit => "data/models/medkit.fbx",
        }
    }

    /// Health restored on pickup.
    pub fn heal(self) -> f32 {
        match self {
            ItemKind::Medkit => 25.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    pub node: NodeHandle,
}

impl Item {
    /// Place an item at `position`. A missing model leaves an empty node.
    pub fn new(kind: ItemKind, scene: &mut Scene, resources: &mut dyn ResourceManager, position: Vec3) -> Self {
        let node = match resources
            .request_model(kind.model_path())
            .and_then(|model| scene.instantiate(&model))
        {
            Some(node) => node,
            None => {
                log::warn!("item model {} unavailable", kind.model_path());
                scene.create_node(NodeKind::Base)
            }
        };
        scene.set_local_position(node, position);
        Self { kind, node }
    }

    /// Give the item to the first hurt actor in reach. Returns false once
    /// it has been picked up.
    pub fn update(&self, scene: &Scene, actors: &mut SlotMap<ActorHandle, Actor>, physics: &PhysicsWorld) -> bool {
        let position = scene.global_position(self.node);
        for (_, actor) in actors.iter_mut() {
            if actor.health >= MAX_HEALTH {
                continue;
            }
            let Some(body) = physics.body(actor.body) else {
                continue;
            };
            if body.position.distance(position) <= PICKUP_RADIUS {
                actor.health = (actor.health + self.kind.heal()).min(MAX_HEALTH);
                log::debug!("{:?} picked up, health now {}", self.kind, actor.health);
                return false;
            }
        }
        true
    }

    pub fn free(&self, scene: &mut Scene) {
        scene.remove_node(self.node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeResources;
    use shooter_physics::PhysicsConfig;

    fn setup() -> (Scene, PhysicsWorld, SlotMap<ActorHandle, Actor>, ActorHandle) {
        let mut scene = Scene::new();
        let mut physics = PhysicsWorld::new(PhysicsConfig::default());
        let mut actors = SlotMap::with_key();
        let bot = actors.insert(Actor::bot(&mut scene, &mut physics, Vec3::new(0.0, 0.2, 0.0)));
        (scene, physics, actors, bot)
    }

    #[test]
    fn test_hurt_actor_picks_up_medkit() {
        let (mut scene, physics, mut actors, bot) = setup();
        let item = Item::new(ItemKind::Medkit, &mut scene, &mut FakeResources::default(), Vec3::new(0.0, 0.1, 0.0));
        actors[bot].health = 90.0;

        assert!(!item.update(&scene, &mut actors, &physics));
        assert_eq!(actors[bot].health, MAX_HEALTH);
    }

    #[test]
    fn test_healthy_actor_leaves_medkit() {
        let (mut scene, physics, mut actors, bot) = setup();
        let item = Item::new(ItemKind::Medkit, &mut scene, &mut FakeResources::default(), Vec3::new(0.0, 0.1, 0.0));

        assert!(item.update(&scene, &mut actors, &physics));
        assert_eq!(actors[bot].health, MAX_HEALTH);
    }

    #[test]
    fn test_out_of_reach() {
        let (mut scene, physics, mut actors, bot) = setup();
        let mut resources = FakeResources::default();
        resources.missing.insert(ItemKind::Medkit.model_path().to_owned());
        let item = Item::new(ItemKind::Medkit, &mut scene, &mut resources, Vec3::new(3.0, 0.1, 0.0));
        actors[bot].health = 10.0;

        assert!(item.update(&scene, &mut actors, &physics));
        assert_eq!(actors[bot].health, 10.0);
        assert_eq!(scene.global_position(item.node), Vec3::new(3.0, 0.1, 0.0));
    }
}
