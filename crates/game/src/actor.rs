//! Actors: anything with a physics body and a pivot node.
//!
//! Behavior is selected by [`ActorKind`]. Shared state (pivot, body, health,
//! speed) lives on [`Actor`] and is handed to the kind as an [`ActorState`].

use glam::Vec3;
use serde::{Deserialize, Serialize};
use shooter_physics::{Body, BodyHandle, CapsuleShape, PhysicsWorld};
use shooter_scene::{Mesh, Node, NodeHandle, NodeKind, Scene};
use slotmap::new_key_type;

use crate::config::PlayerConfig;
use crate::footsteps::FootstepSoundMap;
use crate::input::InputEvent;
use crate::player::PlayerController;
use crate::projectile::Projectile;
use crate::services::{Hud, ResourceManager, SoundContext};

new_key_type! {
    /// Stable handle to an actor in a level.
    pub struct ActorHandle;
}

/// What input handling needs to touch.
pub struct EventContext<'a> {
    pub scene: &'a mut Scene,
    pub physics: &'a mut PhysicsWorld,
    pub projectiles: &'a mut Vec<Projectile>,
}

/// What a frame update needs to touch.
pub struct UpdateContext<'a> {
    pub scene: &'a mut Scene,
    pub physics: &'a mut PhysicsWorld,
    pub footsteps: &'a mut FootstepSoundMap,
    pub sound: &'a mut dyn SoundContext,
    pub hud: &'a mut dyn Hud,
}

/// Copy of an actor's shared fields, passed to the kind-specific logic.
#[derive(Debug, Clone, Copy)]
pub struct ActorState {
    pub pivot: NodeHandle,
    pub body: BodyHandle,
    pub health: f32,
    pub move_speed: f32,
}

/// Idle target. Stands where it was put.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bot;

impl Bot {
    /// Cancel horizontal drift while grounded, so a bot launched by a jump
    /// pad comes to rest where it lands.
    pub fn update(&mut self, actor: ActorState, physics: &mut PhysicsWorld) {
        let Some(body) = physics.body_mut(actor.body) else {
            return;
        };
        if body.has_ground_contact() {
            body.set_x_velocity(0.0);
            body.set_z_velocity(0.0);
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub enum ActorKind {
    Player(Box<PlayerController>),
    Bot(Bot),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Actor {
    pub pivot: NodeHandle,
    pub body: BodyHandle,
    pub health: f32,
    /// Horizontal speed while grounded (units/frame).
    pub move_speed: f32,
    pub kind: ActorKind,
}

const BOT_RADIUS: f32 = 0.2;
const BOT_HEIGHT: f32 = 0.5;
const BOT_MOVE_SPEED: f32 = 0.05;
const BOT_HEALTH: f32 = 100.0;

impl Actor {
    /// Create a player at `position`.
    pub fn player(
        config: &PlayerConfig,
        scene: &mut Scene,
        physics: &mut PhysicsWorld,
        resources: &mut dyn ResourceManager,
        position: Vec3,
    ) -> Self {
        let shape = CapsuleShape::new(config.body_radius, config.stand_body_height);
        let (pivot, body) = spawn_body(scene, physics, "Player", shape, position);
        let controller = PlayerController::new(config.clone(), scene, pivot, resources);
        Self {
            pivot,
            body,
            health: config.health,
            move_speed: config.move_speed,
            kind: ActorKind::Player(Box::new(controller)),
        }
    }

    /// Create a bot at `position`, drawn as a box the size of its capsule.
    pub fn bot(scene: &mut Scene, physics: &mut PhysicsWorld, position: Vec3) -> Self {
        let shape = CapsuleShape::new(BOT_RADIUS, BOT_HEIGHT);
        let (pivot, body) = spawn_body(scene, physics, "Bot", shape, position);

        let half_extents = Vec3::new(BOT_RADIUS, BOT_HEIGHT * 0.5 + BOT_RADIUS, BOT_RADIUS);
        let mesh = Mesh::cuboid(Vec3::new(0.0, BOT_HEIGHT * 0.5, 0.0), half_extents, None);
        let model = scene.create_node(NodeKind::Mesh(mesh));
        scene.attach(model, pivot);

        Self {
            pivot,
            body,
            health: BOT_HEALTH,
            move_speed: BOT_MOVE_SPEED,
            kind: ActorKind::Bot(Bot),
        }
    }

    pub fn state(&self) -> ActorState {
        ActorState {
            pivot: self.pivot,
            body: self.body,
            health: self.health,
            move_speed: self.move_speed,
        }
    }

    /// Teleport the actor, keeping its velocity.
    pub fn set_position(&self, scene: &mut Scene, physics: &mut PhysicsWorld, position: Vec3) {
        if let Some(body) = physics.body_mut(self.body) {
            body.position = position;
        }
        scene.set_local_position(self.pivot, position);
    }

    pub fn position(&self, physics: &PhysicsWorld) -> Option<Vec3> {
        physics.body(self.body).map(|body| body.position)
    }

    pub fn has_ground_contact(&self, physics: &PhysicsWorld) -> bool {
        physics.body(self.body).map_or(false, Body::has_ground_contact)
    }

    pub fn as_player(&self) -> Option<&PlayerController> {
        match &self.kind {
            ActorKind::Player(player) => Some(player),
            ActorKind::Bot(_) => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut PlayerController> {
        match &mut self.kind {
            ActorKind::Player(player) => Some(player),
            ActorKind::Bot(_) => None,
        }
    }

    /// Returns true when the event was consumed.
    pub fn process_event(&mut self, event: &InputEvent, ctx: &mut EventContext) -> bool {
        let state = self.state();
        match &mut self.kind {
            ActorKind::Player(player) => player.process_event(event, state, ctx),
            ActorKind::Bot(_) => false,
        }
    }

    pub fn update(&mut self, ctx: &mut UpdateContext) {
        if let Some(body) = ctx.physics.body(self.body) {
            ctx.scene.set_local_position(self.pivot, body.position);
        }

        let state = self.state();
        match &mut self.kind {
            ActorKind::Player(player) => player.update(state, ctx),
            ActorKind::Bot(bot) => bot.update(state, ctx.physics),
        }
    }

    /// Release the body and every node the actor owns.
    pub fn free(&self, scene: &mut Scene, physics: &mut PhysicsWorld) {
        if let ActorKind::Player(player) = &self.kind {
            player.free(scene);
        }
        physics.remove_body(self.body);
        scene.remove_node(self.pivot);
    }
}

fn spawn_body(
    scene: &mut Scene,
    physics: &mut PhysicsWorld,
    name: &str,
    shape: CapsuleShape,
    position: Vec3,
) -> (NodeHandle, BodyHandle) {
    let pivot = scene.add_node(Node::new(NodeKind::Base).with_name(name).with_position(position));
    let body = physics.add_body(Body::new(position, shape));
    (pivot, body)
}
