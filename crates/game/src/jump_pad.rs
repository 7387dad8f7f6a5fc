//! Jump pads: static geometry that launches whoever touches it.
//!
//! Pads are declared in the scene by name. A mesh node named `JumpPad`,
//! `JumpPadNorth` and so on (no underscore) becomes a pad when the scene
//! also has `<name>_Begin` and `<name>_End` nodes. The launch velocity
//! points from begin to end and grows with their distance.

use glam::Vec3;
use shooter_physics::{GeometryHandle, PhysicsWorld};
use shooter_scene::{NodeHandle, Scene};
use slotmap::SlotMap;

use crate::actor::{Actor, ActorHandle};
use crate::collider::geometry_from_mesh;

const JUMP_PAD_TAG: &str = "JumpPad";
const BEGIN_SUFFIX: &str = "_Begin";
const END_SUFFIX: &str = "_End";

/// Distance between begin and end markers per unit of launch speed.
const FORCE_SCALE: f32 = 20.0;

#[derive(Debug, Clone)]
pub struct JumpPad {
    model: NodeHandle,
    bounds: GeometryHandle,
    force: Vec3,
}

impl JumpPad {
    /// Build a pad from a mesh node. Returns `None` if the node has no mesh.
    pub fn new(scene: &Scene, physics: &mut PhysicsWorld, model: NodeHandle, force: Vec3) -> Option<Self> {
        let geometry = geometry_from_mesh(scene, model)?;
        Some(Self {
            model,
            bounds: physics.add_geometry(geometry),
            force,
        })
    }

    /// Launch velocity for a pad whose markers sit at `begin` and `end`.
    pub fn force_between(begin: Vec3, end: Vec3) -> Vec3 {
        let delta = end - begin;
        delta.normalize_or_zero() * (delta.length() / FORCE_SCALE)
    }

    pub fn model(&self) -> NodeHandle {
        self.model
    }

    pub fn bounds(&self) -> GeometryHandle {
        self.bounds
    }

    pub fn force(&self) -> Vec3 {
        self.force
    }

    /// Launch every actor touching the pad.
    pub fn update(&self, actors: &SlotMap<ActorHandle, Actor>, physics: &mut PhysicsWorld) {
        for (_, actor) in actors.iter() {
            let Some(body) = physics.body_mut(actor.body) else {
                continue;
            };
            if let Some(contact) = body.contacts().iter().find(|c| c.geometry == self.bounds) {
                log::trace!("jump pad launch at {:?}", contact.position);
                body.set_velocity(self.force);
            }
        }
    }

    /// Create a pad for every properly named mesh node in the scene.
    pub fn scan_scene(scene: &Scene, physics: &mut PhysicsWorld) -> Vec<JumpPad> {
        let mut pads = Vec::new();

        for (handle, node) in scene.nodes() {
            let name = node.name.as_str();
            if !name.contains(JUMP_PAD_TAG) || name.contains('_') {
                continue;
            }

            let begin = scene.find_node(&format!("{}{}", name, BEGIN_SUFFIX));
            let end = scene.find_node(&format!("{}{}", name, END_SUFFIX));
            let (Some(begin), Some(end)) = (begin, end) else {
                log::debug!("{} has no begin/end markers, skipped", name);
                continue;
            };

            let force = Self::force_between(scene.global_position(begin), scene.global_position(end));
            match Self::new(scene, physics, handle, force) {
                Some(pad) => {
                    log::debug!("jump pad {} with force {:?}", name, force);
                    pads.push(pad);
                }
                None => log::warn!("{} is not a mesh, no jump pad created", name),
            }
        }

        pads
    }
}
