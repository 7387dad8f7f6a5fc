//! Hitscan weapons carried by the player.

use serde::{Deserialize, Serialize};
use shooter_scene::{NodeHandle, NodeKind, Scene};

use crate::services::ResourceManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    M4,
    Ak47,
}

impl WeaponKind {
    pub fn model_path(self) -> &'static str {
        match self {
            WeaponKind::M4 => "data/models/m4.fbx",
            WeaponKind::Ak47 => "data/models/ak47.fbx",
        }
    }

    pub fn initial_ammo(self) -> u32 {
        match self {
            WeaponKind::M4 => 200,
            WeaponKind::Ak47 => 150,
        }
    }

    /// Frames between two shots.
    pub fn fire_interval(self) -> u32 {
        match self {
            WeaponKind::M4 => 5,
            WeaponKind::Ak47 => 6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    /// Root of the weapon's visual model.
    pub model: NodeHandle,
    pub ammo: u32,
    /// Frames left until the next shot is allowed.
    shot_timer: u32,
}

impl Weapon {
    /// Instantiate the weapon's model. A missing model leaves an empty node
    /// so the weapon still works, just invisibly.
    pub fn new(kind: WeaponKind, scene: &mut Scene, resources: &mut dyn ResourceManager) -> Self {
        let model = match resources
            .request_model(kind.model_path())
            .and_then(|model| scene.instantiate(&model))
        {
            Some(node) => node,
            None => {
                log::warn!("weapon model {} unavailable", kind.model_path());
                scene.create_node(NodeKind::Base)
            }
        };

        Self {
            kind,
            model,
            ammo: kind.initial_ammo(),
            shot_timer: 0,
        }
    }

    pub fn update(&mut self) {
        self.shot_timer = self.shot_timer.saturating_sub(1);
    }

    /// Fire one round. Returns false while cooling down or out of ammo.
    pub fn shoot(&mut self) -> bool {
        if self.shot_timer > 0 || self.ammo == 0 {
            return false;
        }
        self.ammo -= 1;
        self.shot_timer = self.kind.fire_interval();
        log::trace!("{:?} fired, {} rounds left", self.kind, self.ammo);
        true
    }

    pub fn set_visible(&self, scene: &mut Scene, visible: bool) {
        scene.set_visible(self.model, visible);
    }

    pub fn is_visible(&self, scene: &Scene) -> bool {
        scene.node(self.model).map_or(false, |node| node.visible)
    }
}
