//! Level loading and management.
//!
//! A level owns the scene, the physics world and every gameplay object in
//! it. Gameplay objects that come from the scene (map collider, jump pads)
//! are derived from node names and rebuilt after loading a save.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use shooter_physics::{GeometryHandle, PhysicsWorld};
use shooter_scene::{Color, ColorGradient, Mesh, Node, NodeKind, ParticleSystem, Scene};
use slotmap::SlotMap;

use crate::actor::{Actor, ActorHandle, EventContext, UpdateContext};
use crate::collider::geometry_from_mesh;
use crate::config::GameConfig;
use crate::error::SaveError;
use crate::footsteps::FootstepSoundMap;
use crate::input::InputEvent;
use crate::item::{Item, ItemKind};
use crate::jump_pad::JumpPad;
use crate::projectile::Projectile;
use crate::services::{Hud, ResourceManager, SoundContext};

/// Name of the mesh node used as the map collider.
const MAP_COLLIDER_NODE: &str = "Polygon";

/// Name of the node marking the player start.
const PLAYER_START_NODE: &str = "PlayerPosition";

#[derive(Debug, Serialize, Deserialize)]
pub struct Level {
    scene: Scene,
    physics: PhysicsWorld,
    actors: SlotMap<ActorHandle, Actor>,
    player: Option<ActorHandle>,
    projectiles: Vec<Projectile>,
    items: Vec<Item>,

    #[serde(skip)]
    jump_pads: Vec<JumpPad>,
    #[serde(skip)]
    footsteps: FootstepSoundMap,
    #[serde(skip)]
    collider: Option<GeometryHandle>,
}

impl Level {
    /// Build a level around an existing scene.
    ///
    /// Missing scene pieces disable the feature that needs them: no
    /// `Polygon` mesh means no map collider, no `PlayerPosition` node puts
    /// the player at the origin.
    pub fn from_scene(scene: Scene, config: &GameConfig, resources: &mut dyn ResourceManager) -> Self {
        let mut level = Self {
            scene,
            physics: PhysicsWorld::new(config.physics.clone()),
            actors: SlotMap::with_key(),
            player: None,
            projectiles: Vec::new(),
            items: Vec::new(),
            jump_pads: Vec::new(),
            footsteps: FootstepSoundMap::load(&config.footsteps, resources),
            collider: None,
        };

        level.create_collider();
        level.scan_scene();

        let start = match level.scene.find_node(PLAYER_START_NODE) {
            Some(node) => level.scene.global_position(node),
            None => {
                log::warn!("no {} node, player starts at the origin", PLAYER_START_NODE);
                Vec3::ZERO
            }
        };
        let player = Actor::player(&config.player, &mut level.scene, &mut level.physics, resources, start);
        level.player = Some(level.actors.insert(player));

        log::info!(
            "level ready: {} nodes, {} jump pads, collider: {}",
            level.scene.node_count(),
            level.jump_pads.len(),
            level.collider.is_some()
        );
        level
    }

    /// A small walled arena with a jump pad, a low ceiling, a medkit and a bot.
    pub fn test_arena(config: &GameConfig, resources: &mut dyn ResourceManager) -> Self {
        let mut scene = Scene::new();

        let mut map = Mesh::new();
        map.add_cuboid(Vec3::new(0.0, -0.5, 0.0), Vec3::new(10.0, 0.5, 10.0), Some("Concrete"));
        for (center, half_extents) in [
            (Vec3::new(0.0, 1.5, 10.25), Vec3::new(10.0, 1.5, 0.25)),
            (Vec3::new(0.0, 1.5, -10.25), Vec3::new(10.0, 1.5, 0.25)),
            (Vec3::new(10.25, 1.5, 0.0), Vec3::new(0.25, 1.5, 10.0)),
            (Vec3::new(-10.25, 1.5, 0.0), Vec3::new(0.25, 1.5, 10.0)),
        ] {
            map.add_cuboid(center, half_extents, Some("Concrete"));
        }
        // Crawlspace, too low to stand up under.
        map.add_cuboid(Vec3::new(-5.0, 0.74, 5.0), Vec3::new(1.5, 0.05, 1.5), Some("Metal"));
        scene.add_node(Node::new(NodeKind::Mesh(map)).with_name(MAP_COLLIDER_NODE));

        let pad = Mesh::cuboid(Vec3::ZERO, Vec3::new(0.5, 0.05, 0.5), Some("Metal"));
        scene.add_node(
            Node::new(NodeKind::Mesh(pad))
                .with_name("JumpPad")
                .with_position(Vec3::new(5.0, 0.05, 5.0)),
        );
        scene.add_node(Node::new(NodeKind::Base).with_name("JumpPad_Begin").with_position(Vec3::new(5.0, 0.0, 5.0)));
        scene.add_node(Node::new(NodeKind::Base).with_name("JumpPad_End").with_position(Vec3::new(5.0, 3.0, 7.0)));

        scene.add_node(
            Node::new(NodeKind::Base)
                .with_name(PLAYER_START_NODE)
                .with_position(Vec3::new(0.0, 0.25, 0.0)),
        );

        let mut smoke = ColorGradient::default();
        smoke.add_point(0.00, Color::new(150, 150, 150, 0));
        smoke.add_point(0.05, Color::new(150, 150, 150, 220));
        smoke.add_point(0.85, Color::new(255, 255, 255, 180));
        smoke.add_point(1.00, Color::new(255, 255, 255, 0));
        let particles = ParticleSystem {
            max_particles: 1000,
            spawn_rate: 50,
            acceleration: Vec3::new(0.0, -0.1, 0.0),
            color_over_lifetime: smoke,
            texture: Some("data/particles/smoke_04.tga".to_owned()),
            ..Default::default()
        };
        scene.add_node(
            Node::new(NodeKind::ParticleSystem(particles))
                .with_name("Smoke")
                .with_position(Vec3::new(3.0, 0.0, -3.0)),
        );

        let mut level = Self::from_scene(scene, config, resources);
        level.spawn_item(ItemKind::Medkit, Vec3::new(0.0, 0.1, 0.0), resources);
        level.spawn_bot(Vec3::new(-1.0, 0.25, -1.0));
        level
    }

    /// Build the map collider from the `Polygon` mesh node.
    fn create_collider(&mut self) {
        let Some(node) = self.scene.find_node(MAP_COLLIDER_NODE) else {
            log::warn!("no {} node, level has no collider", MAP_COLLIDER_NODE);
            return;
        };
        match geometry_from_mesh(&self.scene, node) {
            Some(geometry) => {
                log::debug!("map collider with {} triangles", geometry.triangle_count());
                self.collider = Some(self.physics.add_geometry(geometry));
            }
            None => log::warn!("{} is not a mesh, level has no collider", MAP_COLLIDER_NODE),
        }
    }

    fn scan_scene(&mut self) {
        self.jump_pads = JumpPad::scan_scene(&self.scene, &mut self.physics);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn actors(&self) -> &SlotMap<ActorHandle, Actor> {
        &self.actors
    }

    pub fn actor(&self, handle: ActorHandle) -> Option<&Actor> {
        self.actors.get(handle)
    }

    pub fn player_handle(&self) -> Option<ActorHandle> {
        self.player
    }

    pub fn player(&self) -> Option<&Actor> {
        self.player.and_then(|handle| self.actors.get(handle))
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn jump_pads(&self) -> &[JumpPad] {
        &self.jump_pads
    }

    pub fn collider(&self) -> Option<GeometryHandle> {
        self.collider
    }

    // ========================================================================
    // Actors
    // ========================================================================

    pub fn spawn_bot(&mut self, position: Vec3) -> ActorHandle {
        let bot = Actor::bot(&mut self.scene, &mut self.physics, position);
        log::debug!("bot spawned at {:?}", position);
        self.actors.insert(bot)
    }

    pub fn spawn_item(&mut self, kind: ItemKind, position: Vec3, resources: &mut dyn ResourceManager) {
        self.items.push(Item::new(kind, &mut self.scene, resources, position));
    }

    /// Remove an actor and everything it owns. Returns false for a stale
    /// handle.
    pub fn remove_actor(&mut self, handle: ActorHandle) -> bool {
        let Some(actor) = self.actors.remove(handle) else {
            return false;
        };
        actor.free(&mut self.scene, &mut self.physics);
        if self.player == Some(handle) {
            self.player = None;
        }
        true
    }

    /// Teleport an actor.
    pub fn set_actor_position(&mut self, handle: ActorHandle, position: Vec3) {
        if let Some(actor) = self.actors.get(handle) {
            actor.set_position(&mut self.scene, &mut self.physics, position);
        }
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Hand an input event to the player. Returns true when it was consumed.
    pub fn process_event(&mut self, event: &InputEvent) -> bool {
        let Some(player) = self.player.and_then(|handle| self.actors.get_mut(handle)) else {
            return false;
        };
        let mut ctx = EventContext {
            scene: &mut self.scene,
            physics: &mut self.physics,
            projectiles: &mut self.projectiles,
        };
        player.process_event(event, &mut ctx)
    }

    /// Run one frame: items, actors, projectiles, jump pads, then the
    /// physics step.
    ///
    /// Jump pads run after actors so a grounded actor's walking velocity
    /// doesn't overwrite the launch.
    pub fn update(&mut self, sound: &mut dyn SoundContext, hud: &mut dyn Hud) {
        let scene = &mut self.scene;
        let actors = &mut self.actors;
        let physics = &self.physics;
        self.items.retain(|item| {
            if item.update(scene, actors, physics) {
                return true;
            }
            item.free(scene);
            false
        });

        let mut ctx = UpdateContext {
            scene: &mut self.scene,
            physics: &mut self.physics,
            footsteps: &mut self.footsteps,
            sound,
            hud,
        };
        for (_, actor) in self.actors.iter_mut() {
            actor.update(&mut ctx);
        }

        let scene = &mut self.scene;
        let physics = &mut self.physics;
        self.projectiles.retain_mut(|projectile| {
            if projectile.update(scene, physics) {
                return true;
            }
            projectile.free(scene, physics);
            false
        });

        for pad in &self.jump_pads {
            pad.update(&self.actors, &mut self.physics);
        }

        self.physics.step();
    }

    // ========================================================================
    // Save / load
    // ========================================================================

    /// Snapshot the level. The map collider, jump pads and footstep sounds
    /// are not included; [`Level::load`] rebuilds them.
    pub fn save(&self) -> Result<Vec<u8>, SaveError> {
        Ok(bincode::serde::encode_to_vec(self, bincode::config::standard())?)
    }

    pub fn load(bytes: &[u8], config: &GameConfig, resources: &mut dyn ResourceManager) -> Result<Self, SaveError> {
        let (mut level, _): (Self, usize) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
        level.footsteps = FootstepSoundMap::load(&config.footsteps, resources);
        level.create_collider();
        level.scan_scene();
        log::info!(
            "level loaded: {} actors, {} jump pads",
            level.actors.len(),
            level.jump_pads.len()
        );
        Ok(level)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use crate::projectile::ProjectileKind;
    use crate::testing::{FakeResources, RecordingHud, RecordingSound};

    fn arena() -> Level {
        Level::test_arena(&GameConfig::default(), &mut FakeResources::default())
    }

    fn run(level: &mut Level, frames: usize, sound: &mut RecordingSound, hud: &mut RecordingHud) {
        for _ in 0..frames {
            level.update(sound, hud);
        }
    }

    #[test]
    fn test_arena_setup() {
        let level = arena();

        assert!(level.collider().is_some());
        assert_eq!(level.jump_pads().len(), 1);
        assert_eq!(level.actors().len(), 2);
        assert_eq!(level.items().len(), 1);
        assert_eq!(level.items()[0].kind, ItemKind::Medkit);

        let player = level.player().unwrap();
        assert_eq!(player.position(level.physics()), Some(Vec3::new(0.0, 0.25, 0.0)));
        assert!(player.as_player().is_some());

        let pad = &level.jump_pads()[0];
        let expected = JumpPad::force_between(Vec3::new(5.0, 0.0, 5.0), Vec3::new(5.0, 3.0, 7.0));
        assert_eq!(pad.force(), expected);
    }

    #[test]
    fn test_empty_scene_degrades_gracefully() {
        let level = Level::from_scene(Scene::new(), &GameConfig::default(), &mut FakeResources::default());

        assert!(level.collider().is_none());
        assert!(level.jump_pads().is_empty());
        assert_eq!(level.player().unwrap().position(level.physics()), Some(Vec3::ZERO));
    }

    #[test]
    fn test_polygon_must_be_mesh() {
        let mut scene = Scene::new();
        scene.add_node(Node::new(NodeKind::Base).with_name(MAP_COLLIDER_NODE));
        let level = Level::from_scene(scene, &GameConfig::default(), &mut FakeResources::default());
        assert!(level.collider().is_none());
    }

    #[test]
    fn test_player_lands_on_floor() {
        let mut level = arena();
        let (mut sound, mut hud) = (RecordingSound::default(), RecordingHud::default());
        run(&mut level, 30, &mut sound, &mut hud);

        let player = level.player().unwrap();
        let position = player.position(level.physics()).unwrap();
        assert!((position.y - 0.2).abs() < 0.02, "position={:?}", position);
        assert!(player.has_ground_contact(level.physics()));
        assert_eq!(hud.updates.len(), 30);
        assert!(sound.listener.is_some());
    }

    #[test]
    fn test_jump_pad_launches_player() {
        let mut level = arena();
        let (mut sound, mut hud) = (RecordingSound::default(), RecordingHud::default());
        let player = level.player_handle().unwrap();
        level.set_actor_position(player, Vec3::new(5.0, 0.3, 5.0));

        // Walking into the pad must not cancel the launch.
        level.process_event(&InputEvent::KeyDown(Key::W));
        run(&mut level, 2, &mut sound, &mut hud);

        let body = level.physics().body(level.actor(player).unwrap().body).unwrap();
        assert!(body.velocity.y > 0.1, "velocity={:?}", body.velocity);
        assert!(body.position.y > 0.3);
    }

    #[test]
    fn test_jump_pad_launches_bot() {
        let mut level = arena();
        let (mut sound, mut hud) = (RecordingSound::default(), RecordingHud::default());
        let bot = level.spawn_bot(Vec3::new(5.0, 0.3, 5.0));
        run(&mut level, 2, &mut sound, &mut hud);

        let body = level.physics().body(level.actor(bot).unwrap().body).unwrap();
        assert!(body.velocity.y > 0.1);
        assert!(body.velocity.z > 0.05);
    }

    #[test]
    fn test_footsteps_on_concrete() {
        let mut level = arena();
        let (mut sound, mut hud) = (RecordingSound::default(), RecordingHud::default());
        level.process_event(&InputEvent::KeyDown(Key::W));
        run(&mut level, 45, &mut sound, &mut hud);

        assert!(!sound.played.is_empty());
        assert!(sound
            .played
            .iter()
            .all(|(buffer, _)| buffer.path.starts_with("data/sounds/footsteps/stone")));
    }

    #[test]
    fn test_hurt_player_picks_up_medkit() {
        let mut level = arena();
        let (mut sound, mut hud) = (RecordingSound::default(), RecordingHud::default());
        let nodes = level.scene().node_count();

        // At full health the medkit stays where the player starts.
        run(&mut level, 5, &mut sound, &mut hud);
        assert_eq!(level.items().len(), 1);

        let player = level.player_handle().unwrap();
        level.actors[player].health = 50.0;
        run(&mut level, 1, &mut sound, &mut hud);

        assert!(level.items().is_empty());
        assert_eq!(level.actor(player).unwrap().health, 75.0);
        assert_eq!(level.scene().node_count(), nodes - 1);
        assert_eq!(hud.updates.last().map(|(health, _)| *health), Some(75.0));
    }

    #[test]
    fn test_events_without_player() {
        let mut level = arena();
        let player = level.player_handle().unwrap();
        let bodies = level.physics().body_count();

        assert!(level.remove_actor(player));
        assert!(!level.remove_actor(player));
        assert!(level.player().is_none());
        assert_eq!(level.physics().body_count(), bodies - 1);
        assert!(!level.process_event(&InputEvent::KeyDown(Key::W)));
    }

    #[test]
    fn test_grenades_expire() {
        let mut level = arena();
        let (mut sound, mut hud) = (RecordingSound::default(), RecordingHud::default());
        let bodies = level.physics().body_count();
        let nodes = level.scene().node_count();

        assert!(level.process_event(&InputEvent::KeyDown(Key::G)));
        assert_eq!(level.projectiles().len(), 1);
        assert_eq!(level.projectiles()[0].kind, ProjectileKind::Grenade);

        run(&mut level, ProjectileKind::Grenade.lifetime() as usize, &mut sound, &mut hud);

        assert!(level.projectiles().is_empty());
        assert_eq!(level.physics().body_count(), bodies);
        assert_eq!(level.scene().node_count(), nodes);
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut level = arena();
        let (mut sound, mut hud) = (RecordingSound::default(), RecordingHud::default());
        level.process_event(&InputEvent::MouseMove { dx: 30.0, dy: -10.0 });
        run(&mut level, 10, &mut sound, &mut hud);

        let bytes = level.save().unwrap();
        let loaded = Level::load(&bytes, &GameConfig::default(), &mut FakeResources::default()).unwrap();

        assert_eq!(loaded.actors().len(), level.actors().len());
        assert_eq!(loaded.items().len(), 1);
        assert_eq!(loaded.player_handle(), level.player_handle());
        assert_eq!(loaded.scene().node_count(), level.scene().node_count());
        assert_eq!(loaded.jump_pads().len(), 1);
        assert!(loaded.collider().is_some());
        assert_eq!(loaded.physics().geometry_count(), 2);

        let before = level.player().unwrap();
        let after = loaded.player().unwrap();
        assert_eq!(after.position(loaded.physics()), before.position(level.physics()));
        assert_eq!(
            after.as_player().unwrap().yaw(),
            before.as_player().unwrap().yaw()
        );
        assert_eq!(
            after.as_player().unwrap().current_weapon_index(),
            before.as_player().unwrap().current_weapon_index()
        );
    }

    #[test]
    fn test_load_rejects_garbage() {
        let err = Level::load(&[0xff, 0x01], &GameConfig::default(), &mut FakeResources::default()).unwrap_err();
        assert!(matches!(err, SaveError::Decode(_)));
    }
}
