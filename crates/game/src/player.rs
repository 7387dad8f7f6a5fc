//! First-person player controller.
//!
//! Input events set intent flags; [`PlayerController::update`] turns them
//! into body velocity, crouch height, camera motion and feedback (laser
//! sight, footsteps, listener, HUD) once per frame.
//!
//! # Scene layout
//!
//! ```text
//! pivot (yaw)
//! └── camera (pitch)
//!     ├── flash light
//!     └── weapon pivot
//!         └── weapon models
//! laser dot   (world space)
//! pick marker (world space)
//! ```

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use shooter_physics::{Ray, RayCastFlags, MIN_GROUND_NORMAL_Y};
use shooter_scene::{Color, Light, NodeHandle, NodeKind, Scene};

use crate::actor::{ActorState, EventContext, UpdateContext};
use crate::config::PlayerConfig;
use crate::input::{InputEvent, Intent, Key};
use crate::projectile::{Projectile, ProjectileKind};
use crate::services::ResourceManager;
use crate::weapon::{Weapon, WeaponKind};

/// Per-frame approach factor for yaw and pitch.
const LOOK_SMOOTHING: f32 = 0.22;

/// Per-frame approach factor for camera and weapon offsets.
const OFFSET_SMOOTHING: f32 = 0.1;

/// Wobble phase advance per moving frame.
const WOBBLE_STEP: f32 = 0.25;

/// Path length accumulated per moving frame. A footstep plays every 1.0.
const FOOTSTEP_STEP: f32 = 0.05;

const LASER_RANGE: f32 = 100.0;

/// Distance the laser dot floats off the surface it hits.
const LASER_DOT_OFFSET: f32 = 0.2;

/// Air control acceleration (units/second²).
const AIR_CONTROL: f32 = 5.0;

const PICK_MODEL: &str = "data/models/sphere.fbx";

#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerController {
    config: PlayerConfig,

    camera: NodeHandle,
    flash_light: NodeHandle,
    laser_dot: NodeHandle,
    weapon_pivot: NodeHandle,
    pick: NodeHandle,

    yaw: f32,
    desired_yaw: f32,
    pitch: f32,
    desired_pitch: f32,

    camera_wobble: f32,
    path_len: f32,

    /// Rest position of the camera; `y` tracks the body height.
    camera_position: Vec3,
    camera_offset: Vec3,
    camera_dest_offset: Vec3,
    weapon_position: Vec3,
    weapon_offset: Vec3,
    weapon_dest_offset: Vec3,

    weapons: Vec<Weapon>,
    current_weapon: usize,

    #[serde(skip)]
    intent: Intent,
    #[serde(skip)]
    is_crouch: bool,
}

impl PlayerController {
    /// Build the camera rig under `pivot` and hand out the starting weapons.
    pub fn new(
        config: PlayerConfig,
        scene: &mut Scene,
        pivot: NodeHandle,
        resources: &mut dyn ResourceManager,
    ) -> Self {
        let camera_position = Vec3::new(0.0, config.stand_body_height, 0.0);
        let camera = scene.create_node(NodeKind::Camera(Default::default()));
        scene.set_local_position(camera, camera_position);
        scene.attach(camera, pivot);

        let flash_light = scene.create_node(NodeKind::Light(Light {
            radius: 0.0,
            ..Default::default()
        }));
        scene.attach(flash_light, camera);

        let laser_dot = scene.create_node(NodeKind::Light(Light {
            radius: 0.5,
            color: Color::RED,
            cast_shadows: false,
        }));

        let weapon_position = config.weapon_position;
        let weapon_pivot = scene.create_node(NodeKind::Base);
        scene.attach(weapon_pivot, camera);
        scene.set_local_position(weapon_pivot, weapon_position);

        let pick = match resources
            .request_model(PICK_MODEL)
            .and_then(|model| scene.instantiate(&model))
        {
            Some(node) => node,
            None => {
                log::warn!("pick marker model {} unavailable", PICK_MODEL);
                scene.create_node(NodeKind::Base)
            }
        };

        let mut player = Self {
            config,
            camera,
            flash_light,
            laser_dot,
            weapon_pivot,
            pick,
            yaw: 0.0,
            desired_yaw: 0.0,
            pitch: 0.0,
            desired_pitch: 0.0,
            camera_wobble: 0.0,
            path_len: 0.0,
            camera_position,
            camera_offset: Vec3::ZERO,
            camera_dest_offset: Vec3::ZERO,
            weapon_position,
            weapon_offset: Vec3::ZERO,
            weapon_dest_offset: Vec3::ZERO,
            weapons: Vec::new(),
            current_weapon: 0,
            intent: Intent::default(),
            is_crouch: false,
        };

        for kind in [WeaponKind::M4, WeaponKind::Ak47] {
            let weapon = Weapon::new(kind, scene, resources);
            player.add_weapon(scene, weapon);
        }

        player
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn camera(&self) -> NodeHandle {
        self.camera
    }

    pub fn laser_dot(&self) -> NodeHandle {
        self.laser_dot
    }

    pub fn pick(&self) -> NodeHandle {
        self.pick
    }

    pub fn weapon_pivot(&self) -> NodeHandle {
        self.weapon_pivot
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn desired_pitch(&self) -> f32 {
        self.desired_pitch
    }

    pub fn intent(&self) -> &Intent {
        &self.intent
    }

    /// Whether the body was shorter than standing height at the start of
    /// the last update.
    pub fn is_crouching(&self) -> bool {
        self.is_crouch
    }

    pub fn path_len(&self) -> f32 {
        self.path_len
    }

    pub fn camera_offset(&self) -> Vec3 {
        self.camera_offset
    }

    pub fn weapon_offset(&self) -> Vec3 {
        self.weapon_offset
    }

    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    pub fn current_weapon_index(&self) -> usize {
        self.current_weapon
    }

    pub fn current_weapon(&self) -> Option<&Weapon> {
        self.weapons.get(self.current_weapon)
    }

    fn current_weapon_mut(&mut self) -> Option<&mut Weapon> {
        self.weapons.get_mut(self.current_weapon)
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Fold one input event into the controller. Returns true when the event
    /// was consumed.
    pub fn process_event(&mut self, event: &InputEvent, actor: ActorState, ctx: &mut EventContext) -> bool {
        match *event {
            InputEvent::MouseMove { dx, dy } => {
                let sensitivity = self.config.mouse_sensitivity;
                self.desired_yaw -= dx * sensitivity;
                self.desired_pitch = (self.desired_pitch + dy * sensitivity).max(-90.0).min(90.0);
                true
            }
            InputEvent::KeyDown(Key::G) => {
                let position = ctx.scene.global_position(self.camera);
                let look = ctx.scene.look_vector(self.camera);
                let grenade = Projectile::new(ProjectileKind::Grenade, ctx.scene, ctx.physics, position, look);
                ctx.projectiles.push(grenade);
                true
            }
            InputEvent::KeyDown(Key::Space) => {
                if !self.intent.jumped {
                    if let Some(body) = ctx.physics.body_mut(actor.body) {
                        if body.has_ground_contact() {
                            body.set_y_velocity(self.config.jump_velocity);
                        }
                    }
                    self.intent.jumped = true;
                }
                true
            }
            InputEvent::KeyUp(Key::Space) => {
                self.intent.jumped = false;
                true
            }
            InputEvent::KeyDown(key) => self.intent.set_key(key, true),
            InputEvent::KeyUp(key) => self.intent.set_key(key, false),
            InputEvent::MouseDown(_) => {
                self.intent.shoot = true;
                true
            }
            InputEvent::MouseUp(_) => {
                self.intent.shoot = false;
                true
            }
            InputEvent::MouseWheel(delta) => {
                if delta > 0 {
                    self.next_weapon(ctx.scene);
                } else if delta < 0 {
                    self.prev_weapon(ctx.scene);
                }
                delta != 0
            }
        }
    }

    // ========================================================================
    // Frame update
    // ========================================================================

    pub fn update(&mut self, actor: ActorState, ctx: &mut UpdateContext) {
        let look = ctx.scene.look_vector(actor.pivot).normalize_or_zero();
        let side = ctx.scene.side_vector(actor.pivot).normalize_or_zero();

        let mut direction = Vec3::ZERO;
        if self.intent.move_forward {
            direction += look;
        }
        if self.intent.move_backward {
            direction -= look;
        }
        if self.intent.strafe_left {
            direction += side;
        }
        if self.intent.strafe_right {
            direction -= side;
        }
        let is_moving = self.intent.has_movement();

        let Some(body) = ctx.physics.body(actor.body) else {
            log::warn!("player body missing, skipping update");
            return;
        };
        let actual_height = body.shape.height();
        let body_position = body.position;
        let contact_count = body.contact_count();

        self.is_crouch = actual_height < self.config.stand_body_height - 3.0 * f32::EPSILON;

        self.update_crouch(actor, actual_height, body_position, ctx);

        for weapon in &mut self.weapons {
            weapon.update();
        }
        if self.intent.shoot {
            if let Some(weapon) = self.current_weapon_mut() {
                weapon.shoot();
            }
        }

        // Camera sits at the top of the body.
        self.camera_position.y = actual_height;

        self.update_wobble(is_moving && contact_count > 0);

        self.camera_offset += (self.camera_dest_offset - self.camera_offset) * OFFSET_SMOOTHING;
        self.weapon_offset += (self.weapon_dest_offset - self.weapon_offset) * OFFSET_SMOOTHING;
        ctx.scene
            .set_local_position(self.camera, self.camera_position + self.camera_offset);
        ctx.scene
            .set_local_position(self.weapon_pivot, self.weapon_position + self.weapon_offset);

        let speed_multiplier = if self.is_crouch {
            0.5
        } else if self.intent.run {
            self.config.run_speed_multiplier
        } else {
            1.0
        };

        if direction.length_squared() > 0.0 {
            direction = direction.normalize();
            self.path_len += FOOTSTEP_STEP;
            if self.path_len >= 1.0 {
                self.play_footstep(actor, ctx);
                self.path_len = 0.0;
            }
        }

        self.yaw += (self.desired_yaw - self.yaw) * LOOK_SMOOTHING;
        self.pitch += (self.desired_pitch - self.pitch) * LOOK_SMOOTHING;

        if let Some(body) = ctx.physics.body_mut(actor.body) {
            if body.has_ground_contact() {
                body.set_x_velocity(direction.x * speed_multiplier * actor.move_speed);
                body.set_z_velocity(direction.z * speed_multiplier * actor.move_speed);
            } else {
                body.add_acceleration(Vec3::new(direction.x * AIR_CONTROL, 0.0, direction.z * AIR_CONTROL));
            }
        }

        ctx.scene
            .set_local_rotation(actor.pivot, Quat::from_axis_angle(Vec3::Y, self.yaw.to_radians()));
        ctx.scene
            .set_local_rotation(self.camera, Quat::from_axis_angle(Vec3::X, self.pitch.to_radians()));

        let camera_position = ctx.scene.global_position(self.camera);
        self.update_laser_sight(actor, camera_position, ctx);

        ctx.sound.set_listener(camera_position, look, Vec3::Y);

        let ammo = self.current_weapon().map_or(0, |weapon| weapon.ammo);
        ctx.hud.update(actor.health, ammo);
    }

    /// Shrink while crouch is held. Grow back only when nothing is above
    /// the body within standing height.
    fn update_crouch(&self, actor: ActorState, actual_height: f32, body_position: Vec3, ctx: &mut UpdateContext) {
        let height = if self.intent.crouch {
            (actual_height - self.config.sit_down_speed).max(self.config.crouch_body_height)
        } else {
            let headroom = Ray::from_two_points(
                body_position,
                body_position + Vec3::new(0.0, self.config.stand_body_height, 0.0),
            );
            if !ctx.physics.ray_cast(&headroom, RayCastFlags::IGNORE_BODIES).is_empty() {
                return;
            }
            (actual_height + self.config.stand_up_speed).min(self.config.stand_body_height)
        };

        if let Some(body) = ctx.physics.body_mut(actor.body) {
            body.shape.set_height(height);
        }
    }

    fn update_wobble(&mut self, active: bool) {
        if active {
            let (sin, cos) = (self.camera_wobble.sin(), (self.camera_wobble * 0.5).cos());
            self.camera_dest_offset.x = 0.05 * cos;
            self.camera_dest_offset.y = 0.1 * sin;
            self.weapon_dest_offset.x = 0.0125 * cos;
            self.weapon_dest_offset.y = 0.0125 * sin;
            self.camera_wobble += WOBBLE_STEP;
        } else {
            self.camera_dest_offset.x = 0.0;
            self.camera_dest_offset.y = 0.0;
            self.weapon_dest_offset.x = 0.0;
            self.weapon_dest_offset.y = 0.0;
        }
    }

    /// Play one footstep for the first walkable contact whose material has
    /// a sound.
    fn play_footstep(&self, actor: ActorState, ctx: &mut UpdateContext) {
        let Some(body) = ctx.physics.body(actor.body) else {
            return;
        };
        let position = ctx.scene.global_position(actor.pivot);

        for contact in body.contacts() {
            if contact.normal.y <= MIN_GROUND_NORMAL_Y {
                continue;
            }
            let Some(material) = contact.triangle.and_then(|triangle| triangle.material) else {
                continue;
            };
            if let Some(buffer) = ctx.footsteps.next_sound(material) {
                log::trace!("footstep {} at {:?}", buffer.path, position);
                ctx.sound.play_once(buffer, position);
                break;
            }
        }
    }

    /// Put the laser dot just off the first surface the camera looks at,
    /// ignoring our own body, and the pick marker on the hit point.
    fn update_laser_sight(&self, actor: ActorState, camera_position: Vec3, ctx: &mut UpdateContext) {
        let look = ctx.scene.look_vector(self.camera);
        let ray = Ray::new(camera_position, look * LASER_RANGE);
        let results = ctx.physics.ray_cast(&ray, RayCastFlags::SORT_RESULTS);

        if let Some(hit) = results.iter().find(|hit| hit.body != Some(actor.body)) {
            let dot = hit.position + hit.normal.normalize_or_zero() * LASER_DOT_OFFSET;
            ctx.scene.set_local_position(self.laser_dot, dot);
            ctx.scene.set_local_position(self.pick, hit.position);
        }
    }

    // ========================================================================
    // Weapons
    // ========================================================================

    /// Mount a weapon on the weapon pivot and advance the selection.
    pub fn add_weapon(&mut self, scene: &mut Scene, weapon: Weapon) {
        scene.attach(weapon.model, self.weapon_pivot);
        self.weapons.push(weapon);
        self.next_weapon(scene);
    }

    /// Unmount the weapon at `index` and step the selection back.
    pub fn remove_weapon(&mut self, scene: &mut Scene, index: usize) -> Option<Weapon> {
        if index >= self.weapons.len() {
            return None;
        }
        let weapon = self.weapons.remove(index);
        scene.detach(weapon.model);
        self.prev_weapon(scene);
        Some(weapon)
    }

    pub fn next_weapon(&mut self, scene: &mut Scene) {
        let last = self.weapons.len().saturating_sub(1);
        self.current_weapon = (self.current_weapon + 1).min(last);
        self.show_current_weapon(scene);
    }

    pub fn prev_weapon(&mut self, scene: &mut Scene) {
        let last = self.weapons.len().saturating_sub(1);
        self.current_weapon = self.current_weapon.saturating_sub(1).min(last);
        self.show_current_weapon(scene);
    }

    fn show_current_weapon(&self, scene: &mut Scene) {
        for (index, weapon) in self.weapons.iter().enumerate() {
            weapon.set_visible(scene, index == self.current_weapon);
        }
        if let Some(weapon) = self.current_weapon() {
            log::debug!("selected weapon {} ({:?})", self.current_weapon, weapon.kind);
        }
    }

    /// Remove the nodes that live outside the actor's pivot.
    pub fn free(&self, scene: &mut Scene) {
        scene.remove_node(self.laser_dot);
        scene.remove_node(self.pick);
    }
}
