//! Shooter Game Logic
//!
//! This crate contains the gameplay layer of a first-person shooter:
//!
//! - Player controller: movement, crouch, look, weapons, laser sight, footsteps
//! - Bots, weapons and thrown projectiles
//! - Health pickups
//! - Jump pads declared by scene node names
//! - Level setup, per-frame update and save/load
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                            Level                               │
//! │  ┌─────────┐   ┌──────────────────────────┐   ┌─────────────┐  │
//! │  │ Input   │──►│ Actors (player, bots)    │──►│ Physics     │  │
//! │  │ events  │   │ Projectiles, Jump pads   │   │ step        │  │
//! │  └─────────┘   └──────────────────────────┘   └─────────────┘  │
//! │                     │            │                             │
//! │               Scene graph   Sound / HUD / Resources (traits)   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything the level owns lives in arenas addressed by handles. Host
//! services (audio, HUD, asset loading) are passed in per call.

pub mod actor;
pub mod collider;
pub mod config;
pub mod error;
pub mod footsteps;
pub mod input;
pub mod item;
pub mod jump_pad;
pub mod level;
pub mod player;
pub mod projectile;
pub mod services;
pub mod weapon;

#[cfg(test)]
mod testing;

// Re-export main types
pub use actor::{Actor, ActorHandle, ActorKind, Bot};
pub use config::{FootstepEntry, GameConfig, PlayerConfig};
pub use error::{ConfigError, SaveError};
pub use footsteps::FootstepSoundMap;
pub use input::{InputEvent, Key, MouseButton};
pub use item::{Item, ItemKind};
pub use jump_pad::JumpPad;
pub use level::Level;
pub use player::PlayerController;
pub use projectile::{Projectile, ProjectileKind};
pub use services::{Hud, ResourceManager, SoundBuffer, SoundContext};
pub use weapon::{Weapon, WeaponKind};

// Re-export physics config for convenience
pub use shooter_physics::PhysicsConfig;
