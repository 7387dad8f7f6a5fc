//! Collaborators that live outside the level.
//!
//! Audio output, the HUD and asset loading belong to the host application.
//! The level borrows them per call as trait objects.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use shooter_scene::Model;

/// A loaded sound, identified by its source path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoundBuffer {
    pub path: String,
}

impl SoundBuffer {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Sink for positional audio.
pub trait SoundContext {
    /// Play `buffer` once as a 3D source at `position`.
    fn play_once(&mut self, buffer: &SoundBuffer, position: Vec3);

    /// Move and orient the listener.
    fn set_listener(&mut self, position: Vec3, look: Vec3, up: Vec3);
}

/// Status display.
pub trait Hud {
    fn update(&mut self, health: f32, ammo: u32);
}

/// Asset loader. Returns `None` when a resource is unavailable.
pub trait ResourceManager {
    fn request_model(&mut self, path: &str) -> Option<Model>;

    fn request_sound_buffer(&mut self, path: &str) -> Option<SoundBuffer>;
}
