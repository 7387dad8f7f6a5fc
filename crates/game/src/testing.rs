//! Recording fakes for the external collaborators.

use std::collections::HashSet;

use glam::Vec3;
use shooter_scene::{Mesh, Model, NodeKind};

use crate::services::{Hud, ResourceManager, SoundBuffer, SoundContext};

#[derive(Debug, Default)]
pub struct RecordingSound {
    pub played: Vec<(SoundBuffer, Vec3)>,
    pub listener: Option<(Vec3, Vec3, Vec3)>,
}

impl SoundContext for RecordingSound {
    fn play_once(&mut self, buffer: &SoundBuffer, position: Vec3) {
        self.played.push((buffer.clone(), position));
    }

    fn set_listener(&mut self, position: Vec3, look: Vec3, up: Vec3) {
        self.listener = Some((position, look, up));
    }
}

#[derive(Debug, Default)]
pub struct RecordingHud {
    pub updates: Vec<(f32, u32)>,
}

impl Hud for RecordingHud {
    fn update(&mut self, health: f32, ammo: u32) {
        self.updates.push((health, ammo));
    }
}

/// Serves a small mesh model for every path unless it is listed as missing.
#[derive(Debug, Default)]
pub struct FakeResources {
    pub missing: HashSet<String>,
    pub requested: Vec<String>,
}

impl ResourceManager for FakeResources {
    fn request_model(&mut self, path: &str) -> Option<Model> {
        self.requested.push(path.to_owned());
        if self.missing.contains(path) {
            return None;
        }
        let mesh = Mesh::cuboid(Vec3::ZERO, Vec3::splat(0.05), None);
        Some(Model::single(path, NodeKind::Mesh(mesh)))
    }

    fn request_sound_buffer(&mut self, path: &str) -> Option<SoundBuffer> {
        self.requested.push(path.to_owned());
        if self.missing.contains(path) {
            return None;
        }
        Some(SoundBuffer::new(path))
    }
}
