//! Shooter - Headless Driver
//!
//! Builds the test arena and plays a short scripted session against it,
//! logging what the player hears and sees on the HUD.
//!
//! Usage: `shooter [config.ron] [frames]`

use std::path::Path;

use glam::Vec3;
use shooter_game::{
    GameConfig, Hud, InputEvent, Key, Level, MouseButton, ResourceManager, SoundBuffer, SoundContext,
};
use shooter_scene::{Mesh, Model, NodeKind};

const DEFAULT_FRAMES: u32 = 600;

/// Resources backed by the filesystem. Files are only checked for
/// existence; models are stood in for by a small box.
struct FileResources;

impl ResourceManager for FileResources {
    fn request_model(&mut self, path: &str) -> Option<Model> {
        if !Path::new(path).exists() {
            return None;
        }
        let mesh = Mesh::cuboid(Vec3::ZERO, Vec3::splat(0.05), None);
        Some(Model::single(path, NodeKind::Mesh(mesh)))
    }

    fn request_sound_buffer(&mut self, path: &str) -> Option<SoundBuffer> {
        Path::new(path).exists().then(|| SoundBuffer::new(path))
    }
}

#[derive(Default)]
struct LogSound {
    played: usize,
}

impl SoundContext for LogSound {
    fn play_once(&mut self, buffer: &SoundBuffer, position: Vec3) {
        self.played += 1;
        log::debug!("play {} at {:?}", buffer.path, position);
    }

    fn set_listener(&mut self, _position: Vec3, _look: Vec3, _up: Vec3) {}
}

/// Logs the HUD whenever it changes.
#[derive(Default)]
struct LogHud {
    last: Option<(f32, u32)>,
}

impl Hud for LogHud {
    fn update(&mut self, health: f32, ammo: u32) {
        if self.last != Some((health, ammo)) {
            log::info!("HUD: health {} ammo {}", health, ammo);
            self.last = Some((health, ammo));
        }
    }
}

/// Input events to inject at a given frame.
fn script(frame: u32) -> Vec<InputEvent> {
    match frame {
        10 => vec![InputEvent::KeyDown(Key::W)],
        60 => vec![InputEvent::MouseMove { dx: 40.0, dy: 0.0 }, InputEvent::KeyDown(Key::LShift)],
        120 => vec![InputEvent::KeyUp(Key::LShift), InputEvent::KeyDown(Key::Space)],
        121 => vec![InputEvent::KeyUp(Key::Space)],
        180 => vec![InputEvent::KeyUp(Key::W), InputEvent::KeyDown(Key::C)],
        240 => vec![InputEvent::KeyUp(Key::C), InputEvent::KeyDown(Key::G)],
        300 => vec![InputEvent::MouseDown(MouseButton::Left)],
        340 => vec![InputEvent::MouseUp(MouseButton::Left), InputEvent::MouseWheel(-1)],
        400 => vec![InputEvent::MouseMove { dx: -20.0, dy: 15.0 }],
        _ => Vec::new(),
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => GameConfig::load(&path).unwrap_or_else(|e| {
            log::error!("failed to load {}: {}, using defaults", path, e);
            GameConfig::default()
        }),
        None => GameConfig::default(),
    };
    let frames = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let mut resources = FileResources;
    let mut level = Level::test_arena(&config, &mut resources);
    let mut sound = LogSound::default();
    let mut hud = LogHud::default();

    for frame in 0..frames {
        for event in script(frame) {
            level.process_event(&event);
        }
        level.update(&mut sound, &mut hud);
    }

    if let Some(player) = level.player() {
        log::info!(
            "after {} frames: player at {:?}, {} sounds played, {} projectiles in flight",
            frames,
            player.position(level.physics()),
            sound.played,
            level.projectiles().len()
        );
    }

    match level.save() {
        Ok(bytes) => log::info!("save game is {} bytes", bytes.len()),
        Err(e) => log::error!("save failed: {}", e),
    }
}
