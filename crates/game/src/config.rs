//! Game configuration.
//!
//! Everything here has a working default, so a missing or partial RON file
//! still yields a playable setup.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use shooter_physics::PhysicsConfig;

use crate::error::ConfigError;

/// Player movement and body tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Horizontal speed while grounded (units/frame).
    pub move_speed: f32,

    /// Capsule height when standing.
    pub stand_body_height: f32,

    /// Capsule height when fully crouched.
    pub crouch_body_height: f32,

    /// Height lost per frame while crouching.
    pub sit_down_speed: f32,

    /// Height regained per frame while standing up.
    pub stand_up_speed: f32,

    pub run_speed_multiplier: f32,

    /// Vertical velocity set by a jump (units/frame).
    pub jump_velocity: f32,

    pub body_radius: f32,

    /// Degrees of look rotation per unit of mouse movement.
    pub mouse_sensitivity: f32,

    /// Rest position of the weapon pivot relative to the camera.
    pub weapon_position: Vec3,

    pub health: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.06,
            stand_body_height: 0.5,
            crouch_body_height: 0.30,
            sit_down_speed: 0.045,
            stand_up_speed: 0.06,
            run_speed_multiplier: 1.75,
            jump_velocity: 0.085,
            body_radius: 0.2,
            mouse_sensitivity: 1.0,
            weapon_position: Vec3::new(-0.065, -0.052, 0.02),
            health: 100.0,
        }
    }
}

/// Footstep sounds for one surface material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootstepEntry {
    /// Material name as it appears on mesh surfaces.
    pub material: String,
    /// Sound buffer paths, played in turn.
    pub sounds: Vec<String>,
}

impl FootstepEntry {
    fn numbered(material: &str, stem: &str, count: usize) -> Self {
        Self {
            material: material.to_owned(),
            sounds: (1..=count)
                .map(|i| format!("data/sounds/footsteps/{}{}.ogg", stem, i))
                .collect(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerConfig,
    pub footsteps: Vec<FootstepEntry>,
    pub physics: PhysicsConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            footsteps: vec![
                FootstepEntry::numbered("Concrete", "stone", 4),
                FootstepEntry::numbered("Metal", "metal", 4),
            ],
            physics: PhysicsConfig::default(),
        }
    }
}

impl GameConfig {
    /// Read a RON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_ron_str(&text)?;
        log::info!("loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_player_config() {
        let config = PlayerConfig::default();
        assert!(config.crouch_body_height < config.stand_body_height);
        assert_eq!(config.move_speed, 0.06);
        assert_eq!(config.run_speed_multiplier, 1.75);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = GameConfig::from_ron_str("(player: (move_speed: 0.1))").unwrap();
        assert_eq!(config.player.move_speed, 0.1);
        assert_eq!(config.player.stand_body_height, 0.5);
        assert_eq!(config.physics, PhysicsConfig::default());
        assert_eq!(config.footsteps, GameConfig::default().footsteps);
    }

    #[test]
    fn test_footsteps_from_ron() {
        let text = r#"(
            footsteps: [
                (material: "Grass", sounds: ["data/sounds/grass1.ogg", "data/sounds/grass2.ogg"]),
            ],
        )"#;
        let config = GameConfig::from_ron_str(text).unwrap();
        assert_eq!(config.footsteps.len(), 1);
        assert_eq!(config.footsteps[0].material, "Grass");
        assert_eq!(config.footsteps[0].sounds.len(), 2);
    }

    #[test]
    fn test_invalid_ron_is_parse_error() {
        let err = GameConfig::from_ron_str("(player: oops").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = GameConfig::load("does/not/exist.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
