//! Runtime game configuration
//!
//! Every tuning knob the simulation consumes lives here so a deployment can
//! override balance without rebuilding. Loaded from JSON; unknown fields are
//! rejected, missing fields fall back to defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Multiplier applied to every AI behavior interval (Easy robots act
    /// half as often)
    pub fn interval_multiplier(&self) -> f32 {
        match self {
            Difficulty::Easy => 2.0,
            Difficulty::Hard => 1.0,
        }
    }

    /// Random offset (per axis, +/-) added to robot aim points. Easy robots
    /// miss on purpose.
    pub fn aim_slack(&self) -> f32 {
        match self {
            Difficulty::Easy => 100.0,
            Difficulty::Hard => 0.0,
        }
    }
}

/// Simulation tuning parameters
///
/// Distances are in world units (pixels at 1x zoom), speeds in units per
/// second, times in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Arena dimensions
    pub boundary_width: f32,
    pub boundary_height: f32,

    /// Top speed for every ship; desired velocities are clamped to this
    pub max_ship_velocity: f32,
    /// Fraction of the remaining angular delta applied per tick
    pub ship_turn_rate: f32,
    /// Fraction of the remaining velocity delta applied per tick
    pub ship_acceleration_rate: f32,

    /// Torpedo flight speed
    pub torpedo_speed: f32,
    /// Blast radius - explosions destroy ships and detonate torpedoes
    /// within this distance
    pub explosion_radius: f32,
    /// How long an explosion stays dangerous
    pub torpedo_blast_time: f32,
    /// Firing slots per ship
    pub torpedo_bays: u32,
    /// Per-slot reload delay after a shot
    pub torpedo_reload_time: f32,

    /// Number of AI opponents spawned at scene start
    pub enemy_ship_count: u32,
    /// Player respawn countdown after losing a life
    pub respawn_time: f32,

    pub difficulty: Difficulty,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            boundary_width: 8000.0,
            boundary_height: 6000.0,
            max_ship_velocity: 140.0,
            ship_turn_rate: 0.1,
            ship_acceleration_rate: 0.1,
            torpedo_speed: 200.0,
            explosion_radius: 40.0,
            torpedo_blast_time: 0.7,
            torpedo_bays: 3,
            torpedo_reload_time: 5.0,
            enemy_ship_count: 4,
            respawn_time: 3.0,
            difficulty: Difficulty::Easy,
        }
    }
}

impl Config {
    /// Arena center point - ships spawn around it, the player respawns on it
    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.boundary_width / 2.0, self.boundary_height / 2.0)
    }

    /// Load configuration from a JSON file, falling back to defaults on any
    /// read or parse failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Invalid config {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Save configuration as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_difficulty_modifiers() {
        assert_eq!(Difficulty::Easy.interval_multiplier(), 2.0);
        assert_eq!(Difficulty::Hard.interval_multiplier(), 1.0);
        assert_eq!(Difficulty::Hard.aim_slack(), 0.0);
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = Config {
            enemy_ship_count: 7,
            difficulty: Difficulty::Hard,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.enemy_ship_count, 7);
        assert_eq!(back.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let back: Config = serde_json::from_str(r#"{"torpedo_speed": 250.0}"#).unwrap();
        assert_eq!(back.torpedo_speed, 250.0);
        assert_eq!(back.max_ship_velocity, 140.0);
    }
}
