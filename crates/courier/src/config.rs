//! Game configuration (flight tuning, arena, rules, HUD). Loaded from `skycourier.ron` at startup.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the current directory.
pub const CONFIG_FILE: &str = "skycourier.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("could not encode config: {0}")]
    Encode(#[from] ron::Error),
}

/// Flight-controller tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightTuning {
    /// Magnitude of the camera-relative horizontal thrust.
    pub horizontal_force: f32,
    /// Extra lift on top of weight compensation while climbing.
    pub lift_force: f32,
    /// Share of `lift_force` subtracted from weight compensation while descending.
    pub descent_fraction: f32,
    /// Share of weight compensated with no vertical input (0 = free fall, 1 = hover).
    pub idle_gravity_compensation: f32,
    /// Horizontal damping gain when no direction is held.
    pub stabilization_factor: f32,
    /// Below this horizontal speed² no damping is applied.
    pub damping_dead_band_sq: f32,
    /// Horizontal speed needed before the drone yaws toward its motion.
    pub yaw_speed_threshold: f32,
    /// Yaw angular velocity per radian of heading error.
    pub yaw_rate: f32,
    /// Self-righting angular velocity per radian of tilt. Kept above `yaw_rate`.
    pub righting_strength: f32,
    /// Tilt (radians) tolerated before righting kicks in.
    pub righting_tolerance: f32,
    /// Cosmetic lean per m/s of speed.
    pub tilt_per_speed: f32,
    /// Cosmetic lean limit in radians.
    pub max_tilt: f32,
    /// Slerp rate of the cosmetic lean, per second.
    pub tilt_smoothing: f32,
}

impl Default for FlightTuning {
    fn default() -> Self {
        Self {
            horizontal_force: 22.0,
            lift_force: 25.0,
            descent_fraction: 0.6,
            idle_gravity_compensation: 0.1,
            stabilization_factor: 2.0,
            damping_dead_band_sq: 1.0e-4,
            yaw_speed_threshold: 0.5,
            yaw_rate: 3.0,
            righting_strength: 6.0,
            righting_tolerance: 0.01,
            tilt_per_speed: 0.04,
            max_tilt: 0.35,
            tilt_smoothing: 6.0,
        }
    }
}

/// Play area, drone body, and respawn point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
    pub ceiling: f32,
    /// Lowest allowed drone centre height. `None` leaves the ground to physics.
    pub floor: Option<f32>,
    pub gravity: f32,
    pub respawn_point: Vec3,
    pub drone_radius: f32,
    pub drone_mass: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            min_x: -49.0,
            max_x: 49.0,
            min_z: -49.0,
            max_z: 49.0,
            ceiling: 150.0,
            floor: Some(0.5),
            gravity: 9.81,
            respawn_point: Vec3::new(0.0, 15.0, -20.0),
            drone_radius: 0.5,
            drone_mass: 1.0,
        }
    }
}

/// Lives, timers, and scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub starting_lives: u32,
    pub invincibility_duration: f32,
    pub mission_time_limit: f32,
    /// Delay between a delivery and the next mission's setup.
    pub transition_delay: f32,
    pub delivery_points: u32,
    pub time_bonus_per_second: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            invincibility_duration: 1.0,
            mission_time_limit: 60.0,
            transition_delay: 1.5,
            delivery_points: 100,
            time_bonus_per_second: 10,
        }
    }
}

/// Trigger geometry for pickup and delivery points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    /// Squared trigger radius shared by pickup and delivery.
    pub trigger_radius_sq: f32,
    /// Drone must be lower than pickup height plus this to grab a package.
    pub pickup_altitude_gate: f32,
    /// Allowed vertical offset from the delivery point.
    pub delivery_vertical_tolerance: f32,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            trigger_radius_sq: 9.0,
            pickup_altitude_gate: 1.5,
            delivery_vertical_tolerance: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapConfig {
    pub world_min: Vec2,
    pub world_max: Vec2,
    pub size_px: Vec2,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            world_min: Vec2::new(-50.0, -50.0),
            world_max: Vec2::new(50.0, 50.0),
            size_px: Vec2::new(200.0, 150.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    pub path: PathBuf,
    pub top_n: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("leaderboard.ron"),
            top_n: 10,
        }
    }
}

/// Persistent game settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub nickname: String,
    pub flight: FlightTuning,
    pub arena: ArenaConfig,
    pub rules: RulesConfig,
    pub mission: MissionConfig,
    pub minimap: MinimapConfig,
    pub leaderboard: LeaderboardConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            nickname: "Pilot".to_string(),
            flight: FlightTuning::default(),
            arena: ArenaConfig::default(),
            rules: RulesConfig::default(),
            mission: MissionConfig::default(),
            minimap: MinimapConfig::default(),
            leaderboard: LeaderboardConfig::default(),
        }
    }
}

impl GameConfig {
    /// Load config from `skycourier.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::from_path(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&data)
    }

    pub fn from_ron(data: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(data)?)
    }

    /// Save current config to `skycourier.ron`. Logs on error.
    pub fn save(&self) {
        let path = Self::default_path();
        match self.save_to(&path) {
            Ok(()) => log::info!("Wrote config to {:?}", path),
            Err(e) => log::warn!("{}", e),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `skycourier.ron` in the current directory.
    pub fn default_path() -> PathBuf {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_missing_fields_use_defaults() {
        let cfg = GameConfig::from_ron("(nickname: \"Ace\", rules: (starting_lives: 5))").unwrap();
        assert_eq!(cfg.nickname, "Ace");
        assert_eq!(cfg.rules.starting_lives, 5);
        assert_eq!(cfg.rules.mission_time_limit, 60.0);
        assert_eq!(cfg.arena.max_x, 49.0);
        assert_eq!(cfg.mission.trigger_radius_sq, 9.0);
    }

    #[test]
    fn config_round_trips_through_ron() {
        let mut cfg = GameConfig::default();
        cfg.flight.idle_gravity_compensation = 0.0;
        cfg.arena.floor = None;
        let text = ron::ser::to_string_pretty(&cfg, ron::ser::PrettyConfig::default()).unwrap();
        let back = GameConfig::from_ron(&text).unwrap();
        assert_eq!(back.flight.idle_gravity_compensation, 0.0);
        assert_eq!(back.arena.floor, None);
        assert_eq!(back.arena.respawn_point, Vec3::new(0.0, 15.0, -20.0));
    }

    #[test]
    fn config_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut cfg = GameConfig::default();
        cfg.nickname = "Ace".into();
        cfg.rules.starting_lives = 5;
        cfg.arena.floor = None;
        cfg.save_to(&path).unwrap();

        let back = GameConfig::from_path(&path).unwrap();
        assert_eq!(back.nickname, "Ace");
        assert_eq!(back.rules.starting_lives, 5);
        assert_eq!(back.arena.floor, None);
        assert_eq!(back.leaderboard.top_n, cfg.leaderboard.top_n);
    }

    #[test]
    fn config_save_to_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join(CONFIG_FILE);
        assert!(matches!(
            GameConfig::default().save_to(&path),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn config_rejects_garbage() {
        assert!(matches!(
            GameConfig::from_ron("not ron at all ("),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn config_righting_outpaces_yaw() {
        let tuning = FlightTuning::default();
        assert!(tuning.righting_strength > tuning.yaw_rate);
    }
}
