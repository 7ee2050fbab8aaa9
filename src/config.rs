//! Session tuning and configuration
//!
//! Every knob has a default matching the shipped game balance. Partial JSON
//! documents override only the fields they name.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::kinematics::UniformRange;

/// Inclusive integer range as it appears in config files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSpec {
    pub min: i32,
    pub max: i32,
}

impl RangeSpec {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    fn from_pair((min, max): (i32, i32)) -> Self {
        Self { min, max }
    }

    /// Build the sampling range, naming the offending field on failure
    pub fn to_range(self, field: &'static str) -> Result<UniformRange, ConfigError> {
        UniformRange::new(self.min, self.max).map_err(|source| ConfigError::Range { field, source })
    }
}

/// Play surface geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub width: f32,
    /// Visible height, for hosts framing the play area
    pub height: f32,
    /// Targets whose y drops below this are removed
    pub exit_y: f32,
    /// Hit circle radius for slicing
    pub hit_radius: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            exit_y: EXIT_Y,
            hit_radius: TARGET_HIT_RADIUS,
        }
    }
}

/// Launch sampling ranges
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KinematicsConfig {
    pub spawn_x: RangeSpec,
    pub spawn_y: f32,
    pub fast_lane: RangeSpec,
    pub slow_lane: RangeSpec,
    pub vertical: RangeSpec,
    pub angular: RangeSpec,
    pub velocity_scale: f32,
    pub angular_scale: f32,
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            spawn_x: RangeSpec::new(SPAWN_X_MIN, SPAWN_X_MAX),
            spawn_y: SPAWN_Y,
            fast_lane: RangeSpec::from_pair(FAST_LANE_SPEED),
            slow_lane: RangeSpec::from_pair(SLOW_LANE_SPEED),
            vertical: RangeSpec::from_pair(VERTICAL_SPEED),
            angular: RangeSpec::from_pair(ANGULAR_SPEED),
            velocity_scale: VELOCITY_SCALE,
            angular_scale: ANGULAR_SCALE,
        }
    }
}

/// Wave pacing and escalation
///
/// The floor/ceiling fields are off (`None`) by default: escalation is
/// exponential and uncapped unless a config opts in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    pub first_wave_delay: f32,
    pub popup_interval: f32,
    pub chain_interval: f32,
    pub physics_speed: f32,
    pub popup_decay: f32,
    pub chain_decay: f32,
    pub speed_growth: f32,
    pub min_popup_interval: Option<f32>,
    pub min_chain_interval: Option<f32>,
    pub max_physics_speed: Option<f32>,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            first_wave_delay: FIRST_WAVE_DELAY,
            popup_interval: POPUP_INTERVAL,
            chain_interval: CHAIN_INTERVAL,
            physics_speed: PHYSICS_SPEED,
            popup_decay: POPUP_DECAY,
            chain_decay: CHAIN_DECAY,
            speed_growth: SPEED_GROWTH,
            min_popup_interval: None,
            min_chain_interval: None,
            max_physics_speed: None,
        }
    }
}

/// Complete session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Run seed; `None` picks one from OS entropy
    pub seed: Option<u64>,
    pub lives: u8,
    /// One in `hazard_odds` random targets is a hazard
    pub hazard_odds: u32,
    /// Random patterns appended after the fixed opening
    pub random_wave_count: usize,
    pub max_path_points: usize,
    pub swoosh_duration: f32,
    pub gravity: Vec2,
    pub field: FieldConfig,
    pub kinematics: KinematicsConfig,
    pub difficulty: DifficultyConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: None,
            lives: MAX_LIVES,
            hazard_odds: HAZARD_ODDS,
            random_wave_count: RANDOM_WAVE_COUNT,
            max_path_points: MAX_PATH_POINTS,
            swoosh_duration: SWOOSH_DURATION,
            gravity: GRAVITY,
            field: FieldConfig::default(),
            kinematics: KinematicsConfig::default(),
            difficulty: DifficultyConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Default config with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded session config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configs the core cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let k = &self.kinematics;
        k.spawn_x.to_range("kinematics.spawn_x")?;
        k.fast_lane.to_range("kinematics.fast_lane")?;
        k.slow_lane.to_range("kinematics.slow_lane")?;
        k.vertical.to_range("kinematics.vertical")?;
        k.angular.to_range("kinematics.angular")?;

        if self.lives == 0 || self.lives > MAX_LIVES {
            return Err(ConfigError::invalid(
                "lives",
                format!("must be between 1 and {MAX_LIVES}, got {}", self.lives),
            ));
        }
        if self.hazard_odds == 0 {
            return Err(ConfigError::invalid("hazard_odds", "must be at least 1"));
        }
        if self.max_path_points < 2 {
            return Err(ConfigError::invalid(
                "max_path_points",
                "a path needs at least 2 points to form a segment",
            ));
        }
        if self.field.width <= 0.0 || self.field.height <= 0.0 {
            return Err(ConfigError::invalid("field", "dimensions must be positive"));
        }
        if self.field.hit_radius <= 0.0 {
            return Err(ConfigError::invalid("field.hit_radius", "must be positive"));
        }
        // Negated comparisons from here on also reject NaN
        if !(self.kinematics.spawn_y > self.field.exit_y) {
            return Err(ConfigError::invalid(
                "kinematics.spawn_y",
                format!(
                    "must be above field.exit_y ({}), got {}",
                    self.field.exit_y, self.kinematics.spawn_y
                ),
            ));
        }

        let d = &self.difficulty;
        for (field, value) in [
            ("difficulty.first_wave_delay", d.first_wave_delay),
            ("difficulty.popup_interval", d.popup_interval),
            ("difficulty.chain_interval", d.chain_interval),
            ("difficulty.physics_speed", d.physics_speed),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::invalid(field, format!("must be positive, got {value}")));
            }
        }
        for (field, value) in [
            ("difficulty.popup_decay", d.popup_decay),
            ("difficulty.chain_decay", d.chain_decay),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::invalid(field, format!("must be in (0, 1), got {value}")));
            }
        }
        if !(d.speed_growth > 1.0) {
            return Err(ConfigError::invalid(
                "difficulty.speed_growth",
                format!("must be greater than 1, got {}", d.speed_growth),
            ));
        }

        Ok(())
    }
}
