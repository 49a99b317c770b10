//! Game settings
//!
//! Every tunable the simulation reads lives here and is injected into
//! [`crate::sim::GameState::new`]. Settings are validated before a session
//! starts; the core never falls back to hard-coded geometry.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Half-open speed range `[min, max)` sampled once per spawned obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedRange {
    pub min: f32,
    pub max: f32,
}

impl SpeedRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Map a unit sample in `[0, 1)` onto the range
    #[inline]
    pub fn sample(&self, unit: f32) -> f32 {
        self.min + unit * (self.max - self.min)
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        let ok = self.min.is_finite()
            && self.max.is_finite()
            && self.min >= 0.0
            && self.min <= self.max;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange {
                field,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    pub scene_width: f32,
    pub scene_height: f32,
    /// Side length of one grid cell
    pub grid_size: f32,
    /// Sprite extent as a fraction of a grid cell
    pub sprite_scale: f32,
    /// Train length in sprite widths
    pub train_length_cells: f32,

    // === Jumping (seconds) ===
    pub jump_cooldown: f32,
    pub jump_duration: f32,

    // === Camera ===
    /// Fraction of the scene height between camera top and player
    pub camera_follow_ratio: f32,
    /// Units per tick
    pub scroll_speed: f32,
    /// Extra units per tick while lagging behind target
    pub catch_up_speed: f32,

    // === Spawning ===
    pub car_spawn_odds: u32,
    pub train_spawn_odds: u32,
    pub power_up_spawn_odds: u32,
    pub car_speed: SpeedRange,
    pub train_speed: SpeedRange,
    /// Allow Clock power-ups to spawn alongside Shield and DoublePoints
    pub clock_power_ups: bool,

    // === Power-ups ===
    /// Duration of DoublePoints and Clock (seconds)
    pub power_up_duration: f32,
    pub double_points_multiplier: i64,
    /// Obstacle speed factor while a Clock is active
    pub clock_time_scale: f32,

    // === Idle ===
    /// Seconds without vertical movement before the player dies
    pub max_idle_time: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scene_width: SCENE_WIDTH,
            scene_height: SCENE_HEIGHT,
            grid_size: GRID_SIZE,
            sprite_scale: SPRITE_SCALE,
            train_length_cells: TRAIN_LENGTH_CELLS,

            jump_cooldown: JUMP_COOLDOWN,
            jump_duration: JUMP_DURATION,

            camera_follow_ratio: CAMERA_FOLLOW_RATIO,
            scroll_speed: SCROLL_SPEED,
            catch_up_speed: CATCH_UP_SPEED,

            car_spawn_odds: CAR_SPAWN_ODDS,
            train_spawn_odds: TRAIN_SPAWN_ODDS,
            power_up_spawn_odds: POWER_UP_SPAWN_ODDS,
            car_speed: SpeedRange::new(CAR_SPEED_MIN, CAR_SPEED_MAX),
            train_speed: SpeedRange::new(TRAIN_SPEED_MIN, TRAIN_SPEED_MAX),
            clock_power_ups: false,

            power_up_duration: POWER_UP_DURATION,
            double_points_multiplier: DOUBLE_POINTS_MULTIPLIER,
            clock_time_scale: CLOCK_TIME_SCALE,

            max_idle_time: MAX_IDLE_TIME,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Check every precondition the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("scene_width", self.scene_width),
            ("scene_height", self.scene_height),
            ("grid_size", self.grid_size),
            ("train_length_cells", self.train_length_cells),
            ("jump_duration", self.jump_duration),
            ("power_up_duration", self.power_up_duration),
            ("max_idle_time", self.max_idle_time),
        ];
        for (field, value) in positive {
            // Written this way so NaN is rejected too
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        let non_negative = [
            ("jump_cooldown", self.jump_cooldown),
            ("scroll_speed", self.scroll_speed),
            ("catch_up_speed", self.catch_up_speed),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if self.grid_size > self.scene_width || self.grid_size > self.scene_height {
            return Err(ConfigError::GridLargerThanScene {
                grid_size: self.grid_size,
                width: self.scene_width,
                height: self.scene_height,
            });
        }

        if !(self.sprite_scale > 0.0 && self.sprite_scale <= 1.0) {
            return Err(ConfigError::OutOfUnitRange {
                field: "sprite_scale",
                value: self.sprite_scale,
            });
        }
        if !(0.0..=1.0).contains(&self.camera_follow_ratio) {
            return Err(ConfigError::OutOfUnitRange {
                field: "camera_follow_ratio",
                value: self.camera_follow_ratio,
            });
        }
        if !(self.clock_time_scale >= 0.0 && self.clock_time_scale <= 1.0) {
            return Err(ConfigError::OutOfUnitRange {
                field: "clock_time_scale",
                value: self.clock_time_scale,
            });
        }

        let odds = [
            ("car_spawn_odds", self.car_spawn_odds),
            ("train_spawn_odds", self.train_spawn_odds),
            ("power_up_spawn_odds", self.power_up_spawn_odds),
        ];
        for (field, value) in odds {
            if value == 0 {
                return Err(ConfigError::ZeroOdds { field });
            }
        }

        self.car_speed.validate("car_speed")?;
        self.train_speed.validate("train_speed")?;

        Ok(())
    }

    /// Number of whole grid columns in the scene
    pub fn grid_cols(&self) -> u32 {
        (self.scene_width / self.grid_size) as u32
    }

    /// Number of whole grid rows (lanes) in the scene
    pub fn grid_rows(&self) -> u32 {
        (self.scene_height / self.grid_size) as u32
    }

    /// Side length of a one-cell sprite
    pub fn sprite_size(&self) -> f32 {
        self.grid_size * self.sprite_scale
    }

    /// Distance between camera top and the followed player
    pub fn camera_offset(&self) -> f32 {
        self.scene_height * self.camera_follow_ratio
    }
}
