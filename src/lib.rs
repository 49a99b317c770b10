//! Lane Hopper - simulation core for a lane-hopping runner game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (jumping, spawning, collisions, camera, scoring)
//! - `settings`: Injected game configuration
//! - `highscores`: In-memory leaderboard of finished runs
//!
//! Rendering, asset loading and raw keyboard capture live outside this crate.
//! The simulation reads an [`sim::InputSource`] and produces a [`sim::Snapshot`].

pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (obstacle speeds are tuned per 60 Hz tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the fixed-step clock will account for
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Scene defaults
    pub const SCENE_WIDTH: f32 = 1920.0;
    pub const SCENE_HEIGHT: f32 = 1080.0;
    pub const GRID_SIZE: f32 = 80.0;

    /// Sprites fill 90% of a grid cell
    pub const SPRITE_SCALE: f32 = 0.9;
    /// Trains are twelve sprites long
    pub const TRAIN_LENGTH_CELLS: f32 = 12.0;

    /// Jump timings (seconds)
    pub const JUMP_COOLDOWN: f32 = 0.2;
    pub const JUMP_DURATION: f32 = 0.15;

    /// Camera keeps the player at 70% of the viewport height
    pub const CAMERA_FOLLOW_RATIO: f32 = 0.7;
    pub const SCROLL_SPEED: f32 = 2.0;
    pub const CATCH_UP_SPEED: f32 = 4.0;

    /// Spawn odds: each trial succeeds with probability 1/N per tick
    pub const CAR_SPAWN_ODDS: u32 = 100;
    pub const TRAIN_SPAWN_ODDS: u32 = 300;
    pub const POWER_UP_SPAWN_ODDS: u32 = 100;

    /// Obstacle speed ranges (units per tick)
    pub const CAR_SPEED_MIN: f32 = 8.0;
    pub const CAR_SPEED_MAX: f32 = 9.0;
    pub const TRAIN_SPEED_MIN: f32 = 50.0;
    pub const TRAIN_SPEED_MAX: f32 = 51.0;

    /// Timed power-up window (seconds)
    pub const POWER_UP_DURATION: f32 = 10.0;
    pub const DOUBLE_POINTS_MULTIPLIER: i64 = 2;
    pub const CLOCK_TIME_SCALE: f32 = 0.5;

    /// Player dies after standing still this long (seconds)
    pub const MAX_IDLE_TIME: f32 = 3.0;
}

/// Convert a grid index to its top-left world coordinate
#[inline]
pub fn grid_to_pixel(cell: i32, grid_size: f32) -> f32 {
    cell as f32 * grid_size
}

/// Convert a world coordinate to the grid index containing it
#[inline]
pub fn pixel_to_grid(pos: f32, grid_size: f32) -> i32 {
    (pos / grid_size).floor() as i32
}

/// Offset that centers a sprite of `extent` inside a grid cell
#[inline]
pub fn center_in_cell(extent: f32, grid_size: f32) -> f32 {
    (grid_size - extent) / 2.0
}
