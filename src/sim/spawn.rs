//! Probabilistic spawning of obstacles and power-ups
//!
//! Every tick runs three independent trials (car, train, power-up), each
//! succeeding with probability 1/N. Low-odds trials per tick approximate a
//! Poisson arrival process without timers, so spawning stays inside the
//! deterministic tick. All randomness goes through [`RandomSource`].

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::camera::Camera;
use super::entity::{Body, Facing, Obstacle, ObstacleKind, Player, PowerUp, PowerUpKind};
use crate::settings::{Settings, SpeedRange};
use crate::{center_in_cell, grid_to_pixel, pixel_to_grid};

/// Random draws used by the spawner
pub trait RandomSource {
    /// Uniform integer in `[0, n)`; `n` is at least 1
    fn below(&mut self, n: u32) -> u32;
    /// Fair coin
    fn coin(&mut self) -> bool;
    /// Uniform float in `[0, 1)`
    fn unit(&mut self) -> f32;
}

impl RandomSource for Pcg32 {
    fn below(&mut self, n: u32) -> u32 {
        self.random_range(0..n)
    }

    fn coin(&mut self) -> bool {
        self.random_bool(0.5)
    }

    fn unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Everything decided for one obstacle spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleSpawn {
    pub kind: ObstacleKind,
    /// Entered from the right edge (moving left)
    pub from_right: bool,
    /// Lane index counted from the top visible row
    pub lane: u32,
    /// Signed horizontal speed (units per tick)
    pub speed: f32,
}

impl ObstacleSpawn {
    pub fn facing(&self) -> Facing {
        if self.from_right {
            Facing::Left
        } else {
            Facing::Right
        }
    }
}

/// Everything decided for one power-up spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerUpSpawn {
    pub kind: PowerUpKind,
    pub col: u32,
    /// Row counted from the top visible row
    pub row: u32,
}

/// Bernoulli trial with probability 1/odds
#[inline]
fn trial(rng: &mut impl RandomSource, odds: u32) -> bool {
    rng.below(odds) == 0
}

/// Roll one obstacle trial
pub fn roll_obstacle(
    rng: &mut impl RandomSource,
    kind: ObstacleKind,
    odds: u32,
    speed: SpeedRange,
    lanes: u32,
) -> Option<ObstacleSpawn> {
    if !trial(rng, odds) {
        return None;
    }
    let from_right = rng.coin();
    let lane = rng.below(lanes);
    let magnitude = speed.sample(rng.unit());
    Some(ObstacleSpawn {
        kind,
        from_right,
        lane,
        speed: if from_right { -magnitude } else { magnitude },
    })
}

/// Roll the power-up trial
pub fn roll_power_up(rng: &mut impl RandomSource, settings: &Settings) -> Option<PowerUpSpawn> {
    if !trial(rng, settings.power_up_spawn_odds) {
        return None;
    }
    let kind = if settings.clock_power_ups {
        match rng.below(3) {
            0 => PowerUpKind::Shield,
            1 => PowerUpKind::DoublePoints,
            _ => PowerUpKind::Clock,
        }
    } else if rng.coin() {
        PowerUpKind::Shield
    } else {
        PowerUpKind::DoublePoints
    };
    let col = rng.below(settings.grid_cols());
    let row = rng.below(settings.grid_rows());
    Some(PowerUpSpawn { kind, col, row })
}

/// Grid row at the top of the view
#[inline]
pub fn top_visible_row(camera: &Camera, grid_size: f32) -> i32 {
    pixel_to_grid(camera.y, grid_size)
}

/// Build the obstacle entity for a spawn decision
pub fn build_obstacle(
    id: u32,
    spawn: &ObstacleSpawn,
    camera: &Camera,
    settings: &Settings,
) -> Obstacle {
    let height = settings.sprite_size();
    let width = match spawn.kind {
        ObstacleKind::Car => height,
        ObstacleKind::Train => height * settings.train_length_cells,
    };
    let row = top_visible_row(camera, settings.grid_size) + spawn.lane as i32;
    let y = grid_to_pixel(row, settings.grid_size) + center_in_cell(height, settings.grid_size);
    let x = if spawn.from_right {
        settings.scene_width
    } else {
        -width
    };
    let body = Body::new(Vec2::new(x, y), Vec2::new(width, height))
        .with_velocity(Vec2::new(spawn.speed, 0.0));
    Obstacle::new(id, spawn.kind, spawn.facing(), body)
}

/// Build the power-up entity, or `None` if it would land on the player's cell
pub fn build_power_up(
    id: u32,
    spawn: &PowerUpSpawn,
    player: &Player,
    camera: &Camera,
    settings: &Settings,
) -> Option<PowerUp> {
    let col = spawn.col as i32;
    let row = top_visible_row(camera, settings.grid_size) + spawn.row as i32;
    if player.cell(settings.grid_size) == (col, row) {
        log::trace!("Power-up spawn skipped: cell ({col}, {row}) is occupied by the player");
        return None;
    }
    let size = settings.sprite_size();
    let offset = center_in_cell(size, settings.grid_size);
    let pos = Vec2::new(
        grid_to_pixel(col, settings.grid_size) + offset,
        grid_to_pixel(row, settings.grid_size) + offset,
    );
    Some(PowerUp::new(id, spawn.kind, pos, Vec2::splat(size)))
}

/// What one tick of spawning decided
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnRolls {
    pub car: Option<ObstacleSpawn>,
    pub train: Option<ObstacleSpawn>,
    pub power_up: Option<PowerUpSpawn>,
}

/// Run the three trials for one tick, in car, train, power-up order
pub fn roll_all(rng: &mut impl RandomSource, settings: &Settings) -> SpawnRolls {
    let lanes = settings.grid_rows();
    SpawnRolls {
        car: roll_obstacle(
            rng,
            ObstacleKind::Car,
            settings.car_spawn_odds,
            settings.car_speed,
            lanes,
        ),
        train: roll_obstacle(
            rng,
            ObstacleKind::Train,
            settings.train_spawn_odds,
            settings.train_speed,
            lanes,
        ),
        power_up: roll_power_up(rng, settings),
    }
}
