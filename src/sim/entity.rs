//! Entity records: player, obstacles and power-ups
//!
//! Entities share a plain [`Body`] instead of a common base type. Behavior
//! that needs position or bounds goes through [`Positionable`] and
//! [`super::Collidable`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::collision::Collidable;
use crate::settings::Settings;
use crate::{center_in_cell, grid_to_pixel, pixel_to_grid};

/// Kinematic state shared by every entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner in world space
    pub pos: Vec2,
    /// Rotation (degrees)
    pub rotation: f32,
    /// Linear velocity (units per tick for obstacles)
    pub vel: Vec2,
    /// Angular velocity (degrees per tick)
    pub spin: f32,
    pub size: Vec2,
    pub health: f32,
    /// Marked for the end-of-tick sweep
    pub removable: bool,
    pub can_move: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            rotation: 0.0,
            vel: Vec2::ZERO,
            spin: 0.0,
            size,
            health: 1.0,
            removable: false,
            can_move: true,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn kill(&mut self) {
        self.health = 0.0;
    }

    pub fn mark_removable(&mut self) {
        self.removable = true;
    }

    pub fn stop(&mut self) {
        self.can_move = false;
        self.vel = Vec2::ZERO;
        self.spin = 0.0;
    }
}

/// Anything with a world position and extent
pub trait Positionable {
    fn body(&self) -> &Body;

    fn position(&self) -> Vec2 {
        self.body().pos
    }

    fn size(&self) -> Vec2 {
        self.body().size
    }
}

impl Positionable for Body {
    fn body(&self) -> &Body {
        self
    }
}

impl Collidable for Body {}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Hit an obstacle without a shield
    Collision,
    /// Stood still for too long
    Idle,
    /// Dropped below the bottom of the view
    FellBehind,
}

/// Player hop state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum JumpState {
    Idle,
    /// Mid-hop from `start` toward `start + delta`
    Jumping {
        start: Vec2,
        delta: Vec2,
        started_at: f64,
    },
    /// Terminal; input and movement are ignored
    Dead { cause: DeathCause },
}

/// The player-controlled hopper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub body: Body,
    pub jump: JumpState,
    /// Position without the hop arc; this is what the camera follows
    pub ground_pos: Vec2,
    /// Simulation time of the last accepted jump
    pub last_jump_at: Option<f64>,
    /// Seconds spent without vertical movement
    pub idle_time: f32,
    /// Body y observed on the previous tick
    pub last_y: f32,
    pub has_shield: bool,
    pub double_points: bool,
    /// Obstacles that broke the shield and have not separated yet
    #[serde(default)]
    pub shield_grace: Vec<u32>,
}

impl Player {
    /// Create the player in its starting cell: middle column, 70% down the grid
    pub fn spawn(id: u32, settings: &Settings) -> Self {
        let size = settings.sprite_size();
        let col = (settings.grid_cols() / 2) as i32;
        let row = (settings.grid_rows() as f32 * 0.7) as i32;
        let offset = center_in_cell(size, settings.grid_size);
        let pos = Vec2::new(
            grid_to_pixel(col, settings.grid_size) + offset,
            grid_to_pixel(row, settings.grid_size) + offset,
        );
        Self::at(id, pos, Vec2::splat(size))
    }

    /// Create an idle player at an explicit position
    pub fn at(id: u32, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            body: Body::new(pos, size),
            jump: JumpState::Idle,
            ground_pos: pos,
            last_jump_at: None,
            idle_time: 0.0,
            last_y: pos.y,
            has_shield: false,
            double_points: false,
            shield_grace: Vec::new(),
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        matches!(self.jump, JumpState::Dead { .. })
    }

    #[inline]
    pub fn is_jumping(&self) -> bool {
        matches!(self.jump, JumpState::Jumping { .. })
    }

    pub fn death_cause(&self) -> Option<DeathCause> {
        match self.jump {
            JumpState::Dead { cause } => Some(cause),
            _ => None,
        }
    }

    /// Enter the terminal state. Returns false if already dead.
    pub fn die(&mut self, cause: DeathCause) -> bool {
        if self.is_dead() {
            return false;
        }
        self.jump = JumpState::Dead { cause };
        self.body.kill();
        self.body.stop();
        true
    }

    /// Grid cell (column, row) under the player's grounded center
    pub fn cell(&self, grid_size: f32) -> (i32, i32) {
        let center = self.ground_pos + self.body.size * 0.5;
        (
            pixel_to_grid(center.x, grid_size),
            pixel_to_grid(center.y, grid_size),
        )
    }
}

impl Positionable for Player {
    fn body(&self) -> &Body {
        &self.body
    }
}

impl Collidable for Player {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Car,
    Train,
}

/// Which way the sprite faces; matches the direction of travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// A vehicle crossing a lane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub facing: Facing,
    pub body: Body,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, facing: Facing, body: Body) -> Self {
        Self {
            id,
            kind,
            facing,
            body,
        }
    }

    /// Mark for removal once below the view or past the far edge
    pub fn check_removability(&mut self, camera: &Camera, scene_width: f32, scene_height: f32) {
        let below_view = camera.world_to_screen(self.body.pos.y) > scene_height;
        let crossed = match self.facing {
            Facing::Right => self.body.pos.x > scene_width,
            Facing::Left => self.body.pos.x + self.body.size.x < 0.0,
        };
        if below_view || crossed {
            self.body.mark_removable();
        }
    }
}

impl Positionable for Obstacle {
    fn body(&self) -> &Body {
        &self.body
    }
}

impl Collidable for Obstacle {}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Absorbs one fatal collision
    Shield,
    /// Multiplies score changes for a limited time
    DoublePoints,
    /// Slows obstacles for a limited time
    Clock,
}

/// A collectible sitting in a grid cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub body: Body,
    pub collected: bool,
}

impl PowerUp {
    pub fn new(id: u32, kind: PowerUpKind, pos: Vec2, size: Vec2) -> Self {
        let mut body = Body::new(pos, size);
        body.can_move = false;
        Self {
            id,
            kind,
            body,
            collected: false,
        }
    }

    /// One-shot collection. Returns true only the first time.
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        self.body.mark_removable();
        true
    }

    pub fn check_removability(&mut self, camera: &Camera, scene_height: f32) {
        if camera.world_to_screen(self.body.pos.y) > scene_height {
            self.body.mark_removable();
        }
    }
}

impl Positionable for PowerUp {
    fn body(&self) -> &Body {
        &self.body
    }
}

impl Collidable for PowerUp {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_spawn_cell() {
        let settings = Settings::default();
        let player = Player::spawn(1, &settings);
        // 24 columns / 2 = 12, 13 rows * 0.7 = 9
        assert_eq!(player.cell(settings.grid_size), (12, 9));
        assert_eq!(player.body.pos, Vec2::new(964.0, 724.0));
        assert!(player.body.is_alive());
        assert_eq!(player.jump, JumpState::Idle);
    }

    #[test]
    fn test_player_dies_once() {
        let settings = Settings::default();
        let mut player = Player::spawn(1, &settings);
        assert!(player.die(DeathCause::Idle));
        assert!(!player.die(DeathCause::Collision));
        assert_eq!(player.death_cause(), Some(DeathCause::Idle));
        assert!(!player.body.is_alive());
        assert!(!player.body.can_move);
    }

    #[test]
    fn test_power_up_collect_is_one_shot() {
        let mut power_up = PowerUp::new(7, PowerUpKind::Shield, Vec2::ZERO, Vec2::splat(72.0));
        assert!(power_up.collect());
        assert!(power_up.body.removable);
        assert!(!power_up.collect());
        assert!(power_up.collected);
    }

    #[test]
    fn test_obstacle_removability() {
        let settings = Settings::default();
        let camera = Camera::new(&settings);

        // Right-moving car still on screen
        let body = Body::new(Vec2::new(100.0, 400.0), Vec2::splat(72.0));
        let mut car = Obstacle::new(1, ObstacleKind::Car, Facing::Right, body);
        car.check_removability(&camera, settings.scene_width, settings.scene_height);
        assert!(!car.body.removable);

        // Past the right edge
        car.body.pos.x = settings.scene_width + 1.0;
        car.check_removability(&camera, settings.scene_width, settings.scene_height);
        assert!(car.body.removable);

        // Freshly spawned on the right, moving left: not yet crossed
        let body = Body::new(Vec2::new(settings.scene_width, 400.0), Vec2::splat(72.0));
        let mut car = Obstacle::new(2, ObstacleKind::Car, Facing::Left, body);
        car.check_removability(&camera, settings.scene_width, settings.scene_height);
        assert!(!car.body.removable);

        // Below the view
        car.body.pos.y = settings.scene_height + 1.0;
        car.check_removability(&camera, settings.scene_width, settings.scene_height);
        assert!(car.body.removable);
    }
}
