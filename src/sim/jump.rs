//! Player hop state machine
//!
//! Idle → Jumping when a single direction is held, the cooldown has passed
//! and the target cell is on screen. While jumping, the player follows a
//! straight line to the target plus a visual arc on y. Landing snaps to the
//! exact target so no float error accumulates between hops.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::collision::Aabb;
use super::entity::{JumpState, Player};
use crate::settings::Settings;

/// One-cell hop direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step in world space (y grows downward)
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Base score change for an accepted hop
    pub fn score_delta(self) -> i64 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
            Direction::Left | Direction::Right => 0,
        }
    }
}

/// Try to start a hop. Returns the direction if the jump was accepted.
pub fn try_start(
    player: &mut Player,
    direction: Option<Direction>,
    now: f64,
    camera: &Camera,
    settings: &Settings,
) -> Option<Direction> {
    let direction = direction?;
    if player.jump != JumpState::Idle {
        return None;
    }
    if let Some(last) = player.last_jump_at {
        if now - last < settings.jump_cooldown as f64 {
            return None;
        }
    }

    let delta = direction.unit() * settings.grid_size;
    let target = player.body.pos + delta;
    let on_screen = Vec2::new(target.x, camera.world_to_screen(target.y));
    if !Aabb::new(on_screen, player.body.size).within(settings.scene_width, settings.scene_height) {
        log::trace!("Jump {direction:?} rejected: target out of bounds");
        return None;
    }

    player.jump = JumpState::Jumping {
        start: player.body.pos,
        delta,
        started_at: now,
    };
    player.body.vel = delta / settings.jump_duration;
    player.last_jump_at = Some(now);
    player.idle_time = 0.0;
    Some(direction)
}

/// Advance an in-flight hop to time `now`
pub fn update(player: &mut Player, now: f64, settings: &Settings) {
    let JumpState::Jumping {
        start,
        delta,
        started_at,
    } = player.jump
    else {
        return;
    };

    let elapsed = (now - started_at) as f32;
    if elapsed >= settings.jump_duration {
        let landing = start + delta;
        player.body.pos = landing;
        player.ground_pos = landing;
        player.body.vel = Vec2::ZERO;
        player.jump = JumpState::Idle;
        return;
    }

    let progress = (elapsed / settings.jump_duration).clamp(0.0, 1.0);
    let ground = start + delta * progress;
    let arc = (progress * PI).sin() * (settings.grid_size / 3.0);
    player.ground_pos = ground;
    player.body.pos = Vec2::new(ground.x, ground.y - arc);
}
