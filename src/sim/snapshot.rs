//! Renderable snapshot of the current tick
//!
//! The renderer receives ids, screen-space positions, rotation and a kind
//! tag. It never sees sprites or pixels from the simulation side.

use serde::{Deserialize, Serialize};

use super::entity::{Facing, ObstacleKind, PowerUpKind};
use super::state::{GamePhase, GameState};

/// What the renderer should draw for an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderKind {
    Player { shielded: bool },
    Car { facing: Facing },
    Train { facing: Facing },
    PowerUp { kind: PowerUpKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderItem {
    pub id: u32,
    pub x: f32,
    /// Screen-space y (camera applied)
    pub y: f32,
    pub rotation: f32,
    pub kind: RenderKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub score: i64,
    pub camera_y: f32,
    pub phase: GamePhase,
    pub double_points: bool,
    /// Player first, then obstacles, then power-ups, each in id order
    pub entities: Vec<RenderItem>,
}

impl GameState {
    /// Build the render payload for the current state
    pub fn snapshot(&self) -> Snapshot {
        let camera = &self.camera;
        let mut entities = Vec::with_capacity(1 + self.obstacles.len() + self.power_ups.len());

        let player = &self.player;
        entities.push(RenderItem {
            id: player.id,
            x: player.body.pos.x,
            y: camera.world_to_screen(player.body.pos.y),
            rotation: player.body.rotation,
            kind: RenderKind::Player {
                shielded: player.has_shield,
            },
        });

        for obstacle in &self.obstacles {
            let kind = match obstacle.kind {
                ObstacleKind::Car => RenderKind::Car {
                    facing: obstacle.facing,
                },
                ObstacleKind::Train => RenderKind::Train {
                    facing: obstacle.facing,
                },
            };
            entities.push(RenderItem {
                id: obstacle.id,
                x: obstacle.body.pos.x,
                y: camera.world_to_screen(obstacle.body.pos.y),
                rotation: obstacle.body.rotation,
                kind,
            });
        }

        entities.extend(self.power_ups.iter().map(|p| RenderItem {
            id: p.id,
            x: p.body.pos.x,
            y: camera.world_to_screen(p.body.pos.y),
            rotation: p.body.rotation,
            kind: RenderKind::PowerUp { kind: p.kind },
        }));

        Snapshot {
            tick: self.time_ticks,
            score: self.score.total,
            camera_y: camera.y,
            phase: self.phase,
            double_points: self.player.double_points,
            entities,
        }
    }
}
