//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod camera;
pub mod clock;
pub mod collision;
pub mod effects;
pub mod entity;
pub mod jump;
pub mod movement;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use clock::FixedStep;
pub use collision::{Aabb, Collidable, CollisionReport};
pub use effects::{EffectQueue, ScoreTracker, TimedEffect};
pub use entity::{
    Body, DeathCause, Facing, JumpState, Obstacle, ObstacleKind, Player, Positionable, PowerUp,
    PowerUpKind,
};
pub use jump::Direction;
pub use snapshot::{RenderItem, RenderKind, Snapshot};
pub use spawn::RandomSource;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{InputSource, TickInput, tick};
