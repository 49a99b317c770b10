//! Simulation tick
//!
//! One call advances the session by one step. Phases always run in this
//! order: input, jump, movement, collisions, camera, spawning, removal sweep,
//! bookkeeping. A freshly spawned obstacle therefore never takes part in the
//! collision check of the tick that created it, and removal happens once, in
//! the sweep.

use super::collision::{self, CollisionReport};
use super::effects::{self, TimedEffect};
use super::entity::DeathCause;
use super::jump::{self, Direction};
use super::movement;
use super::spawn;
use super::state::{GameEvent, GamePhase, GameState};

/// Input capability queried once per tick
pub trait InputSource {
    fn move_up(&self) -> bool;
    fn move_down(&self) -> bool;
    fn move_left(&self) -> bool;
    fn move_right(&self) -> bool;
    /// Confirm: restarts a finished run
    fn fire_primary(&self) -> bool;
    /// Toggles pause
    fn fire_secondary(&self) -> bool;
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire_primary: bool,
    pub fire_secondary: bool,
}

impl TickInput {
    /// Query every capability once
    pub fn sample(source: &impl InputSource) -> Self {
        Self {
            up: source.move_up(),
            down: source.move_down(),
            left: source.move_left(),
            right: source.move_right(),
            fire_primary: source.fire_primary(),
            fire_secondary: source.fire_secondary(),
        }
    }

    /// Shorthand for a single held direction
    pub fn hold(direction: Direction) -> Self {
        let mut input = Self::default();
        match direction {
            Direction::Up => input.up = true,
            Direction::Down => input.down = true,
            Direction::Left => input.left = true,
            Direction::Right => input.right = true,
        }
        input
    }

    /// Resolved movement intent
    ///
    /// Opposite directions cancel each other, and a jump needs exactly one
    /// direction, so holding keys on both axes yields nothing.
    pub fn direction(&self) -> Option<Direction> {
        let vertical = match (self.up, self.down) {
            (true, false) => Some(Direction::Up),
            (false, true) => Some(Direction::Down),
            _ => None,
        };
        let horizontal = match (self.left, self.right) {
            (true, false) => Some(Direction::Left),
            (false, true) => Some(Direction::Right),
            _ => None,
        };
        match (vertical, horizontal) {
            (Some(d), None) | (None, Some(d)) => Some(d),
            _ => None,
        }
    }
}

impl InputSource for TickInput {
    fn move_up(&self) -> bool {
        self.up
    }

    fn move_down(&self) -> bool {
        self.down
    }

    fn move_left(&self) -> bool {
        self.left
    }

    fn move_right(&self) -> bool {
        self.right
    }

    fn fire_primary(&self) -> bool {
        self.fire_primary
    }

    fn fire_secondary(&self) -> bool {
        self.fire_secondary
    }
}

/// Advance the game state by one step of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    // Fire buttons act on press, not while held
    let (prev_primary, prev_secondary) = state.prev_fire;
    state.prev_fire = (input.fire_primary, input.fire_secondary);
    let confirm = input.fire_primary && !prev_primary;
    let pause = input.fire_secondary && !prev_secondary;

    match state.phase {
        GamePhase::GameOver => {
            if confirm {
                state.restart();
            }
            return;
        }
        GamePhase::Paused => {
            if pause {
                state.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
            return;
        }
        GamePhase::Playing => {
            if pause {
                state.phase = GamePhase::Paused;
                log::info!("Paused");
                return;
            }
        }
    }

    state.time_ticks += 1;
    state.clock += dt as f64;
    let now = state.clock;

    // Input resolution; score applies when the jump is accepted
    let accepted = jump::try_start(
        &mut state.player,
        input.direction(),
        now,
        &state.camera,
        &state.settings,
    );
    if let Some(direction) = accepted {
        log::trace!("Jump {direction:?} at t={now:.3}");
        let doubled = state.player.double_points;
        if let Some(total) = state
            .score
            .on_jump(direction, doubled, state.settings.double_points_multiplier)
        {
            state.emit(GameEvent::ScoreChanged { total });
        }
    }

    // Player hop
    jump::update(&mut state.player, now, &state.settings);
    state.best_y = state.best_y.min(state.player.ground_pos.y);

    // Obstacle movement
    let time_scale = if state.effects.is_active(TimedEffect::Clock) {
        state.settings.clock_time_scale
    } else {
        1.0
    };
    movement::advance_all(
        state
            .obstacles
            .iter_mut()
            .map(|o| &mut o.body)
            .chain(state.power_ups.iter_mut().map(|p| &mut p.body)),
        time_scale,
    );

    // Collisions
    let mut report = CollisionReport::default();
    collision::resolve_obstacles(&mut state.player, &state.obstacles, &mut report);
    collision::collect_power_ups(&state.player, &mut state.power_ups, &mut report);
    if report.shield_broken_by.is_some() {
        state.emit(GameEvent::ShieldBroken);
    }
    for kind in report.collected {
        effects::activate(
            kind,
            &mut state.player,
            &mut state.effects,
            state.settings.power_up_duration,
        );
        state.emit(GameEvent::PowerUpCollected { kind });
    }
    if report.killed_by.is_some() {
        state.end_run(DeathCause::Collision);
        return;
    }

    // Camera follows the grounded position so the hop arc alone never starts it
    state.camera.update(state.player.ground_pos.y);
    if state
        .camera
        .has_fallen_behind(state.player.body.pos.y, state.settings.scene_height)
        && state.player.die(DeathCause::FellBehind)
    {
        state.end_run(DeathCause::FellBehind);
        return;
    }

    // Spawning
    let rolls = spawn::roll_all(&mut state.rng, &state.settings);
    for planned in [rolls.car, rolls.train].into_iter().flatten() {
        let id = state.next_entity_id();
        let obstacle = spawn::build_obstacle(id, &planned, &state.camera, &state.settings);
        log::debug!(
            "Spawned {:?} {} in lane {} at speed {:.2}",
            obstacle.kind,
            id,
            planned.lane,
            planned.speed
        );
        state.obstacles.push(obstacle);
    }
    if let Some(planned) = rolls.power_up {
        let id = state.next_entity_id();
        if let Some(power_up) =
            spawn::build_power_up(id, &planned, &state.player, &state.camera, &state.settings)
        {
            log::debug!("Spawned {:?} power-up {}", power_up.kind, id);
            state.power_ups.push(power_up);
        }
    }

    // Removal sweep
    let (width, height) = (state.settings.scene_width, state.settings.scene_height);
    for obstacle in state.obstacles.iter_mut() {
        obstacle.check_removability(&state.camera, width, height);
    }
    for power_up in state.power_ups.iter_mut() {
        power_up.check_removability(&state.camera, height);
    }
    state.obstacles.retain(|o| !o.body.removable);
    state.power_ups.retain(|p| !p.body.removable);

    // Bookkeeping
    for effect in state.effects.advance(dt) {
        effects::expire(effect, &mut state.player);
        log::debug!("{effect:?} expired");
        state.emit(GameEvent::PowerUpExpired {
            kind: effect.kind(),
        });
    }
    if effects::update_idle(&mut state.player, dt, state.settings.max_idle_time) {
        state.end_run(DeathCause::Idle);
    }

    // Ensure deterministic ordering
    state.normalize_order();
}
