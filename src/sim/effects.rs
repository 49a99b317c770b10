//! Score keeping, timed power-up effects and the idle timeout
//!
//! Timed effects are countdowns owned by the session and advanced by the
//! tick, never OS timers. Restarting a session clears the queue, so a stale
//! expiry can never fire into a fresh run.

use serde::{Deserialize, Serialize};

use super::entity::{DeathCause, Player, PowerUpKind};
use super::jump::Direction;

/// Running score for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTracker {
    pub total: i64,
}

impl ScoreTracker {
    /// Apply the score for an accepted hop. Returns the new total if it changed.
    pub fn on_jump(&mut self, direction: Direction, doubled: bool, multiplier: i64) -> Option<i64> {
        let base = direction.score_delta();
        if base == 0 {
            return None;
        }
        let delta = if doubled { base * multiplier } else { base };
        self.total += delta;
        Some(self.total)
    }

    pub fn reset(&mut self) {
        self.total = 0;
    }
}

/// Effect that runs out after a delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimedEffect {
    DoublePoints,
    Clock,
}

impl TimedEffect {
    pub fn kind(self) -> PowerUpKind {
        match self {
            TimedEffect::DoublePoints => PowerUpKind::DoublePoints,
            TimedEffect::Clock => PowerUpKind::Clock,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Pending {
    effect: TimedEffect,
    /// Seconds of simulation time left
    remaining: f32,
}

/// Deferred effect expiries, counted down by the tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectQueue {
    pending: Vec<Pending>,
}

impl EffectQueue {
    /// Start (or restart) an effect's window. Effects never stack.
    pub fn schedule(&mut self, effect: TimedEffect, duration: f32) {
        self.cancel(effect);
        self.pending.push(Pending {
            effect,
            remaining: duration,
        });
    }

    pub fn cancel(&mut self, effect: TimedEffect) {
        self.pending.retain(|p| p.effect != effect);
    }

    pub fn is_active(&self, effect: TimedEffect) -> bool {
        self.pending.iter().any(|p| p.effect == effect)
    }

    /// Seconds left on an effect, if active
    pub fn remaining(&self, effect: TimedEffect) -> Option<f32> {
        self.pending.iter().find(|p| p.effect == effect).map(|p| p.remaining)
    }

    /// Count down by `dt` and return every effect that expired, in schedule order
    pub fn advance(&mut self, dt: f32) -> Vec<TimedEffect> {
        let mut expired = Vec::new();
        for pending in self.pending.iter_mut() {
            pending.remaining -= dt;
            if pending.remaining <= 0.0 {
                expired.push(pending.effect);
            }
        }
        self.pending.retain(|p| p.remaining > 0.0);
        expired
    }

    /// Drop every pending expiry without firing it
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Apply a collected power-up to the player and schedule any expiry
pub fn activate(kind: PowerUpKind, player: &mut Player, queue: &mut EffectQueue, duration: f32) {
    match kind {
        PowerUpKind::Shield => {
            player.has_shield = true;
        }
        PowerUpKind::DoublePoints => {
            player.double_points = true;
            queue.schedule(TimedEffect::DoublePoints, duration);
        }
        PowerUpKind::Clock => {
            queue.schedule(TimedEffect::Clock, duration);
        }
    }
}

/// Undo an expired effect on the player
pub fn expire(effect: TimedEffect, player: &mut Player) {
    if effect == TimedEffect::DoublePoints {
        player.double_points = false;
    }
}

/// Accumulate time spent without vertical movement.
/// Returns true if this call killed the player.
pub fn update_idle(player: &mut Player, dt: f32, max_idle_time: f32) -> bool {
    if player.is_dead() {
        return false;
    }
    let y = player.body.pos.y;
    if y == player.last_y {
        player.idle_time += dt;
    } else {
        player.idle_time = 0.0;
    }
    player.last_y = y;

    if player.idle_time >= max_idle_time {
        log::info!("Player idle for {:.2}s", player.idle_time);
        return player.die(DeathCause::Idle);
    }
    false
}
