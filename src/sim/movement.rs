//! Linear motion for non-player entities
//!
//! Obstacles advance by their velocity once per tick with no clamping; leaving
//! the playfield is each entity's own removability check.

use super::entity::Body;

/// Advance one body by one tick, scaled by `time_scale` (1.0 = normal speed)
#[inline]
pub fn advance(body: &mut Body, time_scale: f32) {
    if !body.can_move {
        return;
    }
    if time_scale == 1.0 {
        body.pos += body.vel;
        body.rotation += body.spin;
    } else {
        body.pos += body.vel * time_scale;
        body.rotation += body.spin * time_scale;
    }
}

/// Advance every body yielded by `bodies`
pub fn advance_all<'a>(bodies: impl IntoIterator<Item = &'a mut Body>, time_scale: f32) {
    for body in bodies {
        advance(body, time_scale);
    }
}
