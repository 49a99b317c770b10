//! Axis-aligned overlap tests and collision resolution
//!
//! Boxes are inclusive on every edge, so touching counts as a hit. Resolution
//! never removes anything directly: it only marks entities, and the
//! end-of-tick sweep does the removal.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{DeathCause, Obstacle, Player, PowerUp, PowerUpKind, Positionable};

/// Axis-aligned bounding box (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Inclusive overlap test; symmetric in its arguments
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        a_max.x >= other.min.x
            && a_max.y >= other.min.y
            && self.min.x <= b_max.x
            && self.min.y <= b_max.y
    }

    /// True if this box lies entirely inside `[0, width] x [0, height]`
    pub fn within(&self, width: f32, height: f32) -> bool {
        let max = self.max();
        self.min.x >= 0.0 && self.min.y >= 0.0 && max.x <= width && max.y <= height
    }
}

/// Entities that take part in overlap tests
pub trait Collidable: Positionable {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.position(), self.size())
    }

    fn collides_with<O: Collidable + ?Sized>(&self, other: &O) -> bool {
        self.bounds().overlaps(&other.bounds())
    }
}

/// What happened while resolving one player's collisions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Shield absorbed a hit from this obstacle
    pub shield_broken_by: Option<u32>,
    /// Player died this tick
    pub killed_by: Option<u32>,
    /// Power-ups collected this tick, in id order
    pub collected: Vec<PowerUpKind>,
}

/// Resolve player versus obstacle hits
///
/// A shield absorbs the first hit; the obstacle that broke it is ignored until
/// it stops overlapping so one crossing counts once. Any other hit kills.
pub fn resolve_obstacles(
    player: &mut Player,
    obstacles: &[Obstacle],
    report: &mut CollisionReport,
) {
    if player.is_dead() {
        return;
    }

    // Forget obstacles that have separated (or been swept)
    let body = &player.body;
    player.shield_grace.retain(|id| {
        obstacles
            .iter()
            .any(|o| o.id == *id && !o.body.removable && o.collides_with(body))
    });

    for obstacle in obstacles {
        if obstacle.body.removable || !obstacle.collides_with(&*player) {
            continue;
        }
        if player.shield_grace.contains(&obstacle.id) {
            continue;
        }

        if player.has_shield {
            player.has_shield = false;
            player.shield_grace.push(obstacle.id);
            report.shield_broken_by = Some(obstacle.id);
            log::debug!("Shield absorbed obstacle {}", obstacle.id);
        } else {
            if player.die(DeathCause::Collision) {
                report.killed_by = Some(obstacle.id);
                log::info!("Player hit by obstacle {} ({:?})", obstacle.id, obstacle.kind);
            }
            return;
        }
    }
}

/// Mark every overlapped power-up as collected
///
/// Activation is left to the caller; the returned kinds are in power-up order.
pub fn collect_power_ups(player: &Player, power_ups: &mut [PowerUp], report: &mut CollisionReport) {
    if player.is_dead() {
        return;
    }
    for power_up in power_ups.iter_mut() {
        if power_up.collected || !player.collides_with(&*power_up) {
            continue;
        }
        if power_up.collect() {
            log::debug!("Collected {:?} power-up {}", power_up.kind, power_up.id);
            report.collected.push(power_up.kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Body, Facing, ObstacleKind};
    use proptest::prelude::*;

    fn car_at(id: u32, x: f32, y: f32) -> Obstacle {
        Obstacle::new(
            id,
            ObstacleKind::Car,
            Facing::Right,
            Body::new(Vec2::new(x, y), Vec2::splat(72.0)),
        )
    }

    fn player_at(x: f32, y: f32) -> Player {
        Player::at(1, Vec2::new(x, y), Vec2::splat(72.0))
    }

    #[test]
    fn test_overlap_edges_inclusive() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        let touching = Aabb::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let apart = Aabb::new(Vec2::new(10.5, 0.0), Vec2::splat(10.0));
        assert!(a.overlaps(&touching));
        assert!(!a.overlaps(&apart));
    }

    #[test]
    fn test_within() {
        let inside = Aabb::new(Vec2::new(0.0, 0.0), Vec2::splat(72.0));
        assert!(inside.within(80.0, 80.0));
        let outside = Aabb::new(Vec2::new(-1.0, 0.0), Vec2::splat(72.0));
        assert!(!outside.within(80.0, 80.0));
    }

    #[test]
    fn test_unshielded_hit_kills() {
        let mut player = player_at(100.0, 100.0);
        let obstacles = vec![car_at(5, 120.0, 100.0)];
        let mut report = CollisionReport::default();

        resolve_obstacles(&mut player, &obstacles, &mut report);
        assert!(player.is_dead());
        assert_eq!(player.death_cause(), Some(DeathCause::Collision));
        assert_eq!(report.killed_by, Some(5));
    }

    #[test]
    fn test_shield_absorbs_exactly_one_hit() {
        let mut player = player_at(100.0, 100.0);
        player.has_shield = true;
        let mut obstacles = vec![car_at(5, 120.0, 100.0)];

        let mut report = CollisionReport::default();
        resolve_obstacles(&mut player, &obstacles, &mut report);
        assert!(!player.is_dead());
        assert!(!player.has_shield);
        assert_eq!(report.shield_broken_by, Some(5));

        // Same car still overlapping on the next tick: already absorbed
        obstacles[0].body.pos.x += 8.0;
        let mut report = CollisionReport::default();
        resolve_obstacles(&mut player, &obstacles, &mut report);
        assert!(!player.is_dead());

        // A second obstacle is fatal
        obstacles.push(car_at(6, 90.0, 110.0));
        let mut report = CollisionReport::default();
        resolve_obstacles(&mut player, &obstacles, &mut report);
        assert!(player.is_dead());
        assert_eq!(report.killed_by, Some(6));
    }

    #[test]
    fn test_shield_grace_ends_on_separation() {
        let mut player = player_at(100.0, 100.0);
        player.has_shield = true;
        let mut obstacles = vec![car_at(5, 120.0, 100.0)];

        let mut report = CollisionReport::default();
        resolve_obstacles(&mut player, &obstacles, &mut report);
        assert_eq!(player.shield_grace, vec![5]);

        // Moves clear of the player
        obstacles[0].body.pos.x = 500.0;
        resolve_obstacles(&mut player, &obstacles, &mut report);
        assert!(player.shield_grace.is_empty());

        // Coming back counts as a new collision
        obstacles[0].body.pos.x = 110.0;
        let mut report = CollisionReport::default();
        resolve_obstacles(&mut player, &obstacles, &mut report);
        assert!(player.is_dead());
    }

    #[test]
    fn test_removed_obstacles_are_ignored() {
        let mut player = player_at(100.0, 100.0);
        let mut obstacles = vec![car_at(5, 120.0, 100.0)];
        obstacles[0].body.mark_removable();

        let mut report = CollisionReport::default();
        resolve_obstacles(&mut player, &obstacles, &mut report);
        assert!(!player.is_dead());
    }

    #[test]
    fn test_power_up_collected_once() {
        let player = player_at(100.0, 100.0);
        let mut power_ups = vec![
            PowerUp::new(8, PowerUpKind::DoublePoints, Vec2::new(104.0, 104.0), Vec2::splat(72.0)),
            PowerUp::new(9, PowerUpKind::Shield, Vec2::new(600.0, 600.0), Vec2::splat(72.0)),
        ];

        let mut report = CollisionReport::default();
        collect_power_ups(&player, &mut power_ups, &mut report);
        assert_eq!(report.collected, vec![PowerUpKind::DoublePoints]);
        assert!(power_ups[0].body.removable);
        assert!(!power_ups[1].collected);

        let mut report = CollisionReport::default();
        collect_power_ups(&player, &mut power_ups, &mut report);
        assert!(report.collected.is_empty());
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            aw in 0.0f32..200.0, ah in 0.0f32..200.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            bw in 0.0f32..200.0, bh in 0.0f32..200.0,
        ) {
            let a = Body::new(Vec2::new(ax, ay), Vec2::new(aw, ah));
            let b = Body::new(Vec2::new(bx, by), Vec2::new(bw, bh));
            prop_assert_eq!(a.collides_with(&b), b.collides_with(&a));
        }
    }
}
