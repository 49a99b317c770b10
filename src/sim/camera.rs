//! Vertical follow camera
//!
//! The camera stays put until the player first makes upward progress. From
//! then on it scrolls up every tick and never sits below the target that keeps
//! the player at a fixed fraction of the viewport height, so a player who stops
//! climbing drifts down the screen until they fall out of view. World y grows
//! downward, so scrolling up means `y` decreasing.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Top of the viewport in world space
    pub y: f32,
    pub target_y: f32,
    /// Latched once the player moves up; cleared only by `reset`
    pub is_moving: bool,
    pub last_player_y: f32,
    /// Distance from viewport top to the followed player
    offset: f32,
    scroll_speed: f32,
    catch_up_speed: f32,
}

impl Camera {
    pub fn new(settings: &Settings) -> Self {
        Self {
            y: 0.0,
            target_y: 0.0,
            is_moving: false,
            last_player_y: 0.0,
            offset: settings.camera_offset(),
            scroll_speed: settings.scroll_speed,
            catch_up_speed: settings.catch_up_speed,
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Advance one tick toward the player's grounded y
    pub fn update(&mut self, player_y: f32) {
        self.target_y = player_y - self.offset;

        if !self.is_moving && player_y < self.last_player_y {
            self.is_moving = true;
            log::info!("Camera started following player at y={player_y}");
        }

        if self.is_moving {
            // Never lag behind the target
            self.y = self.scrolled().min(self.target_y);
        }

        self.last_player_y = player_y;
        log::trace!(
            "Camera y={} target={} player={}",
            self.y,
            self.target_y,
            player_y
        );
    }

    /// Camera y after one tick of scrolling, before the clamp
    fn scrolled(&self) -> f32 {
        let y = self.y - self.scroll_speed;
        // Lagging behind: close the gap faster
        if y > self.target_y {
            y - self.catch_up_speed
        } else {
            y
        }
    }

    #[inline]
    pub fn world_to_screen(&self, world_y: f32) -> f32 {
        world_y - self.y
    }

    #[inline]
    pub fn screen_to_world(&self, screen_y: f32) -> f32 {
        screen_y + self.y
    }

    /// True once the player has dropped out of the bottom of the view
    pub fn has_fallen_behind(&self, player_y: f32, scene_height: f32) -> bool {
        self.world_to_screen(player_y) >= scene_height
    }

    pub fn reset(&mut self) {
        self.y = 0.0;
        self.target_y = 0.0;
        self.last_player_y = 0.0;
        self.is_moving = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving_camera(y: f32) -> Camera {
        let mut camera = Camera::new(&Settings::default());
        camera.y = y;
        camera.is_moving = true;
        camera
    }

    #[test]
    fn test_target_without_following() {
        let mut camera = Camera::new(&Settings::default());
        assert!((camera.offset() - 756.0).abs() < 1e-3);

        camera.update(800.0);
        assert!((camera.target_y - 44.0).abs() < 1e-3);
        assert_eq!(camera.y, 0.0);
        assert!(!camera.is_moving);

        // Standing still or moving down does not start following
        camera.update(800.0);
        camera.update(880.0);
        assert_eq!(camera.y, 0.0);
        assert!(!camera.is_moving);
    }

    #[test]
    fn test_starts_following_on_upward_move() {
        let mut camera = Camera::new(&Settings::default());
        camera.update(800.0);
        camera.update(720.0);
        assert!(camera.is_moving);
        // Target is -36: scrolls to -2, still lagging, catches up to -6, clamps to -36
        assert!((camera.y - (-36.0)).abs() < 1e-3);
    }

    #[test]
    fn test_catch_up_before_clamp() {
        let mut camera = moving_camera(100.0);
        camera.target_y = 0.0;
        // 100 - 2 = 98, still above the target, so 98 - 4 = 94
        assert!((camera.scrolled() - 94.0).abs() < 1e-3);
        camera.y = 94.0;
        assert!((camera.scrolled() - 88.0).abs() < 1e-3);

        // The clamp then pulls it onto the target
        camera.update(camera.offset());
        assert_eq!(camera.y, 0.0);
    }

    #[test]
    fn test_scrolls_ahead_of_idle_player() {
        let mut camera = moving_camera(-11.0);
        let player_y = camera.offset() - 11.0; // target -11

        for tick in 1..=5 {
            camera.update(player_y);
            assert!(camera.y <= camera.target_y);
            assert!((camera.y - (-11.0 - 2.0 * tick as f32)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_never_exceeds_target() {
        let mut camera = Camera::new(&Settings::default());
        camera.update(800.0);
        for player_y in [720.0, 640.0, 720.0, 800.0, 560.0, 560.0, 880.0] {
            let before = camera.y;
            camera.update(player_y);
            assert!(camera.y <= camera.target_y);
            // Hopping down never scrolls the camera back
            assert!(camera.y < before);
        }
    }

    #[test]
    fn test_following_latches_until_reset() {
        let mut camera = Camera::new(&Settings::default());
        camera.update(800.0);
        camera.update(700.0);
        assert!(camera.is_moving);

        for y in [900.0, 900.0, 1000.0] {
            camera.update(y);
            assert!(camera.is_moving);
        }

        camera.reset();
        assert!(!camera.is_moving);
        assert_eq!(camera.y, 0.0);
        assert_eq!(camera.target_y, 0.0);
    }

    #[test]
    fn test_screen_transforms() {
        let camera = moving_camera(-400.0);
        assert_eq!(camera.world_to_screen(-100.0), 300.0);
        assert_eq!(camera.screen_to_world(300.0), -100.0);
        assert!(camera.has_fallen_behind(680.0, 1080.0));
        assert!(!camera.has_fallen_behind(679.0, 1080.0));
    }
}
