//! Smoothed-follow camera with look-ahead and edge-margin correction.
//! Produces the single world-to-screen x offset every drawable consumes:
//! `screen_x = world_x + offset`.

use glam::Vec2;

use crate::ecs::components::Facing;

/// How far ahead of the ship the view leads, pixels.
const LOOK_AHEAD: f32 = 260.0;
/// Look-ahead smoothing rate, 1/second. Low so a direction flip sweeps the
/// view over rather than snapping it.
const LOOK_AHEAD_RATE: f32 = 2.2;
/// Follow smoothing rate toward the look-ahead point, 1/second.
const FOLLOW_RATE: f32 = 5.0;
/// The ship may never get closer to a screen edge than this.
const EDGE_MARGIN: f32 = 160.0;

#[derive(Debug, Clone)]
pub struct Camera {
    /// World-space x at the center of the view.
    x: f32,
    /// Smoothed look-ahead displacement.
    look_ahead: f32,
    screen_w: f32,
    world_w: f32,
}

impl Camera {
    pub fn new(screen_w: f32, world_w: f32, start_x: f32) -> Self {
        Self {
            x: start_x,
            look_ahead: 0.0,
            screen_w,
            world_w,
        }
    }

    /// Advance toward the player's look-ahead point. Called once per frame,
    /// after spawning and before any actor update.
    pub fn update(&mut self, player_pos: Vec2, facing: Facing, dt: f32) {
        let target_lead = facing.dir_x() * LOOK_AHEAD;
        self.look_ahead += (target_lead - self.look_ahead) * (LOOK_AHEAD_RATE * dt).min(1.0);

        let target = player_pos.x + self.look_ahead;
        self.x += (target - self.x) * (FOLLOW_RATE * dt).min(1.0);

        // Edge-margin correction: smoothing must never let the ship drift
        // into the margin band, so snap the remainder.
        let half = self.screen_w * 0.5;
        let screen_x = player_pos.x - (self.x - half);
        if screen_x < EDGE_MARGIN {
            self.x = player_pos.x - EDGE_MARGIN + half;
        } else if screen_x > self.screen_w - EDGE_MARGIN {
            self.x = player_pos.x + EDGE_MARGIN - half;
        }

        // Keep the view inside the world.
        self.x = self.x.clamp(half, self.world_w - half);
    }

    /// World-to-screen x offset for this frame.
    pub fn offset(&self) -> f32 {
        self.screen_w * 0.5 - self.x
    }

    /// World-space x at the view center.
    pub fn center_x(&self) -> f32 {
        self.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn settle(cam: &mut Camera, pos: Vec2, facing: Facing, frames: usize) {
        for _ in 0..frames {
            cam.update(pos, facing, DT);
        }
    }

    #[test]
    fn leads_in_facing_direction() {
        let mut cam = Camera::new(1280.0, 6000.0, 3000.0);
        settle(&mut cam, Vec2::new(3000.0, 300.0), Facing::Right, 600);
        assert!((cam.center_x() - (3000.0 + LOOK_AHEAD)).abs() < 2.0);

        settle(&mut cam, Vec2::new(3000.0, 300.0), Facing::Left, 600);
        assert!((cam.center_x() - (3000.0 - LOOK_AHEAD)).abs() < 2.0);
    }

    #[test]
    fn edge_margin_holds_during_direction_flip() {
        let mut cam = Camera::new(1280.0, 6000.0, 3000.0);
        let mut pos = Vec2::new(3000.0, 300.0);
        settle(&mut cam, pos, Facing::Right, 600);

        // Reverse and sprint left (staying clear of the world edge, where
        // the margin physically cannot hold): every intermediate frame
        // must keep the ship out of the margin bands.
        for _ in 0..300 {
            pos.x -= 9.0;
            cam.update(pos, Facing::Left, DT);
            let screen_x = pos.x + cam.offset();
            assert!(screen_x >= EDGE_MARGIN - 0.5, "ship left of margin: {screen_x}");
            assert!(screen_x <= 1280.0 - EDGE_MARGIN + 0.5, "ship right of margin: {screen_x}");
        }
    }

    #[test]
    fn view_stays_inside_world() {
        let mut cam = Camera::new(1280.0, 3840.0, 100.0);
        settle(&mut cam, Vec2::new(0.0, 300.0), Facing::Left, 600);
        assert!(cam.center_x() >= 640.0);

        settle(&mut cam, Vec2::new(3840.0, 300.0), Facing::Right, 600);
        assert!(cam.center_x() <= 3840.0 - 640.0);
    }

    #[test]
    fn offset_maps_center_to_screen_center() {
        let cam = Camera::new(1280.0, 3840.0, 2000.0);
        assert!((2000.0 + cam.offset() - 640.0).abs() < 1e-3);
    }
}
