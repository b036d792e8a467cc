//! Shared off-screen policy. One margin for removal (generous, so camera
//! look-ahead never pops a live actor back in) and one for "visible"
//! queries (smart bomb, minimap highlights).

use crate::ecs::components::{Bullet, Enemy, Position};
use crate::ecs::systems::{lander, Frame};

/// Removal margin beyond each screen edge, as a fraction of screen width.
const CULL_MARGIN_FRACTION: f32 = 1.0;
/// Vertical slack beyond the gameplay band before a bullet is dropped.
const VERTICAL_SLACK: f32 = 60.0;

/// Actor is inside the simulated window around the screen.
pub fn in_simulated_window(world_x: f32, offset: f32, screen_w: f32) -> bool {
    let margin = screen_w * CULL_MARGIN_FRACTION;
    let screen_x = world_x + offset;
    screen_x >= -margin && screen_x <= screen_w + margin
}

/// Actor is inside the visible screen region proper.
pub fn on_screen(world_x: f32, offset: f32, screen_w: f32) -> bool {
    let screen_x = world_x + offset;
    (0.0..=screen_w).contains(&screen_x)
}

/// Remove bullets and enemies that left the simulated window. Landers are
/// released from their cargo first so a dropped humanoid is never orphaned.
pub fn cull(world: &mut hecs::World, f: &mut Frame) {
    let mut dead_bullets: Vec<hecs::Entity> = Vec::new();
    for (entity, (pos, _)) in world.query::<(&Position, &Bullet)>().iter() {
        let out_x = !in_simulated_window(pos.0.x, f.offset, f.bounds.screen_w);
        let out_y = pos.0.y < -VERTICAL_SLACK || pos.0.y > f.bounds.band_h + VERTICAL_SLACK;
        if out_x || out_y {
            dead_bullets.push(entity);
        }
    }
    for entity in dead_bullets {
        let _ = world.despawn(entity);
    }

    let mut dead_enemies: Vec<hecs::Entity> = Vec::new();
    for (entity, (pos, _)) in world.query::<(&Position, &Enemy)>().iter() {
        if !in_simulated_window(pos.0.x, f.offset, f.bounds.screen_w) {
            dead_enemies.push(entity);
        }
    }
    for entity in dead_enemies {
        lander::release_captive(world, entity, f.events);
        let _ = world.despawn(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::spawn;
    use crate::ecs::systems::testkit::Ctx;
    use glam::Vec2;

    #[test]
    fn bullets_outside_the_window_are_removed() {
        let mut world = hecs::World::new();
        let mut ctx = Ctx::new();
        let player = spawn::player(&mut world, Vec2::new(600.0, 300.0));

        // offset 0: window is [-1280, 2560]
        let keep = spawn::player_bullet(&mut world, Vec2::new(2000.0, 300.0), 0.0, false);
        let gone = spawn::player_bullet(&mut world, Vec2::new(2700.0, 300.0), 0.0, false);
        let high = spawn::player_bullet(&mut world, Vec2::new(500.0, -100.0), 0.0, false);

        let mut f = ctx.frame(player);
        cull(&mut world, &mut f);
        assert!(world.contains(keep));
        assert!(!world.contains(gone));
        assert!(!world.contains(high));
    }

    #[test]
    fn look_ahead_margin_is_generous() {
        // an actor one full screen beyond the edge survives
        assert!(in_simulated_window(2500.0, 0.0, 1280.0));
        assert!(!in_simulated_window(2600.0, 0.0, 1280.0));
        assert!(in_simulated_window(-1200.0, 0.0, 1280.0));
    }

    #[test]
    fn culled_lander_drops_its_cargo() {
        let mut world = hecs::World::new();
        let mut ctx = Ctx::new();
        let player = spawn::player(&mut world, Vec2::new(600.0, 300.0));
        let lander = spawn::lander(&mut world, Vec2::new(3500.0, 200.0), 0, &mut ctx.rng);
        let humanoid = spawn::humanoid(&mut world, Vec2::new(3500.0, 234.0), &mut ctx.rng);
        {
            use crate::ecs::components::{Humanoid, HumanoidState, Lander, LanderState};
            let mut l = world.get::<&mut Lander>(lander).unwrap();
            l.state = LanderState::Capturing;
            l.target = Some(humanoid);
            let mut h = world.get::<&mut Humanoid>(humanoid).unwrap();
            h.state = HumanoidState::Captured;
            h.captor = Some(lander);
        }

        let mut f = ctx.frame(player);
        cull(&mut world, &mut f);
        assert!(!world.contains(lander));
        assert!(world.contains(humanoid));
        use crate::ecs::components::{Humanoid, HumanoidState};
        let h = *world.get::<&Humanoid>(humanoid).unwrap();
        assert_eq!(h.state, HumanoidState::Falling);
        assert!(h.captor.is_none());
    }
}
