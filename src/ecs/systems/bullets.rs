//! Ballistic projectile motion. Velocity is fixed at spawn (polar form);
//! lifetime ends only by leaving the simulated bounds, which the culling
//! pass enforces.

use crate::ecs::components::{Bullet, Position, Velocity};

pub fn integrate(world: &mut hecs::World, dt: f32) {
    for (_, (pos, vel, _)) in world.query_mut::<(&mut Position, &Velocity, &Bullet)>() {
        pos.0 += vel.0 * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::spawn;
    use glam::Vec2;

    #[test]
    fn straight_line_motion() {
        let mut world = hecs::World::new();
        let b = spawn::player_bullet(&mut world, Vec2::new(100.0, 50.0), 0.0, false);
        for _ in 0..60 {
            integrate(&mut world, 1.0 / 60.0);
        }
        let pos = world.get::<&Position>(b).unwrap().0;
        assert!((pos.x - (100.0 + spawn::PLAYER_BULLET_SPEED)).abs() < 0.5);
        assert!((pos.y - 50.0).abs() < 1e-3);
    }
}
