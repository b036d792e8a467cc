//! Baiter AI: straight-line interception pod. Resamples a small angular
//! offset every frame so the approach lands slightly off-axis, which reads
//! as hunting rather than railing in.

use crate::ecs::components::{Baiter, Cruise, Position, Velocity};
use crate::ecs::systems::{movement, player, Frame};
use glam::Vec2;

/// Per-frame angular offset half-range, radians.
const PURSUIT_JITTER: f32 = 0.35;

pub fn update(world: &mut hecs::World, f: &mut Frame) {
    let player = player::view(world, f.player).filter(|p| !p.dead);

    for (_, (pos, vel, _, cruise)) in
        world.query_mut::<(&mut Position, &mut Velocity, &Baiter, &Cruise)>()
    {
        let desired = match player {
            Some(p) => {
                let offset = (f.rng.f32() - 0.5) * 2.0 * PURSUIT_JITTER;
                movement::rotate(movement::dir_to(pos.0, p.pos), offset) * cruise.speed
            }
            None => Vec2::ZERO,
        };

        vel.0 = movement::steer(vel.0, desired, cruise.accel * f.dt);
        vel.0 = vel.0.clamp_length_max(cruise.max_speed);
        pos.0 += vel.0 * f.dt;

        pos.0.x = pos.0.x.clamp(0.0, f.bounds.world_w);
        pos.0.y = pos.0.y.clamp(8.0, f.bounds.band_h - 8.0);
    }
}
