//! Mutant AI: zigzag pursuit plus opportunistic fire. No discrete states,
//! only continuous parameters jittered per instance at spawn.

use glam::Vec2;

use crate::ecs::components::{Cruise, Mutant, Position, Velocity};
use crate::ecs::spawn;
use crate::ecs::systems::{movement, player, Frame};

/// Angular jitter on an aimed shot, radians.
const AIM_JITTER: f32 = 0.15;

pub fn update(world: &mut hecs::World, f: &mut Frame) {
    let player = player::view(world, f.player).filter(|p| !p.dead);
    let mut shots: Vec<(Vec2, f32)> = Vec::new();

    for (_, (pos, vel, mutant, cruise)) in
        world.query_mut::<(&mut Position, &mut Velocity, &mut Mutant, &Cruise)>()
    {
        mutant.phase += f.dt * mutant.freq * std::f32::consts::TAU;

        let desired = match player {
            Some(p) => {
                let base = movement::dir_to(pos.0, p.pos);
                let weave = base.perp() * mutant.phase.sin() * mutant.amp;
                (base + weave).normalize_or_zero() * cruise.speed
            }
            // nobody to hunt: drift on the current heading
            None => Vec2::ZERO,
        };

        vel.0 = movement::steer(vel.0, desired, cruise.accel * f.dt);
        vel.0 = vel.0.clamp_length_max(cruise.max_speed);
        pos.0 += vel.0 * f.dt;

        pos.0.x = pos.0.x.clamp(0.0, f.bounds.world_w);
        pos.0.y = pos.0.y.clamp(13.0, f.bounds.band_h - 13.0);

        // continuous-time Bernoulli approximation of shots/second
        if let Some(p) = player {
            if f.rng.f32() < mutant.fire_chance * f.dt {
                let aim = (p.pos - pos.0).to_angle() + (f.rng.f32() - 0.5) * 2.0 * AIM_JITTER;
                shots.push((pos.0, aim));
            }
        }
    }

    for (origin, angle) in shots {
        spawn::enemy_bullet(world, origin, angle);
    }
}
