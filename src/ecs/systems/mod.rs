pub mod baiter;
pub mod bullets;
pub mod collision;
pub mod culling;
pub mod humanoid;
pub mod lander;
pub mod movement;
pub mod mutant;
pub mod player;

use crate::events::EventQueue;
use crate::game::{Bounds, RunState};
use crate::input::InputPulse;
use crate::particles::ParticleSystem;
use crate::shield::Shield;

/// Per-frame context threaded through every system in place of globals:
/// the camera offset, delta time, wave number, and the mutable services a
/// system may touch (RNG, events, particles, run totals, shield).
pub struct Frame<'a> {
    pub dt: f32,
    /// World-to-screen x offset for this frame.
    pub offset: f32,
    pub wave: u32,
    pub bounds: &'a Bounds,
    pub input: InputPulse,
    pub player: hecs::Entity,
    /// Monotonic spawn-sequence allocator for enemies.
    pub enemy_seq: &'a mut u64,
    /// Allocator value when the frame began. Enemies at or past it were
    /// spawned this frame and stay invisible to collision until the next.
    pub fresh_seq: u64,
    pub rng: &'a mut fastrand::Rng,
    pub events: &'a mut EventQueue,
    pub particles: &'a mut ParticleSystem,
    pub run: &'a mut RunState,
    pub shield: &'a mut Shield,
}

impl Frame<'_> {
    pub fn next_seq(&mut self) -> u64 {
        let seq = *self.enemy_seq;
        *self.enemy_seq += 1;
        seq
    }
}

/// Run all actor systems for one fixed tick. Order matters: AI and physics
/// before collision, collision before culling, so an actor spawned by the
/// director this frame is first hit-tested next frame.
pub fn tick(world: &mut hecs::World, f: &mut Frame, bufs: &mut collision::CollisionBuffers) {
    // 1. Player input, movement, firing, respawn/invulnerability timers
    player::update(world, f);

    // 2. Enemy steering per archetype
    lander::update(world, f);
    mutant::update(world, f);
    baiter::update(world, f);

    // 3. Humanoid lifecycle (walk, carry, fall, escort)
    humanoid::update(world, f);

    // 4. Ballistic projectile integration
    bullets::integrate(world, f.dt);

    // 5. Pairwise hit-testing and damage application
    collision::resolve(world, f, bufs);

    // 6. Off-screen removal
    culling::cull(world, f);
}

#[cfg(test)]
pub(crate) mod testkit {
    use super::Frame;
    use crate::events::EventQueue;
    use crate::game::{Bounds, RunState};
    use crate::input::InputPulse;
    use crate::particles::ParticleSystem;
    use crate::shield::Shield;

    /// Owns everything a `Frame` borrows so system tests stay short.
    pub struct Ctx {
        pub bounds: Bounds,
        pub rng: fastrand::Rng,
        pub events: EventQueue,
        pub particles: ParticleSystem,
        pub run: RunState,
        pub shield: Shield,
        pub seq: u64,
    }

    impl Ctx {
        pub fn new() -> Self {
            Self {
                bounds: Bounds {
                    world_w: 3840.0,
                    screen_w: 1280.0,
                    screen_h: 960.0,
                    band_h: 720.0,
                    ground_y: 680.0,
                },
                rng: fastrand::Rng::with_seed(0x5EED),
                events: EventQueue::new(),
                particles: ParticleSystem::new(),
                run: RunState::new(3, 3),
                shield: Shield::new(),
                seq: 100,
            }
        }

        /// One-tick frame with a neutral camera and no input.
        pub fn frame(&mut self, player: hecs::Entity) -> Frame<'_> {
            Frame {
                dt: 1.0 / 60.0,
                offset: 0.0,
                wave: 1,
                bounds: &self.bounds,
                input: InputPulse::default(),
                player,
                fresh_seq: u64::MAX,
                enemy_seq: &mut self.seq,
                rng: &mut self.rng,
                events: &mut self.events,
                particles: &mut self.particles,
                run: &mut self.run,
                shield: &mut self.shield,
            }
        }
    }
}
