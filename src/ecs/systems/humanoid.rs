//! Humanoid lifecycle: idle/walk on the ground, carried by a captor,
//! free fall when dropped, escorted after a mid-air catch.

use std::collections::HashMap;

use glam::Vec2;

use crate::ecs::components::{
    Humanoid, HumanoidState, Lander, Position, HUMANOID_SIZE,
};
use crate::ecs::systems::{player, Frame};
use crate::events::GameEvent;
use crate::particles::Burst;

/// Ground walk speed, pixels/second.
const WALK_SPEED: f32 = 18.0;
/// Free-fall speed, pixels/second.
const FALL_SPEED: f32 = 120.0;
/// Falling longer than this is lethal on impact.
const SAFE_FALL_TIME: f32 = 1.1;
/// Cosmetic bob.
const BOB_FREQ: f32 = 0.8;
const BOB_AMP: f32 = 2.5;
/// Escorted humanoid trails just below the ship.
const ESCORT_OFFSET: Vec2 = Vec2::new(0.0, 26.0);
/// Delivery reward.
const RESCUE_SCORE: u64 = 500;
const RESCUE_CURRENCY: u64 = 25;

pub fn update(world: &mut hecs::World, f: &mut Frame) {
    let captor_pos: HashMap<hecs::Entity, Vec2> = world
        .query::<(&Position, &Lander)>()
        .iter()
        .map(|(e, (pos, _))| (e, pos.0))
        .collect();
    let player = player::view(world, f.player);

    let ground_center = f.bounds.ground_y - HUMANOID_SIZE.y * 0.5;
    let mut killed: Vec<(hecs::Entity, Vec2)> = Vec::new();

    for (entity, (pos, h)) in world.query_mut::<(&mut Position, &mut Humanoid)>() {
        match h.state {
            HumanoidState::Idle | HumanoidState::Walking => {
                h.state_timer -= f.dt;
                if h.state_timer <= 0.0 {
                    if h.state == HumanoidState::Walking {
                        h.state = HumanoidState::Idle;
                        h.state_timer = 1.0 + f.rng.f32() * 2.0;
                    } else {
                        h.state = HumanoidState::Walking;
                        h.state_timer = 2.0 + f.rng.f32() * 3.0;
                        if f.rng.f32() < 0.5 {
                            h.walk_dir = -h.walk_dir;
                        }
                    }
                }
                if h.state == HumanoidState::Walking {
                    pos.0.x += h.walk_dir * WALK_SPEED * f.dt;
                    // reverse at the world edges
                    let half = HUMANOID_SIZE.x * 0.5;
                    if pos.0.x <= half {
                        pos.0.x = half;
                        h.walk_dir = 1.0;
                    } else if pos.0.x >= f.bounds.world_w - half {
                        pos.0.x = f.bounds.world_w - half;
                        h.walk_dir = -1.0;
                    }
                }
                h.bob_phase += f.dt * BOB_FREQ * std::f32::consts::TAU;
                pos.0.y = ground_center + h.bob_phase.sin() * BOB_AMP;
            }
            HumanoidState::Captured => match h.captor.and_then(|c| captor_pos.get(&c)) {
                Some(&carrier) => {
                    pos.0 = carrier + Vec2::new(0.0, super::lander::CARRY_OFFSET);
                }
                // captor vanished without a formal release
                None => {
                    h.state = HumanoidState::Falling;
                    h.fall_timer = 0.0;
                    h.captor = None;
                }
            },
            HumanoidState::Falling => {
                pos.0.y += FALL_SPEED * f.dt;
                h.fall_timer += f.dt;
                if pos.0.y >= ground_center {
                    pos.0.y = ground_center;
                    if h.fall_timer > SAFE_FALL_TIME {
                        h.state = HumanoidState::Killed;
                        killed.push((entity, pos.0));
                    } else {
                        h.state = HumanoidState::Idle;
                        h.state_timer = 1.0 + f.rng.f32() * 2.0;
                        h.fall_timer = 0.0;
                    }
                }
            }
            HumanoidState::Rescued => match player.filter(|p| !p.dead) {
                Some(p) => {
                    pos.0 = p.pos + ESCORT_OFFSET;
                    if pos.0.y >= ground_center {
                        pos.0.y = ground_center;
                        h.state = HumanoidState::Idle;
                        h.state_timer = 1.0 + f.rng.f32() * 2.0;
                        f.run.score += RESCUE_SCORE;
                        f.run.currency += RESCUE_CURRENCY;
                        f.events.push(GameEvent::HumanoidRescued { reward: RESCUE_SCORE });
                        log::info!("humanoid returned to ground, +{RESCUE_SCORE}");
                    }
                }
                // escort dies with its ride
                None => {
                    h.state = HumanoidState::Killed;
                    killed.push((entity, pos.0));
                }
            },
            HumanoidState::Killed => {}
        }
    }

    for (entity, at) in killed {
        let _ = world.despawn(entity);
        f.particles.burst(at, &Burst::explosion(0xE8C060FF), f.rng);
        f.events.push(GameEvent::HumanoidKilled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{Player, PlayerState};
    use crate::ecs::spawn;
    use crate::ecs::systems::testkit::Ctx;

    fn step(world: &mut hecs::World, ctx: &mut Ctx, player: hecs::Entity, n: usize) {
        for _ in 0..n {
            let mut f = ctx.frame(player);
            update(world, &mut f);
        }
    }

    #[test]
    fn walkers_stay_on_the_ground_and_inside_the_world() {
        let mut world = hecs::World::new();
        let mut ctx = Ctx::new();
        let player = spawn::player(&mut world, Vec2::new(600.0, 300.0));
        let ground_center = ctx.bounds.ground_y - HUMANOID_SIZE.y * 0.5;
        let h = spawn::humanoid(&mut world, Vec2::new(20.0, ground_center), &mut ctx.rng);

        for _ in 0..3600 {
            step(&mut world, &mut ctx, player, 1);
            let pos = world.get::<&Position>(h).unwrap().0;
            assert!(pos.x >= HUMANOID_SIZE.x * 0.5 - 1e-3);
            assert!(pos.x <= ctx.bounds.world_w - HUMANOID_SIZE.x * 0.5 + 1e-3);
            assert!((pos.y - ground_center).abs() <= BOB_AMP + 1e-3);
        }
    }

    #[test]
    fn short_fall_lands_long_fall_kills() {
        let mut world = hecs::World::new();
        let mut ctx = Ctx::new();
        let player = spawn::player(&mut world, Vec2::new(600.0, 300.0));
        let ground_center = ctx.bounds.ground_y - HUMANOID_SIZE.y * 0.5;

        // dropped from barely above the ground: lands safely
        let low = spawn::humanoid(&mut world, Vec2::new(500.0, ground_center - 40.0), &mut ctx.rng);
        world.get::<&mut Humanoid>(low).unwrap().state = HumanoidState::Falling;
        step(&mut world, &mut ctx, player, 120);
        assert_eq!(world.get::<&Humanoid>(low).unwrap().state, HumanoidState::Idle);

        // dropped from altitude: more than SAFE_FALL_TIME in the air
        let high = spawn::humanoid(&mut world, Vec2::new(500.0, 100.0), &mut ctx.rng);
        world.get::<&mut Humanoid>(high).unwrap().state = HumanoidState::Falling;
        step(&mut world, &mut ctx, player, 600);
        assert!(!world.contains(high), "lethal fall must remove the humanoid");
        assert_eq!(ctx.events.count(|e| *e == GameEvent::HumanoidKilled), 1);
    }

    #[test]
    fn escort_follows_and_delivers_for_score() {
        let mut world = hecs::World::new();
        let mut ctx = Ctx::new();
        let ground_center = ctx.bounds.ground_y - HUMANOID_SIZE.y * 0.5;
        let player = spawn::player(&mut world, Vec2::new(600.0, 300.0));
        let h = spawn::humanoid(&mut world, Vec2::new(500.0, 300.0), &mut ctx.rng);
        world.get::<&mut Humanoid>(h).unwrap().state = HumanoidState::Rescued;

        step(&mut world, &mut ctx, player, 2);
        let hp = world.get::<&Position>(h).unwrap().0;
        assert_eq!(hp, Vec2::new(600.0, 300.0) + ESCORT_OFFSET);

        // fly low enough that the escort touches down
        world.get::<&mut Position>(player).unwrap().0 = Vec2::new(600.0, ground_center - 10.0);
        step(&mut world, &mut ctx, player, 2);
        assert_eq!(world.get::<&Humanoid>(h).unwrap().state, HumanoidState::Idle);
        assert_eq!(ctx.run.score, RESCUE_SCORE);
        assert_eq!(ctx.run.currency, RESCUE_CURRENCY);
    }

    #[test]
    fn escort_dies_with_the_player() {
        let mut world = hecs::World::new();
        let mut ctx = Ctx::new();
        let player = spawn::player(&mut world, Vec2::new(600.0, 300.0));
        let h = spawn::humanoid(&mut world, Vec2::new(500.0, 300.0), &mut ctx.rng);
        world.get::<&mut Humanoid>(h).unwrap().state = HumanoidState::Rescued;
        world.get::<&mut Player>(player).unwrap().state = PlayerState::Dead;

        step(&mut world, &mut ctx, player, 1);
        assert!(!world.contains(h));
        assert_eq!(ctx.events.count(|e| *e == GameEvent::HumanoidKilled), 1);
    }

    #[test]
    fn captured_follows_captor_and_falls_if_captor_vanishes() {
        let mut world = hecs::World::new();
        let mut ctx = Ctx::new();
        let player = spawn::player(&mut world, Vec2::new(600.0, 300.0));
        let lander = spawn::lander(&mut world, Vec2::new(800.0, 200.0), 0, &mut ctx.rng);
        let h = spawn::humanoid(&mut world, Vec2::new(500.0, 300.0), &mut ctx.rng);
        {
            let mut hm = world.get::<&mut Humanoid>(h).unwrap();
            hm.state = HumanoidState::Captured;
            hm.captor = Some(lander);
        }

        step(&mut world, &mut ctx, player, 1);
        let hp = world.get::<&Position>(h).unwrap().0;
        assert_eq!(hp, Vec2::new(800.0, 200.0 + super::super::lander::CARRY_OFFSET));

        world.despawn(lander).unwrap();
        step(&mut world, &mut ctx, player, 1);
        let hm = *world.get::<&Humanoid>(h).unwrap();
        assert_eq!(hm.state, HumanoidState::Falling);
        assert!(hm.captor.is_none());
    }
}
