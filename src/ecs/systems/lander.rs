//! Lander AI: wander/chase while Attacking, abduct while Capturing.
//! Capture assignment comes from the wave director; this system only
//! executes the approach, the grab, and the climb-and-convert.

use std::collections::HashMap;

use glam::Vec2;

use crate::ecs::components::{
    Cruise, Humanoid, HumanoidState, Lander, LanderState, Position, Velocity,
};
use crate::ecs::spawn;
use crate::ecs::systems::{movement, player, Frame};
use crate::events::{EventQueue, GameEvent};
use crate::particles::Burst;

/// Seconds between heading/mode resamples while Attacking.
const WANDER_INTERVAL: f32 = 0.8;
/// Probability a resample locks onto the player instead of wandering.
const CHASE_CHANCE: f32 = 0.6;
/// Angular jitter added on top of the chase direction, radians.
const CHASE_JITTER: f32 = 0.5;
/// Chasing only happens inside this range; beyond it landers wander.
const CHASE_RANGE: f32 = 900.0;
/// Grab distance while approaching an assigned humanoid.
const CAPTURE_RADIUS: f32 = 26.0;
/// World y above which a carried humanoid converts (smaller y is higher).
pub const CAPTURE_ALTITUDE: f32 = 70.0;
/// Carried humanoid hangs this far below the lander.
pub const CARRY_OFFSET: f32 = 34.0;

#[derive(Clone, Copy)]
struct HumanoidSnap {
    pos: Vec2,
    state: HumanoidState,
    captor: Option<hecs::Entity>,
}

enum LanderCmd {
    Capture { humanoid: hecs::Entity, lander: hecs::Entity },
    Convert { humanoid: hecs::Entity, at: Vec2 },
}

pub fn update(world: &mut hecs::World, f: &mut Frame) {
    let player = player::view(world, f.player);
    let snaps: HashMap<hecs::Entity, HumanoidSnap> = world
        .query::<(&Position, &Humanoid)>()
        .iter()
        .map(|(e, (pos, h))| {
            (e, HumanoidSnap { pos: pos.0, state: h.state, captor: h.captor })
        })
        .collect();

    let mut cmds: Vec<LanderCmd> = Vec::new();

    for (entity, (pos, vel, lander, cruise)) in
        world.query_mut::<(&mut Position, &mut Velocity, &mut Lander, &Cruise)>()
    {
        let desired = match lander.state {
            LanderState::Attacking => {
                lander.steer_timer -= f.dt;
                if lander.steer_timer <= 0.0 {
                    lander.steer_timer = WANDER_INTERVAL;
                    lander.chasing = f.rng.f32() < CHASE_CHANCE;
                    lander.heading = f.rng.f32() * std::f32::consts::TAU;
                    lander.wobble = (f.rng.f32() - 0.5) * 2.0 * CHASE_JITTER;
                }

                let chase_target = player
                    .filter(|p| !p.dead && p.pos.distance(pos.0) < CHASE_RANGE)
                    .filter(|_| lander.chasing);
                match chase_target {
                    Some(p) => {
                        let dir = movement::rotate(movement::dir_to(pos.0, p.pos), lander.wobble);
                        dir * cruise.speed
                    }
                    // nobody in range, or this interval rolled pure wander
                    None => movement::from_polar(cruise.speed, lander.heading),
                }
            }
            LanderState::Capturing => {
                match lander.target.and_then(|t| snaps.get(&t).map(|s| (t, *s))) {
                    Some((target, snap)) if snap.state == HumanoidState::Captured => {
                        if snap.captor == Some(entity) {
                            // climb with the cargo
                            if pos.0.y <= CAPTURE_ALTITUDE {
                                cmds.push(LanderCmd::Convert { humanoid: target, at: pos.0 });
                                lander.state = LanderState::Attacking;
                                lander.target = None;
                            }
                            Vec2::new(0.0, -1.0) * cruise.speed
                        } else {
                            // someone else got there first
                            lander.state = LanderState::Attacking;
                            lander.target = None;
                            Vec2::ZERO
                        }
                    }
                    Some((target, snap))
                        if matches!(snap.state, HumanoidState::Idle | HumanoidState::Walking) =>
                    {
                        if pos.0.distance(snap.pos) < CAPTURE_RADIUS {
                            cmds.push(LanderCmd::Capture { humanoid: target, lander: entity });
                        }
                        movement::dir_to(pos.0, snap.pos) * cruise.speed
                    }
                    // target destroyed or out of reach mid-flight: fall back
                    _ => {
                        lander.state = LanderState::Attacking;
                        lander.target = None;
                        Vec2::ZERO
                    }
                }
            }
        };

        vel.0 = movement::steer(vel.0, desired, cruise.accel * f.dt);
        vel.0 = vel.0.clamp_length_max(cruise.max_speed);
        pos.0 += vel.0 * f.dt;

        pos.0.x = pos.0.x.clamp(0.0, f.bounds.world_w);
        pos.0.y = pos.0.y.clamp(15.0, f.bounds.band_h - 15.0);
    }

    for cmd in cmds {
        match cmd {
            LanderCmd::Capture { humanoid, lander } => {
                let grabbed = match world.get::<&mut Humanoid>(humanoid) {
                    Ok(mut h) if h.on_ground() && h.captor.is_none() => {
                        h.state = HumanoidState::Captured;
                        h.captor = Some(lander);
                        true
                    }
                    _ => false,
                };
                if grabbed {
                    f.events.push(GameEvent::HumanoidCaptured);
                    log::debug!("humanoid captured");
                } else if let Ok(mut l) = world.get::<&mut Lander>(lander) {
                    l.state = LanderState::Attacking;
                    l.target = None;
                }
            }
            LanderCmd::Convert { humanoid, at } => {
                let _ = world.despawn(humanoid);
                let seq = f.next_seq();
                spawn::mutant(world, at, seq, f.rng);
                f.particles.burst(at, &Burst::flash(), f.rng);
                f.events.push(GameEvent::HumanoidConverted);
                log::info!("humanoid carried over the line, mutant spawned");
            }
        }
    }
}

/// Drop a lander's cargo into free fall. Shared by every lander-removal
/// path: combat death, population-cap eviction, off-screen culling.
pub fn release_captive(world: &mut hecs::World, lander: hecs::Entity, events: &mut EventQueue) {
    let target = world
        .get::<&Lander>(lander)
        .ok()
        .and_then(|l| l.target);
    let Some(target) = target else { return };
    if let Ok(mut h) = world.get::<&mut Humanoid>(target) {
        if h.state == HumanoidState::Captured && h.captor == Some(lander) {
            h.state = HumanoidState::Falling;
            h.fall_timer = 0.0;
            h.captor = None;
            events.push(GameEvent::HumanoidDropped);
        }
    }
}
