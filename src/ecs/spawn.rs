//! Entity construction. Enemy cruise tuning gets per-instance jitter here
//! so no two ships fly quite alike.

use glam::Vec2;

use crate::ecs::components::*;
use crate::ecs::systems::movement;

/// Lander cruise tuning before jitter.
const LANDER_SPEED: f32 = 140.0;
const LANDER_ACCEL: f32 = 3.0;
const LANDER_MAX_SPEED: f32 = 190.0;
/// Mutant cruise tuning before jitter.
const MUTANT_SPEED: f32 = 230.0;
const MUTANT_ACCEL: f32 = 4.0;
const MUTANT_MAX_SPEED: f32 = 280.0;
/// Mutant zigzag ranges.
const MUTANT_FREQ: f32 = 1.6;
const MUTANT_AMP: f32 = 0.9;
/// Mutant shots per second.
const MUTANT_FIRE_CHANCE: f32 = 0.8;
/// Baiter cruise tuning before jitter. Faster than the player can run.
const BAITER_SPEED: f32 = 330.0;
const BAITER_ACCEL: f32 = 2.5;
const BAITER_MAX_SPEED: f32 = 390.0;
/// Cruise jitter half-range: each instance lands in [1-J, 1+J] times base.
const JITTER: f32 = 0.15;

/// Player bullet speed, pixels/second.
pub const PLAYER_BULLET_SPEED: f32 = 900.0;
pub const PLAYER_BULLET_SIZE: Vec2 = Vec2::new(12.0, 4.0);
/// Charged-shot variant: slower but huge and piercing.
pub const CHARGED_BULLET_SPEED: f32 = 700.0;
pub const CHARGED_BULLET_SIZE: Vec2 = Vec2::new(30.0, 14.0);
/// Enemy bullet tuning.
pub const ENEMY_BULLET_SPEED: f32 = 240.0;
pub const ENEMY_BULLET_RADIUS: f32 = 5.0;
pub const ENEMY_BULLET_DAMAGE: f32 = 20.0;

fn jitter(rng: &mut fastrand::Rng, base: f32) -> f32 {
    base * (1.0 - JITTER + rng.f32() * JITTER * 2.0)
}

pub fn player(world: &mut hecs::World, pos: Vec2) -> hecs::Entity {
    world.spawn((Position(pos), Velocity(Vec2::ZERO), Player::new()))
}

pub fn lander(world: &mut hecs::World, pos: Vec2, seq: u64, rng: &mut fastrand::Rng) -> hecs::Entity {
    world.spawn((
        Position(pos),
        Velocity(Vec2::ZERO),
        Enemy { kind: EnemyKind::Lander, seq },
        Cruise {
            speed: jitter(rng, LANDER_SPEED),
            accel: jitter(rng, LANDER_ACCEL),
            max_speed: jitter(rng, LANDER_MAX_SPEED),
        },
        Lander {
            heading: rng.f32() * std::f32::consts::TAU,
            ..Lander::new()
        },
        Footprint::Rect(EnemyKind::Lander.size()),
    ))
}

pub fn mutant(world: &mut hecs::World, pos: Vec2, seq: u64, rng: &mut fastrand::Rng) -> hecs::Entity {
    world.spawn((
        Position(pos),
        Velocity(Vec2::ZERO),
        Enemy { kind: EnemyKind::Mutant, seq },
        Cruise {
            speed: jitter(rng, MUTANT_SPEED),
            accel: jitter(rng, MUTANT_ACCEL),
            max_speed: jitter(rng, MUTANT_MAX_SPEED),
        },
        Mutant {
            phase: rng.f32() * std::f32::consts::TAU,
            freq: jitter(rng, MUTANT_FREQ),
            amp: jitter(rng, MUTANT_AMP),
            fire_chance: jitter(rng, MUTANT_FIRE_CHANCE),
        },
        Footprint::Rect(EnemyKind::Mutant.size()),
    ))
}

pub fn baiter(world: &mut hecs::World, pos: Vec2, seq: u64, rng: &mut fastrand::Rng) -> hecs::Entity {
    world.spawn((
        Position(pos),
        Velocity(Vec2::ZERO),
        Enemy { kind: EnemyKind::Baiter, seq },
        Cruise {
            speed: jitter(rng, BAITER_SPEED),
            accel: jitter(rng, BAITER_ACCEL),
            max_speed: jitter(rng, BAITER_MAX_SPEED),
        },
        Baiter,
        Footprint::Rect(EnemyKind::Baiter.size()),
    ))
}

pub fn humanoid(world: &mut hecs::World, pos: Vec2, rng: &mut fastrand::Rng) -> hecs::Entity {
    world.spawn((
        Position(pos),
        Humanoid {
            state: HumanoidState::Walking,
            walk_dir: if rng.bool() { 1.0 } else { -1.0 },
            state_timer: 1.0 + rng.f32() * 3.0,
            bob_phase: rng.f32() * std::f32::consts::TAU,
            fall_timer: 0.0,
            captor: None,
        },
    ))
}

/// Straight ballistic shot from the player's hitbox center.
pub fn player_bullet(world: &mut hecs::World, pos: Vec2, angle: f32, charged: bool) -> hecs::Entity {
    let (speed, size) = if charged {
        (CHARGED_BULLET_SPEED, CHARGED_BULLET_SIZE)
    } else {
        (PLAYER_BULLET_SPEED, PLAYER_BULLET_SIZE)
    };
    world.spawn((
        Position(pos),
        Velocity(movement::from_polar(speed, angle)),
        Bullet {
            faction: Faction::Player,
            piercing: charged,
            damage: 0.0,
        },
        Footprint::Rect(size),
    ))
}

pub fn enemy_bullet(world: &mut hecs::World, pos: Vec2, angle: f32) -> hecs::Entity {
    world.spawn((
        Position(pos),
        Velocity(movement::from_polar(ENEMY_BULLET_SPEED, angle)),
        Bullet {
            faction: Faction::Enemy,
            piercing: false,
            damage: ENEMY_BULLET_DAMAGE,
        },
        Footprint::Circle(ENEMY_BULLET_RADIUS),
    ))
}
