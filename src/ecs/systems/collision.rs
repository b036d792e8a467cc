//! Pairwise hit-testing and damage application. Runs after every actor has
//! moved. Phase A scans the world read-only and records combat commands;
//! phase B applies them, so no system mutates actors it is iterating.

use glam::Vec2;

use crate::ecs::components::{
    Bullet, Enemy, EnemyKind, Faction, Footprint, Humanoid, HumanoidState, Lander, LanderState,
    Player, Position, HUMANOID_SIZE,
};
use crate::ecs::systems::{lander, player, Frame};
use crate::events::GameEvent;
use crate::geom::Rect;
use crate::particles::Burst;
use crate::spatial::SpatialHash;

/// Direct enemy contact. Instantly lethal at full health.
pub const CONTACT_DAMAGE: f32 = 100.0;
/// Broad-phase grid cell; covers the largest enemy footprint.
const CELL_SIZE: f32 = 96.0;
const TABLE_SIZE: usize = 256;
/// Killing a lander mid-abduction pays double.
const CAPTURE_BONUS_FACTOR: u64 = 2;
/// Currency earned per kill, as a fraction of score.
const CURRENCY_DIVISOR: u64 = 10;

#[derive(Clone, Copy)]
struct EnemySnap {
    entity: hecs::Entity,
    rect: Rect,
    mid_capture: bool,
}

enum CombatCmd {
    EnemyHit {
        enemy: hecs::Entity,
        bullet: hecs::Entity,
        piercing: bool,
    },
    PlayerHit {
        damage: f32,
        bullet: Option<hecs::Entity>,
        contact: Option<hecs::Entity>,
    },
    ShieldHit {
        bullet: hecs::Entity,
        damage: f32,
    },
    Rescue {
        humanoid: hecs::Entity,
    },
}

/// Pre-allocated per-frame scratch, reused across ticks.
pub struct CollisionBuffers {
    grid: SpatialHash,
    enemies: Vec<EnemySnap>,
    cmds: Vec<CombatCmd>,
    candidates: Vec<u32>,
}

impl CollisionBuffers {
    pub fn new() -> Self {
        Self {
            grid: SpatialHash::new(CELL_SIZE, TABLE_SIZE),
            enemies: Vec::with_capacity(32),
            cmds: Vec::with_capacity(32),
            candidates: Vec::with_capacity(16),
        }
    }
}

impl Default for CollisionBuffers {
    fn default() -> Self {
        Self::new()
    }
}

pub fn resolve(world: &mut hecs::World, f: &mut Frame, bufs: &mut CollisionBuffers) {
    let CollisionBuffers { grid, enemies, cmds, candidates } = bufs;
    grid.clear();
    enemies.clear();
    cmds.clear();

    // --- Phase A: scan ---

    for (entity, (pos, enemy, lander)) in
        world.query::<(&Position, &Enemy, Option<&Lander>)>().iter()
    {
        // spawned earlier this same frame: hit-testable from next frame on
        if enemy.seq >= f.fresh_seq {
            continue;
        }
        let index = enemies.len() as u32;
        enemies.push(EnemySnap {
            entity,
            rect: Rect::from_center(pos.0, enemy.kind.size()),
            mid_capture: lander.is_some_and(|l| l.state == LanderState::Capturing),
        });
        grid.insert(pos.0, index);
    }

    let pv = player::view(world, f.player);
    let player_alive = pv.is_some_and(|p| !p.dead);
    let player_vulnerable = pv.is_some_and(|p| !p.dead && !p.invulnerable);
    let (full_rect, vulnerable_rects) = match pv {
        Some(p) => (Player::hitbox(p.pos), Player::vulnerable_rects(p.pos)),
        None => (
            Rect::from_center(Vec2::ZERO, Vec2::ZERO),
            [Rect::from_center(Vec2::ZERO, Vec2::ZERO); 2],
        ),
    };

    for (entity, (pos, bullet, footprint)) in
        world.query::<(&Position, &Bullet, &Footprint)>().iter()
    {
        match bullet.faction {
            Faction::Player => {
                let rect = footprint.rect_at(pos.0);
                candidates.clear();
                grid.query_neighbors(pos.0, |i| candidates.push(i));
                candidates.sort_unstable();
                candidates.dedup();
                for &i in candidates.iter() {
                    let snap = enemies[i as usize];
                    if rect.intersects(&snap.rect) {
                        cmds.push(CombatCmd::EnemyHit {
                            enemy: snap.entity,
                            bullet: entity,
                            piercing: bullet.piercing,
                        });
                        if !bullet.piercing {
                            break;
                        }
                    }
                }
            }
            Faction::Enemy => {
                if f.shield.deployed && footprint.overlaps(pos.0, &f.shield.rect()) {
                    cmds.push(CombatCmd::ShieldHit { bullet: entity, damage: bullet.damage });
                } else if player_vulnerable
                    && vulnerable_rects.iter().any(|r| footprint.overlaps(pos.0, r))
                {
                    cmds.push(CombatCmd::PlayerHit {
                        damage: bullet.damage,
                        bullet: Some(entity),
                        contact: None,
                    });
                }
            }
        }
    }

    if player_vulnerable {
        for snap in enemies.iter() {
            if vulnerable_rects.iter().any(|r| snap.rect.intersects(r)) {
                cmds.push(CombatCmd::PlayerHit {
                    damage: CONTACT_DAMAGE,
                    bullet: None,
                    contact: Some(snap.entity),
                });
            }
        }
    }

    if player_alive {
        for (entity, (pos, humanoid)) in world.query::<(&Position, &Humanoid)>().iter() {
            if humanoid.state == HumanoidState::Falling
                && full_rect.intersects(&Rect::from_center(pos.0, HUMANOID_SIZE))
            {
                cmds.push(CombatCmd::Rescue { humanoid: entity });
            }
        }
    }

    // --- Phase B: apply ---

    // Vecs, not sets: despawn order must not depend on hash iteration or
    // seeded runs stop replaying identically.
    let mut destroyed: Vec<hecs::Entity> = Vec::new();
    let mut spent: Vec<hecs::Entity> = Vec::new();

    for cmd in cmds.drain(..) {
        match cmd {
            CombatCmd::EnemyHit { enemy, bullet, piercing } => {
                if destroyed.contains(&enemy) {
                    continue;
                }
                if destroy_enemy(world, enemy, f, true) {
                    destroyed.push(enemy);
                    if !piercing && !spent.contains(&bullet) {
                        spent.push(bullet);
                    }
                }
            }
            CombatCmd::PlayerHit { damage, bullet, contact } => {
                let mut died = false;
                let mut landed = false;
                if let Ok((pos, p)) = world.query_one_mut::<(&Position, &mut Player)>(f.player) {
                    if !p.is_dead() && !p.invulnerable() {
                        landed = true;
                        p.health -= damage;
                        f.events.push(GameEvent::PlayerDamaged { amount: damage });
                        if let Some(b) = bullet {
                            if !spent.contains(&b) {
                                spent.push(b);
                            }
                        }
                        if p.health <= 0.0 {
                            player::kill(p, f, pos.0);
                            died = true;
                        }
                    }
                }
                // a contact hit that landed takes the enemy with it
                if landed {
                    if let Some(enemy) = contact {
                        if !destroyed.contains(&enemy) && destroy_enemy(world, enemy, f, true) {
                            destroyed.push(enemy);
                        }
                    }
                }
                if died && f.run.lives == 0 {
                    f.run.status = crate::game::GameStatus::GameOver;
                    f.events.push(GameEvent::GameOver);
                    log::info!("game over on wave {}", f.wave);
                }
            }
            CombatCmd::ShieldHit { bullet, damage } => {
                if !spent.contains(&bullet) {
                    spent.push(bullet);
                }
                if f.shield.absorb(damage) {
                    f.events.push(GameEvent::ShieldDepleted);
                }
            }
            CombatCmd::Rescue { humanoid } => {
                if let Ok(mut h) = world.get::<&mut Humanoid>(humanoid) {
                    if h.state == HumanoidState::Falling {
                        h.state = HumanoidState::Rescued;
                        h.captor = None;
                        f.events.push(GameEvent::HumanoidCaught);
                    }
                }
            }
        }
    }

    for bullet in spent {
        let _ = world.despawn(bullet);
    }
}

/// Remove one enemy with its full death effect: cargo released, score and
/// currency awarded (doubled mid-capture), burst and event emitted.
/// Returns false when the entity is already gone.
pub fn destroy_enemy(world: &mut hecs::World, entity: hecs::Entity, f: &mut Frame, award: bool) -> bool {
    let Ok(enemy) = world.get::<&Enemy>(entity).map(|e| *e) else {
        return false;
    };
    let pos = match world.get::<&Position>(entity) {
        Ok(p) => p.0,
        Err(_) => Vec2::ZERO,
    };
    let mid_capture = world
        .get::<&Lander>(entity)
        .is_ok_and(|l| l.state == LanderState::Capturing);

    lander::release_captive(world, entity, f.events);

    let mut reward = enemy.kind.reward();
    if mid_capture {
        reward *= CAPTURE_BONUS_FACTOR;
    }
    if award {
        f.run.score += reward;
        f.run.currency += reward / CURRENCY_DIVISOR;
    }
    f.particles.burst(pos, &Burst::explosion(death_color(enemy.kind)), f.rng);
    f.events.push(GameEvent::EnemyDestroyed { kind: enemy.kind, reward });
    let _ = world.despawn(entity);
    true
}

/// Clear every enemy and enemy bullet currently inside the visible screen
/// region. Returns how many actors went up.
pub fn smart_bomb(world: &mut hecs::World, f: &mut Frame) -> u32 {
    use crate::ecs::systems::culling::on_screen;

    let enemies: Vec<hecs::Entity> = world
        .query::<(&Position, &Enemy)>()
        .iter()
        .filter(|(_, (pos, enemy))| {
            enemy.seq < f.fresh_seq && on_screen(pos.0.x, f.offset, f.bounds.screen_w)
        })
        .map(|(e, _)| e)
        .collect();
    let bullets: Vec<hecs::Entity> = world
        .query::<(&Position, &Bullet)>()
        .iter()
        .filter(|(_, (pos, b))| {
            b.faction == Faction::Enemy && on_screen(pos.0.x, f.offset, f.bounds.screen_w)
        })
        .map(|(e, _)| e)
        .collect();

    let mut destroyed = 0;
    for enemy in enemies {
        if destroy_enemy(world, enemy, f, true) {
            destroyed += 1;
        }
    }
    for bullet in bullets {
        if world.despawn(bullet).is_ok() {
            destroyed += 1;
        }
    }
    f.events.push(GameEvent::SmartBombDetonated { destroyed });
    log::info!("smart bomb cleared {destroyed} actors");
    destroyed
}

fn death_color(kind: EnemyKind) -> u32 {
    match kind {
        EnemyKind::Lander => 0x60E080FF,
        EnemyKind::Mutant => 0xFF6040FF,
        EnemyKind::Baiter => 0xD070FFFF,
    }
}
