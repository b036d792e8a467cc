//! World-to-screen handoff. Rendering itself is external; this module
//! flattens the simulation into sprite instances (screen space, culled to
//! the visible width) and minimap blips (normalized world space).

use glam::Vec2;

use crate::ecs::components::{
    Bullet, Enemy, EnemyKind, Faction, Footprint, Humanoid, HumanoidState, Player, Position,
    PLAYER_SIZE,
};
use crate::game::Bounds;
use crate::particles::ParticleSystem;
use crate::shield::Shield;
use crate::terrain::Terrain;

/// Slack beyond the screen edges so sprites slide off instead of popping.
const DRAW_SLACK: f32 = 64.0;

const PLAYER_COLOR: u32 = 0x4060FFFF;
const LANDER_COLOR: u32 = 0x30C860FF;
const MUTANT_COLOR: u32 = 0xD03838FF;
const BAITER_COLOR: u32 = 0xB040D0FF;
const HUMANOID_COLOR: u32 = 0xE8C060FF;
const PLAYER_BULLET_COLOR: u32 = 0xFFFFFFFF;
const ENEMY_BULLET_COLOR: u32 = 0xFF2020FF;
const SHIELD_COLOR: u32 = 0xFFFFFF00;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    PlayerShip,
    Lander,
    Mutant,
    Baiter,
    Humanoid,
    PlayerBullet,
    EnemyBullet,
    Particle,
    Shield,
    Ridge,
}

/// One drawable quad, already in screen space.
#[derive(Debug, Clone, Copy)]
pub struct SpriteInstance {
    pub pos: [f32; 2],
    pub size: [f32; 2],
    pub color: u32,
    pub kind: SpriteKind,
    pub flip_x: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlipKind {
    Player,
    Enemy,
    Humanoid,
}

/// Minimap dot with coordinates normalized to [0, 1] across the world.
#[derive(Debug, Clone, Copy)]
pub struct MinimapBlip {
    pub x: f32,
    pub y: f32,
    pub kind: BlipKind,
}

fn visible(screen_x: f32, screen_w: f32) -> bool {
    screen_x > -DRAW_SLACK && screen_x < screen_w + DRAW_SLACK
}

fn enemy_color(kind: EnemyKind) -> u32 {
    match kind {
        EnemyKind::Lander => LANDER_COLOR,
        EnemyKind::Mutant => MUTANT_COLOR,
        EnemyKind::Baiter => BAITER_COLOR,
    }
}

fn enemy_sprite(kind: EnemyKind) -> SpriteKind {
    match kind {
        EnemyKind::Lander => SpriteKind::Lander,
        EnemyKind::Mutant => SpriteKind::Mutant,
        EnemyKind::Baiter => SpriteKind::Baiter,
    }
}

/// Flatten one frame into `buf`. Terrain first, player and particles last.
#[allow(clippy::too_many_arguments)]
pub fn build(
    world: &hecs::World,
    player: hecs::Entity,
    offset: f32,
    bounds: &Bounds,
    terrain: &Terrain,
    shield: &Shield,
    particles: &ParticleSystem,
    buf: &mut Vec<SpriteInstance>,
) {
    terrain.build_instances(offset, bounds.screen_w, buf);

    for (_, (pos, humanoid)) in world.query::<(&Position, &Humanoid)>().iter() {
        if humanoid.state == HumanoidState::Killed {
            continue;
        }
        let x = pos.0.x + offset;
        if !visible(x, bounds.screen_w) {
            continue;
        }
        buf.push(SpriteInstance {
            pos: [x, pos.0.y],
            size: crate::ecs::components::HUMANOID_SIZE.into(),
            color: HUMANOID_COLOR,
            kind: SpriteKind::Humanoid,
            flip_x: humanoid.walk_dir < 0.0,
        });
    }

    for (_, (pos, enemy)) in world.query::<(&Position, &Enemy)>().iter() {
        let x = pos.0.x + offset;
        if !visible(x, bounds.screen_w) {
            continue;
        }
        buf.push(SpriteInstance {
            pos: [x, pos.0.y],
            size: enemy.kind.size().into(),
            color: enemy_color(enemy.kind),
            kind: enemy_sprite(enemy.kind),
            flip_x: false,
        });
    }

    for (_, (pos, bullet, footprint)) in world.query::<(&Position, &Bullet, &Footprint)>().iter() {
        let x = pos.0.x + offset;
        if !visible(x, bounds.screen_w) {
            continue;
        }
        let rect = footprint.rect_at(pos.0);
        let (color, kind) = match bullet.faction {
            Faction::Player => (PLAYER_BULLET_COLOR, SpriteKind::PlayerBullet),
            Faction::Enemy => (ENEMY_BULLET_COLOR, SpriteKind::EnemyBullet),
        };
        buf.push(SpriteInstance {
            pos: [x, pos.0.y],
            size: [rect.width(), rect.height()],
            color,
            kind,
            flip_x: false,
        });
    }

    if shield.deployed {
        let rect = shield.rect();
        buf.push(SpriteInstance {
            pos: [shield.pos.x + offset, shield.pos.y],
            size: [rect.width(), rect.height()],
            color: SHIELD_COLOR | shield.alpha() as u32,
            kind: SpriteKind::Shield,
            flip_x: false,
        });
    }

    if let Ok(mut query) = world.query_one::<(&Position, &Player)>(player) {
        if let Some((pos, p)) = query.get() {
            // invulnerability reads as a flash: skip alternating slices
            let flashing = p.invulnerable() && (p.invuln_timer * 10.0) as i32 % 2 == 1;
            if !p.is_dead() && !flashing {
                buf.push(SpriteInstance {
                    pos: [pos.0.x + offset, pos.0.y],
                    size: PLAYER_SIZE.into(),
                    color: PLAYER_COLOR,
                    kind: SpriteKind::PlayerShip,
                    flip_x: p.facing == crate::ecs::components::Facing::Left,
                });
            }
        }
    }

    particles.build_instances(offset, buf);
}

/// Minimap blips for every tracked actor, normalized to the world span.
pub fn minimap(world: &hecs::World, bounds: &Bounds, buf: &mut Vec<MinimapBlip>) {
    let norm = |p: Vec2| (p.x / bounds.world_w, p.y / bounds.band_h);

    for (_, (pos, _)) in world.query::<(&Position, &Enemy)>().iter() {
        let (x, y) = norm(pos.0);
        buf.push(MinimapBlip { x, y, kind: BlipKind::Enemy });
    }
    for (_, (pos, humanoid)) in world.query::<(&Position, &Humanoid)>().iter() {
        if humanoid.state == HumanoidState::Killed {
            continue;
        }
        let (x, y) = norm(pos.0);
        buf.push(MinimapBlip { x, y, kind: BlipKind::Humanoid });
    }
    for (_, (pos, p)) in world.query::<(&Position, &Player)>().iter() {
        if !p.is_dead() {
            let (x, y) = norm(pos.0);
            buf.push(MinimapBlip { x, y, kind: BlipKind::Player });
        }
    }
}
