//! Player craft: per-axis fixed-step physics, cooldown-gated weapon,
//! charged shot, respawn and invulnerability timers.

use glam::Vec2;

use crate::ecs::components::{Player, PlayerState, Position, Velocity, PLAYER_SIZE};
use crate::ecs::spawn;
use crate::ecs::systems::{movement, Frame};
use crate::events::GameEvent;
use crate::geom::Rect;
use crate::particles::Burst;

/// Thrust per tick, pixels/tick^2.
const ACCEL_X: f32 = 0.55;
const ACCEL_Y: f32 = 0.50;
/// Drag per tick on an undriven axis.
const DRAG_X: f32 = 0.30;
const DRAG_Y: f32 = 0.40;
/// Per-axis speed bounds, pixels/tick.
const MAX_SPEED_X: f32 = 9.0;
const MAX_SPEED_Y: f32 = 6.0;
/// Seconds between regular shots.
const FIRE_COOLDOWN: f32 = 0.1;
/// Hold time for a full charge.
const CHARGE_TIME: f32 = 1.2;
/// Seconds between death and respawn.
const RESPAWN_DELAY: f32 = 2.0;
/// Post-respawn invulnerability window.
const INVULN_DURATION: f32 = 3.0;
/// Candidate locations tried before giving up on a clear spawn.
const RESPAWN_ATTEMPTS: usize = 20;
/// Required gap between the spawn rect and any enemy rect.
const RESPAWN_CLEARANCE: f32 = 60.0;

/// Read-only player snapshot for the AI systems and the camera.
#[derive(Debug, Clone, Copy)]
pub struct PlayerView {
    pub pos: Vec2,
    pub facing: crate::ecs::components::Facing,
    pub dead: bool,
    pub invulnerable: bool,
}

pub fn view(world: &hecs::World, player: hecs::Entity) -> Option<PlayerView> {
    let mut query = world.query_one::<(&Position, &Player)>(player).ok()?;
    query.get().map(|(pos, p)| PlayerView {
        pos: pos.0,
        facing: p.facing,
        dead: p.is_dead(),
        invulnerable: p.invulnerable(),
    })
}

pub fn update(world: &mut hecs::World, f: &mut Frame) {
    // Respawn needs the live enemy rects; grab them before borrowing the
    // player mutably.
    let about_to_respawn = world
        .get::<&Player>(f.player)
        .map(|p| p.is_dead() && p.respawn_timer - f.dt <= 0.0)
        .unwrap_or(false);
    let enemy_rects: Vec<Rect> = if about_to_respawn {
        world
            .query::<(&Position, &crate::ecs::components::Enemy)>()
            .iter()
            .map(|(_, (pos, enemy))| Rect::from_center(pos.0, enemy.kind.size()))
            .collect()
    } else {
        Vec::new()
    };

    let mut shots: Vec<(Vec2, f32, bool)> = Vec::new();
    let mut charge_flash: Option<Vec2> = None;

    if let Ok((pos, vel, p)) = world.query_one_mut::<(&mut Position, &mut Velocity, &mut Player)>(f.player) {
        p.fire_timer += f.dt;
        p.invuln_timer = (p.invuln_timer - f.dt).max(0.0);

        if p.is_dead() {
            p.respawn_timer -= f.dt;
            if p.respawn_timer <= 0.0 && f.run.lives > 0 {
                let view_center = f.bounds.screen_w * 0.5 - f.offset;
                pos.0 = safe_spawn(view_center, f.bounds.band_h, &enemy_rects, f.rng);
                vel.0 = Vec2::ZERO;
                p.health = 100.0;
                p.state = PlayerState::Idle;
                p.invuln_timer = INVULN_DURATION;
                p.charge = 0.0;
                p.charge_ready = false;
                f.events.push(GameEvent::PlayerRespawned);
                log::debug!("player respawned at ({:.0}, {:.0})", pos.0.x, pos.0.y);
            }
            return;
        }

        // --- Movement: fixed-step, per-axis drag and clamp ---
        let drive = f.input.held.drive();
        if drive.x < 0.0 {
            p.facing = crate::ecs::components::Facing::Left;
        } else if drive.x > 0.0 {
            p.facing = crate::ecs::components::Facing::Right;
        }
        p.state = if drive != Vec2::ZERO {
            PlayerState::Moving
        } else {
            PlayerState::Idle
        };

        vel.0.x = movement::integrate_axis(vel.0.x, drive.x, ACCEL_X, DRAG_X, MAX_SPEED_X);
        vel.0.y = movement::integrate_axis(vel.0.y, drive.y, ACCEL_Y, DRAG_Y, MAX_SPEED_Y);
        pos.0 += vel.0;

        let half = PLAYER_SIZE * 0.5;
        pos.0.x = pos.0.x.clamp(half.x, f.bounds.world_w - half.x);
        pos.0.y = pos.0.y.clamp(half.y, f.bounds.ground_y - half.y);

        // --- Regular shot: cooldown-gated while held ---
        if f.input.held.fire && p.fire_timer >= FIRE_COOLDOWN {
            p.fire_timer = 0.0;
            shots.push((pos.0, p.facing.angle(), false));
            f.events.push(GameEvent::PlayerFired { charged: false });
        }

        // --- Charged shot: hold to fill, release to loose ---
        if f.input.held.charge {
            p.charge += f.dt;
            if !p.charge_ready && p.charge >= CHARGE_TIME {
                p.charge_ready = true;
                charge_flash = Some(pos.0);
                f.events.push(GameEvent::ChargeReady);
            }
        } else {
            if p.charge >= CHARGE_TIME {
                shots.push((pos.0, p.facing.angle(), true));
                f.events.push(GameEvent::PlayerFired { charged: true });
            }
            p.charge = 0.0;
            p.charge_ready = false;
        }
    }

    if let Some(origin) = charge_flash {
        f.particles.burst(origin, &Burst::flash(), f.rng);
    }
    for (origin, angle, charged) in shots {
        spawn::player_bullet(world, origin, angle, charged);
    }
}

/// Death is applied here (not in the collision scan) so the effect fires
/// exactly once per life, no matter how many hits landed this frame.
pub fn kill(p: &mut Player, f: &mut Frame, pos: Vec2) {
    if p.is_dead() {
        return;
    }
    p.state = PlayerState::Dead;
    p.respawn_timer = RESPAWN_DELAY;
    f.run.lives = f.run.lives.saturating_sub(1);
    f.particles.burst(pos, &Burst::explosion(0x60A0FFFF), f.rng);
    f.events.push(GameEvent::PlayerKilled);
    log::info!("player down, {} lives left", f.run.lives);
}

/// Probe candidate locations around the view center until one is clear of
/// every enemy rect. Falls back to the last candidate when crowded.
fn safe_spawn(view_center: f32, band_h: f32, enemy_rects: &[Rect], rng: &mut fastrand::Rng) -> Vec2 {
    let mut candidate = Vec2::new(view_center, band_h * 0.35);
    for attempt in 0..RESPAWN_ATTEMPTS {
        let clear = !enemy_rects.iter().any(|r| {
            Player::hitbox(candidate)
                .inflate(RESPAWN_CLEARANCE)
                .intersects(r)
        });
        if clear {
            return candidate;
        }
        // widen the search alternating left/right with vertical scatter
        let spread = 80.0 * (attempt + 1) as f32;
        let side = if rng.bool() { 1.0 } else { -1.0 };
        candidate = Vec2::new(
            view_center + side * spread,
            band_h * (0.2 + rng.f32() * 0.4),
        );
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::Facing;
    use crate::ecs::systems::testkit::Ctx;
    use crate::input::{InputPulse, InputState};

    fn world_with_player() -> (hecs::World, hecs::Entity) {
        let mut world = hecs::World::new();
        let player = spawn::player(&mut world, Vec2::new(1000.0, 300.0));
        (world, player)
    }

    fn held(state: InputState) -> InputPulse {
        InputPulse::new(state, state)
    }

    #[test]
    fn velocity_never_exceeds_axis_bounds() {
        let (mut world, player) = world_with_player();
        let mut ctx = Ctx::new();
        let input = held(InputState { right: true, down: true, ..Default::default() });
        for _ in 0..600 {
            let mut f = ctx.frame(player);
            f.input = input;
            update(&mut world, &mut f);
            let vel = world.get::<&Velocity>(player).unwrap().0;
            assert!(vel.x.abs() <= MAX_SPEED_X + 1e-3);
            assert!(vel.y.abs() <= MAX_SPEED_Y + 1e-3);
        }
    }

    #[test]
    fn firing_respects_cooldown() {
        let (mut world, player) = world_with_player();
        let mut ctx = Ctx::new();
        let input = held(InputState { fire: true, ..Default::default() });
        // 30 ticks at 1/60s is 0.5s: at a 0.1s cooldown that is at most 6 shots
        for _ in 0..30 {
            let mut f = ctx.frame(player);
            f.input = input;
            update(&mut world, &mut f);
        }
        let bullets = world
            .query::<&crate::ecs::components::Bullet>()
            .iter()
            .count();
        assert!(bullets >= 5 && bullets <= 6, "got {bullets} bullets");
    }

    #[test]
    fn facing_flips_shot_angle() {
        let (mut world, player) = world_with_player();
        let mut ctx = Ctx::new();
        let input = held(InputState { left: true, fire: true, ..Default::default() });
        let mut f = ctx.frame(player);
        f.input = input;
        update(&mut world, &mut f);

        assert_eq!(world.get::<&Player>(player).unwrap().facing, Facing::Left);
        let (_, vel) = world
            .query::<(&crate::ecs::components::Bullet, &Velocity)>()
            .iter()
            .map(|(_, (b, v))| (*b, v.0))
            .next()
            .expect("one bullet");
        assert!(vel.x < 0.0 && vel.y.abs() < 1e-3);
    }

    #[test]
    fn charge_releases_piercing_shot() {
        let (mut world, player) = world_with_player();
        let mut ctx = Ctx::new();
        let charging = held(InputState { charge: true, ..Default::default() });
        // 1.3 seconds of holding
        for _ in 0..78 {
            let mut f = ctx.frame(player);
            f.input = charging;
            update(&mut world, &mut f);
        }
        assert!(world.get::<&Player>(player).unwrap().charge_ready);

        let mut f = ctx.frame(player);
        f.input = held(InputState::default());
        update(&mut world, &mut f);

        let piercing = world
            .query::<&crate::ecs::components::Bullet>()
            .iter()
            .filter(|(_, b)| b.piercing)
            .count();
        assert_eq!(piercing, 1);
        assert_eq!(world.get::<&Player>(player).unwrap().charge, 0.0);
    }

    #[test]
    fn dead_player_ignores_input_then_respawns() {
        let (mut world, player) = world_with_player();
        let mut ctx = Ctx::new();
        {
            let mut p = world.get::<&mut Player>(player).unwrap();
            p.state = PlayerState::Dead;
            p.respawn_timer = RESPAWN_DELAY;
        }
        let input = held(InputState { right: true, fire: true, ..Default::default() });

        // one tick dead: no movement, no bullets
        let before = world.get::<&Position>(player).unwrap().0;
        let mut f = ctx.frame(player);
        f.input = input;
        update(&mut world, &mut f);
        assert_eq!(world.get::<&Position>(player).unwrap().0, before);
        assert_eq!(world.query::<&crate::ecs::components::Bullet>().iter().count(), 0);

        // run out the delay
        for _ in 0..150 {
            let mut f = ctx.frame(player);
            f.input = input;
            update(&mut world, &mut f);
        }
        let p = *world.get::<&Player>(player).unwrap();
        assert_eq!(p.state, PlayerState::Moving);
        assert_eq!(p.health, 100.0);
        assert!(p.invulnerable());
    }

    #[test]
    fn respawn_avoids_occupied_ground() {
        let (mut world, player) = world_with_player();
        let mut ctx = Ctx::new();
        // crowd the view center with a lander
        let view_center = ctx.bounds.screen_w * 0.5;
        let blocker = Vec2::new(view_center, ctx.bounds.band_h * 0.35);
        spawn::lander(&mut world, blocker, 0, &mut ctx.rng);
        {
            let mut p = world.get::<&mut Player>(player).unwrap();
            p.state = PlayerState::Dead;
            p.respawn_timer = 0.0;
        }
        let mut f = ctx.frame(player);
        update(&mut world, &mut f);

        let pos = world.get::<&Position>(player).unwrap().0;
        let enemy_rect = Rect::from_center(blocker, crate::ecs::components::EnemyKind::Lander.size());
        assert!(!Player::hitbox(pos).intersects(&enemy_rect));
    }
}
