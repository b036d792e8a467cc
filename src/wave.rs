//! Wave director: population policy and pacing. Sole writer of capture
//! assignments, owner of the rolling caps, the baiter clock and the
//! wave-clear check.

use glam::Vec2;

use crate::ecs::components::{
    Enemy, EnemyKind, Humanoid, HumanoidState, Lander, LanderState, Position, HUMANOID_SIZE,
};
use crate::ecs::spawn;
use crate::ecs::systems::{lander, player, Frame};
use crate::events::{EventQueue, GameEvent};
use crate::game::Bounds;

/// Simultaneous-lander cap: base + wave, hard max.
const LANDER_CAP_BASE: usize = 4;
const LANDER_CAP_MAX: usize = 10;
/// Simultaneous-mutant cap.
const MUTANT_CAP_BASE: usize = 2;
const MUTANT_CAP_MAX: usize = 8;
/// Landers budgeted per wave.
const LANDER_TOTAL_BASE: usize = 8;
const LANDER_TOTAL_STEP: usize = 3;
const LANDER_TOTAL_MAX: usize = 24;
/// Mutants seeded at wave start (conversions add more).
const MUTANT_SEED_STEP: usize = 2;
const MUTANT_SEED_MAX: usize = 8;
/// Humanoid population at wave start.
const HUMANOID_QUOTA: usize = 10;
/// Seconds between paced enemy spawns.
const SPAWN_INTERVAL: f32 = 1.5;
/// Seconds between capture-assignment sweeps.
const CAPTURE_INTERVAL: f32 = 2.0;
/// At most this many landers abducting at once.
const CAPTURE_LIMIT: usize = 2;
/// Baiters exist from this wave on.
const BAITER_UNLOCK_WAVE: u32 = 2;
/// Seconds into a wave before baiters become active.
const BAITER_GRACE: f32 = 12.0;
/// Seconds between baiter spawns once active.
const BAITER_INTERVAL: f32 = 9.0;
/// Baiters materialize at least this far from the player.
const BAITER_MIN_DIST: f32 = 700.0;
/// Enemies never spawn closer to the player than this.
const SPAWN_MIN_PLAYER_DIST: f32 = 400.0;
/// Breather between a cleared wave and the next.
const WAVE_DELAY: f32 = 3.0;
/// Wave-completion scoring.
const WAVE_BONUS_BASE: u64 = 100;
const SURVIVOR_BONUS: u64 = 100;

pub struct WaveDirector {
    wave: u32,
    landers_spawned: usize,
    mutants_seeded: usize,
    lander_total: usize,
    mutant_seed_total: usize,
    spawn_timer: f32,
    capture_timer: f32,
    baiter_timer: f32,
    wave_age: f32,
    /// Some while waiting out the shop interlude between waves.
    intermission: Option<f32>,
}

impl WaveDirector {
    pub fn new() -> Self {
        Self {
            wave: 0,
            landers_spawned: 0,
            mutants_seeded: 0,
            lander_total: 0,
            mutant_seed_total: 0,
            spawn_timer: 0.0,
            capture_timer: CAPTURE_INTERVAL,
            baiter_timer: BAITER_INTERVAL,
            wave_age: 0.0,
            intermission: None,
        }
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    fn lander_cap(&self) -> usize {
        (LANDER_CAP_BASE + self.wave as usize).min(LANDER_CAP_MAX)
    }

    fn mutant_cap(&self) -> usize {
        (MUTANT_CAP_BASE + self.wave as usize).min(MUTANT_CAP_MAX)
    }

    /// Kick off the first wave. `update` handles every one after it.
    pub fn begin(
        &mut self,
        world: &mut hecs::World,
        rng: &mut fastrand::Rng,
        events: &mut EventQueue,
        bounds: &Bounds,
    ) {
        self.start_wave(world, rng, events, bounds);
    }

    fn start_wave(
        &mut self,
        world: &mut hecs::World,
        rng: &mut fastrand::Rng,
        events: &mut EventQueue,
        bounds: &Bounds,
    ) {
        self.wave += 1;
        self.wave_age = 0.0;
        self.intermission = None;
        self.landers_spawned = 0;
        self.mutants_seeded = 0;
        self.lander_total =
            (LANDER_TOTAL_BASE + LANDER_TOTAL_STEP * (self.wave as usize - 1)).min(LANDER_TOTAL_MAX);
        self.mutant_seed_total = if self.wave >= 2 {
            (MUTANT_SEED_STEP * (self.wave as usize - 1)).min(MUTANT_SEED_MAX)
        } else {
            0
        };
        self.spawn_timer = 0.0;
        self.capture_timer = CAPTURE_INTERVAL;
        self.baiter_timer = BAITER_INTERVAL;

        // repopulate the ground up to quota
        let ground_center = bounds.ground_y - HUMANOID_SIZE.y * 0.5;
        let alive = world.query::<&Humanoid>().iter().count();
        for _ in alive..HUMANOID_QUOTA {
            let x = 40.0 + rng.f32() * (bounds.world_w - 80.0);
            spawn::humanoid(world, Vec2::new(x, ground_center), rng);
        }

        events.push(GameEvent::WaveStarted { wave: self.wave });
        log::info!(
            "wave {} started: {} landers, {} seeded mutants, {} humanoids",
            self.wave,
            self.lander_total,
            self.mutant_seed_total,
            HUMANOID_QUOTA
        );
    }

    /// One frame of population policy. Runs before any actor updates.
    pub fn update(&mut self, world: &mut hecs::World, f: &mut Frame) {
        if let Some(remaining) = self.intermission {
            let remaining = remaining - f.dt;
            if remaining > 0.0 {
                self.intermission = Some(remaining);
            } else {
                self.start_wave(world, f.rng, f.events, f.bounds);
            }
            return;
        }

        self.wave_age += f.dt;
        self.enforce_caps(world, f);
        self.spawn_pass(world, f);
        self.capture_pass(world, f);
        self.baiter_pass(world, f);
        self.clear_check(world, f);
    }

    /// Conversions can push mutants past the rolling cap; trim oldest-first.
    fn enforce_caps(&self, world: &mut hecs::World, f: &mut Frame) {
        while count_kind(world, EnemyKind::Lander) > self.lander_cap() {
            evict_oldest(world, EnemyKind::Lander, f.events);
        }
        while count_kind(world, EnemyKind::Mutant) > self.mutant_cap() {
            evict_oldest(world, EnemyKind::Mutant, f.events);
        }
    }

    fn spawn_pass(&mut self, world: &mut hecs::World, f: &mut Frame) {
        self.spawn_timer -= f.dt;
        if self.spawn_timer > 0.0 {
            return;
        }

        let player_x = player::view(world, f.player).map(|p| p.pos.x);
        if self.landers_spawned < self.lander_total {
            self.spawn_timer = SPAWN_INTERVAL;
            if count_kind(world, EnemyKind::Lander) >= self.lander_cap() {
                evict_oldest(world, EnemyKind::Lander, f.events);
            }
            let pos = spawn_spot(f.bounds, player_x, SPAWN_MIN_PLAYER_DIST, f.rng);
            let seq = f.next_seq();
            spawn::lander(world, pos, seq, f.rng);
            self.landers_spawned += 1;
        } else if self.mutants_seeded < self.mutant_seed_total {
            self.spawn_timer = SPAWN_INTERVAL;
            if count_kind(world, EnemyKind::Mutant) >= self.mutant_cap() {
                evict_oldest(world, EnemyKind::Mutant, f.events);
            }
            let pos = spawn_spot(f.bounds, player_x, SPAWN_MIN_PLAYER_DIST, f.rng);
            let seq = f.next_seq();
            spawn::mutant(world, pos, seq, f.rng);
            self.mutants_seeded += 1;
        }
    }

    /// On a fixed interval, send one idle lander after the nearest humanoid
    /// nobody else has dibs on. This is the only place capture assignments
    /// are written, which is what keeps the at-most-one-captor invariant.
    fn capture_pass(&mut self, world: &mut hecs::World, f: &mut Frame) {
        self.capture_timer -= f.dt;
        if self.capture_timer > 0.0 {
            return;
        }
        self.capture_timer = CAPTURE_INTERVAL;

        let mut capturing = 0usize;
        let mut attacking: Vec<(hecs::Entity, Vec2)> = Vec::new();
        let mut claimed: Vec<hecs::Entity> = Vec::new();
        for (entity, (pos, l)) in world.query::<(&Position, &Lander)>().iter() {
            match l.state {
                LanderState::Capturing => capturing += 1,
                LanderState::Attacking => attacking.push((entity, pos.0)),
            }
            if let Some(t) = l.target {
                claimed.push(t);
            }
        }
        if capturing >= CAPTURE_LIMIT || attacking.is_empty() {
            return;
        }

        let (chosen, chosen_pos) = attacking[f.rng.usize(0..attacking.len())];
        let target = world
            .query::<(&Position, &Humanoid)>()
            .iter()
            .filter(|(e, (_, h))| h.on_ground() && h.captor.is_none() && !claimed.contains(e))
            .min_by(|(_, (a, _)), (_, (b, _))| {
                let da = a.0.distance_squared(chosen_pos);
                let db = b.0.distance_squared(chosen_pos);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(e, _)| e);

        if let Some(target) = target {
            if let Ok(mut l) = world.get::<&mut Lander>(chosen) {
                l.state = LanderState::Capturing;
                l.target = Some(target);
                log::debug!("lander dispatched to abduct");
            }
        }
    }

    fn baiter_pass(&mut self, world: &mut hecs::World, f: &mut Frame) {
        if self.wave < BAITER_UNLOCK_WAVE || self.wave_age < BAITER_GRACE {
            return;
        }
        self.baiter_timer -= f.dt;
        if self.baiter_timer > 0.0 {
            return;
        }
        self.baiter_timer = BAITER_INTERVAL;

        let player_x = player::view(world, f.player).map(|p| p.pos.x);
        let pos = spawn_spot(f.bounds, player_x, BAITER_MIN_DIST, f.rng);
        let seq = f.next_seq();
        spawn::baiter(world, pos, seq, f.rng);
        log::debug!("baiter inbound at x={:.0}", pos.x);
    }

    fn clear_check(&mut self, world: &mut hecs::World, f: &mut Frame) {
        let budget_done = self.landers_spawned >= self.lander_total
            && self.mutants_seeded >= self.mutant_seed_total;
        if !budget_done || world.query::<&Enemy>().iter().count() > 0 {
            return;
        }

        let survivors = world
            .query::<&Humanoid>()
            .iter()
            .filter(|(_, h)| h.state != HumanoidState::Killed)
            .count() as u64;
        let bonus = WAVE_BONUS_BASE * self.wave as u64 + survivors * SURVIVOR_BONUS;
        f.run.score += bonus;
        f.events.push(GameEvent::WaveCleared { wave: self.wave, bonus });
        self.intermission = Some(WAVE_DELAY);
        log::info!("wave {} cleared, {survivors} survivors, +{bonus}", self.wave);
    }
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self::new()
    }
}

fn count_kind(world: &hecs::World, kind: EnemyKind) -> usize {
    world
        .query::<&Enemy>()
        .iter()
        .filter(|(_, e)| e.kind == kind)
        .count()
}

/// Remove the longest-lived enemy of `kind`, dropping cargo first. Silent:
/// no score, no death burst.
fn evict_oldest(world: &mut hecs::World, kind: EnemyKind, events: &mut EventQueue) {
    let oldest = world
        .query::<&Enemy>()
        .iter()
        .filter(|(_, e)| e.kind == kind)
        .min_by_key(|(_, e)| e.seq)
        .map(|(entity, _)| entity);
    if let Some(entity) = oldest {
        lander::release_captive(world, entity, events);
        let _ = world.despawn(entity);
        log::debug!("population cap: evicted oldest {}", kind.label());
    }
}

/// Random spot in the upper band, at least `min_dist` from the player when
/// the world is wide enough to allow it.
fn spawn_spot(bounds: &Bounds, player_x: Option<f32>, min_dist: f32, rng: &mut fastrand::Rng) -> Vec2 {
    let mut x = rng.f32() * bounds.world_w;
    if let Some(px) = player_x {
        for _ in 0..8 {
            if (x - px).abs() >= min_dist {
                break;
            }
            x = rng.f32() * bounds.world_w;
        }
    }
    let y = 40.0 + rng.f32() * (bounds.band_h * 0.4);
    Vec2::new(x, y)
}
