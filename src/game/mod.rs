//! Top-level simulation facade. Owns the ECS world and every service the
//! frame loop threads through it, and encodes the fixed per-frame order:
//! spawns, then camera, then actors, then collision, then culling.

use glam::Vec2;

use crate::camera::Camera;
use crate::ecs::components::{EnemyKind, Humanoid, HumanoidState, Player, PlayerState, Position};
use crate::ecs::spawn;
use crate::ecs::systems::collision::{self, CollisionBuffers};
use crate::ecs::systems::{self, player, Frame};
use crate::events::{EventQueue, GameEvent};
use crate::input::{InputPulse, InputState};
use crate::particles::ParticleSystem;
use crate::scene::{self, MinimapBlip, SpriteInstance};
use crate::shield::Shield;
use crate::terrain::Terrain;
use crate::wave::WaveDirector;

/// HUD strip height under the gameplay band.
const GROUND_INSET: f32 = 40.0;

/// Embedder-visible knobs. Everything else is module-level tuning.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub screen_w: f32,
    pub screen_h: f32,
    /// Vertical gameplay band; actors never leave it.
    pub band_h: f32,
    pub world_w: f32,
    /// Fixed seed for reproducible runs; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub lives: u32,
    pub smart_bombs: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_w: 1280.0,
            screen_h: 960.0,
            band_h: 720.0,
            world_w: 3840.0,
            seed: None,
            lives: 3,
            smart_bombs: 3,
        }
    }
}

/// Static world geometry derived from the config once.
#[derive(Debug, Clone)]
pub struct Bounds {
    pub world_w: f32,
    pub screen_w: f32,
    pub screen_h: f32,
    pub band_h: f32,
    pub ground_y: f32,
}

impl From<&GameConfig> for Bounds {
    fn from(config: &GameConfig) -> Self {
        Self {
            world_w: config.world_w,
            screen_w: config.screen_w,
            screen_h: config.screen_h,
            band_h: config.band_h,
            ground_y: config.band_h - GROUND_INSET,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    GameOver,
}

/// Run totals. Persist across waves; reset only by starting a new run.
#[derive(Debug, Clone)]
pub struct RunState {
    pub score: u64,
    pub currency: u64,
    pub lives: u32,
    pub smart_bombs: u32,
    pub status: GameStatus,
}

impl RunState {
    pub fn new(lives: u32, smart_bombs: u32) -> Self {
        Self {
            score: 0,
            currency: 0,
            lives,
            smart_bombs,
            status: GameStatus::Running,
        }
    }
}

pub struct Game {
    world: hecs::World,
    player: hecs::Entity,
    director: WaveDirector,
    camera: Camera,
    particles: ParticleSystem,
    events: EventQueue,
    shield: Shield,
    terrain: Terrain,
    rng: fastrand::Rng,
    run: RunState,
    bounds: Bounds,
    bufs: CollisionBuffers,
    enemy_seq: u64,
    prev_input: InputState,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let bounds = Bounds::from(&config);
        let mut rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let mut world = hecs::World::new();
        let start = Vec2::new(bounds.world_w * 0.5, bounds.band_h * 0.35);
        let player = spawn::player(&mut world, start);
        let terrain = Terrain::generate(bounds.world_w, bounds.ground_y, &mut rng);

        let mut events = EventQueue::new();
        let mut director = WaveDirector::new();
        director.begin(&mut world, &mut rng, &mut events, &bounds);

        Self {
            world,
            player,
            director,
            camera: Camera::new(bounds.screen_w, bounds.world_w, start.x),
            particles: ParticleSystem::new(),
            events,
            shield: Shield::new(),
            terrain,
            rng,
            run: RunState::new(config.lives, config.smart_bombs),
            bounds,
            bufs: CollisionBuffers::new(),
            enemy_seq: 0,
            prev_input: InputState::default(),
        }
    }

    /// Advance one frame. `dt` is the step in seconds.
    pub fn update(&mut self, input: InputState, dt: f32) {
        if self.run.status == GameStatus::GameOver {
            // the world is frozen; let the last bursts finish
            self.particles.update(dt);
            self.prev_input = input;
            return;
        }
        let pulse = InputPulse::new(self.prev_input, input);
        self.prev_input = input;

        {
            let Game {
                world,
                player,
                director,
                camera,
                particles,
                events,
                shield,
                rng,
                run,
                bounds,
                bufs,
                enemy_seq,
                ..
            } = self;

            let mut f = Frame {
                dt,
                offset: camera.offset(),
                wave: director.wave(),
                bounds,
                input: pulse,
                player: *player,
                fresh_seq: *enemy_seq,
                enemy_seq,
                rng,
                events,
                particles,
                run,
                shield,
            };

            // 1. population policy: spawns, eviction, capture assignment
            director.update(world, &mut f);
            f.wave = director.wave();

            // 2. camera, producing this frame's world-to-screen offset
            if let Some(view) = player::view(world, *player) {
                camera.update(view.pos, view.facing, dt);
            }
            f.offset = camera.offset();

            // 3. consumables triggered on input edges
            let alive = player::view(world, *player).is_some_and(|v| !v.dead);
            if alive && f.input.smart_bomb_pressed && f.run.smart_bombs > 0 {
                f.run.smart_bombs -= 1;
                collision::smart_bomb(world, &mut f);
            }
            if alive && f.input.shield_pressed {
                if let Some(view) = player::view(world, *player) {
                    let lead = view.facing.dir_x() * 60.0;
                    if f.shield.deploy(view.pos + Vec2::new(lead, 0.0)) {
                        f.events.push(GameEvent::ShieldDeployed);
                    }
                }
            }

            // 4. actors, combat, culling in fixed order
            systems::tick(world, &mut f, bufs);
        }

        self.shield.update(dt);
        self.particles.update(dt);
    }

    // --- queries for the embedding UI/shop ---

    pub fn status(&self) -> GameStatus {
        self.run.status
    }

    pub fn score(&self) -> u64 {
        self.run.score
    }

    pub fn currency(&self) -> u64 {
        self.run.currency
    }

    pub fn lives(&self) -> u32 {
        self.run.lives
    }

    pub fn smart_bombs(&self) -> u32 {
        self.run.smart_bombs
    }

    pub fn wave(&self) -> u32 {
        self.director.wave()
    }

    pub fn player_health(&self) -> f32 {
        self.world
            .get::<&Player>(self.player)
            .map(|p| p.health.max(0.0))
            .unwrap_or(0.0)
    }

    pub fn player_state(&self) -> PlayerState {
        self.world
            .get::<&Player>(self.player)
            .map(|p| p.state)
            .unwrap_or(PlayerState::Dead)
    }

    pub fn humanoids_left(&self) -> usize {
        self.world
            .query::<&Humanoid>()
            .iter()
            .filter(|(_, h)| h.state != HumanoidState::Killed)
            .count()
    }

    /// Kinds of every enemy currently inside the visible screen region.
    pub fn on_screen_enemies(&self) -> Vec<EnemyKind> {
        use crate::ecs::systems::culling::on_screen;
        let offset = self.camera.offset();
        self.world
            .query::<(&Position, &crate::ecs::components::Enemy)>()
            .iter()
            .filter(|(_, (pos, _))| on_screen(pos.0.x, offset, self.bounds.screen_w))
            .map(|(_, (_, e))| e.kind)
            .collect()
    }

    /// Hand the frame's events to the embedder (audio, HUD, shop).
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.take()
    }

    /// Current world-to-screen x offset.
    pub fn camera_offset(&self) -> f32 {
        self.camera.offset()
    }

    /// Flatten the frame for the renderer.
    pub fn build_scene(&self, buf: &mut Vec<SpriteInstance>) {
        buf.clear();
        scene::build(
            &self.world,
            self.player,
            self.camera.offset(),
            &self.bounds,
            &self.terrain,
            &self.shield,
            &self.particles,
            buf,
        );
    }

    /// Normalized blips for the minimap renderer.
    pub fn build_minimap(&self, buf: &mut Vec<MinimapBlip>) {
        buf.clear();
        scene::minimap(&self.world, &self.bounds, buf);
    }

    /// Direct world access for tests and debug overlays.
    pub fn world(&self) -> &hecs::World {
        &self.world
    }
}
