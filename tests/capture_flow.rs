//! End-to-end capture and rescue arcs driven through the real system
//! stack, one tick at a time, with a hand-built frame context.

use glam::Vec2;

use skyraid::ecs::components::{
    Humanoid, HumanoidState, Lander, LanderState, Mutant, Player, Position,
};
use skyraid::ecs::spawn;
use skyraid::ecs::systems::collision::{self, CollisionBuffers};
use skyraid::ecs::systems::{tick, Frame};
use skyraid::events::{EventQueue, GameEvent};
use skyraid::game::{Bounds, RunState};
use skyraid::input::InputPulse;
use skyraid::particles::ParticleSystem;
use skyraid::shield::Shield;

const DT: f32 = 1.0 / 60.0;

/// Everything a `Frame` borrows, owned in one place.
struct Harness {
    bounds: Bounds,
    rng: fastrand::Rng,
    events: EventQueue,
    particles: ParticleSystem,
    run: RunState,
    shield: Shield,
    seq: u64,
    bufs: CollisionBuffers,
}

impl Harness {
    fn new() -> Self {
        Self {
            bounds: Bounds {
                world_w: 3840.0,
                screen_w: 1280.0,
                screen_h: 960.0,
                band_h: 720.0,
                ground_y: 680.0,
            },
            rng: fastrand::Rng::with_seed(99),
            events: EventQueue::new(),
            particles: ParticleSystem::new(),
            run: RunState::new(3, 3),
            shield: Shield::new(),
            seq: 0,
            bufs: CollisionBuffers::new(),
        }
    }

    fn step(&mut self, world: &mut hecs::World, player: hecs::Entity) {
        let mut f = Frame {
            dt: DT,
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
        };
        tick(world, &mut f, &mut self.bufs);
    }
}

fn ground_center(h: &Harness) -> f32 {
    h.bounds.ground_y - 11.0
}

#[test]
fn abduction_arc_ends_in_exactly_one_mutant() {
    let mut world = hecs::World::new();
    let mut h = Harness::new();

    // park the player far away and keep it unhittable for the duration
    let player = spawn::player(&mut world, Vec2::new(200.0, 300.0));
    world.get::<&mut Player>(player).unwrap().invuln_timer = f32::MAX;

    let gc = ground_center(&h);
    let humanoid = spawn::humanoid(&mut world, Vec2::new(1000.0, gc), &mut h.rng);
    let lander = spawn::lander(&mut world, Vec2::new(1000.0, 400.0), 0, &mut h.rng);
    {
        let mut l = world.get::<&mut Lander>(lander).unwrap();
        l.state = LanderState::Capturing;
        l.target = Some(humanoid);
    }

    let mut captured_seen = false;
    for _ in 0..3600 {
        h.step(&mut world, player);
        if !captured_seen {
            if let Ok(hm) = world.get::<&Humanoid>(humanoid) {
                captured_seen = hm.state == HumanoidState::Captured;
            }
        }
        if !world.contains(humanoid) {
            break;
        }
    }

    assert!(captured_seen, "the lander never grabbed its target");
    assert!(!world.contains(humanoid), "carried humanoid must convert");
    assert_eq!(world.query::<&Mutant>().iter().count(), 1);
    assert_eq!(h.events.count(|e| *e == GameEvent::HumanoidCaptured), 1);
    assert_eq!(h.events.count(|e| *e == GameEvent::HumanoidConverted), 1);
    // no dangling capture references anywhere
    for (_, l) in world.query::<&Lander>().iter() {
        assert!(l.target.is_none());
    }
}

#[test]
fn shooting_the_abductor_lets_the_player_catch_and_deliver() {
    let mut world = hecs::World::new();
    let mut h = Harness::new();

    let player = spawn::player(&mut world, Vec2::new(200.0, 300.0));
    world.get::<&mut Player>(player).unwrap().invuln_timer = f32::MAX;

    let gc = ground_center(&h);
    let humanoid = spawn::humanoid(&mut world, Vec2::new(1000.0, gc), &mut h.rng);
    let lander = spawn::lander(&mut world, Vec2::new(1000.0, 420.0), 0, &mut h.rng);
    {
        let mut l = world.get::<&mut Lander>(lander).unwrap();
        l.state = LanderState::Capturing;
        l.target = Some(humanoid);
    }

    // let the abduction start and the carrier climb well clear of the
    // ground, then blow it up mid-flight
    let mut shot_down = false;
    for _ in 0..1200 {
        h.step(&mut world, player);
        let state = world.get::<&Humanoid>(humanoid).ok().map(|hm| hm.state);
        let altitude = world.get::<&Position>(humanoid).map(|p| p.0.y).unwrap_or(f32::MAX);
        if !shot_down && state == Some(HumanoidState::Captured) && altitude < 500.0 {
            let mut f = Frame {
                dt: DT,
                offset: 0.0,
                wave: 1,
                bounds: &h.bounds,
                input: InputPulse::default(),
                player,
                fresh_seq: u64::MAX,
                enemy_seq: &mut h.seq,
                rng: &mut h.rng,
                events: &mut h.events,
                particles: &mut h.particles,
                run: &mut h.run,
                shield: &mut h.shield,
            };
            assert!(collision::destroy_enemy(&mut world, lander, &mut f, true));
            shot_down = true;
        }
        if shot_down {
            break;
        }
    }
    assert!(shot_down, "abduction never started");
    assert_eq!(
        world.get::<&Humanoid>(humanoid).unwrap().state,
        HumanoidState::Falling
    );

    // park the ship directly under the falling humanoid
    let drop_x = world.get::<&Position>(humanoid).unwrap().0.x;
    world.get::<&mut Position>(player).unwrap().0 =
        Vec2::new(drop_x, world.get::<&Position>(humanoid).unwrap().0.y + 60.0);

    let mut caught = false;
    for _ in 0..600 {
        h.step(&mut world, player);
        let state = world.get::<&Humanoid>(humanoid).unwrap().state;
        if state == HumanoidState::Rescued {
            caught = true;
            break;
        }
        assert_ne!(state, HumanoidState::Killed, "fell past the ship");
    }
    assert!(caught, "player never caught the humanoid");

    // descend to the ground: the escort steps off and pays out
    let score_before = h.run.score;
    world.get::<&mut Position>(player).unwrap().0 = Vec2::new(drop_x, h.bounds.ground_y - 20.0);
    for _ in 0..10 {
        h.step(&mut world, player);
    }
    assert_eq!(
        world.get::<&Humanoid>(humanoid).unwrap().state,
        HumanoidState::Idle
    );
    assert!(h.run.score > score_before);
    assert_eq!(h.events.count(|e| *e == GameEvent::HumanoidCaught), 1);
    assert_eq!(
        h.events.count(|e| matches!(e, GameEvent::HumanoidRescued { .. })),
        1
    );
}
