use glam::Vec2;

use crate::geom::Rect;

/// Current world position (sprite center).
#[derive(Debug, Clone, Copy)]
pub struct Position(pub Vec2);

/// Velocity. Player units are pixels/tick (fixed step); AI actor and bullet
/// units are pixels/second (delta-time scaled). The two conventions are
/// deliberate and tuned separately.
#[derive(Debug, Clone, Copy)]
pub struct Velocity(pub Vec2);

/// Which way the player ship points. Shots leave at 0 or 180 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn dir_x(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Shot angle in radians.
    pub fn angle(self) -> f32 {
        match self {
            Facing::Left => std::f32::consts::PI,
            Facing::Right => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Moving,
    Dead,
}

/// Player ship sprite size.
pub const PLAYER_SIZE: Vec2 = Vec2::new(46.0, 28.0);

/// The player-controlled craft. One entity per run; death flips the state to
/// `Dead` and a respawn rebuilds the physical fields in place.
#[derive(Debug, Clone, Copy)]
pub struct Player {
    pub state: PlayerState,
    /// 0-100.
    pub health: f32,
    pub facing: Facing,
    /// Seconds since the last shot left the barrel.
    pub fire_timer: f32,
    /// Charge accumulated while the charge action is held.
    pub charge: f32,
    /// Set once the charge crosses the full threshold (one-shot flourish).
    pub charge_ready: bool,
    /// Remaining invulnerability. Not a state: movement and firing still run.
    pub invuln_timer: f32,
    /// Counts down while dead; respawn fires when it reaches zero.
    pub respawn_timer: f32,
}

impl Player {
    pub fn new() -> Self {
        Self {
            state: PlayerState::Idle,
            health: 100.0,
            facing: Facing::Right,
            // past any cooldown: the first trigger pull always fires
            fire_timer: 10.0,
            charge: 0.0,
            charge_ready: false,
            invuln_timer: 0.0,
            respawn_timer: 0.0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.state == PlayerState::Dead
    }

    pub fn invulnerable(&self) -> bool {
        self.invuln_timer > 0.0
    }

    /// Full sprite bounds. Used for rescues and respawn-safety checks.
    pub fn hitbox(pos: Vec2) -> Rect {
        Rect::from_center(pos, PLAYER_SIZE)
    }

    /// The two small sub-rectangles enemies and enemy bullets are tested
    /// against. Deliberately narrower than the sprite.
    pub fn vulnerable_rects(pos: Vec2) -> [Rect; 2] {
        let w = PLAYER_SIZE.x * 0.5;
        let h = PLAYER_SIZE.y * 0.36;
        [
            Rect::from_center(pos - Vec2::new(0.0, PLAYER_SIZE.y * 0.22), Vec2::new(w, h)),
            Rect::from_center(pos + Vec2::new(0.0, PLAYER_SIZE.y * 0.22), Vec2::new(w, h)),
        ]
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Lander,
    Mutant,
    Baiter,
}

impl EnemyKind {
    pub fn label(self) -> &'static str {
        match self {
            EnemyKind::Lander => "lander",
            EnemyKind::Mutant => "mutant",
            EnemyKind::Baiter => "baiter",
        }
    }

    /// Base score for destroying this archetype.
    pub fn reward(self) -> u64 {
        match self {
            EnemyKind::Lander => 150,
            EnemyKind::Mutant => 250,
            EnemyKind::Baiter => 300,
        }
    }

    pub fn size(self) -> Vec2 {
        match self {
            EnemyKind::Lander => Vec2::new(34.0, 30.0),
            EnemyKind::Mutant => Vec2::new(30.0, 26.0),
            EnemyKind::Baiter => Vec2::new(38.0, 16.0),
        }
    }
}

/// Shared enemy fields. `seq` is the spawn sequence number; population-cap
/// eviction removes the lowest one first.
#[derive(Debug, Clone, Copy)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub seq: u64,
}

/// Per-instance cruise tuning, jittered at spawn.
#[derive(Debug, Clone, Copy)]
pub struct Cruise {
    /// Desired-velocity magnitude when steering, pixels/second.
    pub speed: f32,
    /// Low-pass filter rate toward the desired velocity, 1/second.
    pub accel: f32,
    /// Hard magnitude clamp, pixels/second.
    pub max_speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanderState {
    Attacking,
    Capturing,
}

/// Primary abductor archetype.
#[derive(Debug, Clone, Copy)]
pub struct Lander {
    pub state: LanderState,
    /// Humanoid this lander is assigned to (Capturing) or carrying.
    /// Assignment is written only by the wave director.
    pub target: Option<hecs::Entity>,
    /// Current wander heading, radians.
    pub heading: f32,
    /// Angular wobble applied on top of the chase direction, radians.
    pub wobble: f32,
    /// True while the current steering interval chases the player.
    pub chasing: bool,
    /// Counts down to the next heading/mode resample.
    pub steer_timer: f32,
}

impl Lander {
    pub fn new() -> Self {
        Self {
            state: LanderState::Attacking,
            target: None,
            heading: 0.0,
            wobble: 0.0,
            chasing: false,
            steer_timer: 0.0,
        }
    }
}

/// Fast weaving pursuer spawned from successful abductions.
#[derive(Debug, Clone, Copy)]
pub struct Mutant {
    pub phase: f32,
    /// Zigzag frequency in Hz.
    pub freq: f32,
    /// Lateral weave strength relative to the pursuit direction.
    pub amp: f32,
    /// Continuous-time fire probability, shots/second.
    pub fire_chance: f32,
}

/// Late-wave direct-pursuit pod. No firing behavior.
#[derive(Debug, Clone, Copy)]
pub struct Baiter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HumanoidState {
    Idle,
    Walking,
    Captured,
    Falling,
    Rescued,
    Killed,
}

pub const HUMANOID_SIZE: Vec2 = Vec2::new(12.0, 22.0);

/// Ground unit the player protects. `captor` is the back half of the
/// capture link; the lander's `target` is the other.
#[derive(Debug, Clone, Copy)]
pub struct Humanoid {
    pub state: HumanoidState,
    /// -1.0 or 1.0.
    pub walk_dir: f32,
    /// Counts down to the next idle/walk flip.
    pub state_timer: f32,
    /// Cosmetic vertical bob phase.
    pub bob_phase: f32,
    /// Seconds spent in the Falling state.
    pub fall_timer: f32,
    pub captor: Option<hecs::Entity>,
}

impl Humanoid {
    /// Eligible as a capture target.
    pub fn on_ground(&self) -> bool {
        matches!(self.state, HumanoidState::Idle | HumanoidState::Walking)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Faction {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Copy)]
pub struct Bullet {
    pub faction: Faction,
    /// Passes through enemies instead of being consumed on the first hit.
    pub piercing: bool,
    pub damage: f32,
}

/// Collision footprint. Player bullets are rectangles, enemy bullets
/// circles; everything else uses its sprite rect.
#[derive(Debug, Clone, Copy)]
pub enum Footprint {
    Rect(Vec2),
    Circle(f32),
}

impl Footprint {
    /// Bounding rect at the given center.
    pub fn rect_at(&self, pos: Vec2) -> Rect {
        match *self {
            Footprint::Rect(size) => Rect::from_center(pos, size),
            Footprint::Circle(r) => Rect::from_center(pos, Vec2::splat(r * 2.0)),
        }
    }

    /// Exact overlap against a rect.
    pub fn overlaps(&self, pos: Vec2, rect: &Rect) -> bool {
        match *self {
            Footprint::Rect(size) => Rect::from_center(pos, size).intersects(rect),
            Footprint::Circle(r) => crate::geom::circle_rect_overlap(pos, r, rect),
        }
    }
}
