//! Deployable shield consumable. Parks a translucent wall at the spot it
//! was deployed; enemy bullets that hit it spend themselves against shield
//! health instead of the player.

use glam::Vec2;

use crate::geom::Rect;

const SHIELD_SIZE: Vec2 = Vec2::new(20.0, 60.0);
const MAX_HEALTH: f32 = 200.0;
/// Alpha pulse speed, units/second (cosmetic).
const PULSE_SPEED: f32 = 200.0;

#[derive(Debug, Clone)]
pub struct Shield {
    pub deployed: bool,
    pub pos: Vec2,
    pub health: f32,
    alpha: f32,
    pulse_dir: f32,
}

impl Shield {
    pub fn new() -> Self {
        Self {
            deployed: false,
            pos: Vec2::ZERO,
            health: MAX_HEALTH,
            alpha: 255.0,
            pulse_dir: -1.0,
        }
    }

    /// Park the shield at `pos`. A shield already standing stays where it is.
    pub fn deploy(&mut self, pos: Vec2) -> bool {
        if self.deployed {
            return false;
        }
        self.pos = pos;
        self.health = MAX_HEALTH;
        self.deployed = true;
        true
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, SHIELD_SIZE)
    }

    /// Soak one hit. Returns true when this hit depleted the shield.
    pub fn absorb(&mut self, damage: f32) -> bool {
        self.health -= damage;
        if self.health <= 0.0 {
            self.deployed = false;
            return true;
        }
        false
    }

    /// Cosmetic alpha pulse, ceiling scaled by remaining health.
    pub fn update(&mut self, dt: f32) {
        if !self.deployed {
            return;
        }
        let max_alpha = (self.health / MAX_HEALTH).max(0.0) * 255.0;
        self.alpha += self.pulse_dir * PULSE_SPEED * dt;
        if self.alpha <= 0.0 {
            self.alpha = 0.0;
            self.pulse_dir = 1.0;
        } else if self.alpha >= max_alpha {
            self.alpha = max_alpha;
            self.pulse_dir = -1.0;
        }
    }

    pub fn alpha(&self) -> u8 {
        self.alpha.clamp(0.0, 255.0) as u8
    }
}

impl Default for Shield {
    fn default() -> Self {
        Self::new()
    }
}
