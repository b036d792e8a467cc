//! Decaying-sprite particle system for death bursts, rescues and charge
//! flourishes. Steady-state lifecycle only: spawn with a velocity and a
//! lifetime, drift, fade, swap-remove on expiry.

use glam::Vec2;

use crate::scene::{SpriteInstance, SpriteKind};

/// Maximum concurrent particles.
const MAX_PARTICLES: usize = 2048;
/// Particle radius range, pixels.
const MIN_SIZE: f32 = 2.0;
const MAX_SIZE: f32 = 6.0;
/// Velocity drag, 1/second.
const DRAG: f32 = 1.2;

#[derive(Debug, Clone, Copy)]
struct Particle {
    pos: Vec2,
    vel: Vec2,
    lifetime: f32,
    max_lifetime: f32,
    size: f32,
    /// RGBA packed, alpha scaled down as the particle ages.
    color: u32,
}

/// Burst request: ranges are sampled per particle.
#[derive(Debug, Clone, Copy)]
pub struct Burst {
    pub count: usize,
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_lifetime: f32,
    pub max_lifetime: f32,
    /// Emission arc in radians. Full circle: (0, TAU).
    pub min_angle: f32,
    pub max_angle: f32,
    /// Base RGBA color.
    pub color: u32,
}

impl Burst {
    /// The standard death explosion.
    pub fn explosion(color: u32) -> Self {
        Self {
            count: 40,
            min_speed: 120.0,
            max_speed: 300.0,
            min_lifetime: 0.5,
            max_lifetime: 1.4,
            min_angle: 0.0,
            max_angle: std::f32::consts::TAU,
            color,
        }
    }

    /// Small white flash (charge ready, rescue pickup).
    pub fn flash() -> Self {
        Self {
            count: 18,
            min_speed: 300.0,
            max_speed: 500.0,
            min_lifetime: 0.2,
            max_lifetime: 0.5,
            min_angle: 0.0,
            max_angle: std::f32::consts::TAU,
            color: 0xFFFFFFFF,
        }
    }
}

pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self {
            particles: Vec::with_capacity(MAX_PARTICLES),
        }
    }

    /// Emit a burst at `origin`. Spawns stop silently at the global cap.
    pub fn burst(&mut self, origin: Vec2, burst: &Burst, rng: &mut fastrand::Rng) {
        for _ in 0..burst.count {
            if self.particles.len() >= MAX_PARTICLES {
                break;
            }
            let angle = burst.min_angle + rng.f32() * (burst.max_angle - burst.min_angle);
            let speed = burst.min_speed + rng.f32() * (burst.max_speed - burst.min_speed);
            let lifetime =
                burst.min_lifetime + rng.f32() * (burst.max_lifetime - burst.min_lifetime);
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                lifetime,
                max_lifetime: lifetime,
                size: MIN_SIZE + rng.f32() * (MAX_SIZE - MIN_SIZE),
                color: burst.color,
            });
        }
    }

    /// Move, age, swap-remove the dead.
    pub fn update(&mut self, dt: f32) {
        let mut i = 0;
        while i < self.particles.len() {
            let p = &mut self.particles[i];
            p.pos += p.vel * dt;
            p.vel *= 1.0 - (DRAG * dt).min(1.0);
            p.lifetime -= dt;
            if p.lifetime <= 0.0 {
                self.particles.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Append screen-space instances, fading alpha with remaining lifetime.
    pub fn build_instances(&self, offset: f32, buf: &mut Vec<SpriteInstance>) {
        for p in &self.particles {
            let frac = (p.lifetime / p.max_lifetime).clamp(0.0, 1.0);
            let base_alpha = (p.color & 0xFF) as f32;
            let color = (p.color & 0xFFFF_FF00) | (base_alpha * frac) as u32;
            let radius = p.size * frac;
            if radius <= 0.0 {
                continue;
            }
            buf.push(SpriteInstance {
                pos: [p.pos.x + offset, p.pos.y],
                size: [radius * 2.0, radius * 2.0],
                color,
                kind: SpriteKind::Particle,
                flip_x: false,
            });
        }
    }

    pub fn count(&self) -> usize {
        self.particles.len()
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_spawns_within_ranges() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut sys = ParticleSystem::new();
        let burst = Burst {
            count: 50,
            min_speed: 100.0,
            max_speed: 200.0,
            min_lifetime: 1.0,
            max_lifetime: 2.0,
            min_angle: 0.0,
            max_angle: std::f32::consts::TAU,
            color: 0xFFC83280,
        };
        sys.burst(Vec2::new(10.0, 10.0), &burst, &mut rng);
        assert_eq!(sys.count(), 50);
        for p in &sys.particles {
            let speed = p.vel.length();
            assert!((100.0..=200.0).contains(&speed), "speed {speed}");
            assert!((1.0..=2.0).contains(&p.lifetime));
        }
    }

    #[test]
    fn particles_expire() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut sys = ParticleSystem::new();
        sys.burst(Vec2::ZERO, &Burst::flash(), &mut rng);
        assert!(sys.count() > 0);
        for _ in 0..60 {
            sys.update(1.0 / 60.0);
        }
        // flash lifetime tops out at 0.5s
        assert_eq!(sys.count(), 0);
    }

    #[test]
    fn cap_is_respected() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut sys = ParticleSystem::new();
        let mut big = Burst::explosion(0xFFFFFFFF);
        big.count = MAX_PARTICLES + 500;
        sys.burst(Vec2::ZERO, &big, &mut rng);
        assert_eq!(sys.count(), MAX_PARTICLES);
    }

    #[test]
    fn instance_alpha_fades() {
        let mut rng = fastrand::Rng::with_seed(3);
        let mut sys = ParticleSystem::new();
        sys.burst(Vec2::ZERO, &Burst::explosion(0xFF8040FF), &mut rng);
        for _ in 0..20 {
            sys.update(1.0 / 60.0);
        }
        let mut buf = Vec::new();
        sys.build_instances(0.0, &mut buf);
        for inst in &buf {
            assert!((inst.color & 0xFF) < 0xFF, "alpha must have decayed");
        }
    }
}
