//! Shared kinematic primitives. Two integration conventions coexist:
//! the player integrates per fixed tick (`p += v`, per-axis clamp), AI
//! actors integrate against real delta time (`p += v * dt`, magnitude
//! clamp). Helpers here serve both.

use glam::Vec2;

/// Velocity from polar coordinates (speed, angle in radians).
pub fn from_polar(speed: f32, angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin()) * speed
}

/// One fixed-step axis update for a driven body: accelerate while driven,
/// decay by drag while not, clamp to the axis bound.
///
/// The drag step snaps to exactly zero when it would cross zero, so an
/// undriven axis settles instead of oscillating.
pub fn integrate_axis(v: f32, drive: f32, accel: f32, drag: f32, max: f32) -> f32 {
    let v = if drive != 0.0 {
        v + drive * accel
    } else if v > 0.0 {
        (v - drag).max(0.0)
    } else if v < 0.0 {
        (v + drag).min(0.0)
    } else {
        0.0
    };
    v.clamp(-max, max)
}

/// Low-pass filter the current velocity toward a desired velocity.
/// `factor` is the per-frame blend (rate * dt), clamped to [0, 1] so a
/// large frame can never overshoot the target.
pub fn steer(vel: Vec2, desired: Vec2, factor: f32) -> Vec2 {
    vel + (desired - vel) * factor.clamp(0.0, 1.0)
}

/// Normalized direction from `from` to `to`, or zero when the two points
/// coincide (degenerate-direction guard).
pub fn dir_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Rotate a vector by `angle` radians.
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}
