//! Small vector type and the dt-aware smoothing primitives every object uses.

use std::f32::consts::{PI, TAU};
use std::ops::{Add, Mul, Sub};

// ════════════════════════════════════════════════════════════════════════════
// Vec3
// ════════════════════════════════════════════════════════════════════════════

/// World-space point or scale, y up, +z toward the viewer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE:  Vec3 = Vec3 { x: 1.0, y: 1.0, z: 1.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3 { x, y, z }
    }

    pub const fn splat(v: f32) -> Self {
        Vec3 { x: v, y: v, z: v }
    }

    /// Turn about the y axis; positive angles carry +x toward +z.
    pub fn rotate_y(self, angle: f32) -> Vec3 {
        let (s, c) = angle.sin_cos();
        Vec3 {
            x: self.x * c - self.z * s,
            y: self.y,
            z: self.x * s + self.z * c,
        }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Vec3 { x, y, z }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, o: Vec3) -> Vec3 { Vec3::new(self.x + o.x, self.y + o.y, self.z + o.z) }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, o: Vec3) -> Vec3 { Vec3::new(self.x - o.x, self.y - o.y, self.z - o.z) }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, k: f32) -> Vec3 { Vec3::new(self.x * k, self.y * k, self.z * k) }
}

// ════════════════════════════════════════════════════════════════════════════
// Smoothing
// ════════════════════════════════════════════════════════════════════════════

/// Fraction of the residual to close this tick for an approach `rate`
/// (per second) over `dt` seconds.  Capped at 1 so a long stall lands on the
/// target instead of overshooting it.
pub fn step_factor(rate: f32, dt: f32) -> f32 {
    (rate * dt).clamp(0.0, 1.0)
}

/// Convert a per-60 Hz-frame lerp factor into the factor for a tick of `dt`
/// seconds, so the same curve is traced at any frame rate.
pub fn frame_factor(per_frame: f32, dt: f32) -> f32 {
    1.0 - (1.0 - per_frame).powf(dt.max(0.0) * 60.0)
}

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

pub fn lerp3(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    from + (to - from) * t
}

/// Wrap an angle into `[-π, π)`.
pub fn wrap_angle(a: f32) -> f32 {
    (a + PI).rem_euclid(TAU) - PI
}
