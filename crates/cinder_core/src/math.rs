//! Vector and orientation math used by effect construction.
//!
//! Coordinates are Z-up world units. Angles are in degrees and follow the
//! pitch/yaw/roll order used by the event layer.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 3D Vector - position, velocity, direction
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit X vector
    pub const X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit Y vector
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit Z vector (world up)
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Same value in all three components.
    #[must_use]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Distance to another point
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// True when every component is exactly zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    #[must_use]
    pub fn try_normalize(self) -> Option<Self> {
        let len = self.length();
        if len == 0.0 || !len.is_finite() {
            return None;
        }
        Some(self * (1.0 / len))
    }

    /// `self + dir * scale`
    #[must_use]
    pub fn mul_add(self, dir: Self, scale: f32) -> Self {
        Self::new(
            self.x + dir.x * scale,
            self.y + dir.y * scale,
            self.z + dir.z * scale,
        )
    }

    /// Projects `self` onto the plane through the origin with the given normal.
    #[must_use]
    pub fn project_on_plane(self, normal: Self) -> Self {
        let inv = 1.0 / normal.length_squared();
        self - normal * (self.dot(normal) * inv)
    }

    /// Some unit vector perpendicular to `self`.
    ///
    /// Picks the world axis least aligned with `self` and projects it onto
    /// the plane normal to `self`. `self` must be a unit vector.
    #[must_use]
    pub fn perpendicular(self) -> Self {
        let comps = [self.x.abs(), self.y.abs(), self.z.abs()];
        let mut pos = 0;
        let mut min = 1.0_f32;
        for (i, c) in comps.iter().enumerate() {
            if *c < min {
                pos = i;
                min = *c;
            }
        }
        let mut temp = [0.0_f32; 3];
        temp[pos] = 1.0;
        let projected = Self::from_array(temp).project_on_plane(self);
        projected.try_normalize().unwrap_or(Self::X)
    }

    /// Rotates `self` around the unit axis `dir` by `degrees` (right-handed).
    #[must_use]
    pub fn rotate_around(self, dir: Self, degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        self * cos + dir.cross(self) * sin + dir * (dir.dot(self) * (1.0 - cos))
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Orientation as three basis vectors: forward, left, up.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Axis(pub [Vec3; 3]);

impl Axis {
    /// World-aligned orientation.
    pub const IDENTITY: Self = Self([Vec3::X, Vec3::Y, Vec3::Z]);

    /// Builds an orientation from pitch/yaw/roll angles in degrees.
    #[must_use]
    pub fn from_angles(angles: Vec3) -> Self {
        let (sp, cp) = angles.x.to_radians().sin_cos();
        let (sy, cy) = angles.y.to_radians().sin_cos();
        let (sr, cr) = angles.z.to_radians().sin_cos();

        let forward = Vec3::new(cp * cy, cp * sy, -sp);
        let right = Vec3::new(
            -sr * sp * cy + cr * sy,
            -sr * sp * sy - cr * cy,
            -sr * cp,
        );
        let up = Vec3::new(cr * sp * cy + sr * sy, cr * sp * sy - sr * cy, cr * cp);

        Self([forward, -right, up])
    }

    /// Orientation whose forward vector is `dir`, spun around `dir` by `degrees`.
    ///
    /// Falls back to [`Axis::IDENTITY`] when `dir` is the zero vector.
    #[must_use]
    pub fn from_direction(dir: Vec3, degrees: f32) -> Self {
        let Some(forward) = dir.try_normalize() else {
            return Self::IDENTITY;
        };
        let mut left = forward.perpendicular();
        if degrees != 0.0 {
            left = left.rotate_around(forward, degrees);
        }
        let up = forward.cross(left);
        Self([forward, left, up])
    }

    /// Every basis vector multiplied by `scale`.
    #[must_use]
    pub fn scaled(self, scale: f32) -> Self {
        Self([self.0[0] * scale, self.0[1] * scale, self.0[2] * scale])
    }

    /// Forward vector.
    #[must_use]
    pub const fn forward(&self) -> Vec3 {
        self.0[0]
    }
}

impl Default for Axis {
    fn default() -> Self {
        Self::IDENTITY
    }
}
