//! Vector types dispatched through the active kernel
//!
//! `Vec4` and `Vec3` run on [`kernel::active`]: `Vec3` occupies the first
//! three lanes of a 16-byte register with a zero pad lane. `Vec2` is too
//! narrow to gain from a vector register and always uses scalar arithmetic.
//!
//! `length` goes through [`fast_sqrt`], so on the portable path it carries
//! the approximation error of the bit-level square root.

use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::consts::EPSILON;
use crate::fast::fast_sqrt;
use crate::kernel;

/// 2D vector
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[repr(C, align(8))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0);
    pub const X: Self = Self::new(1.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn splat(v: f32) -> Self {
        Self::new(v, v)
    }

    #[inline]
    pub fn scale(self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s)
    }

    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        fast_sqrt(self.length_squared())
    }

    /// Unit vector, or zero when the length is at most 1e-6
    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len > EPSILON {
            self.scale(1.0 / len)
        } else {
            Self::ZERO
        }
    }

    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self).scale(t)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

/// 3D vector, padded to a full 16-byte lane group
///
/// The fourth lane is hidden and always written as zero. It is ignored by
/// comparisons and by every operation, even if a `Pod` cast put something
/// else there.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[repr(C, align(16))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[serde(skip)]
    _pad: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);
    pub const NEG_X: Self = Self::new(-1.0, 0.0, 0.0);
    pub const NEG_Y: Self = Self::new(0.0, -1.0, 0.0);
    pub const NEG_Z: Self = Self::new(0.0, 0.0, -1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, _pad: 0.0 }
    }

    #[inline]
    pub fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// The four-lane form the kernel operates on
    #[inline]
    fn lanes(self) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, 0.0)
    }

    #[inline]
    fn from_lanes(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    #[inline]
    pub fn scale(self, s: f32) -> Self {
        Self::from_lanes(kernel::active().scale(&self.lanes(), s))
    }

    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        kernel::active().dot(&self.lanes(), &other.lanes())
    }

    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self::from_lanes(kernel::active().cross(&self.lanes(), &other.lanes()))
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        fast_sqrt(self.length_squared())
    }

    /// Unit vector, or zero when the length is at most 1e-6
    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len > EPSILON {
            self.scale(1.0 / len)
        } else {
            Self::ZERO
        }
    }

    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    /// Spherical interpolation between two unit directions
    ///
    /// Walks the great arc from `self` towards `other`. Antiparallel inputs
    /// have no unique arc; the result then stays on the `self` axis.
    pub fn slerp(self, other: Self, t: f32) -> Self {
        let cos_angle = self.dot(other).clamp(-1.0, 1.0);
        let (sin, cos) = (cos_angle.acos() * t).sin_cos();
        let relative = (other - self * cos_angle).normalize();
        self * cos + relative * sin
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn extend(self, w: f32) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, w)
    }
}

impl PartialEq for Vec3 {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z
    }
}

/// 4D vector - homogeneous coordinates or a raw lane group
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[repr(C, align(16))]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0, 0.0);
    pub const W: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v, v)
    }

    #[inline]
    pub const fn from_array(a: [f32; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }

    #[inline]
    pub fn scale(self, s: f32) -> Self {
        kernel::active().scale(&self, s)
    }

    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        kernel::active().dot(&self, &other)
    }

    /// Cross product of the xyz parts; w of the result is zero
    #[inline]
    pub fn cross(self, other: Self) -> Self {
        kernel::active().cross(&self, &other)
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        fast_sqrt(self.length_squared())
    }

    /// Unit vector, or zero when the length is at most 1e-6
    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len > EPSILON {
            self.scale(1.0 / len)
        } else {
            Self::ZERO
        }
    }

    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    #[inline]
    pub fn truncate(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

// Safety: all three are `repr(C)` runs of `f32` whose size equals their
// alignment multiple (8, 16, 16 bytes), so there are no padding bytes and
// every bit pattern is a valid value.
unsafe impl Zeroable for Vec2 {}
unsafe impl Pod for Vec2 {}
unsafe impl Zeroable for Vec3 {}
unsafe impl Pod for Vec3 {}
unsafe impl Zeroable for Vec4 {}
unsafe impl Pod for Vec4 {}

// Operator implementations for Vec2
impl Add for Vec2 {
    type Output = Self;
    #[inline] fn add(self, rhs: Self) -> Self { Self::new(self.x + rhs.x, self.y + rhs.y) }
}
impl Sub for Vec2 {
    type Output = Self;
    #[inline] fn sub(self, rhs: Self) -> Self { Self::new(self.x - rhs.x, self.y - rhs.y) }
}
impl Mul for Vec2 {
    type Output = Self;
    #[inline] fn mul(self, rhs: Self) -> Self { Self::new(self.x * rhs.x, self.y * rhs.y) }
}
impl Mul<f32> for Vec2 {
    type Output = Self;
    #[inline] fn mul(self, rhs: f32) -> Self { self.scale(rhs) }
}
impl Neg for Vec2 {
    type Output = Self;
    #[inline] fn neg(self) -> Self { Self::new(-self.x, -self.y) }
}

// Operator implementations for Vec3
impl Add for Vec3 {
    type Output = Self;
    #[inline] fn add(self, rhs: Self) -> Self { Self::from_lanes(kernel::active().add(&self.lanes(), &rhs.lanes())) }
}
impl Sub for Vec3 {
    type Output = Self;
    #[inline] fn sub(self, rhs: Self) -> Self { Self::from_lanes(kernel::active().sub(&self.lanes(), &rhs.lanes())) }
}
impl Mul for Vec3 {
    type Output = Self;
    #[inline] fn mul(self, rhs: Self) -> Self { Self::from_lanes(kernel::active().mul(&self.lanes(), &rhs.lanes())) }
}
impl Mul<f32> for Vec3 {
    type Output = Self;
    #[inline] fn mul(self, rhs: f32) -> Self { self.scale(rhs) }
}
impl Mul<Vec3> for f32 {
    type Output = Vec3;
    #[inline] fn mul(self, rhs: Vec3) -> Vec3 { rhs.scale(self) }
}
impl Neg for Vec3 {
    type Output = Self;
    #[inline] fn neg(self) -> Self { Self::new(-self.x, -self.y, -self.z) }
}
impl AddAssign for Vec3 {
    #[inline] fn add_assign(&mut self, rhs: Self) { *self = *self + rhs; }
}
impl SubAssign for Vec3 {
    #[inline] fn sub_assign(&mut self, rhs: Self) { *self = *self - rhs; }
}
impl MulAssign<f32> for Vec3 {
    #[inline] fn mul_assign(&mut self, rhs: f32) { *self = *self * rhs; }
}

// Operator implementations for Vec4
impl Add for Vec4 {
    type Output = Self;
    #[inline] fn add(self, rhs: Self) -> Self { kernel::active().add(&self, &rhs) }
}
impl Sub for Vec4 {
    type Output = Self;
    #[inline] fn sub(self, rhs: Self) -> Self { kernel::active().sub(&self, &rhs) }
}
impl Mul for Vec4 {
    type Output = Self;
    #[inline] fn mul(self, rhs: Self) -> Self { kernel::active().mul(&self, &rhs) }
}
impl Mul<f32> for Vec4 {
    type Output = Self;
    #[inline] fn mul(self, rhs: f32) -> Self { self.scale(rhs) }
}
impl Neg for Vec4 {
    type Output = Self;
    #[inline] fn neg(self) -> Self { Self::new(-self.x, -self.y, -self.z, -self.w) }
}
impl AddAssign for Vec4 {
    #[inline] fn add_assign(&mut self, rhs: Self) { *self = *self + rhs; }
}
impl SubAssign for Vec4 {
    #[inline] fn sub_assign(&mut self, rhs: Self) { *self = *self - rhs; }
}
impl MulAssign<f32> for Vec4 {
    #[inline] fn mul_assign(&mut self, rhs: f32) { *self = *self * rhs; }
}
