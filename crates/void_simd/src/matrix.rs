//! 4x4 row-major matrix
//!
//! Vectors are columns: `transform_vec4(m, v)` computes `m · v`, and
//! `a.multiply(&b)` applies `b` first when the product transforms a vector.
//! Translation lives in the last column (`rows[i].w`).

use core::ops::{Mul, MulAssign};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::fast::{fast_cos, fast_sin};
use crate::kernel;
use crate::vector::{Vec3, Vec4};

/// Determinants at or below this magnitude are treated as singular
pub const SINGULAR_EPSILON: f32 = 1e-8;

/// 4x4 matrix (row-major) - the main transformation matrix
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[repr(C, align(64))]
pub struct Matrix4 {
    pub rows: [Vec4; 4],
}

// Safety: four `Vec4` rows fill the 64 bytes exactly, no padding.
unsafe impl Zeroable for Matrix4 {}
unsafe impl Pod for Matrix4 {}

impl Matrix4 {
    pub const IDENTITY: Self = Self {
        rows: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    pub const ZERO: Self = Self {
        rows: [Vec4::ZERO, Vec4::ZERO, Vec4::ZERO, Vec4::ZERO],
    };

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    #[inline]
    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self {
            rows: [
                Vec4::from_array(rows[0]),
                Vec4::from_array(rows[1]),
                Vec4::from_array(rows[2]),
                Vec4::from_array(rows[3]),
            ],
        }
    }

    #[inline]
    pub fn to_rows(&self) -> [[f32; 4]; 4] {
        [
            self.rows[0].to_array(),
            self.rows[1].to_array(),
            self.rows[2].to_array(),
            self.rows[3].to_array(),
        ]
    }

    /// Row `i`
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    pub fn row(&self, i: usize) -> Vec4 {
        self.rows[i]
    }

    /// Element at row `i`, column `j`
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4` or `j >= 4`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.rows[i].to_array()[j]
    }

    /// Column `j`
    ///
    /// # Panics
    ///
    /// Panics if `j >= 4`.
    #[inline]
    pub fn column(&self, j: usize) -> Vec4 {
        Vec4::new(self.get(0, j), self.get(1, j), self.get(2, j), self.get(3, j))
    }

    /// `self · other`
    #[inline]
    pub fn multiply(&self, other: &Self) -> Self {
        kernel::active().mat_mul(self, other)
    }

    #[inline]
    pub fn transpose(&self) -> Self {
        Self {
            rows: [self.column(0), self.column(1), self.column(2), self.column(3)],
        }
    }

    /// `self · v`
    #[inline]
    pub fn transform_vec4(&self, v: Vec4) -> Vec4 {
        kernel::active().transform(self, &v)
    }

    /// Transform a point: lift to `w = 1`, transform, drop `w`
    ///
    /// No perspective divide; use [`transform_vec4`](Self::transform_vec4)
    /// for projective matrices.
    #[inline]
    pub fn transform_vec3(&self, point: Vec3) -> Vec3 {
        self.transform_vec4(point.extend(1.0)).truncate()
    }

    /// Transform a direction (`w = 0`), ignoring translation
    #[inline]
    pub fn transform_direction(&self, direction: Vec3) -> Vec3 {
        self.transform_vec4(direction.extend(0.0)).truncate()
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        Self::from_rows([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about X by `angle` radians (fast sine/cosine)
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = (fast_sin(angle), fast_cos(angle));
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about Y by `angle` radians (fast sine/cosine)
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = (fast_sin(angle), fast_cos(angle));
        Self::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about Z by `angle` radians (fast sine/cosine)
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = (fast_sin(angle), fast_cos(angle));
        Self::from_rows([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// `Rz · Ry · Rx`: rotates about X first, then Y, then Z
    pub fn rotation_euler(x: f32, y: f32, z: f32) -> Self {
        Self::rotation_z(z)
            .multiply(&Self::rotation_y(y))
            .multiply(&Self::rotation_x(x))
    }

    /// Right-handed perspective projection, OpenGL clip depth [-1, 1]
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y / 2.0).tan();
        let nf = 1.0 / (near - far);

        Self::from_rows([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, (far + near) * nf, 2.0 * far * near * nf],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    /// Right-handed orthographic projection, OpenGL clip depth [-1, 1]
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let rml = right - left;
        let tmb = top - bottom;
        let fmn = far - near;

        Self::from_rows([
            [2.0 / rml, 0.0, 0.0, -(right + left) / rml],
            [0.0, 2.0 / tmb, 0.0, -(top + bottom) / tmb],
            [0.0, 0.0, -2.0 / fmn, -(far + near) / fmn],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed view matrix looking from `eye` towards `center`
    pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        let forward = (center - eye).normalize();
        let right = forward.cross(up).normalize();
        let up = right.cross(forward);

        Self::from_rows([
            [right.x, right.y, right.z, -right.dot(eye)],
            [up.x, up.y, up.z, -up.dot(eye)],
            [-forward.x, -forward.y, -forward.z, forward.dot(eye)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// 2x2 sub-determinants of the top and bottom row pairs
    fn minors(&self) -> ([f32; 6], [f32; 6]) {
        let [a, b, c, d] = self.rows;
        let s = [
            a.x * b.y - b.x * a.y,
            a.x * b.z - b.x * a.z,
            a.x * b.w - b.x * a.w,
            a.y * b.z - b.y * a.z,
            a.y * b.w - b.y * a.w,
            a.z * b.w - b.z * a.w,
        ];
        let k = [
            c.x * d.y - d.x * c.y,
            c.x * d.z - d.x * c.z,
            c.x * d.w - d.x * c.w,
            c.y * d.z - d.y * c.z,
            c.y * d.w - d.y * c.w,
            c.z * d.w - d.z * c.w,
        ];
        (s, k)
    }

    pub fn determinant(&self) -> f32 {
        let (s, k) = self.minors();
        s[0] * k[5] - s[1] * k[4] + s[2] * k[3] + s[3] * k[2] - s[4] * k[1] + s[5] * k[0]
    }

    /// Inverse by cofactor expansion, `None` when the matrix is singular
    pub fn inverse(&self) -> Option<Self> {
        let [a, b, c, d] = self.rows;
        let (s, k) = self.minors();

        let det = s[0] * k[5] - s[1] * k[4] + s[2] * k[3] + s[3] * k[2] - s[4] * k[1] + s[5] * k[0];
        if det.abs() <= SINGULAR_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        // Inverse of the transpose is the transpose of the inverse, so the
        // cofactor columns computed from rows are rows of the result.
        let rows = [
            [
                (b.y * k[5] - b.z * k[4] + b.w * k[3]) * inv_det,
                (-a.y * k[5] + a.z * k[4] - a.w * k[3]) * inv_det,
                (d.y * s[5] - d.z * s[4] + d.w * s[3]) * inv_det,
                (-c.y * s[5] + c.z * s[4] - c.w * s[3]) * inv_det,
            ],
            [
                (-b.x * k[5] + b.z * k[2] - b.w * k[1]) * inv_det,
                (a.x * k[5] - a.z * k[2] + a.w * k[1]) * inv_det,
                (-d.x * s[5] + d.z * s[2] - d.w * s[1]) * inv_det,
                (c.x * s[5] - c.z * s[2] + c.w * s[1]) * inv_det,
            ],
            [
                (b.x * k[4] - b.y * k[2] + b.w * k[0]) * inv_det,
                (-a.x * k[4] + a.y * k[2] - a.w * k[0]) * inv_det,
                (d.x * s[4] - d.y * s[2] + d.w * s[0]) * inv_det,
                (-c.x * s[4] + c.y * s[2] - c.w * s[0]) * inv_det,
            ],
            [
                (-b.x * k[3] + b.y * k[1] - b.z * k[0]) * inv_det,
                (a.x * k[3] - a.y * k[1] + a.z * k[0]) * inv_det,
                (-d.x * s[3] + d.y * s[1] - d.z * s[0]) * inv_det,
                (c.x * s[3] - c.y * s[1] + c.z * s[0]) * inv_det,
            ],
        ];
        Some(Self::from_rows(rows))
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl Mul<Vec4> for Matrix4 {
    type Output = Vec4;

    #[inline]
    fn mul(self, rhs: Vec4) -> Vec4 {
        self.transform_vec4(rhs)
    }
}

impl MulAssign for Matrix4 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
