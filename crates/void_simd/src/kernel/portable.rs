//! Portable scalar kernel

use super::{Kernel, KernelPath};
use crate::fast::approx_sqrt;
use crate::matrix::Matrix4;
use crate::vector::Vec4;

/// Per-component scalar arithmetic, available on every target
///
/// Square roots use the bit-level approximation since no hardware
/// instruction is assumed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PortableKernel;

impl Kernel for PortableKernel {
    fn path(&self) -> KernelPath {
        KernelPath::Portable
    }

    #[inline]
    fn sqrt(&self, x: f32) -> f32 {
        approx_sqrt(x)
    }

    #[inline]
    fn add(&self, a: &Vec4, b: &Vec4) -> Vec4 {
        Vec4::new(a.x + b.x, a.y + b.y, a.z + b.z, a.w + b.w)
    }

    #[inline]
    fn sub(&self, a: &Vec4, b: &Vec4) -> Vec4 {
        Vec4::new(a.x - b.x, a.y - b.y, a.z - b.z, a.w - b.w)
    }

    #[inline]
    fn mul(&self, a: &Vec4, b: &Vec4) -> Vec4 {
        Vec4::new(a.x * b.x, a.y * b.y, a.z * b.z, a.w * b.w)
    }

    #[inline]
    fn scale(&self, v: &Vec4, s: f32) -> Vec4 {
        Vec4::new(v.x * s, v.y * s, v.z * s, v.w * s)
    }

    #[inline]
    fn dot(&self, a: &Vec4, b: &Vec4) -> f32 {
        a.x * b.x + a.y * b.y + a.z * b.z + a.w * b.w
    }

    #[inline]
    fn cross(&self, a: &Vec4, b: &Vec4) -> Vec4 {
        Vec4::new(
            a.y * b.z - a.z * b.y,
            a.z * b.x - a.x * b.z,
            a.x * b.y - a.y * b.x,
            0.0,
        )
    }

    fn mat_mul(&self, a: &Matrix4, b: &Matrix4) -> Matrix4 {
        let a = a.to_rows();
        let b = b.to_rows();
        let mut out = [[0.0f32; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                out[i][j] = a[i][0] * b[0][j]
                    + a[i][1] * b[1][j]
                    + a[i][2] * b[2][j]
                    + a[i][3] * b[3][j];
            }
        }
        Matrix4::from_rows(out)
    }

    fn transform(&self, m: &Matrix4, v: &Vec4) -> Vec4 {
        Vec4::new(
            self.dot(&m.rows[0], v),
            self.dot(&m.rows[1], v),
            self.dot(&m.rows[2], v),
            self.dot(&m.rows[3], v),
        )
    }

    fn batch_add(&self, a: &[Vec4], b: &[Vec4], result: &mut [Vec4]) {
        for ((out, a), b) in result.iter_mut().zip(a).zip(b) {
            *out = self.add(a, b);
        }
    }

    fn batch_scale(&self, input: &[Vec4], s: f32, result: &mut [Vec4]) {
        for (out, v) in result.iter_mut().zip(input) {
            *out = self.scale(v, s);
        }
    }
}
