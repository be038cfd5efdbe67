//! Vectorized kernel for x86 and x86_64
//!
//! | Operation | Baseline (SSE2) | Upgrade |
//! |---|---|---|
//! | add / sub / mul / scale / cross | 128-bit | - |
//! | dot | shuffle + add | SSE3: two `haddps` |
//! | mat_mul | 128-bit row broadcast | AVX+FMA: two rows per 256-bit `vfmadd` |
//! | transform | four SSE2 dots | SSE3: `haddps` tree |
//! | batch add / scale | one Vec4 per step | AVX: two Vec4 per step |

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::{Kernel, KernelPath};
use crate::capability::{self, Capabilities};
use crate::error::{KernelError, Result};
use crate::matrix::Matrix4;
use crate::vector::Vec4;

/// Kernel built on SSE/AVX/FMA intrinsics
///
/// Holds the capability snapshot it was built for and only ever executes
/// instructions that snapshot reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VectorKernel {
    caps: Capabilities,
}

impl VectorKernel {
    /// Build a kernel limited to the `requested` extensions
    ///
    /// The request is intersected with what the processor actually reports,
    /// so sub-paths can be switched off (for testing the SSE2 baseline on an
    /// AVX machine) but never switched on. Fails when SSE2 is unavailable.
    pub fn new(requested: Capabilities) -> Result<Self> {
        let caps = requested.intersect(capability::capabilities());
        if !caps.supports_vectorized() {
            return Err(KernelError::Unsupported(KernelPath::Vectorized));
        }
        Ok(Self { caps })
    }

    /// Build a kernel using every detected extension
    pub fn detect() -> Result<Self> {
        Self::new(*capability::capabilities())
    }

    /// Extensions this kernel uses
    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }
}

// Safety: every `unsafe` call below targets an extension that `self.caps`
// reports, and `new` only keeps extensions the processor has. Loads and
// stores go through `&Vec4` / `&Matrix4`, whose types guarantee 16-byte
// (rows) alignment; 256-bit stores into a `Matrix4` start at row 0 or 2,
// which the type's 64-byte alignment places on 32-byte boundaries.
impl Kernel for VectorKernel {
    fn path(&self) -> KernelPath {
        KernelPath::Vectorized
    }

    #[inline]
    fn sqrt(&self, x: f32) -> f32 {
        unsafe { sqrt_sse2(x) }
    }

    #[inline]
    fn add(&self, a: &Vec4, b: &Vec4) -> Vec4 {
        unsafe { add_sse2(a, b) }
    }

    #[inline]
    fn sub(&self, a: &Vec4, b: &Vec4) -> Vec4 {
        unsafe { sub_sse2(a, b) }
    }

    #[inline]
    fn mul(&self, a: &Vec4, b: &Vec4) -> Vec4 {
        unsafe { mul_sse2(a, b) }
    }

    #[inline]
    fn scale(&self, v: &Vec4, s: f32) -> Vec4 {
        unsafe { scale_sse2(v, s) }
    }

    #[inline]
    fn dot(&self, a: &Vec4, b: &Vec4) -> f32 {
        unsafe {
            if self.caps.sse3 {
                dot_sse3(a, b)
            } else {
                dot_sse2(a, b)
            }
        }
    }

    #[inline]
    fn cross(&self, a: &Vec4, b: &Vec4) -> Vec4 {
        unsafe { cross_sse2(a, b) }
    }

    fn mat_mul(&self, a: &Matrix4, b: &Matrix4) -> Matrix4 {
        unsafe {
            if self.caps.supports_wide_fma() {
                mat_mul_avx_fma(a, b)
            } else {
                mat_mul_sse2(a, b)
            }
        }
    }

    fn transform(&self, m: &Matrix4, v: &Vec4) -> Vec4 {
        unsafe {
            if self.caps.sse3 {
                transform_sse3(m, v)
            } else {
                Vec4::new(
                    dot_sse2(&m.rows[0], v),
                    dot_sse2(&m.rows[1], v),
                    dot_sse2(&m.rows[2], v),
                    dot_sse2(&m.rows[3], v),
                )
            }
        }
    }

    fn batch_add(&self, a: &[Vec4], b: &[Vec4], result: &mut [Vec4]) {
        unsafe {
            if self.caps.avx {
                batch_add_avx(a, b, result);
            } else {
                for ((out, a), b) in result.iter_mut().zip(a).zip(b) {
                    *out = add_sse2(a, b);
                }
            }
        }
    }

    fn batch_scale(&self, input: &[Vec4], s: f32, result: &mut [Vec4]) {
        unsafe {
            if self.caps.avx {
                batch_scale_avx(input, s, result);
            } else {
                for (out, v) in result.iter_mut().zip(input) {
                    *out = scale_sse2(v, s);
                }
            }
        }
    }
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn load(v: &Vec4) -> __m128 {
    _mm_load_ps(v as *const Vec4 as *const f32)
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn store(r: __m128) -> Vec4 {
    let mut out = Vec4::ZERO;
    _mm_store_ps(&mut out as *mut Vec4 as *mut f32, r);
    out
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn sqrt_sse2(x: f32) -> f32 {
    _mm_cvtss_f32(_mm_sqrt_ss(_mm_set_ss(x)))
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn add_sse2(a: &Vec4, b: &Vec4) -> Vec4 {
    store(_mm_add_ps(load(a), load(b)))
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn sub_sse2(a: &Vec4, b: &Vec4) -> Vec4 {
    store(_mm_sub_ps(load(a), load(b)))
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn mul_sse2(a: &Vec4, b: &Vec4) -> Vec4 {
    store(_mm_mul_ps(load(a), load(b)))
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn scale_sse2(v: &Vec4, s: f32) -> Vec4 {
    store(_mm_mul_ps(load(v), _mm_set1_ps(s)))
}

#[inline]
#[target_feature(enable = "sse3")]
unsafe fn dot_sse3(a: &Vec4, b: &Vec4) -> f32 {
    let products = _mm_mul_ps(load(a), load(b));
    let pairs = _mm_hadd_ps(products, products);
    _mm_cvtss_f32(_mm_hadd_ps(pairs, pairs))
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn dot_sse2(a: &Vec4, b: &Vec4) -> f32 {
    let products = _mm_mul_ps(load(a), load(b));
    // (y, x, w, z)
    let swapped = _mm_shuffle_ps(products, products, 0b10_11_00_01);
    let sums = _mm_add_ps(products, swapped);
    let high = _mm_movehl_ps(sums, sums);
    _mm_cvtss_f32(_mm_add_ss(sums, high))
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn cross_sse2(a: &Vec4, b: &Vec4) -> Vec4 {
    let (a, b) = (load(a), load(b));
    // (y, z, x, w) and (z, x, y, w)
    let a_yzx = _mm_shuffle_ps(a, a, 0b11_00_10_01);
    let b_yzx = _mm_shuffle_ps(b, b, 0b11_00_10_01);
    let a_zxy = _mm_shuffle_ps(a, a, 0b11_01_00_10);
    let b_zxy = _mm_shuffle_ps(b, b, 0b11_01_00_10);

    let mut out = store(_mm_sub_ps(_mm_mul_ps(a_yzx, b_zxy), _mm_mul_ps(a_zxy, b_yzx)));
    out.w = 0.0;
    out
}

#[target_feature(enable = "sse2")]
unsafe fn mat_mul_sse2(a: &Matrix4, b: &Matrix4) -> Matrix4 {
    let b_rows = [load(&b.rows[0]), load(&b.rows[1]), load(&b.rows[2]), load(&b.rows[3])];
    let mut out = Matrix4::ZERO;

    for (row, a_row) in out.rows.iter_mut().zip(&a.rows) {
        let mut acc = _mm_mul_ps(_mm_set1_ps(a_row.x), b_rows[0]);
        acc = _mm_add_ps(acc, _mm_mul_ps(_mm_set1_ps(a_row.y), b_rows[1]));
        acc = _mm_add_ps(acc, _mm_mul_ps(_mm_set1_ps(a_row.z), b_rows[2]));
        acc = _mm_add_ps(acc, _mm_mul_ps(_mm_set1_ps(a_row.w), b_rows[3]));
        *row = store(acc);
    }
    out
}

/// `upper` in the low 128 bits, `lower` in the high 128 bits
#[inline]
#[target_feature(enable = "avx")]
unsafe fn splat_pair(upper: f32, lower: f32) -> __m256 {
    _mm256_setr_m128(_mm_set1_ps(upper), _mm_set1_ps(lower))
}

#[target_feature(enable = "avx,fma")]
unsafe fn mat_mul_avx_fma(a: &Matrix4, b: &Matrix4) -> Matrix4 {
    // Each row of `b` duplicated into both halves
    let mut b_rows = [_mm256_setzero_ps(); 4];
    for (wide, row) in b_rows.iter_mut().zip(&b.rows) {
        *wide = _mm256_broadcast_ps(&*(row as *const Vec4 as *const __m128));
    }

    let mut out = Matrix4::ZERO;
    for pair in 0..2 {
        let upper = a.rows[2 * pair].to_array();
        let lower = a.rows[2 * pair + 1].to_array();

        let mut acc = _mm256_mul_ps(splat_pair(upper[0], lower[0]), b_rows[0]);
        for k in 1..4 {
            acc = _mm256_fmadd_ps(splat_pair(upper[k], lower[k]), b_rows[k], acc);
        }
        _mm256_store_ps(out.rows.as_mut_ptr().add(2 * pair) as *mut f32, acc);
    }
    out
}

#[inline]
#[target_feature(enable = "sse3")]
unsafe fn transform_sse3(m: &Matrix4, v: &Vec4) -> Vec4 {
    let v = load(v);
    let r0 = _mm_mul_ps(load(&m.rows[0]), v);
    let r1 = _mm_mul_ps(load(&m.rows[1]), v);
    let r2 = _mm_mul_ps(load(&m.rows[2]), v);
    let r3 = _mm_mul_ps(load(&m.rows[3]), v);
    store(_mm_hadd_ps(_mm_hadd_ps(r0, r1), _mm_hadd_ps(r2, r3)))
}

/// Two Vec4 per 256-bit step; an odd trailing element takes the 128-bit path.
/// Slices of `Vec4` are only 16-byte aligned, hence unaligned 256-bit loads.
#[target_feature(enable = "avx")]
unsafe fn batch_add_avx(a: &[Vec4], b: &[Vec4], result: &mut [Vec4]) {
    let n = result.len().min(a.len()).min(b.len());
    let wide = n - n % 2;

    let a_lanes: &[f32] = bytemuck::cast_slice(&a[..wide]);
    let b_lanes: &[f32] = bytemuck::cast_slice(&b[..wide]);
    let out_lanes: &mut [f32] = bytemuck::cast_slice_mut(&mut result[..wide]);
    for ((out, a), b) in out_lanes
        .chunks_exact_mut(8)
        .zip(a_lanes.chunks_exact(8))
        .zip(b_lanes.chunks_exact(8))
    {
        let sum = _mm256_add_ps(_mm256_loadu_ps(a.as_ptr()), _mm256_loadu_ps(b.as_ptr()));
        _mm256_storeu_ps(out.as_mut_ptr(), sum);
    }

    if wide < n {
        result[wide] = add_sse2(&a[wide], &b[wide]);
    }
}

#[target_feature(enable = "avx")]
unsafe fn batch_scale_avx(input: &[Vec4], s: f32, result: &mut [Vec4]) {
    let n = result.len().min(input.len());
    let wide = n - n % 2;
    let factor = _mm256_set1_ps(s);

    let in_lanes: &[f32] = bytemuck::cast_slice(&input[..wide]);
    let out_lanes: &mut [f32] = bytemuck::cast_slice_mut(&mut result[..wide]);
    for (out, v) in out_lanes.chunks_exact_mut(8).zip(in_lanes.chunks_exact(8)) {
        _mm256_storeu_ps(out.as_mut_ptr(), _mm256_mul_ps(_mm256_loadu_ps(v.as_ptr()), factor));
    }

    if wide < n {
        result[wide] = scale_sse2(&input[wide], s);
    }
}
