//! Batch operations over contiguous vector arrays
//!
//! Each function processes the first `count` elements of its slices and
//! writes every one of the first `count` result elements exactly once.
//! Extents are checked before anything is written; a short slice yields
//! [`KernelError::BufferTooSmall`] and leaves `result` untouched.
//!
//! On the vectorized path with AVX, two [`Vec4`] are processed per 256-bit
//! step and an odd trailing element goes through the 128-bit path.

use crate::error::{KernelError, Result};
use crate::kernel;
use crate::matrix::Matrix4;
use crate::vector::{Vec3, Vec4};

/// `result[i] = a[i] + b[i]` for `i < count`
pub fn array_add(a: &[Vec4], b: &[Vec4], result: &mut [Vec4], count: usize) -> Result<()> {
    KernelError::check_extent("a", count, a.len())?;
    KernelError::check_extent("b", count, b.len())?;
    KernelError::check_extent("result", count, result.len())?;

    kernel::active().batch_add(&a[..count], &b[..count], &mut result[..count]);
    Ok(())
}

/// `result[i] = input[i] * scalar` for `i < count`
pub fn array_scale(input: &[Vec4], scalar: f32, result: &mut [Vec4], count: usize) -> Result<()> {
    KernelError::check_extent("input", count, input.len())?;
    KernelError::check_extent("result", count, result.len())?;

    kernel::active().batch_scale(&input[..count], scalar, &mut result[..count]);
    Ok(())
}

/// `result[i] = m.transform_vec3(input[i])` for `i < count`
pub fn array_transform(m: &Matrix4, input: &[Vec3], result: &mut [Vec3], count: usize) -> Result<()> {
    KernelError::check_extent("input", count, input.len())?;
    KernelError::check_extent("result", count, result.len())?;

    for (out, point) in result[..count].iter_mut().zip(&input[..count]) {
        *out = m.transform_vec3(*point);
    }
    Ok(())
}
