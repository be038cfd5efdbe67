//! Fast approximate math
//!
//! These trade accuracy for speed against the standard library. None of
//! them report errors: out-of-domain input gives a defined (if meaningless)
//! number, never a trap.
//!
//! | Function | Method | Accuracy |
//! |---|---|---|
//! | [`fast_sqrt`] | hardware instruction, or [`approx_sqrt`] on the portable path | exact / ~0.2% |
//! | [`fast_inv_sqrt`] | bit guess + two Newton-Raphson steps | ~5e-6 relative |
//! | [`fast_sin`], [`fast_cos`] | range reduction + Taylor polynomial | ~2e-4 absolute |

use crate::bits::{f32_from_bits, f32_to_bits};
use crate::consts::{FRAC_PI_2, PI, TAU};
use crate::kernel;

/// Magic constant for the initial inverse square root guess
pub const INV_SQRT_MAGIC: u32 = 0x5f37_59df;

/// Initial guess for `1 / sqrt(x)` from the float's bit pattern
#[inline]
fn inv_sqrt_guess(x: f32) -> f32 {
    // Wrapping: negative inputs are out of contract but must not trap
    f32_from_bits(INV_SQRT_MAGIC.wrapping_sub(f32_to_bits(x) >> 1))
}

/// One Newton-Raphson refinement of `y ≈ 1 / sqrt(x)`
#[inline]
fn newton_step(x: f32, y: f32) -> f32 {
    y * (1.5 - 0.5 * x * y * y)
}

/// Square root on the active kernel's path
///
/// The vectorized kernel uses the processor's square-root instruction
/// (full precision). The portable kernel uses [`approx_sqrt`].
#[inline]
pub fn fast_sqrt(x: f32) -> f32 {
    kernel::active().sqrt(x)
}

/// Square root through the processor's square-root instruction
#[inline]
pub fn hardware_sqrt(x: f32) -> f32 {
    x.sqrt()
}

/// Bit-level square root: initial guess plus one Newton-Raphson step
///
/// Relative error stays below about 0.2% for positive normal inputs.
/// `approx_sqrt(0.0)` is exactly `0.0`.
#[inline]
pub fn approx_sqrt(x: f32) -> f32 {
    x * newton_step(x, inv_sqrt_guess(x))
}

/// Fast inverse square root with two Newton-Raphson steps
///
/// Undefined for `x <= 0`: the result is some number, not an error.
#[inline]
pub fn fast_inv_sqrt(x: f32) -> f32 {
    let y = inv_sqrt_guess(x);
    let y = newton_step(x, y);
    newton_step(x, y)
}

/// Approximate sine
///
/// The input is reduced into `[-π, π)`, folded into `[-π/2, π/2]` by
/// `sin(x) = sin(π - x)`, and evaluated with a Taylor polynomial through
/// the x⁷ term. Not library precision: error grows towards ±π/2 and with
/// the magnitude of the unreduced input.
#[inline]
pub fn fast_sin(x: f32) -> f32 {
    let mut x = (x + PI).rem_euclid(TAU) - PI;
    if x > FRAC_PI_2 {
        x = PI - x;
    } else if x < -FRAC_PI_2 {
        x = -PI - x;
    }

    let x2 = x * x;
    x * (1.0 - x2 / 6.0 * (1.0 - x2 / 20.0 * (1.0 - x2 / 42.0)))
}

/// Approximate cosine, `fast_sin(x + π/2)`
#[inline]
pub fn fast_cos(x: f32) -> f32 {
    fast_sin(x + FRAC_PI_2)
}
