//! Bit-level reinterpretation between `f32` and `u32`
//!
//! The fast square root tricks need to treat a float's IEEE-754 pattern as an
//! integer. All of that goes through these two functions.

/// Reinterpret the bits of `x` as an unsigned integer
#[inline]
pub fn f32_to_bits(x: f32) -> u32 {
    bytemuck::cast(x)
}

/// Reinterpret an unsigned integer as the float with that bit pattern
#[inline]
pub fn f32_from_bits(bits: u32) -> f32 {
    bytemuck::cast(bits)
}
