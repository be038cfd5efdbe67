//! # void_simd - Capability-Adaptive SIMD Math Kernel
//!
//! Small fixed-size math for real-time loops: 2/3/4-component vectors, 4x4
//! row-major matrices, batch operations over vector arrays and fast
//! approximations of square root, inverse square root, sine and cosine.
//!
//! Operations with a vectorized form run through a [`Kernel`]. The process
//! picks one on first use: the SSE/AVX/FMA kernel when the processor
//! supports it, the portable scalar kernel otherwise. `VOID_SIMD_PATH`
//! (`auto`, `portable`, `vectorized`) overrides the choice, as does an
//! explicit [`kernel::init`] before the first operation.
//!
//! ```
//! use void_simd::prelude::*;
//!
//! let v = Vec4::new(1.0, 2.0, 3.0, 4.0) + Vec4::new(5.0, 6.0, 7.0, 8.0);
//! assert_eq!(v, Vec4::new(6.0, 8.0, 10.0, 12.0));
//!
//! let m = Matrix4::translation(1.0, 2.0, 3.0);
//! assert_eq!(m.transform_vec3(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));
//! ```

pub mod batch;
pub mod bench;
pub mod bits;
pub mod bounds;
pub mod capability;
pub mod config;
pub mod error;
pub mod fast;
pub mod intersect;
pub mod kernel;
pub mod matrix;
pub mod ray;
pub mod vector;

pub use batch::*;
pub use bits::*;
pub use bounds::*;
pub use capability::*;
pub use config::{KernelConfig, PathPreference};
pub use error::{KernelError, Result};
pub use fast::*;
pub use intersect::*;
pub use kernel::{Kernel, KernelPath, PortableKernel};
#[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64")))]
pub use kernel::VectorKernel;
pub use matrix::*;
pub use ray::*;
pub use vector::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const TAU: f32 = PI * 2.0;
    pub const FRAC_PI_2: f32 = PI / 2.0;
    pub const FRAC_PI_4: f32 = PI / 4.0;
    pub const DEG_TO_RAD: f32 = PI / 180.0;
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
    /// Length below which a vector normalizes to zero
    pub const EPSILON: f32 = 1e-6;
}

/// Convert degrees to radians
#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * consts::DEG_TO_RAD
}

/// Convert radians to degrees
#[inline]
pub fn degrees(radians: f32) -> f32 {
    radians * consts::RAD_TO_DEG
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamp value between min and max
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min { min }
    else if value > max { max }
    else { value }
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::bounds::{Sphere, AABB};
    pub use crate::matrix::Matrix4;
    pub use crate::ray::Ray;
    pub use crate::vector::{Vec2, Vec3, Vec4};
    pub use crate::consts::*;
    pub use crate::fast::{fast_cos, fast_inv_sqrt, fast_sin, fast_sqrt};
    pub use crate::{lerp, clamp, radians, degrees};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_conversion() {
        assert!((radians(180.0) - consts::PI).abs() < 1e-6);
        assert!((degrees(consts::FRAC_PI_2) - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_lerp_and_clamp() {
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-5.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.25, 0.0, 1.0), 0.25);
    }
}
