//! Execution kernels and process-wide kernel selection
//!
//! Every operation that has a vectorized form goes through the [`Kernel`]
//! trait. Two implementations exist:
//!
//! - [`PortableKernel`]: plain per-component arithmetic, runs anywhere.
//! - [`VectorKernel`]: SSE/AVX/FMA intrinsics on x86 and x86_64, built with
//!   the `simd` feature.
//!
//! The kernel used by the vector and matrix types is chosen once, on first
//! use, from [`KernelConfig::from_env`] and the cached [`capabilities`].
//! Both kernels can still be constructed directly, which is how the tests
//! compare them inside one binary.
//!
//! # Alignment
//!
//! The vectorized kernel loads [`Vec4`] and [`Matrix4`] rows with aligned
//! 128-bit loads. The types carry the alignment themselves
//! (`#[repr(C, align(16))]` and `align(64)`), so any reference or slice of
//! them already satisfies it; the kernel never re-checks.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::capability::{capabilities, Capabilities};
use crate::config::{KernelConfig, PathPreference};
use crate::error::{KernelError, Result};
use crate::matrix::Matrix4;
use crate::vector::Vec4;

mod portable;
#[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64")))]
mod x86;

pub use portable::PortableKernel;
#[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64")))]
pub use x86::VectorKernel;

static ACTIVE: OnceLock<Box<dyn Kernel>> = OnceLock::new();

/// Which execution path a kernel implements
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelPath {
    /// Per-component scalar arithmetic
    Portable,
    /// Wide hardware instructions
    Vectorized,
}

impl fmt::Display for KernelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelPath::Portable => write!(f, "portable"),
            KernelPath::Vectorized => write!(f, "vectorized"),
        }
    }
}

/// The operations with a vectorized form
///
/// Implementations must agree with each other up to floating-point
/// rounding. Batch methods process `min(len)` elements of their slices;
/// the callers in [`crate::batch`] check extents beforehand.
pub trait Kernel: Send + Sync + fmt::Debug {
    /// Execution path of this kernel
    fn path(&self) -> KernelPath;

    fn sqrt(&self, x: f32) -> f32;

    fn add(&self, a: &Vec4, b: &Vec4) -> Vec4;
    fn sub(&self, a: &Vec4, b: &Vec4) -> Vec4;
    /// Elementwise product
    fn mul(&self, a: &Vec4, b: &Vec4) -> Vec4;
    fn scale(&self, v: &Vec4, s: f32) -> Vec4;
    fn dot(&self, a: &Vec4, b: &Vec4) -> f32;
    /// Cross product of the xyz parts; w of the result is zero
    fn cross(&self, a: &Vec4, b: &Vec4) -> Vec4;

    /// `a · b`, row by column
    fn mat_mul(&self, a: &Matrix4, b: &Matrix4) -> Matrix4;
    /// `m · v` with `v` as a column vector
    fn transform(&self, m: &Matrix4, v: &Vec4) -> Vec4;

    fn batch_add(&self, a: &[Vec4], b: &[Vec4], result: &mut [Vec4]);
    fn batch_scale(&self, input: &[Vec4], s: f32, result: &mut [Vec4]);
}

/// Build the kernel a configuration asks for on the given hardware
pub fn select(config: &KernelConfig, caps: &Capabilities) -> Result<Box<dyn Kernel>> {
    match config.path {
        PathPreference::Portable => Ok(Box::new(PortableKernel)),
        PathPreference::Vectorized => vectorized(caps),
        PathPreference::Auto => {
            Ok(vectorized(caps).unwrap_or_else(|_| Box::new(PortableKernel) as Box<dyn Kernel>))
        }
    }
}

#[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64")))]
fn vectorized(caps: &Capabilities) -> Result<Box<dyn Kernel>> {
    Ok(Box::new(VectorKernel::new(*caps)?))
}

#[cfg(not(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64"))))]
fn vectorized(_caps: &Capabilities) -> Result<Box<dyn Kernel>> {
    Err(KernelError::Unsupported(KernelPath::Vectorized))
}

/// Select the process-wide kernel explicitly
///
/// Must run before the first math operation to take effect. Calling it
/// again with a configuration that resolves to the same path is a no-op;
/// a different path fails with [`KernelError::AlreadyInitialized`].
pub fn init(config: &KernelConfig) -> Result<&'static dyn Kernel> {
    let candidate = select(config, capabilities())?;
    let requested = candidate.path();
    let kernel = ACTIVE.get_or_init(move || {
        log::info!("Selected {} math kernel (capabilities: {})", requested, capabilities());
        candidate
    });

    if kernel.path() != requested {
        return Err(KernelError::AlreadyInitialized {
            active: kernel.path(),
            requested,
        });
    }
    Ok(kernel.as_ref())
}

/// The process-wide kernel, selected from the environment on first use
pub fn active() -> &'static dyn Kernel {
    ACTIVE.get_or_init(select_from_env).as_ref()
}

fn select_from_env() -> Box<dyn Kernel> {
    let config = KernelConfig::from_env().unwrap_or_else(|e| {
        log::warn!("{}; using automatic kernel selection", e);
        KernelConfig::default()
    });

    let kernel = select(&config, capabilities()).unwrap_or_else(|e| {
        log::warn!("{}; falling back to the portable kernel", e);
        Box::new(PortableKernel) as Box<dyn Kernel>
    });
    log::info!("Selected {} math kernel (capabilities: {})", kernel.path(), capabilities());
    kernel
}
