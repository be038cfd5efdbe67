//! Error types for the math kernel
//!
//! The arithmetic itself never fails. Errors only cover the checked
//! preconditions around it: batch buffer extents and kernel selection.

use thiserror::Error;

use crate::kernel::KernelPath;

/// Kernel errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    /// A batch buffer holds fewer elements than the requested count
    #[error("Buffer '{buffer}' too small: need {required} elements, found {actual}")]
    BufferTooSmall {
        buffer: &'static str,
        required: usize,
        actual: usize,
    },

    /// The requested execution path is not available on this processor
    #[error("Kernel path not supported on this processor: {0}")]
    Unsupported(KernelPath),

    /// A different kernel was already selected for this process
    #[error("Kernel already initialized with {active} path, cannot switch to {requested}")]
    AlreadyInitialized {
        active: KernelPath,
        requested: KernelPath,
    },

    /// Invalid kernel configuration
    #[error("Invalid kernel configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for kernel operations
pub type Result<T> = std::result::Result<T, KernelError>;

impl KernelError {
    /// Check that `buffer` can hold `required` elements
    pub(crate) fn check_extent(buffer: &'static str, required: usize, actual: usize) -> Result<()> {
        if actual < required {
            Err(KernelError::BufferTooSmall { buffer, required, actual })
        } else {
            Ok(())
        }
    }
}
