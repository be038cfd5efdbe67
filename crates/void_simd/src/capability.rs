//! Processor capability detection
//!
//! Capabilities cannot change while the process runs, so the first query
//! detects them and every later query reads the cached snapshot.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

static CAPABILITIES: OnceLock<Capabilities> = OnceLock::new();

/// Instruction-set extensions relevant to the kernel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capabilities {
    pub sse2: bool,
    pub sse3: bool,
    /// SSE4.1
    pub sse4: bool,
    pub avx: bool,
    pub avx2: bool,
    pub fma: bool,
}

impl Capabilities {
    /// A processor with no vector extensions at all
    #[inline]
    pub const fn none() -> Self {
        Self {
            sse2: false,
            sse3: false,
            sse4: false,
            avx: false,
            avx2: false,
            fma: false,
        }
    }

    /// Query the running processor. Uncached; prefer [`capabilities`].
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    pub fn detect() -> Self {
        Self {
            sse2: std::is_x86_feature_detected!("sse2"),
            sse3: std::is_x86_feature_detected!("sse3"),
            sse4: std::is_x86_feature_detected!("sse4.1"),
            avx: std::is_x86_feature_detected!("avx"),
            avx2: std::is_x86_feature_detected!("avx2"),
            fma: std::is_x86_feature_detected!("fma"),
        }
    }

    /// Query the running processor. Uncached; prefer [`capabilities`].
    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    pub fn detect() -> Self {
        Self::none()
    }

    /// True when the vectorized kernel can run at all (128-bit baseline)
    #[inline]
    pub fn supports_vectorized(&self) -> bool {
        self.sse2
    }

    /// True when 256-bit fused multiply-add is usable
    #[inline]
    pub fn supports_wide_fma(&self) -> bool {
        self.avx && self.fma
    }

    /// Extensions present in both snapshots
    pub fn intersect(&self, other: &Capabilities) -> Self {
        Self {
            sse2: self.sse2 && other.sse2,
            sse3: self.sse3 && other.sse3,
            sse4: self.sse4 && other.sse4,
            avx: self.avx && other.avx,
            avx2: self.avx2 && other.avx2,
            fma: self.fma && other.fma,
        }
    }

    /// Names of the detected extensions, e.g. `["sse2", "sse3", "avx"]`
    pub fn summary(&self) -> Vec<&'static str> {
        let flags = [
            (self.sse2, "sse2"),
            (self.sse3, "sse3"),
            (self.sse4, "sse4.1"),
            (self.avx, "avx"),
            (self.avx2, "avx2"),
            (self.fma, "fma"),
        ];
        flags.iter().filter(|(on, _)| *on).map(|(_, name)| *name).collect()
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.summary();
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join(" "))
        }
    }
}

/// Process-wide capability snapshot, detected on first use
pub fn capabilities() -> &'static Capabilities {
    CAPABILITIES.get_or_init(|| {
        let caps = Capabilities::detect();
        log::debug!("Detected processor capabilities: {}", caps);
        caps
    })
}

/// Does the running processor support SSE2?
#[inline]
pub fn has_sse2_support() -> bool {
    capabilities().sse2
}

/// Does the running processor support SSE3?
#[inline]
pub fn has_sse3_support() -> bool {
    capabilities().sse3
}

/// Does the running processor support SSE4.1?
#[inline]
pub fn has_sse4_support() -> bool {
    capabilities().sse4
}

/// Does the running processor support AVX?
#[inline]
pub fn has_avx_support() -> bool {
    capabilities().avx
}

/// Does the running processor support AVX2?
#[inline]
pub fn has_avx2_support() -> bool {
    capabilities().avx2
}

/// Does the running processor support FMA3?
#[inline]
pub fn has_fma_support() -> bool {
    capabilities().fma
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_matches_detect() {
        assert_eq!(*capabilities(), Capabilities::detect());
        // Same snapshot on every call
        assert!(std::ptr::eq(capabilities(), capabilities()));
    }

    #[test]
    fn test_queries_match_snapshot() {
        let caps = capabilities();
        assert_eq!(has_sse2_support(), caps.sse2);
        assert_eq!(has_sse3_support(), caps.sse3);
        assert_eq!(has_sse4_support(), caps.sse4);
        assert_eq!(has_avx_support(), caps.avx);
        assert_eq!(has_avx2_support(), caps.avx2);
        assert_eq!(has_fma_support(), caps.fma);
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_x86_64_baseline() {
        // SSE2 is part of the x86_64 baseline
        assert!(has_sse2_support());
    }

    #[test]
    fn test_none() {
        let caps = Capabilities::none();
        assert!(!caps.supports_vectorized());
        assert!(!caps.supports_wide_fma());
        assert!(caps.summary().is_empty());
        assert_eq!(caps.to_string(), "none");
    }

    #[test]
    fn test_summary() {
        let caps = Capabilities { sse2: true, avx: true, fma: true, ..Capabilities::none() };
        assert_eq!(caps.summary(), vec!["sse2", "avx", "fma"]);
        assert_eq!(caps.to_string(), "sse2 avx fma");
        assert!(caps.supports_wide_fma());
    }
}
