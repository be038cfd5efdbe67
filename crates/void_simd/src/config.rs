//! Kernel configuration

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result};

/// Which execution path the process should use
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathPreference {
    /// Vectorized when the processor supports it, portable otherwise
    #[default]
    Auto,
    /// Always the scalar path
    #[serde(alias = "scalar")]
    Portable,
    /// Vectorized path; selection fails without hardware support
    #[serde(alias = "simd")]
    Vectorized,
}

impl FromStr for PathPreference {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "portable" | "scalar" => Ok(Self::Portable),
            "vectorized" | "simd" => Ok(Self::Vectorized),
            other => Err(KernelError::InvalidConfig(format!(
                "unknown kernel path '{}' (expected auto, portable or vectorized)",
                other
            ))),
        }
    }
}

impl fmt::Display for PathPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Portable => write!(f, "portable"),
            Self::Vectorized => write!(f, "vectorized"),
        }
    }
}

/// Kernel selection configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Requested execution path (default: auto)
    pub path: PathPreference,
}

impl KernelConfig {
    /// Environment variable overriding the path preference
    pub const ENV_VAR: &'static str = "VOID_SIMD_PATH";

    /// Force the scalar path
    pub fn portable() -> Self {
        Self {
            path: PathPreference::Portable,
        }
    }

    /// Require the vectorized path
    pub fn vectorized() -> Self {
        Self {
            path: PathPreference::Vectorized,
        }
    }

    /// Set the path preference
    pub fn with_path(mut self, path: PathPreference) -> Self {
        self.path = path;
        self
    }

    /// Read [`ENV_VAR`](Self::ENV_VAR); unset or empty means the default
    pub fn from_env() -> Result<Self> {
        Self::from_env_value(std::env::var(Self::ENV_VAR).ok())
    }

    fn from_env_value(value: Option<String>) -> Result<Self> {
        match value {
            Some(v) if !v.trim().is_empty() => Ok(Self::default().with_path(v.parse()?)),
            _ => Ok(Self::default()),
        }
    }

    /// Parse a JSON object such as `{"path": "portable"}`
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| KernelError::InvalidConfig(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_auto() {
        assert_eq!(KernelConfig::default().path, PathPreference::Auto);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("auto".parse::<PathPreference>().unwrap(), PathPreference::Auto);
        assert_eq!("Scalar".parse::<PathPreference>().unwrap(), PathPreference::Portable);
        assert_eq!(" PORTABLE ".parse::<PathPreference>().unwrap(), PathPreference::Portable);
        assert_eq!("simd".parse::<PathPreference>().unwrap(), PathPreference::Vectorized);
        assert_eq!("Vectorized".parse::<PathPreference>().unwrap(), PathPreference::Vectorized);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "neon".parse::<PathPreference>().unwrap_err();
        assert!(matches!(err, KernelError::InvalidConfig(ref msg) if msg.contains("neon")));
    }

    #[test]
    fn test_env_value() {
        assert_eq!(KernelConfig::from_env_value(None).unwrap(), KernelConfig::default());
        assert_eq!(KernelConfig::from_env_value(Some(String::new())).unwrap(), KernelConfig::default());
        assert_eq!(
            KernelConfig::from_env_value(Some("scalar".into())).unwrap(),
            KernelConfig::portable()
        );
        assert!(KernelConfig::from_env_value(Some("fast".into())).is_err());
    }

    #[test]
    fn test_from_json() {
        let config = KernelConfig::from_json(r#"{"path": "vectorized"}"#).unwrap();
        assert_eq!(config, KernelConfig::vectorized());

        // Missing fields fall back to defaults
        assert_eq!(KernelConfig::from_json("{}").unwrap(), KernelConfig::default());

        assert!(matches!(
            KernelConfig::from_json(r#"{"path": "gpu"}"#),
            Err(KernelError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_json_accepts_env_aliases() {
        // Same spellings VOID_SIMD_PATH accepts
        assert_eq!(
            KernelConfig::from_json(r#"{"path": "scalar"}"#).unwrap(),
            KernelConfig::portable()
        );
        assert_eq!(
            KernelConfig::from_json(r#"{"path": "simd"}"#).unwrap(),
            KernelConfig::vectorized()
        );
        // Serialization keeps the canonical name
        let json = serde_json::to_string(&KernelConfig::portable()).unwrap();
        assert_eq!(json, r#"{"path":"portable"}"#);
    }

    #[test]
    fn test_builder() {
        let config = KernelConfig::default().with_path(PathPreference::Portable);
        assert_eq!(config, KernelConfig::portable());
        assert_eq!(config.path.to_string(), "portable");
    }
}
