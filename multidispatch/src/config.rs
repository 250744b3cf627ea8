//! Dispatch Configuration
//!
//! Options controlling how a generic function caches effective methods.
//! Every field has a default, so a configuration file only needs to list
//! what it changes:
//!
//! ```toml
//! [cache]
//! enabled = true
//! initial_capacity = 16
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dispatch configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for a generic function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Resolution cache configuration.
    pub cache: CacheConfig,
}

/// Resolution cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Memoize effective methods per concrete signature.
    ///
    /// When disabled every invocation recomputes its effective method.
    pub enabled: bool,

    /// Number of concrete signatures the cache has room for up front.
    pub initial_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_capacity: 16,
        }
    }
}

impl DispatchConfig {
    /// Create a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Disable the resolution cache.
    pub fn without_cache(mut self) -> Self {
        self.cache.enabled = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DispatchConfig::default();
        assert!(config.cache.enabled);
        assert_eq!(config.cache.initial_capacity, 16);
        assert!(!config.without_cache().cache.enabled);
    }

    #[test]
    fn test_partial_toml() {
        let config = DispatchConfig::from_toml_str("[cache]\nenabled = false\n").unwrap();
        assert_eq!(
            config,
            DispatchConfig {
                cache: CacheConfig {
                    enabled: false,
                    initial_capacity: 16,
                },
            }
        );

        assert_eq!(DispatchConfig::from_toml_str("").unwrap(), DispatchConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = DispatchConfig::from_toml_str("[cache]\nenabled = \"yes\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid dispatch configuration"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cache]\ninitial_capacity = 64").unwrap();

        let config = DispatchConfig::load(file.path()).unwrap();
        assert!(config.cache.enabled);
        assert_eq!(config.cache.initial_capacity, 64);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dispatch.toml");

        match DispatchConfig::load(&path) {
            Err(ConfigError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected Io error, got {:?}", other),
        }
    }
}
