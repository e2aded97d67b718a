//! Configuration types for the device detector.

use crate::rules::CorpusSource;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the device detector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Cache settings
    pub cache: CacheConfig,

    /// Input limits
    pub limits: LimitsConfig,

    /// Rule corpus settings
    pub rules: RulesConfig,
}

impl DetectorConfig {
    /// Default configuration with the given cache size.
    pub fn with_cache_size(size: u64) -> Self {
        Self {
            cache: CacheConfig { size },
            ..Self::default()
        }
    }
}

/// Cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum cached detections; 0 disables the cache
    pub size: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { size: 10_000 }
    }
}

/// Input limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// User-Agents longer than this many bytes are not classified
    pub max_user_agent_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_user_agent_length: 2048,
        }
    }
}

/// Rule corpus configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Directory with a rule corpus; the embedded corpus is used if unset
    pub directory: Option<PathBuf>,
}

impl RulesConfig {
    /// Where to load the rule corpus from.
    pub fn source(&self) -> CorpusSource {
        match &self.directory {
            Some(dir) => CorpusSource::Directory(dir.clone()),
            None => CorpusSource::Embedded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DetectorConfig::default();
        assert_eq!(config.cache.size, 10_000);
        assert_eq!(config.limits.max_user_agent_length, 2048);
        assert!(config.rules.directory.is_none());
        assert_eq!(config.rules.source(), CorpusSource::Embedded);
    }

    #[test]
    fn test_config_serialization() {
        let config = DetectorConfig::with_cache_size(64);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: DetectorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.cache.size, 64);
        assert_eq!(parsed.limits.max_user_agent_length, config.limits.max_user_agent_length);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "rules:\n  directory: /etc/zentinel/regexes\n";
        let config: DetectorConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.cache.size, 10_000);
        assert_eq!(
            config.rules.source(),
            CorpusSource::Directory(PathBuf::from("/etc/zentinel/regexes"))
        );
    }
}
