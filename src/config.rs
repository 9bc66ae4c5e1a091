//! Generator configuration, loadable from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

/// Options recognized by the dungeon generator.
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```json
/// { "seed": 42, "min_split_size": 3 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Seed for the random source. `None` lets the caller pick one.
    pub seed: Option<u64>,
    /// Minimum width/height of each chunk produced by a split
    pub min_split_size: i32,
    /// Largest fraction of a chunk's extent the bigger child of a split may take
    pub max_split_ratio: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            min_split_size: DUNGEON_MIN_SPLIT_SIZE,
            max_split_ratio: DUNGEON_MAX_SPLIT_RATIO,
        }
    }
}

impl GeneratorConfig {
    /// Load and validate a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GeneratorConfig =
            serde_json::from_str(&json_str).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_split_size < 1 {
            return Err(ConfigError::Invalid(format!(
                "min_split_size must be at least 1, got {}",
                self.min_split_size
            )));
        }
        if !(DUNGEON_MIN_SPLIT_RATIO..=DUNGEON_MAX_SPLIT_RATIO).contains(&self.max_split_ratio) {
            return Err(ConfigError::Invalid(format!(
                "max_split_ratio must be within [{DUNGEON_MIN_SPLIT_RATIO}, {DUNGEON_MAX_SPLIT_RATIO}], got {}",
                self.max_split_ratio
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_is_valid() {
        let config = GeneratorConfig::default();
        assert_eq!(config.min_split_size, 2);
        assert_eq!(config.max_split_ratio, 1.0);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GeneratorConfig = serde_json::from_str(r#"{ "seed": 42 }"#).unwrap();
        assert_eq!(config, GeneratorConfig::default().with_seed(42));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result: Result<GeneratorConfig, _> = serde_json::from_str(r#"{ "depth": 3 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = GeneratorConfig {
            min_split_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = GeneratorConfig {
            max_split_ratio: 0.3,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let result = GeneratorConfig::load(Path::new("/nonexistent/bsp-dungeon.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("bsp-dungeon-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "seed": 9, "min_split_size": 3, "max_split_ratio": 0.75 }"#).unwrap();
        let config = GeneratorConfig::load(&path);
        std::fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.min_split_size, 3);
        assert_eq!(config.max_split_ratio, 0.75);
    }
}
