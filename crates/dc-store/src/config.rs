use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use dc_core::{DEFAULT_CYCLE_LENGTH, DEFAULT_DAILY_GOAL, MAX_CYCLE_LENGTH, MIN_CYCLE_LENGTH};

use crate::error::{Result, StoreError};

/// File name of the config inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Widest real-world UTC offsets: -12:00 to +14:00.
const OFFSET_RANGE_MINUTES: std::ops::RangeInclusive<i32> = -720..=840;

/// User settings read from `config.toml`. Every field is optional.
///
/// ```toml
/// default_cycle_length = 54
/// default_daily_goal = 1
/// utc_offset_minutes = 330
/// history_limit = 14
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Cycle length for new counters.
    pub default_cycle_length: u32,
    /// Daily goal (in maalas) for new counters.
    pub default_daily_goal: u32,
    /// Offset applied to UTC when deciding which calendar day it is.
    pub utc_offset_minutes: i32,
    /// Entries shown by `history` when no limit is given.
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_cycle_length: DEFAULT_CYCLE_LENGTH,
            default_daily_goal: DEFAULT_DAILY_GOAL,
            utc_offset_minutes: 0,
            history_limit: 30,
        }
    }
}

impl Config {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .map_err(|e| StoreError::Config(format!("{}: {e}", path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| StoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_CYCLE_LENGTH..=MAX_CYCLE_LENGTH).contains(&self.default_cycle_length) {
            return Err(StoreError::Config(format!(
                "default_cycle_length {} out of range {MIN_CYCLE_LENGTH}-{MAX_CYCLE_LENGTH}",
                self.default_cycle_length
            )));
        }
        if self.default_daily_goal == 0 {
            return Err(StoreError::Config(
                "default_daily_goal must be at least 1".to_string(),
            ));
        }
        if !OFFSET_RANGE_MINUTES.contains(&self.utc_offset_minutes) {
            return Err(StoreError::Config(format!(
                "utc_offset_minutes {} out of range -720..=840",
                self.utc_offset_minutes
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_override() {
        let config =
            Config::from_toml_str("default_cycle_length = 27\nutc_offset_minutes = 330\n").unwrap();
        assert_eq!(config.default_cycle_length, 27);
        assert_eq!(config.utc_offset_minutes, 330);
        assert_eq!(config.default_daily_goal, DEFAULT_DAILY_GOAL);
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(Config::from_toml_str("cycle = 27\n").is_err());
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(Config::from_toml_str("default_cycle_length = 0\n").is_err());
        assert!(Config::from_toml_str("default_cycle_length = 5000\n").is_err());
        assert!(Config::from_toml_str("default_daily_goal = 0\n").is_err());
        assert!(Config::from_toml_str("utc_offset_minutes = 900\n").is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "history_limit = \"lots\"").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
        assert!(err.to_string().contains(CONFIG_FILE));
    }
}
