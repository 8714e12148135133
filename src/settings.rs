//! Analysis settings, read from an optional `settings.toml`.
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::logging::{self, DEFAULT_LOG_LEVEL};

pub const SETTINGS_FILE_NAME: &str = "settings.toml";

const DEFAULT_MAX_PATHS: usize = 10_000;
const DEFAULT_MAX_DEPTH: usize = 512;

fn default_max_paths() -> usize {
    DEFAULT_MAX_PATHS
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Lower bound applied to delays and transit times after a delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelayFloor {
    /// Values may go negative, matching the behaviour of the original tool.
    #[default]
    Unbounded,
    /// Values are clamped at zero hours.
    Zero,
}

impl DelayFloor {
    pub fn apply(self, hours: i64) -> i64 {
        match self {
            DelayFloor::Unbounded => hours,
            DelayFloor::Zero => hours.max(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Stop enumerating once this many root-to-leaf paths have been recorded
    #[serde(default = "default_max_paths")]
    pub max_paths: usize,
    /// Longest path, in edges, that enumeration will follow
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default)]
    pub delay_floor: DelayFloor,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            max_paths: DEFAULT_MAX_PATHS,
            max_depth: DEFAULT_MAX_DEPTH,
            delay_floor: DelayFloor::default(),
            log_level: default_log_level(),
        }
    }
}

impl AnalysisSettings {
    /// Read settings from `file_path`, falling back to defaults if the file doesn't exist.
    pub fn load_from_path(file_path: &Path) -> Result<Self> {
        if !file_path.is_file() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(file_path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Install the logger at `log_level`, unless the environment overrides it.
    pub fn init_logger(&self) -> Result<()> {
        logging::init(Some(&self.log_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_from_path_no_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME); // NB: doesn't exist
        assert_eq!(
            AnalysisSettings::load_from_path(&file_path).unwrap(),
            AnalysisSettings::default()
        );
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME);

        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "max_paths = 5").unwrap();
            writeln!(file, "delay_floor = \"zero\"").unwrap();
        }

        assert_eq!(
            AnalysisSettings::load_from_path(&file_path).unwrap(),
            AnalysisSettings {
                max_paths: 5,
                max_depth: DEFAULT_MAX_DEPTH,
                delay_floor: DelayFloor::Zero,
                log_level: DEFAULT_LOG_LEVEL.to_string(),
            }
        );
    }

    #[test]
    fn test_empty_toml_matches_default() {
        assert_eq!(
            AnalysisSettings::from_toml_str("").unwrap(),
            AnalysisSettings::default()
        );
    }

    #[test]
    fn test_invalid_toml() {
        assert!(AnalysisSettings::from_toml_str("delay_floor = \"sideways\"").is_err());
    }

    #[test]
    fn test_log_level_feeds_logger() {
        let settings = AnalysisSettings::from_toml_str("log_level = \"debug\"").unwrap();
        assert_eq!(settings.log_level, "debug");
        if std::env::var(logging::LOG_LEVEL_ENV_VAR).is_err() {
            assert_eq!(
                logging::resolve_level(Some(&settings.log_level)).unwrap(),
                log::LevelFilter::Debug
            );
        }
    }

    #[test]
    fn test_delay_floor() {
        assert_eq!(DelayFloor::Unbounded.apply(-2), -2);
        assert_eq!(DelayFloor::Zero.apply(-2), 0);
        assert_eq!(DelayFloor::Zero.apply(3), 3);
    }
}
