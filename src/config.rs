use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::{Error, Result};

/// Engine configuration, read from `~/.tandem/tandem.toml`.
///
/// Every key is optional; missing keys fall back to the workload defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Active-task count at which a person can no longer receive work.
    pub assignment_cap: usize,
    pub heavy_threshold: usize,
    pub moderate_threshold: usize,
    pub base_score: u32,
    /// Score deducted per active task.
    pub load_penalty: u32,
    /// Score added per topically related assignment.
    pub topical_bonus: u32,
    pub max_suggestions: usize,
}

impl Default for Config {
    fn default() -> Self {
        let policy = WorkloadPolicy::default();
        Self {
            assignment_cap: policy.assignment_cap,
            heavy_threshold: policy.heavy_threshold,
            moderate_threshold: policy.moderate_threshold,
            base_score: policy.base_score,
            load_penalty: policy.load_penalty,
            topical_bonus: policy.topical_bonus,
            max_suggestions: policy.max_suggestions,
        }
    }
}

impl Config {
    pub fn tandem_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".tandem"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::tandem_dir()?.join("tandem.toml"))
    }

    /// The thresholds the engine consumes.
    pub fn workload_policy(&self) -> WorkloadPolicy {
        WorkloadPolicy {
            assignment_cap: self.assignment_cap,
            heavy_threshold: self.heavy_threshold,
            moderate_threshold: self.moderate_threshold,
            base_score: self.base_score,
            load_penalty: self.load_penalty,
            topical_bonus: self.topical_bonus,
            max_suggestions: self.max_suggestions,
        }
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        debug!(path = %path.display(), "Config::load");
        if !path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(&path)?)?;
        debug!(?config, "Config loaded");
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let dir = Self::tandem_dir()?;
        if !dir.exists() {
            debug!(dir = %dir.display(), "Creating tandem directory");
            fs::create_dir_all(&dir)?;
        }
        let path = Self::config_path()?;
        fs::write(&path, toml::to_string_pretty(self)?)?;
        debug!(path = %path.display(), "Config saved");
        Ok(())
    }
}

/// Workload thresholds and scoring weights used by the scorer and the
/// move validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadPolicy {
    pub assignment_cap: usize,
    pub heavy_threshold: usize,
    pub moderate_threshold: usize,
    pub base_score: u32,
    pub load_penalty: u32,
    pub topical_bonus: u32,
    pub max_suggestions: usize,
}

impl Default for WorkloadPolicy {
    fn default() -> Self {
        Self {
            assignment_cap: 10,
            heavy_threshold: 12,
            moderate_threshold: 8,
            base_score: 100,
            load_penalty: 5,
            topical_bonus: 10,
            max_suggestions: 5,
        }
    }
}
