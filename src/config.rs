use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::slot::NUM_SLOTS;

/// Allowed drift of the distribution sum away from 1.0
pub const DISTRIBUTION_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("target distribution must have {} weights, got {len}", NUM_SLOTS)]
    DistributionLength { len: usize },

    #[error("target distribution weight for slot {slot} is negative or not finite: {weight}")]
    NegativeWeight { slot: usize, weight: f64 },

    #[error("target distribution sums to {sum}, expected 1.0")]
    DistributionSum { sum: f64 },

    #[error("minimum button width must be positive")]
    NonPositiveWidth,

    #[error("total space must be positive")]
    NonPositiveSpace,

    #[error("{} slots at minimum width need {required}, but total space is {total}", NUM_SLOTS)]
    InsufficientSpace { required: f64, total: f64 },

    #[error("number of trials must be at least 1")]
    ZeroTrials,
}

/// Parameters of a single experiment session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExperimentConfig {
    pub min_button_width: f64,
    pub total_space: f64,
    pub target_distribution: [f64; NUM_SLOTS],
    pub num_trials: u32,
    pub adaptive: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            min_button_width: 30.0,
            total_space: 500.0,
            target_distribution: [0.2; NUM_SLOTS],
            num_trials: 20,
            adaptive: true,
        }
    }
}

impl ExperimentConfig {
    /// Check every precondition the controller relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_button_width.is_nan() || self.min_button_width <= 0.0 {
            return Err(ConfigError::NonPositiveWidth);
        }
        if self.total_space.is_nan() || self.total_space <= 0.0 {
            return Err(ConfigError::NonPositiveSpace);
        }
        let required = self.min_button_width * NUM_SLOTS as f64;
        if required > self.total_space {
            return Err(ConfigError::InsufficientSpace {
                required,
                total: self.total_space,
            });
        }
        if self.num_trials == 0 {
            return Err(ConfigError::ZeroTrials);
        }

        for (slot, &weight) in self.target_distribution.iter().enumerate() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::NegativeWeight { slot, weight });
            }
        }
        let sum: f64 = self.target_distribution.iter().sum();
        if (sum - 1.0).abs() > DISTRIBUTION_TOLERANCE {
            return Err(ConfigError::DistributionSum { sum });
        }

        Ok(())
    }
}

/// Convert a user-supplied weight list into the fixed-size distribution
pub fn distribution_from_slice(weights: &[f64]) -> Result<[f64; NUM_SLOTS], ConfigError> {
    <[f64; NUM_SLOTS]>::try_from(weights)
        .map_err(|_| ConfigError::DistributionLength { len: weights.len() })
}

pub trait ConfigStore {
    fn load(&self) -> ExperimentConfig;
    fn save(&self, cfg: &ExperimentConfig) -> crate::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "fitts") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("fitts_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> ExperimentConfig {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<ExperimentConfig>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => warn!(path = %self.path.display(), "ignoring unreadable config: {e}"),
            }
        }
        ExperimentConfig::default()
    }

    fn save(&self, cfg: &ExperimentConfig) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
