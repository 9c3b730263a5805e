use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_CLUSTERS, DEFAULT_MAX_ITERATIONS, DEFAULT_SCOREBOARD_URL,
    DEFAULT_TIMEOUT_SECONDS, DEFAULT_TOLERANCE, DEFAULT_USER_AGENT,
};
use crate::error::{Result, ScraperError};
use crate::resample::TimeGrid;
use crate::schedule::RoundSchedule;
use crate::seeds::RankTable;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const CONFIG_PATH_ENV: &str = "PBP_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub resample: TimeGrid,
    pub cluster: ClusterConfig,
    pub seeds: RankTable,
    pub schedule: RoundSchedule,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub scoreboard_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            scoreboard_url: DEFAULT_SCOREBOARD_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub k: usize,
    /// Fixed seed for centroid initialization; random when absent.
    pub seed: Option<u64>,
    pub max_iterations: u64,
    pub tolerance: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_CLUSTERS,
            seed: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads the file at `path`, falling back to defaults when it does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.cluster.k == 0 {
            return Err(ScraperError::Config("cluster.k must be at least 1".into()));
        }
        if !(self.resample.step_minutes > 0.0) {
            return Err(ScraperError::Config("resample.step_minutes must be positive".into()));
        }
        if self.source.timeout_seconds == 0 {
            return Err(ScraperError::Config("source.timeout_seconds must be positive".into()));
        }
        Ok(())
    }
}
