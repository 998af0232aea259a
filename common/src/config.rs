use serde::Deserialize;
use std::{error::Error, fs, time::Duration};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CommonConfig {
    pub project_name: String,
    #[serde(default)]
    pub dataset_path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AssessorConfig {
    pub log_level: String,
    /// Shipping to any other country counts as international.
    pub home_country: String,
    /// Offset from UTC used when reading the hour-of-day of an order.
    pub utc_offset_hours: i32,
    pub assessment_timeout_ms: Option<u64>,
}

impl Default for AssessorConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            home_country: "Kenya".to_string(),
            utc_offset_hours: 3,
            assessment_timeout_ms: None,
        }
    }
}

impl AssessorConfig {
    pub fn assessment_timeout(&self) -> Option<Duration> {
        self.assessment_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StatisticsConfig {
    pub log_level: String,
    pub default_window_days: u32,
    /// Upper bound on orders evaluated at once. Sized to the stores, not the CPU.
    pub max_concurrency: usize,
    pub timeout_ms: Option<u64>,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            default_window_days: 30,
            max_concurrency: 8,
            timeout_ms: None,
        }
    }
}

impl StatisticsConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    pub common: CommonConfig,
    #[serde(default)]
    pub assessor: AssessorConfig,
    #[serde(default)]
    pub statistics: StatisticsConfig,
}

impl Config {
    pub fn load(config_path: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let contents = fs::read_to_string(config_path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let config = serde_yml::from_str(contents)?;

        Ok(config)
    }
}
