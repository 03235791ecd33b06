use crate::core::{MatchRanker, MatchingError, DEFAULT_MATCH_THRESHOLD};
use crate::models::ScoringWeights;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Inclusive minimum combined score for a candidate to be listed
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Score candidates on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            parallel: false,
        }
    }
}

fn default_threshold() -> f64 { DEFAULT_MATCH_THRESHOLD }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_smoking_weight")]
    pub smoking: f64,
    #[serde(default = "default_drinking_weight")]
    pub drinking: f64,
    #[serde(default = "default_exercise_weight")]
    pub exercise: f64,
    #[serde(default = "default_work_life_balance_weight")]
    pub work_life_balance: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            smoking: default_smoking_weight(),
            drinking: default_drinking_weight(),
            exercise: default_exercise_weight(),
            work_life_balance: default_work_life_balance_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(w: &WeightsConfig) -> Self {
        ScoringWeights {
            smoking: w.smoking,
            drinking: w.drinking,
            exercise: w.exercise,
            work_life_balance: w.work_life_balance,
        }
    }
}

fn default_smoking_weight() -> f64 { crate::models::domain::DEFAULT_SMOKING_WEIGHT }
fn default_drinking_weight() -> f64 { crate::models::domain::DEFAULT_DRINKING_WEIGHT }
fn default_exercise_weight() -> f64 { crate::models::domain::DEFAULT_EXERCISE_WEIGHT }
fn default_work_life_balance_weight() -> f64 { crate::models::domain::DEFAULT_WORK_LIFE_BALANCE_WEIGHT }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MATCH_)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MATCH__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    /// Build the ranking engine described by the `matching` and `scoring` sections
    pub fn matching_engine(&self) -> Result<MatchRanker, MatchingError> {
        let weights = ScoringWeights::from(&self.scoring.weights);
        Ok(MatchRanker::new(weights, self.matching.threshold)?.with_parallel(self.matching.parallel))
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
