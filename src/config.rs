use chrono::{FixedOffset, Offset, Utc};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Error raised when a weight table fails validation.
#[derive(Debug, Error)]
pub enum WeightsError {
    #[error("weights must sum to 1.0, got: {0}")]
    BadSum(f64),

    #[error("weights cannot be negative")]
    Negative,
}

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub standouts: StandoutSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: QualityWeights,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StandoutSettings {
    #[serde(default)]
    pub weights: StandoutWeights,
}

/// Per-dimension weights for the compatibility score.
/// Expected to sum to 1.0; checked by `validate`, not at deserialization.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct QualityWeights {
    #[serde(default = "default_distance_weight")]
    pub distance: f64,
    #[serde(default = "default_age_weight")]
    pub age: f64,
    #[serde(default = "default_interest_weight")]
    pub interest: f64,
    #[serde(default = "default_lifestyle_weight")]
    pub lifestyle: f64,
    #[serde(default = "default_pace_weight")]
    pub pace: f64,
    #[serde(default = "default_response_weight")]
    pub response: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            distance: default_distance_weight(),
            age: default_age_weight(),
            interest: default_interest_weight(),
            lifestyle: default_lifestyle_weight(),
            pace: default_pace_weight(),
            response: default_response_weight(),
        }
    }
}

impl QualityWeights {
    pub fn validate(&self) -> Result<(), WeightsError> {
        validate_table(&[
            self.distance,
            self.age,
            self.interest,
            self.lifestyle,
            self.pace,
            self.response,
        ])
    }
}

fn default_distance_weight() -> f64 {
    0.15
}
fn default_age_weight() -> f64 {
    0.10
}
fn default_interest_weight() -> f64 {
    0.25
}
fn default_lifestyle_weight() -> f64 {
    0.25
}
fn default_pace_weight() -> f64 {
    0.10
}
fn default_response_weight() -> f64 {
    0.15
}

/// Weights for the lightweight standout-ranking heuristic.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StandoutWeights {
    #[serde(default = "default_standout_distance")]
    pub distance: f64,
    #[serde(default = "default_standout_age")]
    pub age: f64,
    #[serde(default = "default_standout_interest")]
    pub interest: f64,
    #[serde(default = "default_standout_lifestyle")]
    pub lifestyle: f64,
    #[serde(default = "default_standout_completeness")]
    pub completeness: f64,
    #[serde(default = "default_standout_activity")]
    pub activity: f64,
}

impl Default for StandoutWeights {
    fn default() -> Self {
        Self {
            distance: default_standout_distance(),
            age: default_standout_age(),
            interest: default_standout_interest(),
            lifestyle: default_standout_lifestyle(),
            completeness: default_standout_completeness(),
            activity: default_standout_activity(),
        }
    }
}

impl StandoutWeights {
    pub fn validate(&self) -> Result<(), WeightsError> {
        validate_table(&[
            self.distance,
            self.age,
            self.interest,
            self.lifestyle,
            self.completeness,
            self.activity,
        ])
    }
}

fn validate_table(values: &[f64]) -> Result<(), WeightsError> {
    if values.iter().any(|w| *w < 0.0) {
        return Err(WeightsError::Negative);
    }
    let total: f64 = values.iter().sum();
    if (total - 1.0).abs() > 0.001 {
        return Err(WeightsError::BadSum(total));
    }
    Ok(())
}

fn default_standout_distance() -> f64 {
    0.20
}
fn default_standout_age() -> f64 {
    0.15
}
fn default_standout_interest() -> f64 {
    0.25
}
fn default_standout_lifestyle() -> f64 {
    0.20
}
fn default_standout_completeness() -> f64 {
    0.10
}
fn default_standout_activity() -> f64 {
    0.10
}

/// Thresholds shared by reason and highlight generation, plus the time zone
/// used to compute "today" for a user.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_nearby_distance_km")]
    pub nearby_distance_km: f64,
    #[serde(default = "default_close_distance_km")]
    pub close_distance_km: f64,
    #[serde(default = "default_similar_age_diff")]
    pub similar_age_diff: u8,
    #[serde(default = "default_compatible_age_diff")]
    pub compatible_age_diff: u8,
    #[serde(default = "default_min_shared_interests")]
    pub min_shared_interests: usize,
    /// Offset from UTC, in minutes.
    #[serde(default)]
    pub timezone_offset_minutes: i32,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            nearby_distance_km: default_nearby_distance_km(),
            close_distance_km: default_close_distance_km(),
            similar_age_diff: default_similar_age_diff(),
            compatible_age_diff: default_compatible_age_diff(),
            min_shared_interests: default_min_shared_interests(),
            timezone_offset_minutes: 0,
        }
    }
}

impl MatchingSettings {
    /// The configured user time zone as a fixed UTC offset. An out-of-range
    /// configured offset falls back to UTC.
    pub fn user_time_zone(&self) -> FixedOffset {
        FixedOffset::east_opt(self.timezone_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

fn default_nearby_distance_km() -> f64 {
    5.0
}
fn default_close_distance_km() -> f64 {
    10.0
}
fn default_similar_age_diff() -> u8 {
    2
}
fn default_compatible_age_diff() -> u8 {
    5
}
fn default_min_shared_interests() -> usize {
    3
}

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

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with EMBER_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with EMBER_)
            // e.g., EMBER_SCORING__WEIGHTS__DISTANCE -> scoring.weights.distance
            .add_source(
                Environment::with_prefix("EMBER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("EMBER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
