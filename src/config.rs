use chrono::Duration;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::analysis::{LengthUnit, DEFAULT_Z_THRESHOLD};
use crate::propagate::Frame;
use crate::sampler::{SampleOptions, DEFAULT_STALE_AFTER_DAYS, DEFAULT_STEP_MINUTES};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sampling: SamplingConfig,
    pub analysis: AnalysisConfig,
    pub prediction: PredictionConfig,
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub step_minutes: f64,
    pub frame: Frame,
    pub parallel: bool,
    pub stale_after_days: i64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig {
            step_minutes: DEFAULT_STEP_MINUTES,
            frame: Frame::Inertial,
            parallel: false,
            stale_after_days: DEFAULT_STALE_AFTER_DAYS,
        }
    }
}

impl SamplingConfig {
    pub fn options(&self) -> SampleOptions {
        SampleOptions {
            step_minutes: self.step_minutes,
            frame: self.frame,
            parallel: self.parallel,
            stale_after: Duration::days(self.stale_after_days),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub z_threshold: f64,
    /// Unit of position and altitude columns in supplied trajectory tables.
    pub units: LengthUnit,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            z_threshold: DEFAULT_Z_THRESHOLD,
            units: LengthUnit::Kilometers,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    #[serde(deserialize_with = "deserialize_duration")]
    pub horizon: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub interval: Duration,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        PredictionConfig {
            horizon: Duration::days(7),
            interval: Duration::hours(1),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        WebConfig {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as null.
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }
}

/// Parse a humantime duration such as `7days` or `90m`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim())
        .map_err(|e| e.to_string())
        .and_then(|d| Duration::from_std(d).map_err(|e| e.to_string()))
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_duration(&s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_all_defaults() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config.sampling.step_minutes, 5.0);
        assert_eq!(config.sampling.frame, Frame::Inertial);
        assert_eq!(config.analysis.z_threshold, 3.0);
        assert_eq!(config.prediction.horizon, Duration::days(7));
        assert_eq!(config.prediction.interval, Duration::hours(1));
        assert_eq!(config.web.bind, "0.0.0.0:8080");
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let yaml = r#"
sampling:
  step_minutes: 1.5
  frame: earth_fixed
analysis:
  units: meters
prediction:
  horizon: 2days
web:
  bind: 127.0.0.1:3000
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.sampling.step_minutes, 1.5);
        assert_eq!(config.sampling.frame, Frame::EarthFixed);
        assert!(!config.sampling.parallel);
        assert_eq!(config.sampling.stale_after_days, 14);
        assert_eq!(config.analysis.units, LengthUnit::Meters);
        assert_eq!(config.analysis.z_threshold, 3.0);
        assert_eq!(config.prediction.horizon, Duration::days(2));
        assert_eq!(config.prediction.interval, Duration::hours(1));
        assert_eq!(config.web.bind, "127.0.0.1:3000");

        let options = config.sampling.options();
        assert_eq!(options.stale_after, Duration::days(14));
    }

    #[test]
    fn rejects_bad_duration() {
        let err = Config::from_yaml("prediction:\n  interval: soon\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn parses_humantime_durations() {
        assert_eq!(parse_duration(" 90m ").unwrap(), Duration::minutes(90));
        assert!(parse_duration("-1h").is_err());
    }
}
