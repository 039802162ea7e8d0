//! Serializable scan configuration.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use drivetime_core::engine::RetryPolicy;

/// Unique identifier for a scan (content-addressable hash).
pub type ScanId = String;

/// All parameters needed to reproduce a scan: the route, the departure
/// window, the fetch schedule, and chart options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    pub route: RouteSpec,
    pub window: WindowSpec,
    #[serde(default)]
    pub fetch: FetchSpec,
    #[serde(default)]
    pub chart: ChartSpec,
}

/// Route endpoints as entered by the user: free text or "lat,lng".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteSpec {
    pub origin: String,
    pub destination: String,
}

/// Departure window, wall-clock local to `timezone`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowSpec {
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM, 24-hour
    pub start: String,
    /// HH:MM, 24-hour
    pub end: String,
    #[serde(default = "default_interval")]
    pub interval_minutes: u32,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_interval() -> u32 {
    15
}

fn default_timezone() -> String {
    "America/Los_Angeles".to_string()
}

/// Fetch schedule knobs, mirroring the engine's RetryPolicy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FetchSpec {
    pub max_rounds: usize,
    pub first_round_workers: usize,
    pub retry_workers: usize,
    pub attempts_per_task: u32,
    pub base_delay_ms: u64,
}

impl Default for FetchSpec {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_rounds: policy.max_rounds,
            first_round_workers: policy.first_round_workers,
            retry_workers: policy.retry_workers,
            attempts_per_task: policy.attempts_per_task,
            base_delay_ms: policy.base_delay.as_millis() as u64,
        }
    }
}

impl FetchSpec {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_rounds: self.max_rounds,
            first_round_workers: self.first_round_workers,
            retry_workers: self.retry_workers,
            attempts_per_task: self.attempts_per_task,
            base_delay: Duration::from_millis(self.base_delay_ms),
        }
    }
}

/// Chart options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartSpec {
    pub height: usize,
    pub enabled: bool,
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self {
            height: drivetime_core::chart::DEFAULT_HEIGHT,
            enabled: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    BadDate(String),

    #[error("invalid time '{0}': expected HH:MM")]
    BadTime(String),

    #[error("unknown timezone '{0}'")]
    BadTimezone(String),

    #[error("interval must be between 1 and 240 minutes, got {0}")]
    BadInterval(u32),
}

/// Window fields parsed into chrono types, ready for grid construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedWindow {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub interval_minutes: u32,
    pub tz: Tz,
}

impl ScanConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.resolved_window()?;
        Ok(config)
    }

    /// Deterministic hash of this configuration. Two identical configs
    /// share a scan id, so artifact directories are stable across reruns.
    pub fn scan_id(&self) -> ScanId {
        let json = serde_json::to_string(self).expect("ScanConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    /// Parse and validate the window fields.
    pub fn resolved_window(&self) -> Result<ResolvedWindow, ConfigError> {
        let date = NaiveDate::parse_from_str(&self.window.date, "%Y-%m-%d")
            .map_err(|_| ConfigError::BadDate(self.window.date.clone()))?;
        let start = NaiveTime::parse_from_str(&self.window.start, "%H:%M")
            .map_err(|_| ConfigError::BadTime(self.window.start.clone()))?;
        let end = NaiveTime::parse_from_str(&self.window.end, "%H:%M")
            .map_err(|_| ConfigError::BadTime(self.window.end.clone()))?;

        if !(1..=240).contains(&self.window.interval_minutes) {
            return Err(ConfigError::BadInterval(self.window.interval_minutes));
        }

        let tz = Tz::from_str(&self.window.timezone)
            .map_err(|_| ConfigError::BadTimezone(self.window.timezone.clone()))?;

        Ok(ResolvedWindow {
            date,
            start,
            end,
            interval_minutes: self.window.interval_minutes,
            tz,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_toml() -> &'static str {
        r#"
[route]
origin = "Ferry Building, San Francisco"
destination = "1 Infinite Loop, Cupertino"

[window]
date = "2025-06-02"
start = "06:00"
end = "10:00"
"#
    }

    #[test]
    fn parses_toml_with_defaults() {
        let config = ScanConfig::from_toml(sample_toml()).unwrap();
        assert_eq!(config.window.interval_minutes, 15);
        assert_eq!(config.window.timezone, "America/Los_Angeles");
        assert_eq!(config.fetch, FetchSpec::default());
        assert!(config.chart.enabled);

        let window = config.resolved_window().unwrap();
        assert_eq!(window.tz, chrono_tz::America::Los_Angeles);
        assert_eq!(window.date, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
    }

    #[test]
    fn fetch_overrides_survive_the_round_trip() {
        let toml_str = format!(
            "{}\n[fetch]\nmax_rounds = 5\nretry_workers = 4\n",
            sample_toml()
        );
        let config = ScanConfig::from_toml(&toml_str).unwrap();
        let policy = config.fetch.to_policy();
        assert_eq!(policy.max_rounds, 5);
        assert_eq!(policy.retry_workers, 4);
        // Unspecified knobs keep their defaults.
        assert_eq!(policy.first_round_workers, 30);
    }

    #[test]
    fn scan_id_is_stable_and_content_sensitive() {
        let a = ScanConfig::from_toml(sample_toml()).unwrap();
        let b = ScanConfig::from_toml(sample_toml()).unwrap();
        assert_eq!(a.scan_id(), b.scan_id());

        let mut c = a.clone();
        c.window.interval_minutes = 30;
        assert_ne!(a.scan_id(), c.scan_id());
    }

    #[test]
    fn rejects_bad_fields() {
        let mut config = ScanConfig::from_toml(sample_toml()).unwrap();

        config.window.date = "06/02/2025".into();
        assert!(matches!(
            config.resolved_window(),
            Err(ConfigError::BadDate(_))
        ));

        let mut config = ScanConfig::from_toml(sample_toml()).unwrap();
        config.window.timezone = "Mars/Olympus_Mons".into();
        assert!(matches!(
            config.resolved_window(),
            Err(ConfigError::BadTimezone(_))
        ));

        let mut config = ScanConfig::from_toml(sample_toml()).unwrap();
        config.window.interval_minutes = 0;
        assert!(matches!(
            config.resolved_window(),
            Err(ConfigError::BadInterval(0))
        ));
    }
}
