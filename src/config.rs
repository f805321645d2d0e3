use crate::error::{AppError, Result};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use validator::{Validate, ValidationError};

/// Environment variable pointing at an override config file
pub const CONFIG_PATH_ENV: &str = "SOC_ENGINE_CONFIG";

/// Longest accepted correlation window (one year)
pub const MAX_TIME_WINDOW_SECS: u64 = 31_536_000;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    /// Correlation configuration
    #[serde(default)]
    #[validate(nested)]
    pub correlation: CorrelationConfig,

    /// Severity label partition
    #[serde(default)]
    #[validate(nested)]
    pub severity: SeverityConfig,

    /// Correlation scorer selection
    #[serde(default)]
    #[validate(nested)]
    pub scorer: ScorerConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the embedded defaults, an optional file and environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let override_path: Option<PathBuf> = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from));

        let mut builder = config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ));

        // An explicitly requested file must exist
        if let Some(path) = override_path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        // Override with environment variables (prefix: SOC_ENGINE_)
        builder = builder.add_source(
            config::Environment::with_prefix("SOC_ENGINE")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("severity.high_risk_labels")
                .with_list_parse_key("severity.medium_risk_labels")
                .try_parsing(true),
        );

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AppError::Serialization(e.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CorrelationConfig {
    /// Maximum time between two alerts for them to be paired (seconds)
    #[serde(default = "default_time_window")]
    #[validate(range(min = 1, max = 31_536_000))]
    pub time_window_secs: u64,

    /// Minimum scorer probability for a pair to be accepted
    #[serde(default = "default_correlation_threshold")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub correlation_threshold: f64,

    /// Pairs sent to the scorer per call
    #[serde(default = "default_scorer_batch_size")]
    #[validate(range(min = 1))]
    pub scorer_batch_size: usize,

    /// Scorer calls allowed in flight at once
    #[serde(default = "default_max_concurrent_batches")]
    #[validate(range(min = 1))]
    pub max_concurrent_batches: usize,
}

impl CorrelationConfig {
    /// Correlation window as a duration
    pub fn time_window(&self) -> Result<TimeDelta> {
        if !(1..=MAX_TIME_WINDOW_SECS).contains(&self.time_window_secs) {
            return Err(out_of_range_window(self.time_window_secs));
        }
        i64::try_from(self.time_window_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| out_of_range_window(self.time_window_secs))
    }

    /// Override the window, keeping the other settings.
    ///
    /// The window must be a positive whole number of seconds no longer than
    /// [`MAX_TIME_WINDOW_SECS`].
    pub fn with_time_window(mut self, window: TimeDelta) -> Result<Self> {
        if window.subsec_nanos() != 0 {
            return Err(AppError::Configuration(format!(
                "time window must be whole seconds, got {}",
                window
            )));
        }
        self.time_window_secs = u64::try_from(window.num_seconds()).unwrap_or(0);
        self.time_window()?;
        Ok(self)
    }

    /// Override the acceptance threshold, keeping the other settings
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.correlation_threshold = threshold;
        self
    }
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            time_window_secs: default_time_window(),
            correlation_threshold: default_correlation_threshold(),
            scorer_batch_size: default_scorer_batch_size(),
            max_concurrent_batches: default_max_concurrent_batches(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_disjoint_labels"))]
pub struct SeverityConfig {
    /// Labels promoted to HIGH when the classifier is confident
    #[serde(default = "default_high_risk_labels")]
    pub high_risk_labels: Vec<String>,

    /// Labels promoted to MEDIUM when the classifier is confident
    #[serde(default = "default_medium_risk_labels")]
    pub medium_risk_labels: Vec<String>,
}

impl Default for SeverityConfig {
    fn default() -> Self {
        Self {
            high_risk_labels: default_high_risk_labels(),
            medium_risk_labels: default_medium_risk_labels(),
        }
    }
}

fn out_of_range_window(secs: u64) -> AppError {
    AppError::Configuration(format!(
        "time_window_secs must be between 1 and {}, got {}",
        MAX_TIME_WINDOW_SECS, secs
    ))
}

fn validate_disjoint_labels(config: &SeverityConfig) -> std::result::Result<(), ValidationError> {
    let high: HashSet<&str> = config.high_risk_labels.iter().map(String::as_str).collect();
    if config
        .medium_risk_labels
        .iter()
        .any(|label| high.contains(label.as_str()))
    {
        return Err(ValidationError::new("overlapping_risk_labels"));
    }
    if high.contains(crate::models::NORMAL_LABEL)
        || config
            .medium_risk_labels
            .iter()
            .any(|label| label == crate::models::NORMAL_LABEL)
    {
        return Err(ValidationError::new("normal_label_is_benign"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    /// Same source within five minutes
    #[default]
    Heuristic,
    /// Same source within the same fixed time bucket
    TimeBucket,
    /// External correlation model over HTTP
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_scorer_endpoint"))]
pub struct ScorerConfig {
    #[serde(default)]
    pub kind: ScorerKind,

    /// Model endpoint (required for the http scorer)
    pub endpoint: Option<String>,

    /// HTTP request timeout (seconds)
    #[serde(default = "default_scorer_timeout")]
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            kind: ScorerKind::default(),
            endpoint: None,
            timeout_secs: default_scorer_timeout(),
        }
    }
}

fn validate_scorer_endpoint(config: &ScorerConfig) -> std::result::Result<(), ValidationError> {
    if config.kind == ScorerKind::Http
        && config.endpoint.as_deref().map_or(true, |e| e.trim().is_empty())
    {
        return Err(ValidationError::new("http_scorer_requires_endpoint"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            metrics_enabled: default_true(),
        }
    }
}

// Default value functions
fn default_time_window() -> u64 {
    300 // 5 minutes
}

fn default_correlation_threshold() -> f64 {
    0.5
}

fn default_scorer_batch_size() -> usize {
    64
}

fn default_max_concurrent_batches() -> usize {
    4
}

fn default_high_risk_labels() -> Vec<String> {
    ["ransomware", "malware", "data_exfil", "insider_threat"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_medium_risk_labels() -> Vec<String> {
    ["brute_force", "phishing", "ddos"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_scorer_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}
