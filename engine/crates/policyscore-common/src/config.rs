//! Configuration management for PolicyScore

use policyscore_core::{Error, Result, Verbosity};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Scoring inputs and policy
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Report output settings
    #[serde(default)]
    pub report: ReportConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Configuration(format!("Failed to parse config: {}", e)))
    }

    /// Create a configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Merge with environment variables (POLICYSCORE_ prefix)
    pub fn merge_env(mut self) -> Self {
        // Scoring settings
        if let Ok(val) = std::env::var("POLICYSCORE_BASELINE") {
            self.scoring.baseline = Some(val);
        }
        if let Ok(val) = std::env::var("POLICYSCORE_SNAPSHOT") {
            self.scoring.snapshot = Some(val);
        }
        if let Ok(val) = std::env::var("POLICYSCORE_VERBOSITY") {
            self.scoring.verbosity = val;
        }
        if let Ok(val) = std::env::var("POLICYSCORE_MATCH_STRATEGY") {
            self.scoring.match_strategy = val;
        }

        // Logging
        if let Ok(val) = std::env::var("POLICYSCORE_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("POLICYSCORE_LOG_FORMAT") {
            self.logging.format = val;
        }

        self
    }
}

/// Scoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Path to the YAML baseline
    pub baseline: Option<String>,

    /// Path to the JSON policy snapshot
    pub snapshot: Option<String>,

    /// Diagnostic verbosity (silent, explain)
    #[serde(default = "default_verbosity")]
    pub verbosity: String,

    /// Principal matching strategy (first-match, one-to-one)
    #[serde(default = "default_match_strategy")]
    pub match_strategy: String,

    /// Resolve well-known Windows SIDs not present in the snapshot
    #[serde(default = "default_true")]
    pub well_known_sids: bool,
}

fn default_verbosity() -> String {
    String::from("silent")
}

fn default_match_strategy() -> String {
    String::from("first-match")
}

fn default_true() -> bool {
    true
}

impl ScoringConfig {
    /// Parsed verbosity
    pub fn verbosity(&self) -> Result<Verbosity> {
        self.verbosity
            .parse::<Verbosity>()
            .map_err(|message| Error::InvalidConfig {
                key: String::from("scoring.verbosity"),
                message,
            })
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            baseline: None,
            snapshot: None,
            verbosity: default_verbosity(),
            match_strategy: default_match_strategy(),
            well_known_sids: true,
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report format (text, json, json-pretty)
    #[serde(default = "default_report_format")]
    pub format: String,

    /// Output file (stdout if not set)
    pub output: Option<String>,
}

fn default_report_format() -> String {
    String::from("text")
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: default_report_format(),
            output: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, json, compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    String::from("warn")
}

fn default_log_format() -> String {
    String::from("compact")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Builder for constructing Config
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn baseline(mut self, path: impl Into<String>) -> Self {
        self.config.scoring.baseline = Some(path.into());
        self
    }

    pub fn snapshot(mut self, path: impl Into<String>) -> Self {
        self.config.scoring.snapshot = Some(path.into());
        self
    }

    pub fn verbosity(mut self, verbosity: impl Into<String>) -> Self {
        self.config.scoring.verbosity = verbosity.into();
        self
    }

    pub fn match_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.config.scoring.match_strategy = strategy.into();
        self
    }

    pub fn report_format(mut self, format: impl Into<String>) -> Self {
        self.config.report.format = format.into();
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
