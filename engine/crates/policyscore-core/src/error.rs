//! Error types for PolicyScore

use thiserror::Error;

/// Result type alias using PolicyScore Error
pub type Result<T> = std::result::Result<T, Error>;

/// PolicyScore error types
#[derive(Error, Debug)]
pub enum Error {
    // === Identity Errors ===
    #[error("Cannot resolve identifier {identifier}: {message}")]
    ResolutionFailed { identifier: String, message: String },

    // === Baseline Errors ===
    #[error("Invalid baseline ({category}): {message}")]
    InvalidBaseline { category: String, message: String },

    #[error("Duplicate key '{key}' in {category} baseline")]
    DuplicateKey { category: String, key: String },

    // === Snapshot Errors ===
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    // === Check Errors ===
    #[error("Check failed: {check} - {message}")]
    CheckFailed { check: String, message: String },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig { key: String, message: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // === Generic ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Check if this error should stop the run before any scoring happens
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::InvalidBaseline { .. }
                | Error::DuplicateKey { .. }
                | Error::InvalidSnapshot(_)
                | Error::Configuration(_)
                | Error::InvalidConfig { .. }
        )
    }

    /// Get an error code for logging
    pub fn code(&self) -> &'static str {
        match self {
            Error::ResolutionFailed { .. } => "RESOLUTION_FAILED",
            Error::InvalidBaseline { .. } => "INVALID_BASELINE",
            Error::DuplicateKey { .. } => "DUPLICATE_KEY",
            Error::InvalidSnapshot(_) => "INVALID_SNAPSHOT",
            Error::CheckFailed { .. } => "CHECK_FAILED",
            Error::Configuration(_) => "CONFIG_ERROR",
            Error::InvalidConfig { .. } => "INVALID_CONFIG",
            Error::Io(_) => "IO_ERROR",
            Error::FileNotFound { .. } => "FILE_NOT_FOUND",
            Error::Json(_) => "JSON_ERROR",
            Error::Yaml(_) => "YAML_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
