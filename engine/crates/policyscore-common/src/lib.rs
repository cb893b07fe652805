//! PolicyScore Common - Shared utilities: configuration and logging
//!
//! This crate provides common functionality used by the PolicyScore binaries.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigBuilder};
pub use logging::{init_logging_with_config, LogConfig, LogFormat};
