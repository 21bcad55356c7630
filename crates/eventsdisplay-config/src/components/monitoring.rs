//! Monitoring component configuration

use serde::{Deserialize, Serialize};

/// Logging configuration consumed by the binary when installing the subscriber
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. `info` or `eventsdisplay_web=debug`
    pub level: String,
    /// Whether to emit ANSI colours
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: true,
        }
    }
}
