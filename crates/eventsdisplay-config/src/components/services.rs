//! Remote collaborator configuration
//!
//! The site owns no storage. Events are read from the events service and
//! suggestions are stored by the suggestion service.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default timeout applied to every outbound call
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Events service connection settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EventsServiceConfig {
    /// Base URL, without trailing slash
    pub url: String,
    /// Client credential sent as the `Client-Key` header
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EventsServiceConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5000".to_string(),
            api_key: "424242".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl EventsServiceConfig {
    /// Request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Suggestion service connection settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SuggestionServiceConfig {
    /// Base URL, without trailing slash
    pub url: String,
    /// Optional client credential sent as the `Client-Key` header
    pub api_key: Option<String>,
    /// Team identifier attached to every forwarded suggestion
    pub team_id: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SuggestionServiceConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5001".to_string(),
            api_key: None,
            team_id: "default".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SuggestionServiceConfig {
    /// Request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
