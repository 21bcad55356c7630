//! Top-level site configuration and loading

use crate::components::{
    EventsServiceConfig, LoggingConfig, ServerConfig, SiteSection, SuggestionServiceConfig,
};
use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete configuration for the events display site
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// HTTP bind address
    pub server: ServerConfig,
    /// Events service (read-only listing source)
    pub events: EventsServiceConfig,
    /// Suggestion service (draft storage)
    pub suggestions: SuggestionServiceConfig,
    /// Presentation settings
    pub site: SiteSection,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl SiteConfig {
    /// Load configuration: defaults, then `path` if given, then environment.
    ///
    /// The result is validated before it is returned.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from TOML text; omitted keys keep their defaults
    pub fn from_toml_str(raw: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> ConfigResult<()> {
        if self.site.page_size == 0 {
            return Err(ConfigError::Invalid(
                "site.page_size must be at least 1".to_string(),
            ));
        }

        for (key, timeout) in [
            ("events.timeout_secs", self.events.timeout_secs),
            ("suggestions.timeout_secs", self.suggestions.timeout_secs),
        ] {
            if timeout == 0 {
                return Err(ConfigError::Invalid(format!("{key} must be at least 1")));
            }
        }

        let prefix = &self.site.url_prefix;
        if !prefix.is_empty() && (!prefix.starts_with('/') || prefix.ends_with('/')) {
            return Err(ConfigError::Invalid(format!(
                "site.url_prefix must be empty or look like \"/path\", got {prefix:?}"
            )));
        }

        if !self.site.assets_mount.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "site.assets_mount must start with '/', got {:?}",
                self.site.assets_mount
            )));
        }

        for (key, value) in [
            ("events.url", &self.events.url),
            ("suggestions.url", &self.suggestions.url),
        ] {
            url::Url::parse(value)
                .map_err(|e| ConfigError::Invalid(format!("{key} is not a valid URL: {e}")))?;
        }

        Ok(())
    }
}
