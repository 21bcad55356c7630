//! Environment variable overrides

use crate::config::SiteConfig;
use std::path::PathBuf;
use std::str::FromStr;

impl SiteConfig {
    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup (used by tests)
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("EVENTS_SERVICE_URL") {
            self.events.url = url;
        }
        if let Some(key) = lookup("EVENTS_API_KEY") {
            self.events.api_key = key;
        }
        parse_into(&lookup, "EVENTS_TIMEOUT_SECS", &mut self.events.timeout_secs);

        if let Some(url) = lookup("SUGGEST_SERVICE_URL") {
            self.suggestions.url = url;
        }
        if let Some(key) = lookup("SUGGEST_API_KEY") {
            self.suggestions.api_key = Some(key);
        }
        if let Some(team) = lookup("SUGGEST_TEAM_ID") {
            self.suggestions.team_id = team;
        }
        parse_into(&lookup, "SUGGEST_TIMEOUT_SECS", &mut self.suggestions.timeout_secs);

        parse_into(&lookup, "EVENTS_PER_PAGE", &mut self.site.page_size);
        if let Some(prefix) = lookup("EVENTS_URL_PREFIX") {
            self.site.url_prefix = prefix;
        }
        if let Some(dir) = lookup("EVENTS_TEMPLATES_DIR") {
            self.site.templates_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("EVENTS_ASSETS_DIR") {
            self.site.assets_dir = Some(PathBuf::from(dir));
        }

        if let Some(host) = lookup("EVENTS_HOST") {
            self.server.host = host;
        }
        parse_into(&lookup, "EVENTS_PORT", &mut self.server.port);

        if let Some(level) = lookup("EVENTS_LOG_LEVEL") {
            self.logging.level = level;
        }
    }
}

fn parse_into<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(value) => *target = value,
            Err(_) => tracing::warn!(key, value = %raw, "Ignoring unparseable environment override"),
        }
    }
}
