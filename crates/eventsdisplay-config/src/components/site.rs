//! Site presentation settings

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How the site is mounted and where its theme lives
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteSection {
    /// Events shown per listing page
    pub page_size: u64,
    /// Path prefix the deployment is mounted under (`""` or `/something`)
    pub url_prefix: String,
    /// Theme directory holding `*.hbs` templates and `partials/`
    pub templates_dir: PathBuf,
    /// Static asset directory; defaults to `{templates_dir}/assets`
    pub assets_dir: Option<PathBuf>,
    /// URL path static assets are served under, relative to the prefix
    pub assets_mount: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            page_size: 10,
            url_prefix: String::new(),
            templates_dir: PathBuf::from("theme"),
            assets_dir: None,
            assets_mount: "/assets".to_string(),
        }
    }
}

impl SiteSection {
    /// Resolved static asset directory
    pub fn assets_dir(&self) -> PathBuf {
        self.assets_dir
            .clone()
            .unwrap_or_else(|| self.templates_dir.join("assets"))
    }

    /// Externally visible URL path of the asset mount, prefix included
    pub fn assets_url(&self) -> String {
        format!("{}{}", self.url_prefix, self.assets_mount)
    }
}
