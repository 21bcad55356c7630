//! # Events Display Configuration
//!
//! Typed configuration for the events display site: where the remote events
//! and suggestion services live, how the site is mounted, and how it logs.
//!
//! Configuration is layered:
//!
//! 1. Built-in defaults (every section implements `Default`)
//! 2. An optional TOML file
//! 3. Environment variable overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use eventsdisplay_config::SiteConfig;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SiteConfig::load(None)?;
//!     println!("{} events per page", config.site.page_size);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod components;
mod config;
mod env;
mod error;

pub use components::*;
pub use config::*;
pub use error::{ConfigError, ConfigResult};
