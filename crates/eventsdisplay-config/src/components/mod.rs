//! Configuration sections
//!
//! One file per concern; [`crate::SiteConfig`] composes them.

pub mod monitoring;
pub mod networking;
pub mod services;
pub mod site;

pub use monitoring::*;
pub use networking::*;
pub use services::*;
pub use site::*;
