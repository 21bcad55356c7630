pub mod context;
pub mod listing;
pub mod routes;
pub mod server;
pub mod services;
pub mod submission;
pub mod templates;

mod assets;
mod error;

pub use eventsdisplay_config::SiteConfig;
pub use error::{Result, WebError};
pub use server::{build_router, start_server};
