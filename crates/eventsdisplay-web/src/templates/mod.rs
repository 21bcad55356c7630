//! Theme templates: loading, helpers and the layout-aware render pipeline
//!
//! Templates are Handlebars files in the theme directory. A template may
//! name a layout on its first line with `{{!< layout}}`; the layout then
//! receives the rendered template as `body`.

mod helpers;
mod render;
mod store;

pub use helpers::{HelperEnv, HelperFn, HelperSet, HELPERS};
pub use render::Renderer;
pub use store::{parent_directive, LoadedTemplate, ParentTemplate, TemplateStore};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or rendering theme templates
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{name}' not found at {}", .path.display())]
    NotFound { name: String, path: PathBuf },

    #[error("Template '{name}' failed to compile: {source}")]
    Compile {
        name: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    #[error("Partials directory missing: {}", .0.display())]
    PartialDirectoryMissing(PathBuf),

    #[error("Template layout cycle: {}", .chain.join(" -> "))]
    Cycle { chain: Vec<String> },

    #[error("Template '{name}' failed to render: {source}")]
    Render {
        name: String,
        #[source]
        source: Box<handlebars::RenderError>,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
