//! Static theme assets

use axum::Router;
use eventsdisplay_config::SiteSection;
use tower_http::services::ServeDir;

/// Serve the theme's asset directory under the configured mount
pub fn static_routes(site: &SiteSection) -> Router {
    let dir = site.assets_dir();
    tracing::info!("Serving static assets from: {}", dir.display());
    Router::new().nest_service(&site.assets_url(), ServeDir::new(dir))
}
