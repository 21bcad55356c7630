use crate::assets::static_routes;
use crate::routes::{health_routes, listing_routes, suggest_routes};
use crate::services::{init_state, AppState};
use crate::{Result, WebError};
use axum::extract::DefaultBodyLimit;
use axum::Router;
use eventsdisplay_config::SiteConfig;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;

const MAX_FORM_SIZE_1MB: usize = 1024 * 1024;

/// Every page and asset route, mounted under the configured URL prefix
pub fn build_router(state: AppState) -> Router {
    let prefix = state.url_prefix().to_string();
    let assets = static_routes(&state.config.site);

    Router::new()
        .merge(listing_routes(&prefix))
        .merge(suggest_routes(&prefix))
        .merge(health_routes())
        .with_state(state)
        .merge(assets)
        .layer(DefaultBodyLimit::max(MAX_FORM_SIZE_1MB))
        .layer(TraceLayer::new_for_http())
}

pub async fn start_server(config: SiteConfig) -> Result<()> {
    let addr: SocketAddr = config
        .server
        .bind_address()
        .parse()
        .map_err(|e| WebError::Config(format!("Invalid address: {e}")))?;

    let state = init_state(config)?;
    let app = build_router(state);

    tracing::info!("Starting events site on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(WebError::Io)?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(WebError::Io)?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
