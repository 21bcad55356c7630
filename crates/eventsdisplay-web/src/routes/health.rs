//! Liveness probe reporting whether the theme is readable

use crate::services::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let partials = state.renderer.store().partials_dir();
    let theme_ready = tokio::fs::try_exists(&partials).await.unwrap_or(false);

    if !theme_ready {
        tracing::warn!(path = %partials.display(), "Theme partials directory is missing");
    }

    let (status, label) = if theme_ready {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(json!({
            "status": label,
            "theme": theme_ready,
            "url_prefix": state.url_prefix(),
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
