use crate::listing::{ListingView, Pagination, EVENT_TEMPLATE, LISTING_TEMPLATE};
use crate::services::AppState;
use crate::{Result, WebError};
use axum::{
    extract::{Path, State},
    response::Html,
    routing::get,
    Router,
};
use chrono::Local;

pub fn listing_routes(prefix: &str) -> Router<AppState> {
    Router::new()
        .route(&format!("{prefix}/"), get(upcoming_first))
        .route(&format!("{prefix}/page/{{page}}/"), get(upcoming_page))
        .route(&format!("{prefix}/archive/"), get(archive_first))
        .route(&format!("{prefix}/archive/page/{{page}}/"), get(archive_page))
        .route(&format!("{prefix}/event/{{id}}/"), get(event_page))
}

async fn upcoming_first(State(state): State<AppState>) -> Result<Html<String>> {
    render_listing(&state, ListingView::Upcoming, None).await
}

async fn upcoming_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> Result<Html<String>> {
    render_listing(&state, ListingView::Upcoming, Some(&page)).await
}

async fn archive_first(State(state): State<AppState>) -> Result<Html<String>> {
    render_listing(&state, ListingView::Archive, None).await
}

async fn archive_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> Result<Html<String>> {
    render_listing(&state, ListingView::Archive, Some(&page)).await
}

async fn event_page(State(state): State<AppState>, Path(id): Path<String>) -> Result<Html<String>> {
    let id: u64 = id
        .parse()
        .map_err(|_| WebError::NotFound(format!("Event '{id}'")))?;

    let context = state.listing().assemble_event(id).await?;
    state.render(EVENT_TEMPLATE, context).await
}

async fn render_listing(
    state: &AppState,
    view: ListingView,
    page: Option<&str>,
) -> Result<Html<String>> {
    let listing = state.listing();
    let pagination = Pagination::from_param(page, listing.page_size())
        .ok_or_else(|| WebError::NotFound(format!("Listing page '{}'", page.unwrap_or_default())))?;

    let today = Local::now().date_naive();
    let context = listing.assemble_view(view, pagination, today).await?;
    state.render(LISTING_TEMPLATE, context).await
}
