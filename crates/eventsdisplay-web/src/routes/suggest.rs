use crate::services::AppState;
use crate::submission::{
    edit_path, request_url, FormOutcome, FormView, SuggestionForm, SUGGEST_TEMPLATE,
};
use crate::Result;
use axum::{
    extract::{OriginalUri, Path, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};

pub fn suggest_routes(prefix: &str) -> Router<AppState> {
    Router::new()
        .route(&format!("{prefix}/suggest/"), get(blank_form).post(submit))
        .route(
            &format!("{prefix}/suggest/{{secret}}/"),
            get(edit_form).post(resubmit),
        )
}

async fn blank_form(State(state): State<AppState>) -> Result<Response> {
    render_form(&state, FormView::blank()).await
}

async fn submit(
    State(state): State<AppState>,
    Form(form): Form<SuggestionForm>,
) -> Result<Response> {
    match state.submissions().submit(form).await? {
        FormOutcome::Saved { secret } => Ok(redirect_to_edit(&state, &secret)),
        FormOutcome::Invalid { form, errors } => {
            tracing::debug!(?errors, "Suggestion form rejected");
            render_form(&state, FormView { form, errors, edit: None }).await
        }
    }
}

async fn edit_form(
    State(state): State<AppState>,
    Path(secret): Path<String>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Result<Response> {
    let form = state.submissions().load(&secret).await?;
    let edit_url = request_url(&headers, &uri);
    render_form(&state, FormView::editing(form, &secret, edit_url)).await
}

async fn resubmit(
    State(state): State<AppState>,
    Path(secret): Path<String>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Form(form): Form<SuggestionForm>,
) -> Result<Response> {
    match state.submissions().resubmit(&secret, form).await? {
        FormOutcome::Saved { secret } => Ok(redirect_to_edit(&state, &secret)),
        FormOutcome::Invalid { form, errors } => {
            let edit_url = request_url(&headers, &uri);
            let view = FormView::editing(form, &secret, edit_url).with_errors(errors);
            render_form(&state, view).await
        }
    }
}

async fn render_form(state: &AppState, view: FormView) -> Result<Response> {
    let context = view.into_context(state.base_context())?;
    Ok(state.render(SUGGEST_TEMPLATE, context).await?.into_response())
}

fn redirect_to_edit(state: &AppState, secret: &str) -> Response {
    Redirect::to(&edit_path(state.url_prefix(), secret)).into_response()
}
