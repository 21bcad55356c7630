//! Request-level errors and their HTTP responses

use crate::services::{EventsError, SuggestionError};
use crate::templates::TemplateError;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WebError>;

#[derive(Debug, Error)]
pub enum WebError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Events(#[from] EventsError),

    #[error(transparent)]
    Suggestions(#[from] SuggestionError),

    #[error("Failed to build page context: {0}")]
    Context(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Events(EventsError::NotFound(_))
            | WebError::Suggestions(SuggestionError::NotFound)
            | WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Events(_) | WebError::Suggestions(_) => StatusCode::BAD_GATEWAY,
            WebError::Template(_) | WebError::Context(_) | WebError::Config(_) | WebError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request failed");
        }
        (status, Html(failure_page(status))).into_response()
    }
}

/// Generic failure page; the cause stays in the logs
fn failure_page(status: StatusCode) -> String {
    let message = match status {
        StatusCode::NOT_FOUND => "The page you are looking for does not exist.",
        StatusCode::BAD_GATEWAY => "The events service is unavailable right now. Please try again later.",
        _ => "Something went wrong on our side. Please try again later.",
    };
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{code}</title></head>\
         <body><h1>{code} {reason}</h1><p>{message}</p></body></html>",
        code = status.as_u16(),
        reason = status.canonical_reason().unwrap_or("Error"),
    )
}
