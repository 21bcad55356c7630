//! Submit → secret → edit → resubmit cycle

use super::schema::{FieldErrors, Level, SuggestionForm};
use crate::context::PageContext;
use crate::services::{SuggestionClient, SuggestionError, SuggestionSubmission};
use axum::http::{header, HeaderMap, Uri};
use serde_json::{json, Value};
use std::sync::Arc;

/// Theme template rendering the suggestion form
pub const SUGGEST_TEMPLATE: &str = "suggest";

/// Result of posting the form
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    /// Stored upstream; the secret addresses the draft from now on
    Saved { secret: String },
    /// Rejected locally; nothing was sent upstream
    Invalid {
        form: SuggestionForm,
        errors: FieldErrors,
    },
}

/// Forwards validated suggestions to the suggestion service
#[derive(Clone)]
pub struct SubmissionFlow {
    suggestions: Arc<dyn SuggestionClient>,
    team_id: String,
}

impl SubmissionFlow {
    pub fn new(suggestions: Arc<dyn SuggestionClient>, team_id: impl Into<String>) -> Self {
        Self {
            suggestions,
            team_id: team_id.into(),
        }
    }

    pub async fn submit(&self, form: SuggestionForm) -> Result<FormOutcome, SuggestionError> {
        let suggestion = match form.normalize() {
            Ok(suggestion) => suggestion,
            Err(errors) => return Ok(FormOutcome::Invalid { form, errors }),
        };

        let receipt = self
            .suggestions
            .suggest(&SuggestionSubmission {
                suggestion,
                team: self.team_id.clone(),
            })
            .await?;

        tracing::info!("Suggestion stored");
        Ok(FormOutcome::Saved {
            secret: receipt.secret,
        })
    }

    /// Current values of the draft behind `secret`, shaped as form input
    pub async fn load(&self, secret: &str) -> Result<SuggestionForm, SuggestionError> {
        let suggestion = self.suggestions.get(secret).await?;
        Ok(SuggestionForm::from(&suggestion))
    }

    pub async fn resubmit(
        &self,
        secret: &str,
        form: SuggestionForm,
    ) -> Result<FormOutcome, SuggestionError> {
        let suggestion = match form.normalize() {
            Ok(suggestion) => suggestion,
            Err(errors) => return Ok(FormOutcome::Invalid { form, errors }),
        };

        let receipt = self
            .suggestions
            .edit(
                secret,
                &SuggestionSubmission {
                    suggestion,
                    team: self.team_id.clone(),
                },
            )
            .await?;

        tracing::info!(rotated = receipt.secret != secret, "Suggestion updated");
        Ok(FormOutcome::Saved {
            secret: receipt.secret,
        })
    }
}

/// Everything the suggestion template needs for one rendering
#[derive(Debug, Clone, Default)]
pub struct FormView {
    pub form: SuggestionForm,
    pub errors: FieldErrors,
    /// Secret and display URL when editing an existing draft
    pub edit: Option<(String, String)>,
}

impl FormView {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn editing(form: SuggestionForm, secret: &str, edit_url: String) -> Self {
        Self {
            form,
            errors: FieldErrors::default(),
            edit: Some((secret.to_string(), edit_url)),
        }
    }

    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = errors;
        self
    }

    pub fn into_context(self, mut context: PageContext) -> Result<PageContext, serde_json::Error> {
        let url_prefix = context
            .get("url_prefix")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let selected = self.form.level.trim();
        let levels: Vec<Value> = Level::ALL
            .iter()
            .map(|level| {
                let value = level.as_str();
                let is_selected = value == selected || (selected.is_empty() && *level == Level::None);
                json!({ "value": value, "selected": is_selected })
            })
            .collect();

        context.insert("include_time", self.form.include_time());
        context.insert("form", serde_json::to_value(&self.form)?);
        context.insert("has_errors", !self.errors.is_empty());
        context.insert("errors", serde_json::to_value(&self.errors)?);
        context.insert("levels", levels);

        match self.edit {
            Some((secret, edit_url)) => {
                context.insert("edit", true);
                context.insert("action", edit_path(&url_prefix, &secret));
                context.insert("secret", secret);
                context.insert("edit_url", edit_url);
            }
            None => {
                context.insert("edit", false);
                context.insert("action", format!("{url_prefix}/suggest/"));
            }
        }

        Ok(context)
    }
}

/// Site path of the edit view for `secret`
pub fn edit_path(url_prefix: &str, secret: &str) -> String {
    format!("{url_prefix}/suggest/{}/", urlencoding::encode(secret))
}

/// Absolute URL of the current request, as the visitor addressed it
pub fn request_url(headers: &HeaderMap, uri: &Uri) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.scheme_str())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or("localhost");

    format!("{scheme}://{host}{}", uri.path())
}
