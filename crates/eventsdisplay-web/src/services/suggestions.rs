//! Client for the remote suggestion service
//!
//! The service stores draft events and hands back a secret token for each
//! one. Possessing the token is what allows editing that draft.

use super::{field_errors, format_field_errors, CLIENT_KEY_HEADER};
use crate::submission::Suggestion;
use async_trait::async_trait;
use eventsdisplay_config::SuggestionServiceConfig;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors from the suggestion service
#[derive(Debug, Error)]
pub enum SuggestionError {
    /// 400 response with field-level messages
    #[error("{}", format_field_errors(.0))]
    Validation(BTreeMap<String, String>),

    /// No suggestion is stored under the given secret
    #[error("Suggestion not found")]
    NotFound,

    /// Any other non-2xx response
    #[error("Suggestion Service returned {status} error")]
    Service { status: u16 },

    /// Transport failure, timeout or undecodable body
    #[error("Suggestion Service request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// A validated suggestion plus the team it is filed under
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionSubmission {
    #[serde(flatten)]
    pub suggestion: Suggestion,
    pub team: String,
}

/// Service acknowledgement carrying the (possibly rotated) secret
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SuggestionReceipt {
    pub secret: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[async_trait]
pub trait SuggestionClient: Send + Sync {
    async fn suggest(
        &self,
        submission: &SuggestionSubmission,
    ) -> Result<SuggestionReceipt, SuggestionError>;

    async fn get(&self, secret: &str) -> Result<Suggestion, SuggestionError>;

    async fn edit(
        &self,
        secret: &str,
        submission: &SuggestionSubmission,
    ) -> Result<SuggestionReceipt, SuggestionError>;
}

/// HTTP implementation: `POST suggestions`, `GET`/`PUT suggestions/{secret}`
#[derive(Debug, Clone)]
pub struct HttpSuggestionClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpSuggestionClient {
    pub fn new(config: &SuggestionServiceConfig) -> Result<Self, SuggestionError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &SuggestionServiceConfig) -> Self {
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn secret_url(&self, secret: &str) -> String {
        format!("{}/suggestions/{}", self.base_url, urlencoding::encode(secret))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(CLIENT_KEY_HEADER, key),
            None => request,
        }
    }
}

#[async_trait]
impl SuggestionClient for HttpSuggestionClient {
    async fn suggest(
        &self,
        submission: &SuggestionSubmission,
    ) -> Result<SuggestionReceipt, SuggestionError> {
        tracing::debug!(team = %submission.team, "Forwarding new suggestion");

        let request = self
            .client
            .post(format!("{}/suggestions", self.base_url))
            .json(submission);
        let response = check_status(self.authorized(request).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn get(&self, secret: &str) -> Result<Suggestion, SuggestionError> {
        let request = self.client.get(self.secret_url(secret));
        let response = check_status(self.authorized(request).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn edit(
        &self,
        secret: &str,
        submission: &SuggestionSubmission,
    ) -> Result<SuggestionReceipt, SuggestionError> {
        tracing::debug!(team = %submission.team, "Forwarding suggestion edit");

        let request = self.client.put(self.secret_url(secret)).json(submission);
        let response = check_status(self.authorized(request).send().await?).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: Response) -> Result<Response, SuggestionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::NOT_FOUND => Err(SuggestionError::NotFound),
        StatusCode::BAD_REQUEST => match field_errors(response).await {
            Some(errors) => Err(SuggestionError::Validation(errors)),
            None => Err(SuggestionError::Service { status: 400 }),
        },
        _ => Err(SuggestionError::Service {
            status: status.as_u16(),
        }),
    }
}
