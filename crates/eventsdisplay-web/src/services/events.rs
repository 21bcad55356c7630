//! Client for the remote events service
//!
//! The service owns all event data; the site only reads it. Each event's
//! `metainfo` arrives as a JSON-encoded string and is decoded into a map
//! before it reaches a template.

use super::{field_errors, format_field_errors, CLIENT_KEY_HEADER};
use async_trait::async_trait;
use eventsdisplay_config::EventsServiceConfig;
use reqwest::{Client, Response, StatusCode};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors from the events service
#[derive(Debug, Error)]
pub enum EventsError {
    /// 400 response with field-level messages
    #[error("{}", format_field_errors(.0))]
    Validation(BTreeMap<String, String>),

    /// The requested event does not exist
    #[error("Event {0} not found")]
    NotFound(u64),

    /// Any other non-2xx response
    #[error("Events Service returned {status} error")]
    Service { status: u16 },

    /// Transport failure, timeout or undecodable body
    #[error("Events Service request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// One page of events as returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPage {
    pub events: Vec<Event>,
    pub offset: u64,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub total: u64,
}

/// An event record; fields the site does not know about are kept in `extra`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub when_start: Option<String>,
    #[serde(default)]
    pub when_end: Option<String>,
    #[serde(default)]
    pub agenda: Option<String>,
    #[serde(default, deserialize_with = "decode_metainfo")]
    pub metainfo: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Listing request parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub offset: u64,
    pub count: u64,
    /// Sort key; a leading `-` sorts descending
    pub order_by: String,
    /// Filter expression, e.g. `when_start >= '2024-01-01'`
    pub filter: String,
}

#[async_trait]
pub trait EventsClient: Send + Sync {
    async fn list_events(&self, query: &EventQuery) -> Result<EventPage, EventsError>;

    async fn get_event(&self, id: u64) -> Result<Event, EventsError>;
}

/// HTTP implementation talking to `GET events` and `GET events/{id}`
#[derive(Debug, Clone)]
pub struct HttpEventsClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpEventsClient {
    pub fn new(config: &EventsServiceConfig) -> Result<Self, EventsError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &EventsServiceConfig) -> Self {
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl EventsClient for HttpEventsClient {
    async fn list_events(&self, query: &EventQuery) -> Result<EventPage, EventsError> {
        tracing::debug!(
            offset = query.offset,
            count = query.count,
            order_by = %query.order_by,
            "Fetching events"
        );

        let response = self
            .client
            .get(format!("{}/events", self.base_url))
            .header(CLIENT_KEY_HEADER, &self.api_key)
            .query(&[
                ("count", query.count.to_string()),
                ("offset", query.offset.to_string()),
                ("order_by", query.order_by.clone()),
                ("query", query.filter.clone()),
            ])
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn get_event(&self, id: u64) -> Result<Event, EventsError> {
        tracing::debug!(id, "Fetching event");

        let response = self
            .client
            .get(format!("{}/events/{id}", self.base_url))
            .header(CLIENT_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(EventsError::NotFound(id));
        }
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: Response) -> Result<Response, EventsError> {
    let status = response.status();
    if status.as_u16() <= 299 {
        return Ok(response);
    }

    if status == StatusCode::BAD_REQUEST {
        if let Some(errors) = field_errors(response).await {
            return Err(EventsError::Validation(errors));
        }
    }

    Err(EventsError::Service {
        status: status.as_u16(),
    })
}

fn decode_metainfo<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map),
        Value::String(encoded) if encoded.trim().is_empty() => Ok(Map::new()),
        Value::String(encoded) => serde_json::from_str(&encoded)
            .map_err(|e| D::Error::custom(format!("metainfo is not a JSON object: {e}"))),
        other => Err(D::Error::custom(format!(
            "metainfo must be an encoded JSON object, got {other}"
        ))),
    }
}
