//! Remote collaborators and the shared request state

pub mod events;
pub mod state;
pub mod suggestions;

pub use events::{Event, EventPage, EventQuery, EventsClient, EventsError, HttpEventsClient};
pub use state::{init_state, AppState};
pub use suggestions::{
    HttpSuggestionClient, SuggestionClient, SuggestionError, SuggestionReceipt,
    SuggestionSubmission,
};

use reqwest::Response;
use serde_json::Value;
use std::collections::BTreeMap;

const CLIENT_KEY_HEADER: &str = "Client-Key";

/// Field-keyed messages from a 400 response body, if it carries any
async fn field_errors(response: Response) -> Option<BTreeMap<String, String>> {
    match response.json::<Value>().await {
        Ok(Value::Object(fields)) if !fields.is_empty() => Some(
            fields
                .into_iter()
                .map(|(field, message)| {
                    let message = match message {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    (field, message)
                })
                .collect(),
        ),
        _ => None,
    }
}

fn format_field_errors(errors: &BTreeMap<String, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message} [api]"))
        .collect::<Vec<_>>()
        .join("; ")
}
