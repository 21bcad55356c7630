//! Event suggestion workflow
//!
//! A visitor submits a draft event, receives a secret edit link, and can
//! revise the draft through that link. Storage is the suggestion service's.

mod flow;
mod schema;

pub use flow::{edit_path, request_url, FormOutcome, FormView, SubmissionFlow, SUGGEST_TEMPLATE};
pub use schema::{FieldErrors, Level, Suggestion, SuggestionForm};
