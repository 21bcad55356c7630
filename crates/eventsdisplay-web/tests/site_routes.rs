//! End-to-end routing tests against the shipped theme

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use eventsdisplay_web::build_router;
use eventsdisplay_web::services::{
    AppState, Event, EventPage, EventQuery, EventsClient, EventsError, SuggestionClient,
    SuggestionError, SuggestionReceipt, SuggestionSubmission,
};
use eventsdisplay_web::submission::Suggestion;
use eventsdisplay_web::SiteConfig;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Default)]
struct FakeEvents {
    queries: Mutex<Vec<EventQuery>>,
}

fn event(id: u64, title: &str) -> Event {
    Event {
        id,
        title: title.to_string(),
        when_start: Some("2024-05-01 18:00".to_string()),
        when_end: None,
        agenda: Some("<p>Lightning talks and pizza</p>".to_string()),
        metainfo: Map::new(),
        extra: Map::new(),
    }
}

#[async_trait]
impl EventsClient for FakeEvents {
    async fn list_events(&self, query: &EventQuery) -> Result<EventPage, EventsError> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(EventPage {
            events: vec![event(42, "Rust meetup")],
            offset: query.offset,
            count: 1,
            total: 1,
        })
    }

    async fn get_event(&self, id: u64) -> Result<Event, EventsError> {
        match id {
            42 => Ok(event(42, "Rust meetup")),
            other => Err(EventsError::NotFound(other)),
        }
    }
}

#[derive(Default)]
struct MemorySuggestions {
    drafts: Mutex<HashMap<String, Suggestion>>,
}

impl MemorySuggestions {
    fn store(&self, submission: &SuggestionSubmission) -> SuggestionReceipt {
        let mut drafts = self.drafts.lock().unwrap();
        let secret = format!("s{}", drafts.len() + 1);
        drafts.insert(secret.clone(), submission.suggestion.clone());
        SuggestionReceipt {
            secret,
            extra: Map::new(),
        }
    }
}

#[async_trait]
impl SuggestionClient for MemorySuggestions {
    async fn suggest(
        &self,
        submission: &SuggestionSubmission,
    ) -> Result<SuggestionReceipt, SuggestionError> {
        Ok(self.store(submission))
    }

    async fn get(&self, secret: &str) -> Result<Suggestion, SuggestionError> {
        self.drafts
            .lock()
            .unwrap()
            .get(secret)
            .cloned()
            .ok_or(SuggestionError::NotFound)
    }

    async fn edit(
        &self,
        secret: &str,
        submission: &SuggestionSubmission,
    ) -> Result<SuggestionReceipt, SuggestionError> {
        let mut drafts = self.drafts.lock().unwrap();
        match drafts.get_mut(secret) {
            Some(draft) => {
                *draft = submission.suggestion.clone();
                Ok(SuggestionReceipt {
                    secret: secret.to_string(),
                    extra: Map::new(),
                })
            }
            None => Err(SuggestionError::NotFound),
        }
    }
}

struct Site {
    app: Router,
    events: Arc<FakeEvents>,
    suggestions: Arc<MemorySuggestions>,
}

fn site(url_prefix: &str) -> Site {
    let mut config = SiteConfig::default();
    config.site.templates_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("theme");
    config.site.url_prefix = url_prefix.to_string();
    config.site.page_size = 5;

    let events = Arc::new(FakeEvents::default());
    let suggestions = Arc::new(MemorySuggestions::default());
    let state = AppState::new(config, events.clone(), suggestions.clone());

    Site {
        app: build_router(state),
        events,
        suggestions,
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::HOST, "events.example.org")
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::HOST, "events.example.org")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

const VALID_FORM: &str = "title=Rust+meetup&agenda=Talks&when_start=2024-05-01+18%3A00\
&level=JUNIOR&submitter_email=ada%40example.org&include_time=on";

#[tokio::test]
async fn test_front_page_lists_upcoming_events() {
    let site = site("");

    let response = site.app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let html = body_text(response).await;
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("Upcoming events"));
    assert!(html.contains("Rust meetup"));
    assert!(html.contains("1.5.2024"));
    assert!(html.contains("/event/42/"));
    assert!(html.contains("Lightning talks and pizza"));
    assert!(!html.contains("rel=\"prev\""));

    let queries = site.events.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].offset, 0);
    assert_eq!(queries[0].count, 5);
    assert_eq!(queries[0].order_by, "when_start");
}

#[tokio::test]
async fn test_numbered_page_requests_matching_offset() {
    let site = site("");

    let response = site.app.clone().oneshot(get("/page/3/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("/page/2/"));
    assert!(html.contains("/page/4/"));
    assert_eq!(site.events.queries.lock().unwrap()[0].offset, 10);
}

#[tokio::test]
async fn test_invalid_page_numbers_are_not_found() {
    let site = site("");

    for uri in [
        "/page/0/",
        "/page/abc/",
        "/archive/page/-1/",
        "/page/18446744073709551615/",
        "/archive/page/18446744073709551615/",
    ] {
        let response = site.app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }
    assert!(site.events.queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_archive_uses_archive_links() {
    let site = site("");

    let response = site.app.clone().oneshot(get("/archive/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Past events"));
    assert!(html.contains("/archive/page/2/"));
    assert_eq!(site.events.queries.lock().unwrap()[0].order_by, "-when_start");
}

#[tokio::test]
async fn test_event_detail_and_missing_event() {
    let site = site("");

    let response = site.app.clone().oneshot(get("/event/42/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<h1>Rust meetup</h1>"));
    assert!(html.contains("01.05.2024 18:00"));
    assert!(html.contains("&lt;p&gt;Lightning talks and pizza&lt;/p&gt;"));
    assert!(!html.contains("<p>Lightning"));

    let response = site.app.clone().oneshot(get("/event/7/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("404"));

    let response = site.app.clone().oneshot(get("/event/nope/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_suggestion_form() {
    let site = site("");

    let response = site.app.clone().oneshot(get("/suggest/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Suggest an event"));
    assert!(html.contains("action=\"/suggest/\""));
    assert!(html.contains("<option value=\"NONE\" selected>"));
}

#[tokio::test]
async fn test_submit_edit_and_resubmit_cycle() {
    let site = site("");

    let response = site
        .app
        .clone()
        .oneshot(post_form("/suggest/", VALID_FORM))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/suggest/s1/");

    let stored = site.suggestions.drafts.lock().unwrap()["s1"].clone();
    assert_eq!(stored.title, "Rust meetup");
    assert!(!stored.only_date);

    let response = site.app.clone().oneshot(get("/suggest/s1/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Edit your suggestion"));
    assert!(html.contains("http://events.example.org/suggest/s1/"));
    assert!(html.contains("value=\"Rust meetup\""));
    assert!(html.contains("<option value=\"JUNIOR\" selected>"));

    let edited = VALID_FORM.replace("title=Rust+meetup", "title=Rust+workshop");
    let response = site
        .app
        .clone()
        .oneshot(post_form("/suggest/s1/", &edited))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/suggest/s1/");
    assert_eq!(
        site.suggestions.drafts.lock().unwrap()["s1"].title,
        "Rust workshop"
    );
}

#[tokio::test]
async fn test_invalid_submission_rerenders_with_errors() {
    let site = site("");

    let response = site
        .app
        .clone()
        .oneshot(post_form(
            "/suggest/",
            "title=&agenda=Talks&when_start=2024-05-01&submitter_email=ada%40example.org",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("This field is required."));
    assert!(html.contains(">Talks</textarea>"));
    assert!(site.suggestions.drafts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_resubmission_rerenders_edit_form() {
    let site = site("");

    let response = site
        .app
        .clone()
        .oneshot(post_form("/suggest/", VALID_FORM))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = site
        .app
        .clone()
        .oneshot(post_form(
            "/suggest/s1/",
            "title=&agenda=Revised+agenda&when_start=2024-06-02&level=SENIOR\
&submitter_email=ada%40example.org",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Edit your suggestion"));
    assert!(html.contains("This field is required."));
    assert!(html.contains(">Revised agenda</textarea>"));
    assert!(html.contains("value=\"2024-06-02\""));
    assert!(html.contains("<option value=\"SENIOR\" selected>"));
    assert!(html.contains("action=\"/suggest/s1/\""));
    assert!(html.contains("http://events.example.org/suggest/s1/"));

    let drafts = site.suggestions.drafts.lock().unwrap();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts["s1"].title, "Rust meetup");
    assert_eq!(drafts["s1"].agenda, "Talks");
}

#[tokio::test]
async fn test_unknown_secret_is_not_found() {
    let site = site("");

    let response = site.app.clone().oneshot(get("/suggest/missing/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_prefixed_deployment() {
    let site = site("/events");

    let response = site.app.clone().oneshot(get("/events/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("href=\"/events/assets/style.css\""));
    assert!(html.contains("/events/event/42/"));

    let response = site
        .app
        .clone()
        .oneshot(post_form("/events/suggest/", VALID_FORM))
        .await
        .unwrap();
    assert_eq!(response.headers()[header::LOCATION], "/events/suggest/s1/");

    let response = site
        .app
        .clone()
        .oneshot(get("/events/assets/style.css"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = site.app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_endpoint() {
    let site = site("/events");

    let response = site.app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["theme"], true);
    assert_eq!(body["url_prefix"], "/events");
}

#[tokio::test]
async fn test_health_reports_missing_theme() {
    let empty = tempfile::tempdir().unwrap();
    let mut config = SiteConfig::default();
    config.site.templates_dir = empty.path().join("theme");

    let state = AppState::new(
        config,
        Arc::new(FakeEvents::default()),
        Arc::new(MemorySuggestions::default()),
    );
    let response = build_router(state).oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["theme"], false);
}
