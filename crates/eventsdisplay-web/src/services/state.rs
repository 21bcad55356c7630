use super::{EventsClient, HttpEventsClient, HttpSuggestionClient, SuggestionClient};
use crate::context::PageContext;
use crate::listing::ListingAssembler;
use crate::submission::SubmissionFlow;
use crate::templates::{HelperEnv, HelperSet, Renderer, TemplateStore};
use crate::{Result, WebError};
use axum::response::Html;
use eventsdisplay_config::SiteConfig;
use std::sync::Arc;

/// Shared by every request handler; cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub renderer: Arc<Renderer>,
    pub events: Arc<dyn EventsClient>,
    pub suggestions: Arc<dyn SuggestionClient>,
    pub config: Arc<SiteConfig>,
}

impl AppState {
    pub fn new(
        config: SiteConfig,
        events: Arc<dyn EventsClient>,
        suggestions: Arc<dyn SuggestionClient>,
    ) -> Self {
        let store = TemplateStore::new(&config.site.templates_dir);
        let helpers = HelperSet::new(HelperEnv::new(config.site.assets_url()));

        Self {
            renderer: Arc::new(Renderer::new(store, helpers)),
            events,
            suggestions,
            config: Arc::new(config),
        }
    }

    pub fn url_prefix(&self) -> &str {
        &self.config.site.url_prefix
    }

    pub fn base_context(&self) -> PageContext {
        PageContext::base(self.url_prefix())
    }

    pub fn listing(&self) -> ListingAssembler<'_> {
        ListingAssembler::new(
            self.events.as_ref(),
            self.config.site.page_size,
            self.url_prefix(),
        )
    }

    pub fn submissions(&self) -> SubmissionFlow {
        SubmissionFlow::new(
            Arc::clone(&self.suggestions),
            self.config.suggestions.team_id.clone(),
        )
    }

    pub async fn render(&self, template: &str, context: PageContext) -> Result<Html<String>> {
        let html = self.renderer.render(template, context).await?;
        Ok(Html(html))
    }
}

/// Open the outbound HTTP clients; they live as long as the returned state
pub fn init_state(config: SiteConfig) -> Result<AppState> {
    let events = HttpEventsClient::new(&config.events)
        .map_err(|e| WebError::Config(format!("Failed to create events client: {e}")))?;
    let suggestions = HttpSuggestionClient::new(&config.suggestions)
        .map_err(|e| WebError::Config(format!("Failed to create suggestion client: {e}")))?;

    tracing::info!(
        events = %config.events.url,
        suggestions = %config.suggestions.url,
        templates = %config.site.templates_dir.display(),
        "Collaborator clients ready"
    );

    Ok(AppState::new(config, Arc::new(events), Arc::new(suggestions)))
}
