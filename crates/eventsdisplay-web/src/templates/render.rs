//! Layout-aware render pipeline

use super::{HelperSet, LoadedTemplate, TemplateError, TemplateStore};
use crate::context::PageContext;
use handlebars::{Handlebars, Template};
use std::collections::BTreeMap;

/// Renders theme templates, wrapping them in their layout when declared
#[derive(Debug, Clone)]
pub struct Renderer {
    store: TemplateStore,
    helpers: HelperSet,
}

impl Renderer {
    pub fn new(store: TemplateStore, helpers: HelperSet) -> Self {
        Self { store, helpers }
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Render `name` against `context`.
    ///
    /// When the template declares a layout, its output is stored in the
    /// context as `body` and the layout is rendered with that context.
    pub async fn render(&self, name: &str, mut context: PageContext) -> Result<String, TemplateError> {
        let loaded = self.store.load_template(name).await?;
        let partials = self.store.load_partials().await?;
        let registry = self.registry(&loaded, partials);

        let body = render_registered(&registry, &page_key(&loaded.name), &loaded.name, &context)?;

        match &loaded.parent {
            Some(parent) => {
                context.insert("body", body);
                render_registered(&registry, &layout_key(&parent.name), &parent.name, &context)
            }
            None => Ok(body),
        }
    }

    fn registry(
        &self,
        loaded: &LoadedTemplate,
        partials: BTreeMap<String, Template>,
    ) -> Handlebars<'static> {
        let mut registry = Handlebars::new();
        self.helpers.register(&mut registry);

        for (name, partial) in partials {
            registry.register_template(&name, partial);
        }
        registry.register_template(&page_key(&loaded.name), loaded.compiled.clone());
        if let Some(parent) = &loaded.parent {
            registry.register_template(&layout_key(&parent.name), parent.compiled.clone());
        }

        registry
    }
}

fn page_key(name: &str) -> String {
    format!("page::{name}")
}

fn layout_key(name: &str) -> String {
    format!("layout::{name}")
}

fn render_registered(
    registry: &Handlebars<'_>,
    key: &str,
    name: &str,
    context: &PageContext,
) -> Result<String, TemplateError> {
    registry
        .render(key, context)
        .map_err(|e| TemplateError::Render {
            name: name.to_string(),
            source: Box::new(e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::HelperEnv;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn theme(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("partials")).unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    fn renderer(dir: &TempDir) -> Renderer {
        Renderer::new(
            TemplateStore::new(dir.path()),
            HelperSet::new(HelperEnv::new("/assets")),
        )
    }

    #[tokio::test]
    async fn test_root_template_output_is_body() {
        let dir = theme(&[("hello.hbs", "<p>{{name}}</p>")]);
        let mut context = PageContext::new();
        context.insert("name", "Ada");

        let out = renderer(&dir).render("hello", context).await.unwrap();
        assert_eq!(out, "<p>Ada</p>");
    }

    #[tokio::test]
    async fn test_child_wrapped_in_layout() {
        let dir = theme(&[
            ("default.hbs", "<html><title>{{name}}</title>{{{body}}}</html>"),
            ("hello.hbs", "{{!< default}}\n<p>{{name}}</p>"),
        ]);
        let mut context = PageContext::new();
        context.insert("name", "Ada");

        let out = renderer(&dir).render("hello", context).await.unwrap();
        assert!(out.starts_with("<html><title>Ada</title>"));
        assert!(out.contains("<p>Ada</p>"));
        assert!(out.ends_with("</html>"));
    }

    #[tokio::test]
    async fn test_partials_and_helpers_inside_each() {
        let dir = theme(&[("list.hbs", "{{#each events}}{{> card}}{{/each}}")]);
        fs::write(
            dir.path().join("partials/card.hbs"),
            "[{{title}}|{{excerpt 2}}|{{date \"DD.MM\"}}|{{asset \"x.css\"}}]",
        )
        .unwrap();

        let mut context = PageContext::new();
        context.insert(
            "events",
            json!([
                {"title": "One", "agenda": "a b c", "when_start": "2024-05-01 10:00"},
                {"title": "Two", "agenda": "", "when_start": "2024-06-02"}
            ]),
        );

        let out = renderer(&dir).render("list", context).await.unwrap();
        assert_eq!(out, "[One|a b|1.5|/assets/x.css][Two||2.6|/assets/x.css]");
    }

    #[tokio::test]
    async fn test_values_are_html_escaped() {
        let dir = theme(&[("hello.hbs", "{{name}}")]);
        let mut context = PageContext::new();
        context.insert("name", "<script>");

        let out = renderer(&dir).render("hello", context).await.unwrap();
        assert_eq!(out, "&lt;script&gt;");
    }

    #[tokio::test]
    async fn test_missing_partials_directory_fails_render() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hello.hbs"), "hi").unwrap();

        let result = renderer(&dir).render("hello", PageContext::new()).await;
        assert!(matches!(result, Err(TemplateError::PartialDirectoryMissing(_))));
    }

    #[tokio::test]
    async fn test_unknown_partial_is_render_error() {
        let dir = theme(&[("hello.hbs", "{{> nowhere}}")]);

        let result = renderer(&dir).render("hello", PageContext::new()).await;
        assert!(matches!(result, Err(TemplateError::Render { .. })));
    }
}
