//! Template store backed by the theme directory
//!
//! Nothing is cached: every call reads and compiles from disk, so an edited
//! template is visible on the next request.

use super::TemplateError;
use handlebars::Template;
use regex::Regex;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const TEMPLATE_EXTENSION: &str = "hbs";
const PARTIALS_DIR: &str = "partials";

static PARENT_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{\{!<[ ]*([^}]+)\}\}").expect("valid layout directive pattern"));

/// A compiled template and the compiled layout it declared, if any
#[derive(Debug, Clone)]
pub struct LoadedTemplate {
    pub name: String,
    pub compiled: Template,
    pub parent: Option<ParentTemplate>,
}

/// Immediate layout of a [`LoadedTemplate`]
#[derive(Debug, Clone)]
pub struct ParentTemplate {
    pub name: String,
    pub compiled: Template,
}

/// Reads `{base_dir}/{name}.hbs` and `{base_dir}/partials/*`
#[derive(Debug, Clone)]
pub struct TemplateStore {
    base_dir: PathBuf,
}

impl TemplateStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn template_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{name}.{TEMPLATE_EXTENSION}"))
    }

    pub fn partials_dir(&self) -> PathBuf {
        self.base_dir.join(PARTIALS_DIR)
    }

    /// Load `name` and its layout.
    ///
    /// Layouts of the layout are loaded too, so a broken or cyclic chain is
    /// reported, but only the immediate layout is returned.
    pub async fn load_template(&self, name: &str) -> Result<LoadedTemplate, TemplateError> {
        let (compiled, mut next) = self.compile_file(name).await?;
        let mut chain = vec![name.to_string()];
        let mut parent = None;

        while let Some(parent_name) = next {
            let seen = chain.contains(&parent_name);
            chain.push(parent_name.clone());
            if seen {
                return Err(TemplateError::Cycle { chain });
            }

            let (parent_compiled, grandparent) = self.compile_file(&parent_name).await?;
            if parent.is_none() {
                parent = Some(ParentTemplate {
                    name: parent_name,
                    compiled: parent_compiled,
                });
            }
            next = grandparent;
        }

        tracing::debug!(template = name, layout = ?parent.as_ref().map(|p| &p.name), "Loaded template");

        Ok(LoadedTemplate {
            name: name.to_string(),
            compiled,
            parent,
        })
    }

    /// Compile every file in the partials directory, keyed by file stem.
    ///
    /// One bad partial fails the whole set.
    pub async fn load_partials(&self) -> Result<BTreeMap<String, Template>, TemplateError> {
        let dir = self.partials_dir();
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(TemplateError::PartialDirectoryMissing(dir));
            }
            Err(source) => return Err(TemplateError::Io { path: dir, source }),
        };

        let mut partials = BTreeMap::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(source) => return Err(TemplateError::Io { path: dir, source }),
            };

            let path = entry.path();
            let is_file = entry
                .file_type()
                .await
                .map_err(|source| TemplateError::Io {
                    path: path.clone(),
                    source,
                })?
                .is_file();
            if !is_file {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let source = read_source(stem, &path).await?;
            let compiled = compile(stem, &source)?;
            partials.insert(stem.to_string(), compiled);
        }

        Ok(partials)
    }

    async fn compile_file(&self, name: &str) -> Result<(Template, Option<String>), TemplateError> {
        let path = self.template_path(name);
        let source = read_source(name, &path).await?;
        let compiled = compile(name, &source)?;
        Ok((compiled, parent_directive(&source)))
    }
}

/// Layout named by a `{{!< name}}` directive at the very start of the first line
pub fn parent_directive(source: &str) -> Option<String> {
    let first_line = source.split('\n').next().unwrap_or_default();
    PARENT_DIRECTIVE
        .captures(first_line)
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| !name.is_empty())
}

async fn read_source(name: &str, path: &Path) -> Result<String, TemplateError> {
    tokio::fs::read_to_string(path).await.map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            TemplateError::NotFound {
                name: name.to_string(),
                path: path.to_path_buf(),
            }
        } else {
            TemplateError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

fn compile(name: &str, source: &str) -> Result<Template, TemplateError> {
    Template::compile(source).map_err(|e| TemplateError::Compile {
        name: name.to_string(),
        source: Box::new(e),
    })
}
