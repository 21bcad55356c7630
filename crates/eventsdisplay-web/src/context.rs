//! Per-request render context

use serde::Serialize;
use serde_json::{Map, Value};

/// String-keyed values handed to the template engine.
///
/// Built per request from the base site fields, remote data and pagination.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PageContext(Map<String, Value>);

impl PageContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed site identity fields every page starts from
    pub fn base(url_prefix: &str) -> Self {
        let mut context = Self::new();
        context.insert("events_site", "yes");
        context.insert("url_prefix", url_prefix);
        context
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Merge the top-level fields of `value`; non-object values are ignored
    pub fn merge<T: Serialize>(&mut self, value: &T) -> Result<(), serde_json::Error> {
        if let Value::Object(fields) = serde_json::to_value(value)? {
            self.0.extend(fields);
        }
        Ok(())
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}
