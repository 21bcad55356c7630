//! Rendering helpers available to every theme template
//!
//! Helpers are plain functions in a static table. Each one receives the
//! template's current `this` value and its positional arguments and returns
//! the text to splice into the output. Missing or empty fields never fail a
//! render; the helper falls back or returns an empty string.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext,
};
use regex::Regex;
use serde_json::Value;
use std::fmt::Write;
use std::sync::{Arc, LazyLock};

/// Signature shared by every helper: environment, current `this`, arguments
pub type HelperFn = fn(&HelperEnv, &Value, &[Value]) -> String;

/// Every helper the templates can call, by name
pub const HELPERS: &[(&str, HelperFn)] = &[
    ("asset", asset),
    ("date", date),
    ("excerpt", excerpt),
    ("strftime", strftime),
];

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Deployment facts the helpers need
#[derive(Debug, Clone)]
pub struct HelperEnv {
    /// Public URL path of the asset mount, e.g. `/events/assets`
    pub asset_base: String,
    /// Source of "now" for the `date` helper fallback
    pub clock: fn() -> NaiveDateTime,
}

impl HelperEnv {
    pub fn new(asset_base: impl Into<String>) -> Self {
        Self {
            asset_base: asset_base.into(),
            clock: local_now,
        }
    }
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// The helper table bound to one deployment environment
#[derive(Debug, Clone)]
pub struct HelperSet {
    env: Arc<HelperEnv>,
}

impl HelperSet {
    pub fn new(env: HelperEnv) -> Self {
        Self { env: Arc::new(env) }
    }

    pub fn env(&self) -> &HelperEnv {
        &self.env
    }

    /// Invoke a helper directly by name
    pub fn call(&self, name: &str, this: &Value, args: &[Value]) -> Option<String> {
        HELPERS
            .iter()
            .find(|(helper, _)| *helper == name)
            .map(|(_, func)| func(&self.env, this, args))
    }

    pub fn register(&self, registry: &mut Handlebars<'_>) {
        for (name, func) in HELPERS {
            registry.register_helper(
                name,
                Box::new(RegisteredHelper {
                    func: *func,
                    env: Arc::clone(&self.env),
                }),
            );
        }
    }
}

struct RegisteredHelper {
    func: HelperFn,
    env: Arc<HelperEnv>,
}

impl HelperDef for RegisteredHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let this = rc.evaluate(ctx, "this")?;
        let args: Vec<Value> = h.params().iter().map(|p| p.value().clone()).collect();
        out.write(&(self.func)(&self.env, this.as_json(), &args))?;
        Ok(())
    }
}

/// `{{asset "css/site.css"}}` → `/assets/css/site.css` under the deployment prefix
pub fn asset(env: &HelperEnv, _this: &Value, args: &[Value]) -> String {
    let path = arg_string(args, 0);
    format!("{}/{}", env.asset_base, path.trim_start_matches('/'))
}

/// `{{date "DD.MM.YYYY"}}` from the current event's `when_start`.
///
/// Token substitution runs `YYYY`, `DD`, `MMMM`, `MM` in that order with
/// unpadded numbers, so `MMMM` renders the month number just like `MM`.
pub fn date(env: &HelperEnv, this: &Value, args: &[Value]) -> String {
    let when = match field_str(this, "when_start") {
        Some(raw) => match parse_flexible(raw) {
            Some(when) => when,
            None => return String::new(),
        },
        None => (env.clock)(),
    };

    let year = when.format("%Y").to_string();
    let month = when.format("%-m").to_string();
    let day = when.format("%-d").to_string();

    arg_string(args, 0)
        .replace("YYYY", &year)
        .replace("DD", &day)
        .replace("MMMM", &month)
        .replace("MM", &month)
}

/// `{{strftime "when_start" "%d %b %Y, %H:%M"}}`
pub fn strftime(_env: &HelperEnv, this: &Value, args: &[Value]) -> String {
    let field = arg_string(args, 0);
    let format = arg_string(args, 1);

    let Some(when) = field_str(this, &field).and_then(parse_flexible) else {
        return String::new();
    };

    let mut rendered = String::new();
    match write!(rendered, "{}", when.format(&format)) {
        Ok(()) => rendered,
        Err(_) => {
            tracing::warn!(format = %format, "Invalid strftime format in template");
            String::new()
        }
    }
}

/// `{{excerpt 30}}`: first N words of `agenda` with tags removed
pub fn excerpt(_env: &HelperEnv, this: &Value, args: &[Value]) -> String {
    let Some(agenda) = field_str(this, "agenda") else {
        return String::new();
    };
    let words = match args.first() {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0) as usize,
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    };

    let text = TAG.replace_all(agenda, "");
    text.split_whitespace()
        .take(words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse the date shapes the events service and form inputs produce
pub fn parse_flexible(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(when) = DateTime::parse_from_rfc3339(raw) {
        return Some(when.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(when) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(when);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
}

fn field_str<'a>(this: &'a Value, field: &str) -> Option<&'a str> {
    this.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn arg_string(args: &[Value], index: usize) -> String {
    match args.get(index) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
