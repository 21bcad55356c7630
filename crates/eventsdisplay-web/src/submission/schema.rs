//! Suggestion form schema and its normalized record

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError, ValidationErrors};

const REQUIRED_MESSAGE: &str = "This field is required.";
const FALSE_CHECKBOX_VALUES: &[&str] = &["", "0", "false", "off", "no"];

/// Audience experience level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    #[default]
    None,
    Trainee,
    Junior,
    Middle,
    Senior,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::None,
        Level::Trainee,
        Level::Junior,
        Level::Middle,
        Level::Senior,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::None => "NONE",
            Level::Trainee => "TRAINEE",
            Level::Junior => "JUNIOR",
            Level::Middle => "MIDDLE",
            Level::Senior => "SENIOR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| format!("unknown level: {s}"))
    }
}

/// Raw form input, exactly as posted; unknown fields are dropped
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SuggestionForm {
    #[validate(custom(function = "required"))]
    pub title: String,
    #[validate(custom(function = "required"))]
    pub agenda: String,
    pub social: String,
    pub place: String,
    #[validate(custom(function = "blank_or_url"))]
    pub registration_url: String,
    #[validate(custom(function = "blank_or_url"))]
    pub image_url: String,
    #[validate(custom(function = "known_level"))]
    pub level: String,
    #[validate(custom(function = "required"))]
    pub when_start: String,
    pub when_end: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_time: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub submitter_email: String,
    #[serde(skip_serializing)]
    pub submit: Option<String>,
}

impl SuggestionForm {
    /// Whether the "include time" checkbox was ticked
    pub fn include_time(&self) -> bool {
        self.include_time.as_deref().is_some_and(|raw| {
            let raw = raw.trim().to_ascii_lowercase();
            !FALSE_CHECKBOX_VALUES.contains(&raw.as_str())
        })
    }

    /// Validate and produce the record sent to the suggestion service
    pub fn normalize(&self) -> Result<Suggestion, FieldErrors> {
        self.validate()
            .map_err(|errors| FieldErrors::from_validation(&errors))?;

        Ok(Suggestion {
            title: self.title.trim().to_string(),
            agenda: self.agenda.trim().to_string(),
            social: self.social.trim().to_string(),
            place: self.place.trim().to_string(),
            registration_url: non_blank(&self.registration_url),
            image_url: self.image_url.trim().to_string(),
            level: self.level.trim().parse().unwrap_or_default(),
            when_start: self.when_start.trim().to_string(),
            when_end: non_blank(&self.when_end),
            only_date: !self.include_time(),
            submitter_email: self.submitter_email.trim().to_string(),
        })
    }
}

impl From<&Suggestion> for SuggestionForm {
    fn from(suggestion: &Suggestion) -> Self {
        Self {
            title: suggestion.title.clone(),
            agenda: suggestion.agenda.clone(),
            social: suggestion.social.clone(),
            place: suggestion.place.clone(),
            registration_url: suggestion.registration_url.clone().unwrap_or_default(),
            image_url: suggestion.image_url.clone(),
            level: suggestion.level.to_string(),
            when_start: suggestion.when_start.clone(),
            when_end: suggestion.when_end.clone().unwrap_or_default(),
            include_time: (!suggestion.only_date).then(|| "on".to_string()),
            submitter_email: suggestion.submitter_email.clone(),
            submit: None,
        }
    }
}

/// Normalized suggestion record as stored by the suggestion service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub agenda: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub social: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub place: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_url: String,
    #[serde(default)]
    pub level: Level,
    pub when_start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_end: Option<String>,
    #[serde(default)]
    pub only_date: bool,
    pub submitter_email: String,
}

/// Validation messages keyed by form field
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages = errors
                    .iter()
                    .map(|error| match &error.message {
                        Some(message) => message.to_string(),
                        None => format!("Invalid value ({})", error.code),
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();
        Self(fields)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("required", REQUIRED_MESSAGE));
    }
    Ok(())
}

fn blank_or_url(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(invalid("url", "Enter a valid URL.")),
    }
}

fn known_level(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.parse::<Level>().is_ok() {
        return Ok(());
    }
    Err(invalid("level", "Select a valid level."))
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
