//! Event payload model.
//!
//! A payload is the JSON object an issue tracker posts when something happens
//! to a tracked item. Only `action` has a meaning of its own; every other field
//! is carried opaquely and read leniently when a message has to be formatted.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Action performed on the tracked item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Created,
    Updated,
    Deleted,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Created, Action::Updated, Action::Deleted];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Created => "created",
            Action::Updated => "updated",
            Action::Deleted => "deleted",
        }
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Action::Created),
            "updated" => Ok(Action::Updated),
            "deleted" => Ok(Action::Deleted),
            _ => Err(AppError::Validation {
                field: "action".to_string(),
                reason: format!(
                    "Unknown action '{}'. Valid actions are: created, updated, deleted",
                    s
                ),
            }),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event payload passed to every adapter
///
/// Field order is preserved so the payload re-serializes exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Builds a payload from arbitrary JSON, rejecting anything but an object.
    pub fn from_value(value: Value) -> AppResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(AppError::Validation {
                field: "payload".to_string(),
                reason: format!("Expected a JSON object, got {}", json_kind(&other)),
            }),
        }
    }

    /// Raw `action` string, if the payload carries one.
    pub fn action(&self) -> Option<&str> {
        self.0.get("action").and_then(Value::as_str)
    }

    /// The action string filters are matched against.
    ///
    /// Only a missing `action` key falls back to `default`. An explicit `null`
    /// or a non-string value names no action and matches no allow-list.
    pub fn effective_action<'a>(&'a self, default: &'a str) -> Option<&'a str> {
        match self.0.get("action") {
            None => Some(default),
            Some(value) => value.as_str(),
        }
    }

    /// Returns a copy of the payload with `action` replaced.
    pub fn with_action(mut self, action: Action) -> Self {
        self.0
            .insert("action".to_string(), Value::String(action.as_str().to_string()));
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Looks a field up in the nested `attributes` object first, then at top level.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        self.0
            .get("attributes")
            .and_then(|attributes| attributes.get(key))
            .filter(|value| !value.is_null())
            .or_else(|| self.0.get(key).filter(|value| !value.is_null()))
    }

    pub fn summary(&self) -> EventSummary {
        EventSummary::from_payload(self)
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Person who triggered the event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl Author {
    /// Full name when known, otherwise the email address.
    pub fn display_name(&self) -> Option<String> {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if name.is_empty() {
            self.email.clone()
        } else {
            Some(name)
        }
    }
}

/// Human-oriented view of a payload used by the chat adapters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSummary {
    pub model: Option<String>,
    pub item_type: Option<String>,
    pub number: Option<u64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub author: Option<Author>,
    pub product: Option<String>,
}

impl EventSummary {
    pub fn from_payload(payload: &Payload) -> Self {
        let text = |key: &str| {
            payload
                .lookup(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        let number = payload.lookup("number").and_then(|value| match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });

        let author = payload.lookup("created_by").and_then(|value| match value {
            Value::Object(person) => {
                let field = |key: &str| {
                    person
                        .get(key)
                        .and_then(Value::as_str)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                };
                Some(Author {
                    first_name: field("first_name"),
                    last_name: field("last_name"),
                    email: field("email"),
                })
            }
            Value::String(name) if !name.is_empty() => Some(Author {
                first_name: Some(name.clone()),
                ..Default::default()
            }),
            _ => None,
        });

        let product = payload.lookup("product").and_then(|value| match value {
            Value::Object(product) => product
                .get("name")
                .and_then(Value::as_str)
                .map(String::from),
            Value::String(name) => Some(name.clone()),
            _ => None,
        });

        Self {
            model: payload
                .fields()
                .get("model")
                .and_then(Value::as_str)
                .map(String::from),
            item_type: text("type"),
            number,
            title: text("title"),
            description: text("description"),
            url: text("short_url").or_else(|| text("url")),
            author,
            product,
        }
    }

    /// Short label such as "Story #42".
    pub fn label(&self) -> String {
        let kind = self
            .item_type
            .as_deref()
            .or(self.model.as_deref())
            .map(capitalize)
            .unwrap_or_else(|| "Item".to_string());

        match self.number {
            Some(number) => format!("{} #{}", kind, number),
            None => kind,
        }
    }

    pub fn author_name(&self) -> Option<String> {
        self.author.as_ref().and_then(Author::display_name)
    }

    /// One-line plain-text description, e.g. "Story #42 created by Jane Doe: Fix login".
    pub fn headline(&self, action: &str) -> String {
        let mut line = format!("{} {}", self.label(), action);
        if let Some(author) = self.author_name() {
            line.push_str(" by ");
            line.push_str(&author);
        }
        if let Some(title) = &self.title {
            line.push_str(": ");
            line.push_str(title);
        }
        line
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Escapes text for inclusion in HTML message bodies.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
