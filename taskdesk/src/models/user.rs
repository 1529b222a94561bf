//! User record as returned by the backend.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::lenient;

/// Identifier of a user or task.
///
/// Backends hand out either numeric ids or opaque strings (document ids), so
/// both are accepted. Numbers that are not integers are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Numeric identifier.
    Number(i64),
    /// Opaque string identifier.
    Text(String),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl RecordId {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(n.as_i64().map_or_else(|| Self::Text(n.to_string()), Self::Number)),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(de)?;
        Self::from_value(&value)
            .ok_or_else(|| D::Error::custom(format!("invalid record id: {value}")))
    }
}

/// Ids typed on the command line. Only canonical integers become numbers,
/// so `007` stays the text the user typed.
impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => Self::Number(n),
            _ => Self::Text(s.to_string()),
        }
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(de: D) -> Result<Option<RecordId>, D::Error> {
    Ok(RecordId::from_value(&Value::deserialize(de)?))
}

/// A user as seen by the client.
///
/// Every field is optional and unknown fields are kept in `extra`: whatever
/// the server returns is accepted into the session. Scalars of an unexpected
/// type are kept as text, other shapes are dropped. Use
/// [`User::validate`] to check the record at the trust boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(
        default,
        alias = "_id",
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Kept as the raw text the server sent; parsed lazily for display.
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reasons a user record fails strict validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user record has no id")]
    MissingId,
    #[error("user record has no name")]
    MissingName,
    #[error("user record has an invalid email: {0:?}")]
    InvalidEmail(Option<String>),
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"))
}

/// Loose email shape check (`local@domain.tld`).
fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email.trim())
}

impl User {
    /// Display name, falling back to the email and then a placeholder.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.email.as_deref())
            .unwrap_or("there")
    }

    /// Parse `created_at` as a timestamp, a bare date or epoch millis.
    pub fn created_at_date(&self) -> Option<NaiveDate> {
        let raw = self.created_at.as_deref()?;
        lenient::parse_timestamp(raw)
            .or_else(|| raw.trim().parse::<i64>().ok().and_then(DateTime::from_timestamp_millis))
            .map(|dt| dt.date_naive())
    }

    /// Strict shape check applied when `strict_user_validation` is enabled.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.id.is_none() {
            return Err(UserValidationError::MissingId);
        }
        if self.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
            return Err(UserValidationError::MissingName);
        }
        match self.email.as_deref() {
            Some(email) if is_valid_email(email) => Ok(()),
            other => Err(UserValidationError::InvalidEmail(other.map(String::from))),
        }
    }
}
