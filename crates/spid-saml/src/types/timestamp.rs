//! Lexical `xs:dateTime` values.
//!
//! Timestamps are kept as the text found in the message and resolved to an
//! instant only when a rule needs one. This keeps "absent" and "unparsable"
//! apart, which the checker reports differently.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A timestamp as carried by a SAML message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

/// Why a timestamp could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    /// The element or attribute is absent.
    #[error("not present")]
    Missing,

    /// The value is not an `xs:dateTime`.
    #[error("malformed value '{0}'")]
    Malformed(String),
}

impl Timestamp {
    /// Wraps a lexical value without validating it.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the lexical value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves the value to a UTC instant.
    ///
    /// Values without a zone designator are read as UTC.
    pub fn resolve(&self) -> Result<DateTime<Utc>, TimestampError> {
        let raw = self.0.trim();
        if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
            return Ok(instant.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|_| TimestampError::Malformed(self.0.clone()))
    }
}

/// Resolves an optional timestamp, treating absence as an error.
pub fn resolve(timestamp: Option<&Timestamp>) -> Result<DateTime<Utc>, TimestampError> {
    timestamp.ok_or(TimestampError::Missing)?.resolve()
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}
