//! `samlp:Status` and its nested codes.

use serde::{Deserialize, Serialize};

use super::{status_codes, sub_status_codes};

/// Outcome reported by the IdP.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Top-level `samlp:StatusCode`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<StatusCode>,

    /// `samlp:StatusMessage`; carries `ErrorCode nr<N>` for user anomalies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
}

impl Status {
    /// Creates a success status.
    #[must_use]
    pub fn success() -> Self {
        Self {
            status_code: Some(StatusCode::new(status_codes::SUCCESS)),
            status_message: None,
        }
    }

    /// Creates a `Responder` / `AuthnFailed` status, the form SPID IdPs use
    /// to report user anomalies.
    #[must_use]
    pub fn authn_failed(message: impl Into<String>) -> Self {
        Self {
            status_code: Some(
                StatusCode::new(status_codes::RESPONDER)
                    .with_nested(StatusCode::new(sub_status_codes::AUTHN_FAILED)),
            ),
            status_message: Some(message.into()),
        }
    }

    /// Returns the top-level status code value, if any.
    #[must_use]
    pub fn code_value(&self) -> Option<&str> {
        self.status_code.as_ref().map(|code| code.value.as_str())
    }

    /// Returns the nested status code value, if any.
    #[must_use]
    pub fn nested_code_value(&self) -> Option<&str> {
        self.status_code
            .as_ref()
            .and_then(|code| code.status_code.as_deref())
            .map(|nested| nested.value.as_str())
    }

    /// Returns true if the top-level code is `Success`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code_value() == Some(status_codes::SUCCESS)
    }

    /// Sets `StatusMessage`.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.status_message = Some(message.into());
        self
    }
}

/// A status code URI with an optional second-level code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCode {
    /// `Value` attribute.
    #[serde(default)]
    pub value: String,

    /// Nested `samlp:StatusCode`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<Box<StatusCode>>,
}

impl StatusCode {
    /// Creates a code without nesting.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            status_code: None,
        }
    }

    /// Sets the nested status code.
    #[must_use]
    pub fn with_nested(mut self, nested: StatusCode) -> Self {
        self.status_code = Some(Box::new(nested));
        self
    }
}
