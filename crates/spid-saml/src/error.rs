//! Error types for SPID response processing.
//!
//! Two categories are kept strictly apart:
//!
//! - [`ComplianceFailure`] - the response was evaluated and broke a rule.
//! - [`DecryptionError`] - the response could not be evaluated at all.
//!
//! [`SamlError`] covers input problems outside a validation run, such as
//! unreadable credentials or incomplete metadata parameters.

use std::fmt;

use spid_crypto::CryptoError;
use thiserror::Error;

/// Result type for SAML input operations.
pub type SamlResult<T> = Result<T, SamlError>;

/// SAML input errors.
#[derive(Debug, Error)]
pub enum SamlError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// XML writing error.
    #[error("XML writing error: {0}")]
    XmlWrite(String),

    /// A serialized protocol object could not be read back.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// XML signature validation failed.
    #[error("signature validation failed: {0}")]
    SignatureInvalid(String),

    /// Missing required element or attribute.
    #[error("missing required element: {0}")]
    MissingElement(String),

    /// Invalid metadata parameter.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    /// Base64 decoding error.
    #[error("base64 decode error: {0}")]
    Base64Decode(String),

    /// Cryptographic operation error.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

impl From<base64::DecodeError> for SamlError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Base64Decode(err.to_string())
    }
}

/// The rule family a compliance failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Response or assertion identifier missing.
    Identifier,
    /// Protocol version is not 2.0.
    Version,
    /// No trusted credential validates the signature.
    Signature,
    /// Status missing or not Success.
    Status,
    /// Responder/AuthnFailed status carrying a SPID anomaly code.
    UserAnomaly,
    /// No assertion left after resolution.
    NoAssertion,
    /// Issue or authn instant missing or malformed.
    IssueInstant,
    /// Instant outside the tolerance window.
    TemporalWindow,
    /// Subject or name identifier invalid.
    Subject,
    /// Subject confirmation invalid.
    SubjectConfirmation,
    /// Issuer missing or not the expected IdP.
    Issuer,
    /// Conditions missing or not covering the response.
    Conditions,
    /// Audience restriction missing or foreign.
    Audience,
    /// Authentication context missing or below the required level.
    AuthnContext,
    /// Attribute statement does not match the request.
    Attributes,
    /// Destination differs from the expected ACS URL.
    Destination,
}

impl FailureKind {
    /// Returns a short identifier for logs and machine output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Version => "version",
            Self::Signature => "signature",
            Self::Status => "status",
            Self::UserAnomaly => "user_anomaly",
            Self::NoAssertion => "no_assertion",
            Self::IssueInstant => "issue_instant",
            Self::TemporalWindow => "temporal_window",
            Self::Subject => "subject",
            Self::SubjectConfirmation => "subject_confirmation",
            Self::Issuer => "issuer",
            Self::Conditions => "conditions",
            Self::Audience => "audience",
            Self::AuthnContext => "authn_context",
            Self::Attributes => "attributes",
            Self::Destination => "destination",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A broken compliance rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ComplianceFailure {
    /// Rule family.
    pub kind: FailureKind,
    /// Diagnostic naming the response, the assertion and the offending value.
    pub message: String,
    /// SPID anomaly code, only set for [`FailureKind::UserAnomaly`].
    pub anomaly_code: Option<u32>,
}

impl ComplianceFailure {
    /// Creates a failure without anomaly code.
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            anomaly_code: None,
        }
    }

    /// Creates a user anomaly failure carrying the IdP's code.
    #[must_use]
    pub fn anomaly(code: u32, message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::UserAnomaly,
            message: message.into(),
            anomaly_code: Some(code),
        }
    }
}

/// Encrypted assertions could not be turned into plain assertions.
#[derive(Debug, Error)]
pub enum DecryptionError {
    /// Encrypted assertions present but no SP key configured.
    #[error("no decryption key configured")]
    MissingKey,

    /// Encrypted assertions present but no decrypter configured.
    #[error("no assertion decrypter configured")]
    DecrypterUnavailable,

    /// Required XML-Enc element absent.
    #[error("missing {0} in encrypted assertion")]
    MissingElement(&'static str),

    /// Algorithm URI not recognised.
    #[error("unsupported encryption algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Cipher value is not valid base64.
    #[error("invalid cipher value: {0}")]
    InvalidCipherValue(String),

    /// Key unwrap or content decryption failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Plaintext is not a parsable assertion.
    #[error("decrypted assertion could not be parsed: {0}")]
    Parse(String),
}

/// Outcome of a rejected validation run.
#[derive(Debug, Error)]
pub enum SpidCheckerError {
    /// The response was evaluated and is not compliant.
    #[error("non-compliant SAML response: {0}")]
    Compliance(#[from] ComplianceFailure),

    /// The response could not be evaluated.
    #[error("SAML response could not be evaluated: {0}")]
    Decryption(#[from] DecryptionError),
}

impl SpidCheckerError {
    /// Returns true if the response was evaluated and rejected.
    #[must_use]
    pub const fn is_compliance_failure(&self) -> bool {
        matches!(self, Self::Compliance(_))
    }

    /// Returns the compliance failure, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&ComplianceFailure> {
        match self {
            Self::Compliance(failure) => Some(failure),
            Self::Decryption(_) => None,
        }
    }

    /// Returns the SPID anomaly code reported by the IdP, if any.
    #[must_use]
    pub fn anomaly_code(&self) -> Option<u32> {
        self.failure().and_then(|f| f.anomaly_code)
    }

    /// Returns the HTTP status code a caller should answer with.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::Compliance(ComplianceFailure {
                kind: FailureKind::UserAnomaly,
                ..
            }) => 403,
            Self::Compliance(_) => 401,
            Self::Decryption(_) => 500,
        }
    }
}
