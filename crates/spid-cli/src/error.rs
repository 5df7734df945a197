//! CLI error types.

use spid_saml::{SamlError, SpidCheckerError};
use thiserror::Error;

/// Exit code of an accepted response or a successful command.
pub const EXIT_OK: i32 = 0;

/// Exit code of any error other than a non-compliant response.
pub const EXIT_ERROR: i32 = 1;

/// Exit code of a response that was evaluated and rejected.
pub const EXIT_NON_COMPLIANT: i32 = 2;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The checker rejected or could not evaluate the response.
    #[error(transparent)]
    Check(#[from] SpidCheckerError),

    /// SAML input error.
    #[error(transparent)]
    Saml(#[from] SamlError),

    /// Key material error.
    #[error("crypto error: {0}")]
    Crypto(#[from] spid_crypto::CryptoError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Returns the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Check(err) if err.is_compliance_failure() => EXIT_NON_COMPLIANT,
            _ => EXIT_ERROR,
        }
    }
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
