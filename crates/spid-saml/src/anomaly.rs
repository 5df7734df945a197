//! SPID user anomaly catalog.
//!
//! When authentication fails on the IdP side because of something the user
//! did (or did not do), the IdP answers `Responder` / `AuthnFailed` with a
//! status message of the form `ErrorCode nr<N>`. The codes below are the
//! ones the AgID rules define for that path; each has a message meant for
//! the end user.

use std::sync::LazyLock;

use regex::Regex;

static ERROR_CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ErrorCode nr(\d+)$").expect("static regex is valid")
});

/// Extracts the anomaly code from a status message.
///
/// Surrounding whitespace is ignored; anything else around the pattern, or a
/// code that does not fit in `u32`, yields `None`.
#[must_use]
pub fn parse_anomaly_code(status_message: &str) -> Option<u32> {
    ERROR_CODE_PATTERN
        .captures(status_message.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|code| code.as_str().parse().ok())
}

/// Anomalies an IdP may report for a failed user authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserAnomaly {
    /// Too many failed credential submissions.
    RepeatedWrongCredentials,
    /// The user has no credentials matching the requested level.
    InsufficientCredentials,
    /// Authentication timed out.
    Timeout,
    /// The user denied consent to send attributes.
    ConsentDenied,
    /// The identity or credentials are suspended, revoked or locked.
    CredentialsSuspended,
    /// The user cancelled the authentication.
    Cancelled,
}

impl UserAnomaly {
    /// Maps a SPID anomaly code to its catalog entry.
    #[must_use]
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            19 => Some(Self::RepeatedWrongCredentials),
            20 => Some(Self::InsufficientCredentials),
            21 => Some(Self::Timeout),
            22 => Some(Self::ConsentDenied),
            23 => Some(Self::CredentialsSuspended),
            25 => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns the SPID anomaly code.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::RepeatedWrongCredentials => 19,
            Self::InsufficientCredentials => 20,
            Self::Timeout => 21,
            Self::ConsentDenied => 22,
            Self::CredentialsSuspended => 23,
            Self::Cancelled => 25,
        }
    }

    /// Returns the message to show to the user.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::RepeatedWrongCredentials => {
                "Autenticazione fallita per ripetuta sottomissione di credenziali errate"
            }
            Self::InsufficientCredentials => {
                "Utente privo di credenziali compatibili con il livello richiesto dal fornitore del servizio"
            }
            Self::Timeout => "Timeout durante l'autenticazione utente",
            Self::ConsentDenied => "Utente nega il consenso all'invio di dati al fornitore del servizio",
            Self::CredentialsSuspended => {
                "Utente con identità sospesa, revocata o con credenziali bloccate"
            }
            Self::Cancelled => "Processo di autenticazione annullato dall'utente",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_error_code() {
        assert_eq!(parse_anomaly_code("ErrorCode nr42"), Some(42));
        assert_eq!(parse_anomaly_code("  ErrorCode nr22\n"), Some(22));
    }

    #[test]
    fn rejects_other_messages() {
        assert_eq!(parse_anomaly_code("ErrorCode nr"), None);
        assert_eq!(parse_anomaly_code("ErrorCode nr22 extra"), None);
        assert_eq!(parse_anomaly_code("errorcode nr22"), None);
        assert_eq!(parse_anomaly_code("ErrorCode nr99999999999"), None);
    }

    #[test]
    fn catalog_roundtrip() {
        for code in [19, 20, 21, 22, 23, 25] {
            let anomaly = UserAnomaly::from_code(code).unwrap();
            assert_eq!(anomaly.code(), code);
            assert!(!anomaly.user_message().is_empty());
        }
        assert_eq!(UserAnomaly::from_code(24), None);
        assert_eq!(UserAnomaly::from_code(42), None);
    }
}
