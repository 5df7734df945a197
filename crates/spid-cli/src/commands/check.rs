//! Offline compliance check.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use spid_saml::encryption::{DecryptionKey, XmlEncDecrypter};
use spid_saml::{
    ComplianceChecker, Response, SpidCheckerError, TrustCredential, UserAnomaly,
    XmlSignatureValidator,
};
use tabled::Tabled;
use tracing::debug;

use super::read_file;
use crate::cli::CheckArgs;
use crate::config::OutputFormat;
use crate::output::print_verdict;
use crate::parser::JsonAssertionParser;
use crate::{CliConfig, CliResult};

/// Outcome of one check.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct Verdict {
    /// Response ID.
    #[tabled(rename = "Response")]
    pub response_id: String,
    /// `accepted`, `rejected` or `not evaluated`.
    #[tabled(rename = "Verdict")]
    pub verdict: String,
    /// Broken rule family.
    #[tabled(rename = "Rule")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rule: String,
    /// Anomaly code and catalog message.
    #[tabled(rename = "Anomaly")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub anomaly: String,
    /// Diagnostic.
    #[tabled(rename = "Detail")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

impl Verdict {
    /// Every rule held.
    pub const ACCEPTED: &'static str = "accepted";
    /// A rule was broken.
    pub const REJECTED: &'static str = "rejected";
    /// Decryption failed before any assertion rule ran.
    pub const NOT_EVALUATED: &'static str = "not evaluated";

    /// Summarizes a checker outcome.
    #[must_use]
    pub fn new(response: &Response, outcome: &Result<(), SpidCheckerError>) -> Self {
        let mut verdict = Self {
            response_id: response.id.clone(),
            verdict: Self::ACCEPTED.to_string(),
            rule: String::new(),
            anomaly: String::new(),
            detail: String::new(),
        };

        match outcome {
            Ok(()) => {}
            Err(SpidCheckerError::Compliance(failure)) => {
                verdict.verdict = Self::REJECTED.to_string();
                verdict.rule = failure.kind.to_string();
                verdict.detail = failure.message.clone();
                if let Some(code) = failure.anomaly_code {
                    verdict.anomaly = match UserAnomaly::from_code(code) {
                        Some(anomaly) => format!("{code}: {}", anomaly.user_message()),
                        None => code.to_string(),
                    };
                }
            }
            Err(err @ SpidCheckerError::Decryption(_)) => {
                verdict.verdict = Self::NOT_EVALUATED.to_string();
                verdict.detail = err.to_string();
            }
        }
        verdict
    }
}

/// Runs `check`.
pub fn run_check(args: CheckArgs, config: &CliConfig, format: OutputFormat) -> CliResult<()> {
    let mut context = config.compliance.to_context(&args)?;
    let credentials = load_credentials(&args.certs)?;

    if let Some(path) = &args.key {
        let key = DecryptionKey::from_pem(&read_file(path)?)?;
        debug!(modulus_bits = key.modulus_bits(), "loaded SP decryption key");
        context = context.with_decryption_key(Arc::new(key));
    }

    let response: Response = serde_json::from_str(&read_file(&args.response)?)?;

    let checker = ComplianceChecker::new(XmlSignatureValidator::new().allow_sha1(args.allow_sha1))
        .with_decrypter(XmlEncDecrypter::new(JsonAssertionParser));
    let outcome = checker.check(&response, &credentials, &context);

    print_verdict(&Verdict::new(&response, &outcome), format)?;

    outcome.map_err(Into::into)
}

fn load_credentials(paths: &[PathBuf]) -> CliResult<Vec<TrustCredential>> {
    let mut credentials = Vec::new();
    for path in paths {
        let bundle = TrustCredential::from_pem_bundle(&read_file(path)?)?;
        debug!(path = %path.display(), count = bundle.len(), "loaded trust credentials");
        credentials.extend(bundle);
    }
    Ok(credentials)
}
