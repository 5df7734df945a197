//! SPID compliance checking of SAML responses.
//!
//! A response is checked by running ordered stage tables, failing on the
//! first broken rule:
//!
//! 1. [`RESPONSE_STAGES`] on the response envelope.
//! 2. Assertion resolution: plaintext assertions if any, otherwise the
//!    decrypted encrypted assertions. An empty result is a failure.
//! 3. [`ASSERTION_STAGES`] on every assertion; the `conditions` stage runs
//!    [`CONDITIONS_STAGES`].
//! 4. [`TRAILING_STAGES`] on the response and the resolved assertions.
//!
//! Decryption problems abort the run with [`SpidCheckerError::Decryption`];
//! they are never reported as compliance failures.

mod assertion;
mod conditions;
mod response;

pub use assertion::ASSERTION_STAGES;
pub use conditions::CONDITIONS_STAGES;
pub use response::{RESPONSE_STAGES, TRAILING_STAGES};

use std::borrow::Cow;
use std::fmt;

use tracing::{debug, info};

use crate::context::ComplianceContext;
use crate::encryption::{decrypt_assertions, AssertionDecrypter};
use crate::error::{ComplianceFailure, DecryptionError, FailureKind, SpidCheckerError};
use crate::signature::{SignatureValidator, TrustCredential, XmlSignatureValidator};
use crate::types::{Assertion, Conditions, Response};

/// Outcome of a single stage.
pub type CheckResult = Result<(), ComplianceFailure>;

/// Check over the response alone.
pub type ResponseCheck = fn(&CheckScope<'_>) -> CheckResult;

/// Check over one assertion.
pub type AssertionCheck = fn(&CheckScope<'_>, &Assertion) -> CheckResult;

/// Check over the conditions of one assertion.
pub type ConditionsCheck = fn(&CheckScope<'_>, &Assertion, &Conditions) -> CheckResult;

/// Check over the response and all resolved assertions.
pub type TrailingCheck = fn(&CheckScope<'_>, &[Assertion]) -> CheckResult;

/// A named rule.
#[derive(Clone, Copy)]
pub struct Stage<F> {
    /// Name used in logs and tests.
    pub name: &'static str,
    /// The rule.
    pub check: F,
}

impl<F> fmt::Debug for Stage<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Stage").field(&self.name).finish()
    }
}

/// Everything a stage may look at during one run.
pub struct CheckScope<'a> {
    /// The response under check.
    pub response: &'a Response,
    /// Credentials trusted for the IdP.
    pub credentials: &'a [TrustCredential],
    /// The service provider's expectations.
    pub context: &'a ComplianceContext,
    validator: &'a dyn SignatureValidator,
}

impl<'a> CheckScope<'a> {
    /// Creates a scope.
    pub fn new(
        response: &'a Response,
        credentials: &'a [TrustCredential],
        context: &'a ComplianceContext,
        validator: &'a dyn SignatureValidator,
    ) -> Self {
        Self {
            response,
            credentials,
            context,
            validator,
        }
    }

    /// Returns the signature validator.
    #[must_use]
    pub fn validator(&self) -> &'a dyn SignatureValidator {
        self.validator
    }

    /// Builds a failure about the response.
    #[must_use]
    pub fn fail(&self, kind: FailureKind, detail: impl fmt::Display) -> ComplianceFailure {
        ComplianceFailure::new(
            kind,
            format!("SAML Response ID {}: {detail}", self.response.id),
        )
    }

    /// Builds a failure about one assertion.
    #[must_use]
    pub fn fail_assertion(
        &self,
        assertion: &Assertion,
        kind: FailureKind,
        detail: impl fmt::Display,
    ) -> ComplianceFailure {
        ComplianceFailure::new(
            kind,
            format!(
                "SAML Response ID {} Assertion ID {}: {detail}",
                self.response.id, assertion.id
            ),
        )
    }
}

/// Validates SAML responses against the SPID technical rules.
///
/// Holds no per-response state; one instance can serve concurrent checks.
pub struct ComplianceChecker {
    validator: Box<dyn SignatureValidator>,
    decrypter: Option<Box<dyn AssertionDecrypter>>,
}

impl ComplianceChecker {
    /// Creates a checker using the given signature validator.
    #[must_use]
    pub fn new(validator: impl SignatureValidator + 'static) -> Self {
        Self {
            validator: Box::new(validator),
            decrypter: None,
        }
    }

    /// Enables encrypted assertions.
    #[must_use]
    pub fn with_decrypter(mut self, decrypter: impl AssertionDecrypter + 'static) -> Self {
        self.decrypter = Some(Box::new(decrypter));
        self
    }

    /// Checks a response.
    ///
    /// Returns `Ok(())` only if every rule holds.
    ///
    /// # Errors
    ///
    /// Returns [`SpidCheckerError::Compliance`] for the first broken rule and
    /// [`SpidCheckerError::Decryption`] if encrypted assertions cannot be
    /// opened.
    pub fn check(
        &self,
        response: &Response,
        credentials: &[TrustCredential],
        context: &ComplianceContext,
    ) -> Result<(), SpidCheckerError> {
        let scope = CheckScope::new(response, credentials, context, self.validator.as_ref());

        for stage in RESPONSE_STAGES {
            debug!(response_id = %response.id, stage = stage.name, "response check");
            (stage.check)(&scope)?;
        }

        let assertions = self.resolve_assertions(response, context)?;
        if assertions.is_empty() {
            return Err(scope
                .fail(FailureKind::NoAssertion, "no assertion found")
                .into());
        }

        for assertion in assertions.iter() {
            for stage in ASSERTION_STAGES {
                debug!(
                    response_id = %response.id,
                    assertion_id = %assertion.id,
                    stage = stage.name,
                    "assertion check"
                );
                (stage.check)(&scope, assertion)?;
            }
        }

        for stage in TRAILING_STAGES {
            debug!(response_id = %response.id, stage = stage.name, "response check");
            (stage.check)(&scope, &*assertions)?;
        }

        info!(
            response_id = %response.id,
            assertions = assertions.len(),
            "SAML response is SPID compliant"
        );
        Ok(())
    }

    fn resolve_assertions<'r>(
        &self,
        response: &'r Response,
        context: &ComplianceContext,
    ) -> Result<Cow<'r, [Assertion]>, DecryptionError> {
        if !response.assertions.is_empty() || response.encrypted_assertions.is_empty() {
            return Ok(Cow::Borrowed(response.assertions.as_slice()));
        }

        let decrypter = self
            .decrypter
            .as_deref()
            .ok_or(DecryptionError::DecrypterUnavailable)?;
        debug!(
            response_id = %response.id,
            count = response.encrypted_assertions.len(),
            "decrypting assertions"
        );
        let decrypted = decrypt_assertions(
            &response.encrypted_assertions,
            context.decryption_key.as_deref(),
            decrypter,
        )?;
        Ok(Cow::Owned(decrypted))
    }
}

impl Default for ComplianceChecker {
    fn default() -> Self {
        Self::new(XmlSignatureValidator::new())
    }
}

impl fmt::Debug for ComplianceChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComplianceChecker")
            .field("decrypter", &self.decrypter.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! A compliant response and the context it satisfies.

    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    use crate::context::ComplianceContext;
    use crate::error::{SamlError, SamlResult};
    use crate::signature::{SignatureValidator, TrustCredential, XmlSignature};
    use crate::types::*;

    pub const DESTINATION: &str = "https://sp.example/acs";
    pub const SP_ENTITY_ID: &str = "https://sp.example/";
    pub const IDP_ENTITY_ID: &str = "https://idp.example/";
    pub const REQUEST_ID: &str = "_req1";
    pub const GOOD_SIGNATURE: &str = "good";

    /// Accepts signatures whose value is [`GOOD_SIGNATURE`].
    pub struct StubValidator;

    impl SignatureValidator for StubValidator {
        fn validate(&self, signature: &XmlSignature, _: &TrustCredential) -> SamlResult<()> {
            if signature.signature_value == GOOD_SIGNATURE {
                Ok(())
            } else {
                Err(SamlError::SignatureInvalid("stub".to_string()))
            }
        }
    }

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
    }

    pub fn at(offset_ms: i64) -> Timestamp {
        Timestamp::from(now() + TimeDelta::milliseconds(offset_ms))
    }

    pub fn signature(reference: &str) -> XmlSignature {
        XmlSignature::new(
            spid_crypto::SignatureScheme::RsaSha256,
            format!("#{reference}"),
            "",
            "<ds:SignedInfo/>",
            GOOD_SIGNATURE,
        )
    }

    pub fn credentials() -> Vec<TrustCredential> {
        vec![TrustCredential::from_public_key(vec![1]).with_label("idp")]
    }

    pub fn context() -> ComplianceContext {
        ComplianceContext::new(DESTINATION, IDP_ENTITY_ID, SP_ENTITY_ID)
            .with_requested_attributes(["spidCode", "name", "familyName"])
            .with_min_level(SpidLevel::L1)
    }

    pub fn assertion() -> Assertion {
        let attributes = ["spidCode", "name", "familyName"]
            .into_iter()
            .fold(AttributeStatement::new(), |statement, name| {
                statement.with_attribute(
                    Attribute::single(name, "value").with_format(attribute_name_formats::BASIC),
                )
            });

        Assertion::new("_a1", at(0))
            .with_signature(signature("_a1"))
            .with_issuer(Issuer::entity(IDP_ENTITY_ID))
            .with_subject(
                Subject::new(NameId::transient("_t1").with_name_qualifier(IDP_ENTITY_ID))
                    .with_confirmation(SubjectConfirmation::bearer().with_data(
                        SubjectConfirmationData::for_request(REQUEST_ID, DESTINATION, at(300_000)),
                    )),
            )
            .with_conditions(Conditions::new(at(-60_000), at(300_000)).with_audience(SP_ENTITY_ID))
            .with_authn_statement(AuthnStatement::new(at(-1_000), SpidLevel::L1))
            .with_attribute_statement(attributes)
    }

    pub fn response() -> Response {
        Response::new("_r1", at(0))
            .with_signature(signature("_r1"))
            .with_issuer(Issuer::entity(IDP_ENTITY_ID))
            .in_response_to(REQUEST_ID)
            .with_destination(DESTINATION)
            .with_status(Status::success())
            .with_assertion(assertion())
    }

    pub fn with_assertion(mutate: impl FnOnce(&mut Assertion)) -> Response {
        let mut response = response();
        mutate(&mut response.assertions[0]);
        response
    }
}
