//! Rules on each assertion.

use super::{AssertionCheck, CheckResult, CheckScope, Stage, CONDITIONS_STAGES};
use crate::error::FailureKind;
use crate::signature::is_signature_valid;
use crate::temporal::{check_window, WindowViolation};
use crate::types::{
    resolve, Assertion, NameIdFormat, SubjectConfirmation, SAML_VERSION,
};

/// Rules run on every resolved assertion, in order.
pub const ASSERTION_STAGES: &[Stage<AssertionCheck>] = &[
    Stage {
        name: "identifier",
        check: check_identifier,
    },
    Stage {
        name: "signature",
        check: check_signature,
    },
    Stage {
        name: "version",
        check: check_version,
    },
    Stage {
        name: "issue_instant",
        check: check_issue_instant,
    },
    Stage {
        name: "authn_instant_window",
        check: check_authn_instant_window,
    },
    Stage {
        name: "subject",
        check: check_subject,
    },
    Stage {
        name: "subject_confirmations",
        check: check_subject_confirmations,
    },
    Stage {
        name: "issuer",
        check: check_issuer,
    },
    Stage {
        name: "conditions",
        check: check_conditions,
    },
];

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn check_identifier(scope: &CheckScope<'_>, assertion: &Assertion) -> CheckResult {
    if assertion.id.trim().is_empty() {
        return Err(scope.fail(FailureKind::Identifier, "assertion ID missing or empty"));
    }
    Ok(())
}

fn check_signature(scope: &CheckScope<'_>, assertion: &Assertion) -> CheckResult {
    if !is_signature_valid(
        assertion.signature.as_ref(),
        &assertion.id,
        scope.credentials,
        scope.validator(),
    ) {
        return Err(scope.fail_assertion(
            assertion,
            FailureKind::Signature,
            "assertion signature not verified by any trusted credential",
        ));
    }
    Ok(())
}

fn check_version(scope: &CheckScope<'_>, assertion: &Assertion) -> CheckResult {
    let version = &assertion.version;
    if version != SAML_VERSION {
        return Err(scope.fail_assertion(
            assertion,
            FailureKind::Version,
            format_args!("SAML version [{version}] differs from [{SAML_VERSION}]"),
        ));
    }
    Ok(())
}

fn check_issue_instant(scope: &CheckScope<'_>, assertion: &Assertion) -> CheckResult {
    resolve(assertion.issue_instant.as_ref()).map_err(|e| {
        scope.fail_assertion(
            assertion,
            FailureKind::IssueInstant,
            format_args!("issue instant {e}"),
        )
    })?;
    Ok(())
}

fn check_authn_instant_window(scope: &CheckScope<'_>, assertion: &Assertion) -> CheckResult {
    let issue_instant = resolve(assertion.issue_instant.as_ref()).map_err(|e| {
        scope.fail_assertion(
            assertion,
            FailureKind::IssueInstant,
            format_args!("issue instant {e}"),
        )
    })?;
    let tolerance_ms = scope.context.tolerance_ms;

    for statement in &assertion.authn_statements {
        let authn_instant = resolve(statement.authn_instant.as_ref()).map_err(|e| {
            scope.fail_assertion(
                assertion,
                FailureKind::IssueInstant,
                format_args!("authn instant {e}"),
            )
        })?;

        let relation = match check_window(issue_instant, authn_instant, tolerance_ms) {
            Ok(()) => continue,
            Err(WindowViolation::TooEarly) => "precedes",
            Err(WindowViolation::TooLate) => "follows",
        };
        return Err(scope.fail_assertion(
            assertion,
            FailureKind::TemporalWindow,
            format_args!(
                "assertion issue instant [{issue_instant}] {relation} authn instant [{authn_instant}] by more than {tolerance_ms} ms"
            ),
        ));
    }
    Ok(())
}

fn check_subject(scope: &CheckScope<'_>, assertion: &Assertion) -> CheckResult {
    let fail = |detail: String| scope.fail_assertion(assertion, FailureKind::Subject, detail);

    let subject = assertion
        .subject
        .as_ref()
        .filter(|subject| subject.has_children())
        .ok_or_else(|| fail("subject missing or empty".to_string()))?;
    let name_id = subject
        .name_id
        .as_ref()
        .ok_or_else(|| fail("subject name ID missing".to_string()))?;

    let format = name_id.format.as_deref().unwrap_or_default();
    if format.trim().is_empty() {
        return Err(fail("subject name ID format missing or empty".to_string()));
    }
    if format != NameIdFormat::Transient.uri() {
        return Err(fail(format!(
            "subject name ID format [{format}] differs from {}",
            NameIdFormat::Transient.uri()
        )));
    }
    if is_blank(name_id.name_qualifier.as_deref()) {
        return Err(fail("subject name ID qualifier missing or empty".to_string()));
    }
    Ok(())
}

fn check_subject_confirmations(scope: &CheckScope<'_>, assertion: &Assertion) -> CheckResult {
    let confirmations = assertion
        .subject
        .as_ref()
        .map(|subject| subject.subject_confirmations.as_slice())
        .unwrap_or_default();
    if confirmations.is_empty() {
        return Err(scope.fail_assertion(
            assertion,
            FailureKind::SubjectConfirmation,
            "subject confirmation missing",
        ));
    }

    let conditions = assertion.conditions.as_ref().ok_or_else(|| {
        scope.fail_assertion(assertion, FailureKind::Conditions, "conditions missing")
    })?;
    let conditions_expiry = resolve(conditions.not_on_or_after.as_ref()).map_err(|e| {
        scope.fail_assertion(
            assertion,
            FailureKind::Conditions,
            format_args!("conditions NotOnOrAfter {e}"),
        )
    })?;

    let fail = |detail: String| {
        scope.fail_assertion(assertion, FailureKind::SubjectConfirmation, detail)
    };
    let destination = &scope.context.destination;
    let in_response_to = scope.response.in_response_to.as_deref().unwrap_or_default();

    for confirmation in confirmations {
        let method = confirmation.method.as_str();
        if method.trim().is_empty() {
            return Err(fail("subject confirmation method missing or empty".to_string()));
        }
        if method != SubjectConfirmation::BEARER {
            return Err(fail(format!(
                "subject confirmation method [{method}] differs from [{}]",
                SubjectConfirmation::BEARER
            )));
        }

        let data = confirmation
            .subject_confirmation_data
            .as_ref()
            .ok_or_else(|| fail("subject confirmation data missing".to_string()))?;

        let recipient = data.recipient.as_deref().unwrap_or_default();
        if recipient.trim().is_empty() {
            return Err(fail("subject confirmation recipient missing or empty".to_string()));
        }
        if recipient != destination {
            return Err(fail(format!(
                "subject confirmation recipient [{recipient}] differs from [{destination}]"
            )));
        }

        let data_in_response_to = data.in_response_to.as_deref().unwrap_or_default();
        if data_in_response_to.trim().is_empty() {
            return Err(fail("subject confirmation InResponseTo missing or empty".to_string()));
        }
        if data_in_response_to != in_response_to {
            return Err(fail(format!(
                "subject confirmation InResponseTo [{data_in_response_to}] differs from [{in_response_to}]"
            )));
        }

        let expiry = resolve(data.not_on_or_after.as_ref())
            .map_err(|e| fail(format!("subject confirmation NotOnOrAfter {e}")))?;
        if expiry < conditions_expiry {
            return Err(fail(format!(
                "subject confirmation NotOnOrAfter [{expiry}] precedes conditions NotOnOrAfter [{conditions_expiry}]"
            )));
        }
    }
    Ok(())
}

fn check_issuer(scope: &CheckScope<'_>, assertion: &Assertion) -> CheckResult {
    let fail = |detail: String| scope.fail_assertion(assertion, FailureKind::Issuer, detail);

    let issuer = assertion
        .issuer
        .as_ref()
        .ok_or_else(|| fail("issuer missing".to_string()))?;

    let value = issuer.value.as_str();
    let expected = &scope.context.idp_entity_id;
    if value.trim().is_empty() {
        return Err(fail("issuer value missing or empty".to_string()));
    }
    if value != expected {
        return Err(fail(format!("issuer [{value}] differs from IdP entity ID [{expected}]")));
    }

    let format = issuer.format.as_deref().unwrap_or_default();
    if format.trim().is_empty() {
        return Err(fail("issuer format missing or empty".to_string()));
    }
    if format != NameIdFormat::Entity.uri() {
        return Err(fail(format!(
            "issuer format [{format}] differs from {}",
            NameIdFormat::Entity.uri()
        )));
    }
    Ok(())
}

fn check_conditions(scope: &CheckScope<'_>, assertion: &Assertion) -> CheckResult {
    let conditions = assertion.conditions.as_ref().ok_or_else(|| {
        scope.fail_assertion(assertion, FailureKind::Conditions, "conditions missing")
    })?;

    for stage in CONDITIONS_STAGES {
        tracing::trace!(assertion_id = %assertion.id, stage = stage.name, "conditions check");
        (stage.check)(scope, assertion, conditions)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::ComplianceChecker;
    use crate::error::FailureKind;
    use crate::types::*;

    fn kind_of(response: &Response) -> FailureKind {
        ComplianceChecker::new(StubValidator)
            .check(response, &credentials(), &context())
            .unwrap_err()
            .failure()
            .expect("compliance failure")
            .kind
    }

    fn response_fixture() -> Response {
        response()
    }

    fn subject(response: &mut Response) -> &mut Subject {
        response.assertions[0].subject.as_mut().unwrap()
    }

    fn confirmation_data(response: &mut Response) -> &mut SubjectConfirmationData {
        subject(response).subject_confirmations[0]
            .subject_confirmation_data
            .as_mut()
            .unwrap()
    }

    #[test]
    fn missing_assertion_id() {
        let response = with_assertion(|a| a.id = " ".to_string());
        assert_eq!(kind_of(&response), FailureKind::Identifier);
    }

    #[test]
    fn unsigned_assertion() {
        let response = with_assertion(|a| a.signature = None);
        assert_eq!(kind_of(&response), FailureKind::Signature);
    }

    #[test]
    fn assertion_signed_for_another_id() {
        let response = with_assertion(|a| a.signature = Some(signature("_r1")));
        assert_eq!(kind_of(&response), FailureKind::Signature);
    }

    #[test]
    fn assertion_version() {
        let response = with_assertion(|a| a.version = "1.1".to_string());
        assert_eq!(kind_of(&response), FailureKind::Version);
    }

    #[test]
    fn assertion_issue_instant_missing_or_malformed() {
        let response = with_assertion(|a| a.issue_instant = None);
        assert_eq!(kind_of(&response), FailureKind::IssueInstant);

        let response = with_assertion(|a| a.issue_instant = Some(Timestamp::new("03/01/2024")));
        assert_eq!(kind_of(&response), FailureKind::IssueInstant);
    }

    #[test]
    fn authn_instant_tolerance_bounds() {
        // authn at -1000; issue instant 0; tolerance 180000
        let response = with_assertion(|a| a.authn_statements[0].authn_instant = Some(at(-180_000)));
        let checker = ComplianceChecker::new(StubValidator);
        assert!(checker.check(&response, &credentials(), &context()).is_ok());

        let response = with_assertion(|a| a.authn_statements[0].authn_instant = Some(at(-180_001)));
        assert_eq!(kind_of(&response), FailureKind::TemporalWindow);

        let response = with_assertion(|a| a.authn_statements[0].authn_instant = Some(at(180_001)));
        assert_eq!(kind_of(&response), FailureKind::TemporalWindow);
    }

    #[test]
    fn authn_instant_missing() {
        let response = with_assertion(|a| a.authn_statements[0].authn_instant = None);
        assert_eq!(kind_of(&response), FailureKind::IssueInstant);
    }

    #[test]
    fn subject_rules() {
        let response = with_assertion(|a| a.subject = None);
        assert_eq!(kind_of(&response), FailureKind::Subject);

        let response = with_assertion(|a| a.subject = Some(Subject::default()));
        assert_eq!(kind_of(&response), FailureKind::Subject);

        let mut response = response_fixture();
        subject(&mut response).name_id = None;
        assert_eq!(kind_of(&response), FailureKind::Subject);

        let mut response = response_fixture();
        if let Some(name_id) = subject(&mut response).name_id.as_mut() {
            name_id.format = Some(NameIdFormat::Persistent.uri().to_string());
        }
        assert_eq!(kind_of(&response), FailureKind::Subject);

        let mut response = response_fixture();
        if let Some(name_id) = subject(&mut response).name_id.as_mut() {
            name_id.name_qualifier = Some(String::new());
        }
        assert_eq!(kind_of(&response), FailureKind::Subject);
    }

    #[test]
    fn subject_confirmation_rules() {
        let mut response = response_fixture();
        subject(&mut response).subject_confirmations.clear();
        assert_eq!(kind_of(&response), FailureKind::SubjectConfirmation);

        let mut response = response_fixture();
        subject(&mut response).subject_confirmations[0].method =
            SubjectConfirmation::HOLDER_OF_KEY.to_string();
        assert_eq!(kind_of(&response), FailureKind::SubjectConfirmation);

        let mut response = response_fixture();
        subject(&mut response).subject_confirmations[0].subject_confirmation_data = None;
        assert_eq!(kind_of(&response), FailureKind::SubjectConfirmation);

        let mut response = response_fixture();
        confirmation_data(&mut response).recipient = Some("https://sp.example/other".to_string());
        assert_eq!(kind_of(&response), FailureKind::SubjectConfirmation);

        let mut response = response_fixture();
        confirmation_data(&mut response).in_response_to = Some("_other".to_string());
        assert_eq!(kind_of(&response), FailureKind::SubjectConfirmation);

        let mut response = response_fixture();
        confirmation_data(&mut response).not_on_or_after = None;
        assert_eq!(kind_of(&response), FailureKind::SubjectConfirmation);
    }

    #[test]
    fn confirmation_must_outlive_conditions() {
        let mut response = response_fixture();
        confirmation_data(&mut response).not_on_or_after = Some(at(299_999));
        assert_eq!(kind_of(&response), FailureKind::SubjectConfirmation);

        let mut response = response_fixture();
        confirmation_data(&mut response).not_on_or_after = Some(at(300_000));
        assert!(ComplianceChecker::new(StubValidator)
            .check(&response, &credentials(), &context())
            .is_ok());
    }

    #[test]
    fn confirmation_needs_response_in_response_to() {
        let mut response = response_fixture();
        response.in_response_to = None;
        assert_eq!(kind_of(&response), FailureKind::SubjectConfirmation);
    }

    #[test]
    fn missing_conditions() {
        let response = with_assertion(|a| a.conditions = None);
        assert_eq!(kind_of(&response), FailureKind::Conditions);
    }

    #[test]
    fn assertion_issuer_rules() {
        let response = with_assertion(|a| a.issuer = None);
        assert_eq!(kind_of(&response), FailureKind::Issuer);

        let response = with_assertion(|a| a.issuer = Some(Issuer::entity("https://other.example/")));
        assert_eq!(kind_of(&response), FailureKind::Issuer);

        // unlike the response issuer, the assertion issuer format is mandatory
        let response = with_assertion(|a| a.issuer = Some(Issuer::new(IDP_ENTITY_ID)));
        assert_eq!(kind_of(&response), FailureKind::Issuer);
    }
}
