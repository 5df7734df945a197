//! Rules on the response envelope.

use tracing::warn;

use super::{CheckResult, CheckScope, ResponseCheck, Stage, TrailingCheck};
use crate::anomaly::{parse_anomaly_code, UserAnomaly};
use crate::error::{ComplianceFailure, FailureKind};
use crate::signature::is_signature_valid;
use crate::temporal::{check_window, WindowViolation};
use crate::types::{
    resolve, status_codes, sub_status_codes, Assertion, NameIdFormat, SAML_VERSION,
};

/// Rules run before the assertions are resolved.
pub const RESPONSE_STAGES: &[Stage<ResponseCheck>] = &[
    Stage {
        name: "identifier",
        check: check_identifier,
    },
    Stage {
        name: "version",
        check: check_version,
    },
    Stage {
        name: "signature",
        check: check_signature,
    },
    Stage {
        name: "status",
        check: check_status,
    },
];

/// Rules run after every assertion passed.
pub const TRAILING_STAGES: &[Stage<TrailingCheck>] = &[
    Stage {
        name: "issue_instant_window",
        check: check_issue_instant_window,
    },
    Stage {
        name: "destination",
        check: check_destination,
    },
    Stage {
        name: "issuer",
        check: check_issuer,
    },
];

fn check_identifier(scope: &CheckScope<'_>) -> CheckResult {
    if scope.response.id.trim().is_empty() {
        return Err(ComplianceFailure::new(
            FailureKind::Identifier,
            "SAML Response ID missing or empty",
        ));
    }
    Ok(())
}

fn check_version(scope: &CheckScope<'_>) -> CheckResult {
    let version = &scope.response.version;
    if version != SAML_VERSION {
        return Err(scope.fail(
            FailureKind::Version,
            format_args!("SAML version [{version}] differs from [{SAML_VERSION}]"),
        ));
    }
    Ok(())
}

fn check_signature(scope: &CheckScope<'_>) -> CheckResult {
    if !is_signature_valid(
        scope.response.signature.as_ref(),
        &scope.response.id,
        scope.credentials,
        scope.validator(),
    ) {
        return Err(scope.fail(
            FailureKind::Signature,
            "response signature not verified by any trusted credential",
        ));
    }
    Ok(())
}

fn check_status(scope: &CheckScope<'_>) -> CheckResult {
    let response = scope.response;
    let status = response
        .status
        .as_ref()
        .ok_or_else(|| scope.fail(FailureKind::Status, "status element not present"))?;
    let code = status
        .status_code
        .as_ref()
        .ok_or_else(|| scope.fail(FailureKind::Status, "status code element not present"))?;

    let value = code.value.as_str();
    if value.trim().is_empty() {
        return Err(scope.fail(FailureKind::Status, "status code value missing or empty"));
    }

    if value == status_codes::RESPONDER {
        let message = status.status_message.as_deref().map(str::trim).unwrap_or_default();
        let authn_failed = status.nested_code_value() == Some(sub_status_codes::AUTHN_FAILED);
        if authn_failed && !message.is_empty() {
            warn!(
                response_id = %response.id,
                status = value,
                status_message = message,
                "IdP reported an authentication failure"
            );
            if let Some(anomaly) = parse_anomaly_code(message) {
                let description = UserAnomaly::from_code(anomaly)
                    .map_or("unknown anomaly", UserAnomaly::user_message);
                return Err(ComplianceFailure::anomaly(
                    anomaly,
                    format!(
                        "SAML Response ID {}: status code [{value}] differs from {}, user anomaly {anomaly} ({description})",
                        response.id,
                        status_codes::SUCCESS
                    ),
                ));
            }
        }
    }

    if value != status_codes::SUCCESS {
        return Err(scope.fail(
            FailureKind::Status,
            format_args!("status code [{value}] differs from {}", status_codes::SUCCESS),
        ));
    }
    Ok(())
}

fn check_issue_instant_window(scope: &CheckScope<'_>, assertions: &[Assertion]) -> CheckResult {
    let issue_instant = resolve(scope.response.issue_instant.as_ref()).map_err(|e| {
        scope.fail(FailureKind::IssueInstant, format_args!("response issue instant {e}"))
    })?;
    let tolerance_ms = scope.context.tolerance_ms;

    for assertion in assertions {
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
                    "response issue instant [{issue_instant}] {relation} authn instant [{authn_instant}] by more than {tolerance_ms} ms"
                ),
            ));
        }
    }
    Ok(())
}

fn check_destination(scope: &CheckScope<'_>, _: &[Assertion]) -> CheckResult {
    let expected = &scope.context.destination;
    match scope.response.destination.as_deref() {
        None | Some("") => Err(scope.fail(FailureKind::Destination, "destination not present")),
        Some(destination) if destination != expected => Err(scope.fail(
            FailureKind::Destination,
            format_args!("destination [{destination}] differs from [{expected}]"),
        )),
        Some(_) => Ok(()),
    }
}

fn check_issuer(scope: &CheckScope<'_>, _: &[Assertion]) -> CheckResult {
    let response = scope.response;
    let issuer = response
        .issuer
        .as_ref()
        .ok_or_else(|| scope.fail(FailureKind::Issuer, "issuer element not present"))?;

    let expected = &scope.context.idp_entity_id;
    if &issuer.value != expected {
        return Err(scope.fail(
            FailureKind::Issuer,
            format_args!("issuer [{}] differs from selected IdP [{expected}]", issuer.value),
        ));
    }

    match issuer.format.as_deref().map(str::trim) {
        None | Some("") => {
            warn!(response_id = %response.id, "response issuer has no format");
            Ok(())
        }
        Some(format) if format != NameIdFormat::Entity.uri() => Err(scope.fail(
            FailureKind::Issuer,
            format_args!(
                "issuer format [{format}] differs from [{}]",
                NameIdFormat::Entity.uri()
            ),
        )),
        Some(_) => Ok(()),
    }
}
