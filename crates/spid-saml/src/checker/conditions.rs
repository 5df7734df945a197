//! Rules on the conditions, authentication context and attributes of an
//! assertion.

use tracing::warn;

use super::{CheckResult, CheckScope, ConditionsCheck, Stage};
use crate::error::FailureKind;
use crate::types::{resolve, Assertion, Conditions, SpidLevel};

/// Rules run by the `conditions` assertion stage, in order.
pub const CONDITIONS_STAGES: &[Stage<ConditionsCheck>] = &[
    Stage {
        name: "validity_window",
        check: check_validity_window,
    },
    Stage {
        name: "audience",
        check: check_audience,
    },
    Stage {
        name: "authn_context",
        check: check_authn_context,
    },
    Stage {
        name: "attributes",
        check: check_attributes,
    },
];

/// The response issue instant must lie within `[NotBefore, NotOnOrAfter]`.
fn check_validity_window(
    scope: &CheckScope<'_>,
    assertion: &Assertion,
    conditions: &Conditions,
) -> CheckResult {
    let fail = |detail: String| scope.fail_assertion(assertion, FailureKind::Conditions, detail);

    let not_before = resolve(conditions.not_before.as_ref())
        .map_err(|e| fail(format!("conditions NotBefore {e}")))?;
    let not_on_or_after = resolve(conditions.not_on_or_after.as_ref())
        .map_err(|e| fail(format!("conditions NotOnOrAfter {e}")))?;
    let issue_instant = resolve(scope.response.issue_instant.as_ref()).map_err(|e| {
        scope.fail_assertion(
            assertion,
            FailureKind::IssueInstant,
            format_args!("response issue instant {e}"),
        )
    })?;

    if not_before > issue_instant {
        return Err(fail(format!(
            "conditions NotBefore [{not_before}] follows response issue instant [{issue_instant}]"
        )));
    }
    if not_on_or_after < issue_instant {
        return Err(fail(format!(
            "conditions NotOnOrAfter [{not_on_or_after}] precedes response issue instant [{issue_instant}]"
        )));
    }
    Ok(())
}

fn check_audience(scope: &CheckScope<'_>, assertion: &Assertion, conditions: &Conditions) -> CheckResult {
    let fail = |detail: String| scope.fail_assertion(assertion, FailureKind::Audience, detail);

    if conditions.audience_restrictions.is_empty() {
        return Err(fail("audience restriction missing".to_string()));
    }

    let expected = &scope.context.sp_entity_id;
    for restriction in &conditions.audience_restrictions {
        if restriction.audiences.is_empty() {
            return Err(fail("audience missing".to_string()));
        }
        for audience in &restriction.audiences {
            if audience.trim().is_empty() {
                return Err(fail("audience URI empty".to_string()));
            }
            if audience != expected {
                return Err(fail(format!(
                    "audience [{audience}] differs from SP entity ID [{expected}]"
                )));
            }
        }
    }
    Ok(())
}

fn check_authn_context(scope: &CheckScope<'_>, assertion: &Assertion, _: &Conditions) -> CheckResult {
    let fail = |detail: String| scope.fail_assertion(assertion, FailureKind::AuthnContext, detail);

    if assertion.authn_statements.is_empty() {
        return Err(fail("authn statement missing".to_string()));
    }

    let min_level = scope.context.min_level;
    for statement in &assertion.authn_statements {
        let context = statement
            .authn_context
            .as_ref()
            .ok_or_else(|| fail("authn context missing".to_string()))?;
        let class_ref = context
            .authn_context_class_ref
            .as_deref()
            .ok_or_else(|| fail("authn context class ref missing".to_string()))?;
        if class_ref.trim().is_empty() {
            return Err(fail("authn context class ref empty".to_string()));
        }

        let level = SpidLevel::from_uri(class_ref)
            .ok_or_else(|| fail(format!("authn context class ref [{class_ref}] is not a SPID level")))?;
        if level < min_level {
            return Err(fail(format!(
                "authn context class ref [{class_ref}] below required {}",
                min_level.uri()
            )));
        }
    }
    Ok(())
}

fn check_attributes(scope: &CheckScope<'_>, assertion: &Assertion, _: &Conditions) -> CheckResult {
    let fail = |detail: String| scope.fail_assertion(assertion, FailureKind::Attributes, detail);

    if assertion.attribute_statements.is_empty() {
        return Err(fail("attribute statement missing".to_string()));
    }

    let requested = scope.context.requested_names();
    for statement in &assertion.attribute_statements {
        let attributes = &statement.attributes;
        if attributes.is_empty() {
            return Err(fail("attribute statement holds no attribute".to_string()));
        }
        if attributes.len() != requested.len() {
            return Err(fail(format!(
                "{} attributes requested from the IdP, {} received",
                requested.len(),
                attributes.len()
            )));
        }

        for attribute in attributes {
            if attribute.values.is_empty() {
                return Err(fail(format!("attribute [{}] has no value", attribute.name)));
            }
            if attribute.name_format.as_deref().map_or(true, |f| f.trim().is_empty()) {
                warn!(
                    response_id = %scope.response.id,
                    assertion_id = %assertion.id,
                    attribute = %attribute.name,
                    "attribute has no name format"
                );
            }
            if !scope.context.is_requested(&attribute.name) {
                return Err(fail(format!(
                    "attribute [{}] not in the requested set {requested:?}",
                    attribute.name
                )));
            }
        }
    }
    Ok(())
}
