//! Signed plaintext responses through the full rule chain.

use spid_integration_tests::*;
use spid_saml::metadata::attribute_sets;
use spid_saml::{FailureKind, SpidCheckerError, Status};

const ATTRIBUTES: &[&str] = &["spidCode", "fiscalNumber"];

fn failure_kind(err: &SpidCheckerError) -> FailureKind {
    err.failure().expect("compliance failure").kind
}

#[test]
fn signed_response_is_accepted() -> anyhow::Result<()> {
    init_tracing();
    let idp = IdpKey::generate()?;
    let response = response(&idp, "_r1", assertion(&idp, "_a1", ATTRIBUTES)?)?;

    checker()
        .check(&response, &[idp.credential()], &context(ATTRIBUTES))
        .map_err(anyhow::Error::from)
}

#[test]
fn foreign_audience_is_rejected_with_401() -> anyhow::Result<()> {
    let idp = IdpKey::generate()?;
    let mut assertion = assertion(&idp, "_a1", ATTRIBUTES)?;
    if let Some(conditions) = assertion.conditions.as_mut() {
        conditions.audience_restrictions[0].audiences = vec!["https://other.example.it/".into()];
    }
    let response = response(&idp, "_r1", assertion)?;

    let err = checker()
        .check(&response, &[idp.credential()], &context(ATTRIBUTES))
        .unwrap_err();
    assert_eq!(failure_kind(&err), FailureKind::Audience);
    assert_eq!(err.http_status(), 401);
    assert!(err.to_string().contains("https://other.example.it/"));
    Ok(())
}

#[test]
fn user_anomaly_is_reported_with_403() -> anyhow::Result<()> {
    let idp = IdpKey::generate()?;
    let response = envelope(&idp, "_r1")?.with_status(Status::authn_failed("ErrorCode nr22"));

    let err = checker()
        .check(&response, &[idp.credential()], &context(ATTRIBUTES))
        .unwrap_err();
    assert_eq!(failure_kind(&err), FailureKind::UserAnomaly);
    assert_eq!(err.anomaly_code(), Some(22));
    assert_eq!(err.http_status(), 403);
    Ok(())
}

#[test]
fn unknown_anomaly_code_is_still_reported() -> anyhow::Result<()> {
    let idp = IdpKey::generate()?;
    let response = envelope(&idp, "_r1")?.with_status(Status::authn_failed("ErrorCode nr42"));

    let err = checker()
        .check(&response, &[idp.credential()], &context(ATTRIBUTES))
        .unwrap_err();
    assert_eq!(err.anomaly_code(), Some(42));
    assert_eq!(err.http_status(), 403);
    Ok(())
}

#[test]
fn partial_attribute_set_is_rejected() -> anyhow::Result<()> {
    let idp = IdpKey::generate()?;
    let response = response(
        &idp,
        "_r1",
        assertion(&idp, "_a1", &["spidCode", "name", "familyName", "fiscalNumber"])?,
    )?;
    let context = context(&[]).with_attribute_service(&attribute_sets::minimo());

    let err = checker()
        .check(&response, &[idp.credential()], &context)
        .unwrap_err();
    assert_eq!(failure_kind(&err), FailureKind::Attributes);
    Ok(())
}

#[test]
fn wrong_version_is_rejected() -> anyhow::Result<()> {
    let idp = IdpKey::generate()?;
    let mut response = response(&idp, "_r1", assertion(&idp, "_a1", ATTRIBUTES)?)?;
    response.version = "1.1".into();

    let err = checker()
        .check(&response, &[idp.credential()], &context(ATTRIBUTES))
        .unwrap_err();
    assert_eq!(failure_kind(&err), FailureKind::Version);
    Ok(())
}

#[test]
fn checks_are_idempotent_and_shareable() -> anyhow::Result<()> {
    let idp = IdpKey::generate()?;
    let credentials = [idp.credential()];
    let context = context(ATTRIBUTES);
    let response = response(&idp, "_r1", assertion(&idp, "_a1", ATTRIBUTES)?)?;
    let checker = checker();

    let first = checker.check(&response, &credentials, &context).is_ok();
    let second = checker.check(&response, &credentials, &context).is_ok();
    assert!(first && second);

    let (checker, response, credentials, context) = (&checker, &response, &credentials, &context);
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(move || checker.check(response, credentials, context).is_ok()))
            .collect();
        for handle in handles {
            assert!(handle.join().expect("checker thread panicked"));
        }
    });
    Ok(())
}

#[test]
fn any_trusted_credential_may_sign() -> anyhow::Result<()> {
    let retired = IdpKey::generate()?;
    let current = IdpKey::generate()?;
    let response = response(&current, "_r1", assertion(&current, "_a1", ATTRIBUTES)?)?;

    let credentials = [retired.credential(), current.credential()];
    assert!(checker().check(&response, &credentials, &context(ATTRIBUTES)).is_ok());

    let err = checker()
        .check(&response, &[retired.credential()], &context(ATTRIBUTES))
        .unwrap_err();
    assert_eq!(failure_kind(&err), FailureKind::Signature);
    Ok(())
}

#[test]
fn tampered_content_is_rejected() -> anyhow::Result<()> {
    let idp = IdpKey::generate()?;
    let mut response = response(&idp, "_r1", assertion(&idp, "_a1", ATTRIBUTES)?)?;
    if let Some(signature) = response.signature.as_mut() {
        signature.signed_content = Some(r#"<samlp:Response ID="_r2"/>"#.into());
    }

    let err = checker()
        .check(&response, &[idp.credential()], &context(ATTRIBUTES))
        .unwrap_err();
    assert_eq!(failure_kind(&err), FailureKind::Signature);
    Ok(())
}

#[test]
fn assertion_signature_cannot_vouch_for_the_response() -> anyhow::Result<()> {
    let idp = IdpKey::generate()?;
    let mut response = response(&idp, "_r1", assertion(&idp, "_a1", ATTRIBUTES)?)?;
    response.signature = response.assertions[0].signature.clone();

    let err = checker()
        .check(&response, &[idp.credential()], &context(ATTRIBUTES))
        .unwrap_err();
    assert_eq!(failure_kind(&err), FailureKind::Signature);
    assert!(err.to_string().contains("_r1"));
    Ok(())
}

#[test]
fn signature_without_referenced_content_is_rejected() -> anyhow::Result<()> {
    let idp = IdpKey::generate()?;
    let mut response = response(&idp, "_r1", assertion(&idp, "_a1", ATTRIBUTES)?)?;

    let mut forged = idp.sign("_forged", r#"<samlp:Response ID="_forged"/>"#)?;
    forged.signed_content = None;
    response.signature = Some(forged.clone());
    let err = checker()
        .check(&response, &[idp.credential()], &context(ATTRIBUTES))
        .unwrap_err();
    assert_eq!(failure_kind(&err), FailureKind::Signature);

    forged.reference_uri = "#_r1".into();
    response.signature = Some(forged);
    let err = checker()
        .check(&response, &[idp.credential()], &context(ATTRIBUTES))
        .unwrap_err();
    assert_eq!(failure_kind(&err), FailureKind::Signature);
    Ok(())
}

#[test]
fn tolerance_widens_the_authn_window() -> anyhow::Result<()> {
    let idp = IdpKey::generate()?;
    let mut assertion = assertion(&idp, "_a1", ATTRIBUTES)?;
    assertion.authn_statements[0].authn_instant = Some(instant(-200_000));
    let response = response(&idp, "_r1", assertion)?;

    let err = checker()
        .check(&response, &[idp.credential()], &context(ATTRIBUTES))
        .unwrap_err();
    assert_eq!(failure_kind(&err), FailureKind::TemporalWindow);

    let relaxed = context(ATTRIBUTES).with_tolerance_ms(300_000);
    assert!(checker().check(&response, &[idp.credential()], &relaxed).is_ok());
    Ok(())
}
