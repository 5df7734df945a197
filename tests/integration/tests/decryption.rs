//! Encrypted assertions opened with a real SP key.

use spid_integration_tests::*;
use spid_saml::{ComplianceChecker, DecryptionError, SpidCheckerError};

const ATTRIBUTES: &[&str] = &["spidCode", "email"];

#[test]
fn encrypted_assertion_is_accepted() -> anyhow::Result<()> {
    init_tracing();
    let idp = IdpKey::generate()?;
    let sp = SpKey::generate()?;
    let encrypted = sp.encrypt(&assertion(&idp, "_a1", ATTRIBUTES)?)?;
    let response = envelope(&idp, "_r1")?.with_encrypted_assertion(encrypted);
    let context = context(ATTRIBUTES).with_decryption_key(sp.decryption_key());

    checker()
        .check(&response, &[idp.credential()], &context)
        .map_err(anyhow::Error::from)
}

#[test]
fn missing_key_is_an_evaluation_error() -> anyhow::Result<()> {
    let idp = IdpKey::generate()?;
    let sp = SpKey::generate()?;
    let encrypted = sp.encrypt(&assertion(&idp, "_a1", ATTRIBUTES)?)?;
    let response = envelope(&idp, "_r1")?.with_encrypted_assertion(encrypted);

    let err = checker()
        .check(&response, &[idp.credential()], &context(ATTRIBUTES))
        .unwrap_err();
    assert!(!err.is_compliance_failure());
    assert!(matches!(err, SpidCheckerError::Decryption(DecryptionError::MissingKey)));
    assert_eq!(err.http_status(), 500);
    Ok(())
}

#[test]
fn checker_without_decrypter_refuses_encrypted_assertions() -> anyhow::Result<()> {
    let idp = IdpKey::generate()?;
    let sp = SpKey::generate()?;
    let encrypted = sp.encrypt(&assertion(&idp, "_a1", ATTRIBUTES)?)?;
    let response = envelope(&idp, "_r1")?.with_encrypted_assertion(encrypted);
    let context = context(ATTRIBUTES).with_decryption_key(sp.decryption_key());

    let err = ComplianceChecker::default()
        .check(&response, &[idp.credential()], &context)
        .unwrap_err();
    assert!(matches!(
        err,
        SpidCheckerError::Decryption(DecryptionError::DecrypterUnavailable)
    ));
    Ok(())
}

#[test]
fn foreign_key_cannot_open_the_assertion() -> anyhow::Result<()> {
    let idp = IdpKey::generate()?;
    let sp = SpKey::generate()?;
    let other = SpKey::generate()?;
    let encrypted = sp.encrypt(&assertion(&idp, "_a1", ATTRIBUTES)?)?;
    let response = envelope(&idp, "_r1")?.with_encrypted_assertion(encrypted);
    let context = context(ATTRIBUTES).with_decryption_key(other.decryption_key());

    let err = checker()
        .check(&response, &[idp.credential()], &context)
        .unwrap_err();
    assert!(matches!(err, SpidCheckerError::Decryption(DecryptionError::Crypto(_))));
    Ok(())
}

#[test]
fn plaintext_assertions_take_precedence() -> anyhow::Result<()> {
    let idp = IdpKey::generate()?;
    let sp = SpKey::generate()?;
    let mut undecryptable = sp.encrypt(&assertion(&idp, "_a2", ATTRIBUTES)?)?;
    undecryptable.encrypted_data.cipher_data.cipher_value = "not base64!".into();
    let response = response(&idp, "_r1", assertion(&idp, "_a1", ATTRIBUTES)?)?
        .with_encrypted_assertion(undecryptable);

    checker()
        .check(&response, &[idp.credential()], &context(ATTRIBUTES))
        .map_err(anyhow::Error::from)
}
