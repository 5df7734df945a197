//! XML Signature validation.
//!
//! Provides functionality for validating signatures on SAML documents.

use base64::Engine;
use spid_crypto::{digest, verify_signature};
use tracing::debug;

use crate::error::{SamlError, SamlResult};

use super::{TrustCredential, XmlSignature};

/// Checks one signature against one credential.
///
/// Implementations return `Ok(())` only for a cryptographically valid
/// signature; any other outcome is an error carrying the reason.
pub trait SignatureValidator: Send + Sync {
    /// Validates `signature` with the key of `credential`.
    fn validate(&self, signature: &XmlSignature, credential: &TrustCredential) -> SamlResult<()>;
}

/// XML signature validator backed by aws-lc-rs.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlSignatureValidator {
    /// Whether to allow SHA-1 signatures (deprecated but sometimes needed).
    allow_sha1: bool,
}

impl XmlSignatureValidator {
    /// Creates a validator rejecting SHA-1.
    #[must_use]
    pub const fn new() -> Self {
        Self { allow_sha1: false }
    }

    /// Allows SHA-1 based signatures (not recommended).
    #[must_use]
    pub const fn allow_sha1(mut self, allow: bool) -> Self {
        self.allow_sha1 = allow;
        self
    }

    /// Verifies the digest of the referenced content.
    ///
    /// A signature whose referenced content was not kept by the parser is
    /// rejected, since nothing ties its `SignedInfo` to the element.
    fn verify_digest(&self, signature: &XmlSignature) -> SamlResult<()> {
        let Some(content) = signature.signed_content.as_deref() else {
            return Err(SamlError::SignatureInvalid(
                "referenced content not available for digest check".to_string(),
            ));
        };

        let calculated = digest(signature.digest_algorithm, content.as_bytes());
        let calculated_b64 = base64::engine::general_purpose::STANDARD.encode(calculated);

        if calculated_b64 != signature.digest_value.trim() {
            return Err(SamlError::SignatureInvalid(
                "digest value mismatch".to_string(),
            ));
        }
        if !signature.signed_info.contains(&calculated_b64) {
            return Err(SamlError::SignatureInvalid(
                "digest value is not covered by SignedInfo".to_string(),
            ));
        }
        Ok(())
    }
}

impl SignatureValidator for XmlSignatureValidator {
    fn validate(&self, signature: &XmlSignature, credential: &TrustCredential) -> SamlResult<()> {
        if signature.algorithm.is_deprecated() && !self.allow_sha1 {
            return Err(SamlError::SignatureInvalid(
                "SHA-1 signatures are not allowed".to_string(),
            ));
        }

        self.verify_digest(signature)?;

        let value: String = signature
            .signature_value
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let signature_bytes = base64::engine::general_purpose::STANDARD
            .decode(value)
            .map_err(|e| SamlError::SignatureInvalid(format!("invalid signature encoding: {e}")))?;

        let valid = verify_signature(
            credential.public_key(),
            signature.signed_info.as_bytes(),
            &signature_bytes,
            signature.algorithm,
        )?;

        if valid {
            Ok(())
        } else {
            Err(SamlError::SignatureInvalid(
                "signature does not match the credential".to_string(),
            ))
        }
    }
}

/// Returns true if the signature references the element with ID `element_id`.
///
/// Only same-document references of the form `#ID` are accepted.
#[must_use]
pub fn references_element(signature: &XmlSignature, element_id: &str) -> bool {
    !element_id.is_empty()
        && signature
            .reference_uri
            .strip_prefix('#')
            .is_some_and(|id| id == element_id)
}

/// Returns true if `signature` belongs to the element `element_id` and any
/// credential validates it.
///
/// An absent signature is not valid, nor is one whose reference points at a
/// different element. Credentials are tried in order and the first success
/// wins; every failure, including malformed input, only counts as "not valid".
pub fn is_signature_valid(
    signature: Option<&XmlSignature>,
    element_id: &str,
    credentials: &[TrustCredential],
    validator: &dyn SignatureValidator,
) -> bool {
    let Some(signature) = signature else {
        debug!("no signature to validate");
        return false;
    };
    if !references_element(signature, element_id) {
        debug!(
            element_id,
            reference = %signature.reference_uri,
            "signature references another element"
        );
        return false;
    }

    credentials.iter().any(|credential| {
        match validator.validate(signature, credential) {
            Ok(()) => {
                debug!(credential = %credential, reference = %signature.reference_uri, "signature validated");
                true
            }
            Err(e) => {
                debug!(credential = %credential, error = %e, "signature rejected by credential");
                false
            }
        }
    })
}
