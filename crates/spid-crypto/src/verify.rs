//! Signature verification over canonical `SignedInfo` octets.
//!
//! The public key may be given either as a DER `SubjectPublicKeyInfo` (what
//! an X.509 certificate carries) or in the raw form aws-lc-rs emits for its
//! own key pairs. A mismatch is reported as `Ok(false)`, never as an error.

use aws_lc_rs::signature::{self, UnparsedPublicKey, VerificationAlgorithm};

use crate::algorithm::SignatureScheme;
use crate::error::{CryptoError, CryptoResult};

/// Verifies a signature with the given scheme.
///
/// # Arguments
///
/// * `public_key_der` - Public key (`SubjectPublicKeyInfo` or raw key bytes)
/// * `data` - Octets that were signed
/// * `sig` - Signature value (raw `r || s` for ECDSA, as XML-DSig mandates)
/// * `scheme` - Signature scheme from `ds:SignatureMethod`
///
/// # Errors
///
/// Returns an error if the key material is empty.
pub fn verify_signature(
    public_key_der: &[u8],
    data: &[u8],
    sig: &[u8],
    scheme: SignatureScheme,
) -> CryptoResult<bool> {
    if public_key_der.is_empty() {
        return Err(CryptoError::InvalidKey("empty public key".to_string()));
    }

    let valid = candidates(scheme)
        .iter()
        .any(|alg| UnparsedPublicKey::new(*alg, public_key_der).verify(data, sig).is_ok());

    Ok(valid)
}

/// Returns the aws-lc-rs algorithms that may implement a scheme.
///
/// XML-DSig ECDSA URIs name the hash but not the curve; the curve is taken
/// to be the one matching the hash size.
fn candidates(scheme: SignatureScheme) -> &'static [&'static dyn VerificationAlgorithm] {
    match scheme {
        SignatureScheme::RsaSha256 => &[&signature::RSA_PKCS1_2048_8192_SHA256],
        SignatureScheme::RsaSha384 => &[&signature::RSA_PKCS1_2048_8192_SHA384],
        SignatureScheme::RsaSha512 => &[&signature::RSA_PKCS1_2048_8192_SHA512],
        SignatureScheme::RsaSha1 => &[&signature::RSA_PKCS1_2048_8192_SHA1_FOR_LEGACY_USE_ONLY],
        SignatureScheme::EcdsaSha256 => &[&signature::ECDSA_P256_SHA256_FIXED],
        SignatureScheme::EcdsaSha384 => &[&signature::ECDSA_P384_SHA384_FIXED],
        SignatureScheme::EcdsaSha512 => &[&signature::ECDSA_P521_SHA512_FIXED],
    }
}
