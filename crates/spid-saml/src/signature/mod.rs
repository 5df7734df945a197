//! Trust verification of XML signatures.
//!
//! The XML-DSig layer that locates `<ds:Signature>`, resolves its reference
//! and canonicalizes `SignedInfo` runs upstream. What reaches this module is
//! an [`XmlSignature`] holding the canonical octets and the encoded values,
//! plus the set of [`TrustCredential`]s the caller trusts for the issuer.
//!
//! A signature is bound to the element carrying it: its reference must name
//! that element's ID and the digest of the referenced content must match.
//!
//! # Algorithms
//!
//! - RSA-SHA256, RSA-SHA384, RSA-SHA512
//! - ECDSA-SHA256, ECDSA-SHA384, ECDSA-SHA512
//! - RSA-SHA1, only when the validator is built with
//!   [`XmlSignatureValidator::allow_sha1`]

mod credential;
mod validator;

pub use credential::*;
pub use validator::*;

use serde::{Deserialize, Serialize};
use spid_crypto::{DigestAlgorithm, SignatureScheme};

/// Canonicalization algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CanonicalizationAlgorithm {
    /// Exclusive C14N without comments.
    #[default]
    #[serde(rename = "http://www.w3.org/2001/10/xml-exc-c14n#")]
    ExclusiveC14N,
    /// Exclusive C14N with comments.
    #[serde(rename = "http://www.w3.org/2001/10/xml-exc-c14n#WithComments")]
    ExclusiveC14NWithComments,
    /// C14N without comments.
    #[serde(rename = "http://www.w3.org/TR/2001/REC-xml-c14n-20010315")]
    C14N,
    /// C14N with comments.
    #[serde(rename = "http://www.w3.org/TR/2001/REC-xml-c14n-20010315#WithComments")]
    C14NWithComments,
}

impl CanonicalizationAlgorithm {
    /// Returns the URI for this canonicalization algorithm.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::ExclusiveC14N => "http://www.w3.org/2001/10/xml-exc-c14n#",
            Self::ExclusiveC14NWithComments => "http://www.w3.org/2001/10/xml-exc-c14n#WithComments",
            Self::C14N => "http://www.w3.org/TR/2001/REC-xml-c14n-20010315",
            Self::C14NWithComments => "http://www.w3.org/TR/2001/REC-xml-c14n-20010315#WithComments",
        }
    }

    /// Parses a canonicalization algorithm from its URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            "http://www.w3.org/2001/10/xml-exc-c14n#" => Some(Self::ExclusiveC14N),
            "http://www.w3.org/2001/10/xml-exc-c14n#WithComments" => {
                Some(Self::ExclusiveC14NWithComments)
            }
            "http://www.w3.org/TR/2001/REC-xml-c14n-20010315" => Some(Self::C14N),
            "http://www.w3.org/TR/2001/REC-xml-c14n-20010315#WithComments" => {
                Some(Self::C14NWithComments)
            }
            _ => None,
        }
    }
}

/// XML Signature structure.
///
/// Represents the `<ds:Signature>` element of a signed response or assertion
/// after reference resolution and canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlSignature {
    /// The signature algorithm (`ds:SignatureMethod`).
    pub algorithm: SignatureScheme,

    /// The canonicalization algorithm (`ds:CanonicalizationMethod`).
    ///
    /// Informational: [`signed_info`](Self::signed_info) and
    /// [`signed_content`](Self::signed_content) arrive already canonicalized.
    #[serde(default)]
    pub canonicalization: CanonicalizationAlgorithm,

    /// The reference URI, `#` followed by the signed element ID.
    ///
    /// A signature only counts for the element whose ID it references.
    #[serde(default)]
    pub reference_uri: String,

    /// The digest algorithm (`ds:DigestMethod`).
    pub digest_algorithm: DigestAlgorithm,

    /// The digest value (base64 encoded).
    pub digest_value: String,

    /// The signature value (base64 encoded).
    pub signature_value: String,

    /// Canonical `ds:SignedInfo`, the octets the signature covers.
    pub signed_info: String,

    /// Canonical referenced content.
    ///
    /// Its digest must equal [`digest_value`](Self::digest_value); a signature
    /// without it is never valid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_content: Option<String>,

    /// Embedded X.509 certificate (base64 encoded, DER format).
    ///
    /// Informational: trust comes only from the caller's credentials, and the
    /// key that verifies is always one of theirs, never this certificate's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x509_certificate: Option<String>,
}

impl XmlSignature {
    /// Creates a signature over `signed_info` with the given encoded values.
    #[must_use]
    pub fn new(
        algorithm: SignatureScheme,
        reference_uri: impl Into<String>,
        digest_value: impl Into<String>,
        signed_info: impl Into<String>,
        signature_value: impl Into<String>,
    ) -> Self {
        Self {
            algorithm,
            canonicalization: CanonicalizationAlgorithm::default(),
            reference_uri: reference_uri.into(),
            digest_algorithm: algorithm.digest(),
            digest_value: digest_value.into(),
            signature_value: signature_value.into(),
            signed_info: signed_info.into(),
            signed_content: None,
            x509_certificate: None,
        }
    }

    /// Attaches the canonical referenced content.
    #[must_use]
    pub fn with_signed_content(mut self, content: impl Into<String>) -> Self {
        self.signed_content = Some(content.into());
        self
    }

    /// Attaches the embedded certificate.
    #[must_use]
    pub fn with_certificate(mut self, certificate_b64: impl Into<String>) -> Self {
        self.x509_certificate = Some(certificate_b64.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalization_algorithm_uri_roundtrip() {
        for alg in [
            CanonicalizationAlgorithm::ExclusiveC14N,
            CanonicalizationAlgorithm::ExclusiveC14NWithComments,
            CanonicalizationAlgorithm::C14N,
            CanonicalizationAlgorithm::C14NWithComments,
        ] {
            assert_eq!(CanonicalizationAlgorithm::from_uri(alg.uri()), Some(alg));
        }
    }

    #[test]
    fn signature_deserializes_algorithm_uris() {
        let json = r##"{
            "algorithm": "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256",
            "canonicalization": "http://www.w3.org/2001/10/xml-exc-c14n#",
            "reference_uri": "#_r1",
            "digest_algorithm": "http://www.w3.org/2001/04/xmlenc#sha256",
            "digest_value": "AAAA",
            "signature_value": "BBBB",
            "signed_info": "<ds:SignedInfo/>"
        }"##;
        let signature: XmlSignature = serde_json::from_str(json).unwrap();
        assert_eq!(signature.algorithm, SignatureScheme::RsaSha256);
        assert_eq!(signature.digest_algorithm, DigestAlgorithm::Sha256);
        assert!(signature.signed_content.is_none());
    }

    #[test]
    fn new_derives_digest_algorithm() {
        let signature = XmlSignature::new(SignatureScheme::EcdsaSha384, "#_a", "", "", "");
        assert_eq!(signature.digest_algorithm, DigestAlgorithm::Sha384);
    }
}
