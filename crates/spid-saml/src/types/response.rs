//! The `samlp:Response` an IdP posts to the SP assertion consumer service.
//!
//! Every field the SPID rules inspect is optional here so that a response
//! missing it can be represented and rejected with a precise diagnostic.

use serde::{Deserialize, Serialize};

use super::{Assertion, Issuer, Status, Timestamp, SAML_VERSION};
use crate::signature::XmlSignature;

/// An authentication response as parsed from the POST binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// `ID` attribute; empty when absent.
    #[serde(default)]
    pub id: String,

    /// `Version` attribute; empty when absent.
    #[serde(default)]
    pub version: String,

    /// `IssueInstant` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_instant: Option<Timestamp>,

    /// `saml:Issuer` element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<Issuer>,

    /// `InResponseTo`, the ID of the SP authentication request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_response_to: Option<String>,

    /// `Destination`, the ACS URL the IdP posted to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// `samlp:Status` element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    /// Enveloped signature over the whole response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<XmlSignature>,

    /// Plaintext `saml:Assertion` elements, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assertions: Vec<Assertion>,

    /// `saml:EncryptedAssertion` elements, used only when no plaintext
    /// assertion is present.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub encrypted_assertions: Vec<EncryptedAssertion>,
}

impl Response {
    /// Creates a SAML 2.0 response with the given ID and issue instant.
    #[must_use]
    pub fn new(id: impl Into<String>, issue_instant: impl Into<Timestamp>) -> Self {
        Self {
            id: id.into(),
            version: SAML_VERSION.to_string(),
            issue_instant: Some(issue_instant.into()),
            ..Self::default()
        }
    }

    /// Sets the issuer.
    #[must_use]
    pub fn with_issuer(mut self, issuer: Issuer) -> Self {
        self.issuer = Some(issuer);
        self
    }

    /// Sets `InResponseTo`.
    #[must_use]
    pub fn in_response_to(mut self, request_id: impl Into<String>) -> Self {
        self.in_response_to = Some(request_id.into());
        self
    }

    /// Sets `Destination`.
    #[must_use]
    pub fn with_destination(mut self, url: impl Into<String>) -> Self {
        self.destination = Some(url.into());
        self
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the signature.
    #[must_use]
    pub fn with_signature(mut self, signature: XmlSignature) -> Self {
        self.signature = Some(signature);
        self
    }

    /// Appends a plaintext assertion.
    #[must_use]
    pub fn with_assertion(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// Appends an encrypted assertion.
    #[must_use]
    pub fn with_encrypted_assertion(mut self, assertion: EncryptedAssertion) -> Self {
        self.encrypted_assertions.push(assertion);
        self
    }

    /// Returns true if the top-level status is `Success`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.as_ref().is_some_and(Status::is_success)
    }
}

/// XML-Enc envelope of an assertion encrypted to the SP key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedAssertion {
    /// `xenc:EncryptedData`.
    pub encrypted_data: EncryptedData,

    /// Encrypted keys placed next to the data rather than inside its key info.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub encrypted_keys: Vec<EncryptedKey>,
}

impl EncryptedAssertion {
    /// Returns the encrypted content key, preferring the one inside `KeyInfo`.
    #[must_use]
    pub fn encrypted_key(&self) -> Option<&EncryptedKey> {
        self.encrypted_data
            .key_info
            .as_ref()
            .and_then(|info| info.encrypted_key.as_ref())
            .or_else(|| self.encrypted_keys.first())
    }
}

/// `xenc:EncryptedData`: content cipher and ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedData {
    /// Content cipher URI from `EncryptionMethod`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_method: Option<String>,

    /// `ds:KeyInfo`, usually holding the wrapped content key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_info: Option<KeyInfo>,

    /// Ciphertext.
    pub cipher_data: CipherData,
}

/// `ds:KeyInfo` of encrypted data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInfo {
    /// Wrapped content key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_key: Option<EncryptedKey>,

    /// `ds:KeyName`, informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
}

/// `xenc:EncryptedKey`: the content key wrapped with the SP public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedKey {
    /// Key transport URI from `EncryptionMethod`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_method: Option<String>,

    /// Wrapped key bytes.
    pub cipher_data: CipherData,
}

/// `xenc:CipherData`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherData {
    /// `CipherValue`, base64 with optional whitespace.
    pub cipher_value: String,
}

impl CipherData {
    /// Wraps a base64 cipher value.
    #[must_use]
    pub fn new(cipher_value: impl Into<String>) -> Self {
        Self {
            cipher_value: cipher_value.into(),
        }
    }
}
