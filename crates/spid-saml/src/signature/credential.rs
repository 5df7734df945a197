//! Trust credentials.

use std::fmt;

use spid_crypto::{certificate_subject, pem_to_der, spki_from_certificate};

use crate::error::{SamlError, SamlResult};

const CERTIFICATE_LABEL: &str = "CERTIFICATE";
const PEM_END: &str = "-----END CERTIFICATE-----";

/// A public key trusted to sign responses and assertions.
///
/// Usually one per signing certificate found in the IdP metadata.
#[derive(Clone, PartialEq, Eq)]
pub struct TrustCredential {
    public_key: Vec<u8>,
    label: Option<String>,
}

impl TrustCredential {
    /// Creates a credential from a DER `SubjectPublicKeyInfo` or raw public key.
    #[must_use]
    pub fn from_public_key(public_key: impl Into<Vec<u8>>) -> Self {
        Self {
            public_key: public_key.into(),
            label: None,
        }
    }

    /// Creates a credential from a DER X.509 certificate.
    ///
    /// The certificate subject becomes the label.
    pub fn from_certificate_der(cert_der: &[u8]) -> SamlResult<Self> {
        let public_key = spki_from_certificate(cert_der)?;
        Ok(Self {
            public_key,
            label: certificate_subject(cert_der).ok(),
        })
    }

    /// Creates a credential from a PEM certificate or a bare base64 body.
    pub fn from_certificate_pem(pem: &str) -> SamlResult<Self> {
        let der = pem_to_der(pem, CERTIFICATE_LABEL)?;
        Self::from_certificate_der(&der)
    }

    /// Creates one credential per certificate in a PEM bundle.
    pub fn from_pem_bundle(bundle: &str) -> SamlResult<Vec<Self>> {
        let credentials = bundle
            .split_inclusive(PEM_END)
            .filter(|block| block.contains(PEM_END))
            .map(Self::from_certificate_pem)
            .collect::<SamlResult<Vec<_>>>()?;

        if credentials.is_empty() {
            return Err(SamlError::MissingElement(
                "no certificate found in PEM bundle".to_string(),
            ));
        }
        Ok(credentials)
    }

    /// Sets a label used in log messages.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns the public key bytes.
    #[must_use]
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Returns the label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl fmt::Debug for TrustCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrustCredential")
            .field("label", &self.label)
            .field("public_key_len", &self.public_key.len())
            .finish()
    }
}

impl fmt::Display for TrustCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => f.write_str(label),
            None => write!(f, "<{} byte key>", self.public_key.len()),
        }
    }
}
