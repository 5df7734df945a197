//! XML-Enc assertion decryption.

use base64::Engine;
use spid_crypto::{decrypt_content, ContentCipher, KeyTransport};
use tracing::debug;

use crate::error::{DecryptionError, SamlResult};
use crate::types::{Assertion, EncryptedAssertion};

use super::DecryptionKey;

/// Turns decrypted assertion octets into an [`Assertion`].
///
/// This is where the XML parser plugs in.
pub trait AssertionParser: Send + Sync {
    /// Parses one assertion.
    fn parse(&self, plaintext: &[u8]) -> SamlResult<Assertion>;
}

/// Decrypts a single encrypted assertion.
pub trait AssertionDecrypter: Send + Sync {
    /// Decrypts `encrypted` with `key`.
    fn decrypt(
        &self,
        encrypted: &EncryptedAssertion,
        key: &DecryptionKey,
    ) -> Result<Assertion, DecryptionError>;
}

/// XML-Enc decrypter: RSA-OAEP key transport and AES-GCM or AES-CBC content.
#[derive(Debug, Clone, Default)]
pub struct XmlEncDecrypter<P> {
    parser: P,
}

impl<P: AssertionParser> XmlEncDecrypter<P> {
    /// Creates a decrypter handing plaintext to `parser`.
    pub const fn new(parser: P) -> Self {
        Self { parser }
    }
}

fn decode_cipher_value(value: &str) -> Result<Vec<u8>, DecryptionError> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| DecryptionError::InvalidCipherValue(e.to_string()))
}

impl<P: AssertionParser> AssertionDecrypter for XmlEncDecrypter<P> {
    fn decrypt(
        &self,
        encrypted: &EncryptedAssertion,
        key: &DecryptionKey,
    ) -> Result<Assertion, DecryptionError> {
        let data = &encrypted.encrypted_data;
        let encrypted_key = encrypted
            .encrypted_key()
            .ok_or(DecryptionError::MissingElement("EncryptedKey"))?;

        let transport_uri = encrypted_key
            .encryption_method
            .as_deref()
            .ok_or(DecryptionError::MissingElement("EncryptedKey/EncryptionMethod"))?;
        let transport = KeyTransport::from_uri(transport_uri)
            .ok_or_else(|| DecryptionError::UnsupportedAlgorithm(transport_uri.to_string()))?;

        let cipher_uri = data
            .encryption_method
            .as_deref()
            .ok_or(DecryptionError::MissingElement("EncryptedData/EncryptionMethod"))?;
        let cipher = ContentCipher::from_uri(cipher_uri)
            .ok_or_else(|| DecryptionError::UnsupportedAlgorithm(cipher_uri.to_string()))?;

        let wrapped = decode_cipher_value(&encrypted_key.cipher_data.cipher_value)?;
        let content_key = key.unwrap_key(&wrapped, transport)?;

        let sealed = decode_cipher_value(&data.cipher_data.cipher_value)?;
        let plaintext = decrypt_content(&content_key, &sealed, cipher)?;
        debug!(cipher = cipher.uri(), len = plaintext.len(), "assertion decrypted");

        self.parser
            .parse(&plaintext)
            .map_err(|e| DecryptionError::Parse(e.to_string()))
    }
}

/// Decrypts every encrypted assertion.
///
/// Fails on the first assertion that cannot be decrypted; no partial result
/// is returned.
pub fn decrypt_assertions(
    encrypted: &[EncryptedAssertion],
    key: Option<&DecryptionKey>,
    decrypter: &dyn AssertionDecrypter,
) -> Result<Vec<Assertion>, DecryptionError> {
    if encrypted.is_empty() {
        return Ok(Vec::new());
    }
    let key = key.ok_or(DecryptionError::MissingKey)?;

    encrypted
        .iter()
        .map(|assertion| decrypter.decrypt(assertion, key))
        .collect()
}
