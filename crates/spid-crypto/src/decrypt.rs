//! XML-Enc key transport and content decryption.
//!
//! An `xenc:EncryptedAssertion` carries a symmetric content key wrapped with
//! the service provider's RSA public key, and the assertion itself encrypted
//! under that content key. This module unwraps the key and opens the
//! ciphertext; parsing the resulting XML is left to the caller.

use std::fmt;

use aws_lc_rs::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_128_GCM, AES_256_GCM, NONCE_LEN};
use aws_lc_rs::cipher::{DecryptingKey, DecryptionContext, UnboundCipherKey, AES_128, AES_256};
use aws_lc_rs::iv::FixedLength;
use aws_lc_rs::rsa::{OaepPrivateDecryptingKey, PrivateDecryptingKey, OAEP_SHA1_MGF1SHA1};

use crate::algorithm::{ContentCipher, KeyTransport};
use crate::error::{CryptoError, CryptoResult};
use crate::keys::pem_to_der;

/// Length of the GCM authentication tag appended to the ciphertext.
const GCM_TAG_LEN: usize = 16;

/// AES block size, which is also the length of a CBC IV.
const AES_BLOCK_LEN: usize = 16;

/// RSA private key used to unwrap XML-Enc content keys.
pub struct RsaDecryptionKey {
    inner: OaepPrivateDecryptingKey,
    modulus_bits: usize,
}

impl RsaDecryptionKey {
    /// Loads a key from PKCS#8 DER.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a valid RSA PKCS#8 document.
    pub fn from_pkcs8(pkcs8_der: &[u8]) -> CryptoResult<Self> {
        let key = PrivateDecryptingKey::from_pkcs8(pkcs8_der)
            .map_err(|e| CryptoError::InvalidKey(format!("invalid RSA key: {e}")))?;
        Self::from_private_key(key)
    }

    /// Loads a key from a PEM `PRIVATE KEY` block.
    ///
    /// # Errors
    ///
    /// Returns an error if the PEM or the key inside it is invalid.
    pub fn from_pem(pem: &str) -> CryptoResult<Self> {
        let der = pem_to_der(pem, "PRIVATE KEY")?;
        Self::from_pkcs8(&der)
    }

    /// Wraps an already loaded aws-lc-rs key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be used for OAEP.
    pub fn from_private_key(key: PrivateDecryptingKey) -> CryptoResult<Self> {
        let modulus_bits = key.key_size_bits();
        let inner = OaepPrivateDecryptingKey::new(key)
            .map_err(|e| CryptoError::InvalidKey(format!("key unusable for RSA-OAEP: {e}")))?;
        Ok(Self {
            inner,
            modulus_bits,
        })
    }

    /// Returns the modulus size in bits.
    #[must_use]
    pub const fn modulus_bits(&self) -> usize {
        self.modulus_bits
    }

    /// Unwraps a content encryption key.
    ///
    /// # Errors
    ///
    /// Returns an error if the wrapped key does not decrypt under this key.
    pub fn unwrap_key(&self, wrapped: &[u8], transport: KeyTransport) -> CryptoResult<Vec<u8>> {
        let algorithm = match transport {
            KeyTransport::RsaOaepMgf1p | KeyTransport::RsaOaep => &OAEP_SHA1_MGF1SHA1,
        };

        let mut output = vec![0u8; self.inner.min_output_size()];
        let key = self
            .inner
            .decrypt(algorithm, wrapped, &mut output, None)
            .map_err(|_| CryptoError::Decryption("content key unwrap failed".to_string()))?;

        Ok(key.to_vec())
    }
}

impl fmt::Debug for RsaDecryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaDecryptionKey")
            .field("modulus_bits", &self.modulus_bits)
            .finish_non_exhaustive()
    }
}

/// Decrypts `xenc:CipherValue` octets with a content key.
///
/// GCM input is laid out as `IV (12) || ciphertext || tag (16)`, CBC input as
/// `IV (16) || ciphertext`.
///
/// # Errors
///
/// Returns an error for a key of the wrong length, truncated or misaligned
/// input, bad CBC padding, or a failed GCM authentication check.
pub fn decrypt_content(key: &[u8], data: &[u8], cipher: ContentCipher) -> CryptoResult<Vec<u8>> {
    if key.len() != cipher.key_len() {
        return Err(CryptoError::InvalidKey(format!(
            "content key is {} bytes, {} expects {}",
            key.len(),
            cipher.uri(),
            cipher.key_len()
        )));
    }

    match cipher {
        ContentCipher::Aes128Gcm => open_gcm(&AES_128_GCM, key, data),
        ContentCipher::Aes256Gcm => open_gcm(&AES_256_GCM, key, data),
        ContentCipher::Aes128Cbc => decrypt_cbc(&AES_128, key, data),
        ContentCipher::Aes256Cbc => decrypt_cbc(&AES_256, key, data),
    }
}

fn open_gcm(
    algorithm: &'static aws_lc_rs::aead::Algorithm,
    key: &[u8],
    data: &[u8],
) -> CryptoResult<Vec<u8>> {
    if data.len() < NONCE_LEN + GCM_TAG_LEN {
        return Err(CryptoError::Decryption("cipher value too short".to_string()));
    }

    let (iv, sealed) = data.split_at(NONCE_LEN);
    let unbound = UnboundKey::new(algorithm, key)
        .map_err(|_| CryptoError::InvalidKey("content key rejected".to_string()))?;
    let opening_key = LessSafeKey::new(unbound);
    let nonce = Nonce::try_assume_unique_for_key(iv)
        .map_err(|_| CryptoError::Decryption("invalid GCM nonce".to_string()))?;

    let mut in_out = sealed.to_vec();
    let plaintext = opening_key
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| CryptoError::Decryption("GCM authentication failed".to_string()))?;

    Ok(plaintext.to_vec())
}

fn decrypt_cbc(
    algorithm: &'static aws_lc_rs::cipher::Algorithm,
    key: &[u8],
    data: &[u8],
) -> CryptoResult<Vec<u8>> {
    if data.len() < 2 * AES_BLOCK_LEN || data.len() % AES_BLOCK_LEN != 0 {
        return Err(CryptoError::Decryption(
            "cipher value is not a whole number of CBC blocks".to_string(),
        ));
    }

    let (iv, ciphertext) = data.split_at(AES_BLOCK_LEN);
    let iv: [u8; AES_BLOCK_LEN] = iv
        .try_into()
        .map_err(|_| CryptoError::Decryption("invalid CBC IV".to_string()))?;
    let unbound = UnboundCipherKey::new(algorithm, key)
        .map_err(|_| CryptoError::InvalidKey("content key rejected".to_string()))?;
    let decrypting_key = DecryptingKey::cbc(unbound)
        .map_err(|_| CryptoError::InvalidKey("content key rejected".to_string()))?;

    let mut in_out = ciphertext.to_vec();
    let plaintext = decrypting_key
        .decrypt(&mut in_out, DecryptionContext::Iv128(FixedLength::from(iv)))
        .map_err(|_| CryptoError::Decryption("CBC decryption failed".to_string()))?;

    let unpadded = strip_padding(plaintext)?;
    Ok(unpadded.to_vec())
}

/// Removes XML-Enc block padding.
///
/// Only the last octet, the padding length, is checked; the filler octets
/// before it are arbitrary.
fn strip_padding(plaintext: &[u8]) -> CryptoResult<&[u8]> {
    let pad = plaintext.last().map_or(0, |&last| usize::from(last));
    if pad == 0 || pad > AES_BLOCK_LEN || pad > plaintext.len() {
        return Err(CryptoError::Decryption("invalid CBC padding".to_string()));
    }
    Ok(&plaintext[..plaintext.len() - pad])
}
