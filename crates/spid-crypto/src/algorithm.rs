//! Algorithm identifiers used by XML-DSig and XML-Enc.
//!
//! Each enum maps one-to-one onto the algorithm URIs found in
//! `SignatureMethod`, `DigestMethod` and `EncryptionMethod` elements.

use serde::{Deserialize, Serialize};

/// Signature schemes accepted on SPID responses and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureScheme {
    /// RSA PKCS#1 v1.5 with SHA-256.
    #[serde(rename = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256")]
    RsaSha256,

    /// RSA PKCS#1 v1.5 with SHA-384.
    #[serde(rename = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha384")]
    RsaSha384,

    /// RSA PKCS#1 v1.5 with SHA-512.
    #[serde(rename = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha512")]
    RsaSha512,

    /// ECDSA with SHA-256 (P-256 key).
    #[serde(rename = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha256")]
    EcdsaSha256,

    /// ECDSA with SHA-384 (P-384 key).
    #[serde(rename = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha384")]
    EcdsaSha384,

    /// ECDSA with SHA-512 (P-521 key).
    #[serde(rename = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha512")]
    EcdsaSha512,

    /// Legacy RSA PKCS#1 v1.5 with SHA-1 (rejected unless explicitly allowed).
    #[serde(rename = "http://www.w3.org/2000/09/xmldsig#rsa-sha1")]
    RsaSha1,
}

impl SignatureScheme {
    /// Returns the XML-DSig algorithm URI.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::RsaSha256 => "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256",
            Self::RsaSha384 => "http://www.w3.org/2001/04/xmldsig-more#rsa-sha384",
            Self::RsaSha512 => "http://www.w3.org/2001/04/xmldsig-more#rsa-sha512",
            Self::EcdsaSha256 => "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha256",
            Self::EcdsaSha384 => "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha384",
            Self::EcdsaSha512 => "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha512",
            Self::RsaSha1 => "http://www.w3.org/2000/09/xmldsig#rsa-sha1",
        }
    }

    /// Parses a signature scheme from its URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        [
            Self::RsaSha256,
            Self::RsaSha384,
            Self::RsaSha512,
            Self::EcdsaSha256,
            Self::EcdsaSha384,
            Self::EcdsaSha512,
            Self::RsaSha1,
        ]
        .into_iter()
        .find(|scheme| scheme.uri() == uri)
    }

    /// Returns the digest algorithm paired with this scheme.
    #[must_use]
    pub const fn digest(self) -> DigestAlgorithm {
        match self {
            Self::RsaSha256 | Self::EcdsaSha256 => DigestAlgorithm::Sha256,
            Self::RsaSha384 | Self::EcdsaSha384 => DigestAlgorithm::Sha384,
            Self::RsaSha512 | Self::EcdsaSha512 => DigestAlgorithm::Sha512,
            Self::RsaSha1 => DigestAlgorithm::Sha1,
        }
    }

    /// Returns true if this scheme uses RSA.
    #[must_use]
    pub const fn is_rsa(self) -> bool {
        matches!(
            self,
            Self::RsaSha256 | Self::RsaSha384 | Self::RsaSha512 | Self::RsaSha1
        )
    }

    /// Returns true if this scheme relies on SHA-1.
    #[must_use]
    pub const fn is_deprecated(self) -> bool {
        matches!(self, Self::RsaSha1)
    }
}

/// Digest algorithms used in `ds:Reference` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-1 (legacy).
    #[serde(rename = "http://www.w3.org/2000/09/xmldsig#sha1")]
    Sha1,

    /// SHA-256.
    #[serde(rename = "http://www.w3.org/2001/04/xmlenc#sha256")]
    Sha256,

    /// SHA-384.
    #[serde(rename = "http://www.w3.org/2001/04/xmldsig-more#sha384")]
    Sha384,

    /// SHA-512.
    #[serde(rename = "http://www.w3.org/2001/04/xmlenc#sha512")]
    Sha512,
}

impl DigestAlgorithm {
    /// Returns the digest method URI.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Sha1 => "http://www.w3.org/2000/09/xmldsig#sha1",
            Self::Sha256 => "http://www.w3.org/2001/04/xmlenc#sha256",
            Self::Sha384 => "http://www.w3.org/2001/04/xmldsig-more#sha384",
            Self::Sha512 => "http://www.w3.org/2001/04/xmlenc#sha512",
        }
    }

    /// Parses a digest algorithm from its URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        [Self::Sha1, Self::Sha256, Self::Sha384, Self::Sha512]
            .into_iter()
            .find(|alg| alg.uri() == uri)
    }

    /// Returns the output length in bytes.
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }
}

/// Key transport algorithms for `xenc:EncryptedKey`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyTransport {
    /// RSA-OAEP with MGF1/SHA-1 (XML-Enc 1.0).
    RsaOaepMgf1p,
    /// RSA-OAEP as defined by XML-Enc 1.1, with the default SHA-1 digest and MGF1/SHA-1.
    RsaOaep,
}

impl KeyTransport {
    /// Returns the encryption method URI.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::RsaOaepMgf1p => "http://www.w3.org/2001/04/xmlenc#rsa-oaep-mgf1p",
            Self::RsaOaep => "http://www.w3.org/2009/xmlenc11#rsa-oaep",
        }
    }

    /// Parses a key transport algorithm from its URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        [Self::RsaOaepMgf1p, Self::RsaOaep]
            .into_iter()
            .find(|alg| alg.uri() == uri)
    }
}

/// Block ciphers for `xenc:EncryptedData`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentCipher {
    /// AES-128 in GCM mode.
    Aes128Gcm,
    /// AES-256 in GCM mode.
    Aes256Gcm,
    /// AES-128 in CBC mode, the XML-Enc default.
    Aes128Cbc,
    /// AES-256 in CBC mode.
    Aes256Cbc,
}

impl ContentCipher {
    /// Returns the encryption method URI.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Aes128Gcm => "http://www.w3.org/2009/xmlenc11#aes128-gcm",
            Self::Aes256Gcm => "http://www.w3.org/2009/xmlenc11#aes256-gcm",
            Self::Aes128Cbc => "http://www.w3.org/2001/04/xmlenc#aes128-cbc",
            Self::Aes256Cbc => "http://www.w3.org/2001/04/xmlenc#aes256-cbc",
        }
    }

    /// Parses a content cipher from its URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        [
            Self::Aes128Gcm,
            Self::Aes256Gcm,
            Self::Aes128Cbc,
            Self::Aes256Cbc,
        ]
        .into_iter()
        .find(|alg| alg.uri() == uri)
    }

    /// Returns the key length in bytes.
    #[must_use]
    pub const fn key_len(self) -> usize {
        match self {
            Self::Aes128Gcm | Self::Aes128Cbc => 16,
            Self::Aes256Gcm | Self::Aes256Cbc => 32,
        }
    }
}
