//! # spid-crypto
//!
//! Cryptographic operations for SPID response processing using aws-lc-rs.
//!
//! The SPID technical rules pin the algorithm set an identity provider may
//! use, which is narrower than what XML-DSig and XML-Enc allow:
//!
//! - **Signatures**: RSA PKCS#1 v1.5 and ECDSA with SHA-256 or stronger.
//!   RSA-SHA1 is only reachable through an explicit opt-in.
//! - **Key transport**: RSA-OAEP with MGF1/SHA-1.
//! - **Content encryption**: AES-GCM and AES-CBC (128 and 256 bit keys).
//!
//! Everything here is synchronous and CPU bound; keys are immutable once
//! loaded and can be shared across threads.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod algorithm;
pub mod decrypt;
pub mod error;
pub mod hash;
pub mod keys;
pub mod verify;

pub use algorithm::{ContentCipher, DigestAlgorithm, KeyTransport, SignatureScheme};
pub use decrypt::{decrypt_content, RsaDecryptionKey};
pub use error::{CryptoError, CryptoResult};
pub use hash::digest;
pub use keys::{certificate_subject, pem_to_der, spki_from_certificate};
pub use verify::verify_signature;
