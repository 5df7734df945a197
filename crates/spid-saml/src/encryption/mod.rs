//! Encrypted assertion support.
//!
//! SPID identity providers may encrypt assertions to the service provider's
//! encryption certificate. Decryption is all-or-nothing: if one assertion
//! cannot be opened, the response cannot be evaluated.

mod decrypter;

pub use decrypter::*;

/// RSA private key of the service provider.
pub use spid_crypto::RsaDecryptionKey as DecryptionKey;
