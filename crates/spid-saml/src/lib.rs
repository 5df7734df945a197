//! SPID SAML 2.0 response compliance for service providers.
//!
//! This crate decides whether an already parsed SAML authentication response
//! issued by a SPID identity provider satisfies the AgID technical rules:
//!
//! - **Compliance checking** - An ordered, fail-fast pipeline over the
//!   response and each of its assertions
//! - **Trust verification** - XML signatures checked against a set of trusted
//!   IdP credentials, any of which may match
//! - **Assertion decryption** - XML-Enc encrypted assertions opened with the
//!   SP key pair
//! - **SP metadata** - `EntityDescriptor` generation including the SPID and
//!   invoicing contact extensions
//!
//! # Architecture
//!
//! - [`types`] - SAML protocol object graph and SPID constants
//! - [`temporal`] - Tolerance window arithmetic
//! - [`signature`] - Trust credentials and signature validation
//! - [`encryption`] - Encrypted assertion handling
//! - [`checker`] - The compliance pipeline
//! - [`context`] - Per-call validation parameters
//! - [`metadata`] - SP metadata builder and AgID attribute sets
//! - [`error`] - Error taxonomy
//!
//! # Example
//!
//! ```rust,ignore
//! use spid_saml::{ComplianceChecker, ComplianceContext, SpidLevel};
//!
//! let context = ComplianceContext::new(
//!     "https://sp.example/acs",
//!     "https://idp.example/",
//!     "https://sp.example/",
//! )
//! .with_requested_attributes(["spidCode", "name", "familyName"])
//! .with_min_level(SpidLevel::L2);
//!
//! let checker = ComplianceChecker::default();
//! match checker.check(&response, &credentials, &context) {
//!     Ok(()) => { /* accepted */ }
//!     Err(e) if e.anomaly_code().is_some() => { /* user-facing anomaly */ }
//!     Err(e) => { /* rejected or not evaluable */ }
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod anomaly;
pub mod checker;
pub mod context;
pub mod encryption;
pub mod error;
pub mod metadata;
pub mod signature;
pub mod temporal;
pub mod types;

pub use anomaly::UserAnomaly;
pub use checker::ComplianceChecker;
pub use context::ComplianceContext;
pub use error::{
    ComplianceFailure, DecryptionError, FailureKind, SamlError, SamlResult, SpidCheckerError,
};
pub use signature::{is_signature_valid, SignatureValidator, TrustCredential, XmlSignatureValidator};
pub use types::*;
