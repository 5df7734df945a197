//! Assertion parser for JSON renderings of parsed responses.

use spid_saml::encryption::AssertionParser;
use spid_saml::{Assertion, SamlError, SamlResult};

/// Reads decrypted assertions that were encrypted as JSON.
///
/// Captured responses are handed to the CLI already parsed, so the plaintext
/// of an encrypted assertion is the JSON rendering of an [`Assertion`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonAssertionParser;

impl AssertionParser for JsonAssertionParser {
    fn parse(&self, plaintext: &[u8]) -> SamlResult<Assertion> {
        serde_json::from_slice(plaintext).map_err(|e| SamlError::Deserialization(e.to_string()))
    }
}
