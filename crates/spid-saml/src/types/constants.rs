//! SAML 2.0 and SPID constants.
//!
//! Namespace URIs, binding URIs, name ID formats, status codes and the SPID
//! authentication levels.

use serde::{Deserialize, Serialize};

/// The only protocol version SPID accepts.
pub const SAML_VERSION: &str = "2.0";

/// SAML 2.0 protocol namespace, advertised in `protocolSupportEnumeration`.
pub const SAMLP_NS: &str = "urn:oasis:names:tc:SAML:2.0:protocol";

/// SAML 2.0 metadata namespace URI.
pub const METADATA_NS: &str = "urn:oasis:names:tc:SAML:2.0:metadata";

/// XML-DSig namespace, used for `KeyInfo` in metadata.
pub const XMLDSIG_NS: &str = "http://www.w3.org/2000/09/xmldsig#";

/// SPID metadata extensions namespace URI.
pub const SPID_NS: &str = "https://spid.gov.it/saml-extensions";

/// Electronic invoicing (FatturaPA) namespace URI used in billing contacts.
pub const FPA_NS: &str = "http://ivaservizi.agenziaentrate.gov.it/docs/xsd/fatture/v1.2";

/// Bindings an SP may publish for its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SamlBinding {
    /// HTTP-POST, mandatory for assertion consumer services.
    #[serde(rename = "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST")]
    HttpPost,
    /// HTTP-Redirect.
    #[serde(rename = "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect")]
    HttpRedirect,
}

impl SamlBinding {
    /// Returns the binding URI.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::HttpPost => "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST",
            Self::HttpRedirect => "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect",
        }
    }
}

/// Name ID formats the SPID rules refer to.
///
/// Issuers must use `Entity`, subjects `Transient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameIdFormat {
    /// `nameid-format:entity`.
    Entity,
    /// `nameid-format:persistent`, never valid in a SPID subject.
    Persistent,
    /// `nameid-format:transient`.
    Transient,
}

impl NameIdFormat {
    /// Returns the format URI.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::Entity => "urn:oasis:names:tc:SAML:2.0:nameid-format:entity",
            Self::Persistent => "urn:oasis:names:tc:SAML:2.0:nameid-format:persistent",
            Self::Transient => "urn:oasis:names:tc:SAML:2.0:nameid-format:transient",
        }
    }

    /// Recognises a format URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        [Self::Entity, Self::Persistent, Self::Transient]
            .into_iter()
            .find(|format| format.uri() == uri)
    }
}

/// Common prefix of the SPID authentication context class references.
pub const SPID_LEVEL_BASE: &str = "https://www.spid.gov.it/SpidL";

/// SPID authentication assurance level.
///
/// Ordered, so `SpidL3 >= SpidL2` holds. Serialized as its ordinal (1..=3).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum SpidLevel {
    /// Single factor (username and password).
    #[default]
    L1,
    /// Two factors.
    L2,
    /// Two factors with a hardware token or smart card.
    L3,
}

impl SpidLevel {
    /// Returns the authentication context class reference URI.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::L1 => "https://www.spid.gov.it/SpidL1",
            Self::L2 => "https://www.spid.gov.it/SpidL2",
            Self::L3 => "https://www.spid.gov.it/SpidL3",
        }
    }

    /// Parses a level from its class reference URI.
    ///
    /// Only the three exact URIs are recognised.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            "https://www.spid.gov.it/SpidL1" => Some(Self::L1),
            "https://www.spid.gov.it/SpidL2" => Some(Self::L2),
            "https://www.spid.gov.it/SpidL3" => Some(Self::L3),
            _ => None,
        }
    }

    /// Returns the numeric level.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::L1 => 1,
            Self::L2 => 2,
            Self::L3 => 3,
        }
    }

    /// Parses a numeric level.
    #[must_use]
    pub const fn from_ordinal(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::L1),
            2 => Some(Self::L2),
            3 => Some(Self::L3),
            _ => None,
        }
    }
}

impl TryFrom<u8> for SpidLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::from_ordinal(level).ok_or_else(|| format!("SPID level must be 1, 2 or 3, got {level}"))
    }
}

impl From<SpidLevel> for u8 {
    fn from(level: SpidLevel) -> Self {
        level.ordinal()
    }
}

/// Top-level status codes an IdP answers with.
pub mod status_codes {
    /// The only status that lets a response through.
    pub const SUCCESS: &str = "urn:oasis:names:tc:SAML:2.0:status:Success";

    /// The SP request was malformed.
    pub const REQUESTER: &str = "urn:oasis:names:tc:SAML:2.0:status:Requester";

    /// The IdP failed; carries user anomalies when nested with `AuthnFailed`.
    pub const RESPONDER: &str = "urn:oasis:names:tc:SAML:2.0:status:Responder";
}

/// Nested status codes.
pub mod sub_status_codes {
    /// Authentication failed on the IdP side.
    pub const AUTHN_FAILED: &str = "urn:oasis:names:tc:SAML:2.0:status:AuthnFailed";
}

/// Attribute name formats.
pub mod attribute_name_formats {
    /// `attrname-format:basic`, the one SPID IdPs use.
    pub const BASIC: &str = "urn:oasis:names:tc:SAML:2.0:attrname-format:basic";
}
