//! Name identifiers and issuers.

use serde::{Deserialize, Serialize};

use super::NameIdFormat;

/// `saml:NameID` of an assertion subject.
///
/// SPID IdPs send a transient value qualified by their own entity ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameId {
    /// Opaque subject handle.
    #[serde(default)]
    pub value: String,

    /// `Format` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// `NameQualifier` attribute, the IdP entity ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_qualifier: Option<String>,
}

impl NameId {
    /// Creates a name ID without format or qualifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// Creates a transient name ID.
    #[must_use]
    pub fn transient(value: impl Into<String>) -> Self {
        Self::new(value).with_format(NameIdFormat::Transient.uri())
    }

    /// Sets the format.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Sets `NameQualifier`.
    #[must_use]
    pub fn with_name_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.name_qualifier = Some(qualifier.into());
        self
    }

    /// Returns the format if it is one SPID uses.
    #[must_use]
    pub fn known_format(&self) -> Option<NameIdFormat> {
        self.format.as_deref().and_then(NameIdFormat::from_uri)
    }
}

/// Issuer of a response or an assertion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuer {
    /// Entity identifier of the issuer.
    #[serde(default)]
    pub value: String,

    /// Name ID format of the issuer element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Issuer {
    /// Creates an issuer without format.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            format: None,
        }
    }

    /// Creates an issuer with the entity format SPID requires.
    #[must_use]
    pub fn entity(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            format: Some(NameIdFormat::Entity.uri().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_name_id() {
        let name_id = NameId::transient("_abc").with_name_qualifier("https://idp.example");
        assert_eq!(name_id.known_format(), Some(NameIdFormat::Transient));
        assert_eq!(name_id.name_qualifier.as_deref(), Some("https://idp.example"));
    }

    #[test]
    fn entity_issuer() {
        let issuer = Issuer::entity("https://idp.example");
        assert_eq!(issuer.format.as_deref(), Some(NameIdFormat::Entity.uri()));
        assert_eq!(Issuer::new("https://idp.example").format, None);
    }
}
