//! `saml:Assertion` and the statements a SPID IdP puts in it.

use serde::{Deserialize, Serialize};

use super::{Issuer, NameId, SpidLevel, Timestamp, SAML_VERSION};
use crate::signature::XmlSignature;

/// An assertion about the authenticated citizen.
///
/// SPID requires exactly one subject, one set of conditions, an
/// authentication statement carrying the level and an attribute statement
/// matching what the SP requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    /// `ID` attribute; empty when absent.
    #[serde(default)]
    pub id: String,

    /// `Version` attribute; empty when absent.
    #[serde(default)]
    pub version: String,

    /// `IssueInstant` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_instant: Option<Timestamp>,

    /// `saml:Issuer`; must name the IdP with the entity format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<Issuer>,

    /// Enveloped signature over this assertion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<XmlSignature>,

    /// `saml:Subject`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,

    /// `saml:Conditions`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Conditions>,

    /// `saml:AuthnStatement` elements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authn_statements: Vec<AuthnStatement>,

    /// `saml:AttributeStatement` elements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_statements: Vec<AttributeStatement>,
}

impl Assertion {
    /// Creates a SAML 2.0 assertion with the given ID and issue instant.
    #[must_use]
    pub fn new(id: impl Into<String>, issue_instant: impl Into<Timestamp>) -> Self {
        Self {
            id: id.into(),
            version: SAML_VERSION.to_string(),
            issue_instant: Some(issue_instant.into()),
            ..Self::default()
        }
    }

    /// Sets the issuer.
    #[must_use]
    pub fn with_issuer(mut self, issuer: Issuer) -> Self {
        self.issuer = Some(issuer);
        self
    }

    /// Sets the signature.
    #[must_use]
    pub fn with_signature(mut self, signature: XmlSignature) -> Self {
        self.signature = Some(signature);
        self
    }

    /// Sets the subject.
    #[must_use]
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Sets the conditions.
    #[must_use]
    pub fn with_conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = Some(conditions);
        self
    }

    /// Adds an authentication statement.
    #[must_use]
    pub fn with_authn_statement(mut self, statement: AuthnStatement) -> Self {
        self.authn_statements.push(statement);
        self
    }

    /// Adds an attribute statement.
    #[must_use]
    pub fn with_attribute_statement(mut self, statement: AttributeStatement) -> Self {
        self.attribute_statements.push(statement);
        self
    }
}

/// The authenticated subject and how the SP may confirm it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// `saml:NameID`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_id: Option<NameId>,

    /// `saml:SubjectConfirmation` elements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subject_confirmations: Vec<SubjectConfirmation>,
}

impl Subject {
    /// Creates a subject without confirmations.
    #[must_use]
    pub fn new(name_id: NameId) -> Self {
        Self {
            name_id: Some(name_id),
            subject_confirmations: Vec::new(),
        }
    }

    /// Adds a subject confirmation.
    #[must_use]
    pub fn with_confirmation(mut self, confirmation: SubjectConfirmation) -> Self {
        self.subject_confirmations.push(confirmation);
        self
    }

    /// Returns true if the subject element has any child element.
    #[must_use]
    pub fn has_children(&self) -> bool {
        self.name_id.is_some() || !self.subject_confirmations.is_empty()
    }
}

/// One `saml:SubjectConfirmation`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectConfirmation {
    /// `Method` URI.
    #[serde(default)]
    pub method: String,

    /// `saml:SubjectConfirmationData`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_confirmation_data: Option<SubjectConfirmationData>,
}

impl SubjectConfirmation {
    /// Bearer confirmation method, the only one SPID allows.
    pub const BEARER: &'static str = "urn:oasis:names:tc:SAML:2.0:cm:bearer";

    /// Holder-of-key confirmation method.
    pub const HOLDER_OF_KEY: &'static str = "urn:oasis:names:tc:SAML:2.0:cm:holder-of-key";

    /// Creates a bearer subject confirmation.
    #[must_use]
    pub fn bearer() -> Self {
        Self {
            method: Self::BEARER.to_string(),
            subject_confirmation_data: None,
        }
    }

    /// Sets the confirmation data.
    #[must_use]
    pub fn with_data(mut self, data: SubjectConfirmationData) -> Self {
        self.subject_confirmation_data = Some(data);
        self
    }
}

/// `saml:SubjectConfirmationData`, binding the assertion to a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectConfirmationData {
    /// Request ID this confirmation is bound to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_response_to: Option<String>,

    /// `NotBefore`, ignored by the SPID rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<Timestamp>,

    /// Time at or after which the subject cannot be confirmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_on_or_after: Option<Timestamp>,

    /// URL of the assertion consumer service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,

    /// `Address`, informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl SubjectConfirmationData {
    /// Creates confirmation data bound to a request and a recipient.
    #[must_use]
    pub fn for_request(
        request_id: impl Into<String>,
        recipient: impl Into<String>,
        not_on_or_after: impl Into<Timestamp>,
    ) -> Self {
        Self {
            in_response_to: Some(request_id.into()),
            not_before: None,
            not_on_or_after: Some(not_on_or_after.into()),
            recipient: Some(recipient.into()),
            address: None,
        }
    }
}

/// Validity window and audience of an assertion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditions {
    /// `NotBefore`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<Timestamp>,

    /// `NotOnOrAfter`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_on_or_after: Option<Timestamp>,

    /// `saml:AudienceRestriction` elements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audience_restrictions: Vec<AudienceRestriction>,
}

impl Conditions {
    /// Creates conditions valid in `[not_before, not_on_or_after)`.
    #[must_use]
    pub fn new(not_before: impl Into<Timestamp>, not_on_or_after: impl Into<Timestamp>) -> Self {
        Self {
            not_before: Some(not_before.into()),
            not_on_or_after: Some(not_on_or_after.into()),
            audience_restrictions: Vec::new(),
        }
    }

    /// Adds an audience restriction holding a single audience.
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience_restrictions.push(AudienceRestriction {
            audiences: vec![audience.into()],
        });
        self
    }
}

/// One `saml:AudienceRestriction`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudienceRestriction {
    /// Allowed audiences.
    #[serde(default)]
    pub audiences: Vec<String>,
}

/// How and when the citizen authenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthnStatement {
    /// `AuthnInstant`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authn_instant: Option<Timestamp>,

    /// Session index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_index: Option<String>,

    /// Authentication context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authn_context: Option<AuthnContext>,
}

impl AuthnStatement {
    /// Creates a statement for the given instant and SPID level.
    #[must_use]
    pub fn new(authn_instant: impl Into<Timestamp>, level: SpidLevel) -> Self {
        Self {
            authn_instant: Some(authn_instant.into()),
            session_index: None,
            authn_context: Some(AuthnContext::class_ref(level.uri())),
        }
    }

    /// Sets the session index.
    #[must_use]
    pub fn with_session_index(mut self, index: impl Into<String>) -> Self {
        self.session_index = Some(index.into());
        self
    }

    /// Returns the authentication context class reference, if any.
    #[must_use]
    pub fn class_ref(&self) -> Option<&str> {
        self.authn_context
            .as_ref()
            .and_then(|context| context.authn_context_class_ref.as_deref())
    }
}

/// `saml:AuthnContext`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthnContext {
    /// `AuthnContextClassRef`, one of the SPID level URIs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authn_context_class_ref: Option<String>,
}

impl AuthnContext {
    /// Creates a context with the given class reference.
    #[must_use]
    pub fn class_ref(class_ref: impl Into<String>) -> Self {
        Self {
            authn_context_class_ref: Some(class_ref.into()),
        }
    }
}

/// `saml:AttributeStatement`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeStatement {
    /// Released attributes.
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl AttributeStatement {
    /// Creates an empty attribute statement.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            attributes: Vec::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, attr: Attribute) -> Self {
        self.attributes.push(attr);
        self
    }
}

/// One released attribute, values kept as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name.
    #[serde(default)]
    pub name: String,

    /// `NameFormat` URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_format: Option<String>,

    /// `FriendlyName`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,

    /// Attribute values.
    #[serde(default)]
    pub values: Vec<String>,
}

impl Attribute {
    /// Creates a single-valued attribute without name format.
    #[must_use]
    pub fn single(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: vec![value.into()],
            ..Self::default()
        }
    }

    /// Sets the name format.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.name_format = Some(format.into());
        self
    }

    /// Sets the friendly name.
    #[must_use]
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }
}
