//! IdP `EntityDescriptor` generation.
//!
//! Mostly useful for test identity providers and for publishing the metadata
//! a validator instance should trust.

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, Event};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::builder::{default_name_id_formats, enabled};
use super::xml::{bool_str, check_endpoints, endpoint_attributes, write_key_descriptors, XmlDoc};
use super::Endpoint;
use crate::error::{SamlError, SamlResult};
use crate::types::{METADATA_NS, SAMLP_NS, XMLDSIG_NS};

/// Builds identity provider metadata with an `md:IDPSSODescriptor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdpMetadataBuilder {
    /// IdP entity ID.
    pub entity_id: String,

    /// Document `ID`; a random one is generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// `validUntil` of the descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,

    /// `WantAuthnRequestsSigned`, true for SPID.
    #[serde(default = "enabled")]
    pub want_authn_requests_signed: bool,

    /// Base64 DER signing certificates.
    #[serde(default)]
    pub signing_certificates: Vec<String>,

    /// Base64 DER encryption certificates.
    #[serde(default)]
    pub encryption_certificates: Vec<String>,

    /// Name ID formats.
    #[serde(default = "default_name_id_formats")]
    pub name_id_formats: Vec<String>,

    /// Single sign-on endpoints; at least one is required.
    #[serde(default)]
    pub single_sign_on_services: Vec<Endpoint>,

    /// Single logout endpoints.
    #[serde(default)]
    pub single_logout_services: Vec<Endpoint>,
}

impl IdpMetadataBuilder {
    /// Creates a builder with SPID defaults and no endpoints.
    #[must_use]
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            id: None,
            valid_until: None,
            want_authn_requests_signed: true,
            signing_certificates: Vec::new(),
            encryption_certificates: Vec::new(),
            name_id_formats: default_name_id_formats(),
            single_sign_on_services: Vec::new(),
            single_logout_services: Vec::new(),
        }
    }

    /// Sets the document ID.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets `validUntil`.
    #[must_use]
    pub fn valid_until(mut self, instant: DateTime<Utc>) -> Self {
        self.valid_until = Some(instant);
        self
    }

    /// Sets `WantAuthnRequestsSigned`.
    #[must_use]
    pub const fn want_authn_requests_signed(mut self, signed: bool) -> Self {
        self.want_authn_requests_signed = signed;
        self
    }

    /// Adds a base64 DER signing certificate.
    #[must_use]
    pub fn with_signing_certificate(mut self, certificate: impl Into<String>) -> Self {
        self.signing_certificates.push(certificate.into());
        self
    }

    /// Adds a base64 DER encryption certificate.
    #[must_use]
    pub fn with_encryption_certificate(mut self, certificate: impl Into<String>) -> Self {
        self.encryption_certificates.push(certificate.into());
        self
    }

    /// Adds a name ID format.
    #[must_use]
    pub fn with_name_id_format(mut self, format: impl Into<String>) -> Self {
        let format = format.into();
        if !self.name_id_formats.contains(&format) {
            self.name_id_formats.push(format);
        }
        self
    }

    /// Adds a single sign-on endpoint.
    #[must_use]
    pub fn with_single_sign_on_service(mut self, endpoint: Endpoint) -> Self {
        self.single_sign_on_services.push(endpoint);
        self
    }

    /// Adds a single logout endpoint.
    #[must_use]
    pub fn with_single_logout_service(mut self, endpoint: Endpoint) -> Self {
        self.single_logout_services.push(endpoint);
        self
    }

    /// Renders the `md:EntityDescriptor` document.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::InvalidMetadata`] without an entity ID, without a
    /// single sign-on endpoint, or with a blank endpoint location, and
    /// [`SamlError::XmlWrite`] if serialization fails.
    pub fn build(&self) -> SamlResult<String> {
        if self.entity_id.trim().is_empty() {
            return Err(SamlError::InvalidMetadata("entity ID missing".to_string()));
        }
        if self.single_sign_on_services.is_empty() {
            return Err(SamlError::InvalidMetadata(
                "no single sign-on service".to_string(),
            ));
        }
        check_endpoints(
            self.single_sign_on_services
                .iter()
                .chain(&self.single_logout_services),
        )?;

        let id = self
            .id
            .clone()
            .unwrap_or_else(|| format!("_{}", Uuid::new_v4()));
        let mut doc = XmlDoc::new();
        doc.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        doc.start(
            "md:EntityDescriptor",
            &[
                ("xmlns:md", METADATA_NS),
                ("xmlns:ds", XMLDSIG_NS),
                ("ID", id.as_str()),
                ("entityID", self.entity_id.as_str()),
            ],
        )?;

        let valid_until = self
            .valid_until
            .map(|instant| instant.to_rfc3339_opts(SecondsFormat::Millis, true));
        let mut attributes = vec![
            ("WantAuthnRequestsSigned", bool_str(self.want_authn_requests_signed)),
            ("protocolSupportEnumeration", SAMLP_NS),
        ];
        if let Some(valid_until) = valid_until.as_deref() {
            attributes.push(("validUntil", valid_until));
        }
        doc.start("md:IDPSSODescriptor", &attributes)?;

        write_key_descriptors(
            &mut doc,
            &self.entity_id,
            &self.signing_certificates,
            &self.encryption_certificates,
        )?;
        for endpoint in &self.single_logout_services {
            doc.empty("md:SingleLogoutService", &endpoint_attributes(endpoint))?;
        }
        for format in &self.name_id_formats {
            doc.text_element("md:NameIDFormat", &[], format)?;
        }
        for endpoint in &self.single_sign_on_services {
            doc.empty("md:SingleSignOnService", &endpoint_attributes(endpoint))?;
        }

        doc.end("md:IDPSSODescriptor")?;
        doc.end("md:EntityDescriptor")?;
        doc.finish()
    }
}
