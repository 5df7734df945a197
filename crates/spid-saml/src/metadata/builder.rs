//! SP `EntityDescriptor` generation.
//!
//! The document follows the AgID rules for service providers: transient
//! name IDs only, signed requests and assertions, an `other` contact with the
//! SPID extensions and, for private SPs, a `billing` contact carrying the
//! FatturaPA `CessionarioCommittente` block.

use base64::Engine;
use quick_xml::events::{BytesDecl, Event};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use super::xml::{bool_str, check_endpoints, endpoint_attributes, write_key_descriptors, XmlDoc};
use super::AttributeConsumingService;
use crate::error::{SamlError, SamlResult};
use crate::types::{NameIdFormat, SamlBinding, FPA_NS, METADATA_NS, SAMLP_NS, SPID_NS, XMLDSIG_NS};

/// Language of organization names.
const ORGANIZATION_LANG: &str = "it";

pub(super) fn enabled() -> bool {
    true
}

pub(super) fn default_name_id_formats() -> Vec<String> {
    vec![NameIdFormat::Transient.uri().to_string()]
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// A service endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Binding URI.
    pub binding: SamlBinding,
    /// Endpoint location.
    pub location: String,
    /// Optional response location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_location: Option<String>,
}

impl Endpoint {
    /// Creates an endpoint.
    #[must_use]
    pub fn new(binding: SamlBinding, location: impl Into<String>) -> Self {
        Self {
            binding,
            location: location.into(),
            response_location: None,
        }
    }
}

/// An indexed assertion consumer service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionConsumerService {
    /// Index referenced by `AssertionConsumerServiceIndex`.
    pub index: u16,
    /// Whether this is the default service.
    #[serde(default)]
    pub is_default: bool,
    /// The endpoint.
    #[serde(flatten)]
    pub endpoint: Endpoint,
}

impl AssertionConsumerService {
    /// Creates an HTTP-POST consumer service.
    #[must_use]
    pub fn post(index: u16, location: impl Into<String>) -> Self {
        Self {
            index,
            is_default: false,
            endpoint: Endpoint::new(SamlBinding::HttpPost, location),
        }
    }

    /// Marks the service as default.
    #[must_use]
    pub const fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }
}

/// `md:Organization` content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Legal name; also used as the contact company.
    pub name: String,
    /// Display name.
    pub display_name: String,
    /// Organization URL.
    pub url: String,
}

/// The `other` contact person with the SPID extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherContact {
    /// Public administration SP (`spid:Public`) or private SP (`spid:Private`).
    #[serde(default)]
    pub public: bool,
    /// IPA code, required for public SPs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipa_code: Option<String>,
    /// VAT number, required for private SPs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_number: Option<String>,
    /// Fiscal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_code: Option<String>,
    /// Contact mail, required.
    pub email: String,
    /// Contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
}

impl OtherContact {
    /// Contact for a public administration.
    #[must_use]
    pub fn public(ipa_code: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            public: true,
            ipa_code: Some(ipa_code.into()),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Contact for a private SP.
    #[must_use]
    pub fn private(vat_number: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            public: false,
            vat_number: Some(vat_number.into()),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Sets the fiscal code.
    #[must_use]
    pub fn with_fiscal_code(mut self, fiscal_code: impl Into<String>) -> Self {
        self.fiscal_code = Some(fiscal_code.into());
        self
    }

    /// Sets the phone number.
    #[must_use]
    pub fn with_telephone(mut self, telephone: impl Into<String>) -> Self {
        self.telephone = Some(telephone.into());
        self
    }
}

/// The `billing` contact of a private SP.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingContact {
    /// Company name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Billing mail, required.
    pub email: String,
    /// Billing phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    /// Invoice recipient.
    pub cessionario_committente: CessionarioCommittente,
}

/// FatturaPA invoice recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CessionarioCommittente {
    /// VAT country code, e.g. `IT`.
    pub id_paese: String,
    /// VAT number.
    pub id_codice: String,
    /// Registered name.
    pub denominazione: String,
    /// Registered office.
    pub sede: Sede,
}

/// FatturaPA address block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sede {
    /// Street.
    pub indirizzo: String,
    /// Street number.
    pub numero_civico: String,
    /// Postal code.
    pub cap: String,
    /// Municipality.
    pub comune: String,
    /// Province code.
    pub provincia: String,
    /// Country code.
    pub nazione: String,
}

/// Builds SPID service provider metadata.
///
/// Deserializable so that deployments can keep the whole description in a
/// configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpMetadataBuilder {
    /// SP entity ID.
    pub entity_id: String,

    /// Document `ID`; a random one is generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// `AuthnRequestsSigned`, true for SPID.
    #[serde(default = "enabled")]
    pub authn_requests_signed: bool,

    /// `WantAssertionsSigned`, true for SPID.
    #[serde(default = "enabled")]
    pub want_assertions_signed: bool,

    /// Base64 DER signing certificates.
    #[serde(default)]
    pub signing_certificates: Vec<String>,

    /// Base64 DER encryption certificates.
    #[serde(default)]
    pub encryption_certificates: Vec<String>,

    /// Single logout endpoints.
    #[serde(default)]
    pub single_logout_services: Vec<Endpoint>,

    /// Name ID formats; SPID allows transient only.
    #[serde(default = "default_name_id_formats")]
    pub name_id_formats: Vec<String>,

    /// Assertion consumer services; at least one is required.
    #[serde(default)]
    pub assertion_consumer_services: Vec<AssertionConsumerService>,

    /// Attribute consuming services.
    #[serde(default)]
    pub attribute_consuming_services: Vec<AttributeConsumingService>,

    /// Organization.
    pub organization: Organization,

    /// `other` contact.
    pub contact: OtherContact,

    /// `billing` contact, private SPs only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing: Option<BillingContact>,
}

impl SpMetadataBuilder {
    /// Creates a builder with SPID defaults.
    #[must_use]
    pub fn new(
        entity_id: impl Into<String>,
        organization: Organization,
        contact: OtherContact,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            id: None,
            authn_requests_signed: true,
            want_assertions_signed: true,
            signing_certificates: Vec::new(),
            encryption_certificates: Vec::new(),
            single_logout_services: Vec::new(),
            name_id_formats: default_name_id_formats(),
            assertion_consumer_services: Vec::new(),
            attribute_consuming_services: Vec::new(),
            organization,
            contact,
            billing: None,
        }
    }

    /// Sets the document ID.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
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

    /// Adds a single logout endpoint.
    #[must_use]
    pub fn with_single_logout_service(mut self, endpoint: Endpoint) -> Self {
        self.single_logout_services.push(endpoint);
        self
    }

    /// Adds an assertion consumer service.
    #[must_use]
    pub fn with_assertion_consumer_service(mut self, service: AssertionConsumerService) -> Self {
        self.assertion_consumer_services.push(service);
        self
    }

    /// Adds an attribute consuming service.
    #[must_use]
    pub fn with_attribute_service(mut self, service: AttributeConsumingService) -> Self {
        self.attribute_consuming_services.push(service);
        self
    }

    /// Sets the billing contact.
    #[must_use]
    pub fn with_billing(mut self, billing: BillingContact) -> Self {
        self.billing = Some(billing);
        self
    }

    /// Renders the `md:EntityDescriptor` document.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::InvalidMetadata`] when a mandatory value is
    /// missing and [`SamlError::XmlWrite`] if serialization fails.
    pub fn build(&self) -> SamlResult<String> {
        self.validate()?;

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
                ("xmlns:spid", SPID_NS),
                ("ID", id.as_str()),
                ("entityID", self.entity_id.as_str()),
            ],
        )?;

        self.write_sp_descriptor(&mut doc)?;
        self.write_organization(&mut doc)?;
        self.write_other_contact(&mut doc)?;

        if !self.contact.public {
            match &self.billing {
                Some(billing) => write_billing_contact(&mut doc, billing)?,
                None => warn!(entity_id = %self.entity_id, "private SP without billing contact"),
            }
        }

        doc.end("md:EntityDescriptor")?;
        doc.finish()
    }

    fn validate(&self) -> SamlResult<()> {
        let invalid = |msg: &str| Err(SamlError::InvalidMetadata(msg.to_string()));

        if self.entity_id.trim().is_empty() {
            return invalid("entity ID missing");
        }
        if self.assertion_consumer_services.is_empty() {
            return invalid("no assertion consumer service");
        }
        check_endpoints(
            self.assertion_consumer_services
                .iter()
                .map(|acs| &acs.endpoint)
                .chain(&self.single_logout_services),
        )?;

        let contact = &self.contact;
        if contact.public && is_blank(contact.ipa_code.as_deref()) {
            return invalid("public SP without IPA code");
        }
        if !contact.public && is_blank(contact.vat_number.as_deref()) {
            return invalid("private SP without VAT number");
        }
        if contact.email.trim().is_empty() {
            return invalid("contact without email address");
        }
        if let Some(billing) = &self.billing {
            if billing.email.trim().is_empty() {
                return invalid("billing contact without email address");
            }
        }
        Ok(())
    }

    fn write_sp_descriptor(&self, doc: &mut XmlDoc) -> SamlResult<()> {
        doc.start(
            "md:SPSSODescriptor",
            &[
                ("AuthnRequestsSigned", bool_str(self.authn_requests_signed)),
                ("WantAssertionsSigned", bool_str(self.want_assertions_signed)),
                ("protocolSupportEnumeration", SAMLP_NS),
            ],
        )?;

        write_key_descriptors(
            doc,
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

        for acs in &self.assertion_consumer_services {
            let index = acs.index.to_string();
            let mut attributes = endpoint_attributes(&acs.endpoint);
            attributes.push(("index", index.as_str()));
            attributes.push(("isDefault", bool_str(acs.is_default)));
            doc.empty("md:AssertionConsumerService", &attributes)?;
        }

        for service in &self.attribute_consuming_services {
            let index = service.index.to_string();
            doc.start("md:AttributeConsumingService", &[("index", index.as_str())])?;
            doc.text_element("md:ServiceName", &[("xml:lang", service.lang.as_str())], &service.service_name)?;
            for attribute in &service.attributes {
                match attribute.friendly_name.as_deref() {
                    Some(friendly) if !friendly.is_empty() => doc.empty(
                        "md:RequestedAttribute",
                        &[("Name", attribute.name.as_str()), ("FriendlyName", friendly)],
                    )?,
                    _ => doc.empty("md:RequestedAttribute", &[("Name", attribute.name.as_str())])?,
                }
            }
            doc.end("md:AttributeConsumingService")?;
        }

        doc.end("md:SPSSODescriptor")
    }

    fn write_organization(&self, doc: &mut XmlDoc) -> SamlResult<()> {
        let lang = [("xml:lang", ORGANIZATION_LANG)];
        let organization = &self.organization;

        doc.start("md:Organization", &[])?;
        doc.text_element("md:OrganizationName", &lang, &organization.name)?;
        doc.text_element("md:OrganizationDisplayName", &lang, &organization.display_name)?;
        doc.text_element("md:OrganizationURL", &lang, &organization.url)?;
        doc.end("md:Organization")
    }

    fn write_other_contact(&self, doc: &mut XmlDoc) -> SamlResult<()> {
        let contact = &self.contact;

        doc.start("md:ContactPerson", &[("contactType", "other")])?;
        doc.start("md:Extensions", &[])?;
        if contact.public {
            if let Some(ipa_code) = &contact.ipa_code {
                doc.text_element("spid:IPACode", &[], ipa_code)?;
            }
            doc.empty("spid:Public", &[])?;
        } else {
            if let Some(vat_number) = &contact.vat_number {
                doc.text_element("spid:VATNumber", &[], vat_number)?;
            }
            doc.empty("spid:Private", &[])?;
        }
        if let Some(fiscal_code) = contact.fiscal_code.as_deref().filter(|c| !c.is_empty()) {
            doc.text_element("spid:FiscalCode", &[], fiscal_code)?;
        }
        doc.end("md:Extensions")?;

        if !self.organization.name.is_empty() {
            doc.text_element("md:Company", &[], &self.organization.name)?;
        }
        doc.text_element("md:EmailAddress", &[], &contact.email)?;
        if let Some(telephone) = contact.telephone.as_deref().filter(|t| !t.is_empty()) {
            doc.text_element("md:TelephoneNumber", &[], telephone)?;
        }
        doc.end("md:ContactPerson")
    }
}

fn write_billing_contact(doc: &mut XmlDoc, billing: &BillingContact) -> SamlResult<()> {
    let cc = &billing.cessionario_committente;

    doc.start("md:ContactPerson", &[("contactType", "billing")])?;
    doc.start("md:Extensions", &[("xmlns:fpa", FPA_NS)])?;
    doc.start("fpa:CessionarioCommittente", &[])?;

    doc.start("fpa:DatiAnagrafici", &[])?;
    doc.start("fpa:IdFiscaleIVA", &[])?;
    doc.text_element("fpa:IdPaese", &[], &cc.id_paese)?;
    doc.text_element("fpa:IdCodice", &[], &cc.id_codice)?;
    doc.end("fpa:IdFiscaleIVA")?;
    doc.start("fpa:Anagrafica", &[])?;
    doc.text_element("fpa:Denominazione", &[], &cc.denominazione)?;
    doc.end("fpa:Anagrafica")?;
    doc.end("fpa:DatiAnagrafici")?;

    let sede = &cc.sede;
    doc.start("fpa:Sede", &[])?;
    doc.text_element("fpa:Indirizzo", &[], &sede.indirizzo)?;
    doc.text_element("fpa:NumeroCivico", &[], &sede.numero_civico)?;
    doc.text_element("fpa:CAP", &[], &sede.cap)?;
    doc.text_element("fpa:Comune", &[], &sede.comune)?;
    doc.text_element("fpa:Provincia", &[], &sede.provincia)?;
    doc.text_element("fpa:Nazione", &[], &sede.nazione)?;
    doc.end("fpa:Sede")?;

    doc.end("fpa:CessionarioCommittente")?;
    doc.end("md:Extensions")?;

    if let Some(company) = billing.company.as_deref().filter(|c| !c.is_empty()) {
        doc.text_element("md:Company", &[], company)?;
    }
    doc.text_element("md:EmailAddress", &[], &billing.email)?;
    if let Some(telephone) = billing.telephone.as_deref().filter(|t| !t.is_empty()) {
        doc.text_element("md:TelephoneNumber", &[], telephone)?;
    }
    doc.end("md:ContactPerson")
}

/// Encodes a PEM certificate as the base64 DER body used in `ds:X509Certificate`.
///
/// # Errors
///
/// Returns [`SamlError::Crypto`] if the PEM block is not a certificate.
pub fn certificate_body(pem: &str) -> SamlResult<String> {
    let der = spid_crypto::pem_to_der(pem, "CERTIFICATE")?;
    Ok(base64::engine::general_purpose::STANDARD.encode(der))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::attribute_sets;

    fn organization() -> Organization {
        Organization {
            name: "Comune di Esempio".to_string(),
            display_name: "Esempio".to_string(),
            url: "https://www.comune.esempio.it".to_string(),
        }
    }

    fn public_builder() -> SpMetadataBuilder {
        SpMetadataBuilder::new(
            "https://sp.example/",
            organization(),
            OtherContact::public("c_x000", "spid@comune.esempio.it").with_telephone("+390000000"),
        )
        .with_id("_metadata")
        .with_signing_certificate("MIIBsigning")
        .with_encryption_certificate("MIIBencryption")
        .with_single_logout_service(Endpoint::new(SamlBinding::HttpRedirect, "https://sp.example/slo"))
        .with_assertion_consumer_service(AssertionConsumerService::post(0, "https://sp.example/acs").as_default())
        .with_attribute_service(attribute_sets::minimo())
        .with_attribute_service(attribute_sets::eidas_minimum())
    }

    fn billing() -> BillingContact {
        BillingContact {
            company: Some("Esempio S.r.l.".to_string()),
            email: "fatture@esempio.it".to_string(),
            telephone: None,
            cessionario_committente: CessionarioCommittente {
                id_paese: "IT".to_string(),
                id_codice: "01234567890".to_string(),
                denominazione: "Esempio S.r.l.".to_string(),
                sede: Sede {
                    indirizzo: "Via Roma".to_string(),
                    numero_civico: "1".to_string(),
                    cap: "00100".to_string(),
                    comune: "Roma".to_string(),
                    provincia: "RM".to_string(),
                    nazione: "IT".to_string(),
                },
            },
        }
    }

    #[test]
    fn public_sp_document() {
        let xml = public_builder().build().unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(r#"ID="_metadata" entityID="https://sp.example/""#));
        assert!(xml.contains(r#"AuthnRequestsSigned="true" WantAssertionsSigned="true""#));
        assert!(xml.contains(r#"<md:KeyDescriptor use="signing">"#));
        assert!(xml.contains(r#"<md:KeyDescriptor use="encryption">"#));
        assert!(xml.contains("<ds:X509Certificate>MIIBsigning</ds:X509Certificate>"));
        assert!(xml.contains(
            "<md:NameIDFormat>urn:oasis:names:tc:SAML:2.0:nameid-format:transient</md:NameIDFormat>"
        ));
        assert!(xml.contains(r#"Location="https://sp.example/acs" index="0" isDefault="true""#));
        assert!(xml.contains(r#"<md:ServiceName xml:lang="it">minimo</md:ServiceName>"#));
        assert!(xml.contains(r#"<md:RequestedAttribute Name="fiscalNumber" FriendlyName="Codice Fiscale"/>"#));
        assert!(xml.contains(r#"<md:RequestedAttribute Name="dateOfBirth"/>"#));
        assert!(xml.contains("<spid:IPACode>c_x000</spid:IPACode>"));
        assert!(xml.contains("<spid:Public/>"));
        assert!(xml.contains("<md:Company>Comune di Esempio</md:Company>"));
        assert!(xml.contains("<md:TelephoneNumber>+390000000</md:TelephoneNumber>"));
        assert!(!xml.contains("billing"));
    }

    #[test]
    fn private_sp_with_billing() {
        let mut builder = public_builder().with_billing(billing());
        builder.contact = OtherContact::private("IT01234567890", "spid@esempio.it")
            .with_fiscal_code("01234567890");
        let xml = builder.build().unwrap();

        assert!(xml.contains("<spid:VATNumber>IT01234567890</spid:VATNumber>"));
        assert!(xml.contains("<spid:Private/>"));
        assert!(xml.contains("<spid:FiscalCode>01234567890</spid:FiscalCode>"));
        assert!(xml.contains(r#"<md:ContactPerson contactType="billing">"#));
        assert!(xml.contains(&format!(r#"<md:Extensions xmlns:fpa="{FPA_NS}">"#)));
        assert!(xml.contains("<fpa:IdPaese>IT</fpa:IdPaese>"));
        assert!(xml.contains("<fpa:Denominazione>Esempio S.r.l.</fpa:Denominazione>"));
        assert!(xml.contains("<fpa:CAP>00100</fpa:CAP>"));
    }

    #[test]
    fn public_sp_ignores_billing() {
        let xml = public_builder().with_billing(billing()).build().unwrap();
        assert!(!xml.contains("CessionarioCommittente"));
    }

    #[test]
    fn private_sp_without_billing_is_allowed() {
        let mut builder = public_builder();
        builder.contact = OtherContact::private("IT01234567890", "spid@esempio.it");
        assert!(builder.build().is_ok());
    }

    #[test]
    fn missing_certificates_are_allowed() {
        let mut builder = public_builder();
        builder.signing_certificates.clear();
        builder.encryption_certificates.clear();
        let xml = builder.build().unwrap();
        assert!(!xml.contains("KeyDescriptor"));
    }

    #[test]
    fn mandatory_values() {
        let mut builder = public_builder();
        builder.contact.ipa_code = None;
        assert!(matches!(builder.build(), Err(SamlError::InvalidMetadata(_))));

        let mut builder = public_builder();
        builder.contact = OtherContact::private("", "spid@esempio.it");
        assert!(matches!(builder.build(), Err(SamlError::InvalidMetadata(_))));

        let mut builder = public_builder();
        builder.contact.email = String::new();
        assert!(matches!(builder.build(), Err(SamlError::InvalidMetadata(_))));

        let mut builder = public_builder();
        builder.assertion_consumer_services.clear();
        assert!(matches!(builder.build(), Err(SamlError::InvalidMetadata(_))));

        let builder = public_builder()
            .with_single_logout_service(Endpoint::new(SamlBinding::HttpPost, " "));
        assert!(matches!(builder.build(), Err(SamlError::InvalidMetadata(_))));
    }

    #[test]
    fn text_is_escaped() {
        let mut builder = public_builder();
        builder.organization.name = "Rossi & Figli".to_string();
        let xml = builder.build().unwrap();
        assert!(xml.contains("Rossi &amp; Figli"));
    }

    #[test]
    fn generated_id_is_an_ncname() {
        let mut builder = public_builder();
        builder.id = None;
        let xml = builder.build().unwrap();
        assert!(xml.contains(r#"ID="_"#));
    }

    #[test]
    fn deserializes_from_toml_shape() {
        let json = r#"{
            "entity_id": "https://sp.example/",
            "assertion_consumer_services": [{
                "index": 0,
                "is_default": true,
                "binding": "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST",
                "location": "https://sp.example/acs"
            }],
            "organization": { "name": "Org", "display_name": "Org", "url": "https://org.example" },
            "contact": { "public": true, "ipa_code": "c_x000", "email": "a@b.it" }
        }"#;
        let builder: SpMetadataBuilder = serde_json::from_str(json).unwrap();
        assert!(builder.authn_requests_signed);
        assert_eq!(builder.name_id_formats, default_name_id_formats());
        assert!(builder.assertion_consumer_services[0].is_default);
    }
}
