//! SP and IdP metadata, and the contexts derived from it.

use spid_integration_tests::*;
use spid_saml::metadata::{
    attribute_sets, certificate_body, AssertionConsumerService, Endpoint, IdpMetadataBuilder,
    Organization, OtherContact, SpMetadataBuilder,
};
use spid_saml::{ComplianceContext, SamlBinding, SamlError, SpidLevel};

fn builder() -> SpMetadataBuilder {
    SpMetadataBuilder::new(
        SP_ENTITY_ID,
        Organization {
            name: "Comune di Esempio".into(),
            display_name: "Esempio".into(),
            url: "https://www.comune.esempio.it".into(),
        },
        OtherContact::public("c_x000", "spid@comune.esempio.it"),
    )
    .with_assertion_consumer_service(AssertionConsumerService::post(0, DESTINATION).as_default())
    .with_attribute_service(attribute_sets::minimo())
}

#[test]
fn published_service_drives_the_check() -> anyhow::Result<()> {
    let builder = builder();
    let xml = builder.build()?;
    assert!(xml.contains(&format!(r#"entityID="{SP_ENTITY_ID}""#)));
    assert!(xml.contains(r#"<md:RequestedAttribute Name="fiscalNumber""#));

    let service = &builder.attribute_consuming_services[0];
    let context = ComplianceContext::new(DESTINATION, IDP_ENTITY_ID, SP_ENTITY_ID)
        .with_attribute_service(service)
        .with_min_level(SpidLevel::L2);
    let names = service.requested_names();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();

    let idp = IdpKey::generate()?;
    let response = response(&idp, "_r1", assertion(&idp, "_a1", &names)?)?;
    checker()
        .check(&response, &[idp.credential()], &context)
        .map_err(anyhow::Error::from)
}

#[test]
fn certificate_body_requires_a_certificate() {
    let pem = "-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----\n";
    assert!(matches!(certificate_body(pem), Err(SamlError::Crypto(_))));
}

#[test]
fn idp_metadata_lists_its_endpoints() -> anyhow::Result<()> {
    let xml = IdpMetadataBuilder::new(IDP_ENTITY_ID)
        .with_signing_certificate("MIIBidp")
        .with_single_sign_on_service(Endpoint::new(
            SamlBinding::HttpRedirect,
            "https://idp.example.it/sso",
        ))
        .build()?;

    assert!(xml.contains(&format!(r#"entityID="{IDP_ENTITY_ID}""#)));
    assert!(xml.contains(r#"<md:IDPSSODescriptor WantAuthnRequestsSigned="true""#));
    assert!(xml.contains(r#"Location="https://idp.example.it/sso""#));
    assert!(xml.contains("<ds:X509Certificate>MIIBidp</ds:X509Certificate>"));

    let err = IdpMetadataBuilder::new(IDP_ENTITY_ID).build().unwrap_err();
    assert!(matches!(err, SamlError::InvalidMetadata(_)));
    Ok(())
}
