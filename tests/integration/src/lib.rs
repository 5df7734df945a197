//! Fixtures for the end-to-end tests: an identity provider that really signs
//! and a service provider key pair that really decrypts.

use std::sync::Arc;

use anyhow::{anyhow, Context};
use aws_lc_rs::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_128_GCM, NONCE_LEN};
use aws_lc_rs::rand::{SecureRandom, SystemRandom};
use aws_lc_rs::rsa::{KeySize, OaepPublicEncryptingKey, PrivateDecryptingKey, OAEP_SHA1_MGF1SHA1};
use aws_lc_rs::signature::{EcdsaKeyPair, KeyPair, ECDSA_P256_SHA256_FIXED_SIGNING};
use base64::Engine;
use chrono::{DateTime, TimeDelta, Utc};
use spid_crypto::{digest, ContentCipher, DigestAlgorithm, KeyTransport, SignatureScheme};
use spid_saml::encryption::{AssertionParser, DecryptionKey, XmlEncDecrypter};
use spid_saml::signature::XmlSignature;
use spid_saml::*;

/// ACS URL of the test SP.
pub const DESTINATION: &str = "https://sp.example.it/acs";
/// Entity ID of the test SP.
pub const SP_ENTITY_ID: &str = "https://sp.example.it/";
/// Entity ID of the test IdP.
pub const IDP_ENTITY_ID: &str = "https://idp.example.it/";
/// ID of the authentication request being answered.
pub const REQUEST_ID: &str = "_4d38c302617b5bf98951e65b4cf304711e2166df20";

/// Milliseconds since the epoch of the response issue instant.
const ISSUED_AT_MS: i64 = 1_717_234_200_000;

/// Installs a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("spid_saml=debug")
        .with_test_writer()
        .try_init();
}

/// The instant `offset_ms` away from the response issue instant.
#[must_use]
pub fn instant(offset_ms: i64) -> Timestamp {
    let at: DateTime<Utc> =
        DateTime::<Utc>::UNIX_EPOCH + TimeDelta::milliseconds(ISSUED_AT_MS + offset_ms);
    Timestamp::from(at)
}

/// Context of an SP requesting `attributes` at level 2.
#[must_use]
pub fn context(attributes: &[&str]) -> ComplianceContext {
    ComplianceContext::new(DESTINATION, IDP_ENTITY_ID, SP_ENTITY_ID)
        .with_requested_attributes(attributes.iter().copied())
        .with_min_level(SpidLevel::L2)
}

/// Reads decrypted assertions rendered as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl AssertionParser for JsonParser {
    fn parse(&self, plaintext: &[u8]) -> SamlResult<Assertion> {
        serde_json::from_slice(plaintext).map_err(|e| SamlError::Deserialization(e.to_string()))
    }
}

/// A checker able to open encrypted assertions.
#[must_use]
pub fn checker() -> ComplianceChecker {
    ComplianceChecker::default().with_decrypter(XmlEncDecrypter::new(JsonParser))
}

/// An IdP signing key.
pub struct IdpKey {
    key: EcdsaKeyPair,
    rng: SystemRandom,
}

impl IdpKey {
    /// Generates a P-256 key.
    pub fn generate() -> anyhow::Result<Self> {
        let key = EcdsaKeyPair::generate(&ECDSA_P256_SHA256_FIXED_SIGNING)
            .map_err(|e| anyhow!("key generation failed: {e}"))?;
        Ok(Self {
            key,
            rng: SystemRandom::new(),
        })
    }

    /// The credential an SP would provision for this key.
    #[must_use]
    pub fn credential(&self) -> TrustCredential {
        TrustCredential::from_public_key(self.key.public_key().as_ref().to_vec())
            .with_label("test idp")
    }

    /// Signs `content`, referenced as `#reference`.
    pub fn sign(&self, reference: &str, content: &str) -> anyhow::Result<XmlSignature> {
        let b64 = base64::engine::general_purpose::STANDARD;
        let digest_value = b64.encode(digest(DigestAlgorithm::Sha256, content.as_bytes()));
        let signed_info = format!(
            concat!(
                r#"<ds:SignedInfo xmlns:ds="http://www.w3.org/2000/09/xmldsig#">"#,
                r##"<ds:Reference URI="#{}"><ds:DigestValue>{}</ds:DigestValue></ds:Reference>"##,
                "</ds:SignedInfo>"
            ),
            reference, digest_value
        );
        let signature = self
            .key
            .sign(&self.rng, signed_info.as_bytes())
            .map_err(|e| anyhow!("signing failed: {e}"))?;

        Ok(XmlSignature::new(
            SignatureScheme::EcdsaSha256,
            format!("#{reference}"),
            digest_value,
            signed_info,
            b64.encode(signature.as_ref()),
        )
        .with_signed_content(content))
    }
}

/// An SP key pair for encrypted assertions.
pub struct SpKey {
    decryption: Arc<DecryptionKey>,
    encryption: OaepPublicEncryptingKey,
}

impl SpKey {
    /// Generates an RSA-2048 key pair.
    pub fn generate() -> anyhow::Result<Self> {
        let private = PrivateDecryptingKey::generate(KeySize::Rsa2048)
            .map_err(|e| anyhow!("key generation failed: {e}"))?;
        let encryption = OaepPublicEncryptingKey::new(private.public_key())
            .map_err(|e| anyhow!("unusable public key: {e}"))?;
        Ok(Self {
            decryption: Arc::new(DecryptionKey::from_private_key(private)?),
            encryption,
        })
    }

    /// The key handed to the compliance context.
    #[must_use]
    pub fn decryption_key(&self) -> Arc<DecryptionKey> {
        Arc::clone(&self.decryption)
    }

    /// Encrypts the JSON rendering of `assertion` with AES-128-GCM under a
    /// fresh content key wrapped with RSA-OAEP.
    pub fn encrypt(&self, assertion: &Assertion) -> anyhow::Result<EncryptedAssertion> {
        let b64 = base64::engine::general_purpose::STANDARD;
        let rng = SystemRandom::new();

        let mut content_key = [0u8; 16];
        let mut iv = [0u8; NONCE_LEN];
        rng.fill(&mut content_key).map_err(|e| anyhow!("rng: {e}"))?;
        rng.fill(&mut iv).map_err(|e| anyhow!("rng: {e}"))?;

        let mut wrapped = vec![0u8; self.encryption.ciphertext_size()];
        let wrapped = self
            .encryption
            .encrypt(&OAEP_SHA1_MGF1SHA1, &content_key, &mut wrapped, None)
            .map_err(|e| anyhow!("key wrap failed: {e}"))?
            .to_vec();

        let sealing = LessSafeKey::new(
            UnboundKey::new(&AES_128_GCM, &content_key).map_err(|e| anyhow!("aes key: {e}"))?,
        );
        let mut sealed = serde_json::to_vec(assertion).context("serializing assertion")?;
        sealing
            .seal_in_place_append_tag(Nonce::assume_unique_for_key(iv), Aad::empty(), &mut sealed)
            .map_err(|e| anyhow!("seal failed: {e}"))?;
        let mut cipher_value = iv.to_vec();
        cipher_value.extend_from_slice(&sealed);

        Ok(EncryptedAssertion {
            encrypted_data: EncryptedData {
                encryption_method: Some(ContentCipher::Aes128Gcm.uri().to_string()),
                key_info: Some(KeyInfo {
                    encrypted_key: Some(EncryptedKey {
                        encryption_method: Some(KeyTransport::RsaOaepMgf1p.uri().to_string()),
                        cipher_data: CipherData::new(b64.encode(wrapped)),
                    }),
                    key_name: None,
                }),
                cipher_data: CipherData::new(b64.encode(cipher_value)),
            },
            encrypted_keys: Vec::new(),
        })
    }
}

/// A signed level 2 assertion carrying `attributes`.
pub fn assertion(idp: &IdpKey, id: &str, attributes: &[&str]) -> anyhow::Result<Assertion> {
    let statement = attributes
        .iter()
        .fold(AttributeStatement::new(), |statement, name| {
            statement.with_attribute(
                Attribute::single(*name, format!("{name} value"))
                    .with_format(attribute_name_formats::BASIC),
            )
        });

    let signature = idp.sign(id, &format!(r#"<saml:Assertion ID="{id}"/>"#))?;
    Ok(Assertion::new(id, instant(0))
        .with_signature(signature)
        .with_issuer(Issuer::entity(IDP_ENTITY_ID))
        .with_subject(
            Subject::new(NameId::transient("_0a1b2c3d").with_name_qualifier(IDP_ENTITY_ID))
                .with_confirmation(SubjectConfirmation::bearer().with_data(
                    SubjectConfirmationData::for_request(REQUEST_ID, DESTINATION, instant(300_000)),
                )),
        )
        .with_conditions(Conditions::new(instant(-120_000), instant(300_000)).with_audience(SP_ENTITY_ID))
        .with_authn_statement(
            AuthnStatement::new(instant(-5_000), SpidLevel::L2).with_session_index("_session1"),
        )
        .with_attribute_statement(statement))
}

/// A signed success response around `assertion`.
pub fn response(idp: &IdpKey, id: &str, assertion: Assertion) -> anyhow::Result<Response> {
    Ok(envelope(idp, id)?.with_assertion(assertion))
}

/// A signed success response without assertions.
pub fn envelope(idp: &IdpKey, id: &str) -> anyhow::Result<Response> {
    let signature = idp.sign(id, &format!(r#"<samlp:Response ID="{id}"/>"#))?;
    Ok(Response::new(id, instant(0))
        .with_signature(signature)
        .with_issuer(Issuer::entity(IDP_ENTITY_ID))
        .in_response_to(REQUEST_ID)
        .with_destination(DESTINATION)
        .with_status(Status::success()))
}
