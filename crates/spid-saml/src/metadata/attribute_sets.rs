//! AgID attribute consuming services.
//!
//! The indexes are the ones published by AgID: SPID services use 0..=2 and
//! the eIDAS gateway uses 99 and 100.

use super::{AttributeConsumingService, RequestedAttribute};

const SERVICE_LANG: &str = "it";

const MINIMO: &[(&str, &str)] = &[
    ("spidCode", "SPID Code"),
    ("name", "Nome"),
    ("familyName", "Cognome"),
    ("dateOfBirth", "Data di nascita"),
    ("fiscalNumber", "Codice Fiscale"),
    ("email", "Indirizzo di posta elettronica"),
];

const ESTESO: &[(&str, &str)] = &[
    ("spidCode", "SPID Code"),
    ("name", "Nome"),
    ("familyName", "Cognome"),
    ("placeOfBirth", "Luogo di nascita"),
    ("countyOfBirth", "Provincia di nascita"),
    ("dateOfBirth", "Data di nascita"),
    ("gender", "Sesso"),
    ("fiscalNumber", "Codice Fiscale"),
    ("idCard", "Documento di identità"),
    ("mobilePhone", "Numero di telefono mobile"),
    ("email", "Indirizzo di posta elettronica"),
    ("address", "Domicilio fisico"),
    ("expirationDate", "Data di scadenza identità"),
    ("digitalAddress", "Domicilio digitale"),
];

const COMPLETO: &[(&str, &str)] = &[
    ("spidCode", "SPID Code"),
    ("name", "Nome"),
    ("familyName", "Cognome"),
    ("placeOfBirth", "Luogo di nascita"),
    ("countyOfBirth", "Provincia di nascita"),
    ("dateOfBirth", "Data di nascita"),
    ("gender", "Sesso"),
    ("companyName", "Ragione o denominazione sociale"),
    ("registeredOffice", "Sede legale"),
    ("fiscalNumber", "Codice Fiscale"),
    ("ivaCode", "Partita IVA"),
    ("idCard", "Documento di identità"),
    ("mobilePhone", "Numero di telefono mobile"),
    ("email", "Indirizzo di posta elettronica"),
    ("address", "Domicilio fisico"),
    ("expirationDate", "Data di scadenza identità"),
    ("digitalAddress", "Domicilio digitale"),
];

const EIDAS_MINIMUM: &[&str] = &["spidCode", "name", "familyName", "dateOfBirth"];

const EIDAS_FULL: &[&str] = &[
    "spidCode",
    "name",
    "familyName",
    "dateOfBirth",
    "placeOfBirth",
    "address",
    "gender",
];

fn spid_service(index: u16, name: &str, attributes: &[(&str, &str)]) -> AttributeConsumingService {
    AttributeConsumingService {
        index,
        service_name: name.to_string(),
        lang: SERVICE_LANG.to_string(),
        attributes: attributes
            .iter()
            .map(|(name, friendly)| RequestedAttribute::new(*name).with_friendly_name(*friendly))
            .collect(),
    }
}

fn eidas_service(index: u16, name: &str, attributes: &[&str]) -> AttributeConsumingService {
    AttributeConsumingService {
        index,
        service_name: name.to_string(),
        lang: SERVICE_LANG.to_string(),
        attributes: attributes.iter().copied().map(RequestedAttribute::new).collect(),
    }
}

/// Minimum SPID set, index 0.
#[must_use]
pub fn minimo() -> AttributeConsumingService {
    spid_service(0, "minimo", MINIMO)
}

/// Extended SPID set, index 1.
#[must_use]
pub fn esteso() -> AttributeConsumingService {
    spid_service(1, "esteso", ESTESO)
}

/// Every SPID attribute, index 2.
#[must_use]
pub fn completo() -> AttributeConsumingService {
    spid_service(2, "completo", COMPLETO)
}

/// eIDAS natural person minimum set, index 99.
#[must_use]
pub fn eidas_minimum() -> AttributeConsumingService {
    eidas_service(99, "eIDAS Natural Person Minimum Attribute Set", EIDAS_MINIMUM)
}

/// eIDAS natural person full set, index 100.
#[must_use]
pub fn eidas_full() -> AttributeConsumingService {
    eidas_service(100, "eIDAS Natural Person Full Attribute Set", EIDAS_FULL)
}

/// All AgID services in index order.
#[must_use]
pub fn agid_attribute_sets() -> Vec<AttributeConsumingService> {
    vec![minimo(), esteso(), completo(), eidas_minimum(), eidas_full()]
}

/// Looks up an AgID service by index.
#[must_use]
pub fn by_index(index: u16) -> Option<AttributeConsumingService> {
    agid_attribute_sets()
        .into_iter()
        .find(|service| service.index == index)
}
