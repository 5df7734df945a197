//! SP and IdP metadata generation and the AgID attribute catalog.

pub mod attribute_sets;
mod builder;
mod idp;
mod xml;

pub use builder::*;
pub use idp::IdpMetadataBuilder;

use serde::{Deserialize, Serialize};

/// An `md:AttributeConsumingService` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeConsumingService {
    /// Index referenced by `AttributeConsumingServiceIndex` in requests.
    pub index: u16,

    /// Service name.
    pub service_name: String,

    /// `xml:lang` of the service name.
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Requested attributes, in order.
    pub attributes: Vec<RequestedAttribute>,
}

fn default_lang() -> String {
    "it".to_string()
}

impl AttributeConsumingService {
    /// Returns the requested attribute names, in order.
    #[must_use]
    pub fn requested_names(&self) -> Vec<String> {
        self.attributes.iter().map(|a| a.name.clone()).collect()
    }
}

/// An `md:RequestedAttribute`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedAttribute {
    /// SPID attribute name.
    pub name: String,

    /// Human readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
}

impl RequestedAttribute {
    /// Creates a requested attribute without friendly name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            friendly_name: None,
        }
    }

    /// Sets the friendly name.
    #[must_use]
    pub fn with_friendly_name(mut self, friendly_name: impl Into<String>) -> Self {
        self.friendly_name = Some(friendly_name.into());
        self
    }
}
