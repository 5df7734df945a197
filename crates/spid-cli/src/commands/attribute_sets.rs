//! AgID attribute consuming service listing.

use serde::Serialize;
use spid_saml::metadata::{attribute_sets, AttributeConsumingService};
use tabled::Tabled;

use crate::config::OutputFormat;
use crate::output::print_rows;
use crate::CliResult;

/// One consuming service.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct AttributeSetRow {
    /// Service index.
    #[tabled(rename = "Index")]
    pub index: u16,
    /// Service name.
    #[tabled(rename = "Service")]
    pub service_name: String,
    /// Attribute names, comma separated.
    #[tabled(rename = "Attributes")]
    pub attributes: String,
}

impl From<&AttributeConsumingService> for AttributeSetRow {
    fn from(service: &AttributeConsumingService) -> Self {
        Self {
            index: service.index,
            service_name: service.service_name.clone(),
            attributes: service.requested_names().join(", "),
        }
    }
}

/// Runs `attribute-sets`.
pub fn run_attribute_sets(format: OutputFormat) -> CliResult<()> {
    let rows: Vec<AttributeSetRow> = attribute_sets::agid_attribute_sets()
        .iter()
        .map(AttributeSetRow::from)
        .collect();
    print_rows(&rows, format)
}
