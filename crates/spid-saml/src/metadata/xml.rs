//! Metadata document writing shared by the SP and IdP builders.

use std::io::Cursor;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::warn;

use super::Endpoint;
use crate::error::{SamlError, SamlResult};

/// Indented XML output.
pub(super) struct XmlDoc {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlDoc {
    pub(super) fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2),
        }
    }

    pub(super) fn write(&mut self, event: Event<'_>) -> SamlResult<()> {
        self.writer
            .write_event(event)
            .map_err(|e| SamlError::XmlWrite(e.to_string()))
    }

    pub(super) fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> SamlResult<()> {
        let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.write(Event::Start(element))
    }

    pub(super) fn end(&mut self, name: &str) -> SamlResult<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    pub(super) fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> SamlResult<()> {
        let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.write(Event::Empty(element))
    }

    pub(super) fn text_element(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
        text: &str,
    ) -> SamlResult<()> {
        self.start(name, attributes)?;
        self.write(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    pub(super) fn finish(self) -> SamlResult<String> {
        let bytes = self.writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| SamlError::XmlWrite(e.to_string()))
    }
}

/// `Binding`, `Location` and, when set, `ResponseLocation`.
pub(super) fn endpoint_attributes(endpoint: &Endpoint) -> Vec<(&str, &str)> {
    let mut attributes = vec![
        ("Binding", endpoint.binding.uri()),
        ("Location", endpoint.location.as_str()),
    ];
    if let Some(response_location) = endpoint.response_location.as_deref().filter(|l| !l.is_empty()) {
        attributes.push(("ResponseLocation", response_location));
    }
    attributes
}

/// Fails on the first endpoint with a blank location.
pub(super) fn check_endpoints<'a>(
    endpoints: impl IntoIterator<Item = &'a Endpoint>,
) -> SamlResult<()> {
    for endpoint in endpoints {
        if endpoint.location.trim().is_empty() {
            return Err(SamlError::InvalidMetadata(
                "endpoint location missing".to_string(),
            ));
        }
    }
    Ok(())
}

/// One `md:KeyDescriptor` per usage, each listing every certificate.
///
/// A usage without certificates is skipped with a warning.
pub(super) fn write_key_descriptors(
    doc: &mut XmlDoc,
    entity_id: &str,
    signing: &[String],
    encryption: &[String],
) -> SamlResult<()> {
    for (usage, certificates) in [("signing", signing), ("encryption", encryption)] {
        if certificates.is_empty() {
            warn!(entity_id, usage, "no certificate for key descriptor");
            continue;
        }
        doc.start("md:KeyDescriptor", &[("use", usage)])?;
        doc.start("ds:KeyInfo", &[])?;
        for certificate in certificates {
            doc.start("ds:X509Data", &[])?;
            doc.text_element("ds:X509Certificate", &[], certificate)?;
            doc.end("ds:X509Data")?;
        }
        doc.end("ds:KeyInfo")?;
        doc.end("md:KeyDescriptor")?;
    }
    Ok(())
}

pub(super) const fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
