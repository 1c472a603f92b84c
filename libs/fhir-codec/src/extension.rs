//! FHIR extensions.

use crate::choice::FhirChoice;
use crate::datatypes::DataValue;
use crate::element::HasId;
use crate::error::{DecodeError, DecodeErrorKind};
use crate::reader::ObjectReader;
use crate::value::FhirComplex;
use crate::writer::ObjectWriter;

/// What an extension carries: a single typed value or nested extensions,
/// never both.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtensionContent {
    Value(DataValue),
    Nested(Vec<Extension>),
}

/// An extension identified by its url.
#[derive(Debug, Clone, PartialEq)]
pub struct Extension {
    pub id: Option<String>,
    pub url: String,
    pub content: Option<ExtensionContent>,
}

impl Extension {
    pub fn new(url: impl Into<String>, content: ExtensionContent) -> Self {
        let content = match content {
            ExtensionContent::Nested(children) if children.is_empty() => None,
            other => Some(other),
        };
        Self {
            id: None,
            url: url.into(),
            content,
        }
    }

    pub fn with_value(url: impl Into<String>, value: DataValue) -> Self {
        Self::new(url, ExtensionContent::Value(value))
    }

    pub fn with_nested(url: impl Into<String>, children: Vec<Extension>) -> Self {
        Self::new(url, ExtensionContent::Nested(children))
    }

    /// Extension with neither value nor children.
    pub fn empty(url: impl Into<String>) -> Self {
        Self {
            id: None,
            url: url.into(),
            content: None,
        }
    }

    pub fn value(&self) -> Option<&DataValue> {
        match &self.content {
            Some(ExtensionContent::Value(value)) => Some(value),
            _ => None,
        }
    }

    pub fn nested(&self) -> &[Extension] {
        match &self.content {
            Some(ExtensionContent::Nested(children)) => children,
            _ => &[],
        }
    }

    pub fn nested_by_url(&self, url: &str) -> Vec<&Extension> {
        self.nested().iter().filter(|e| e.url == url).collect()
    }
}

impl FhirComplex for Extension {
    const TYPE_NAME: &'static str = "Extension";

    fn decode_fields(reader: &mut ObjectReader<'_, '_, '_>) -> Result<Self, DecodeError> {
        let id = reader.attr("id")?;
        let url = reader.required_attr("url")?;
        let value: Option<DataValue> = reader.choice("value")?;
        let nested: Vec<Extension> = reader.list("extension")?;

        let content = match (value, nested.is_empty()) {
            (Some(_), false) => {
                return Err(reader.error(DecodeErrorKind::ConflictingExtensionShape { url }));
            }
            (Some(value), true) => Some(ExtensionContent::Value(value)),
            (None, false) => Some(ExtensionContent::Nested(nested)),
            (None, true) => None,
        };

        Ok(Self { id, url, content })
    }

    fn encode_fields(&self, writer: &mut ObjectWriter) {
        writer.attr("id", &self.id);
        writer.required_attr("url", &self.url);
        match &self.content {
            Some(ExtensionContent::Value(value)) => value.encode_variant(writer, "value"),
            Some(ExtensionContent::Nested(children)) => writer.list("extension", children),
            None => {}
        }
    }
}

crate::impl_complex_value!(Extension);

impl HasId for Extension {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }
}
