//! The `Element` and `BackboneElement` bases and the accessor traits every
//! catalog type implements.

use crate::error::DecodeError;
use crate::extension::{Extension, ExtensionContent};
use crate::reader::ObjectReader;
use crate::value::FhirComplex;
use crate::writer::ObjectWriter;

/// Base of every complex datatype: an optional id and extensions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            extension: Vec::new(),
        }
    }

    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extension.push(extension);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.extension.is_empty()
    }
}

impl FhirComplex for Element {
    const TYPE_NAME: &'static str = "Element";

    fn decode_fields(reader: &mut ObjectReader<'_, '_, '_>) -> Result<Self, DecodeError> {
        Ok(Self {
            id: reader.attr("id")?,
            extension: reader.list("extension")?,
        })
    }

    fn encode_fields(&self, writer: &mut ObjectWriter) {
        writer.attr("id", &self.id);
        writer.list("extension", &self.extension);
    }
}

crate::impl_complex_value!(Element);

/// Base of elements nested inside a resource definition
/// (`Patient.contact`, `Bundle.entry`, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackboneElement {
    pub element: Element,
    pub modifier_extension: Vec<Extension>,
}

impl BackboneElement {
    pub fn decode_fields(reader: &mut ObjectReader<'_, '_, '_>) -> Result<Self, DecodeError> {
        Ok(Self {
            element: Element::decode_fields(reader)?,
            modifier_extension: reader.modifier_extensions("modifierExtension")?,
        })
    }

    pub fn encode_fields(&self, writer: &mut ObjectWriter) {
        self.element.encode_fields(writer);
        writer.modifier_extensions("modifierExtension", &self.modifier_extension);
    }
}

/// Element-level id access.
pub trait HasId {
    fn id(&self) -> Option<&str>;
    fn set_id(&mut self, id: Option<String>);
}

/// Extension access shared by elements and domain resources.
pub trait HasExtensions {
    fn extensions(&self) -> &[Extension];
    fn extensions_mut(&mut self) -> &mut Vec<Extension>;

    /// All extensions with the given url, in document order.
    fn extensions_by_url(&self, url: &str) -> Vec<&Extension> {
        self.extensions().iter().filter(|e| e.url == url).collect()
    }

    fn first_extension(&self, url: &str) -> Option<&Extension> {
        self.extensions().iter().find(|e| e.url == url)
    }

    fn has_extension(&self, url: &str) -> bool {
        self.first_extension(url).is_some()
    }

    fn add_extension(&mut self, extension: Extension) {
        self.extensions_mut().push(extension);
    }

    /// Attach a new extension built from a url and its content.
    fn attach_extension(&mut self, url: impl Into<String>, content: ExtensionContent)
    where
        Self: Sized,
    {
        self.add_extension(Extension::new(url, content));
    }

    /// Remove and return every extension with the given url.
    fn remove_extensions(&mut self, url: &str) -> Vec<Extension> {
        let (removed, kept) = std::mem::take(self.extensions_mut())
            .into_iter()
            .partition(|e| e.url == url);
        *self.extensions_mut() = kept;
        removed
    }
}

/// Access to `modifierExtension` on backbone elements and domain resources.
pub trait HasModifierExtensions {
    fn modifier_extensions(&self) -> &[Extension];
    fn modifier_extensions_mut(&mut self) -> &mut Vec<Extension>;

    fn modifier_extensions_by_url(&self, url: &str) -> Vec<&Extension> {
        self.modifier_extensions()
            .iter()
            .filter(|e| e.url == url)
            .collect()
    }
}

impl HasId for Element {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }
}

impl HasExtensions for Element {
    fn extensions(&self) -> &[Extension] {
        &self.extension
    }

    fn extensions_mut(&mut self) -> &mut Vec<Extension> {
        &mut self.extension
    }
}

impl HasModifierExtensions for BackboneElement {
    fn modifier_extensions(&self) -> &[Extension] {
        &self.modifier_extension
    }

    fn modifier_extensions_mut(&mut self) -> &mut Vec<Extension> {
        &mut self.modifier_extension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::DataValue;
    use crate::primitive::Primitive;

    fn ext(url: &str, value: &str) -> Extension {
        Extension::with_value(url, DataValue::String(Primitive::from(value)))
    }

    #[test]
    fn lookup_by_url_keeps_document_order() {
        let mut element = Element::new();
        element.add_extension(ext("http://a", "1"));
        element.add_extension(ext("http://b", "2"));
        element.add_extension(ext("http://a", "3"));

        let found = element.extensions_by_url("http://a");
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].value(), Some(&DataValue::String(Primitive::from("3"))));
        assert!(element.has_extension("http://b"));
        assert!(element.first_extension("http://c").is_none());
    }

    #[test]
    fn remove_extensions_returns_removed() {
        let mut element = Element::new();
        element.add_extension(ext("http://a", "1"));
        element.add_extension(ext("http://b", "2"));

        let removed = element.remove_extensions("http://a");
        assert_eq!(removed.len(), 1);
        assert_eq!(element.extensions().len(), 1);
        assert_eq!(element.extensions()[0].url, "http://b");
    }

    #[test]
    fn empty_element_is_empty() {
        assert!(Element::new().is_empty());
        assert!(!Element::with_id("a").is_empty());
    }
}
