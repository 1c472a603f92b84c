//! FHIR Binary model

use ferrum_codec::{fhir_resource, Base64Binary, Code, Primitive, Reference};

fhir_resource! {
    /// FHIR Binary resource
    ///
    /// Raw content in some native format, carried as base64.
    pub struct Binary: resource "Binary" {
        /// MimeType of the binary content
        content_type: Primitive<Code> => required("contentType"),
        /// Identifies another resource to use as proxy when enforcing access control
        security_context: Option<Reference> => opt("securityContext"),
        data: Option<Primitive<Base64Binary>> => opt("data"),
    }
}

impl Binary {
    pub fn new(content_type: &str, data: &str) -> Self {
        Self {
            content_type: Primitive::from(content_type),
            data: Some(Primitive::from(data)),
            ..Default::default()
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_str()
    }
}
