//! Type-safe FHIR JSON codec
//!
//! This crate turns FHIR JSON into statically typed Rust values and back,
//! preserving everything the JSON representation can carry:
//!
//! - primitive values together with their `_field` id/extension siblings
//! - choice elements (`value[x]`) with exactly one populated variant
//! - extensions, including nested ones, on any element
//! - contained and nested resources of runtime-determined type, resolved
//!   through a [`ResourceRegistry`]
//!
//! Every decode failure is a [`DecodeError`] naming the offending location
//! as a [`FieldPath`] (`entry[1].resource.contained[0].id`).
//!
//! Catalog types are declared with [`fhir_element!`], [`fhir_backbone!`],
//! [`fhir_resource!`] and [`fhir_choice!`]; see `ferrum-models` for the
//! resource catalog.
//!
//! # Example
//!
//! ```rust
//! use ferrum_codec::{fhir_resource, Codec, Date, Primitive, ResourceRegistry};
//!
//! fhir_resource! {
//!     pub struct Basic: domain "Basic" {
//!         created: Option<Primitive<Date>> => opt("created"),
//!     }
//! }
//!
//! let mut registry = ResourceRegistry::new();
//! registry.register::<Basic>();
//! let codec = Codec::new(&registry);
//!
//! let basic: Basic = codec
//!     .decode_as(br#"{"resourceType":"Basic","created":"2024-01-05"}"#)
//!     .unwrap();
//! assert_eq!(
//!     basic.created.as_ref().and_then(Primitive::as_str),
//!     Some("2024-01-05")
//! );
//!
//! let json = codec.encode_string(&basic).unwrap();
//! assert_eq!(json, r#"{"resourceType":"Basic","created":"2024-01-05"}"#);
//! ```

mod macros;

pub mod choice;
pub mod codec;
pub mod context;
pub mod datatypes;
pub mod element;
pub mod error;
pub mod extension;
pub mod options;
pub mod path;
pub mod primitive;
pub mod reader;
pub mod registry;
pub mod resource;
pub mod validation;
pub mod value;
pub mod writer;

pub use choice::FhirChoice;
pub use codec::{encode_value, Codec};
pub use context::DecodeContext;
pub use datatypes::*;
pub use element::{BackboneElement, Element, HasExtensions, HasId, HasModifierExtensions};
pub use error::{DecodeError, DecodeErrorKind, Error, Result};
pub use extension::{Extension, ExtensionContent};
pub use options::{
    DecodeOptions, ModifierExtensionPolicy, UnknownFieldPolicy, UnknownResourcePolicy,
};
pub use path::{FieldPath, PathSegment};
pub use primitive::{
    Base64Binary, Canonical, Code, Date, DateTime, Id, Instant, Markdown, Oid, PositiveInt,
    Primitive, PrimitiveValue, Time, UnsignedInt, Uri, Url, Uuid, Xhtml,
};
pub use reader::ObjectReader;
pub use registry::{DecodeFn, ResourceRegistry};
pub use resource::{
    AnyResource, DomainResourceBase, OpaqueResource, Resource, ResourceBase, ResourceType,
};
pub use validation::{Validator, ValidatorError, ValidatorTable};
pub use value::{decode_complex, decode_object, encode_complex, encode_object, Encoded, FhirComplex, FhirValue};
pub use writer::ObjectWriter;

pub use rust_decimal::Decimal;

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
    pub use serde_json::{Map, Value};
    pub use tracing;
}
