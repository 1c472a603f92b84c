//! FHIR resource catalog
//!
//! Typed resources built on `ferrum-codec`. Each resource is declared once
//! with the codec's catalog macros and registered with a
//! [`ResourceRegistry`](ferrum_codec::ResourceRegistry) so that contained
//! and nested resources (`Bundle.entry.resource`, `contained`,
//! `Parameters.parameter.resource`) resolve to their concrete type.
//!
//! # Module Organization
//!
//! - `common`: the resources, their backbone elements and bound code enums
//! - `registry`: catalog registration and the process-wide registry
//!
//! # Example
//!
//! ```rust
//! use ferrum_models::{codec, Patient};
//!
//! let json = r#"{
//!     "resourceType": "Patient",
//!     "id": "example",
//!     "birthDate": "1974-12-25",
//!     "_birthDate": {
//!         "extension": [{
//!             "url": "http://hl7.org/fhir/StructureDefinition/patient-birthTime",
//!             "valueDateTime": "1974-12-25T14:35:45-05:00"
//!         }]
//!     }
//! }"#;
//!
//! let codec = codec();
//! let resource = codec.decode_str(json, Some("Patient")).unwrap();
//! let patient = resource.downcast_ref::<Patient>().unwrap();
//!
//! let birth_date = patient.birth_date.as_ref().unwrap();
//! assert_eq!(birth_date.as_str(), Some("1974-12-25"));
//! assert_eq!(birth_date.extensions().len(), 1);
//! ```

pub mod common;
pub mod registry;

// Re-export commonly used types
pub use common::*;
pub use registry::{catalog_registry, codec, register_catalog, registry};
