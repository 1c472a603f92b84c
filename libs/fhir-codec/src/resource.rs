//! Resource bases and dynamically typed resources.
//!
//! Statically, a resource is a struct declared with
//! [`fhir_resource!`](crate::fhir_resource) that embeds either
//! [`ResourceBase`] or [`DomainResourceBase`]. Wherever FHIR allows "any
//! resource" (`contained`, `Bundle.entry.resource`, ...) the value is an
//! [`AnyResource`], resolved through the registry by `resourceType`.

use crate::context::DecodeContext;
use crate::datatypes::{Meta, Narrative};
use crate::error::{json_kind, DecodeError, DecodeErrorKind};
use crate::extension::Extension;
use crate::primitive::{Code, Id, Primitive, Uri};
use crate::reader::ObjectReader;
use crate::value::{Encoded, FhirComplex, FhirValue};
use crate::writer::ObjectWriter;
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;
use std::ops::Deref;

/// Fields every resource carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceBase {
    pub id: Option<Primitive<Id>>,
    pub meta: Option<Meta>,
    pub implicit_rules: Option<Primitive<Uri>>,
    pub language: Option<Primitive<Code>>,
}

impl ResourceBase {
    pub fn decode_fields(reader: &mut ObjectReader<'_, '_, '_>) -> Result<Self, DecodeError> {
        Ok(Self {
            id: reader.opt("id")?,
            meta: reader.opt("meta")?,
            implicit_rules: reader.opt("implicitRules")?,
            language: reader.opt("language")?,
        })
    }

    pub fn encode_fields(&self, writer: &mut ObjectWriter) {
        writer.opt("id", &self.id);
        writer.opt("meta", &self.meta);
        writer.opt("implicitRules", &self.implicit_rules);
        writer.opt("language", &self.language);
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_ref().and_then(Primitive::as_str)
    }

    /// Replace the logical id, keeping any extensions on it.
    pub fn set_id(&mut self, id: Option<String>) {
        let value = id.map(Id::new);
        if let Some(cell) = self.id.as_mut() {
            cell.value = value;
        } else if let Some(value) = value {
            self.id = Some(Primitive::new(value));
        }
        if self.id.as_ref().is_some_and(Primitive::is_empty) {
            self.id = None;
        }
    }
}

/// Fields of resources deriving from `DomainResource`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainResourceBase {
    pub resource: ResourceBase,
    pub text: Option<Narrative>,
    pub contained: Vec<AnyResource>,
    pub extension: Vec<Extension>,
    pub modifier_extension: Vec<Extension>,
}

impl DomainResourceBase {
    pub fn decode_fields(reader: &mut ObjectReader<'_, '_, '_>) -> Result<Self, DecodeError> {
        Ok(Self {
            resource: ResourceBase::decode_fields(reader)?,
            text: reader.opt("text")?,
            contained: reader.list("contained")?,
            extension: reader.list("extension")?,
            modifier_extension: reader.modifier_extensions("modifierExtension")?,
        })
    }

    pub fn encode_fields(&self, writer: &mut ObjectWriter) {
        self.resource.encode_fields(writer);
        writer.opt("text", &self.text);
        writer.list("contained", &self.contained);
        writer.list("extension", &self.extension);
        writer.modifier_extensions("modifierExtension", &self.modifier_extension);
    }

    /// Contained resource with the given id (without the leading `#`).
    pub fn find_contained(&self, id: &str) -> Option<&AnyResource> {
        self.contained.iter().find(|r| r.id() == Some(id))
    }
}

/// Object-safe view of any resource.
pub trait Resource: Any + fmt::Debug + Send + Sync {
    fn resource_type(&self) -> &str;

    fn id(&self) -> Option<&str>;

    fn meta(&self) -> Option<&Meta>;

    /// Contained resources; empty for resources that cannot contain any.
    fn contained(&self) -> &[AnyResource] {
        &[]
    }

    /// Encode to a JSON object starting with `resourceType`.
    fn to_json(&self) -> Map<String, Value>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn clone_boxed(&self) -> Box<dyn Resource>;

    fn eq_dyn(&self, other: &dyn Resource) -> bool;
}

/// A resource with a statically known type.
pub trait ResourceType: Resource + FhirComplex + Clone + PartialEq {
    const RESOURCE_TYPE: &'static str;
}

/// A resource whose concrete type is only known at runtime.
pub struct AnyResource(Box<dyn Resource>);

impl AnyResource {
    pub fn new<R: Resource>(resource: R) -> Self {
        AnyResource(Box::new(resource))
    }

    pub fn from_boxed(resource: Box<dyn Resource>) -> Self {
        AnyResource(resource)
    }

    pub fn is<R: Resource>(&self) -> bool {
        self.0.as_any().is::<R>()
    }

    pub fn downcast_ref<R: Resource>(&self) -> Option<&R> {
        self.0.as_any().downcast_ref::<R>()
    }

    pub fn downcast_mut<R: Resource>(&mut self) -> Option<&mut R> {
        self.0.as_any_mut().downcast_mut::<R>()
    }

    /// Take the concrete resource out. `None` (dropping the resource) when
    /// the type differs; check with [`is`](Self::is) first to keep it.
    pub fn downcast<R: Resource>(self) -> Option<R> {
        self.0.into_any().downcast::<R>().ok().map(|resource| *resource)
    }

    pub fn resource_type(&self) -> &str {
        self.0.resource_type()
    }

    pub fn id(&self) -> Option<&str> {
        self.0.id()
    }

    pub fn meta(&self) -> Option<&Meta> {
        self.0.meta()
    }

    pub fn contained(&self) -> &[AnyResource] {
        self.0.contained()
    }

    /// Contained resource with the given id (without the leading `#`).
    pub fn find_contained(&self, id: &str) -> Option<&AnyResource> {
        self.contained().iter().find(|r| r.id() == Some(id))
    }

    pub fn to_json(&self) -> Map<String, Value> {
        self.0.to_json()
    }

    pub fn as_resource(&self) -> &dyn Resource {
        self.0.as_ref()
    }

    pub fn into_inner(self) -> Box<dyn Resource> {
        self.0
    }
}

impl Deref for AnyResource {
    type Target = dyn Resource;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl Clone for AnyResource {
    fn clone(&self) -> Self {
        AnyResource(self.0.clone_boxed())
    }
}

impl PartialEq for AnyResource {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_dyn(other.0.as_ref())
    }
}

impl fmt::Debug for AnyResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl FhirValue for AnyResource {
    fn decode_value(
        value: Option<&Value>,
        sidecar: Option<&Value>,
        ctx: &mut DecodeContext<'_>,
    ) -> Result<Option<Self>, DecodeError> {
        if sidecar.is_some_and(|s| !s.is_null()) {
            return Err(ctx.error(DecodeErrorKind::MalformedStructure(
                "a resource cannot have a `_` sibling".to_string(),
            )));
        }
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) => ctx.registry().resolve(map, ctx).map(Some),
            Some(other) => Err(ctx.error(DecodeErrorKind::MalformedStructure(format!(
                "expected a resource object, found {}",
                json_kind(other)
            )))),
        }
    }

    fn encode_value(&self) -> Encoded {
        Encoded::value(Value::Object(self.0.to_json()))
    }
}

/// A resource of a type the registry does not know, kept as raw JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueResource {
    resource_type: String,
    json: Map<String, Value>,
}

impl OpaqueResource {
    pub fn new(resource_type: impl Into<String>, json: Map<String, Value>) -> Self {
        Self {
            resource_type: resource_type.into(),
            json,
        }
    }

    pub fn json(&self) -> &Map<String, Value> {
        &self.json
    }
}

impl Resource for OpaqueResource {
    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn id(&self) -> Option<&str> {
        self.json.get("id").and_then(Value::as_str)
    }

    fn meta(&self) -> Option<&Meta> {
        None
    }

    fn to_json(&self) -> Map<String, Value> {
        let mut map = Map::with_capacity(self.json.len());
        map.insert(
            "resourceType".to_string(),
            Value::String(self.resource_type.clone()),
        );
        for (key, value) in &self.json {
            if key != "resourceType" {
                map.insert(key.clone(), value.clone());
            }
        }
        map
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn clone_boxed(&self) -> Box<dyn Resource> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn Resource) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| other == self)
    }
}
