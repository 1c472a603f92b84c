//! Codec driver: bytes in, typed resources out, and back.

use crate::context::DecodeContext;
use crate::error::{json_kind, DecodeError, DecodeErrorKind, Error, Result};
use crate::options::DecodeOptions;
use crate::reader::resource_type_of;
use crate::registry::{self, ResourceRegistry};
use crate::resource::{AnyResource, Resource, ResourceType};
use crate::validation::ValidatorTable;
use crate::value::decode_object;
use serde_json::{Map, Value};

/// Decodes and encodes resources against one registry.
///
/// A `Codec` holds no per-call state; share it freely across threads.
#[derive(Debug, Clone)]
pub struct Codec<'r> {
    registry: &'r ResourceRegistry,
    validators: ValidatorTable,
    options: DecodeOptions,
}

impl<'r> Codec<'r> {
    pub fn new(registry: &'r ResourceRegistry) -> Self {
        Self {
            registry,
            validators: ValidatorTable::default(),
            options: DecodeOptions::default(),
        }
    }

    /// Codec over the process-wide registry.
    pub fn global() -> Result<Codec<'static>> {
        registry::global()
            .map(Codec::new)
            .ok_or(Error::RegistryNotInitialized)
    }

    pub fn with_validators(mut self, validators: ValidatorTable) -> Self {
        self.validators = validators;
        self
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &'r ResourceRegistry {
        self.registry
    }

    pub fn validators(&self) -> &ValidatorTable {
        &self.validators
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Fresh decode state for one call.
    pub fn context(&self) -> DecodeContext<'_> {
        DecodeContext::new(self.registry, &self.validators, &self.options)
    }

    /// Decode a resource of any registered type. With `expected`, the root
    /// `resourceType` must match it.
    pub fn decode(&self, bytes: &[u8], expected: Option<&str>) -> Result<AnyResource> {
        let value: Value = serde_json::from_slice(bytes)?;
        Ok(self.decode_value(&value, expected)?)
    }

    pub fn decode_str(&self, json: &str, expected: Option<&str>) -> Result<AnyResource> {
        let value: Value = serde_json::from_str(json)?;
        Ok(self.decode_value(&value, expected)?)
    }

    pub fn decode_value(
        &self,
        value: &Value,
        expected: Option<&str>,
    ) -> std::result::Result<AnyResource, DecodeError> {
        let mut ctx = self.context();
        let map = root_object(value, &ctx)?;

        if let Some(expected) = expected {
            let found = resource_type_of(map, &ctx)?;
            if found != expected {
                return Err(ctx.error_at(
                    "resourceType",
                    DecodeErrorKind::ResourceTypeMismatch {
                        expected: expected.to_string(),
                        found: found.to_string(),
                    },
                ));
            }
        }

        let resource = self.registry.resolve(map, &mut ctx)?;
        tracing::debug!(
            resource_type = resource.resource_type(),
            id = resource.id().unwrap_or_default(),
            "Decoded resource"
        );
        Ok(resource)
    }

    /// Decode straight into a concrete resource type.
    pub fn decode_as<R: ResourceType>(&self, bytes: &[u8]) -> Result<R> {
        let value: Value = serde_json::from_slice(bytes)?;
        Ok(self.decode_value_as(&value)?)
    }

    pub fn decode_value_as<R: ResourceType>(
        &self,
        value: &Value,
    ) -> std::result::Result<R, DecodeError> {
        let mut ctx = self.context();
        let map = root_object(value, &ctx)?;
        decode_object::<R>(map, &mut ctx)
    }

    pub fn encode(&self, resource: &dyn Resource) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&encode_value(resource))?)
    }

    pub fn encode_pretty(&self, resource: &dyn Resource) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&encode_value(resource))?)
    }

    pub fn encode_string(&self, resource: &dyn Resource) -> Result<String> {
        Ok(serde_json::to_string(&encode_value(resource))?)
    }

    pub fn encode_value(&self, resource: &dyn Resource) -> Value {
        encode_value(resource)
    }
}

/// Encode any resource to a JSON value.
pub fn encode_value(resource: &dyn Resource) -> Value {
    Value::Object(resource.to_json())
}

fn root_object<'v>(
    value: &'v Value,
    ctx: &DecodeContext<'_>,
) -> std::result::Result<&'v Map<String, Value>, DecodeError> {
    value.as_object().ok_or_else(|| {
        ctx.error(DecodeErrorKind::MalformedStructure(format!(
            "expected a resource object at the root, found {}",
            json_kind(value)
        )))
    })
}
