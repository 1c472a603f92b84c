//! Polymorphic containment registry.
//!
//! Maps a `resourceType` discriminator to the decoder of the concrete
//! resource. A registry is filled once at startup and then only read, so a
//! shared `&ResourceRegistry` may be used from any number of threads.

use crate::context::DecodeContext;
use crate::error::{DecodeError, DecodeErrorKind};
use crate::options::UnknownResourcePolicy;
use crate::reader::resource_type_of;
use crate::resource::{AnyResource, OpaqueResource, ResourceType};
use crate::value::decode_object;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Decoder for one resource type.
pub type DecodeFn =
    fn(&Map<String, Value>, &mut DecodeContext<'_>) -> Result<AnyResource, DecodeError>;

#[derive(Clone, Default)]
pub struct ResourceRegistry {
    decoders: HashMap<&'static str, DecodeFn>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a statically declared resource type.
    pub fn register<R: ResourceType>(&mut self) -> &mut Self {
        self.register_fn(R::RESOURCE_TYPE, decode_any::<R>)
    }

    /// Register a decoder under a discriminator. A later registration for
    /// the same discriminator replaces the earlier one.
    pub fn register_fn(&mut self, resource_type: &'static str, decoder: DecodeFn) -> &mut Self {
        if self.decoders.insert(resource_type, decoder).is_some() {
            tracing::warn!(resource_type, "Replacing registered resource decoder");
        }
        self
    }

    pub fn contains(&self, resource_type: &str) -> bool {
        self.decoders.contains_key(resource_type)
    }

    /// Registered discriminators, sorted.
    pub fn resource_types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.decoders.keys().copied().collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Decode a resource object by its `resourceType`.
    ///
    /// Unregistered types fail with `UnknownResourceType` at the current
    /// path, or become an [`OpaqueResource`] under
    /// [`UnknownResourcePolicy::Preserve`].
    pub fn resolve(
        &self,
        map: &Map<String, Value>,
        ctx: &mut DecodeContext<'_>,
    ) -> Result<AnyResource, DecodeError> {
        let resource_type = resource_type_of(map, ctx)?;

        if let Some(decode) = self.decoders.get(resource_type) {
            return decode(map, ctx);
        }

        match ctx.options().unknown_resources {
            UnknownResourcePolicy::Reject => Err(ctx.error(
                DecodeErrorKind::UnknownResourceType(resource_type.to_string()),
            )),
            UnknownResourcePolicy::Preserve => {
                tracing::debug!(
                    resource_type,
                    path = %ctx.path(),
                    "Preserving resource of unregistered type"
                );
                Ok(AnyResource::new(OpaqueResource::new(
                    resource_type,
                    map.clone(),
                )))
            }
        }
    }
}

impl fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("resource_types", &self.resource_types())
            .finish()
    }
}

fn decode_any<R: ResourceType>(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<AnyResource, DecodeError> {
    decode_object::<R>(map, ctx).map(AnyResource::new)
}

static GLOBAL: OnceLock<ResourceRegistry> = OnceLock::new();

/// Install the process-wide registry. Only the first call's builder runs;
/// later calls return the registry already installed.
pub fn init_global<F>(build: F) -> &'static ResourceRegistry
where
    F: FnOnce() -> ResourceRegistry,
{
    GLOBAL.get_or_init(build)
}

/// The process-wide registry, if one has been installed.
pub fn global() -> Option<&'static ResourceRegistry> {
    GLOBAL.get()
}
