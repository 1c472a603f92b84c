//! Registration of the catalog with a [`ResourceRegistry`].

use crate::common::{
    Binary, Bundle, Medication, Observation, OperationOutcome, Organization, Parameters, Patient,
};
use ferrum_codec::registry::init_global;
use ferrum_codec::{Codec, ResourceRegistry};

/// Register every catalog resource type.
pub fn register_catalog(registry: &mut ResourceRegistry) -> &mut ResourceRegistry {
    registry
        .register::<Patient>()
        .register::<Observation>()
        .register::<Medication>()
        .register::<Organization>()
        .register::<OperationOutcome>()
        .register::<Bundle>()
        .register::<Parameters>()
        .register::<Binary>()
}

/// A fresh registry holding the catalog.
pub fn catalog_registry() -> ResourceRegistry {
    let mut registry = ResourceRegistry::new();
    register_catalog(&mut registry);
    tracing::debug!(resource_types = registry.len(), "catalog registry built");
    registry
}

/// The process-wide registry, installing the catalog on first use.
///
/// If another registry was installed first, that one is returned unchanged.
pub fn registry() -> &'static ResourceRegistry {
    init_global(catalog_registry)
}

/// Codec over [`registry()`] with default options.
pub fn codec() -> Codec<'static> {
    Codec::new(registry())
}
