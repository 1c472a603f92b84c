//! Decode policies.

use serde::Deserialize;
use std::collections::HashSet;

/// What to do with object keys the catalog does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownFieldPolicy {
    /// Skip them (logged at debug level).
    #[default]
    Ignore,
    /// Fail with `UnknownField`.
    Reject,
}

/// What to do with a resource whose `resourceType` has no registered decoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownResourcePolicy {
    /// Fail with `UnknownResourceType`.
    #[default]
    Reject,
    /// Keep the raw JSON as an `OpaqueResource`.
    Preserve,
}

/// How `modifierExtension` entries are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModifierExtensionPolicy {
    /// Keep every modifier extension for the application to inspect.
    #[default]
    Preserve,
    /// Fail on modifier extensions whose url is not listed as understood.
    RejectUnrecognized,
}

/// Options applied to one decode call.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    pub unknown_fields: UnknownFieldPolicy,
    pub unknown_resources: UnknownResourcePolicy,
    pub modifier_extensions: ModifierExtensionPolicy,
    /// Modifier extension urls the application understands.
    pub understood_modifier_extensions: HashSet<String>,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that reject everything the catalog does not describe.
    pub fn strict() -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::Reject,
            unknown_resources: UnknownResourcePolicy::Reject,
            modifier_extensions: ModifierExtensionPolicy::RejectUnrecognized,
            understood_modifier_extensions: HashSet::new(),
        }
    }

    pub fn with_unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_fields = policy;
        self
    }

    pub fn with_unknown_resources(mut self, policy: UnknownResourcePolicy) -> Self {
        self.unknown_resources = policy;
        self
    }

    pub fn with_modifier_extensions(mut self, policy: ModifierExtensionPolicy) -> Self {
        self.modifier_extensions = policy;
        self
    }

    /// Mark a modifier extension url as understood.
    pub fn understand_modifier(mut self, url: impl Into<String>) -> Self {
        self.understood_modifier_extensions.insert(url.into());
        self
    }

    pub(crate) fn accepts_modifier(&self, url: &str) -> bool {
        match self.modifier_extensions {
            ModifierExtensionPolicy::Preserve => true,
            ModifierExtensionPolicy::RejectUnrecognized => {
                self.understood_modifier_extensions.contains(url)
            }
        }
    }
}
