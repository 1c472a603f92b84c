//! CLI configuration
//!
//! Loaded from `ferrum.toml` (or the file given with `--config`) and
//! `FERRUM__*` environment variables, e.g. `FERRUM__LOGGING__LEVEL=debug`
//! or `FERRUM__CODEC__UNKNOWN_FIELDS=reject`.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use ferrum_codec::{
    DecodeOptions, ModifierExtensionPolicy, UnknownFieldPolicy, UnknownResourcePolicy,
    ValidatorTable,
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub codec: CodecConfig,
    /// Lexical validators applied to primitive values.
    #[serde(default)]
    pub validators: Vec<ValidatorConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON formatting for logs
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodecConfig {
    #[serde(default)]
    pub unknown_fields: UnknownFieldPolicy,
    #[serde(default)]
    pub unknown_resources: UnknownResourcePolicy,
    #[serde(default)]
    pub modifier_extensions: ModifierExtensionPolicy,
    /// Modifier extension urls accepted under `reject-unrecognized`.
    #[serde(default)]
    pub understood_modifier_extensions: Vec<String>,
}

impl CodecConfig {
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            unknown_fields: self.unknown_fields,
            unknown_resources: self.unknown_resources,
            modifier_extensions: self.modifier_extensions,
            understood_modifier_extensions: self
                .understood_modifier_extensions
                .iter()
                .cloned()
                .collect::<HashSet<_>>(),
        }
    }
}

/// One validator entry:
///
/// ```toml
/// [[validators]]
/// type = "date"
/// pattern = "[0-9]{4}(-[0-9]{2}(-[0-9]{2})?)?"
///
/// [[validators]]
/// element = "Patient.birthDate"
/// pattern = "[0-9]{4}-[0-9]{2}-[0-9]{2}"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ValidatorConfig {
    /// Primitive type name (`date`, `id`, ...).
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    /// Element path (`Patient.birthDate`).
    #[serde(default)]
    pub element: Option<String>,
    pub pattern: String,
}

impl Config {
    /// Load configuration from an optional file and the environment.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("ferrum").required(false),
        };

        let config = config::Config::builder()
            .set_default("logging.level", default_log_level())?
            .set_default("logging.json", false)?
            .add_source(file)
            // FERRUM__CODEC__UNKNOWN_FIELDS=reject -> codec.unknown_fields
            .add_source(
                config::Environment::with_prefix("FERRUM")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("codec.understood_modifier_extensions")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to load configuration")?;

        Ok(config.try_deserialize()?)
    }

    /// Build the validator table, rejecting entries that name neither or
    /// both of `type` and `element`.
    pub fn validator_table(&self) -> anyhow::Result<ValidatorTable> {
        let mut table = ValidatorTable::new();
        for entry in &self.validators {
            table = match (&entry.type_name, &entry.element) {
                (Some(type_name), None) => table.with_type_pattern(type_name, &entry.pattern)?,
                (None, Some(element)) => table.with_element_pattern(element, &entry.pattern)?,
                _ => anyhow::bail!(
                    "validator with pattern `{}` must name exactly one of `type` or `element`",
                    entry.pattern
                ),
            };
        }
        Ok(table)
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
