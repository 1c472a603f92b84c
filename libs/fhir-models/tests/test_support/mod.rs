#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use ferrum_codec::{Codec, DecodeOptions, ResourceRegistry, UnknownResourcePolicy};
use ferrum_models::catalog_registry;
use serde_json::Value;

static REGISTRY: OnceLock<ResourceRegistry> = OnceLock::new();

pub fn registry() -> &'static ResourceRegistry {
    REGISTRY.get_or_init(catalog_registry)
}

static CODEC: OnceLock<Codec<'static>> = OnceLock::new();

/// Codec with default options.
pub fn codec() -> &'static Codec<'static> {
    CODEC.get_or_init(|| Codec::new(registry()))
}

static STRICT_CODEC: OnceLock<Codec<'static>> = OnceLock::new();

/// Codec rejecting unknown fields, resources and modifier extensions.
pub fn strict_codec() -> &'static Codec<'static> {
    STRICT_CODEC.get_or_init(|| Codec::new(registry()).with_options(DecodeOptions::strict()))
}

static PRESERVING_CODEC: OnceLock<Codec<'static>> = OnceLock::new();

/// Codec keeping unregistered resources as opaque JSON.
pub fn preserving_codec() -> &'static Codec<'static> {
    PRESERVING_CODEC.get_or_init(|| {
        Codec::new(registry()).with_options(
            DecodeOptions::new().with_unknown_resources(UnknownResourcePolicy::Preserve),
        )
    })
}

pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data")
}

/// Every `*.json` fixture, sorted by file name.
pub fn fixture_paths() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = fs::read_dir(fixtures_root())
        .expect("failed to read fixture directory")
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    paths
}

pub fn load_fixture(name: &str) -> Value {
    let path = fixtures_root().join(name);
    assert!(path.exists(), "fixture missing at {:?}", path);
    let bytes = fs::read(&path).expect("failed to read fixture");
    serde_json::from_slice(&bytes).expect("failed to parse fixture")
}
