//! Field-by-field construction of a FHIR JSON object during encode.

use crate::choice::FhirChoice;
use crate::value::{Encoded, FhirValue};
use serde_json::{Map, Value};

/// Builds one JSON object in field-declaration order.
///
/// Absent values produce no key at all; `null` is never written except as
/// padding inside an aligned primitive list.
#[derive(Debug, Default)]
pub struct ObjectWriter {
    map: Map<String, Value>,
}

impl ObjectWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn put(&mut self, key: &str, encoded: Encoded) {
        if let Some(value) = encoded.value {
            self.map.insert(key.to_string(), value);
        }
        if let Some(sidecar) = encoded.sidecar {
            self.map.insert(format!("_{}", key), sidecar);
        }
    }

    pub fn opt<T: FhirValue>(&mut self, key: &str, value: &Option<T>) {
        if let Some(value) = value {
            self.put(key, value.encode_value());
        }
    }

    pub fn required<T: FhirValue>(&mut self, key: &str, value: &T) {
        self.put(key, value.encode_value());
    }

    /// Repeating field. When any entry has a `_key` half, both arrays are
    /// written with `null` padding so they stay index-aligned.
    pub fn list<T: FhirValue>(&mut self, key: &str, values: &[T]) {
        if values.is_empty() {
            return;
        }

        let encoded: Vec<Encoded> = values.iter().map(FhirValue::encode_value).collect();
        let has_values = encoded.iter().any(|e| e.value.is_some());
        let has_sidecars = encoded.iter().any(|e| e.sidecar.is_some());

        let (items, sidecars): (Vec<Value>, Vec<Value>) = encoded
            .into_iter()
            .map(|e| {
                (
                    e.value.unwrap_or(Value::Null),
                    e.sidecar.unwrap_or(Value::Null),
                )
            })
            .unzip();

        if has_values {
            self.map.insert(key.to_string(), Value::Array(items));
        }
        if has_sidecars {
            self.map.insert(format!("_{}", key), Value::Array(sidecars));
        }
    }

    pub fn choice<C: FhirChoice>(&mut self, base: &str, value: &Option<C>) {
        if let Some(choice) = value {
            choice.encode_variant(self, base);
        }
    }

    pub fn required_choice<C: FhirChoice>(&mut self, base: &str, value: &Option<C>) {
        self.choice(base, value);
    }

    pub fn attr(&mut self, key: &str, value: &Option<String>) {
        if let Some(value) = value {
            self.map.insert(key.to_string(), Value::String(value.clone()));
        }
    }

    pub fn required_attr(&mut self, key: &str, value: &str) {
        self.map.insert(key.to_string(), Value::String(value.to_string()));
    }

    pub fn modifier_extensions<T: FhirValue>(&mut self, key: &str, values: &[T]) {
        self.list(key, values);
    }

    /// Write the `resourceType` discriminator.
    pub fn discriminator(&mut self, resource_type: &str) {
        self.map.insert(
            "resourceType".to_string(),
            Value::String(resource_type.to_string()),
        );
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.map
    }
}
