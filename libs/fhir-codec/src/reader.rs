//! Field-by-field access to a FHIR JSON object during decode.

use crate::choice::FhirChoice;
use crate::context::DecodeContext;
use crate::error::{json_kind, DecodeError, DecodeErrorKind};
use crate::extension::Extension;
use crate::options::UnknownFieldPolicy;
use crate::value::FhirValue;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Reads the fields of one JSON object.
///
/// Every key a reader touches (including its `_key` sibling) is recorded so
/// that [`finish`](Self::finish) can apply the unknown-field policy to the
/// rest. Method names match those of [`ObjectWriter`](crate::ObjectWriter),
/// which is what lets the catalog macros drive both directions from a single
/// field list.
pub struct ObjectReader<'v, 'c, 'a> {
    type_name: &'static str,
    map: &'v Map<String, Value>,
    ctx: &'c mut DecodeContext<'a>,
    consumed: HashSet<String>,
}

impl<'v, 'c, 'a> ObjectReader<'v, 'c, 'a> {
    pub fn new(
        type_name: &'static str,
        map: &'v Map<String, Value>,
        ctx: &'c mut DecodeContext<'a>,
    ) -> Self {
        Self {
            type_name,
            map,
            ctx,
            consumed: HashSet::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn context(&mut self) -> &mut DecodeContext<'a> {
        &mut *self.ctx
    }

    /// Error located at this object.
    pub fn error(&self, kind: DecodeErrorKind) -> DecodeError {
        self.ctx.error(kind)
    }

    /// Whether `key` holds a non-null value (the key is not consumed).
    pub fn is_present(&self, key: &str) -> bool {
        self.map.get(key).is_some_and(|v| !v.is_null())
    }

    fn take(&mut self, key: &str) -> Option<&'v Value> {
        let value = self.map.get(key)?;
        self.consumed.insert(key.to_string());
        Some(value)
    }

    fn take_pair(&mut self, key: &str) -> (Option<&'v Value>, Option<&'v Value>) {
        let value = self.take(key);
        let sidecar = self.take(&format!("_{}", key));
        (value, sidecar)
    }

    fn within<R>(
        &mut self,
        key: &str,
        f: impl FnOnce(&mut DecodeContext<'a>) -> Result<R, DecodeError>,
    ) -> Result<R, DecodeError> {
        let previous = self.ctx.enter_field(self.type_name, key);
        let result = f(&mut *self.ctx);
        self.ctx.leave_field(previous);
        result
    }

    /// Optional single-valued field.
    pub fn opt<T: FhirValue>(&mut self, key: &str) -> Result<Option<T>, DecodeError> {
        let (value, sidecar) = self.take_pair(key);
        if value.is_none() && sidecar.is_none() {
            return Ok(None);
        }
        self.within(key, |ctx| T::decode_value(value, sidecar, ctx))
    }

    /// Required single-valued field.
    pub fn required<T: FhirValue>(&mut self, key: &str) -> Result<T, DecodeError> {
        match self.opt(key)? {
            Some(value) => Ok(value),
            None => Err(self
                .ctx
                .error(DecodeErrorKind::MissingRequiredField(key.to_string()))),
        }
    }

    /// Repeating field. Primitive lists are aligned with their `_key` sibling
    /// array by index.
    pub fn list<T: FhirValue>(&mut self, key: &str) -> Result<Vec<T>, DecodeError> {
        let (value, sidecar) = self.take_pair(key);
        self.within(key, |ctx| decode_list(key, value, sidecar, ctx))
    }

    /// Optional choice element `base[x]`.
    pub fn choice<C: FhirChoice>(&mut self, base: &str) -> Result<Option<C>, DecodeError> {
        let populated: Vec<(&'static str, String)> = C::SUFFIXES
            .iter()
            .map(|suffix| (*suffix, format!("{}{}", base, suffix)))
            .filter(|(_, key)| self.is_present(key) || self.is_present(&format!("_{}", key)))
            .collect();

        match populated.as_slice() {
            [] => Ok(None),
            [(suffix, key)] => C::decode_variant(self, key, suffix),
            _ => {
                let keys = populated.iter().map(|(_, key)| key.clone()).collect();
                Err(self.ctx.error_at(
                    &format!("{}[x]", base),
                    DecodeErrorKind::AmbiguousChoice {
                        field: base.to_string(),
                        keys,
                    },
                ))
            }
        }
    }

    /// Required choice element `base[x]`. Always `Some` on success.
    pub fn required_choice<C: FhirChoice>(&mut self, base: &str) -> Result<Option<C>, DecodeError> {
        match self.choice(base)? {
            Some(choice) => Ok(Some(choice)),
            None => Err(self.ctx.error_at(
                &format!("{}[x]", base),
                DecodeErrorKind::MissingRequiredChoice {
                    field: base.to_string(),
                },
            )),
        }
    }

    /// Plain string attribute (`Element.id`, `Extension.url`). Attributes
    /// have no `_key` sibling and no validator.
    pub fn attr(&mut self, key: &str) -> Result<Option<String>, DecodeError> {
        match self.take(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.ctx.error_at(
                key,
                DecodeErrorKind::TypeMismatch {
                    expected: "string",
                    found: json_kind(other).to_string(),
                },
            )),
        }
    }

    pub fn required_attr(&mut self, key: &str) -> Result<String, DecodeError> {
        match self.attr(key)? {
            Some(value) => Ok(value),
            None => Err(self
                .ctx
                .error(DecodeErrorKind::MissingRequiredField(key.to_string()))),
        }
    }

    /// `modifierExtension` list, checked against the modifier policy.
    pub fn modifier_extensions(&mut self, key: &str) -> Result<Vec<Extension>, DecodeError> {
        let extensions: Vec<Extension> = self.list(key)?;
        let options = self.ctx.options();
        if let Some((index, ext)) = extensions
            .iter()
            .enumerate()
            .find(|(_, ext)| !options.accepts_modifier(&ext.url))
        {
            let mut path = self.ctx.path().child(key);
            path.push_index(index);
            return Err(DecodeError::new(
                DecodeErrorKind::UnrecognizedModifierExtension(ext.url.clone()),
                path,
            ));
        }
        Ok(extensions)
    }

    /// Check the `resourceType` discriminator of a resource object.
    pub fn discriminator(&mut self, expected: &str) -> Result<(), DecodeError> {
        let found = resource_type_of(self.map, self.ctx)?;
        self.consumed.insert("resourceType".to_string());
        if found != expected {
            return Err(self.ctx.error_at(
                "resourceType",
                DecodeErrorKind::ResourceTypeMismatch {
                    expected: expected.to_string(),
                    found: found.to_string(),
                },
            ));
        }
        Ok(())
    }

    /// Apply the unknown-field policy to keys nothing has read.
    pub fn finish(self) -> Result<(), DecodeError> {
        let policy = self.ctx.options().unknown_fields;
        for (key, value) in self.map {
            if value.is_null() || self.consumed.contains(key) {
                continue;
            }
            match policy {
                UnknownFieldPolicy::Reject => {
                    return Err(self
                        .ctx
                        .error(DecodeErrorKind::UnknownField(key.clone())));
                }
                UnknownFieldPolicy::Ignore => {
                    tracing::debug!(
                        field = %key,
                        path = %self.ctx.path(),
                        type_name = self.type_name,
                        "Ignoring unknown field"
                    );
                }
            }
        }
        Ok(())
    }
}

/// Read the `resourceType` discriminator of a resource object.
pub fn resource_type_of<'m>(
    map: &'m Map<String, Value>,
    ctx: &DecodeContext<'_>,
) -> Result<&'m str, DecodeError> {
    match map.get("resourceType") {
        Some(Value::String(rt)) => Ok(rt.as_str()),
        None | Some(Value::Null) => Err(ctx.error(DecodeErrorKind::MissingRequiredField(
            "resourceType".to_string(),
        ))),
        Some(other) => Err(ctx.error_at(
            "resourceType",
            DecodeErrorKind::MalformedStructure(format!(
                "`resourceType` must be a string, found {}",
                json_kind(other)
            )),
        )),
    }
}

fn as_array<'v>(
    key: &str,
    value: Option<&'v Value>,
    ctx: &DecodeContext<'_>,
) -> Result<Option<&'v Vec<Value>>, DecodeError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(other) => Err(ctx.error(DecodeErrorKind::MalformedStructure(format!(
            "expected an array for `{}`, found {}",
            key,
            json_kind(other)
        )))),
    }
}

fn decode_list<T: FhirValue>(
    key: &str,
    value: Option<&Value>,
    sidecar: Option<&Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<Vec<T>, DecodeError> {
    let values = as_array(key, value, ctx)?;
    let sidecars = as_array(&format!("_{}", key), sidecar, ctx)?;

    let len = match (values, sidecars) {
        (Some(v), Some(s)) if v.len() != s.len() => {
            return Err(ctx.error(DecodeErrorKind::MalformedStructure(format!(
                "`{key}` has {} entries but `_{key}` has {}",
                v.len(),
                s.len()
            ))));
        }
        (Some(v), _) => v.len(),
        (None, Some(s)) => s.len(),
        (None, None) => return Ok(Vec::new()),
    };

    let mut items = Vec::with_capacity(len);
    for index in 0..len {
        let item_value = values.and_then(|v| v.get(index));
        let item_sidecar = sidecars.and_then(|s| s.get(index));

        ctx.enter_index(index);
        let decoded = T::decode_value(item_value, item_sidecar, ctx).and_then(|item| {
            item.ok_or_else(|| {
                ctx.error(DecodeErrorKind::MalformedStructure(
                    "array entry has neither a value nor an extension".to_string(),
                ))
            })
        });
        ctx.leave_index();

        items.push(decoded?);
    }
    Ok(items)
}
