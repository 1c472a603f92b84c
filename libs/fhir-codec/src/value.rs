//! Traits connecting Rust types to their FHIR JSON shape.

use crate::context::DecodeContext;
use crate::error::{json_kind, DecodeError, DecodeErrorKind};
use crate::reader::ObjectReader;
use crate::writer::ObjectWriter;
use serde_json::{Map, Value};

/// The two wire positions a value may occupy: its own key and the `_key`
/// sibling. Only primitives ever produce a sibling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Encoded {
    pub value: Option<Value>,
    pub sidecar: Option<Value>,
}

impl Encoded {
    pub fn value(value: Value) -> Self {
        Self {
            value: Some(value),
            sidecar: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.sidecar.is_none()
    }
}

/// Anything that can sit under a key of a FHIR JSON object.
pub trait FhirValue: Sized {
    /// Decode from the value stored under a key and its `_key` sibling.
    ///
    /// Returns `Ok(None)` when both positions are absent (or `null`).
    fn decode_value(
        value: Option<&Value>,
        sidecar: Option<&Value>,
        ctx: &mut DecodeContext<'_>,
    ) -> Result<Option<Self>, DecodeError>;

    fn encode_value(&self) -> Encoded;
}

/// A type encoded as a JSON object whose keys are its fields.
pub trait FhirComplex: Sized {
    /// FHIR type name, or the element path for backbone elements
    /// (`Patient.contact`). Used to build validator lookup keys.
    const TYPE_NAME: &'static str;

    fn decode_fields(reader: &mut ObjectReader<'_, '_, '_>) -> Result<Self, DecodeError>;

    fn encode_fields(&self, writer: &mut ObjectWriter);
}

/// Decode an object into `T`, applying the unknown-field policy afterwards.
pub fn decode_object<T: FhirComplex>(
    map: &Map<String, Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<T, DecodeError> {
    let mut reader = ObjectReader::new(T::TYPE_NAME, map, ctx);
    let decoded = T::decode_fields(&mut reader)?;
    reader.finish()?;
    Ok(decoded)
}

/// Encode `T` into a fresh JSON object.
pub fn encode_object<T: FhirComplex>(value: &T) -> Map<String, Value> {
    let mut writer = ObjectWriter::new();
    value.encode_fields(&mut writer);
    writer.into_map()
}

/// [`FhirValue::decode_value`] for complex types.
///
/// An empty object decodes as absent, mirroring the encoder which never
/// emits `{}`.
pub fn decode_complex<T: FhirComplex>(
    value: Option<&Value>,
    sidecar: Option<&Value>,
    ctx: &mut DecodeContext<'_>,
) -> Result<Option<T>, DecodeError> {
    if sidecar.is_some_and(|s| !s.is_null()) {
        return Err(ctx.error(DecodeErrorKind::MalformedStructure(format!(
            "`{}` is not a primitive and cannot have a `_` sibling",
            T::TYPE_NAME
        ))));
    }

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(Value::Object(map)) => decode_object(map, ctx).map(Some),
        Some(other) => Err(ctx.error(DecodeErrorKind::MalformedStructure(format!(
            "expected an object for `{}`, found {}",
            T::TYPE_NAME,
            json_kind(other)
        )))),
    }
}

/// [`FhirValue::encode_value`] for complex types.
pub fn encode_complex<T: FhirComplex>(value: &T) -> Encoded {
    let map = encode_object(value);
    if map.is_empty() {
        Encoded::default()
    } else {
        Encoded::value(Value::Object(map))
    }
}

impl<T: FhirValue> FhirValue for Box<T> {
    fn decode_value(
        value: Option<&Value>,
        sidecar: Option<&Value>,
        ctx: &mut DecodeContext<'_>,
    ) -> Result<Option<Self>, DecodeError> {
        Ok(T::decode_value(value, sidecar, ctx)?.map(Box::new))
    }

    fn encode_value(&self) -> Encoded {
        (**self).encode_value()
    }
}
