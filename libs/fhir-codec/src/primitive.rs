//! Primitive-value cells.
//!
//! A FHIR primitive may carry a value, an [`Element`] (id and extensions)
//! stored under the `_key` sibling, or both. [`Primitive<T>`] models that
//! cell for any [`PrimitiveValue`] `T`.

use crate::context::DecodeContext;
use crate::element::Element;
use crate::error::{json_kind, DecodeError, DecodeErrorKind};
use crate::extension::Extension;
use crate::value::{decode_object, encode_object, Encoded, FhirValue};
use rust_decimal::Decimal;
use serde_json::{Number, Value};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// A FHIR primitive datatype's value space.
pub trait PrimitiveValue: Clone + PartialEq + fmt::Debug {
    /// FHIR type name (`date`, `positiveInt`, ...).
    const TYPE_NAME: &'static str;

    /// Parse from JSON, `None` if the JSON shape is wrong for this type.
    fn from_json(value: &Value) -> Option<Self>;

    fn to_json(&self) -> Value;

    /// Lexical form handed to validators.
    fn lexical(&self) -> Cow<'_, str>;
}

/// A primitive cell: optional value plus optional id/extensions.
///
/// At least one half is present on every decoded cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive<T> {
    pub value: Option<T>,
    pub element: Option<Element>,
}

impl<T> Default for Primitive<T> {
    fn default() -> Self {
        Self {
            value: None,
            element: None,
        }
    }
}

impl<T> Primitive<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Some(value),
            element: None,
        }
    }

    /// A cell with no value, only extensions (e.g. a data-absent-reason).
    pub fn extension_only(extension: Vec<Extension>) -> Self {
        Self {
            value: None,
            element: Some(Element {
                id: None,
                extension,
            }),
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn id(&self) -> Option<&str> {
        self.element.as_ref().and_then(|e| e.id.as_deref())
    }

    pub fn extensions(&self) -> &[Extension] {
        self.element
            .as_ref()
            .map(|e| e.extension.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.element.as_ref().map_or(true, Element::is_empty)
    }
}

impl<T: AsRef<str>> Primitive<T> {
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_ref().map(AsRef::as_ref)
    }
}

impl<T> From<T> for Primitive<T> {
    fn from(value: T) -> Self {
        Primitive::new(value)
    }
}

impl From<&str> for Primitive<String> {
    fn from(value: &str) -> Self {
        Primitive::new(value.to_string())
    }
}

impl<T: PrimitiveValue> FhirValue for Primitive<T> {
    fn decode_value(
        value: Option<&Value>,
        sidecar: Option<&Value>,
        ctx: &mut DecodeContext<'_>,
    ) -> Result<Option<Self>, DecodeError> {
        let value = match value {
            None | Some(Value::Null) => None,
            Some(json) => {
                let parsed = T::from_json(json).ok_or_else(|| {
                    ctx.error(DecodeErrorKind::TypeMismatch {
                        expected: T::TYPE_NAME,
                        found: describe(json),
                    })
                })?;
                ctx.validate_lexical(T::TYPE_NAME, &parsed.lexical())?;
                Some(parsed)
            }
        };

        let element = match sidecar {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => {
                if let Some(key) = map
                    .iter()
                    .find(|(key, value)| !SIDECAR_KEYS.contains(&key.as_str()) && !value.is_null())
                    .map(|(key, _)| key)
                {
                    return Err(ctx.error(DecodeErrorKind::MalformedStructure(format!(
                        "`_` sibling may only hold `id` and `extension`, found `{}`",
                        key
                    ))));
                }
                let element: Element = decode_object(map, ctx)?;
                (!element.is_empty()).then_some(element)
            }
            Some(other) => {
                return Err(ctx.error(DecodeErrorKind::MalformedStructure(format!(
                    "`_` sibling must be an object, found {}",
                    json_kind(other)
                ))));
            }
        };

        if value.is_none() && element.is_none() {
            return Ok(None);
        }
        Ok(Some(Primitive { value, element }))
    }

    fn encode_value(&self) -> Encoded {
        Encoded {
            value: self.value.as_ref().map(PrimitiveValue::to_json),
            sidecar: self
                .element
                .as_ref()
                .filter(|e| !e.is_empty())
                .map(|e| Value::Object(encode_object(e))),
        }
    }
}

/// Keys allowed in a primitive's `_key` sibling.
const SIDECAR_KEYS: [&str; 2] = ["id", "extension"];

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{:?}", s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => json_kind(other).to_string(),
    }
}

impl PrimitiveValue for String {
    const TYPE_NAME: &'static str = "string";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }

    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }

    fn lexical(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl PrimitiveValue for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn to_json(&self) -> Value {
        Value::Bool(*self)
    }

    fn lexical(&self) -> Cow<'_, str> {
        Cow::Borrowed(if *self { "true" } else { "false" })
    }
}

impl PrimitiveValue for i32 {
    const TYPE_NAME: &'static str = "integer";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_i64().and_then(|n| i32::try_from(n).ok())
    }

    fn to_json(&self) -> Value {
        Value::from(*self)
    }

    fn lexical(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }
}

impl PrimitiveValue for Decimal {
    const TYPE_NAME: &'static str = "decimal";

    /// Parsed from the number's source text, so scale and precision survive.
    fn from_json(value: &Value) -> Option<Self> {
        let Value::Number(n) = value else {
            return None;
        };
        let text = n.to_string();
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .ok()
    }

    fn to_json(&self) -> Value {
        match Number::from_str(&self.to_string()) {
            Ok(n) => Value::Number(n),
            Err(err) => {
                tracing::warn!(decimal = %self, error = %err, "decimal has no JSON number form");
                Value::Null
            }
        }
    }

    fn lexical(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }
}

macro_rules! unsigned_primitive {
    ($(#[$meta:meta])* $name:ident, $type_name:literal, $min:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            pub const MIN: u32 = $min;
            pub const MAX: u32 = i32::MAX as u32;

            /// `None` when `value` is outside the type's range.
            pub fn new(value: u32) -> Option<Self> {
                (Self::MIN..=Self::MAX).contains(&value).then_some($name(value))
            }

            pub fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl PrimitiveValue for $name {
            const TYPE_NAME: &'static str = $type_name;

            fn from_json(value: &Value) -> Option<Self> {
                value
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .and_then($name::new)
            }

            fn to_json(&self) -> Value {
                Value::from(self.0)
            }

            fn lexical(&self) -> Cow<'_, str> {
                Cow::Owned(self.0.to_string())
            }
        }
    };
}

unsigned_primitive!(
    /// `unsignedInt`: 0 ..= 2^31-1.
    UnsignedInt,
    "unsignedInt",
    0
);
unsigned_primitive!(
    /// `positiveInt`: 1 ..= 2^31-1.
    PositiveInt,
    "positiveInt",
    1
);

macro_rules! string_primitive {
    ($($(#[$meta:meta])* $name:ident => $type_name:literal),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
            pub struct $name(String);

            impl $name {
                pub fn new(value: impl Into<String>) -> Self {
                    $name(value.into())
                }

                pub fn as_str(&self) -> &str {
                    &self.0
                }

                pub fn into_inner(self) -> String {
                    self.0
                }
            }

            impl AsRef<str> for $name {
                fn as_ref(&self) -> &str {
                    &self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl From<&str> for $name {
                fn from(value: &str) -> Self {
                    $name(value.to_string())
                }
            }

            impl From<String> for $name {
                fn from(value: String) -> Self {
                    $name(value)
                }
            }

            impl From<&str> for Primitive<$name> {
                fn from(value: &str) -> Self {
                    Primitive::new($name::from(value))
                }
            }

            impl PartialEq<str> for $name {
                fn eq(&self, other: &str) -> bool {
                    self.0 == other
                }
            }

            impl PartialEq<&str> for $name {
                fn eq(&self, other: &&str) -> bool {
                    self.0 == *other
                }
            }

            impl PrimitiveValue for $name {
                const TYPE_NAME: &'static str = $type_name;

                fn from_json(value: &Value) -> Option<Self> {
                    value.as_str().map($name::from)
                }

                fn to_json(&self) -> Value {
                    Value::String(self.0.clone())
                }

                fn lexical(&self) -> Cow<'_, str> {
                    Cow::Borrowed(&self.0)
                }
            }
        )+
    };
}

string_primitive! {
    /// Value taken from a set of controlled strings.
    Code => "code",
    /// Logical id of a resource (`[A-Za-z0-9\-\.]{1,64}`).
    Id => "id",
    Uri => "uri",
    Url => "url",
    Canonical => "canonical",
    Oid => "oid",
    Uuid => "uuid",
    Markdown => "markdown",
    Base64Binary => "base64Binary",
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    Date => "date",
    DateTime => "dateTime",
    Instant => "instant",
    Time => "time",
    /// Limited XHTML content of a narrative.
    Xhtml => "xhtml",
}

/// Implements [`PrimitiveValue`] for a serde enum whose variants are the
/// codes of a required value set.
#[macro_export]
macro_rules! code_primitive {
    ($($name:ty),+ $(,)?) => {
        $(
            impl $crate::PrimitiveValue for $name {
                const TYPE_NAME: &'static str = "code";

                fn from_json(value: &$crate::__private::Value) -> Option<Self> {
                    $crate::__private::serde_json::from_value(value.clone()).ok()
                }

                fn to_json(&self) -> $crate::__private::Value {
                    match $crate::__private::serde_json::to_value(self) {
                        Ok(value @ $crate::__private::Value::String(_)) => value,
                        other => {
                            $crate::__private::tracing::warn!(
                                code = ?self,
                                result = ?other,
                                "code does not serialize to a string"
                            );
                            $crate::__private::Value::Null
                        }
                    }
                }

                fn lexical(&self) -> ::std::borrow::Cow<'_, str> {
                    match self.to_json() {
                        $crate::__private::Value::String(code) => ::std::borrow::Cow::Owned(code),
                        _ => ::std::borrow::Cow::Borrowed(""),
                    }
                }
            }
        )+
    };
}
