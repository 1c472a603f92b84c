//! Error types for the FHIR codec

use crate::path::FieldPath;
use thiserror::Error;

/// What went wrong while decoding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeErrorKind {
    #[error("value does not match the lexical form of `{expected}` (found {found})")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("more than one variant of choice `{field}` is populated: {keys:?}")]
    AmbiguousChoice { field: String, keys: Vec<String> },

    #[error("required choice `{field}` has no populated variant")]
    MissingRequiredChoice { field: String },

    #[error("extension `{url}` carries both a value and nested extensions")]
    ConflictingExtensionShape { url: String },

    #[error("expected resource type `{expected}`, found `{found}`")]
    ResourceTypeMismatch { expected: String, found: String },

    #[error("unknown resource type `{0}`")]
    UnknownResourceType(String),

    #[error("malformed structure: {0}")]
    MalformedStructure(String),

    #[error("missing required field `{0}`")]
    MissingRequiredField(String),

    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("modifier extension `{0}` is not understood")]
    UnrecognizedModifierExtension(String),
}

/// A decode failure annotated with the path at which it happened.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at `{path}`")]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    pub path: FieldPath,
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind, path: FieldPath) -> Self {
        Self { kind, path }
    }

    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }
}

/// Errors surfaced by the codec driver.
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Resource registry has not been initialized")]
    RegistryNotInitialized,
}

impl Error {
    /// The decode failure, if this error is one.
    pub fn as_decode(&self) -> Option<&DecodeError> {
        match self {
            Error::Decode(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Human readable name of a JSON value's shape, used in diagnostics.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_path() {
        let mut path = FieldPath::root();
        path.push_field("contained");
        path.push_index(0);

        let err = DecodeError::new(
            DecodeErrorKind::UnknownResourceType("NotARealType".into()),
            path,
        );
        assert_eq!(
            err.to_string(),
            "unknown resource type `NotARealType` at `contained[0]`"
        );
    }

    #[test]
    fn driver_error_exposes_decode_error() {
        let err: Error = DecodeError::new(
            DecodeErrorKind::MissingRequiredField("url".into()),
            FieldPath::root(),
        )
        .into();
        assert!(matches!(
            err.as_decode().map(DecodeError::kind),
            Some(DecodeErrorKind::MissingRequiredField(_))
        ));
    }
}
