//! Per-call decode state.

use crate::error::{DecodeError, DecodeErrorKind};
use crate::options::DecodeOptions;
use crate::path::FieldPath;
use crate::registry::ResourceRegistry;
use crate::validation::ValidatorTable;

/// State threaded through one decode call.
///
/// A context borrows the registry, validators and options of the [`Codec`]
/// that created it and owns the current [`FieldPath`]. Contexts are never
/// shared between calls, so decoding is re-entrant.
///
/// [`Codec`]: crate::Codec
pub struct DecodeContext<'a> {
    registry: &'a ResourceRegistry,
    validators: &'a ValidatorTable,
    options: &'a DecodeOptions,
    path: FieldPath,
    /// Schema path of the element being decoded (`Patient.birthDate`).
    element: Option<String>,
}

impl<'a> DecodeContext<'a> {
    pub fn new(
        registry: &'a ResourceRegistry,
        validators: &'a ValidatorTable,
        options: &'a DecodeOptions,
    ) -> Self {
        Self {
            registry,
            validators,
            options,
            path: FieldPath::root(),
            element: None,
        }
    }

    pub fn registry(&self) -> &'a ResourceRegistry {
        self.registry
    }

    pub fn options(&self) -> &'a DecodeOptions {
        self.options
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Schema path of the element currently being decoded, if any.
    pub fn element(&self) -> Option<&str> {
        self.element.as_deref()
    }

    /// Build an error located at the current path.
    pub fn error(&self, kind: DecodeErrorKind) -> DecodeError {
        DecodeError::new(kind, self.path.clone())
    }

    /// Build an error located at a child field of the current path.
    pub fn error_at(&self, field: &str, kind: DecodeErrorKind) -> DecodeError {
        DecodeError::new(kind, self.path.child(field))
    }

    /// Run the caller-supplied validator for the current element, if any.
    pub fn validate_lexical(&self, type_name: &'static str, lexical: &str) -> Result<(), DecodeError> {
        let element = self.element.as_deref().unwrap_or(type_name);
        match self.validators.lookup(element, type_name) {
            Some(validator) if !validator.is_valid(lexical) => {
                Err(self.error(DecodeErrorKind::TypeMismatch {
                    expected: type_name,
                    found: format!("{:?}", lexical),
                }))
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn enter_field(&mut self, owner: &str, key: &str) -> Option<String> {
        self.path.push_field(key);
        self.element.replace(format!("{}.{}", owner, key))
    }

    pub(crate) fn leave_field(&mut self, previous: Option<String>) {
        self.path.pop();
        self.element = previous;
    }

    pub(crate) fn enter_index(&mut self, index: usize) {
        self.path.push_index(index);
    }

    pub(crate) fn leave_index(&mut self) {
        self.path.pop();
    }
}
