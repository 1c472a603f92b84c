//! Caller-supplied lexical validators for primitive values.
//!
//! The codec does not ship FHIR's regular expressions. The hosting application
//! registers a validator per primitive type (`date`, `id`, ...) and, where a
//! single element needs something stricter, per element path
//! (`Patient.birthDate`). Element validators take precedence.

use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("Invalid pattern for `{target}`: {source}")]
    InvalidPattern {
        target: String,
        #[source]
        source: regex::Error,
    },
}

type CheckFn = dyn Fn(&str) -> bool + Send + Sync;

/// A check applied to the lexical form of a primitive value.
#[derive(Clone)]
pub enum Validator {
    /// Regular expression matched against the whole lexical form.
    Pattern(Regex),
    /// Arbitrary predicate.
    Check(Arc<CheckFn>),
}

impl Validator {
    /// Compile a pattern. The pattern is anchored so it must match the whole
    /// value, as FHIR's primitive regexes are.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        let anchored = format!("^(?:{})$", pattern);
        Ok(Validator::Pattern(Regex::new(&anchored)?))
    }

    pub fn check<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Validator::Check(Arc::new(f))
    }

    pub fn is_valid(&self, lexical: &str) -> bool {
        match self {
            Validator::Pattern(re) => re.is_match(lexical),
            Validator::Check(f) => f(lexical),
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Validator::Check(_) => f.write_str("Check(..)"),
        }
    }
}

/// Validators keyed by primitive type name and by element path.
#[derive(Debug, Clone, Default)]
pub struct ValidatorTable {
    by_type: HashMap<String, Validator>,
    by_element: HashMap<String, Validator>,
}

impl ValidatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a validator for every value of a primitive type (e.g. `date`).
    pub fn insert_type(&mut self, type_name: impl Into<String>, validator: Validator) -> &mut Self {
        self.by_type.insert(type_name.into(), validator);
        self
    }

    /// Register a validator for one element (e.g. `Patient.birthDate`).
    pub fn insert_element(&mut self, element: impl Into<String>, validator: Validator) -> &mut Self {
        self.by_element.insert(element.into(), validator);
        self
    }

    /// Builder-style variant of [`insert_type`](Self::insert_type) taking a pattern.
    pub fn with_type_pattern(
        mut self,
        type_name: &str,
        pattern: &str,
    ) -> Result<Self, ValidatorError> {
        let validator = Validator::pattern(pattern).map_err(|source| {
            ValidatorError::InvalidPattern {
                target: type_name.to_string(),
                source,
            }
        })?;
        self.insert_type(type_name, validator);
        Ok(self)
    }

    /// Builder-style variant of [`insert_element`](Self::insert_element) taking a pattern.
    pub fn with_element_pattern(
        mut self,
        element: &str,
        pattern: &str,
    ) -> Result<Self, ValidatorError> {
        let validator = Validator::pattern(pattern).map_err(|source| {
            ValidatorError::InvalidPattern {
                target: element.to_string(),
                source,
            }
        })?;
        self.insert_element(element, validator);
        Ok(self)
    }

    /// Find the validator that applies to `element` holding a `type_name` value.
    pub fn lookup(&self, element: &str, type_name: &str) -> Option<&Validator> {
        self.by_element
            .get(element)
            .or_else(|| self.by_type.get(type_name))
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty() && self.by_element.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_type.len() + self.by_element.len()
    }
}
