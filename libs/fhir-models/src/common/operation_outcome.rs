//! FHIR OperationOutcome model

use super::codes::IssueSeverity;
use ferrum_codec::{
    fhir_backbone, fhir_resource, Code, CodeableConcept, DecodeError, DecodeErrorKind, Primitive,
};

fhir_backbone! {
    /// A single issue associated with the action
    pub struct OperationOutcomeIssue: "OperationOutcome.issue" {
        severity: Primitive<IssueSeverity> => required("severity"),
        code: Primitive<Code> => required("code"),
        details: Option<CodeableConcept> => opt("details"),
        diagnostics: Option<Primitive<String>> => opt("diagnostics"),
        location: Vec<Primitive<String>> => list("location"),
        expression: Vec<Primitive<String>> => list("expression"),
    }
}

fhir_resource! {
    /// FHIR OperationOutcome resource
    ///
    /// A collection of error, warning, or information messages that result
    /// from a system action.
    pub struct OperationOutcome: domain "OperationOutcome" {
        issue: Vec<OperationOutcomeIssue> => list("issue"),
    }
}

impl OperationOutcomeIssue {
    pub fn new(severity: IssueSeverity, code: &str, diagnostics: impl Into<String>) -> Self {
        Self {
            severity: Primitive::new(severity),
            code: Primitive::from(code),
            diagnostics: Some(Primitive::new(diagnostics.into())),
            ..Default::default()
        }
    }

    pub fn severity(&self) -> Option<IssueSeverity> {
        self.severity.value
    }
}

impl OperationOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a decode failure as a single `error` issue whose expression
    /// is the failing path.
    pub fn from_decode_error(err: &DecodeError) -> Self {
        let code = match err.kind() {
            DecodeErrorKind::TypeMismatch { .. } => "value",
            DecodeErrorKind::MissingRequiredField(_)
            | DecodeErrorKind::MissingRequiredChoice { .. } => "required",
            DecodeErrorKind::UnknownResourceType(_) => "not-supported",
            DecodeErrorKind::UnrecognizedModifierExtension(_) => "extension",
            _ => "structure",
        };

        let mut issue = OperationOutcomeIssue::new(IssueSeverity::Error, code, err.kind().to_string());
        if !err.path().is_root() {
            issue.expression.push(Primitive::new(err.path().to_string()));
        }

        Self {
            issue: vec![issue],
            ..Default::default()
        }
    }

    pub fn add_issue(&mut self, issue: OperationOutcomeIssue) {
        self.issue.push(issue);
    }

    /// Whether any issue is `error` or `fatal`.
    pub fn has_errors(&self) -> bool {
        self.issue
            .iter()
            .filter_map(OperationOutcomeIssue::severity)
            .any(|s| s <= IssueSeverity::Error)
    }
}
