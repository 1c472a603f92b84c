//! FHIR Observation model

use super::codes::ObservationStatus;
use ferrum_codec::{
    fhir_backbone, fhir_choice, fhir_resource, Annotation, CodeableConcept, DateTime, Identifier,
    Instant, Period, Primitive, Quantity, Range, Ratio, Reference, SampledData, Time, Timing,
};

fhir_choice! {
    /// Clinically relevant time/time-period for an observation
    pub enum ObservationEffective {
        DateTime(Primitive<DateTime>) = "DateTime",
        Period(Period) = "Period",
        Timing(Timing) = "Timing",
        Instant(Primitive<Instant>) = "Instant",
    }
}

fhir_choice! {
    /// Actual result of an observation or one of its components
    pub enum ObservationValue {
        Quantity(Quantity) = "Quantity",
        CodeableConcept(CodeableConcept) = "CodeableConcept",
        String(Primitive<String>) = "String",
        Boolean(Primitive<bool>) = "Boolean",
        Integer(Primitive<i32>) = "Integer",
        Range(Range) = "Range",
        Ratio(Ratio) = "Ratio",
        SampledData(SampledData) = "SampledData",
        Time(Primitive<Time>) = "Time",
        DateTime(Primitive<DateTime>) = "DateTime",
        Period(Period) = "Period",
    }
}

impl ObservationValue {
    pub fn as_quantity(&self) -> Option<&Quantity> {
        match self {
            ObservationValue::Quantity(q) => Some(q),
            _ => None,
        }
    }
}

fhir_backbone! {
    /// Provides guide for interpretation
    pub struct ObservationReferenceRange: "Observation.referenceRange" {
        low: Option<Quantity> => opt("low"),
        high: Option<Quantity> => opt("high"),
        type_: Option<CodeableConcept> => opt("type"),
        applies_to: Vec<CodeableConcept> => list("appliesTo"),
        age: Option<Range> => opt("age"),
        text: Option<Primitive<String>> => opt("text"),
    }
}

fhir_backbone! {
    /// Component results
    pub struct ObservationComponent: "Observation.component" {
        code: CodeableConcept => required("code"),
        value: Option<ObservationValue> => choice("value"),
        data_absent_reason: Option<CodeableConcept> => opt("dataAbsentReason"),
        interpretation: Vec<CodeableConcept> => list("interpretation"),
        reference_range: Vec<ObservationReferenceRange> => list("referenceRange"),
    }
}

fhir_resource! {
    /// FHIR Observation resource
    ///
    /// Measurements and simple assertions made about a patient, device or
    /// other subject.
    pub struct Observation: domain "Observation" {
        identifier: Vec<Identifier> => list("identifier"),
        based_on: Vec<Reference> => list("basedOn"),
        part_of: Vec<Reference> => list("partOf"),
        status: Primitive<ObservationStatus> => required("status"),
        category: Vec<CodeableConcept> => list("category"),
        code: CodeableConcept => required("code"),
        subject: Option<Reference> => opt("subject"),
        focus: Vec<Reference> => list("focus"),
        encounter: Option<Reference> => opt("encounter"),
        effective: Option<ObservationEffective> => choice("effective"),
        issued: Option<Primitive<Instant>> => opt("issued"),
        performer: Vec<Reference> => list("performer"),
        value: Option<ObservationValue> => choice("value"),
        data_absent_reason: Option<CodeableConcept> => opt("dataAbsentReason"),
        interpretation: Vec<CodeableConcept> => list("interpretation"),
        note: Vec<Annotation> => list("note"),
        body_site: Option<CodeableConcept> => opt("bodySite"),
        method: Option<CodeableConcept> => opt("method"),
        specimen: Option<Reference> => opt("specimen"),
        device: Option<Reference> => opt("device"),
        reference_range: Vec<ObservationReferenceRange> => list("referenceRange"),
        has_member: Vec<Reference> => list("hasMember"),
        derived_from: Vec<Reference> => list("derivedFrom"),
        component: Vec<ObservationComponent> => list("component"),
    }
}

impl Observation {
    /// A new observation with the two required fields set.
    pub fn new(status: ObservationStatus, code: CodeableConcept) -> Self {
        Self {
            status: Primitive::new(status),
            code,
            ..Default::default()
        }
    }

    pub fn status(&self) -> Option<ObservationStatus> {
        self.status.value
    }

    /// Component whose code carries `system|code`.
    pub fn component(&self, system: &str, code: &str) -> Option<&ObservationComponent> {
        self.component
            .iter()
            .find(|c| c.code.has_coding(system, code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrum_codec::{Coding, Decimal};

    const LOINC: &str = "http://loinc.org";

    #[test]
    fn new_sets_required_fields() {
        let obs = Observation::new(
            ObservationStatus::Final,
            CodeableConcept::from_coding(Coding::new(LOINC, "29463-7")),
        );
        assert_eq!(obs.status(), Some(ObservationStatus::Final));
        assert!(obs.code.has_coding(LOINC, "29463-7"));
        assert!(obs.value.is_none());
    }

    #[test]
    fn component_lookup_by_code() {
        let mut obs = Observation::new(
            ObservationStatus::Final,
            CodeableConcept::from_coding(Coding::new(LOINC, "85354-9")),
        );
        obs.component.push(ObservationComponent {
            code: CodeableConcept::from_coding(Coding::new(LOINC, "8480-6")),
            value: Some(ObservationValue::Quantity(Quantity::ucum(
                Decimal::new(107, 0),
                "mm[Hg]",
            ))),
            ..Default::default()
        });

        let systolic = obs.component(LOINC, "8480-6").unwrap();
        let value = systolic.value.as_ref().and_then(ObservationValue::as_quantity).unwrap();
        assert_eq!(value.value.as_ref().and_then(|v| v.value), Some(Decimal::new(107, 0)));
        assert!(obs.component(LOINC, "8462-4").is_none());
    }
}
