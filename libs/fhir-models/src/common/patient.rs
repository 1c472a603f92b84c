//! FHIR Patient model

use super::codes::{AdministrativeGender, LinkType};
use ferrum_codec::{
    fhir_backbone, fhir_choice, fhir_resource, Address, Attachment, CodeableConcept, ContactPoint,
    Date, DateTime, HumanName, Identifier, Period, Primitive, Reference,
};

fhir_choice! {
    /// Whether and when the patient died.
    pub enum PatientDeceased {
        Boolean(Primitive<bool>) = "Boolean",
        DateTime(Primitive<DateTime>) = "DateTime",
    }
}

fhir_choice! {
    /// Whether the patient is part of a multiple birth, or their birth order.
    pub enum PatientMultipleBirth {
        Boolean(Primitive<bool>) = "Boolean",
        Integer(Primitive<i32>) = "Integer",
    }
}

fhir_backbone! {
    /// A contact party (e.g. guardian, partner, friend) for the patient
    pub struct PatientContact: "Patient.contact" {
        relationship: Vec<CodeableConcept> => list("relationship"),
        name: Option<HumanName> => opt("name"),
        telecom: Vec<ContactPoint> => list("telecom"),
        address: Option<Address> => opt("address"),
        gender: Option<Primitive<AdministrativeGender>> => opt("gender"),
        organization: Option<Reference> => opt("organization"),
        period: Option<Period> => opt("period"),
    }
}

fhir_backbone! {
    /// A language which may be used to communicate with the patient
    pub struct PatientCommunication: "Patient.communication" {
        language: CodeableConcept => required("language"),
        preferred: Option<Primitive<bool>> => opt("preferred"),
    }
}

fhir_backbone! {
    /// Link to another patient resource that concerns the same actual person
    pub struct PatientLink: "Patient.link" {
        other: Reference => required("other"),
        type_: Primitive<LinkType> => required("type"),
    }
}

fhir_resource! {
    /// FHIR Patient resource
    ///
    /// Demographics and other administrative information about an individual
    /// receiving care or other health-related services.
    pub struct Patient: domain "Patient" {
        identifier: Vec<Identifier> => list("identifier"),
        active: Option<Primitive<bool>> => opt("active"),
        name: Vec<HumanName> => list("name"),
        telecom: Vec<ContactPoint> => list("telecom"),
        gender: Option<Primitive<AdministrativeGender>> => opt("gender"),
        birth_date: Option<Primitive<Date>> => opt("birthDate"),
        deceased: Option<PatientDeceased> => choice("deceased"),
        address: Vec<Address> => list("address"),
        marital_status: Option<CodeableConcept> => opt("maritalStatus"),
        multiple_birth: Option<PatientMultipleBirth> => choice("multipleBirth"),
        photo: Vec<Attachment> => list("photo"),
        contact: Vec<PatientContact> => list("contact"),
        communication: Vec<PatientCommunication> => list("communication"),
        general_practitioner: Vec<Reference> => list("generalPractitioner"),
        managing_organization: Option<Reference> => opt("managingOrganization"),
        link: Vec<PatientLink> => list("link"),
    }
}

impl Patient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: &str) -> Self {
        let mut patient = Self::default();
        patient.domain.resource.set_id(Some(id.to_string()));
        patient
    }

    pub fn is_active(&self) -> Option<bool> {
        self.active.as_ref().and_then(|a| a.value)
    }

    pub fn is_deceased(&self) -> bool {
        match &self.deceased {
            Some(PatientDeceased::Boolean(flag)) => flag.value.unwrap_or(false),
            Some(PatientDeceased::DateTime(_)) => true,
            None => false,
        }
    }

    /// Family name of the first name entry.
    pub fn family_name(&self) -> Option<&str> {
        self.name
            .iter()
            .find_map(|n| n.family.as_ref().and_then(Primitive::as_str))
    }
}
