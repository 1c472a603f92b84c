//! FHIR Organization model

use ferrum_codec::{
    fhir_backbone, fhir_resource, Address, CodeableConcept, ContactPoint, HumanName, Identifier,
    Primitive, Reference,
};

fhir_backbone! {
    /// Contact for the organization for a certain purpose
    pub struct OrganizationContact: "Organization.contact" {
        purpose: Option<CodeableConcept> => opt("purpose"),
        name: Option<HumanName> => opt("name"),
        telecom: Vec<ContactPoint> => list("telecom"),
        address: Option<Address> => opt("address"),
    }
}

fhir_resource! {
    /// FHIR Organization resource
    pub struct Organization: domain "Organization" {
        identifier: Vec<Identifier> => list("identifier"),
        active: Option<Primitive<bool>> => opt("active"),
        type_: Vec<CodeableConcept> => list("type"),
        name: Option<Primitive<String>> => opt("name"),
        alias: Vec<Primitive<String>> => list("alias"),
        telecom: Vec<ContactPoint> => list("telecom"),
        address: Vec<Address> => list("address"),
        part_of: Option<Reference> => opt("partOf"),
        contact: Vec<OrganizationContact> => list("contact"),
        endpoint: Vec<Reference> => list("endpoint"),
    }
}

impl Organization {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(Primitive::from(name)),
            ..Default::default()
        }
    }
}
