//! FHIR Medication model

use super::codes::MedicationStatus;
use ferrum_codec::{
    fhir_backbone, fhir_choice, fhir_resource, CodeableConcept, DateTime, Identifier, Primitive,
    Ratio, Reference,
};

fhir_choice! {
    /// The actual ingredient or content
    pub enum MedicationIngredientItem {
        CodeableConcept(CodeableConcept) = "CodeableConcept",
        Reference(Reference) = "Reference",
    }
}

fhir_backbone! {
    /// Active or inactive ingredient
    pub struct MedicationIngredient: "Medication.ingredient" {
        item: Option<MedicationIngredientItem> => required_choice("item"),
        is_active: Option<Primitive<bool>> => opt("isActive"),
        strength: Option<Ratio> => opt("strength"),
    }
}

fhir_backbone! {
    /// Details about packaged medications
    pub struct MedicationBatch: "Medication.batch" {
        lot_number: Option<Primitive<String>> => opt("lotNumber"),
        expiration_date: Option<Primitive<DateTime>> => opt("expirationDate"),
    }
}

fhir_resource! {
    /// FHIR Medication resource
    pub struct Medication: domain "Medication" {
        identifier: Vec<Identifier> => list("identifier"),
        code: Option<CodeableConcept> => opt("code"),
        status: Option<Primitive<MedicationStatus>> => opt("status"),
        manufacturer: Option<Reference> => opt("manufacturer"),
        form: Option<CodeableConcept> => opt("form"),
        amount: Option<Ratio> => opt("amount"),
        ingredient: Vec<MedicationIngredient> => list("ingredient"),
        batch: Option<MedicationBatch> => opt("batch"),
    }
}

impl MedicationIngredient {
    pub fn new(item: MedicationIngredientItem) -> Self {
        Self {
            item: Some(item),
            ..Default::default()
        }
    }
}

impl Medication {
    /// Display text of the medication code, falling back to the first
    /// coding's display.
    pub fn display(&self) -> Option<&str> {
        let code = self.code.as_ref()?;
        code.text.as_ref().and_then(Primitive::as_str).or_else(|| {
            code.coding
                .iter()
                .find_map(|c| c.display.as_ref().and_then(Primitive::as_str))
        })
    }
}
