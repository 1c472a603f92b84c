//! Validators, decode policies and concurrent use of one codec

use std::thread;

use ferrum_codec::{
    Codec, DecodeErrorKind, DecodeOptions, HasModifierExtensions, ModifierExtensionPolicy,
    Primitive, UnknownFieldPolicy, Validator, ValidatorTable,
};
use ferrum_models::{Observation, ObservationStatus, Patient};
use serde_json::json;

mod test_support;

const DATE_PATTERN: &str =
    r"([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)(-(0[1-9]|1[0-2])(-(0[1-9]|[1-2][0-9]|3[0-1]))?)?";

fn date_validators() -> ValidatorTable {
    ValidatorTable::new()
        .with_type_pattern("date", DATE_PATTERN)
        .unwrap()
}

#[test]
fn type_validator_rejects_invalid_lexical_form() {
    let codec = Codec::new(test_support::registry()).with_validators(date_validators());

    let err = codec
        .decode_value_as::<Patient>(&json!({"resourceType": "Patient", "birthDate": "1974-13"}))
        .unwrap_err();
    assert_eq!(
        err.kind(),
        &DecodeErrorKind::TypeMismatch {
            expected: "date",
            found: "\"1974-13\"".to_string()
        }
    );
    assert_eq!(err.path().to_string(), "birthDate");

    let ok: Patient = codec
        .decode_value_as(&json!({"resourceType": "Patient", "birthDate": "1974-12"}))
        .unwrap();
    assert_eq!(ok.birth_date.as_ref().and_then(Primitive::as_str), Some("1974-12"));
}

#[test]
fn element_validator_takes_precedence() {
    let validators = date_validators()
        .with_element_pattern("Patient.birthDate", r"[0-9]{4}-[0-9]{2}-[0-9]{2}")
        .unwrap();
    let codec = Codec::new(test_support::registry()).with_validators(validators);

    // Valid for `date` but not for the stricter element rule.
    let err = codec
        .decode_value_as::<Patient>(&json!({"resourceType": "Patient", "birthDate": "1974"}))
        .unwrap_err();
    assert!(matches!(err.kind(), DecodeErrorKind::TypeMismatch { expected: "date", .. }));

    let patient: Patient = codec
        .decode_value_as(&json!({"resourceType": "Patient", "birthDate": "1974-12-25"}))
        .unwrap();
    assert!(patient.birth_date.is_some());
}

#[test]
fn check_validator_applies_to_list_entries() {
    let mut validators = ValidatorTable::new();
    validators.insert_element("HumanName.given", Validator::check(|s| !s.trim().is_empty()));
    let codec = Codec::new(test_support::registry()).with_validators(validators);

    let err = codec
        .decode_value_as::<Patient>(&json!({
            "resourceType": "Patient",
            "name": [{"given": ["Peter", " "]}]
        }))
        .unwrap_err();
    assert_eq!(err.path().to_string(), "name[0].given[1]");
}

#[test]
fn unknown_fields_are_ignored_by_default() {
    let codec = test_support::codec();
    let patient: Patient = codec
        .decode_value_as(&json!({"resourceType": "Patient", "active": false, "favouriteColour": "blue"}))
        .unwrap();
    assert_eq!(patient.is_active(), Some(false));
    assert_eq!(
        codec.encode_value(&patient),
        json!({"resourceType": "Patient", "active": false})
    );
}

#[test]
fn unknown_fields_can_be_rejected() {
    let codec = Codec::new(test_support::registry())
        .with_options(DecodeOptions::new().with_unknown_fields(UnknownFieldPolicy::Reject));

    let err = codec
        .decode_value_as::<Patient>(&json!({
            "resourceType": "Patient",
            "name": [{"family": "Chalmers", "nickname": "Pete"}]
        }))
        .unwrap_err();
    assert_eq!(
        err.kind(),
        &DecodeErrorKind::UnknownField("nickname".to_string())
    );
    assert_eq!(err.path().to_string(), "name[0]");
}

#[test]
fn null_keys_are_not_unknown_fields() {
    let codec = test_support::strict_codec();
    let patient: Patient = codec
        .decode_value_as(&json!({"resourceType": "Patient", "gender": null, "whatever": null}))
        .unwrap();
    assert!(patient.gender.is_none());
}

#[test]
fn modifier_extensions_are_preserved_by_default() {
    let codec = test_support::codec();
    let input = json!({
        "resourceType": "Patient",
        "modifierExtension": [{"url": "http://example.org/do-not-use", "valueBoolean": true}]
    });
    let patient: Patient = codec.decode_value_as(&input).unwrap();
    assert_eq!(patient.modifier_extensions().len(), 1);
    assert_eq!(codec.encode_value(&patient), input);
}

#[test]
fn unrecognized_modifier_extension_can_be_rejected() {
    let options = DecodeOptions::new()
        .with_modifier_extensions(ModifierExtensionPolicy::RejectUnrecognized)
        .understand_modifier("http://example.org/understood");
    let codec = Codec::new(test_support::registry()).with_options(options);

    let input = json!({
        "resourceType": "Patient",
        "contact": [{
            "modifierExtension": [
                {"url": "http://example.org/understood", "valueBoolean": true},
                {"url": "http://example.org/unknown", "valueBoolean": true}
            ]
        }]
    });
    let err = codec.decode_value_as::<Patient>(&input).unwrap_err();
    assert_eq!(
        err.kind(),
        &DecodeErrorKind::UnrecognizedModifierExtension("http://example.org/unknown".to_string())
    );
    assert_eq!(err.path().to_string(), "contact[0].modifierExtension[1]");
}

#[test]
fn required_field_missing_names_the_field() {
    let codec = test_support::codec();
    let err = codec
        .decode_value_as::<Observation>(&json!({"resourceType": "Observation", "status": "final"}))
        .unwrap_err();
    assert_eq!(
        err.kind(),
        &DecodeErrorKind::MissingRequiredField("code".to_string())
    );
}

#[test]
fn required_choice_missing_is_reported() {
    let codec = test_support::codec();
    let err = codec
        .decode_value_as::<ferrum_models::Medication>(&json!({
            "resourceType": "Medication",
            "ingredient": [{"isActive": true}]
        }))
        .unwrap_err();
    assert_eq!(
        err.kind(),
        &DecodeErrorKind::MissingRequiredChoice {
            field: "item".to_string()
        }
    );
    assert_eq!(err.path().to_string(), "ingredient[0].item[x]");
}

#[test]
fn codes_outside_the_value_set_are_type_mismatches() {
    let codec = test_support::codec();
    let err = codec
        .decode_value_as::<Observation>(&json!({
            "resourceType": "Observation",
            "status": "done",
            "code": {"text": "t"}
        }))
        .unwrap_err();
    assert!(matches!(err.kind(), DecodeErrorKind::TypeMismatch { expected: "code", .. }));
    assert_eq!(err.path().to_string(), "status");
}

#[test]
fn one_codec_decodes_on_many_threads() {
    let codec = test_support::codec();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                scope.spawn(move || {
                    let input = json!({
                        "resourceType": "Observation",
                        "id": format!("obs-{i}"),
                        "status": "final",
                        "code": {"text": "heart rate"},
                        "valueInteger": i
                    });
                    let decoded = codec.decode_value(&input, Some("Observation")).unwrap();
                    assert_eq!(codec.encode_value(&*decoded), input);
                    decoded.downcast::<Observation>().unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let observation = handle.join().unwrap();
            assert_eq!(observation.status(), Some(ObservationStatus::Final));
            assert_eq!(
                ferrum_codec::Resource::id(&observation),
                Some(format!("obs-{i}").as_str())
            );
        }
    });
}
