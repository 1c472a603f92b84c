//! End-to-end decode/encode scenarios over the resource catalog

use ferrum_codec::{
    AnyResource, DataValue, DecodeErrorKind, Decimal, ExtensionContent, HasExtensions, Primitive,
    Resource,
};
use ferrum_models::{
    Bundle, Medication, Observation, ObservationValue, OperationOutcome, Organization, Parameters,
    Patient,
};
use serde_json::json;

mod test_support;

#[test]
fn primitive_sidecar_is_attached_to_its_field() {
    let codec = test_support::codec();
    let input = json!({"resourceType": "Patient", "active": true, "_active": {"id": "a1"}});

    let patient: Patient = codec.decode_value_as(&input).unwrap();
    let active = patient.active.as_ref().unwrap();
    assert_eq!(active.value, Some(true));
    assert_eq!(active.id(), Some("a1"));
    assert!(active.extensions().is_empty());

    assert_eq!(codec.encode_value(&patient), input);
}

#[test]
fn observation_value_quantity_decodes_to_its_variant() {
    let codec = test_support::codec();
    let observation: Observation = codec
        .decode_value_as(&json!({
            "resourceType": "Observation",
            "status": "final",
            "code": {"text": "dose"},
            "valueQuantity": {"value": 5, "unit": "mg"}
        }))
        .unwrap();

    let quantity = observation
        .value
        .as_ref()
        .and_then(ObservationValue::as_quantity)
        .unwrap();
    assert_eq!(quantity.value.as_ref().and_then(|v| v.value), Some(Decimal::from(5)));
    assert_eq!(quantity.unit.as_ref().and_then(Primitive::as_str), Some("mg"));
}

#[test]
fn two_populated_variants_are_ambiguous() {
    let codec = test_support::codec();
    let err = codec
        .decode_value_as::<Observation>(&json!({
            "resourceType": "Observation",
            "status": "final",
            "code": {"text": "dose"},
            "valueQuantity": {"value": 5, "unit": "mg"},
            "valueString": "five milligrams"
        }))
        .unwrap_err();

    match err.kind() {
        DecodeErrorKind::AmbiguousChoice { field, keys } => {
            assert_eq!(field, "value");
            assert_eq!(keys, &["valueQuantity", "valueString"]);
        }
        other => panic!("expected AmbiguousChoice, got {other:?}"),
    }
    assert_eq!(err.path().to_string(), "value[x]");
}

#[test]
fn sidecar_alone_counts_as_a_populated_variant() {
    let codec = test_support::codec();
    let err = codec
        .decode_value_as::<Patient>(&json!({
            "resourceType": "Patient",
            "deceasedBoolean": true,
            "_deceasedDateTime": {"id": "d1"}
        }))
        .unwrap_err();
    assert!(matches!(err.kind(), DecodeErrorKind::AmbiguousChoice { .. }));
}

#[test]
fn bundle_entries_resolve_to_concrete_types() {
    let codec = test_support::codec();
    let resource = codec
        .decode_value(
            &json!({
                "resourceType": "Bundle",
                "type": "collection",
                "entry": [
                    {"resource": {"resourceType": "Patient", "id": "p1", "gender": "female"}},
                    {"resource": {
                        "resourceType": "Observation",
                        "id": "o1",
                        "status": "preliminary",
                        "code": {"text": "weight"}
                    }}
                ]
            }),
            Some("Bundle"),
        )
        .unwrap();

    let bundle = resource.downcast_ref::<Bundle>().unwrap();
    let resources: Vec<&AnyResource> = bundle.resources().collect();
    assert_eq!(resources.len(), 2);
    assert!(resources[0].is::<Patient>());
    assert!(resources[1].is::<Observation>());
    assert_eq!(resources[1].id(), Some("o1"));
}

#[test]
fn contained_resources_expose_their_ids() {
    let codec = test_support::codec();
    let medication: Medication = codec
        .decode_value_as(&json!({
            "resourceType": "Medication",
            "contained": [{"resourceType": "Organization", "id": "org1", "name": "Acme"}],
            "manufacturer": {"reference": "#org1"}
        }))
        .unwrap();

    let local = medication
        .manufacturer
        .as_ref()
        .and_then(|r| r.local_id())
        .unwrap();
    let organization = medication
        .contained()
        .iter()
        .find(|r| r.id() == Some(local))
        .and_then(|r| r.downcast_ref::<Organization>())
        .unwrap();
    assert_eq!(organization.name.as_ref().and_then(Primitive::as_str), Some("Acme"));
}

#[test]
fn contained_medication_keeps_its_id() {
    let codec = test_support::codec();
    let patient: Patient = codec
        .decode_value_as(&json!({
            "resourceType": "Patient",
            "contained": [{"resourceType": "Medication", "id": "med1"}]
        }))
        .unwrap();

    let contained = patient.domain.find_contained("med1").unwrap();
    assert_eq!(contained.resource_type(), "Medication");
}

#[test]
fn unknown_contained_type_fails_at_its_index() {
    let codec = test_support::codec();
    let err = codec
        .decode_value_as::<Patient>(&json!({
            "resourceType": "Patient",
            "contained": [
                {"resourceType": "Organization", "id": "ok"},
                {"resourceType": "NotARealType", "id": "bad"}
            ]
        }))
        .unwrap_err();

    assert_eq!(
        err.kind(),
        &DecodeErrorKind::UnknownResourceType("NotARealType".to_string())
    );
    assert_eq!(err.path().to_string(), "contained[1]");
}

#[test]
fn unknown_contained_type_can_be_preserved() {
    let codec = test_support::preserving_codec();
    let input = json!({
        "resourceType": "Patient",
        "contained": [
            {"resourceType": "Organization", "id": "ok"},
            {"resourceType": "NotARealType", "id": "bad", "anything": [1, 2, 3]}
        ]
    });
    let patient: Patient = codec.decode_value_as(&input).unwrap();

    let contained = patient.contained();
    assert!(contained[0].is::<Organization>());
    assert_eq!(contained[1].resource_type(), "NotARealType");
    assert_eq!(contained[1].id(), Some("bad"));

    assert_eq!(codec.encode_value(&patient), input);
}

#[test]
fn extension_with_value_and_children_is_rejected() {
    let codec = test_support::codec();
    let err = codec
        .decode_value_as::<Patient>(&json!({
            "resourceType": "Patient",
            "extension": [{
                "url": "http://example.org/ext",
                "valueString": "x",
                "extension": [{"url": "child", "valueBoolean": true}]
            }]
        }))
        .unwrap_err();

    assert_eq!(
        err.kind(),
        &DecodeErrorKind::ConflictingExtensionShape {
            url: "http://example.org/ext".to_string()
        }
    );
    assert_eq!(err.path().to_string(), "extension[0]");
}

#[test]
fn nested_extensions_round_trip() {
    let codec = test_support::codec();
    let input = json!({
        "resourceType": "Patient",
        "extension": [{
            "url": "http://hl7.org/fhir/us/core/StructureDefinition/us-core-race",
            "extension": [
                {"url": "ombCategory", "valueCoding": {"system": "urn:oid:2.16.840.1.113883.6.238", "code": "2106-3"}},
                {"url": "text", "valueString": "White"}
            ]
        }]
    });

    let patient: Patient = codec.decode_value_as(&input).unwrap();
    let race = patient
        .first_extension("http://hl7.org/fhir/us/core/StructureDefinition/us-core-race")
        .unwrap();
    assert!(matches!(race.content, Some(ExtensionContent::Nested(_))));
    let text = race.nested_by_url("text");
    assert_eq!(text[0].value().and_then(DataValue::as_str), Some("White"));

    assert_eq!(codec.encode_value(&patient), input);
}

#[test]
fn extension_only_primitive_omits_the_bare_key() {
    let codec = test_support::codec();
    let input = json!({
        "resourceType": "Patient",
        "_birthDate": {
            "extension": [{
                "url": "http://hl7.org/fhir/StructureDefinition/data-absent-reason",
                "valueCode": "unknown"
            }]
        }
    });

    let patient: Patient = codec.decode_value_as(&input).unwrap();
    let birth_date = patient.birth_date.as_ref().unwrap();
    assert!(birth_date.value.is_none());
    assert_eq!(birth_date.extensions().len(), 1);

    let encoded = codec.encode_value(&patient);
    assert!(encoded.get("birthDate").is_none());
    assert_eq!(encoded, input);
}

#[test]
fn expected_type_mismatch_is_reported_at_the_discriminator() {
    let codec = test_support::codec();
    let err = codec
        .decode_str(r#"{"resourceType":"Patient"}"#, Some("Observation"))
        .unwrap_err();
    let err = err.as_decode().unwrap();
    assert!(matches!(err.kind(), DecodeErrorKind::ResourceTypeMismatch { .. }));
    assert_eq!(err.path().to_string(), "resourceType");
}

#[test]
fn decode_error_converts_to_operation_outcome() {
    let codec = test_support::codec();
    let err = codec
        .decode_value_as::<Observation>(&json!({
            "resourceType": "Observation",
            "status": "final",
            "code": {"text": "t"},
            "issued": 42
        }))
        .unwrap_err();

    let outcome = OperationOutcome::from_decode_error(&err);
    assert!(outcome.has_errors());
    assert_eq!(outcome.issue[0].code.as_str(), Some("value"));
    assert_eq!(outcome.issue[0].expression[0].as_str(), Some("issued"));
}

#[test]
fn parameters_resource_resolves_through_registry() {
    let codec = test_support::codec();
    let params: Parameters = codec
        .decode_value_as(&json!({
            "resourceType": "Parameters",
            "parameter": [{"name": "return", "resource": {"resourceType": "Patient", "id": "p9"}}]
        }))
        .unwrap();

    let returned = params.get("return").and_then(|p| p.resource.as_ref()).unwrap();
    assert_eq!(returned.downcast_ref::<Patient>().and_then(|p| p.id()), Some("p9"));
}
