//! Engine behaviour exercised through a small locally declared catalog

use ferrum_codec::{
    fhir_backbone, fhir_choice, fhir_resource, AnyResource, Code, Codec, CodeableConcept, Coding,
    Date, DecodeErrorKind, DecodeOptions, Error, HasExtensions, HasModifierExtensions,
    ModifierExtensionPolicy, Primitive, ResourceRegistry, UnknownResourcePolicy,
};
use serde_json::{json, Value};
use std::sync::OnceLock;

fhir_choice! {
    pub enum PartValue {
        String(Primitive<String>) = "String",
        Integer(Primitive<i32>) = "Integer",
        Coding(Coding) = "Coding",
    }
}

fhir_backbone! {
    pub struct BasicPart: "Basic.part" {
        label: Primitive<String> => required("label"),
        value: Option<PartValue> => choice("value"),
    }
}

fhir_resource! {
    pub struct Basic: domain "Basic" {
        code: Option<CodeableConcept> => opt("code"),
        tag: Vec<Primitive<Code>> => list("tag"),
        created: Option<Primitive<Date>> => opt("created"),
        part: Vec<BasicPart> => list("part"),
    }
}

fhir_resource! {
    pub struct Envelope: resource "Envelope" {
        payload: Option<AnyResource> => opt("payload"),
    }
}

static REGISTRY: OnceLock<ResourceRegistry> = OnceLock::new();

fn registry() -> &'static ResourceRegistry {
    REGISTRY.get_or_init(|| {
        let mut registry = ResourceRegistry::new();
        registry.register::<Basic>().register::<Envelope>();
        registry
    })
}

fn codec() -> Codec<'static> {
    Codec::new(registry())
}

fn decode_err(input: Value) -> ferrum_codec::DecodeError {
    codec().decode_value(&input, None).unwrap_err()
}

#[test]
fn primitive_list_sidecars_stay_aligned() {
    let input = json!({
        "resourceType": "Basic",
        "tag": ["a", "b", null],
        "_tag": [null, {"id": "t2"}, {"id": "t3"}]
    });
    let basic: Basic = codec().decode_value_as(&input).unwrap();

    assert_eq!(basic.tag.len(), 3);
    assert_eq!(basic.tag[0].as_str(), Some("a"));
    assert!(basic.tag[0].element.is_none());
    assert_eq!(basic.tag[1].id(), Some("t2"));
    assert!(basic.tag[2].value.is_none());
    assert_eq!(basic.tag[2].id(), Some("t3"));

    assert_eq!(codec().encode_value(&basic), input);
}

#[test]
fn sidecar_array_without_values_round_trips() {
    let input = json!({
        "resourceType": "Basic",
        "_tag": [{"id": "t1"}, {"id": "t2"}]
    });
    let basic: Basic = codec().decode_value_as(&input).unwrap();
    assert_eq!(basic.tag.len(), 2);
    assert_eq!(codec().encode_value(&basic), input);
}

#[test]
fn misaligned_sidecar_array_is_malformed() {
    let err = decode_err(json!({
        "resourceType": "Basic",
        "tag": ["a", "b"],
        "_tag": [null]
    }));
    assert!(matches!(err.kind(), DecodeErrorKind::MalformedStructure(_)));
    assert_eq!(err.path().to_string(), "tag");
}

#[test]
fn array_entry_with_neither_half_is_malformed() {
    let err = decode_err(json!({"resourceType": "Basic", "tag": ["a", null]}));
    assert!(matches!(err.kind(), DecodeErrorKind::MalformedStructure(_)));
    assert_eq!(err.path().to_string(), "tag[1]");
}

#[test]
fn scalar_where_object_expected_is_malformed() {
    let err = decode_err(json!({"resourceType": "Basic", "code": "abc"}));
    assert!(matches!(err.kind(), DecodeErrorKind::MalformedStructure(_)));
    assert_eq!(err.path().to_string(), "code");
}

#[test]
fn empty_object_is_absent_and_never_emitted() {
    let basic: Basic = codec()
        .decode_value_as(&json!({"resourceType": "Basic", "code": {}, "tag": []}))
        .unwrap();
    assert!(basic.code.is_none());
    assert!(basic.tag.is_empty());
    assert_eq!(codec().encode_value(&basic), json!({"resourceType": "Basic"}));
}

#[test]
fn wrong_json_type_for_primitive_is_type_mismatch() {
    let err = decode_err(json!({"resourceType": "Basic", "created": 20240105}));
    assert_eq!(
        err.kind(),
        &DecodeErrorKind::TypeMismatch {
            expected: "date",
            found: "20240105".to_string()
        }
    );
    assert_eq!(err.path().to_string(), "created");
}

#[test]
fn sidecar_must_be_an_object() {
    let err = decode_err(json!({"resourceType": "Basic", "created": "2024-01-05", "_created": "x"}));
    assert!(matches!(err.kind(), DecodeErrorKind::MalformedStructure(_)));
}

#[test]
fn sidecar_holds_only_id_and_extension() {
    let err = decode_err(json!({
        "resourceType": "Basic",
        "created": "2024-01-05",
        "_created": {"value": "oops"}
    }));
    assert!(matches!(err.kind(), DecodeErrorKind::MalformedStructure(_)));
    assert_eq!(err.path().to_string(), "created");

    let err = decode_err(json!({
        "resourceType": "Basic",
        "tag": ["a"],
        "_tag": [{"id": "t1", "display": "x"}]
    }));
    assert!(matches!(err.kind(), DecodeErrorKind::MalformedStructure(_)));
    assert_eq!(err.path().to_string(), "tag[0]");

    let basic: Basic = codec()
        .decode_value_as(&json!({
            "resourceType": "Basic",
            "created": "2024-01-05",
            "_created": {"id": "c1", "extension": null}
        }))
        .unwrap();
    assert_eq!(basic.created.as_ref().and_then(|c| c.id()), Some("c1"));
}

#[test]
fn choice_inside_backbone_round_trips() {
    let input = json!({
        "resourceType": "Basic",
        "part": [
            {"label": "count", "valueInteger": 4},
            {
                "label": "kind",
                "valueCoding": {
                    "extension": [{"url": "http://example.org/source", "valueString": "manual"}],
                    "system": "http://example.org/kinds",
                    "code": "k1"
                }
            },
            {"label": "note", "_valueString": {"id": "n1"}}
        ]
    });
    let basic: Basic = codec().decode_value_as(&input).unwrap();

    assert!(matches!(basic.part[0].value, Some(PartValue::Integer(_))));
    match &basic.part[1].value {
        Some(PartValue::Coding(coding)) => {
            assert!(coding.has_extension("http://example.org/source"));
        }
        other => panic!("expected a Coding, got {other:?}"),
    }
    match &basic.part[2].value {
        Some(PartValue::String(cell)) => {
            assert!(cell.value.is_none());
            assert_eq!(cell.id(), Some("n1"));
        }
        other => panic!("expected a String, got {other:?}"),
    }

    assert_eq!(codec().encode_value(&basic), input);
}

#[test]
fn ambiguous_choice_path_is_inside_the_backbone() {
    let err = decode_err(json!({
        "resourceType": "Basic",
        "part": [{"label": "x", "valueString": "a", "valueInteger": 1}]
    }));
    assert!(matches!(err.kind(), DecodeErrorKind::AmbiguousChoice { .. }));
    assert_eq!(err.path().to_string(), "part[0].value[x]");
}

#[test]
fn backbone_modifier_extensions_follow_the_policy() {
    let input = json!({
        "resourceType": "Basic",
        "part": [{
            "modifierExtension": [{"url": "http://example.org/negated", "valueBoolean": true}],
            "label": "x"
        }]
    });

    let basic: Basic = codec().decode_value_as(&input).unwrap();
    assert_eq!(basic.part[0].modifier_extensions().len(), 1);

    let strict = codec().with_options(
        DecodeOptions::new().with_modifier_extensions(ModifierExtensionPolicy::RejectUnrecognized),
    );
    let err = strict.decode_value_as::<Basic>(&input).unwrap_err();
    assert_eq!(err.path().to_string(), "part[0].modifierExtension[0]");
}

#[test]
fn nested_resource_errors_carry_the_full_path() {
    let err = decode_err(json!({
        "resourceType": "Envelope",
        "payload": {
            "resourceType": "Basic",
            "contained": [{"resourceType": "Basic", "created": true}]
        }
    }));
    assert!(matches!(err.kind(), DecodeErrorKind::TypeMismatch { .. }));
    assert_eq!(err.path().to_string(), "payload.contained[0].created");
}

#[test]
fn unregistered_root_type_is_unknown() {
    let err = decode_err(json!({"resourceType": "Patient"}));
    assert_eq!(
        err.kind(),
        &DecodeErrorKind::UnknownResourceType("Patient".to_string())
    );
    assert!(err.path().is_root());
}

#[test]
fn preserved_unknown_resource_round_trips() {
    let codec = codec().with_options(
        DecodeOptions::new().with_unknown_resources(UnknownResourcePolicy::Preserve),
    );
    let input = json!({
        "resourceType": "Envelope",
        "payload": {"resourceType": "Patient", "id": "p1", "active": true}
    });

    let envelope: Envelope = codec.decode_value_as(&input).unwrap();
    let payload = envelope.payload.as_ref().unwrap();
    assert_eq!(payload.resource_type(), "Patient");
    assert_eq!(payload.id(), Some("p1"));
    assert_eq!(codec.encode_value(&envelope), input);
}

#[test]
fn decode_as_checks_the_discriminator() {
    let err = codec()
        .decode_value_as::<Envelope>(&json!({"resourceType": "Basic"}))
        .unwrap_err();
    assert_eq!(
        err.kind(),
        &DecodeErrorKind::ResourceTypeMismatch {
            expected: "Envelope".to_string(),
            found: "Basic".to_string()
        }
    );
}

#[test]
fn missing_discriminator_is_reported() {
    let err = decode_err(json!({"id": "x"}));
    assert_eq!(
        err.kind(),
        &DecodeErrorKind::MissingRequiredField("resourceType".to_string())
    );
}

#[test]
fn non_object_root_is_malformed() {
    let err = codec().decode(b"[1, 2]", None).unwrap_err();
    let err = err.as_decode().unwrap();
    assert!(matches!(err.kind(), DecodeErrorKind::MalformedStructure(_)));
    assert!(err.path().is_root());
}

#[test]
fn invalid_json_is_a_json_error() {
    let err = codec().decode(b"{\"resourceType\":", None).unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn encode_outputs_compact_and_pretty_forms() {
    let mut basic = Basic::default();
    basic.created = Some(Primitive::from("2024-01-05"));

    let compact = codec().encode_string(&basic).unwrap();
    assert_eq!(compact, r#"{"resourceType":"Basic","created":"2024-01-05"}"#);

    let pretty = codec().encode_pretty(&basic).unwrap();
    let reparsed: Value = serde_json::from_slice(&pretty).unwrap();
    assert_eq!(reparsed, json!({"resourceType": "Basic", "created": "2024-01-05"}));
}

#[test]
fn dynamic_resources_compare_and_clone() {
    let basic: Basic = codec()
        .decode_value_as(&json!({"resourceType": "Basic", "id": "b1"}))
        .unwrap();
    let any = AnyResource::new(basic.clone());
    let copy = any.clone();

    assert_eq!(any, copy);
    assert_eq!(any.id(), Some("b1"));
    assert_eq!(copy.downcast::<Basic>(), Some(basic));
    assert_ne!(any, AnyResource::new(Envelope::default()));
}

#[test]
fn later_registration_replaces_earlier() {
    let mut registry = ResourceRegistry::new();
    registry.register::<Basic>().register::<Basic>();
    assert_eq!(registry.len(), 1);
    assert!(registry.contains("Basic"));
    assert!(!registry.contains("Envelope"));
}
