//! Purpose: Exercise the untagged-union decoder through the public crate API.
//! Exports: Integration tests only.
//! Role: Check selection, failure reporting, and round-trip behavior for a
//! caller-declared union and for the shipped data-modeling DTOs.

use cognite_sdk::core::union::{
    self, Candidate, DecodeError, Fields, JsonKind, Property, Union, Variant,
};
use cognite_sdk::dto::Identity;
use cognite_sdk::dto::models::{
    ContainerReference, DataModel, MappedProperty, PropertyType, ReverseDirectRelationProperty,
    SourceReference, ThroughReference, ViewOrReference, ViewProperty, ViewReference,
};
use serde::Serialize;
use serde_json::{Map, Value, json};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
enum Shape {
    FullDefinition {
        id: String,
        name: String,
        properties: Map<String, Value>,
    },
    Reference {
        id: String,
    },
}

const FULL_DEFINITION: &[Property] = &[
    Property::required("id", JsonKind::String),
    Property::required("name", JsonKind::String),
    Property::required("properties", JsonKind::Object),
];
const REFERENCE: &[Property] = &[Property::required("id", JsonKind::String)];

fn build_full(fields: &Fields<'_>) -> Result<Shape, DecodeError> {
    Ok(Shape::FullDefinition {
        id: fields.required("id")?,
        name: fields.required("name")?,
        properties: fields.required("properties")?,
    })
}

fn build_reference(fields: &Fields<'_>) -> Result<Shape, DecodeError> {
    Ok(Shape::Reference {
        id: fields.required("id")?,
    })
}

static SHAPE: Union<Shape> = Union::new(
    "Shape",
    &[
        Variant::new("FullDefinition", FULL_DEFINITION, build_full),
        Variant::new("Reference", REFERENCE, build_reference),
    ],
);

#[test]
fn id_only_selects_reference() {
    let decoded = union::decode(&json!({"id": "v1"}), &SHAPE).expect("decode");
    assert_eq!(
        decoded,
        Shape::Reference {
            id: "v1".to_string()
        }
    );
}

#[test]
fn full_object_prefers_first_registered_variant() {
    let raw = json!({"id": "v1", "name": "View One", "properties": {}});
    assert_eq!(SHAPE.matching(&raw), vec!["FullDefinition", "Reference"]);
    let decoded = union::decode(&raw, &SHAPE).expect("decode");
    assert_eq!(
        decoded,
        Shape::FullDefinition {
            id: "v1".to_string(),
            name: "View One".to_string(),
            properties: Map::new(),
        }
    );
}

#[test]
fn missing_shared_property_reports_every_candidate() {
    let err = union::decode(&json!({"name": "orphan"}), &SHAPE).expect_err("no match");
    assert_eq!(
        err,
        DecodeError::NoVariantMatched {
            union: "Shape",
            present: vec!["name".to_string()],
            candidates: vec![
                Candidate {
                    variant: "FullDefinition",
                    required: vec!["id", "name", "properties"],
                },
                Candidate {
                    variant: "Reference",
                    required: vec!["id"],
                },
            ],
        }
    );
}

#[test]
fn non_objects_are_rejected_before_matching() {
    for raw in [json!([1, 2, 3]), json!("v1"), json!(7), json!(null)] {
        let err = union::decode(&raw, &SHAPE).expect_err("not an object");
        assert!(matches!(err, DecodeError::NotAnObject { union: "Shape", .. }));
    }
    let err = union::decode(&json!([1, 2, 3]), &SHAPE).expect_err("array");
    assert_eq!(err.to_string(), "Shape: expected a JSON object, found array");
}

#[test]
fn extra_properties_are_ignored() {
    let decoded =
        union::decode(&json!({"id": "v1", "color": "blue", "tags": [1]}), &SHAPE).expect("decode");
    assert_eq!(
        decoded,
        Shape::Reference {
            id: "v1".to_string()
        }
    );
}

#[test]
fn null_counts_as_absent() {
    let decoded = union::decode(
        &json!({"id": "v1", "name": null, "properties": null}),
        &SHAPE,
    )
    .expect("decode");
    assert!(matches!(decoded, Shape::Reference { .. }));
}

#[test]
fn wrong_property_type_is_a_mismatch() {
    let err = union::decode(&json!({"id": 1}), &SHAPE).expect_err("mismatch");
    assert_eq!(
        err,
        DecodeError::PropertyTypeMismatch {
            variant: "Reference",
            property: "id",
            expected: JsonKind::String,
            actual: JsonKind::Number,
            detail: None,
        }
    );
}

#[test]
fn encoded_values_decode_to_themselves() {
    let values = [
        Shape::Reference {
            id: "v1".to_string(),
        },
        Shape::FullDefinition {
            id: "v1".to_string(),
            name: "View One".to_string(),
            properties: json!({"a": 1}).as_object().cloned().unwrap_or_default(),
        },
    ];
    for value in values {
        let encoded = serde_json::to_value(&value).expect("encode");
        assert_eq!(union::decode(&encoded, &SHAPE).expect("decode"), value);
    }
}

#[test]
fn data_model_views_round_trip() {
    let raw = json!({
        "space": "plant",
        "externalId": "Plant",
        "version": "1",
        "isGlobal": false,
        "createdTime": 1,
        "lastUpdatedTime": 2,
        "views": [
            {
                "space": "plant",
                "externalId": "Pump",
                "version": "v1",
                "properties": {
                    "rpm": {
                        "container": {"space": "plant", "externalId": "PumpData"},
                        "containerPropertyIdentifier": "rpm"
                    }
                }
            },
            {"space": "cdf_cdm", "externalId": "CogniteAsset", "version": "v1"}
        ]
    });
    let model: DataModel = serde_json::from_value(raw).expect("data model");
    let views = &model.views;
    assert_eq!(views.len(), 2);
    assert_eq!(views[0].variant_name(), "View");
    assert_eq!(views[1].variant_name(), "Reference");

    let encoded = serde_json::to_value(views).expect("encode");
    let decoded: Vec<ViewOrReference> = serde_json::from_value(encoded).expect("decode");
    assert_eq!(&decoded, views);
}

#[test]
fn view_properties_round_trip() {
    let plain = MappedProperty::new(ContainerReference::new("plant", "PumpData"), "rpm");
    let mut with_default =
        MappedProperty::new(ContainerReference::new("plant", "PumpData"), "mode");
    with_default.default_value = json!("auto");
    with_default.r#type = Some(PropertyType::Timeseries { list: false });
    let reverse = ReverseDirectRelationProperty {
        connection_type: Some("multi_reverse_direct_relation".to_string()),
        source: ViewReference::new("plant", "Part", "v1"),
        through: ThroughReference {
            source: SourceReference::View(ViewReference::new("plant", "Part", "v1")),
            identifier: "pump".to_string(),
        },
        name: None,
        description: None,
    };
    let properties = [
        ViewProperty::Mapped(plain),
        ViewProperty::Mapped(with_default),
        ViewProperty::ReverseDirectRelation(reverse),
    ];
    for property in properties {
        let encoded = serde_json::to_value(&property).expect("encode");
        let decoded: ViewProperty = serde_json::from_value(encoded).expect("decode");
        assert_eq!(decoded, property);
    }

    let reference = ViewOrReference::Reference(ViewReference::new("plant", "Pump", "v1"));
    let encoded = serde_json::to_value(&reference).expect("encode");
    let decoded: ViewOrReference = serde_json::from_value(encoded).expect("decode");
    assert_eq!(decoded, reference);
    assert!(decoded.as_view().is_none());
}

#[test]
fn unmatched_view_entry_fails_the_whole_model() {
    let raw = json!({
        "space": "plant",
        "externalId": "Plant",
        "version": "1",
        "views": [{"name": "orphan"}]
    });
    let err = serde_json::from_value::<DataModel>(raw).expect_err("no match");
    assert!(err.to_string().contains("ViewOrReference: no variant matched"));
}

#[test]
fn identities_round_trip() {
    let ids = vec![Identity::id(3), Identity::external_id("pump-3")];
    let encoded = serde_json::to_value(&ids).expect("encode");
    assert_eq!(encoded, json!([{"id": 3}, {"externalId": "pump-3"}]));
    let decoded: Vec<Identity> = serde_json::from_value(encoded).expect("decode");
    assert_eq!(decoded, ids);
}
