//! Purpose: Decode JSON objects into one of several statically declared shapes without a type tag.
//! Exports: `Union`, `Variant`, `Property`, `Fields`, `JsonKind`, `DecodeError`, `Candidate`,
//! `decode`, `deserialize_with`.
//! Role: Shared seam for DTO fields that accept either a short reference or a full object.
//! Invariants: Descriptor tables are `'static` and never mutated; decoding is pure.
//! Invariants: A variant matches when all of its required properties are present (non-null).
//! Invariants: Undeclared properties are ignored; constructors only see declared ones.
//! Invariants: When several variants match, the earliest registered one wins.

use serde::Deserialize;
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde_json::{Map, Value};
use std::error::Error as StdError;
use std::fmt;

/// Coarse JSON type used in property declarations and mismatch reports.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JsonKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
    /// Declaration-only: accepts any JSON value.
    Any,
}

impl JsonKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Bool,
            Value::Number(_) => JsonKind::Number,
            Value::String(_) => JsonKind::String,
            Value::Array(_) => JsonKind::Array,
            Value::Object(_) => JsonKind::Object,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JsonKind::Null => "null",
            JsonKind::Bool => "boolean",
            JsonKind::Number => "number",
            JsonKind::String => "string",
            JsonKind::Array => "array",
            JsonKind::Object => "object",
            JsonKind::Any => "any",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        self == JsonKind::Any || self == JsonKind::of(value)
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Property {
    pub name: &'static str,
    pub kind: JsonKind,
    pub required: bool,
}

impl Property {
    pub const fn required(name: &'static str, kind: JsonKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: JsonKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

type Build<T> = fn(&Fields<'_>) -> Result<T, DecodeError>;

/// One candidate shape of an untagged union.
pub struct Variant<T: 'static> {
    name: &'static str,
    properties: &'static [Property],
    build: Build<T>,
}

impl<T: 'static> Variant<T> {
    pub const fn new(name: &'static str, properties: &'static [Property], build: Build<T>) -> Self {
        Self {
            name,
            properties,
            build,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn properties(&self) -> &'static [Property] {
        self.properties
    }

    pub fn required(&self) -> impl Iterator<Item = &'static str> {
        self.properties
            .iter()
            .filter(|property| property.required)
            .map(|property| property.name)
    }

    fn matches(&self, object: &Map<String, Value>) -> bool {
        self.required().all(|name| is_present(object, name))
    }

    fn materialize(&self, object: &Map<String, Value>) -> Result<T, DecodeError> {
        let fields = Fields {
            variant: self.name,
            properties: self.properties,
            object,
        };
        (self.build)(&fields)
    }
}

impl<T: 'static> fmt::Debug for Variant<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variant")
            .field("name", &self.name)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

/// Ordered candidate list for one union site. Declare as a `static` next to the
/// enum it produces; registration order is the tie-break.
pub struct Union<T: 'static> {
    name: &'static str,
    variants: &'static [Variant<T>],
}

impl<T: 'static> Union<T> {
    pub const fn new(name: &'static str, variants: &'static [Variant<T>]) -> Self {
        Self { name, variants }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn variants(&self) -> &'static [Variant<T>] {
        self.variants
    }

    pub fn decode(&self, raw: &Value) -> Result<T, DecodeError> {
        let Some(object) = raw.as_object() else {
            return Err(DecodeError::NotAnObject {
                union: self.name,
                actual: JsonKind::of(raw),
            });
        };

        let mut matches = self.variants.iter().filter(|variant| variant.matches(object));
        let Some(selected) = matches.next() else {
            return Err(self.no_match(object));
        };
        let shadowed: Vec<&str> = matches.map(|variant| variant.name).collect();
        if !shadowed.is_empty() {
            tracing::trace!(
                union = self.name,
                selected = selected.name,
                ?shadowed,
                "several variants matched; using the first registered"
            );
        }
        selected.materialize(object)
    }

    /// Names of every variant whose required properties `raw` satisfies, in
    /// registration order.
    pub fn matching(&self, raw: &Value) -> Vec<&'static str> {
        let Some(object) = raw.as_object() else {
            return Vec::new();
        };
        self.variants
            .iter()
            .filter(|variant| variant.matches(object))
            .map(|variant| variant.name)
            .collect()
    }

    fn no_match(&self, object: &Map<String, Value>) -> DecodeError {
        DecodeError::NoVariantMatched {
            union: self.name,
            present: object.keys().cloned().collect(),
            candidates: self
                .variants
                .iter()
                .map(|variant| Candidate {
                    variant: variant.name,
                    required: variant.required().collect(),
                })
                .collect(),
        }
    }
}

impl<T: 'static> fmt::Debug for Union<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Union")
            .field("name", &self.name)
            .field("variants", &self.variants)
            .finish()
    }
}

pub fn decode<T: 'static>(raw: &Value, union: &Union<T>) -> Result<T, DecodeError> {
    union.decode(raw)
}

/// Routes a `Deserialize` impl through `union`, surfacing failures as serde
/// custom errors.
pub fn deserialize_with<'de, D, T>(deserializer: D, union: &Union<T>) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: 'static,
{
    let value = Value::deserialize(deserializer)?;
    union.decode(&value).map_err(D::Error::custom)
}

/// Declared properties of the selected variant, handed to its constructor.
pub struct Fields<'a> {
    variant: &'static str,
    properties: &'static [Property],
    object: &'a Map<String, Value>,
}

impl Fields<'_> {
    pub fn variant(&self) -> &'static str {
        self.variant
    }

    pub fn required<V: DeserializeOwned>(&self, name: &'static str) -> Result<V, DecodeError> {
        let property = self.property(name);
        match self.get(property) {
            Some(value) => self.convert(property, value),
            None => Err(DecodeError::PropertyTypeMismatch {
                variant: self.variant,
                property: name,
                expected: property.kind,
                actual: JsonKind::Null,
                detail: Some("required property is missing".to_string()),
            }),
        }
    }

    pub fn optional<V: DeserializeOwned>(
        &self,
        name: &'static str,
    ) -> Result<Option<V>, DecodeError> {
        let property = self.property(name);
        self.get(property)
            .map(|value| self.convert(property, value))
            .transpose()
    }

    pub fn optional_or_default<V: DeserializeOwned + Default>(
        &self,
        name: &'static str,
    ) -> Result<V, DecodeError> {
        Ok(self.optional(name)?.unwrap_or_default())
    }

    fn property(&self, name: &'static str) -> Property {
        let declared = self
            .properties
            .iter()
            .find(|property| property.name == name)
            .copied();
        debug_assert!(
            declared.is_some(),
            "variant {} reads undeclared property {name}",
            self.variant
        );
        declared.unwrap_or(Property::optional(name, JsonKind::Any))
    }

    fn get(&self, property: Property) -> Option<&Value> {
        if !self.properties.iter().any(|declared| declared.name == property.name) {
            return None;
        }
        self.object.get(property.name).filter(|value| !value.is_null())
    }

    fn convert<V: DeserializeOwned>(
        &self,
        property: Property,
        value: &Value,
    ) -> Result<V, DecodeError> {
        let mismatch = |detail: Option<String>| DecodeError::PropertyTypeMismatch {
            variant: self.variant,
            property: property.name,
            expected: property.kind,
            actual: JsonKind::of(value),
            detail,
        };
        if !property.kind.accepts(value) {
            return Err(mismatch(None));
        }
        V::deserialize(value).map_err(|err| mismatch(Some(err.to_string())))
    }
}

fn is_present(object: &Map<String, Value>, name: &str) -> bool {
    object.get(name).is_some_and(|value| !value.is_null())
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Candidate {
    pub variant: &'static str,
    pub required: Vec<&'static str>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DecodeError {
    NotAnObject {
        union: &'static str,
        actual: JsonKind,
    },
    NoVariantMatched {
        union: &'static str,
        present: Vec<String>,
        candidates: Vec<Candidate>,
    },
    PropertyTypeMismatch {
        variant: &'static str,
        property: &'static str,
        expected: JsonKind,
        actual: JsonKind,
        detail: Option<String>,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::NotAnObject { union, actual } => {
                write!(f, "{union}: expected a JSON object, found {actual}")
            }
            DecodeError::NoVariantMatched {
                union,
                present,
                candidates,
            } => {
                write!(
                    f,
                    "{union}: no variant matched properties [{}]; required:",
                    present.join(", ")
                )?;
                for (idx, candidate) in candidates.iter().enumerate() {
                    let sep = if idx == 0 { " " } else { ", " };
                    write!(
                        f,
                        "{sep}{} [{}]",
                        candidate.variant,
                        candidate.required.join(", ")
                    )?;
                }
                Ok(())
            }
            DecodeError::PropertyTypeMismatch {
                variant,
                property,
                expected,
                actual,
                detail,
            } => match detail {
                Some(detail) if expected == actual => {
                    write!(f, "{variant}.{property}: {detail}")
                }
                Some(detail) => write!(
                    f,
                    "{variant}.{property}: expected {expected}, found {actual} ({detail})"
                ),
                None => write!(
                    f,
                    "{variant}.{property}: expected {expected}, found {actual}"
                ),
            },
        }
    }
}

impl StdError for DecodeError {}

#[cfg(test)]
mod tests {
    use super::{
        Candidate, DecodeError, Fields, JsonKind, Property, Union, Variant, decode,
        deserialize_with,
    };
    use serde::{Deserialize, Deserializer};
    use serde_json::{Value, json};
    use std::collections::BTreeMap;

    #[derive(Clone, Debug, PartialEq)]
    enum ViewShape {
        Definition {
            id: String,
            name: String,
            properties: BTreeMap<String, Value>,
        },
        Reference {
            id: String,
        },
    }

    const DEFINITION: &[Property] = &[
        Property::required("id", JsonKind::String),
        Property::required("name", JsonKind::String),
        Property::required("properties", JsonKind::Object),
    ];

    const REFERENCE: &[Property] = &[Property::required("id", JsonKind::String)];

    fn build_definition(fields: &Fields<'_>) -> Result<ViewShape, DecodeError> {
        Ok(ViewShape::Definition {
            id: fields.required("id")?,
            name: fields.required("name")?,
            properties: fields.required("properties")?,
        })
    }

    fn build_reference(fields: &Fields<'_>) -> Result<ViewShape, DecodeError> {
        Ok(ViewShape::Reference {
            id: fields.required("id")?,
        })
    }

    static VIEW_SHAPE: Union<ViewShape> = Union::new(
        "ViewShape",
        &[
            Variant::new("Definition", DEFINITION, build_definition),
            Variant::new("Reference", REFERENCE, build_reference),
        ],
    );

    static EMPTY: Union<ViewShape> = Union::new("Empty", &[]);

    #[test]
    fn bare_id_decodes_to_reference() {
        let value = decode(&json!({"id": "v1"}), &VIEW_SHAPE).expect("decode");
        assert_eq!(
            value,
            ViewShape::Reference {
                id: "v1".to_string()
            }
        );
    }

    #[test]
    fn full_payload_prefers_earlier_definition() {
        let raw = json!({"id": "v1", "name": "View One", "properties": {}});
        assert_eq!(VIEW_SHAPE.matching(&raw), vec!["Definition", "Reference"]);
        let value = decode(&raw, &VIEW_SHAPE).expect("decode");
        assert_eq!(
            value,
            ViewShape::Definition {
                id: "v1".to_string(),
                name: "View One".to_string(),
                properties: BTreeMap::new(),
            }
        );
    }

    #[test]
    fn extra_properties_are_ignored() {
        let raw = json!({"id": "v1", "type": "view", "unexpected": [1, 2]});
        let value = decode(&raw, &VIEW_SHAPE).expect("decode");
        assert_eq!(
            value,
            ViewShape::Reference {
                id: "v1".to_string()
            }
        );
    }

    #[test]
    fn null_counts_as_absent() {
        let raw = json!({"id": "v1", "name": null, "properties": {}});
        assert_eq!(VIEW_SHAPE.matching(&raw), vec!["Reference"]);

        let err = decode(&json!({"id": null}), &VIEW_SHAPE).expect_err("err");
        assert!(matches!(err, DecodeError::NoVariantMatched { .. }));
    }

    #[test]
    fn missing_shared_required_property_reports_candidates() {
        let err = decode(&json!({"name": "orphan"}), &VIEW_SHAPE).expect_err("err");
        assert_eq!(
            err,
            DecodeError::NoVariantMatched {
                union: "ViewShape",
                present: vec!["name".to_string()],
                candidates: vec![
                    Candidate {
                        variant: "Definition",
                        required: vec!["id", "name", "properties"],
                    },
                    Candidate {
                        variant: "Reference",
                        required: vec!["id"],
                    },
                ],
            }
        );
        assert_eq!(
            err.to_string(),
            "ViewShape: no variant matched properties [name]; required: \
             Definition [id, name, properties], Reference [id]"
        );
    }

    #[test]
    fn non_objects_are_rejected_before_matching() {
        let cases = [
            (json!([1, 2, 3]), JsonKind::Array),
            (json!("v1"), JsonKind::String),
            (json!(42), JsonKind::Number),
            (json!(true), JsonKind::Bool),
            (Value::Null, JsonKind::Null),
        ];
        for (raw, kind) in cases {
            for union in [&VIEW_SHAPE, &EMPTY] {
                let err = decode(&raw, union).expect_err("err");
                assert_eq!(
                    err,
                    DecodeError::NotAnObject {
                        union: union.name(),
                        actual: kind,
                    }
                );
            }
        }
    }

    #[test]
    fn empty_union_never_matches_objects() {
        let err = decode(&json!({"id": "v1"}), &EMPTY).expect_err("err");
        assert!(matches!(
            err,
            DecodeError::NoVariantMatched { ref candidates, .. } if candidates.is_empty()
        ));
    }

    #[test]
    fn wrong_property_kind_is_a_mismatch_not_a_shape_failure() {
        let raw = json!({"id": "v1", "name": 7, "properties": {}});
        let err = decode(&raw, &VIEW_SHAPE).expect_err("err");
        assert_eq!(
            err,
            DecodeError::PropertyTypeMismatch {
                variant: "Definition",
                property: "name",
                expected: JsonKind::String,
                actual: JsonKind::Number,
                detail: None,
            }
        );
        assert_eq!(
            err.to_string(),
            "Definition.name: expected string, found number"
        );
    }

    #[test]
    fn nested_deserialize_failure_names_the_property() {
        #[derive(Debug)]
        struct Counted(#[allow(dead_code)] BTreeMap<String, u32>);

        fn build(fields: &Fields<'_>) -> Result<Counted, DecodeError> {
            Ok(Counted(fields.required("counts")?))
        }

        static COUNTED: Union<Counted> = Union::new(
            "Counted",
            &[Variant::new(
                "Counted",
                &[Property::required("counts", JsonKind::Object)],
                build,
            )],
        );

        let err = COUNTED
            .decode(&json!({"counts": {"a": "many"}}))
            .expect_err("err");
        let message = err.to_string();
        assert!(message.starts_with("Counted.counts: invalid type"), "{message}");
        assert!(!message.contains("found object"), "{message}");
        match err {
            DecodeError::PropertyTypeMismatch {
                property,
                expected,
                actual,
                detail,
                ..
            } => {
                assert_eq!(property, "counts");
                assert_eq!(expected, JsonKind::Object);
                assert_eq!(actual, JsonKind::Object);
                assert!(detail.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn decoding_leaves_input_untouched() {
        let raw = json!({"id": "v1", "name": "n", "properties": {"p": 1}, "extra": true});
        let before = raw.clone();
        let _ = decode(&raw, &VIEW_SHAPE).expect("decode");
        assert_eq!(raw, before);
    }

    #[test]
    fn deserialize_with_surfaces_decode_errors_through_serde() {
        #[derive(Debug)]
        struct Wrapped(#[allow(dead_code)] ViewShape);

        impl<'de> Deserialize<'de> for Wrapped {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserialize_with(deserializer, &VIEW_SHAPE).map(Wrapped)
            }
        }

        let ok: Vec<Wrapped> = serde_json::from_str(r#"[{"id":"a"},{"id":"b","name":"B","properties":{}}]"#)
            .expect("decode");
        assert_eq!(ok.len(), 2);

        let err = serde_json::from_str::<Wrapped>("[1]").expect_err("err");
        assert!(err.to_string().contains("ViewShape: expected a JSON object, found array"));
    }
}
