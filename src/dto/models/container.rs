//! Purpose: Container DTOs and the tagged property-type schema.
//! Exports: `Container`, `ContainerCreate`, `ContainerPropertyDefinition`, `PropertyType`,
//! `EnumValue`, `UsedFor`.
//! Notes: Property types carry an explicit `"type"` discriminator, so plain serde tagging
//! is enough here; only tagless shapes go through the union decoder.

use super::reference::ContainerReference;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UsedFor {
    #[default]
    Node,
    Edge,
    All,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PropertyType {
    Text {
        #[serde(default)]
        list: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        collation: Option<String>,
    },
    Boolean {
        #[serde(default)]
        list: bool,
    },
    Float32 {
        #[serde(default)]
        list: bool,
    },
    Float64 {
        #[serde(default)]
        list: bool,
    },
    Int32 {
        #[serde(default)]
        list: bool,
    },
    Int64 {
        #[serde(default)]
        list: bool,
    },
    Timestamp {
        #[serde(default)]
        list: bool,
    },
    Date {
        #[serde(default)]
        list: bool,
    },
    Json {
        #[serde(default)]
        list: bool,
    },
    Direct {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        container: Option<ContainerReference>,
        #[serde(default)]
        list: bool,
    },
    Timeseries {
        #[serde(default)]
        list: bool,
    },
    File {
        #[serde(default)]
        list: bool,
    },
    Sequence {
        #[serde(default)]
        list: bool,
    },
    Enum {
        values: BTreeMap<String, EnumValue>,
        /// Value reported for stored values no longer present in `values`.
        #[serde(
            default,
            rename = "unknownValue",
            skip_serializing_if = "Option::is_none"
        )]
        unknown_value: Option<String>,
    },
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPropertyDefinition {
    pub r#type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_increment: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immutable: Option<bool>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub default_value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerCreate {
    pub space: String,
    pub external_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_for: Option<UsedFor>,
    pub properties: BTreeMap<String, ContainerPropertyDefinition>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub constraints: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub indexes: BTreeMap<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub space: String,
    pub external_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub used_for: UsedFor,
    pub properties: BTreeMap<String, ContainerPropertyDefinition>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub constraints: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub indexes: BTreeMap<String, Value>,
    #[serde(default)]
    pub is_global: bool,
    pub created_time: i64,
    pub last_updated_time: i64,
}

impl Container {
    pub fn reference(&self) -> ContainerReference {
        ContainerReference::new(self.space.clone(), self.external_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{ContainerPropertyDefinition, EnumValue, PropertyType};
    use serde_json::json;

    #[test]
    fn property_types_use_the_type_tag() {
        let definition: ContainerPropertyDefinition = serde_json::from_value(json!({
            "type": {"type": "direct", "container": {"type": "container", "space": "s", "externalId": "c"}},
            "nullable": true
        }))
        .expect("definition");
        match &definition.r#type {
            PropertyType::Direct { container, list } => {
                assert_eq!(container.as_ref().expect("container").external_id, "c");
                assert!(!list);
            }
            other => panic!("unexpected type: {other:?}"),
        }

        let text = serde_json::to_value(PropertyType::Text {
            list: false,
            collation: None,
        })
        .expect("encode");
        assert_eq!(text, json!({"type": "text", "list": false}));
    }

    #[test]
    fn resource_reference_types_decode() {
        for (tag, expected) in [
            ("timeseries", PropertyType::Timeseries { list: true }),
            ("file", PropertyType::File { list: true }),
            ("sequence", PropertyType::Sequence { list: true }),
        ] {
            let decoded: PropertyType =
                serde_json::from_value(json!({"type": tag, "list": true})).expect(tag);
            assert_eq!(decoded, expected);
            assert_eq!(
                serde_json::to_value(&decoded).expect("encode"),
                json!({"type": tag, "list": true})
            );
        }
    }

    #[test]
    fn enum_type_keeps_values_and_unknown_value() {
        let raw = json!({
            "type": "enum",
            "values": {
                "running": {"name": "Running"},
                "stopped": {"description": "Not spinning"}
            },
            "unknownValue": "stopped"
        });
        let decoded: PropertyType = serde_json::from_value(raw.clone()).expect("enum");
        match &decoded {
            PropertyType::Enum {
                values,
                unknown_value,
            } => {
                assert_eq!(values.len(), 2);
                assert_eq!(
                    values["running"],
                    EnumValue {
                        name: Some("Running".to_string()),
                        description: None,
                    }
                );
                assert_eq!(unknown_value.as_deref(), Some("stopped"));
            }
            other => panic!("unexpected type: {other:?}"),
        }
        assert_eq!(serde_json::to_value(&decoded).expect("encode"), raw);
    }
}
