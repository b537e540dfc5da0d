//! Purpose: View DTOs, including the untagged view-property union.
//! Exports: `View`, `ViewCreate`, `ViewProperty`, `MappedProperty`, `ConnectionProperty`,
//! `ReverseDirectRelationProperty`, `ThroughReference`, `VIEW_PROPERTY`.
//! Invariants: A property with `container` + `containerPropertyIdentifier` is mapped;
//! one with `type` + `source` is an edge connection; one with `source` + `through` is a
//! reverse direct relation. Registered in that order.

use super::container::{PropertyType, UsedFor};
use super::reference::{
    ContainerReference, DirectRelationReference, SourceReference, ViewReference,
};
use crate::core::union::{self, DecodeError, Fields, JsonKind, Property, Union, Variant};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// View property backed by a container property.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedProperty {
    pub container: ContainerReference,
    pub container_property_identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Target view for direct relations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ViewReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_increment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub immutable: Option<bool>,
    /// `Value::Null` when unset.
    #[serde(skip_serializing_if = "Value::is_null")]
    pub default_value: Value,
}

impl MappedProperty {
    pub fn new(container: ContainerReference, identifier: impl Into<String>) -> Self {
        Self {
            container,
            container_property_identifier: identifier.into(),
            name: None,
            description: None,
            source: None,
            r#type: None,
            nullable: None,
            auto_increment: None,
            immutable: None,
            default_value: Value::Null,
        }
    }
}

/// Edge connection to another view.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionProperty {
    pub r#type: DirectRelationReference,
    pub source: ViewReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_source: Option<ViewReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Direct-relation property that a reverse relation walks backwards.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ThroughReference {
    pub source: SourceReference,
    pub identifier: String,
}

/// Nodes in `source` whose `through` direct relation points at this node.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseDirectRelationProperty {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
    pub source: ViewReference,
    pub through: ThroughReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViewProperty {
    Mapped(MappedProperty),
    Connection(ConnectionProperty),
    ReverseDirectRelation(ReverseDirectRelationProperty),
}

impl ViewProperty {
    pub fn variant_name(&self) -> &'static str {
        match self {
            ViewProperty::Mapped(_) => "Mapped",
            ViewProperty::Connection(_) => "Connection",
            ViewProperty::ReverseDirectRelation(_) => "ReverseDirectRelation",
        }
    }
}

const MAPPED: &[Property] = &[
    Property::required("container", JsonKind::Object),
    Property::required("containerPropertyIdentifier", JsonKind::String),
    Property::optional("name", JsonKind::String),
    Property::optional("description", JsonKind::String),
    Property::optional("source", JsonKind::Object),
    Property::optional("type", JsonKind::Object),
    Property::optional("nullable", JsonKind::Bool),
    Property::optional("autoIncrement", JsonKind::Bool),
    Property::optional("immutable", JsonKind::Bool),
    Property::optional("defaultValue", JsonKind::Any),
];

const CONNECTION: &[Property] = &[
    Property::required("type", JsonKind::Object),
    Property::required("source", JsonKind::Object),
    Property::optional("connectionType", JsonKind::String),
    Property::optional("edgeSource", JsonKind::Object),
    Property::optional("direction", JsonKind::String),
    Property::optional("name", JsonKind::String),
    Property::optional("description", JsonKind::String),
];

fn build_mapped(fields: &Fields<'_>) -> Result<ViewProperty, DecodeError> {
    Ok(ViewProperty::Mapped(MappedProperty {
        container: fields.required("container")?,
        container_property_identifier: fields.required("containerPropertyIdentifier")?,
        name: fields.optional("name")?,
        description: fields.optional("description")?,
        source: fields.optional("source")?,
        r#type: fields.optional("type")?,
        nullable: fields.optional("nullable")?,
        auto_increment: fields.optional("autoIncrement")?,
        immutable: fields.optional("immutable")?,
        default_value: fields.optional_or_default("defaultValue")?,
    }))
}

fn build_connection(fields: &Fields<'_>) -> Result<ViewProperty, DecodeError> {
    Ok(ViewProperty::Connection(ConnectionProperty {
        r#type: fields.required("type")?,
        source: fields.required("source")?,
        connection_type: fields.optional("connectionType")?,
        edge_source: fields.optional("edgeSource")?,
        direction: fields.optional("direction")?,
        name: fields.optional("name")?,
        description: fields.optional("description")?,
    }))
}

const REVERSE_DIRECT_RELATION: &[Property] = &[
    Property::required("source", JsonKind::Object),
    Property::required("through", JsonKind::Object),
    Property::optional("connectionType", JsonKind::String),
    Property::optional("name", JsonKind::String),
    Property::optional("description", JsonKind::String),
];

fn build_reverse_direct_relation(fields: &Fields<'_>) -> Result<ViewProperty, DecodeError> {
    Ok(ViewProperty::ReverseDirectRelation(ReverseDirectRelationProperty {
        connection_type: fields.optional("connectionType")?,
        source: fields.required("source")?,
        through: fields.required("through")?,
        name: fields.optional("name")?,
        description: fields.optional("description")?,
    }))
}

pub static VIEW_PROPERTY: Union<ViewProperty> = Union::new(
    "ViewProperty",
    &[
        Variant::new("Mapped", MAPPED, build_mapped),
        Variant::new("Connection", CONNECTION, build_connection),
        Variant::new(
            "ReverseDirectRelation",
            REVERSE_DIRECT_RELATION,
            build_reverse_direct_relation,
        ),
    ],
);

impl<'de> Deserialize<'de> for ViewProperty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        union::deserialize_with(deserializer, &VIEW_PROPERTY)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewCreate {
    pub space: String,
    pub external_id: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<ViewReference>,
    pub properties: BTreeMap<String, ViewProperty>,
}

impl ViewCreate {
    pub fn reference(&self) -> ViewReference {
        ViewReference::new(
            self.space.clone(),
            self.external_id.clone(),
            self.version.clone(),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub space: String,
    pub external_id: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<ViewReference>,
    #[serde(default)]
    pub writable: bool,
    #[serde(default)]
    pub used_for: UsedFor,
    #[serde(default)]
    pub is_global: bool,
    pub properties: BTreeMap<String, ViewProperty>,
    #[serde(default)]
    pub created_time: i64,
    #[serde(default)]
    pub last_updated_time: i64,
}

impl View {
    pub fn reference(&self) -> ViewReference {
        ViewReference::new(
            self.space.clone(),
            self.external_id.clone(),
            self.version.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{MappedProperty, View, ViewProperty};
    use crate::dto::models::{ContainerReference, SourceReference};
    use serde_json::json;

    #[test]
    fn properties_decode_by_shape() {
        let view: View = serde_json::from_value(json!({
            "space": "plant",
            "externalId": "Pump",
            "version": "v1",
            "properties": {
                "name": {
                    "container": {"type": "container", "space": "plant", "externalId": "PumpData"},
                    "containerPropertyIdentifier": "name",
                    "type": {"type": "text"}
                },
                "parts": {
                    "connectionType": "multi_edge_connection",
                    "type": {"space": "plant", "externalId": "Pump.parts"},
                    "source": {"type": "view", "space": "plant", "externalId": "Part", "version": "v1"},
                    "direction": "outwards"
                }
            },
            "createdTime": 1,
            "lastUpdatedTime": 2
        }))
        .expect("view");

        assert_eq!(view.properties["name"].variant_name(), "Mapped");
        match &view.properties["parts"] {
            ViewProperty::Connection(connection) => {
                assert_eq!(connection.source.external_id, "Part");
                assert_eq!(connection.direction.as_deref(), Some("outwards"));
            }
            other => panic!("unexpected property: {other:?}"),
        }
    }

    #[test]
    fn unrecognized_property_lists_every_shape() {
        let err = serde_json::from_value::<ViewProperty>(json!({"name": "loose"}))
            .expect_err("err");
        assert_eq!(
            err.to_string(),
            "ViewProperty: no variant matched properties [name]; required: \
             Mapped [container, containerPropertyIdentifier], Connection [type, source], \
             ReverseDirectRelation [source, through]"
        );
    }

    #[test]
    fn reverse_direct_relations_decode_without_type() {
        let view: View = serde_json::from_value(json!({
            "space": "cdf_cdm",
            "externalId": "CogniteAsset",
            "version": "v1",
            "properties": {
                "children": {
                    "connectionType": "multi_reverse_direct_relation",
                    "source": {"type": "view", "space": "cdf_cdm", "externalId": "CogniteAsset", "version": "v1"},
                    "through": {
                        "source": {"type": "container", "space": "cdf_cdm", "externalId": "CogniteAsset"},
                        "identifier": "parent"
                    }
                }
            }
        }))
        .expect("view");

        match &view.properties["children"] {
            ViewProperty::ReverseDirectRelation(reverse) => {
                assert_eq!(
                    reverse.connection_type.as_deref(),
                    Some("multi_reverse_direct_relation")
                );
                assert_eq!(reverse.through.identifier, "parent");
                assert_eq!(
                    reverse.through.source,
                    SourceReference::Container(ContainerReference::new("cdf_cdm", "CogniteAsset"))
                );
            }
            other => panic!("unexpected property: {other:?}"),
        }
    }

    #[test]
    fn mapped_default_value_is_omitted_when_null() {
        let property = MappedProperty::new(ContainerReference::new("plant", "PumpData"), "rpm");
        assert_eq!(
            serde_json::to_value(ViewProperty::Mapped(property)).expect("encode"),
            json!({
                "container": {"type": "container", "space": "plant", "externalId": "PumpData"},
                "containerPropertyIdentifier": "rpm"
            })
        );
    }
}
