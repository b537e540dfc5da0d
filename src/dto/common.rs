//! Purpose: Shared request/response envelopes and identity types used by every resource.
//! Exports: `Items`, `ItemsWithCursor`, `ItemsWithIgnoreUnknownIds`, `Identity`, `InstanceId`,
//! `TimeRange`, `format_timestamp_ms`.
//! Role: Wire shapes common to CDF list, create, retrieve, and delete calls.
//! Invariants: Timestamps are epoch milliseconds (UTC) on the wire.
//! Invariants: `Identity` decodes through the untagged-union decoder (`id` wins over `externalId`).

use crate::core::union::{self, DecodeError, Fields, JsonKind, Property, Union, Variant};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub type Metadata = BTreeMap<String, String>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Items<T> {
    pub items: Vec<T>,
}

impl<T> Items<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsWithCursor<T> {
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsWithIgnoreUnknownIds<T> {
    pub items: Vec<T>,
    pub ignore_unknown_ids: bool,
}

impl<T> ItemsWithIgnoreUnknownIds<T> {
    pub fn new(items: Vec<T>, ignore_unknown_ids: bool) -> Self {
        Self {
            items,
            ignore_unknown_ids,
        }
    }
}

/// Inclusive epoch-millisecond range filter.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceId {
    pub space: String,
    pub external_id: String,
}

/// Reference to a single resource by internal id, external id, or instance id.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Identity {
    Id(i64),
    ExternalId(String),
    InstanceId(InstanceId),
}

impl Identity {
    pub fn id(id: i64) -> Self {
        Identity::Id(id)
    }

    pub fn external_id(external_id: impl Into<String>) -> Self {
        Identity::ExternalId(external_id.into())
    }

    /// Writes the single identifying key into an enclosing map.
    pub(crate) fn serialize_entry<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        match self {
            Identity::Id(id) => map.serialize_entry("id", id),
            Identity::ExternalId(external_id) => map.serialize_entry("externalId", external_id),
            Identity::InstanceId(instance_id) => map.serialize_entry("instanceId", instance_id),
        }
    }

    /// Numeric input becomes an internal id, anything else an external id.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(id) => Identity::Id(id),
            Err(_) => Identity::ExternalId(raw.to_string()),
        }
    }
}

const IDENTITY_ID: &[Property] = &[Property::required("id", JsonKind::Number)];
const IDENTITY_EXTERNAL_ID: &[Property] = &[Property::required("externalId", JsonKind::String)];
const IDENTITY_INSTANCE_ID: &[Property] = &[Property::required("instanceId", JsonKind::Object)];

fn build_id(fields: &Fields<'_>) -> Result<Identity, DecodeError> {
    fields.required("id").map(Identity::Id)
}

fn build_external_id(fields: &Fields<'_>) -> Result<Identity, DecodeError> {
    fields.required("externalId").map(Identity::ExternalId)
}

fn build_instance_id(fields: &Fields<'_>) -> Result<Identity, DecodeError> {
    fields.required("instanceId").map(Identity::InstanceId)
}

pub static IDENTITY: Union<Identity> = Union::new(
    "Identity",
    &[
        Variant::new("Id", IDENTITY_ID, build_id),
        Variant::new("ExternalId", IDENTITY_EXTERNAL_ID, build_external_id),
        Variant::new("InstanceId", IDENTITY_INSTANCE_ID, build_instance_id),
    ],
);

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        self.serialize_entry(&mut map)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        union::deserialize_with(deserializer, &IDENTITY)
    }
}

impl From<i64> for Identity {
    fn from(id: i64) -> Self {
        Identity::Id(id)
    }
}

impl From<&str> for Identity {
    fn from(external_id: &str) -> Self {
        Identity::ExternalId(external_id.to_string())
    }
}

impl From<String> for Identity {
    fn from(external_id: String) -> Self {
        Identity::ExternalId(external_id)
    }
}

pub fn format_timestamp_ms(timestamp_ms: i64) -> Option<String> {
    let nanos = i128::from(timestamp_ms) * 1_000_000;
    let ts = OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()?;
    ts.format(&Rfc3339).ok()
}

#[cfg(test)]
mod tests {
    use super::{Identity, InstanceId, Items, ItemsWithCursor, format_timestamp_ms};
    use serde_json::json;

    #[test]
    fn identity_prefers_id_when_both_are_present() {
        let identity: Identity =
            serde_json::from_value(json!({"id": 12, "externalId": "pump-1"})).expect("identity");
        assert_eq!(identity, Identity::Id(12));
    }

    #[test]
    fn identity_round_trips_each_variant() {
        let cases = [
            Identity::Id(42),
            Identity::external_id("pump-1"),
            Identity::InstanceId(InstanceId {
                space: "plant".to_string(),
                external_id: "pump-1".to_string(),
            }),
        ];
        for identity in cases {
            let value = serde_json::to_value(&identity).expect("encode");
            let decoded: Identity = serde_json::from_value(value).expect("decode");
            assert_eq!(decoded, identity);
        }
    }

    #[test]
    fn identity_rejects_unknown_shape() {
        let err = serde_json::from_value::<Identity>(json!({"name": "pump"})).expect_err("err");
        assert!(err.to_string().contains("Identity: no variant matched"));
    }

    #[test]
    fn identity_parse_splits_numeric_and_text() {
        assert_eq!(Identity::parse("17"), Identity::Id(17));
        assert_eq!(Identity::parse("pump-17"), Identity::external_id("pump-17"));
    }

    #[test]
    fn cursor_is_omitted_when_absent() {
        let page = ItemsWithCursor::<u8> {
            items: vec![1],
            next_cursor: None,
        };
        assert_eq!(serde_json::to_value(&page).expect("encode"), json!({"items": [1]}));

        let items: Items<Identity> =
            serde_json::from_value(json!({"items": [{"id": 1}, {"externalId": "a"}]}))
                .expect("items");
        assert_eq!(items.items, vec![Identity::Id(1), Identity::external_id("a")]);
    }

    #[test]
    fn timestamps_render_as_rfc3339() {
        assert_eq!(
            format_timestamp_ms(1_700_000_000_000).as_deref(),
            Some("2023-11-14T22:13:20Z")
        );
    }
}
