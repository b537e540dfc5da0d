//! Purpose: Typed references between data-modeling resources.
//! Exports: `ViewReference`, `ContainerReference`, `SourceReference`, `DirectRelationReference`,
//! `ViewId`, `DataModelId`.
//! Invariants: View and container references always write their `"type"` marker;
//! reads ignore it so bare `{space, externalId}` objects are accepted too.
//! Invariants: `ViewId` and `DataModelId` never carry a `"type"` marker (byids item schema).

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Clone, Debug, Eq, Hash, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewReference {
    pub space: String,
    pub external_id: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl ViewReference {
    pub fn new(
        space: impl Into<String>,
        external_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            space: space.into(),
            external_id: external_id.into(),
            version: Some(version.into()),
        }
    }
}

impl Serialize for ViewReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_reference(
            serializer,
            "view",
            &self.space,
            &self.external_id,
            self.version.as_deref(),
        )
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerReference {
    pub space: String,
    pub external_id: String,
}

impl ContainerReference {
    pub fn new(space: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            space: space.into(),
            external_id: external_id.into(),
        }
    }
}

impl Serialize for ContainerReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_reference(serializer, "container", &self.space, &self.external_id, None)
    }
}

/// View or container named by its `"type"` marker.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SourceReference {
    View(ViewReference),
    Container(ContainerReference),
}

impl Serialize for SourceReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SourceReference::View(view) => view.serialize(serializer),
            SourceReference::Container(container) => container.serialize(serializer),
        }
    }
}

/// Node identifier used as an edge type or direct-relation value.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectRelationReference {
    pub space: String,
    pub external_id: String,
}

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataModelId {
    pub space: String,
    pub external_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewId {
    pub space: String,
    pub external_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ViewId {
    pub fn new(
        space: impl Into<String>,
        external_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            space: space.into(),
            external_id: external_id.into(),
            version: Some(version.into()),
        }
    }
}

impl From<ViewReference> for ViewId {
    fn from(reference: ViewReference) -> Self {
        Self {
            space: reference.space,
            external_id: reference.external_id,
            version: reference.version,
        }
    }
}

fn serialize_reference<S: Serializer>(
    serializer: S,
    kind: &'static str,
    space: &str,
    external_id: &str,
    version: Option<&str>,
) -> Result<S::Ok, S::Error> {
    let len = if version.is_some() { 4 } else { 3 };
    let mut state = serializer.serialize_struct("Reference", len)?;
    state.serialize_field("type", kind)?;
    state.serialize_field("space", space)?;
    state.serialize_field("externalId", external_id)?;
    match version {
        Some(version) => state.serialize_field("version", version)?,
        None => state.skip_field("version")?,
    }
    state.end()
}
