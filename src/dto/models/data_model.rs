//! Purpose: Data model DTOs whose `views` list mixes full views and bare references.
//! Exports: `DataModel`, `DataModelCreate`, `ViewOrReference`, `ViewCreateOrReference`,
//! `VIEW_OR_REFERENCE`, `VIEW_CREATE_OR_REFERENCE`.
//! Invariants: Full definitions are registered before references, so an entry carrying
//! `properties` always decodes as a definition even though it also satisfies the reference.

use super::reference::{DataModelId, ViewReference};
use super::view::{View, ViewCreate};
use crate::core::union::{self, DecodeError, Fields, JsonKind, Property, Union, Variant};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViewOrReference {
    View(Box<View>),
    Reference(ViewReference),
}

impl ViewOrReference {
    pub fn variant_name(&self) -> &'static str {
        match self {
            ViewOrReference::View(_) => "View",
            ViewOrReference::Reference(_) => "Reference",
        }
    }

    pub fn space(&self) -> &str {
        match self {
            ViewOrReference::View(view) => &view.space,
            ViewOrReference::Reference(reference) => &reference.space,
        }
    }

    pub fn external_id(&self) -> &str {
        match self {
            ViewOrReference::View(view) => &view.external_id,
            ViewOrReference::Reference(reference) => &reference.external_id,
        }
    }

    pub fn version(&self) -> Option<&str> {
        match self {
            ViewOrReference::View(view) => Some(&view.version),
            ViewOrReference::Reference(reference) => reference.version.as_deref(),
        }
    }

    pub fn as_view(&self) -> Option<&View> {
        match self {
            ViewOrReference::View(view) => Some(view.as_ref()),
            ViewOrReference::Reference(_) => None,
        }
    }

    pub fn reference(&self) -> ViewReference {
        match self {
            ViewOrReference::View(view) => view.reference(),
            ViewOrReference::Reference(reference) => reference.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViewCreateOrReference {
    Definition(Box<ViewCreate>),
    Reference(ViewReference),
}

impl ViewCreateOrReference {
    pub fn variant_name(&self) -> &'static str {
        match self {
            ViewCreateOrReference::Definition(_) => "Definition",
            ViewCreateOrReference::Reference(_) => "Reference",
        }
    }
}

impl From<ViewCreate> for ViewCreateOrReference {
    fn from(view: ViewCreate) -> Self {
        ViewCreateOrReference::Definition(Box::new(view))
    }
}

impl From<ViewReference> for ViewCreateOrReference {
    fn from(reference: ViewReference) -> Self {
        ViewCreateOrReference::Reference(reference)
    }
}

const VIEW_DEFINITION: &[Property] = &[
    Property::required("space", JsonKind::String),
    Property::required("externalId", JsonKind::String),
    Property::required("version", JsonKind::String),
    Property::required("properties", JsonKind::Object),
    Property::optional("name", JsonKind::String),
    Property::optional("description", JsonKind::String),
    Property::optional("filter", JsonKind::Object),
    Property::optional("implements", JsonKind::Array),
    Property::optional("writable", JsonKind::Bool),
    Property::optional("usedFor", JsonKind::String),
    Property::optional("isGlobal", JsonKind::Bool),
    Property::optional("createdTime", JsonKind::Number),
    Property::optional("lastUpdatedTime", JsonKind::Number),
];

const VIEW_CREATE_DEFINITION: &[Property] = &[
    Property::required("space", JsonKind::String),
    Property::required("externalId", JsonKind::String),
    Property::required("version", JsonKind::String),
    Property::required("properties", JsonKind::Object),
    Property::optional("name", JsonKind::String),
    Property::optional("description", JsonKind::String),
    Property::optional("filter", JsonKind::Object),
    Property::optional("implements", JsonKind::Array),
];

const VIEW_REFERENCE: &[Property] = &[
    Property::required("space", JsonKind::String),
    Property::required("externalId", JsonKind::String),
    Property::optional("version", JsonKind::String),
];

fn build_view(fields: &Fields<'_>) -> Result<ViewOrReference, DecodeError> {
    Ok(ViewOrReference::View(Box::new(View {
        space: fields.required("space")?,
        external_id: fields.required("externalId")?,
        version: fields.required("version")?,
        name: fields.optional("name")?,
        description: fields.optional("description")?,
        filter: fields.optional("filter")?,
        implements: fields.optional_or_default("implements")?,
        writable: fields.optional_or_default("writable")?,
        used_for: fields.optional_or_default("usedFor")?,
        is_global: fields.optional_or_default("isGlobal")?,
        properties: fields.required("properties")?,
        created_time: fields.optional_or_default("createdTime")?,
        last_updated_time: fields.optional_or_default("lastUpdatedTime")?,
    })))
}

fn build_view_create(fields: &Fields<'_>) -> Result<ViewCreateOrReference, DecodeError> {
    Ok(ViewCreateOrReference::Definition(Box::new(ViewCreate {
        space: fields.required("space")?,
        external_id: fields.required("externalId")?,
        version: fields.required("version")?,
        name: fields.optional("name")?,
        description: fields.optional("description")?,
        filter: fields.optional("filter")?,
        implements: fields.optional_or_default("implements")?,
        properties: fields.required("properties")?,
    })))
}

fn view_reference(fields: &Fields<'_>) -> Result<ViewReference, DecodeError> {
    Ok(ViewReference {
        space: fields.required("space")?,
        external_id: fields.required("externalId")?,
        version: fields.optional("version")?,
    })
}

fn build_view_reference(fields: &Fields<'_>) -> Result<ViewOrReference, DecodeError> {
    view_reference(fields).map(ViewOrReference::Reference)
}

fn build_view_create_reference(
    fields: &Fields<'_>,
) -> Result<ViewCreateOrReference, DecodeError> {
    view_reference(fields).map(ViewCreateOrReference::Reference)
}

pub static VIEW_OR_REFERENCE: Union<ViewOrReference> = Union::new(
    "ViewOrReference",
    &[
        Variant::new("View", VIEW_DEFINITION, build_view),
        Variant::new("Reference", VIEW_REFERENCE, build_view_reference),
    ],
);

pub static VIEW_CREATE_OR_REFERENCE: Union<ViewCreateOrReference> = Union::new(
    "ViewCreateOrReference",
    &[
        Variant::new("Definition", VIEW_CREATE_DEFINITION, build_view_create),
        Variant::new("Reference", VIEW_REFERENCE, build_view_create_reference),
    ],
);

impl<'de> Deserialize<'de> for ViewOrReference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        union::deserialize_with(deserializer, &VIEW_OR_REFERENCE)
    }
}

impl<'de> Deserialize<'de> for ViewCreateOrReference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        union::deserialize_with(deserializer, &VIEW_CREATE_OR_REFERENCE)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataModelCreate {
    pub space: String,
    pub external_id: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub views: Vec<ViewCreateOrReference>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataModel {
    pub space: String,
    pub external_id: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub views: Vec<ViewOrReference>,
    #[serde(default)]
    pub is_global: bool,
    #[serde(default)]
    pub created_time: i64,
    #[serde(default)]
    pub last_updated_time: i64,
}

impl DataModel {
    pub fn id(&self) -> DataModelId {
        DataModelId {
            space: self.space.clone(),
            external_id: self.external_id.clone(),
            version: Some(self.version.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DataModel, ViewCreateOrReference, ViewOrReference};
    use crate::dto::models::reference::ViewReference;
    use serde_json::json;

    #[test]
    fn views_mix_definitions_and_references() {
        let model: DataModel = serde_json::from_value(json!({
            "space": "plant",
            "externalId": "Plant",
            "version": "1",
            "views": [
                {"space": "plant", "externalId": "Pump", "version": "v1", "properties": {}},
                {"type": "view", "space": "cdf_cdm", "externalId": "CogniteAsset", "version": "v1"}
            ]
        }))
        .expect("model");

        let names: Vec<&str> = model.views.iter().map(ViewOrReference::variant_name).collect();
        assert_eq!(names, ["View", "Reference"]);
        assert_eq!(model.views[1].external_id(), "CogniteAsset");
        assert!(model.views[1].as_view().is_none());
        assert_eq!(model.views[0].version(), Some("v1"));
    }

    #[test]
    fn reference_serializes_back_to_reference() {
        let entry = ViewCreateOrReference::from(ViewReference::new("plant", "Pump", "v1"));
        let value = serde_json::to_value(&entry).expect("encode");
        let decoded: ViewCreateOrReference = serde_json::from_value(value).expect("decode");
        assert_eq!(decoded, entry);
    }

    #[test]
    fn view_with_bad_version_type_reports_mismatch() {
        let err = serde_json::from_value::<ViewOrReference>(json!({
            "space": "plant",
            "externalId": "Pump",
            "version": 3,
            "properties": {}
        }))
        .expect_err("err");
        assert_eq!(
            err.to_string(),
            "View.version: expected string, found number"
        );
    }
}
