//! List options for the `/models/*` endpoints.

use crate::dto::query::{QueryPairs, QueryParams};

#[derive(Clone, Debug, Default)]
pub struct SpaceQuery {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
    pub include_global: Option<bool>,
}

impl QueryParams for SpaceQuery {
    fn to_query_params(&self) -> Vec<(&'static str, String)> {
        QueryPairs::new()
            .push("limit", self.limit)
            .push("cursor", self.cursor.as_ref())
            .push("includeGlobal", self.include_global)
            .finish()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ContainerQuery {
    pub space: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
    pub include_global: Option<bool>,
}

impl QueryParams for ContainerQuery {
    fn to_query_params(&self) -> Vec<(&'static str, String)> {
        QueryPairs::new()
            .push("space", self.space.as_ref())
            .push("limit", self.limit)
            .push("cursor", self.cursor.as_ref())
            .push("includeGlobal", self.include_global)
            .finish()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ViewQuery {
    pub space: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
    pub include_global: Option<bool>,
    pub include_inherited_properties: Option<bool>,
    pub all_versions: Option<bool>,
}

impl QueryParams for ViewQuery {
    fn to_query_params(&self) -> Vec<(&'static str, String)> {
        QueryPairs::new()
            .push("space", self.space.as_ref())
            .push("limit", self.limit)
            .push("cursor", self.cursor.as_ref())
            .push("includeGlobal", self.include_global)
            .push(
                "includeInheritedProperties",
                self.include_inherited_properties,
            )
            .push("allVersions", self.all_versions)
            .finish()
    }
}

#[derive(Clone, Debug, Default)]
pub struct DataModelQuery {
    pub space: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
    pub include_global: Option<bool>,
    /// Expand views inline instead of returning references.
    pub inline_views: Option<bool>,
    pub all_versions: Option<bool>,
}

impl QueryParams for DataModelQuery {
    fn to_query_params(&self) -> Vec<(&'static str, String)> {
        QueryPairs::new()
            .push("space", self.space.as_ref())
            .push("limit", self.limit)
            .push("cursor", self.cursor.as_ref())
            .push("includeGlobal", self.include_global)
            .push("inlineViews", self.inline_views)
            .push("allVersions", self.all_versions)
            .finish()
    }
}
