//! Purpose: Data-modeling calls for spaces, containers, views, and data models (`/models`).
//! Exports: `DataModels`.
//! Role: Apply (create-or-update), list, and retrieve by id; responses flow through the
//! untagged unions in `dto::models` (view properties, view-or-reference entries).
//! Invariants: `inline_views` on data-model reads decides whether `views` holds full views
//! or references; both shapes decode either way.

use super::client::{ApiResult, CogniteClient};
use crate::dto::common::{Items, ItemsWithCursor};
use crate::dto::models::{
    Container, ContainerCreate, ContainerQuery, DataModel, DataModelCreate, DataModelId,
    DataModelQuery, Space, SpaceCreate, SpaceQuery, View, ViewCreate, ViewId, ViewQuery,
};
use crate::dto::query::{QueryPairs, QueryParams};

pub struct DataModels<'a> {
    client: &'a CogniteClient,
}

struct ByIdsQuery {
    name: &'static str,
    value: bool,
}

impl QueryParams for ByIdsQuery {
    fn to_query_params(&self) -> Vec<(&'static str, String)> {
        QueryPairs::new().push(self.name, Some(self.value)).finish()
    }
}

impl<'a> DataModels<'a> {
    pub(crate) fn new(client: &'a CogniteClient) -> Self {
        Self { client }
    }

    pub fn apply_spaces(&self, spaces: &[SpaceCreate]) -> ApiResult<Vec<Space>> {
        let applied: Items<Space> = self
            .client
            .post_json(&["models", "spaces"], &Items::new(spaces.to_vec()))?;
        Ok(applied.items)
    }

    pub fn list_spaces(&self, query: &SpaceQuery) -> ApiResult<ItemsWithCursor<Space>> {
        self.client.get_json(&["models", "spaces"], query)
    }

    pub fn apply_containers(&self, containers: &[ContainerCreate]) -> ApiResult<Vec<Container>> {
        let applied: Items<Container> = self
            .client
            .post_json(&["models", "containers"], &Items::new(containers.to_vec()))?;
        Ok(applied.items)
    }

    pub fn list_containers(
        &self,
        query: &ContainerQuery,
    ) -> ApiResult<ItemsWithCursor<Container>> {
        self.client.get_json(&["models", "containers"], query)
    }

    pub fn apply_views(&self, views: &[ViewCreate]) -> ApiResult<Vec<View>> {
        let applied: Items<View> = self
            .client
            .post_json(&["models", "views"], &Items::new(views.to_vec()))?;
        Ok(applied.items)
    }

    pub fn list_views(&self, query: &ViewQuery) -> ApiResult<ItemsWithCursor<View>> {
        self.client.get_json(&["models", "views"], query)
    }

    pub fn retrieve_views(
        &self,
        ids: &[ViewId],
        include_inherited_properties: bool,
    ) -> ApiResult<Vec<View>> {
        let query = ByIdsQuery {
            name: "includeInheritedProperties",
            value: include_inherited_properties,
        };
        let found: Items<View> = self.client.post_json_with(
            &["models", "views", "byids"],
            &query,
            &Items::new(ids.to_vec()),
        )?;
        Ok(found.items)
    }

    pub fn apply_data_models(&self, models: &[DataModelCreate]) -> ApiResult<Vec<DataModel>> {
        let applied: Items<DataModel> = self
            .client
            .post_json(&["models", "datamodels"], &Items::new(models.to_vec()))?;
        Ok(applied.items)
    }

    pub fn list_data_models(
        &self,
        query: &DataModelQuery,
    ) -> ApiResult<ItemsWithCursor<DataModel>> {
        self.client.get_json(&["models", "datamodels"], query)
    }

    pub fn retrieve_data_models(
        &self,
        ids: &[DataModelId],
        inline_views: bool,
    ) -> ApiResult<Vec<DataModel>> {
        let query = ByIdsQuery {
            name: "inlineViews",
            value: inline_views,
        };
        let found: Items<DataModel> = self.client.post_json_with(
            &["models", "datamodels", "byids"],
            &query,
            &Items::new(ids.to_vec()),
        )?;
        Ok(found.items)
    }
}
