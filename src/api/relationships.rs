//! Purpose: Relationship calls (`/relationships`).
//! Exports: `Relationships`.
//! Invariants: Relationships are addressed by external id only.

use super::client::{ApiResult, CogniteClient};
use crate::dto::common::{Identity, Items, ItemsWithCursor, ItemsWithIgnoreUnknownIds};
use crate::dto::query::NoParams;
use crate::dto::relationships::{Relationship, RelationshipCreate, RelationshipQuery};

pub struct Relationships<'a> {
    client: &'a CogniteClient,
}

impl<'a> Relationships<'a> {
    pub(crate) fn new(client: &'a CogniteClient) -> Self {
        Self { client }
    }

    pub fn create(&self, items: &[RelationshipCreate]) -> ApiResult<Vec<Relationship>> {
        let created: Items<Relationship> = self
            .client
            .post_json(&["relationships"], &Items::new(items.iter().collect::<Vec<_>>()))?;
        Ok(created.items)
    }

    pub fn list(&self, query: &RelationshipQuery) -> ApiResult<ItemsWithCursor<Relationship>> {
        self.client.post_json(&["relationships", "list"], query)
    }

    pub fn delete(&self, external_ids: &[String], ignore_unknown_ids: bool) -> ApiResult<()> {
        let ids: Vec<Identity> = external_ids
            .iter()
            .map(|external_id| Identity::external_id(external_id.as_str()))
            .collect();
        let body = ItemsWithIgnoreUnknownIds::new(ids, ignore_unknown_ids);
        self.client
            .post_empty(&["relationships", "delete"], &NoParams, &body)
    }
}
