//! Purpose: Query a data model through its generated GraphQL endpoint.
//! Exports: `GraphQl`.

use super::client::{ApiResult, CogniteClient};
use crate::dto::graphql::{GraphQlQuery, GraphQlResponse};
use serde_json::Value;

pub struct GraphQl<'a> {
    client: &'a CogniteClient,
}

impl<'a> GraphQl<'a> {
    pub(crate) fn new(client: &'a CogniteClient) -> Self {
        Self { client }
    }

    /// GraphQL-level errors come back inside the response, not as `Err`.
    pub fn query(
        &self,
        space: &str,
        external_id: &str,
        version: &str,
        query: &GraphQlQuery,
    ) -> ApiResult<GraphQlResponse<Value>> {
        self.client.post_json(
            &[
                "userapis",
                "spaces",
                space,
                "datamodels",
                external_id,
                "versions",
                version,
                "graphql",
            ],
            query,
        )
    }
}
