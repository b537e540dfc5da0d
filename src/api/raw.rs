//! Purpose: Raw database, table, and row calls (`/raw/dbs`).
//! Exports: `Raw`.
//! Invariants: Database and table names are path segments and are percent-encoded as such.

use super::client::{ApiResult, CogniteClient};
use crate::dto::common::{Items, ItemsWithCursor};
use crate::dto::query::{NoParams, QueryPairs, QueryParams};
use crate::dto::raw::{
    RawDatabase, RawListQuery, RawRow, RawRowCreate, RawRowKey, RawRowsQuery, RawTable,
};

pub struct Raw<'a> {
    client: &'a CogniteClient,
}

struct InsertRowsQuery {
    ensure_parent: bool,
}

impl QueryParams for InsertRowsQuery {
    fn to_query_params(&self) -> Vec<(&'static str, String)> {
        QueryPairs::new()
            .push("ensureParent", self.ensure_parent.then_some(true))
            .finish()
    }
}

impl<'a> Raw<'a> {
    pub(crate) fn new(client: &'a CogniteClient) -> Self {
        Self { client }
    }

    pub fn list_databases(&self, query: &RawListQuery) -> ApiResult<ItemsWithCursor<RawDatabase>> {
        self.client.get_json(&["raw", "dbs"], query)
    }

    pub fn create_databases(&self, names: &[String]) -> ApiResult<Vec<RawDatabase>> {
        let items: Vec<RawDatabase> = names
            .iter()
            .map(|name| RawDatabase { name: name.clone() })
            .collect();
        let created: Items<RawDatabase> =
            self.client.post_json(&["raw", "dbs"], &Items::new(items))?;
        Ok(created.items)
    }

    pub fn list_tables(
        &self,
        database: &str,
        query: &RawListQuery,
    ) -> ApiResult<ItemsWithCursor<RawTable>> {
        self.client.get_json(&["raw", "dbs", database, "tables"], query)
    }

    pub fn list_rows(
        &self,
        database: &str,
        table: &str,
        query: &RawRowsQuery,
    ) -> ApiResult<ItemsWithCursor<RawRow>> {
        self.client
            .get_json(&["raw", "dbs", database, "tables", table, "rows"], query)
    }

    /// Upserts rows; with `ensure_parent` the database and table are created when missing.
    pub fn insert_rows(
        &self,
        database: &str,
        table: &str,
        rows: &[RawRowCreate],
        ensure_parent: bool,
    ) -> ApiResult<()> {
        self.client.post_empty(
            &["raw", "dbs", database, "tables", table, "rows"],
            &InsertRowsQuery { ensure_parent },
            &Items::new(rows.iter().collect::<Vec<_>>()),
        )
    }

    pub fn delete_rows(&self, database: &str, table: &str, keys: &[String]) -> ApiResult<()> {
        let items: Vec<RawRowKey> = keys
            .iter()
            .map(|key| RawRowKey { key: key.clone() })
            .collect();
        self.client.post_empty(
            &["raw", "dbs", database, "tables", table, "rows", "delete"],
            &NoParams,
            &Items::new(items),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::InsertRowsQuery;
    use crate::dto::query::QueryParams;

    #[test]
    fn ensure_parent_is_sent_only_when_requested() {
        assert!(InsertRowsQuery { ensure_parent: false }.to_query_params().is_empty());
        assert_eq!(
            InsertRowsQuery { ensure_parent: true }.to_query_params(),
            vec![("ensureParent", "true".to_string())]
        );
    }
}
