use super::client::{ApiResult, CogniteClient};
use crate::dto::common::{Identity, Items, ItemsWithCursor, ItemsWithIgnoreUnknownIds};
use crate::dto::query::NoParams;
use crate::dto::timeseries::{TimeSeries, TimeSeriesCreate, TimeSeriesQuery};

/// Time series metadata calls (`/timeseries`). Datapoints are not wrapped.
pub struct TimeSeriesResource<'a> {
    client: &'a CogniteClient,
}

impl<'a> TimeSeriesResource<'a> {
    pub(crate) fn new(client: &'a CogniteClient) -> Self {
        Self { client }
    }

    pub fn create(&self, items: &[TimeSeriesCreate]) -> ApiResult<Vec<TimeSeries>> {
        let created: Items<TimeSeries> = self
            .client
            .post_json(&["timeseries"], &Items::new(items.iter().collect::<Vec<_>>()))?;
        Ok(created.items)
    }

    pub fn list(&self, query: &TimeSeriesQuery) -> ApiResult<ItemsWithCursor<TimeSeries>> {
        self.client.post_json(&["timeseries", "list"], query)
    }

    pub fn retrieve(
        &self,
        ids: &[Identity],
        ignore_unknown_ids: bool,
    ) -> ApiResult<Vec<TimeSeries>> {
        let body = ItemsWithIgnoreUnknownIds::new(ids.to_vec(), ignore_unknown_ids);
        let found: Items<TimeSeries> = self.client.post_json(&["timeseries", "byids"], &body)?;
        Ok(found.items)
    }

    pub fn delete(&self, ids: &[Identity], ignore_unknown_ids: bool) -> ApiResult<()> {
        let body = ItemsWithIgnoreUnknownIds::new(ids.to_vec(), ignore_unknown_ids);
        self.client
            .post_empty(&["timeseries", "delete"], &NoParams, &body)
    }
}
