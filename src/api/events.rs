//! Purpose: Event resource calls (`/events`).
//! Exports: `Events`.

use super::client::{ApiResult, CogniteClient};
use crate::dto::common::{Identity, Items, ItemsWithCursor, ItemsWithIgnoreUnknownIds};
use crate::dto::events::{Event, EventCreate, EventQuery};
use crate::dto::query::NoParams;

pub struct Events<'a> {
    client: &'a CogniteClient,
}

impl<'a> Events<'a> {
    pub(crate) fn new(client: &'a CogniteClient) -> Self {
        Self { client }
    }

    pub fn create(&self, events: &[EventCreate]) -> ApiResult<Vec<Event>> {
        let created: Items<Event> = self
            .client
            .post_json(&["events"], &Items::new(events.iter().collect::<Vec<_>>()))?;
        Ok(created.items)
    }

    /// One page of events matching `query.filter`; follow `next_cursor` for more.
    pub fn list(&self, query: &EventQuery) -> ApiResult<ItemsWithCursor<Event>> {
        self.client.post_json(&["events", "list"], query)
    }

    pub fn retrieve(&self, ids: &[Identity], ignore_unknown_ids: bool) -> ApiResult<Vec<Event>> {
        let body = ItemsWithIgnoreUnknownIds::new(ids.to_vec(), ignore_unknown_ids);
        let found: Items<Event> = self.client.post_json(&["events", "byids"], &body)?;
        Ok(found.items)
    }

    pub fn delete(&self, ids: &[Identity], ignore_unknown_ids: bool) -> ApiResult<()> {
        let body = ItemsWithIgnoreUnknownIds::new(ids.to_vec(), ignore_unknown_ids);
        self.client
            .post_empty(&["events", "delete"], &NoParams, &body)
    }
}
