//! Purpose: File metadata and download-link calls (`/files`).
//! Exports: `Files`.
//! Notes: Content upload is not wrapped; only metadata and signed download URLs are.

use super::client::{ApiResult, CogniteClient};
use crate::dto::common::{Identity, Items, ItemsWithCursor, ItemsWithIgnoreUnknownIds};
use crate::dto::files::{FileDownloadLink, FileMetadata, FileQuery};
use crate::dto::query::NoParams;

pub struct Files<'a> {
    client: &'a CogniteClient,
}

impl<'a> Files<'a> {
    pub(crate) fn new(client: &'a CogniteClient) -> Self {
        Self { client }
    }

    pub fn list(&self, query: &FileQuery) -> ApiResult<ItemsWithCursor<FileMetadata>> {
        self.client.post_json(&["files", "list"], query)
    }

    pub fn retrieve(
        &self,
        ids: &[Identity],
        ignore_unknown_ids: bool,
    ) -> ApiResult<Vec<FileMetadata>> {
        let body = ItemsWithIgnoreUnknownIds::new(ids.to_vec(), ignore_unknown_ids);
        let found: Items<FileMetadata> = self.client.post_json(&["files", "byids"], &body)?;
        Ok(found.items)
    }

    /// Signed, short-lived URLs for each file; each link echoes the identity it was asked with.
    pub fn download_links(&self, ids: &[Identity]) -> ApiResult<Vec<FileDownloadLink>> {
        let links: Items<FileDownloadLink> = self
            .client
            .post_json(&["files", "downloadlink"], &Items::new(ids.to_vec()))?;
        Ok(links.items)
    }

    pub fn delete(&self, ids: &[Identity]) -> ApiResult<()> {
        self.client
            .post_empty(&["files", "delete"], &NoParams, &Items::new(ids.to_vec()))
    }
}
