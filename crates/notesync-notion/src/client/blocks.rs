//! Block operations for the Notion API.

use serde_json::{Value, json};
use tracing::info;

use super::{NotionClient, PAGE_SIZE};
use crate::error::NotionError;
use crate::store::ChildBatch;
use crate::wire::{BlockRef, PaginatedResponse};

impl NotionClient {
    /// Append up to 100 children to a block, in order.
    pub fn append_children(
        &self,
        block_id: &str,
        children: Vec<Value>,
    ) -> Result<(), NotionError> {
        let url = self.url(&format!("blocks/{block_id}/children"));

        info!("Appending {} children to block {}", children.len(), block_id);

        let response = self
            .agent()
            .patch(&url)
            .header("Authorization", &self.auth_header())
            .header("Notion-Version", self.version_header())
            .send_json(json!({ "children": children }))?;

        Self::read_checked::<Value>(response)?;
        Ok(())
    }

    /// List one page of a block's children.
    pub fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<ChildBatch, NotionError> {
        let mut url = self.url(&format!("blocks/{block_id}/children?page_size={PAGE_SIZE}"));
        if let Some(cursor) = cursor {
            url.push_str(&format!("&start_cursor={cursor}"));
        }

        let response = self
            .agent()
            .get(&url)
            .header("Authorization", &self.auth_header())
            .header("Notion-Version", self.version_header())
            .call()?;

        let listing: PaginatedResponse<BlockRef> = Self::read_checked(response)?;
        Ok(ChildBatch {
            ids: listing.results.into_iter().map(|block| block.id).collect(),
            has_more: listing.has_more,
            next_cursor: listing.next_cursor,
        })
    }

    /// Delete a single block.
    pub fn delete_block(&self, block_id: &str) -> Result<(), NotionError> {
        let url = self.url(&format!("blocks/{block_id}"));

        let response = self
            .agent()
            .delete(&url)
            .header("Authorization", &self.auth_header())
            .header("Notion-Version", self.version_header())
            .call()?;

        Self::read_checked::<Value>(response)?;
        Ok(())
    }
}
