//! The block store seam.
//!
//! The pagination controller and publisher are written against this trait
//! rather than against [`crate::NotionClient`] directly, so the chunking
//! and replacement protocols are testable with an in-memory fake.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::NotionError;

/// One page of a cursor-paginated child block listing.
#[derive(Debug, Clone, Default)]
pub struct ChildBatch {
    /// Child block IDs on this page.
    pub ids: Vec<String>,
    /// Whether further pages exist.
    pub has_more: bool,
    /// Continuation token for the next page.
    pub next_cursor: Option<String>,
}

/// Remote state of one synced entity, keyed by slug.
#[derive(Debug, Clone)]
pub struct RemoteEntry {
    /// Remote page ID.
    pub page_id: String,
    /// Last recorded source modification instant (ISO-8601 UTC), absent
    /// when the page predates marker tracking.
    pub marker: Option<String>,
}

/// Primitive operations of the remote block store.
///
/// Callers respect the store's structural limits: at most 100 children per
/// create or append call.
pub trait BlockStore {
    /// Create a page in a database with up to 100 initial children.
    /// Returns the new page ID.
    fn create_page(
        &self,
        parent_database: &str,
        properties: Value,
        children: Vec<Value>,
    ) -> Result<String, NotionError>;

    /// Overwrite page properties.
    fn update_properties(&self, page_id: &str, properties: Value) -> Result<(), NotionError>;

    /// Append up to 100 children to a block.
    fn append_children(&self, block_id: &str, children: Vec<Value>) -> Result<(), NotionError>;

    /// List one page of a block's children.
    fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<ChildBatch, NotionError>;

    /// Delete a single block.
    fn delete_block(&self, block_id: &str) -> Result<(), NotionError>;

    /// Map every synced page in a database by its slug property.
    fn query_existing(&self, database_id: &str)
    -> Result<HashMap<String, RemoteEntry>, NotionError>;
}
