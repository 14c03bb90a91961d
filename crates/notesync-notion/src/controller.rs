//! Pagination and replacement controller.
//!
//! Reconciles a converted [`Document`] against the remote store under its
//! structural limits: at most 100 children per write call, cursor-paginated
//! listings, one delete per call. Updates are wholesale: list and delete
//! every existing child, then re-append the new document. That protocol is
//! not transactional; a failure between delete and re-append leaves the
//! page partially empty and surfaces as that entity's error.

use notesync_blocks::Document;
use serde_json::Value;

use crate::error::NotionError;
use crate::store::BlockStore;
use crate::wire::document_children;

/// Ceiling on children per create or append call.
pub const MAX_CHILDREN_PER_CALL: usize = 100;

/// Writes documents to the remote store in store-sized batches.
pub struct PageWriter<'a, S: BlockStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: BlockStore + ?Sized> PageWriter<'a, S> {
    /// Create a writer over a store.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create a page carrying the whole document.
    ///
    /// The first 100 blocks ride along in the creation call; any remainder
    /// is appended afterwards in original order, 100 per call.
    pub fn create(
        &self,
        parent_database: &str,
        properties: Value,
        document: &Document,
    ) -> Result<String, NotionError> {
        let mut children = document_children(document);
        let remainder = if children.len() > MAX_CHILDREN_PER_CALL {
            children.split_off(MAX_CHILDREN_PER_CALL)
        } else {
            Vec::new()
        };

        let page_id = self
            .store
            .create_page(parent_database, properties, children)?;
        self.append_all(&page_id, remainder)?;
        Ok(page_id)
    }

    /// Replace a page's content with the document, wholesale.
    pub fn replace(&self, page_id: &str, document: &Document) -> Result<(), NotionError> {
        for block_id in self.list_all(page_id)? {
            self.store.delete_block(&block_id)?;
        }
        self.append_all(page_id, document_children(document))
    }

    /// Walk the cursor-paginated listing until exhausted.
    fn list_all(&self, block_id: &str) -> Result<Vec<String>, NotionError> {
        let mut ids = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let batch = self.store.list_children(block_id, cursor.as_deref())?;
            ids.extend(batch.ids);
            if !batch.has_more {
                break;
            }
            cursor = batch.next_cursor;
            if cursor.is_none() {
                // has_more without a cursor would loop forever on page one.
                break;
            }
        }

        Ok(ids)
    }

    /// Append children in order, 100 per call.
    fn append_all(&self, block_id: &str, children: Vec<Value>) -> Result<(), NotionError> {
        for chunk in children.chunks(MAX_CHILDREN_PER_CALL) {
            self.store.append_children(block_id, chunk.to_vec())?;
        }
        Ok(())
    }
}
