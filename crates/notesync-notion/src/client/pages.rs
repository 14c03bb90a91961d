//! Page operations for the Notion API.

use std::collections::HashMap;

use serde_json::{Value, json};
use tracing::info;

use super::{NotionClient, PAGE_SIZE};
use crate::error::NotionError;
use crate::store::RemoteEntry;
use crate::wire::{MARKER_PROPERTY, PageRef, PaginatedResponse, SLUG_PROPERTY};

impl NotionClient {
    /// Create a page in a database with up to 100 initial children.
    pub fn create_page(
        &self,
        parent_database: &str,
        properties: Value,
        children: Vec<Value>,
    ) -> Result<String, NotionError> {
        let url = self.url("pages");

        info!(
            "Creating page in database {} with {} initial children",
            parent_database,
            children.len()
        );

        let response = self
            .agent()
            .post(&url)
            .header("Authorization", &self.auth_header())
            .header("Notion-Version", self.version_header())
            .send_json(json!({
                "parent": { "database_id": parent_database },
                "properties": properties,
                "children": children,
            }))?;

        let page: PageRef = Self::read_checked(response)?;
        Ok(page.id)
    }

    /// Overwrite page properties.
    pub fn update_properties(&self, page_id: &str, properties: Value) -> Result<(), NotionError> {
        let url = self.url(&format!("pages/{page_id}"));

        let response = self
            .agent()
            .patch(&url)
            .header("Authorization", &self.auth_header())
            .header("Notion-Version", self.version_header())
            .send_json(json!({ "properties": properties }))?;

        Self::read_checked::<Value>(response)?;
        Ok(())
    }

    /// Map every synced page in a database by its slug property.
    ///
    /// Walks the cursor-paginated query until no further pages are
    /// indicated. Pages without a slug property are ignored (they were not
    /// created by this tool).
    pub fn query_existing(
        &self,
        database_id: &str,
    ) -> Result<HashMap<String, RemoteEntry>, NotionError> {
        let url = self.url(&format!("databases/{database_id}/query"));
        let mut existing = HashMap::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({ "page_size": PAGE_SIZE });
            if let (Some(cursor), Some(map)) = (&cursor, body.as_object_mut()) {
                map.insert("start_cursor".to_owned(), json!(cursor));
            }

            let response = self
                .agent()
                .post(&url)
                .header("Authorization", &self.auth_header())
                .header("Notion-Version", self.version_header())
                .send_json(body)?;

            let listing: PaginatedResponse<Value> = Self::read_checked(response)?;
            for page in &listing.results {
                let Some(id) = page.get("id").and_then(Value::as_str) else {
                    continue;
                };
                let Some(slug) = rich_text_property(page, SLUG_PROPERTY) else {
                    continue;
                };
                existing.insert(
                    slug,
                    RemoteEntry {
                        page_id: id.to_owned(),
                        marker: rich_text_property(page, MARKER_PROPERTY),
                    },
                );
            }

            if !listing.has_more {
                break;
            }
            cursor = listing.next_cursor;
            if cursor.is_none() {
                break;
            }
        }

        info!(
            "Found {} existing pages in database {}",
            existing.len(),
            database_id
        );
        Ok(existing)
    }
}

/// Concatenated plain text of a rich-text property, if present and
/// non-empty.
fn rich_text_property(page: &Value, name: &str) -> Option<String> {
    let fragments = page
        .get("properties")?
        .get(name)?
        .get("rich_text")?
        .as_array()?;

    let mut text = String::new();
    for fragment in fragments {
        if let Some(plain) = fragment.get("plain_text").and_then(Value::as_str) {
            text.push_str(plain);
        }
    }
    (!text.is_empty()).then_some(text)
}
