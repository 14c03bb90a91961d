//! Conversion from the block model to Notion's block JSON.
//!
//! Request bodies are assembled as `serde_json::Value`; the response
//! envelopes the client deserializes live here too.

use notesync_blocks::{Block, Document, TextRun};
use serde::Deserialize;
use serde_json::{Value, json};

/// Rich-text property holding the lookup key on every synced page.
pub const SLUG_PROPERTY: &str = "Slug";

/// Rich-text property holding the source modification instant
/// (ISO-8601 UTC), the staleness marker.
pub const MARKER_PROPERTY: &str = "Synced At";

/// Convert a document into Notion child block values, in document order.
#[must_use]
pub fn document_children(document: &Document) -> Vec<Value> {
    document.blocks().iter().map(block_value).collect()
}

fn block_value(block: &Block) -> Value {
    match block {
        Block::Heading1 { runs } => typed_block("heading_1", json!({ "rich_text": rich_text(runs) })),
        Block::Heading2 { runs } => typed_block("heading_2", json!({ "rich_text": rich_text(runs) })),
        Block::Heading3 { runs } => typed_block("heading_3", json!({ "rich_text": rich_text(runs) })),
        Block::Paragraph { runs } => typed_block("paragraph", json!({ "rich_text": rich_text(runs) })),
        Block::Quote { runs } => typed_block("quote", json!({ "rich_text": rich_text(runs) })),
        Block::BulletedListItem { runs } => {
            typed_block("bulleted_list_item", json!({ "rich_text": rich_text(runs) }))
        }
        Block::NumberedListItem { runs } => {
            typed_block("numbered_list_item", json!({ "rich_text": rich_text(runs) }))
        }
        Block::Divider => typed_block("divider", json!({})),
        Block::Image { url, caption } => {
            let mut image = json!({
                "type": "external",
                "external": { "url": url },
            });
            if let (Some(caption), Some(map)) = (caption, image.as_object_mut()) {
                map.insert("caption".to_owned(), json!([plain_text(caption)]));
            }
            typed_block("image", image)
        }
        Block::Code { language, text } => typed_block(
            "code",
            json!({
                "rich_text": [plain_text(text)],
                "language": language,
            }),
        ),
    }
}

fn typed_block(kind: &str, payload: Value) -> Value {
    let mut block = serde_json::Map::new();
    block.insert("object".to_owned(), json!("block"));
    block.insert("type".to_owned(), json!(kind));
    block.insert(kind.to_owned(), payload);
    Value::Object(block)
}

fn rich_text(runs: &[TextRun]) -> Value {
    Value::Array(runs.iter().map(run_value).collect())
}

fn run_value(run: &TextRun) -> Value {
    let mut text = json!({ "content": run.content });
    if let (Some(url), Some(map)) = (&run.link_url, text.as_object_mut()) {
        map.insert("link".to_owned(), json!({ "url": url }));
    }
    json!({
        "type": "text",
        "text": text,
        "annotations": {
            "bold": run.style.bold,
            "italic": run.style.italic,
            "strikethrough": run.style.strikethrough,
            "code": run.style.code,
        },
    })
}

/// An unstyled rich text value.
pub(crate) fn plain_text(content: &str) -> Value {
    json!({ "type": "text", "text": { "content": content } })
}

/// Newly created page.
#[derive(Debug, Deserialize)]
pub(crate) struct PageRef {
    /// Page ID.
    pub id: String,
}

/// One entry in a paginated block listing.
#[derive(Debug, Deserialize)]
pub(crate) struct BlockRef {
    /// Block ID.
    pub id: String,
}

/// Cursor-paginated listing envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct PaginatedResponse<T> {
    /// Items on this page.
    pub results: Vec<T>,
    /// Whether further pages exist.
    #[serde(default)]
    pub has_more: bool,
    /// Continuation token for the next page.
    #[serde(default)]
    pub next_cursor: Option<String>,
}
