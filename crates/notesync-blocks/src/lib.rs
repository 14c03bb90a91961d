//! Markdown to Notion block conversion.
//!
//! Converts a blog post's raw markdown body into an ordered sequence of
//! typed [`Block`]s with styled [`TextRun`]s, ready for serialization into
//! the Notion API's block format.
//!
//! Only the markdown subset the target store can represent is recognized:
//! headings, quotes, list items, fenced code, dividers, standalone images,
//! and inline code/bold/italic/strikethrough/links. Everything else degrades
//! to literal text. The whole pipeline is total: no input ever produces an
//! error, malformed constructs fall back to plain paragraphs or unstyled
//! runs.

mod block;
mod inline;
mod language;
mod sanitize;
mod tokenizer;

pub use block::{Block, Document, MAX_TEXT_LEN, StyleFlags, TextRun};
pub use inline::parse_inline;
pub use language::{SUPPORTED_LANGUAGES, normalize_language};
pub use sanitize::sanitize_url;
pub use tokenizer::tokenize;
