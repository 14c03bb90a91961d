//! Block and text run model.

use crate::tokenizer::tokenize;

/// Maximum character count the store accepts for a single rich text run or
/// code block. Longer content is truncated, not rejected.
pub const MAX_TEXT_LEN: usize = 2000;

/// Style flags carried by a text run.
///
/// Flags are independent and union on nested spans: `**a *b* c**` yields a
/// run for `b` with both `bold` and `italic` set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleFlags {
    /// Bold (`**x**` or `__x__`).
    pub bold: bool,
    /// Italic (`*x*` or `_x_`).
    pub italic: bool,
    /// Strikethrough (`~~x~~`).
    pub strikethrough: bool,
    /// Inline code (`` `x` ``).
    pub code: bool,
}

impl StyleFlags {
    /// No styling.
    pub const PLAIN: Self = Self {
        bold: false,
        italic: false,
        strikethrough: false,
        code: false,
    };

    /// Whether no flag is set.
    #[must_use]
    pub fn is_plain(self) -> bool {
        self == Self::PLAIN
    }
}

/// A contiguous span of text sharing one set of style flags and an optional
/// link target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    /// The literal text of the run. Never empty in converter output.
    pub content: String,
    /// Sanitized absolute link target, if the run is part of a link.
    pub link_url: Option<String>,
    /// Style flags.
    pub style: StyleFlags,
}

impl TextRun {
    /// An unstyled, unlinked run.
    #[must_use]
    pub fn plain(content: impl Into<String>) -> Self {
        Self::styled(content, StyleFlags::PLAIN)
    }

    /// A styled, unlinked run.
    #[must_use]
    pub fn styled(content: impl Into<String>, style: StyleFlags) -> Self {
        Self {
            content: content.into(),
            link_url: None,
            style,
        }
    }
}

/// One typed content unit in the output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Top-level heading (`# `).
    Heading1 { runs: Vec<TextRun> },
    /// Second-level heading (`## `).
    Heading2 { runs: Vec<TextRun> },
    /// Third-level heading (`### ` and deeper; the store supports no deeper
    /// heading levels, so `####` through `######` collapse onto this).
    Heading3 { runs: Vec<TextRun> },
    /// Regular paragraph line.
    Paragraph { runs: Vec<TextRun> },
    /// Blockquote line (`> `).
    Quote { runs: Vec<TextRun> },
    /// Unordered list item (`- ` or `* `).
    BulletedListItem { runs: Vec<TextRun> },
    /// Ordered list item (`1. `).
    NumberedListItem { runs: Vec<TextRun> },
    /// Horizontal rule (`---`, `***`, `___`).
    Divider,
    /// Standalone image line (`![alt](url)`). The URL is passed through to
    /// the store's external-file reference as written in the source.
    Image {
        url: String,
        /// Alt text, used as a plain caption.
        caption: Option<String>,
    },
    /// Fenced code block. `text` is verbatim source, never inline-parsed.
    Code {
        /// Canonical language tag accepted by the store.
        language: &'static str,
        text: String,
    },
}

impl Block {
    /// The styled runs of the block, if its kind carries any.
    #[must_use]
    pub fn runs(&self) -> Option<&[TextRun]> {
        match self {
            Self::Heading1 { runs }
            | Self::Heading2 { runs }
            | Self::Heading3 { runs }
            | Self::Paragraph { runs }
            | Self::Quote { runs }
            | Self::BulletedListItem { runs }
            | Self::NumberedListItem { runs } => Some(runs),
            Self::Divider | Self::Image { .. } | Self::Code { .. } => None,
        }
    }
}

/// An ordered sequence of blocks produced from one markdown body.
///
/// A document is built fresh on every conversion and never mutated in
/// place; updating remote content means building a new document and
/// replacing the remote blocks wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Tokenize a markdown body into a document.
    #[must_use]
    pub fn from_markdown(body: &str) -> Self {
        Self {
            blocks: tokenize(body),
        }
    }

    /// The blocks in source order.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Consume the document, yielding its blocks.
    #[must_use]
    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    /// Number of blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the document has no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// URLs of all image blocks, in document order.
    #[must_use]
    pub fn image_urls(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Image { url, .. } => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl From<Vec<Block>> for Document {
    fn from(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_flags_default_is_plain() {
        assert!(StyleFlags::default().is_plain());
        assert!(
            !StyleFlags {
                bold: true,
                ..StyleFlags::PLAIN
            }
            .is_plain()
        );
    }

    #[test]
    fn image_urls_in_order() {
        let doc = Document::from_markdown("![a](https://a.example/1.png)\n\ntext\n\n![b](https://b.example/2.png)");
        assert_eq!(
            doc.image_urls(),
            vec!["https://a.example/1.png", "https://b.example/2.png"]
        );
    }

    #[test]
    fn empty_body_yields_empty_document() {
        let doc = Document::from_markdown("");
        assert!(doc.is_empty());
        assert_eq!(doc.len(), 0);
    }
}
