//! Line-level block tokenizer.
//!
//! Scans a markdown body line by line into typed blocks. Patterns are
//! tested most specific first; headings are tested from six hashes down to
//! one so deeper markers are never shadowed by shallower prefixes. A blank
//! line emits nothing. Fenced code is the only multi-line construct.

use std::str::Lines;

use crate::block::{Block, MAX_TEXT_LEN};
use crate::inline::parse_inline;
use crate::language::normalize_language;

/// Heading markers, deepest first. Levels four through six collapse onto
/// the store's deepest supported heading level.
const HEADING_MARKERS: [(&str, u8); 6] = [
    ("###### ", 3),
    ("##### ", 3),
    ("#### ", 3),
    ("### ", 3),
    ("## ", 2),
    ("# ", 1),
];

/// Tokenize a markdown body into an ordered list of blocks.
///
/// Total over all inputs: malformed lines degrade to paragraphs, an
/// unterminated fence captures to end of input.
#[must_use]
pub fn tokenize(body: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut lines = body.lines();

    while let Some(line) = lines.next() {
        if let Some(tag) = line.strip_prefix("```") {
            blocks.push(read_code_block(tag, &mut lines));
        } else if let Some(block) = tokenize_line(line) {
            blocks.push(block);
        }
    }

    blocks
}

/// Capture lines verbatim until a closing fence or end of input.
fn read_code_block(tag: &str, lines: &mut Lines<'_>) -> Block {
    let mut content: Vec<&str> = Vec::new();
    for line in lines.by_ref() {
        if line.starts_with("```") {
            break;
        }
        content.push(line);
    }

    let text = content.join("\n");
    Block::Code {
        language: normalize_language(tag),
        text: truncate_chars(&text, MAX_TEXT_LEN).to_owned(),
    }
}

/// Tokenize a single non-fence line. Returns `None` for blank lines.
fn tokenize_line(line: &str) -> Option<Block> {
    if line.trim().is_empty() {
        return None;
    }

    for (marker, level) in HEADING_MARKERS {
        if let Some(rest) = line.strip_prefix(marker) {
            let runs = parse_inline(truncate_chars(rest, MAX_TEXT_LEN));
            return Some(match level {
                1 => Block::Heading1 { runs },
                2 => Block::Heading2 { runs },
                _ => Block::Heading3 { runs },
            });
        }
    }

    if let Some(rest) = line.strip_prefix("> ") {
        return Some(Block::Quote {
            runs: parse_inline(truncate_chars(rest, MAX_TEXT_LEN)),
        });
    }

    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Some(Block::BulletedListItem {
            runs: parse_inline(truncate_chars(rest, MAX_TEXT_LEN)),
        });
    }

    if let Some(rest) = strip_ordered_marker(line) {
        return Some(Block::NumberedListItem {
            runs: parse_inline(truncate_chars(rest, MAX_TEXT_LEN)),
        });
    }

    if matches!(line, "---" | "***" | "___") {
        return Some(Block::Divider);
    }

    if let Some(block) = parse_standalone_image(line.trim()) {
        return Some(block);
    }

    Some(Block::Paragraph {
        runs: parse_inline(truncate_chars(line, MAX_TEXT_LEN)),
    })
}

/// Strip a `<digits>. ` ordered-list marker.
fn strip_ordered_marker(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}

/// Parse a trimmed line that is exactly `![alt](url)`, with an optional
/// quoted title after the URL which is ignored.
///
/// The URL is kept as written; image targets go to the store's
/// external-file reference untouched, only link URLs are sanitized.
fn parse_standalone_image(line: &str) -> Option<Block> {
    let rest = line.strip_prefix("![")?;
    let (alt, rest) = rest.split_once("](")?;
    let target = rest.strip_suffix(')')?;
    let url = split_image_target(target)?;
    if url.is_empty() {
        return None;
    }

    Some(Block::Image {
        url: url.to_owned(),
        caption: (!alt.is_empty()).then(|| alt.to_owned()),
    })
}

/// Split an optional quoted title off an image target.
///
/// Returns `None` when the target contains whitespace that is not followed
/// by a quoted title; such a line is not image syntax.
fn split_image_target(target: &str) -> Option<&str> {
    match target.split_once(char::is_whitespace) {
        None => Some(target),
        Some((url, rest)) => {
            let rest = rest.trim();
            let quoted = (rest.len() >= 2 && rest.starts_with('"') && rest.ends_with('"'))
                || (rest.len() >= 2 && rest.starts_with('\'') && rest.ends_with('\''));
            quoted.then_some(url)
        }
    }
}

/// Truncate to at most `max` characters, on a character boundary.
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
