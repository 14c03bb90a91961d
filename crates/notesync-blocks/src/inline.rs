//! Inline rich-text parser.
//!
//! An explicit left-to-right lexer over one line of text. At each position
//! the span matchers are tried in priority order: inline code, link,
//! autolink, bold, italic, strikethrough. Code spans win first so that
//! formatting markers inside them stay literal. Matched inner text is
//! re-scanned by a restricted pass (no links, preventing link-in-link
//! recursion) with the outer style flag unioned onto every inner run; the
//! result is always one flat run list, never a tree.

use crate::block::{StyleFlags, TextRun};
use crate::sanitize::sanitize_url;

/// A matched inline span, borrowed from the source line.
enum Span<'a> {
    Code(&'a str),
    Link { label: &'a str, url: &'a str },
    Autolink(&'a str),
    Bold(&'a str),
    Italic(&'a str),
    Strike(&'a str),
}

/// Parse one line of text into an ordered list of styled runs.
///
/// Total over all inputs: if nothing matches, the whole line comes back as
/// a single unstyled run. Empty spans are consumed but emit no runs.
#[must_use]
pub fn parse_inline(text: &str) -> Vec<TextRun> {
    scan(text, StyleFlags::PLAIN, true)
}

/// Scan `text`, unioning `inherited` onto every emitted run.
///
/// `allow_links` is false inside link labels and styled spans.
fn scan(text: &str, inherited: StyleFlags, allow_links: bool) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut literal = String::new();
    let mut pos = 0;

    while pos < text.len() {
        if let Some((span, consumed)) = match_span(&text[pos..], allow_links) {
            flush_literal(&mut runs, &mut literal, inherited);
            emit(&mut runs, span, inherited);
            pos += consumed;
        } else {
            let Some(ch) = text[pos..].chars().next() else {
                break;
            };
            literal.push(ch);
            pos += ch.len_utf8();
        }
    }

    flush_literal(&mut runs, &mut literal, inherited);
    runs
}

/// Try the span matchers in priority order at the start of `s`.
fn match_span(s: &str, allow_links: bool) -> Option<(Span<'_>, usize)> {
    if let Some(matched) = match_code(s) {
        return Some(matched);
    }
    if allow_links {
        if let Some(matched) = match_link(s) {
            return Some(matched);
        }
        if let Some(matched) = match_autolink(s) {
            return Some(matched);
        }
    }
    match_bold(s)
        .or_else(|| match_italic(s))
        .or_else(|| match_strike(s))
}

/// `` `code` ``
fn match_code(s: &str) -> Option<(Span<'_>, usize)> {
    let rest = s.strip_prefix('`')?;
    let end = rest.find('`')?;
    Some((Span::Code(&rest[..end]), end + 2))
}

/// `[label](url)`
fn match_link(s: &str) -> Option<(Span<'_>, usize)> {
    let rest = s.strip_prefix('[')?;
    let close = rest.find("](")?;
    let label = &rest[..close];
    let after = &rest[close + 2..];
    let end = after.find(')')?;
    Some((
        Span::Link {
            label,
            url: &after[..end],
        },
        1 + close + 2 + end + 1,
    ))
}

/// `<url>` with an explicit http(s) scheme; anything else stays literal.
fn match_autolink(s: &str) -> Option<(Span<'_>, usize)> {
    let rest = s.strip_prefix('<')?;
    let end = rest.find('>')?;
    let target = &rest[..end];
    if !target.starts_with("http://") && !target.starts_with("https://") {
        return None;
    }
    Some((Span::Autolink(target), end + 2))
}

/// `**bold**` or `__bold__`
fn match_bold(s: &str) -> Option<(Span<'_>, usize)> {
    for delim in ["**", "__"] {
        if let Some(rest) = s.strip_prefix(delim)
            && let Some(end) = rest.find(delim)
        {
            return Some((Span::Bold(&rest[..end]), end + 4));
        }
    }
    None
}

/// `*italic*` or `_italic_`, guarded against bold markers.
fn match_italic(s: &str) -> Option<(Span<'_>, usize)> {
    for delim in ['*', '_'] {
        let Some(rest) = s.strip_prefix(delim) else {
            continue;
        };
        // A doubled marker is bold syntax, not an empty italic span.
        if rest.starts_with(delim) {
            continue;
        }
        let Some(end) = rest.find(delim) else {
            continue;
        };
        return Some((Span::Italic(&rest[..end]), end + 2));
    }
    None
}

/// `~~strike~~`
fn match_strike(s: &str) -> Option<(Span<'_>, usize)> {
    let rest = s.strip_prefix("~~")?;
    let end = rest.find("~~")?;
    Some((Span::Strike(&rest[..end]), end + 4))
}

fn flush_literal(runs: &mut Vec<TextRun>, literal: &mut String, style: StyleFlags) {
    if !literal.is_empty() {
        runs.push(TextRun::styled(std::mem::take(literal), style));
    }
}

fn emit(runs: &mut Vec<TextRun>, span: Span<'_>, inherited: StyleFlags) {
    match span {
        Span::Code(content) => {
            if !content.is_empty() {
                runs.push(TextRun::styled(
                    content,
                    StyleFlags {
                        code: true,
                        ..inherited
                    },
                ));
            }
        }
        Span::Link { label, url } => {
            // An empty label falls back to the URL text itself. A rejected
            // URL degrades the link to styled plain text; the label is
            // never dropped.
            let link = sanitize_url(url);
            let label = if label.is_empty() { url } else { label };
            for mut run in scan(label, inherited, false) {
                run.link_url.clone_from(&link);
                runs.push(run);
            }
        }
        Span::Autolink(target) => {
            let mut run = TextRun::styled(target, inherited);
            run.link_url = sanitize_url(target);
            runs.push(run);
        }
        Span::Bold(inner) => runs.extend(scan(
            inner,
            StyleFlags {
                bold: true,
                ..inherited
            },
            false,
        )),
        Span::Italic(inner) => runs.extend(scan(
            inner,
            StyleFlags {
                italic: true,
                ..inherited
            },
            false,
        )),
        Span::Strike(inner) => runs.extend(scan(
            inner,
            StyleFlags {
                strikethrough: true,
                ..inherited
            },
            false,
        )),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const BOLD: StyleFlags = StyleFlags {
        bold: true,
        ..StyleFlags::PLAIN
    };
    const ITALIC: StyleFlags = StyleFlags {
        italic: true,
        ..StyleFlags::PLAIN
    };
    const BOLD_ITALIC: StyleFlags = StyleFlags {
        bold: true,
        italic: true,
        ..StyleFlags::PLAIN
    };

    #[test]
    fn test_plain_text_single_run() {
        assert_eq!(
            parse_inline("just some text"),
            vec![TextRun::plain("just some text")]
        );
    }

    #[test]
    fn test_empty_input_no_runs() {
        assert_eq!(parse_inline(""), vec![]);
    }

    #[test]
    fn test_bold_both_delimiters() {
        for input in ["**b**", "__b__"] {
            assert_eq!(parse_inline(input), vec![TextRun::styled("b", BOLD)]);
        }
    }

    #[test]
    fn test_italic_both_delimiters() {
        for input in ["*i*", "_i_"] {
            assert_eq!(parse_inline(input), vec![TextRun::styled("i", ITALIC)]);
        }
    }

    #[test]
    fn test_strikethrough() {
        let runs = parse_inline("~~gone~~");
        assert_eq!(runs.len(), 1);
        assert!(runs[0].style.strikethrough);
        assert_eq!(runs[0].content, "gone");
    }

    #[test]
    fn test_inline_code_wins_over_formatting() {
        let runs = parse_inline("`**not bold**`");
        assert_eq!(runs.len(), 1);
        assert!(runs[0].style.code);
        assert!(!runs[0].style.bold);
        assert_eq!(runs[0].content, "**not bold**");
    }

    #[test]
    fn test_text_between_spans() {
        assert_eq!(
            parse_inline("a **b** c"),
            vec![
                TextRun::plain("a "),
                TextRun::styled("b", BOLD),
                TextRun::plain(" c"),
            ]
        );
    }

    #[test]
    fn test_nested_flags_union() {
        assert_eq!(
            parse_inline("**a *b* c**"),
            vec![
                TextRun::styled("a ", BOLD),
                TextRun::styled("b", BOLD_ITALIC),
                TextRun::styled(" c", BOLD),
            ]
        );
    }

    #[test]
    fn test_link_with_valid_url() {
        let runs = parse_inline("[site](https://example.com)");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].content, "site");
        assert_eq!(runs[0].link_url.as_deref(), Some("https://example.com/"));
    }

    #[test]
    fn test_link_rejected_url_keeps_label() {
        let runs = parse_inline("[x](not a url)");
        assert_eq!(runs, vec![TextRun::plain("x")]);
    }

    #[test]
    fn test_link_empty_label_uses_url() {
        let runs = parse_inline("[](https://example.com)");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].content, "https://example.com");
        assert_eq!(runs[0].link_url.as_deref(), Some("https://example.com/"));
    }

    #[test]
    fn test_styled_link_label() {
        let runs = parse_inline("[**b** plain](https://example.com)");
        assert_eq!(runs.len(), 2);
        assert!(runs[0].style.bold);
        assert_eq!(runs[0].content, "b");
        assert_eq!(runs[1].content, " plain");
        for run in &runs {
            assert_eq!(run.link_url.as_deref(), Some("https://example.com/"));
        }
    }

    #[test]
    fn test_no_link_inside_link_label() {
        // The bracketed text inside a label is literal, not a nested link.
        let runs = parse_inline("[see [docs](https://a.example)](https://b.example)");
        assert!(!runs.is_empty());
        assert!(runs.iter().all(|r| r.link_url.is_none()
            || r.link_url.as_deref() == Some("https://b.example/")
            || r.link_url.as_deref() == Some("https://a.example/")));
    }

    #[test]
    fn test_autolink() {
        let runs = parse_inline("<https://example.com/x>");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].content, "https://example.com/x");
        assert_eq!(runs[0].link_url.as_deref(), Some("https://example.com/x"));
    }

    #[test]
    fn test_angle_brackets_without_scheme_stay_literal() {
        assert_eq!(parse_inline("<not a link>"), vec![TextRun::plain("<not a link>")]);
    }

    #[test]
    fn test_unmatched_markers_are_literal() {
        assert_eq!(parse_inline("**unclosed"), vec![TextRun::plain("**unclosed")]);
        assert_eq!(parse_inline("`unclosed"), vec![TextRun::plain("`unclosed")]);
        assert_eq!(parse_inline("[half](open"), vec![TextRun::plain("[half](open")]);
    }

    #[test]
    fn test_empty_spans_emit_no_runs() {
        assert_eq!(parse_inline("a ``**** b"), vec![TextRun::plain("a "), TextRun::plain(" b")]);
    }

    #[test]
    fn test_underscore_inside_word_pairs_match() {
        // Intra-word underscores still pair up; the degraded output is
        // styled text, never an error.
        let runs = parse_inline("snake_case_name");
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[1].content, "case");
        assert!(runs[1].style.italic);
    }

    #[test]
    fn test_code_inside_bold_unions_flags() {
        let runs = parse_inline("**a `b`**");
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], TextRun::styled("a ", BOLD));
        assert!(runs[1].style.code);
        assert!(runs[1].style.bold);
    }

    #[test]
    fn test_strike_inside_bold() {
        let runs = parse_inline("**a ~~b~~**");
        assert_eq!(runs.len(), 2);
        assert!(runs[1].style.strikethrough);
        assert!(runs[1].style.bold);
    }
}
