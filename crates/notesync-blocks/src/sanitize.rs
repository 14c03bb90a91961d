//! Defensive link URL sanitizer.
//!
//! Link targets found by the inline parser come from arbitrary blog bodies:
//! HTML-escaped, relative, scheme-less, or plain garbage. The store only
//! accepts absolute URLs, so everything else is rejected and the caller
//! degrades the link to plain styled text.

use url::Url;

/// Validate and normalize a link target.
///
/// Returns the normalized absolute URL, or `None` when the target cannot
/// be represented as one. Never panics.
#[must_use]
pub fn sanitize_url(raw: &str) -> Option<String> {
    let decoded = decode_entities(raw);
    let trimmed = decoded.trim();

    // Anchors and site-relative paths have no meaning in an external store.
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('/') {
        return None;
    }

    let candidate = if has_scheme(trimmed) {
        trimmed.to_owned()
    } else if looks_like_bare_domain(trimmed) {
        format!("https://{trimmed}")
    } else {
        return None;
    };

    Url::parse(&candidate).ok().map(String::from)
}

/// Decode the five standard HTML entities. `&amp;` goes last so an encoded
/// ampersand is not decoded twice.
fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// `letter(letters|digits|+.-)*:`
fn has_scheme(s: &str) -> bool {
    let Some(colon) = s.find(':') else {
        return false;
    };
    let scheme = &s[..colon];
    let mut chars = scheme.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}

/// `label.label` with a final label of two or more letters, up to the first
/// path/query/fragment separator.
fn looks_like_bare_domain(s: &str) -> bool {
    let host = s.split(['/', '?', '#']).next().unwrap_or("");
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let all_valid = labels
        .iter()
        .all(|label| !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
    let Some(last) = labels.last() else {
        return false;
    };
    all_valid && last.len() >= 2 && last.chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url_passes() {
        assert_eq!(
            sanitize_url("https://example.com/post?id=1"),
            Some("https://example.com/post?id=1".to_owned())
        );
    }

    #[test]
    fn test_rejects_empty_anchor_relative() {
        assert_eq!(sanitize_url(""), None);
        assert_eq!(sanitize_url("   "), None);
        assert_eq!(sanitize_url("#section"), None);
        assert_eq!(sanitize_url("/about"), None);
    }

    #[test]
    fn test_entity_decoding() {
        assert_eq!(
            sanitize_url("https://example.com/?a=1&amp;b=2"),
            Some("https://example.com/?a=1&b=2".to_owned())
        );
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(
            sanitize_url("  https://example.com  "),
            Some("https://example.com/".to_owned())
        );
    }

    #[test]
    fn test_bare_domain_gets_https() {
        assert_eq!(
            sanitize_url("example.com"),
            Some("https://example.com/".to_owned())
        );
        assert_eq!(
            sanitize_url("blog.example.co/path"),
            Some("https://blog.example.co/path".to_owned())
        );
    }

    #[test]
    fn test_rejects_non_domains_without_scheme() {
        assert_eq!(sanitize_url("not a url"), None);
        assert_eq!(sanitize_url("readme"), None);
        assert_eq!(sanitize_url("foo.1x"), None);
        assert_eq!(sanitize_url("trailing."), None);
    }

    #[test]
    fn test_scheme_detection() {
        assert!(has_scheme("mailto:a@b.example"));
        assert!(has_scheme("git+ssh://host/repo"));
        assert!(!has_scheme("example.com/x:y"));
        assert!(!has_scheme("1http://x"));
    }

    #[test]
    fn test_invalid_scheme_urls_rejected() {
        assert_eq!(sanitize_url("http://"), None);
    }

    #[test]
    fn test_idempotent() {
        for raw in [
            "https://example.com",
            "example.com/a b",
            "  www.example.org/path?x=1&amp;y=2  ",
        ] {
            if let Some(once) = sanitize_url(raw) {
                assert_eq!(sanitize_url(&once), Some(once.clone()), "not idempotent for {raw}");
            }
        }
    }
}
