//! Code block language normalization.
//!
//! The store accepts a fixed vocabulary of language tags. Fence tags from
//! the wild (`py`, `yml`, `sh`, editor-specific dialects) are mapped onto
//! the nearest supported tag; anything unrecognized becomes `"plain text"`.

/// Fallback tag for empty or unknown languages.
const PLAIN_TEXT: &str = "plain text";

/// Language tags the store accepts on a code block.
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "abap",
    "arduino",
    "bash",
    "basic",
    "c",
    "c#",
    "c++",
    "clojure",
    "coffeescript",
    "css",
    "dart",
    "diff",
    "docker",
    "elixir",
    "elm",
    "erlang",
    "flow",
    "fortran",
    "f#",
    "gherkin",
    "glsl",
    "go",
    "graphql",
    "groovy",
    "haskell",
    "html",
    "java",
    "javascript",
    "json",
    "julia",
    "kotlin",
    "latex",
    "less",
    "lisp",
    "livescript",
    "lua",
    "makefile",
    "markdown",
    "markup",
    "matlab",
    "mermaid",
    "nix",
    "objective-c",
    "ocaml",
    "pascal",
    "perl",
    "php",
    "plain text",
    "powershell",
    "prolog",
    "protobuf",
    "python",
    "r",
    "reason",
    "ruby",
    "rust",
    "sass",
    "scala",
    "scheme",
    "scss",
    "shell",
    "sql",
    "swift",
    "typescript",
    "vb.net",
    "verilog",
    "vhdl",
    "visual basic",
    "webassembly",
    "xml",
    "yaml",
];

/// Map a fence language tag to a canonical tag the store accepts.
///
/// Lower-cases and trims, applies the alias table, passes supported tags
/// through unchanged, and falls back to `"plain text"`. Never returns an
/// unsupported tag.
#[must_use]
pub fn normalize_language(tag: &str) -> &'static str {
    let tag = tag.trim().to_lowercase();
    if tag.is_empty() {
        return PLAIN_TEXT;
    }
    if let Some(canonical) = alias(&tag) {
        return canonical;
    }
    SUPPORTED_LANGUAGES
        .iter()
        .find(|&&supported| supported == tag)
        .copied()
        .unwrap_or(PLAIN_TEXT)
}

/// Alias table for common extensions and dialects.
fn alias(tag: &str) -> Option<&'static str> {
    let canonical = match tag {
        "js" | "jsx" | "mjs" | "cjs" | "node" => "javascript",
        "ts" | "tsx" | "mts" => "typescript",
        "py" | "py3" | "python3" => "python",
        "rb" => "ruby",
        "rs" => "rust",
        "sh" | "zsh" | "fish" | "shell-session" => "bash",
        "console" | "terminal" | "bat" | "cmd" => "shell",
        "yml" => "yaml",
        "kt" | "kts" => "kotlin",
        "cs" | "csharp" => "c#",
        "cpp" | "cc" | "cxx" | "hpp" => "c++",
        "h" => "c",
        "fs" | "fsharp" => "f#",
        "objc" | "objective-c++" => "objective-c",
        "golang" => "go",
        "dockerfile" | "containerfile" => "docker",
        "md" | "mdx" => "markdown",
        "htm" | "xhtml" | "vue" | "svelte" => "html",
        "svg" | "xsl" | "xsd" | "plist" => "xml",
        "tex" => "latex",
        "pl" | "pm" => "perl",
        "ps1" | "psm1" | "ps" => "powershell",
        "hs" => "haskell",
        "ex" | "exs" => "elixir",
        "erl" => "erlang",
        "clj" | "cljs" | "edn" => "clojure",
        "vb" | "vba" => "visual basic",
        "mk" | "make" | "gnumakefile" => "makefile",
        "proto" => "protobuf",
        "jsonc" | "json5" | "geojson" => "json",
        "f" | "f90" | "f95" => "fortran",
        "ml" | "mli" => "ocaml",
        "mysql" | "postgres" | "postgresql" | "psql" | "sqlite" | "plsql" | "tsql" => "sql",
        "patch" => "diff",
        "wat" | "wasm" => "webassembly",
        "gql" => "graphql",
        "coffee" => "coffeescript",
        "rscript" => "r",
        // Config dialects the store has no tag for.
        "txt" | "text" | "plaintext" | "plain" | "ini" | "toml" | "tf" | "hcl" | "conf"
        | "cfg" | "env" | "dotenv" | "properties" | "nginx" | "apache" | "csv" | "log" => {
            PLAIN_TEXT
        }
        _ => return None,
    };
    Some(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(normalize_language("PY"), "python");
        assert_eq!(normalize_language("  Rust  "), "rust");
        assert_eq!(normalize_language("YML"), "yaml");
    }

    #[test]
    fn test_shell_dialects() {
        for tag in ["sh", "zsh", "fish"] {
            assert_eq!(normalize_language(tag), "bash");
        }
        assert_eq!(normalize_language("bash"), "bash");
        assert_eq!(normalize_language("shell"), "shell");
    }

    #[test]
    fn test_supported_tags_pass_through() {
        for tag in ["javascript", "c++", "plain text", "graphql"] {
            assert_eq!(normalize_language(tag), tag);
        }
    }

    #[test]
    fn test_unknown_defaults_to_plain_text() {
        assert_eq!(normalize_language("unknownlang"), "plain text");
        assert_eq!(normalize_language("brainfuck"), "plain text");
    }

    #[test]
    fn test_empty_defaults_to_plain_text() {
        assert_eq!(normalize_language(""), "plain text");
        assert_eq!(normalize_language("   "), "plain text");
    }

    #[test]
    fn test_config_dialects_degrade() {
        assert_eq!(normalize_language("toml"), "plain text");
        assert_eq!(normalize_language("ini"), "plain text");
    }

    #[test]
    fn test_never_returns_unsupported_tag() {
        let inputs = [
            "js", "ts", "py", "weird", "", "C++", "Dockerfile", "make", "wat", "tsql",
        ];
        for input in inputs {
            let normalized = normalize_language(input);
            assert!(
                SUPPORTED_LANGUAGES.contains(&normalized),
                "{input} -> {normalized} is not a supported tag"
            );
        }
    }
}
