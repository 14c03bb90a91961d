//! CLI error types.

use notesync_config::ConfigError;
use notesync_notion::NotionError;
use notesync_source::SourceError;

/// CLI error type.
///
/// Everything surfacing here is fatal: setup failures and unreachable
/// collaborators. Per-entity sync failures never become a `CliError`;
/// they stay inside the run summary.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Notion(#[from] NotionError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
