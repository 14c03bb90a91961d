//! Error types for the Notion integration.

/// Error from Notion API operations.
#[derive(Debug, thiserror::Error)]
pub enum NotionError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    Http(#[from] ureq::Error),

    /// The API returned an error status.
    #[error("Notion API error: {status} - {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}
