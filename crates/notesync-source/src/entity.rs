//! Entity shapes supplied by the blog database.

use serde::{Deserialize, Serialize};

/// Publication status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Publicly visible.
    Publish,
    /// Unfinished draft.
    Draft,
    /// Removed from listings but reachable.
    Hidden,
    /// Scheduled, waiting for its publish date.
    Waiting,
    /// Visible to the author only.
    Private,
}

impl PostStatus {
    /// Status label as stored in the source database.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Draft => "draft",
            Self::Hidden => "hidden",
            Self::Waiting => "waiting",
            Self::Private => "private",
        }
    }
}

/// One blog post as supplied by the source database.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Post {
    /// Post title.
    pub title: String,
    /// URL slug, unique per post. Used as the remote lookup key.
    pub slug: String,
    /// Creation time, seconds since the Unix epoch.
    pub created_epoch: i64,
    /// Last modification time, seconds since the Unix epoch.
    pub modified_epoch: i64,
    /// Raw markdown body.
    pub body: String,
    /// Publication status.
    pub status: PostStatus,
    /// Category names.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Tag names.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One blogroll link as supplied by the source database.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Link {
    /// Link title.
    pub title: String,
    /// Link target.
    pub url: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Last modification time, seconds since the Unix epoch.
    pub modified_epoch: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        let status: PostStatus = serde_json::from_str("\"publish\"").unwrap();
        assert_eq!(status, PostStatus::Publish);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"publish\"");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(PostStatus::Waiting.as_str(), "waiting");
        assert_eq!(PostStatus::Private.as_str(), "private");
    }
}
