//! Blog entity shapes and the source seam.
//!
//! The relational blog database itself is an external collaborator; this
//! crate defines the entity shapes it supplies ([`Post`], [`Link`]) and the
//! traits the sync engine consumes them through. [`JsonExportSource`] is
//! the bundled implementation, reading a JSON export file.

mod entity;
mod export;

pub use entity::{Link, Post, PostStatus};
pub use export::JsonExportSource;

/// Error reading from an entity source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed export data.
    #[error("export parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Supplies blog posts.
pub trait PostSource {
    /// All posts, in source order.
    fn posts(&self) -> Result<Vec<Post>, SourceError>;
}

/// Supplies blogroll links.
pub trait LinkSource {
    /// All links, in source order.
    fn links(&self) -> Result<Vec<Link>, SourceError>;
}
