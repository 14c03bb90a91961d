//! JSON export source.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Link, LinkSource, Post, PostSource, SourceError};

/// Entity source backed by a JSON export file.
///
/// The export is a single object with `posts` and `links` arrays, matching
/// the entity shapes in [`crate::entity`]. The file is re-read on every
/// call so a long-running process sees fresh exports.
pub struct JsonExportSource {
    path: PathBuf,
}

#[derive(Deserialize)]
struct Export {
    #[serde(default)]
    posts: Vec<Post>,
    #[serde(default)]
    links: Vec<Link>,
}

impl JsonExportSource {
    /// Create a source reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The export file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Export, SourceError> {
        let data = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

impl PostSource for JsonExportSource {
    fn posts(&self) -> Result<Vec<Post>, SourceError> {
        Ok(self.read()?.posts)
    }
}

impl LinkSource for JsonExportSource {
    fn links(&self) -> Result<Vec<Link>, SourceError> {
        Ok(self.read()?.links)
    }
}
