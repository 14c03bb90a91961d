//! `notesync convert` command implementation.

use std::path::PathBuf;

use clap::Args;
use notesync_blocks::Document;
use notesync_notion::wire::document_children;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Path to the markdown file.
    markdown_file: PathBuf,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// Converts a markdown file and writes the Notion block JSON to
    /// stdout, one array of child blocks.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let markdown_text = std::fs::read_to_string(&self.markdown_file)?;
        let document = Document::from_markdown(&markdown_text);

        output.info(&format!(
            "{}: {} blocks",
            self.markdown_file.display(),
            document.len()
        ));

        let children = document_children(&document);
        output.result(&serde_json::to_string_pretty(&children)?);
        Ok(())
    }
}
