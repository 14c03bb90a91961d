//! `notesync check-images` command implementation.

use std::path::PathBuf;

use clap::Args;
use notesync_blocks::Document;
use notesync_linkcheck::check_images;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check-images command.
#[derive(Args)]
pub(crate) struct CheckImagesArgs {
    /// Path to the markdown file.
    markdown_file: PathBuf,
}

impl CheckImagesArgs {
    /// Execute the check-images command.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read. Broken image URLs are
    /// reported but do not fail the command.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let markdown_text = std::fs::read_to_string(&self.markdown_file)?;
        let document = Document::from_markdown(&markdown_text);

        let urls: Vec<String> = document
            .image_urls()
            .into_iter()
            .map(str::to_owned)
            .collect();

        if urls.is_empty() {
            output.info("No image URLs found");
            return Ok(());
        }

        output.info(&format!("Checking {} image URLs...", urls.len()));
        let results = check_images(&urls);

        let mut broken = 0usize;
        for check in &results {
            if check.is_valid {
                output.success(&format!("  ok   {}", check.url));
            } else {
                broken += 1;
                let detail = check
                    .status_code
                    .map(|status| format!("HTTP {status}"))
                    .or_else(|| check.error.clone())
                    .unwrap_or_else(|| "unknown error".to_owned());
                output.error(&format!("  FAIL {} ({detail})", check.url));
            }
        }

        if broken > 0 {
            output.warning(&format!("{broken} of {} images are broken", results.len()));
        } else {
            output.success("All images resolve");
        }
        Ok(())
    }
}
