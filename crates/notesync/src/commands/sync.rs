//! `notesync sync` command implementation.

use std::path::PathBuf;

use clap::Args;
use notesync_config::{CliSettings, Config};
use notesync_notion::{NotionClient, Publisher, SyncSummary};
use notesync_source::{JsonExportSource, LinkSource, PostSource};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sync command.
#[derive(Args)]
pub(crate) struct SyncArgs {
    /// Path to configuration file (default: auto-discover notesync.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the source JSON export (overrides config).
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Delay between remote writes in milliseconds (overrides config).
    #[arg(long)]
    write_delay_ms: Option<u64>,

    /// Also publish posts that are not in publish status.
    #[arg(long)]
    include_drafts: bool,

    /// Skip the blogroll links database even when configured.
    #[arg(long)]
    skip_links: bool,
}

impl SyncArgs {
    /// Execute the sync command.
    ///
    /// # Errors
    ///
    /// Returns an error only for fatal setup failures: unreadable config
    /// or export, or an unreachable Notion database. Per-entity failures
    /// are reported in the summary and leave the exit code at zero.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            export_path: self.export.clone(),
            write_delay_ms: self.write_delay_ms,
            publish_drafts: self.include_drafts.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let client = match &config.notion.api_version {
            Some(version) => NotionClient::with_version(&config.notion.token, version),
            None => NotionClient::new(&config.notion.token),
        };
        let source = JsonExportSource::new(&config.source.export_path);

        let publisher = Publisher::new(&client)
            .write_delay(config.sync.write_delay())
            .publish_drafts(config.sync.publish_drafts);

        let posts = source.posts()?;
        output.info(&format!(
            "Syncing {} posts from {}...",
            posts.len(),
            config.source.export_path
        ));
        let summary = publisher.sync_posts(&config.notion.posts_database_id, &posts)?;
        print_summary(output, "Posts", &summary);

        if let Some(links_database_id) = &config.notion.links_database_id
            && !self.skip_links
        {
            let links = source.links()?;
            output.info(&format!("Syncing {} links...", links.len()));
            let summary = publisher.sync_links(links_database_id, &links)?;
            print_summary(output, "Links", &summary);
        }

        Ok(())
    }
}

/// Print the run-level summary for one database.
fn print_summary(output: &Output, label: &str, summary: &SyncSummary) {
    output.heading(&format!("{label}: {} processed", summary.total));
    output.success(&format!(
        "  created {} / updated {} / skipped {}",
        summary.created, summary.updated, summary.skipped
    ));

    if summary.failed > 0 {
        output.warning(&format!("  failed {}", summary.failed));
        for (entity, message) in &summary.failures {
            output.error(&format!("    {entity}: {message}"));
        }
    }
}
