//! Per-entity publishing loop.
//!
//! Drives CREATE/UPDATE/SKIP for each source entity against a database.
//! Staleness is decided by comparing the source modification instant with
//! the marker recorded on the remote page: the entity is stale only when
//! the source instant is strictly later; equal instants count as fresh.
//!
//! Entities are processed strictly sequentially with a fixed pause after
//! each remote write, respecting the store's rate limits. One entity's
//! failure is caught at its boundary, tallied, and never aborts the batch.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use notesync_blocks::Document;
use notesync_source::{Link, Post, PostStatus};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::controller::PageWriter;
use crate::error::NotionError;
use crate::store::{BlockStore, RemoteEntry};
use crate::wire::{MARKER_PROPERTY, SLUG_PROPERTY, plain_text};

/// Pause after each remote write.
const DEFAULT_WRITE_DELAY: Duration = Duration::from_millis(350);

/// Result of one sync run.
#[derive(Debug, Default)]
pub struct SyncSummary {
    /// Entities considered.
    pub total: usize,
    /// Pages created.
    pub created: usize,
    /// Pages rewritten.
    pub updated: usize,
    /// Entities already fresh.
    pub skipped: usize,
    /// Entities that errored.
    pub failed: usize,
    /// (label, error message) per failed entity.
    pub failures: Vec<(String, String)>,
}

enum Outcome {
    Created,
    Updated,
    Skipped,
}

enum Plan<'a> {
    Create,
    Update(&'a RemoteEntry),
    Skip,
}

/// Publishes source entities into Notion databases.
pub struct Publisher<'a, S: BlockStore + ?Sized> {
    store: &'a S,
    write_delay: Duration,
    publish_drafts: bool,
}

impl<'a, S: BlockStore + ?Sized> Publisher<'a, S> {
    /// Create a publisher with the default write delay, publishing only
    /// `publish`-status posts.
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            write_delay: DEFAULT_WRITE_DELAY,
            publish_drafts: false,
        }
    }

    /// Set the pause after each remote write.
    #[must_use]
    pub fn write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = delay;
        self
    }

    /// Also publish posts that are not in `publish` status.
    #[must_use]
    pub fn publish_drafts(mut self, enabled: bool) -> Self {
        self.publish_drafts = enabled;
        self
    }

    /// Sync all posts into a database, keyed by slug.
    ///
    /// Fails fast only when the initial database query fails; per-post
    /// errors are recorded in the summary.
    pub fn sync_posts(
        &self,
        database_id: &str,
        posts: &[Post],
    ) -> Result<SyncSummary, NotionError> {
        let existing = self.store.query_existing(database_id)?;
        let mut summary = SyncSummary::default();

        for post in posts {
            if post.status != PostStatus::Publish && !self.publish_drafts {
                continue;
            }
            summary.total += 1;

            let result = self.sync_post(database_id, post, existing.get(&post.slug));
            self.record(&mut summary, &post.slug, result);
        }

        Ok(summary)
    }

    /// Sync all blogroll links into a database, keyed by URL.
    pub fn sync_links(
        &self,
        database_id: &str,
        links: &[Link],
    ) -> Result<SyncSummary, NotionError> {
        let existing = self.store.query_existing(database_id)?;
        let mut summary = SyncSummary::default();

        for link in links {
            summary.total += 1;
            let result = self.sync_link(database_id, link, existing.get(&link.url));
            self.record(&mut summary, &link.url, result);
        }

        Ok(summary)
    }

    fn sync_post(
        &self,
        database_id: &str,
        post: &Post,
        remote: Option<&RemoteEntry>,
    ) -> Result<Outcome, NotionError> {
        let writer = PageWriter::new(self.store);
        match plan(post.modified_epoch, remote) {
            Plan::Skip => Ok(Outcome::Skipped),
            Plan::Create => {
                let document = Document::from_markdown(&post.body);
                info!("Creating page for post '{}' ({} blocks)", post.slug, document.len());
                writer.create(database_id, post_properties(post), &document)?;
                Ok(Outcome::Created)
            }
            Plan::Update(entry) => {
                let document = Document::from_markdown(&post.body);
                info!("Updating page for post '{}' ({} blocks)", post.slug, document.len());
                writer.replace(&entry.page_id, &document)?;
                self.store
                    .update_properties(&entry.page_id, post_properties(post))?;
                Ok(Outcome::Updated)
            }
        }
    }

    fn sync_link(
        &self,
        database_id: &str,
        link: &Link,
        remote: Option<&RemoteEntry>,
    ) -> Result<Outcome, NotionError> {
        let writer = PageWriter::new(self.store);
        let document = link
            .description
            .as_deref()
            .map(Document::from_markdown)
            .unwrap_or_default();

        match plan(link.modified_epoch, remote) {
            Plan::Skip => Ok(Outcome::Skipped),
            Plan::Create => {
                writer.create(database_id, link_properties(link), &document)?;
                Ok(Outcome::Created)
            }
            Plan::Update(entry) => {
                writer.replace(&entry.page_id, &document)?;
                self.store
                    .update_properties(&entry.page_id, link_properties(link))?;
                Ok(Outcome::Updated)
            }
        }
    }

    /// Tally one entity's result; a failure never propagates to siblings.
    fn record(
        &self,
        summary: &mut SyncSummary,
        label: &str,
        result: Result<Outcome, NotionError>,
    ) {
        match result {
            Ok(Outcome::Created) => {
                summary.created += 1;
                self.pause();
            }
            Ok(Outcome::Updated) => {
                summary.updated += 1;
                self.pause();
            }
            Ok(Outcome::Skipped) => summary.skipped += 1,
            Err(err) => {
                warn!("Failed to sync '{label}': {err}");
                summary.failed += 1;
                summary.failures.push((label.to_owned(), err.to_string()));
                self.pause();
            }
        }
    }

    fn pause(&self) {
        if !self.write_delay.is_zero() {
            std::thread::sleep(self.write_delay);
        }
    }
}

/// Decide what to do with an entity given its remote state.
fn plan<'a>(modified_epoch: i64, remote: Option<&'a RemoteEntry>) -> Plan<'a> {
    let Some(entry) = remote else {
        return Plan::Create;
    };
    // No marker or an unreadable one: the page predates marker tracking,
    // rewrite it to establish one.
    let Some(marker) = entry.marker.as_deref() else {
        return Plan::Update(entry);
    };
    let Ok(recorded) = DateTime::parse_from_rfc3339(marker) else {
        return Plan::Update(entry);
    };

    let source = DateTime::<Utc>::from_timestamp(modified_epoch, 0).unwrap_or_default();
    if source > recorded.with_timezone(&Utc) {
        Plan::Update(entry)
    } else {
        Plan::Skip
    }
}

/// Seconds since the epoch as an ISO-8601 UTC instant.
#[must_use]
pub fn epoch_to_iso(seconds: i64) -> String {
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn post_properties(post: &Post) -> Value {
    let mut properties = serde_json::Map::new();
    properties.insert(
        "Name".to_owned(),
        json!({ "title": [plain_text(&post.title)] }),
    );
    properties.insert(
        SLUG_PROPERTY.to_owned(),
        json!({ "rich_text": [plain_text(&post.slug)] }),
    );
    properties.insert(
        "Status".to_owned(),
        json!({ "select": { "name": post.status.as_str() } }),
    );
    properties.insert(
        "Tags".to_owned(),
        json!({ "multi_select": select_names(&post.tags) }),
    );
    properties.insert(
        "Categories".to_owned(),
        json!({ "multi_select": select_names(&post.categories) }),
    );
    properties.insert(
        "Created".to_owned(),
        json!({ "date": { "start": epoch_to_iso(post.created_epoch) } }),
    );
    properties.insert(
        MARKER_PROPERTY.to_owned(),
        json!({ "rich_text": [plain_text(&epoch_to_iso(post.modified_epoch))] }),
    );
    Value::Object(properties)
}

fn link_properties(link: &Link) -> Value {
    let mut properties = serde_json::Map::new();
    properties.insert(
        "Name".to_owned(),
        json!({ "title": [plain_text(&link.title)] }),
    );
    properties.insert(
        SLUG_PROPERTY.to_owned(),
        json!({ "rich_text": [plain_text(&link.url)] }),
    );
    properties.insert("URL".to_owned(), json!({ "url": link.url }));
    properties.insert(
        MARKER_PROPERTY.to_owned(),
        json!({ "rich_text": [plain_text(&epoch_to_iso(link.modified_epoch))] }),
    );
    Value::Object(properties)
}

fn select_names(names: &[String]) -> Value {
    Value::Array(
        names
            .iter()
            .map(|name| json!({ "name": name }))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::controller::tests::{Call, RecordingStore};

    fn post(slug: &str, modified_epoch: i64) -> Post {
        Post {
            title: slug.to_owned(),
            slug: slug.to_owned(),
            created_epoch: modified_epoch - 100,
            modified_epoch,
            body: "# Title\n\nBody text".to_owned(),
            status: PostStatus::Publish,
            categories: vec![],
            tags: vec![],
        }
    }

    fn remote(page_id: &str, marker_epoch: i64) -> RemoteEntry {
        RemoteEntry {
            page_id: page_id.to_owned(),
            marker: Some(epoch_to_iso(marker_epoch)),
        }
    }

    fn publisher(store: &RecordingStore) -> Publisher<'_, RecordingStore> {
        Publisher::new(store).write_delay(Duration::ZERO)
    }

    #[test]
    fn test_epoch_to_iso_is_utc() {
        assert_eq!(epoch_to_iso(1_700_000_000), "2023-11-14T22:13:20Z");
        assert_eq!(epoch_to_iso(0), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_absent_entity_is_created() {
        let store = RecordingStore::default();
        let summary = publisher(&store)
            .sync_posts("db", &[post("new-post", 1_700_000_000)])
            .unwrap();

        assert_eq!(summary.total, 1);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.failed, 0);
        assert!(matches!(store.calls.borrow()[0], Call::Create { .. }));
    }

    #[test]
    fn test_equal_timestamp_skips() {
        let epoch = 1_700_000_000;
        let store = RecordingStore {
            existing_pages: HashMap::from([("p".to_owned(), remote("page-1", epoch))]),
            ..Default::default()
        };
        let summary = publisher(&store).sync_posts("db", &[post("p", epoch)]).unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.updated, 0);
        assert!(store.calls.borrow().is_empty());
    }

    #[test]
    fn test_older_source_skips() {
        let store = RecordingStore {
            existing_pages: HashMap::from([("p".to_owned(), remote("page-1", 1_700_000_500))]),
            ..Default::default()
        };
        let summary = publisher(&store)
            .sync_posts("db", &[post("p", 1_700_000_000)])
            .unwrap();

        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_newer_source_replaces_and_updates_marker() {
        let store = RecordingStore {
            existing_pages: HashMap::from([("p".to_owned(), remote("page-1", 1_700_000_000))]),
            existing_children: vec!["old-1".to_owned(), "old-2".to_owned()],
            ..Default::default()
        };
        let summary = publisher(&store)
            .sync_posts("db", &[post("p", 1_700_000_001)])
            .unwrap();

        assert_eq!(summary.updated, 1);
        let calls = store.calls.borrow();
        assert_eq!(
            *calls,
            vec![
                Call::Delete("old-1".to_owned()),
                Call::Delete("old-2".to_owned()),
                Call::Append { children: 2 },
                Call::UpdateProperties,
            ]
        );
    }

    #[test]
    fn test_page_without_marker_is_updated() {
        let store = RecordingStore {
            existing_pages: HashMap::from([(
                "p".to_owned(),
                RemoteEntry {
                    page_id: "page-1".to_owned(),
                    marker: None,
                },
            )]),
            ..Default::default()
        };
        let summary = publisher(&store)
            .sync_posts("db", &[post("p", 1_700_000_000)])
            .unwrap();

        assert_eq!(summary.updated, 1);
    }

    #[test]
    fn test_one_failure_does_not_abort_the_batch() {
        let store = RecordingStore {
            fail_on: Some("bad".to_owned()),
            ..Default::default()
        };
        let summary = publisher(&store)
            .sync_posts(
                "db",
                &[post("bad", 1_700_000_000), post("good", 1_700_000_000)],
            )
            .unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].0, "bad");
    }

    #[test]
    fn test_non_publish_posts_are_filtered_by_default() {
        let mut draft = post("draft", 1_700_000_000);
        draft.status = PostStatus::Draft;

        let store = RecordingStore::default();
        let summary = publisher(&store).sync_posts("db", &[draft.clone()]).unwrap();
        assert_eq!(summary.total, 0);

        let summary = publisher(&store)
            .publish_drafts(true)
            .sync_posts("db", &[draft])
            .unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.created, 1);
    }

    #[test]
    fn test_links_keyed_by_url() {
        let link = Link {
            title: "A friend".to_owned(),
            url: "https://friend.example".to_owned(),
            description: Some("An old blog".to_owned()),
            modified_epoch: 1_700_000_000,
        };
        let store = RecordingStore {
            existing_pages: HashMap::from([(
                "https://friend.example".to_owned(),
                remote("page-9", 1_700_000_000),
            )]),
            ..Default::default()
        };
        let summary = publisher(&store).sync_links("db", &[link]).unwrap();
        assert_eq!(summary.skipped, 1);
    }
}
