//! Notion integration for notesync.
//!
//! A sync REST client for the Notion v1 API, a pagination/replacement
//! controller that reconciles converted documents against the store's
//! structural limits, and a publisher that drives per-entity
//! CREATE/UPDATE/SKIP with staleness tracking.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use notesync_notion::{NotionClient, Publisher};
//! use notesync_source::{JsonExportSource, PostSource};
//!
//! let client = NotionClient::new("secret-token");
//! let source = JsonExportSource::new("export.json");
//!
//! let publisher = Publisher::new(&client);
//! let summary = publisher.sync_posts("database-id", &source.posts()?)?;
//! println!("created {}, updated {}", summary.created, summary.updated);
//! # Ok(())
//! # }
//! ```

mod client;
mod controller;
mod error;
mod publisher;
mod store;
pub mod wire;

pub use client::NotionClient;
pub use controller::{MAX_CHILDREN_PER_CALL, PageWriter};
pub use error::NotionError;
pub use publisher::{Publisher, SyncSummary, epoch_to_iso};
pub use store::{BlockStore, ChildBatch, RemoteEntry};
