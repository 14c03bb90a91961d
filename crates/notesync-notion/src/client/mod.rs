//! Notion REST API client.
//!
//! Sync HTTP client for the Notion v1 API with bearer-token
//! authentication and a pinned API version header.

mod blocks;
mod pages;

use std::time::Duration;

use serde::de::DeserializeOwned;
use ureq::Agent;

use crate::error::NotionError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// API version sent with every request.
const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// API root.
const API_BASE_URL: &str = "https://api.notion.com/v1";

/// Listing page size; also the store's ceiling on children per write call.
pub(crate) const PAGE_SIZE: usize = 100;

/// Notion REST API client.
pub struct NotionClient {
    agent: Agent,
    base_url: String,
    token: String,
    notion_version: String,
}

impl NotionClient {
    /// Create a client with the default API version.
    #[must_use]
    pub fn new(token: &str) -> Self {
        Self::with_version(token, DEFAULT_NOTION_VERSION)
    }

    /// Create a client pinned to a specific API version.
    #[must_use]
    pub fn with_version(token: &str, notion_version: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: API_BASE_URL.to_owned(),
            token: token.to_owned(),
            notion_version: notion_version.to_owned(),
        }
    }

    pub(crate) fn agent(&self) -> &Agent {
        &self.agent
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    pub(crate) fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub(crate) fn version_header(&self) -> &str {
        &self.notion_version
    }

    /// Check the status and deserialize the response body.
    pub(crate) fn read_checked<T: DeserializeOwned>(
        response: ureq::http::Response<ureq::Body>,
    ) -> Result<T, NotionError> {
        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(NotionError::Api {
                status,
                body: error_body,
            });
        }

        Ok(body.read_json()?)
    }
}

impl crate::store::BlockStore for NotionClient {
    fn create_page(
        &self,
        parent_database: &str,
        properties: serde_json::Value,
        children: Vec<serde_json::Value>,
    ) -> Result<String, NotionError> {
        Self::create_page(self, parent_database, properties, children)
    }

    fn update_properties(
        &self,
        page_id: &str,
        properties: serde_json::Value,
    ) -> Result<(), NotionError> {
        Self::update_properties(self, page_id, properties)
    }

    fn append_children(
        &self,
        block_id: &str,
        children: Vec<serde_json::Value>,
    ) -> Result<(), NotionError> {
        Self::append_children(self, block_id, children)
    }

    fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<crate::store::ChildBatch, NotionError> {
        Self::list_children(self, block_id, cursor)
    }

    fn delete_block(&self, block_id: &str) -> Result<(), NotionError> {
        Self::delete_block(self, block_id)
    }

    fn query_existing(
        &self,
        database_id: &str,
    ) -> Result<std::collections::HashMap<String, crate::store::RemoteEntry>, NotionError> {
        Self::query_existing(self, database_id)
    }
}
